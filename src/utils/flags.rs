//! Parsing of string-typed boolean flags.
//!
//! CloudFormation passes every resource property as a string, so a flag such
//! as `IsBase64Encoded` arrives as `"true"`/`"false"`. These helpers turn it
//! into a `bool` once, at the deserialization boundary.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Text(String),
}

/// Returns true only for `"true"` compared case-insensitively, ignoring
/// surrounding whitespace.
#[must_use]
pub fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Deserializes a flag that may be a JSON boolean, a string, or null.
/// Anything other than `true`/`"true"` reads as false.
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawFlag>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawFlag::Bool(b)) => b,
        Some(RawFlag::Text(s)) => parse_flag(&s),
        None => false,
    })
}
