use std::env;
use std::time::Duration;

const DEFAULT_CATALOG_REGION: &str = "us-east-1";
const DEFAULT_CATALOG: &str = "AWSMarketplace";
const DEFAULT_SAAS_ENTITY_TYPE: &str = "SaaSProduct@1.0";
const DEFAULT_CALLBACK_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Region for the Marketplace Catalog API, which is only served from `us-east-1`.
    pub catalog_region: String,
    pub catalog_name: String,
    pub saas_entity_type: String,
    pub callback_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_region: DEFAULT_CATALOG_REGION.to_string(),
            catalog_name: DEFAULT_CATALOG.to_string(),
            saas_entity_type: DEFAULT_SAAS_ENTITY_TYPE.to_string(),
            callback_timeout: Duration::from_secs(DEFAULT_CALLBACK_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Unset variables
    /// fall back to defaults; set-but-empty ones are rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str, default: &str| -> Result<String, String> {
            match lookup(name) {
                None => Ok(default.to_string()),
                Some(v) if v.trim().is_empty() => Err(format!("{name}: must not be empty")),
                Some(v) => Ok(v.trim().to_string()),
            }
        };

        let callback_timeout = match lookup("CALLBACK_TIMEOUT_SECS") {
            None => Duration::from_secs(DEFAULT_CALLBACK_TIMEOUT_SECS),
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|e| format!("CALLBACK_TIMEOUT_SECS: {e}"))?;
                if secs == 0 {
                    return Err("CALLBACK_TIMEOUT_SECS: must be greater than zero".to_string());
                }
                Duration::from_secs(secs)
            }
        };

        Ok(Self {
            catalog_region: non_empty("CATALOG_REGION", DEFAULT_CATALOG_REGION)?,
            catalog_name: non_empty("MARKETPLACE_CATALOG", DEFAULT_CATALOG)?,
            saas_entity_type: non_empty("SAAS_ENTITY_TYPE", DEFAULT_SAAS_ENTITY_TYPE)?,
            callback_timeout,
        })
    }
}
