//! Utilities shared across handlers

pub mod flags;
