//! Configuration and domain types shared by all three handlers

pub mod catalog;
pub mod config;
pub mod models;
