//! Client modules for external AWS API interactions

pub mod catalog_client;
pub mod object_store;

pub use catalog_client::{CatalogApi, MarketplaceCatalogClient};
pub use object_store::{ObjectStore, PutObject, S3ObjectStore};
