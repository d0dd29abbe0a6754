//! AWS Marketplace Catalog client module
//!
//! Wraps the two catalog calls the handlers need behind `CatalogApi` so the
//! handlers can be exercised without AWS.

use async_trait::async_trait;
use aws_sdk_marketplacecatalog::Client;
use aws_sdk_marketplacecatalog::types::{Change, Entity};
use tracing::debug;

use crate::core::catalog::{ChangeSetRequest, ChangeSetSummary, EntityDetails};
use crate::errors::ResourceError;

#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetches and parses the details document of an entity.
    async fn describe_entity(&self, entity_id: &str) -> Result<EntityDetails, ResourceError>;

    /// Submits a change-set; the catalog applies it asynchronously.
    async fn start_change_set(
        &self,
        request: &ChangeSetRequest,
    ) -> Result<ChangeSetSummary, ResourceError>;
}

/// `CatalogApi` backed by the AWS SDK.
#[derive(Debug, Clone)]
pub struct MarketplaceCatalogClient {
    client: Client,
    catalog: String,
}

impl MarketplaceCatalogClient {
    pub fn new(client: Client, catalog: impl Into<String>) -> Self {
        Self {
            client,
            catalog: catalog.into(),
        }
    }
}

#[async_trait]
impl CatalogApi for MarketplaceCatalogClient {
    async fn describe_entity(&self, entity_id: &str) -> Result<EntityDetails, ResourceError> {
        let resp = self
            .client
            .describe_entity()
            .catalog(&self.catalog)
            .entity_id(entity_id)
            .send()
            .await?;

        let Some(document) = resp.details() else {
            return Err(ResourceError::EntityError(format!(
                "entity {entity_id} returned no details"
            )));
        };
        debug!("DescribeEntity details: {}", document);

        EntityDetails::parse(document)
    }

    async fn start_change_set(
        &self,
        request: &ChangeSetRequest,
    ) -> Result<ChangeSetSummary, ResourceError> {
        let entity = Entity::builder()
            .r#type(&request.entity_type)
            .identifier(&request.entity_id)
            .build()?;
        let change = Change::builder()
            .change_type(&request.change_type)
            .entity(entity)
            .details(&request.details)
            .build()?;

        let resp = self
            .client
            .start_change_set()
            .catalog(&request.catalog)
            .change_set(change)
            .send()
            .await?;

        Ok(ChangeSetSummary {
            change_set_id: resp.change_set_id().map(ToString::to_string),
            change_set_arn: resp.change_set_arn().map(ToString::to_string),
        })
    }
}
