//! Marketplace catalog entity documents and change-set requests.
//!
//! The catalog returns an entity's details as a JSON document. Only the
//! fields the handlers need are modelled here; everything else is ignored.

use serde::{Deserialize, Serialize};

use crate::errors::ResourceError;

pub const UPDATE_DELIVERY_OPTIONS: &str = "UpdateDeliveryOptions";

/// Details document of a product entity.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityDetails {
    #[serde(default)]
    pub description: Option<ProductDescription>,
    #[serde(default)]
    pub versions: Vec<ProductVersion>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductDescription {
    #[serde(default)]
    pub product_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductVersion {
    #[serde(default)]
    pub delivery_options: Vec<DeliveryOption>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeliveryOption {
    pub id: String,
}

impl EntityDetails {
    /// # Errors
    ///
    /// Returns `EntityError` when the document is not valid JSON of the
    /// expected shape.
    pub fn parse(document: &str) -> Result<Self, ResourceError> {
        serde_json::from_str(document)
            .map_err(|e| ResourceError::EntityError(format!("details document: {e}")))
    }

    /// # Errors
    ///
    /// Returns `EntityError` when the entity has no product code.
    pub fn product_code(&self) -> Result<&str, ResourceError> {
        self.description
            .as_ref()
            .and_then(|d| d.product_code.as_deref())
            .filter(|code| !code.is_empty())
            .ok_or_else(|| ResourceError::EntityError("Description.ProductCode missing".into()))
    }

    /// Returns the id of the entity's only delivery option.
    ///
    /// Ids are collected across every version and de-duplicated. Anything
    /// other than exactly one distinct id is an error.
    ///
    /// # Errors
    ///
    /// Returns `EntityError` when there are no delivery options or more than one.
    pub fn single_delivery_option_id(&self) -> Result<&str, ResourceError> {
        let mut ids: Vec<&str> = Vec::new();
        for option in self.versions.iter().flat_map(|v| &v.delivery_options) {
            if !ids.contains(&option.id.as_str()) {
                ids.push(option.id.as_str());
            }
        }

        match ids.as_slice() {
            [only] => Ok(*only),
            [] => Err(ResourceError::EntityError(
                "entity has no delivery options".to_string(),
            )),
            many => Err(ResourceError::EntityError(format!(
                "expected exactly one delivery option, found {}: {}",
                many.len(),
                many.join(", ")
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DeliveryOptionsUpdate<'a> {
    delivery_options: [DeliveryOptionUpdate<'a>; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DeliveryOptionUpdate<'a> {
    id: &'a str,
    details: DeliveryOptionUpdateDetails<'a>,
}

#[derive(Debug, Serialize)]
struct DeliveryOptionUpdateDetails<'a> {
    #[serde(rename = "SaaSUrlDeliveryOptionDetails")]
    saas_url: SaasUrlDetails<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SaasUrlDetails<'a> {
    fulfillment_url: &'a str,
}

/// A single-change change-set submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSetRequest {
    pub catalog: String,
    pub change_type: String,
    pub entity_type: String,
    pub entity_id: String,
    /// JSON-encoded change details.
    pub details: String,
}

impl ChangeSetRequest {
    /// Builds an `UpdateDeliveryOptions` change pointing the delivery option
    /// at a new SaaS fulfillment URL.
    ///
    /// # Errors
    ///
    /// Returns `EntityError` if the details fail to serialize.
    pub fn update_fulfillment_url(
        catalog: &str,
        entity_type: &str,
        entity_id: &str,
        delivery_option_id: &str,
        fulfillment_url: &str,
    ) -> Result<Self, ResourceError> {
        let details = DeliveryOptionsUpdate {
            delivery_options: [DeliveryOptionUpdate {
                id: delivery_option_id,
                details: DeliveryOptionUpdateDetails {
                    saas_url: SaasUrlDetails { fulfillment_url },
                },
            }],
        };
        let details = serde_json::to_string(&details)
            .map_err(|e| ResourceError::EntityError(format!("change details: {e}")))?;

        Ok(Self {
            catalog: catalog.to_string(),
            change_type: UPDATE_DELIVERY_OPTIONS.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            details,
        })
    }
}

/// Identifiers returned when a change-set is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangeSetSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_set_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_set_arn: Option<String>,
}
