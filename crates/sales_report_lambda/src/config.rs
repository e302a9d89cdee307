//! Function configuration read from the invocation environment.
//!
//! Every required setting is checked before the store is touched, and all
//! missing names are reported together.

use std::collections::HashMap;

use sales_report_core::contract::{
    OrderFields, DEFAULT_AMOUNT_FIELD, DEFAULT_LOCATION_FIELD, DEFAULT_PAGE_SIZE,
};
use thiserror::Error;

use crate::location::LocationStrategy;

pub const APPWRITE_ENDPOINT: &str = "APPWRITE_ENDPOINT";
pub const APPWRITE_PROJECT: &str = "APPWRITE_PROJECT";
pub const APPWRITE_API_KEY: &str = "APPWRITE_API_KEY";
pub const APPWRITE_DATABASE_ID: &str = "APPWRITE_DATABASE_ID";
pub const ORDERS_COLLECTION_ID: &str = "ORDERS_COLLECTION_ID";
pub const ORDERS_PAGE_SIZE: &str = "ORDERS_PAGE_SIZE";
pub const ORDER_LOCATION_FIELD: &str = "ORDER_LOCATION_FIELD";
pub const ORDER_AMOUNT_FIELD: &str = "ORDER_AMOUNT_FIELD";
pub const LOCATION_STRATEGY: &str = "LOCATION_STRATEGY";
pub const LOCATION_COLLECTION_ID: &str = "LOCATION_COLLECTION_ID";
pub const LOCATION_ID_FIELD: &str = "LOCATION_ID_FIELD";
pub const LOCATION_NAME_FIELD: &str = "LOCATION_NAME_FIELD";

pub const DEFAULT_LOCATION_ID_FIELD: &str = "locationId";
pub const DEFAULT_LOCATION_NAME_FIELD: &str = "name";

const REQUIRED_VARIABLES: [&str; 5] = [
    APPWRITE_ENDPOINT,
    APPWRITE_PROJECT,
    APPWRITE_API_KEY,
    APPWRITE_DATABASE_ID,
    ORDERS_COLLECTION_ID,
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required settings: {}", .0.join(", "))]
    MissingVariables(Vec<String>),
    #[error("{name}={value:?} is invalid: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
}

#[derive(Clone, PartialEq, Eq)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub project: String,
    pub api_key: String,
}

impl std::fmt::Debug for AppwriteSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppwriteSettings")
            .field("endpoint", &self.endpoint)
            .field("project", &self.project)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionConfig {
    pub appwrite: AppwriteSettings,
    pub database_id: String,
    pub orders_collection_id: String,
    pub page_size: usize,
    pub order_fields: OrderFields,
    pub location_strategy: LocationStrategy,
}

impl FunctionConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_map(values: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|name| values.get(name).cloned())
    }

    /// Builds the config from any variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let missing: Vec<String> = REQUIRED_VARIABLES
            .into_iter()
            .filter(|name| read(*name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables(missing));
        }
        let required = |name: &str| read(name).unwrap_or_default();

        let page_size = match read(ORDERS_PAGE_SIZE) {
            None => DEFAULT_PAGE_SIZE,
            Some(raw) => match raw.parse::<usize>() {
                Ok(value) if value > 0 => value,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: ORDERS_PAGE_SIZE.to_string(),
                        value: raw,
                        reason: "must be a positive integer".to_string(),
                    })
                }
            },
        };

        let order_fields = OrderFields {
            location: read(ORDER_LOCATION_FIELD)
                .unwrap_or_else(|| DEFAULT_LOCATION_FIELD.to_string()),
            amount: read(ORDER_AMOUNT_FIELD).unwrap_or_else(|| DEFAULT_AMOUNT_FIELD.to_string()),
        };

        let location_strategy = match read(LOCATION_STRATEGY).as_deref() {
            None | Some("attribute") => LocationStrategy::Attribute,
            Some("lookup") => {
                let Some(collection_id) = read(LOCATION_COLLECTION_ID) else {
                    return Err(ConfigError::MissingVariables(vec![
                        LOCATION_COLLECTION_ID.to_string(),
                    ]));
                };
                LocationStrategy::Lookup {
                    collection_id,
                    id_field: read(LOCATION_ID_FIELD)
                        .unwrap_or_else(|| DEFAULT_LOCATION_ID_FIELD.to_string()),
                    name_field: read(LOCATION_NAME_FIELD)
                        .unwrap_or_else(|| DEFAULT_LOCATION_NAME_FIELD.to_string()),
                }
            }
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: LOCATION_STRATEGY.to_string(),
                    value: other.to_string(),
                    reason: "expected `attribute` or `lookup`".to_string(),
                })
            }
        };

        Ok(Self {
            appwrite: AppwriteSettings {
                endpoint: required(APPWRITE_ENDPOINT),
                project: required(APPWRITE_PROJECT),
                api_key: required(APPWRITE_API_KEY),
            },
            database_id: required(APPWRITE_DATABASE_ID),
            orders_collection_id: required(ORDERS_COLLECTION_ID),
            page_size,
            order_fields,
            location_strategy,
        })
    }
}
