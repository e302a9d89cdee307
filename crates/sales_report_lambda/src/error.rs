use sales_report_core::contract::{MISSING_CONFIGURATION_MESSAGE, RETRIEVAL_FAILURE_PREFIX};
use thiserror::Error;

use crate::adapters::document_store::StoreError;
use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum SalesReportError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
    #[error("retrieval error: {0}")]
    Retrieval(#[from] StoreError),
}

impl SalesReportError {
    /// Message placed in the `error` field of the failure body.
    pub fn response_message(&self) -> String {
        match self {
            Self::Configuration(ConfigError::MissingVariables(_)) => {
                MISSING_CONFIGURATION_MESSAGE.to_string()
            }
            Self::Configuration(error) => format!("Server configuration error: {error}"),
            // Endpoint and status stay in the log line.
            Self::Retrieval(StoreError::Status { message, .. }) => {
                format!("{RETRIEVAL_FAILURE_PREFIX}: {message}")
            }
            Self::Retrieval(error) => format!("{RETRIEVAL_FAILURE_PREFIX}: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_expose_only_the_store_message() {
        let error = SalesReportError::from(StoreError::Status {
            endpoint: "https://cloud.example/v1/databases/shop/collections/orders/documents"
                .to_string(),
            status: 401,
            message: "Invalid API key".to_string(),
        });

        assert_eq!(
            error.response_message(),
            "Failed to retrieve sales data: Invalid API key"
        );
        assert!(error.to_string().contains("returned status 401"));
    }

    #[test]
    fn unavailable_store_message_is_passed_through() {
        let error =
            SalesReportError::from(StoreError::Unavailable("connection refused".to_string()));

        assert_eq!(
            error.response_message(),
            "Failed to retrieve sales data: connection refused"
        );
    }
}
