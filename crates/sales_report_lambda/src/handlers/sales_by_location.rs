use sales_report_core::aggregation::SalesAggregator;
use sales_report_core::contract::{LocationSales, SalesByLocationResponse};
use sales_report_core::paging::PageCursor;
use tracing::{error, info};

use crate::adapters::appwrite::AppwriteClient;
use crate::adapters::document_store::DocumentStore;
use crate::config::{ConfigError, FunctionConfig, ORDERS_PAGE_SIZE};
use crate::error::SalesReportError;
use crate::handlers::response::{failure_response, success_response, ApiGatewayResponse};
use crate::location::LocationResolver;

/// Pages through the orders collection and returns per-location totals,
/// highest first.
///
/// Pages are fetched one after another starting at offset 0 until a page
/// comes back short. A failed fetch aborts the run; nothing partial is
/// returned.
pub async fn aggregate_sales<S: DocumentStore + ?Sized>(
    store: &S,
    config: &FunctionConfig,
) -> Result<Vec<LocationSales>, SalesReportError> {
    let mut cursor =
        PageCursor::new(config.page_size).map_err(|error| ConfigError::InvalidValue {
            name: ORDERS_PAGE_SIZE.to_string(),
            value: config.page_size.to_string(),
            reason: error.message().to_string(),
        })?;
    let mut resolver = LocationResolver::new(
        store,
        &config.database_id,
        &config.order_fields,
        &config.location_strategy,
    );
    let mut aggregator = SalesAggregator::new();

    while let Some(request) = cursor.next_request() {
        let documents = store
            .list_page(
                &config.database_id,
                &config.orders_collection_id,
                request.limit,
                request.offset,
            )
            .await?;
        info!(
            component = "sales_by_location",
            event = "page_fetched",
            offset = request.offset,
            returned = documents.len(),
            "Fetched {} orders for sales by location",
            documents.len()
        );

        for document in &documents {
            let order = resolver.order_record(document).await;
            aggregator.record(&order);
        }
        cursor.advance(documents.len());
    }

    let skipped = aggregator.skipped();
    let sales = aggregator.finish();
    info!(
        component = "sales_by_location",
        event = "aggregation_completed",
        locations = sales.len(),
        skipped,
        pages = cursor.pages_requested(),
        "Sales by location generated for {} locations",
        sales.len()
    );
    Ok(sales)
}

pub async fn handle_sales_by_location<S: DocumentStore + ?Sized>(
    config: &FunctionConfig,
    store: &S,
) -> ApiGatewayResponse {
    match aggregate_sales(store, config).await {
        Ok(sales) => success_response(&SalesByLocationResponse::new(sales)),
        Err(error) => failure(error),
    }
}

/// Entry point for one invocation: validates the configuration, builds a
/// fresh Appwrite client from it, and aggregates.
pub async fn handle_invocation(config: Result<FunctionConfig, ConfigError>) -> ApiGatewayResponse {
    info!(
        component = "sales_by_location",
        event = "invocation_started",
        "Starting sales by location aggregation"
    );

    let config = match config {
        Ok(value) => value,
        Err(error) => return failure(error.into()),
    };

    let client = match AppwriteClient::new(
        config.appwrite.endpoint.clone(),
        config.appwrite.project.clone(),
        config.appwrite.api_key.clone(),
    ) {
        Ok(value) => value,
        Err(error) => return failure(error.into()),
    };

    handle_sales_by_location(&config, &client).await
}

fn failure(error: SalesReportError) -> ApiGatewayResponse {
    let event = match error {
        SalesReportError::Configuration(_) => "configuration_invalid",
        SalesReportError::Retrieval(_) => "retrieval_failed",
    };
    error!(
        component = "sales_by_location",
        event,
        error = %error,
        "Failed to get sales by location"
    );
    failure_response(500, error.response_message())
}
