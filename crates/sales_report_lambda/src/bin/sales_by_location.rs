use lambda_runtime::{service_fn, Error, LambdaEvent};
use sales_report_lambda::config::FunctionConfig;
use sales_report_lambda::handlers::response::ApiGatewayResponse;
use sales_report_lambda::handlers::sales_by_location::handle_invocation;
use sales_report_lambda::logging::init_tracing;
use serde_json::Value;

async fn handle_request(_event: LambdaEvent<Value>) -> Result<ApiGatewayResponse, Error> {
    Ok(handle_invocation(FunctionConfig::from_env()).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();
    lambda_runtime::run(service_fn(handle_request)).await
}
