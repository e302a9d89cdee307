use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use sales_report_core::contract::{FailureResponse, SalesByLocationResponse};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

impl ApiGatewayResponse {
    pub fn body_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

pub fn success_response(payload: &SalesByLocationResponse) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code: 200,
        headers: json_headers(),
        body: serde_json::to_string(payload).expect("response payload should serialize"),
    }
}

pub fn failure_response(status_code: u16, message: impl Into<String>) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json_headers(),
        body: serde_json::to_string(&FailureResponse::new(message))
            .expect("failure payload should serialize"),
    }
}

fn json_headers() -> Value {
    json!({"Content-Type": "application/json"})
}
