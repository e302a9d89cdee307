use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const DEFAULT_LOCATION_FIELD: &str = "locationName";
pub const DEFAULT_AMOUNT_FIELD: &str = "totalAmount";
pub const DOCUMENT_ID_FIELD: &str = "$id";
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

pub const MISSING_CONFIGURATION_MESSAGE: &str =
    "Server configuration error: Missing Appwrite credentials or collection IDs.";
pub const RETRIEVAL_FAILURE_PREFIX: &str = "Failed to retrieve sales data";

/// Attribute names used to read an order document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFields {
    pub location: String,
    pub amount: String,
}

impl Default for OrderFields {
    fn default() -> Self {
        Self {
            location: DEFAULT_LOCATION_FIELD.to_string(),
            amount: DEFAULT_AMOUNT_FIELD.to_string(),
        }
    }
}

/// One order as seen by the aggregator.
///
/// Both `location_name` and `total_amount` stay optional: documents in the
/// store carry no schema guarantees and invalid orders are skipped, not
/// rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: String,
    pub location_name: Option<String>,
    pub total_amount: Option<f64>,
}

impl OrderRecord {
    pub fn new(
        id: impl Into<String>,
        location_name: Option<&str>,
        total_amount: Option<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            location_name: location_name.map(str::to_string),
            total_amount,
        }
    }

    /// Reads an order straight from a raw store document.
    ///
    /// Only JSON strings count as a location and only JSON numbers count as
    /// an amount; `"12.5"` is not an amount.
    pub fn from_document(document: &Value, fields: &OrderFields) -> Self {
        Self {
            id: document_id(document),
            location_name: document
                .get(&fields.location)
                .and_then(Value::as_str)
                .map(str::to_string),
            total_amount: read_amount(document, &fields.amount),
        }
    }
}

pub fn document_id(document: &Value) -> String {
    document
        .get(DOCUMENT_ID_FIELD)
        .and_then(Value::as_str)
        .unwrap_or("<unknown>")
        .to_string()
}

pub fn read_amount(document: &Value, field: &str) -> Option<f64> {
    document
        .get(field)
        .filter(|value| value.is_number())
        .and_then(Value::as_f64)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationSales {
    pub name: String,
    pub sales: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SalesByLocationResponse {
    pub ok: bool,
    #[serde(rename = "salesByLocation")]
    pub sales_by_location: Vec<LocationSales>,
}

impl SalesByLocationResponse {
    pub fn new(sales_by_location: Vec<LocationSales>) -> Self {
        Self {
            ok: true,
            sales_by_location,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailureResponse {
    pub ok: bool,
    pub error: String,
}

impl FailureResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn from_document_reads_default_fields() {
        let order = OrderRecord::from_document(
            &json!({"$id": "o-1", "locationName": "Downtown", "totalAmount": 12.5}),
            &OrderFields::default(),
        );

        assert_eq!(order, OrderRecord::new("o-1", Some("Downtown"), Some(12.5)));
    }

    #[test]
    fn from_document_ignores_numeric_strings_and_non_string_locations() {
        let order = OrderRecord::from_document(
            &json!({"$id": "o-2", "locationName": 42, "totalAmount": "12.5"}),
            &OrderFields::default(),
        );

        assert_eq!(order.location_name, None);
        assert_eq!(order.total_amount, None);
    }

    #[test]
    fn from_document_honours_custom_field_names() {
        let fields = OrderFields {
            location: "storeName".to_string(),
            amount: "grandTotal".to_string(),
        };
        let order = OrderRecord::from_document(
            &json!({"$id": "o-3", "storeName": "Harbor", "grandTotal": 7}),
            &fields,
        );

        assert_eq!(order.location_name.as_deref(), Some("Harbor"));
        assert_eq!(order.total_amount, Some(7.0));
    }

    #[test]
    fn success_response_uses_camel_case_key() {
        let response = SalesByLocationResponse::new(vec![LocationSales {
            name: "A".to_string(),
            sales: "1.00".to_string(),
        }]);

        assert_eq!(
            serde_json::to_value(&response).expect("response should serialize"),
            json!({"ok": true, "salesByLocation": [{"name": "A", "sales": "1.00"}]})
        );
    }
}
