//! Strategies for turning an order document into an [`OrderRecord`].

use std::collections::HashMap;

use sales_report_core::contract::{
    document_id, read_amount, OrderFields, OrderRecord, UNKNOWN_LOCATION,
};
use serde_json::Value;
use tracing::warn;

use crate::adapters::document_store::{Document, DocumentStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationStrategy {
    /// The order document carries the location name itself.
    Attribute,
    /// The order document carries a location id that is resolved against a
    /// separate collection.
    Lookup {
        collection_id: String,
        id_field: String,
        name_field: String,
    },
}

pub struct LocationResolver<'a, S: DocumentStore + ?Sized> {
    store: &'a S,
    database_id: &'a str,
    fields: &'a OrderFields,
    strategy: &'a LocationStrategy,
    resolved: HashMap<String, Option<String>>,
}

impl<'a, S: DocumentStore + ?Sized> LocationResolver<'a, S> {
    pub fn new(
        store: &'a S,
        database_id: &'a str,
        fields: &'a OrderFields,
        strategy: &'a LocationStrategy,
    ) -> Self {
        Self {
            store,
            database_id,
            fields,
            strategy,
            resolved: HashMap::new(),
        }
    }

    pub async fn order_record(&mut self, document: &Document) -> OrderRecord {
        let strategy = self.strategy;
        match strategy {
            LocationStrategy::Attribute => OrderRecord::from_document(document, self.fields),
            LocationStrategy::Lookup {
                collection_id,
                id_field,
                name_field,
            } => {
                let location_name = match document.get(id_field).and_then(Value::as_str) {
                    Some(location_id) if !location_id.is_empty() => {
                        self.lookup(collection_id, name_field, location_id).await
                    }
                    _ => Some(UNKNOWN_LOCATION.to_string()),
                };
                OrderRecord {
                    id: document_id(document),
                    location_name,
                    total_amount: read_amount(document, &self.fields.amount),
                }
            }
        }
    }

    /// Each location id is fetched at most once per invocation.
    async fn lookup(
        &mut self,
        collection_id: &str,
        name_field: &str,
        location_id: &str,
    ) -> Option<String> {
        if let Some(cached) = self.resolved.get(location_id) {
            return cached.clone();
        }

        let name = match self
            .store
            .get_document(self.database_id, collection_id, location_id)
            .await
        {
            Ok(location) => location
                .get(name_field)
                .and_then(Value::as_str)
                .map(str::to_string),
            Err(error) => {
                warn!(
                    component = "location_resolver",
                    event = "location_lookup_failed",
                    location_id,
                    error = %error,
                    "Could not find location for ID {location_id}: {error}"
                );
                Some(UNKNOWN_LOCATION.to_string())
            }
        };
        self.resolved.insert(location_id.to_string(), name.clone());
        name
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::handlers::sales_by_location::tests::InMemoryStore;

    fn lookup_strategy() -> LocationStrategy {
        LocationStrategy::Lookup {
            collection_id: "locations".to_string(),
            id_field: "locationId".to_string(),
            name_field: "name".to_string(),
        }
    }

    #[tokio::test]
    async fn attribute_strategy_reads_order_fields() {
        let store = InMemoryStore::new(Vec::new());
        let fields = OrderFields::default();
        let strategy = LocationStrategy::Attribute;
        let mut resolver = LocationResolver::new(&store, "shop", &fields, &strategy);

        let order = resolver
            .order_record(&json!({"$id": "o-1", "locationName": "Dock", "totalAmount": 4.5}))
            .await;

        assert_eq!(order, OrderRecord::new("o-1", Some("Dock"), Some(4.5)));
        assert!(store.fetched_documents().is_empty());
    }

    #[tokio::test]
    async fn lookup_strategy_resolves_each_id_once() {
        let store = InMemoryStore::new(Vec::new())
            .with_location("loc-1", json!({"$id": "loc-1", "name": "Harbor"}));
        let fields = OrderFields::default();
        let strategy = lookup_strategy();
        let mut resolver = LocationResolver::new(&store, "shop", &fields, &strategy);

        let first = resolver
            .order_record(&json!({"$id": "o-1", "locationId": "loc-1", "totalAmount": 1}))
            .await;
        let second = resolver
            .order_record(&json!({"$id": "o-2", "locationId": "loc-1", "totalAmount": 2}))
            .await;

        assert_eq!(first.location_name.as_deref(), Some("Harbor"));
        assert_eq!(second.location_name.as_deref(), Some("Harbor"));
        assert_eq!(store.fetched_documents(), vec!["loc-1".to_string()]);
    }

    #[tokio::test]
    async fn lookup_strategy_falls_back_to_unknown_location() {
        let store = InMemoryStore::new(Vec::new());
        let fields = OrderFields::default();
        let strategy = lookup_strategy();
        let mut resolver = LocationResolver::new(&store, "shop", &fields, &strategy);

        let missing_id = resolver
            .order_record(&json!({"$id": "o-1", "totalAmount": 1}))
            .await;
        let failed_lookup = resolver
            .order_record(&json!({"$id": "o-2", "locationId": "gone", "totalAmount": 2}))
            .await;

        assert_eq!(missing_id.location_name.as_deref(), Some(UNKNOWN_LOCATION));
        assert_eq!(failed_lookup.location_name.as_deref(), Some(UNKNOWN_LOCATION));
        assert_eq!(failed_lookup.total_amount, Some(2.0));
    }
}
