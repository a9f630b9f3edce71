//! In-process mapping store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use crate::error::StoreError;

use super::store::MappingStore;
use super::types::DeviceMapping;

/// Mapping store held in memory.
///
/// Records are partitioned by device and ordered by phone number within a
/// partition, the way a range-keyed table returns them. Nothing is persisted:
/// mappings are lost when the process exits.
#[derive(Debug)]
pub struct InMemoryMappingStore {
    /// Table name this store stands in for.
    table: String,
    /// Partition key -> (sort key -> record).
    partitions: DashMap<String, BTreeMap<String, DeviceMapping>>,
}

impl InMemoryMappingStore {
    /// Create an empty store for the given table.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            partitions: DashMap::new(),
        }
    }

    /// Total number of records across all devices.
    pub fn len(&self) -> usize {
        self.partitions.iter().map(|p| p.value().len()).sum()
    }

    /// Check if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MappingStore for InMemoryMappingStore {
    async fn put(&self, mapping: DeviceMapping) -> Result<(), StoreError> {
        let (device_id, phone_number) = mapping.key();
        if device_id.is_empty() || phone_number.is_empty() {
            return Err(StoreError::PutRejected {
                table: self.table.clone(),
                reason: "key attributes must be non-empty".to_string(),
            });
        }

        debug!(table = %self.table, device_id, phone_number, "putting mapping");

        self.partitions
            .entry(mapping.device_id.clone())
            .or_default()
            .insert(mapping.phone_number.clone(), mapping);

        Ok(())
    }

    async fn query_device(&self, device_id: &str) -> Result<Vec<DeviceMapping>, StoreError> {
        let items: Vec<DeviceMapping> = self
            .partitions
            .get(device_id)
            .map(|partition| partition.values().cloned().collect())
            .unwrap_or_default();

        debug!(table = %self.table, device_id, count = items.len(), "queried device");

        Ok(items)
    }

    fn table_name(&self) -> &str {
        &self.table
    }

    fn backend(&self) -> &'static str {
        "in-memory (not persisted across restarts)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_query_returns_mapping() {
        let store = InMemoryMappingStore::new("DevicePhoneMapping");
        store.put(DeviceMapping::new("dev-1", "+15551230000")).await.unwrap();

        let items = store.query_device("dev-1").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].phone_number, "+15551230000");
    }

    #[tokio::test]
    async fn identical_key_replaces_record() {
        let store = InMemoryMappingStore::new("DevicePhoneMapping");
        store.put(DeviceMapping::new("dev-1", "+15551230000")).await.unwrap();
        store.put(DeviceMapping::new("dev-1", "+15551230000")).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.query_device("dev-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn partitions_are_isolated_and_sorted() {
        let store = InMemoryMappingStore::new("DevicePhoneMapping");
        store.put(DeviceMapping::new("dev-1", "+3")).await.unwrap();
        store.put(DeviceMapping::new("dev-1", "+1")).await.unwrap();
        store.put(DeviceMapping::new("dev-2", "+2")).await.unwrap();

        let numbers: Vec<String> = store
            .query_device("dev-1")
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.phone_number)
            .collect();

        assert_eq!(numbers, vec!["+1".to_string(), "+3".to_string()]);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn unknown_device_yields_empty() {
        let store = InMemoryMappingStore::new("DevicePhoneMapping");
        assert!(store.query_device("missing").await.unwrap().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn backend_reports_volatility() {
        let store = InMemoryMappingStore::new("DevicePhoneMapping");
        assert!(store.backend().starts_with("in-memory"));
        assert!(store.backend().contains("not persisted"));
    }

    #[tokio::test]
    async fn empty_key_is_rejected() {
        let store = InMemoryMappingStore::new("DevicePhoneMapping");
        let result = store.put(DeviceMapping::new("", "+1")).await;
        assert!(matches!(result, Err(StoreError::PutRejected { .. })));
    }
}
