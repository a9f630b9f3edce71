//! Mapping store abstraction.

use async_trait::async_trait;

use crate::error::StoreError;

use super::types::DeviceMapping;

/// Key-value backend holding device mappings.
///
/// Backends must replace a record written under an existing
/// `(device_id, phone_number)` key rather than append a second one.
#[async_trait]
pub trait MappingStore: Send + Sync + std::fmt::Debug {
    /// Write a mapping, replacing any record with the same key.
    async fn put(&self, mapping: DeviceMapping) -> Result<(), StoreError>;

    /// Return every mapping whose partition key is `device_id`, in store order.
    ///
    /// Only the first page the backend returns is used.
    async fn query_device(&self, device_id: &str) -> Result<Vec<DeviceMapping>, StoreError>;

    /// Name of the table this store writes to.
    fn table_name(&self) -> &str;

    /// Short name of the backend, and whether it survives restarts.
    fn backend(&self) -> &'static str;
}
