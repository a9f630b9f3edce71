//! Mapping store double for unit testing.
//!
//! Wraps the in-memory store and injects backend failures on demand.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::StoreError;

use super::memory::InMemoryMappingStore;
use super::store::MappingStore;
use super::types::DeviceMapping;

/// Configuration for mock store behavior.
#[derive(Debug, Clone, Default)]
pub struct MockStoreConfig {
    /// Whether to fail put requests.
    pub fail_put: bool,
    /// Whether to fail query requests.
    pub fail_query: bool,
}

/// Mapping store that can be told to fail.
#[derive(Debug)]
pub struct FailingMappingStore {
    inner: InMemoryMappingStore,
    fail_put: AtomicBool,
    fail_query: AtomicBool,
    calls: AtomicUsize,
}

impl FailingMappingStore {
    /// Create a store that succeeds until told otherwise.
    pub fn new() -> Self {
        Self::with_config(MockStoreConfig::default())
    }

    /// Create a store with custom failure behavior.
    pub fn with_config(config: MockStoreConfig) -> Self {
        Self {
            inner: InMemoryMappingStore::new("MockDevicePhoneMapping"),
            fail_put: AtomicBool::new(config.fail_put),
            fail_query: AtomicBool::new(config.fail_query),
            calls: AtomicUsize::new(0),
        }
    }

    /// Toggle put failures.
    pub fn set_fail_put(&self, fail: bool) {
        self.fail_put.store(fail, Ordering::SeqCst);
    }

    /// Toggle query failures.
    pub fn set_fail_query(&self, fail: bool) {
        self.fail_query.store(fail, Ordering::SeqCst);
    }

    /// Number of store calls made, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for FailingMappingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MappingStore for FailingMappingStore {
    async fn put(&self, mapping: DeviceMapping) -> Result<(), StoreError> {
        self.record_call();

        if self.fail_put.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("Mock put failure".to_string()));
        }

        self.inner.put(mapping).await
    }

    async fn query_device(&self, device_id: &str) -> Result<Vec<DeviceMapping>, StoreError> {
        self.record_call();

        if self.fail_query.load(Ordering::SeqCst) {
            return Err(StoreError::QueryRejected {
                table: self.inner.table_name().to_string(),
                device_id: device_id.to_string(),
                reason: "Mock query failure".to_string(),
            });
        }

        self.inner.query_device(device_id).await
    }

    fn table_name(&self) -> &str {
        self.inner.table_name()
    }

    fn backend(&self) -> &'static str {
        "mock"
    }
}
