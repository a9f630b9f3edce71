//! Device mapping module.
//!
//! This module handles:
//! - The persisted mapping record
//! - The mapping store abstraction and its in-process backend
//! - Test doubles for the store

pub mod memory;
pub mod mock;
pub mod store;
pub mod types;

pub use memory::InMemoryMappingStore;
pub use mock::{FailingMappingStore, MockStoreConfig};
pub use store::MappingStore;
pub use types::DeviceMapping;
