//! Request handler: dispatch, validation and response formatting.

pub mod request;
pub mod response;
pub mod service;

pub use request::ApiRequest;
pub use response::{ApiResponse, DevicePhoneNumbers};
pub use service::DeviceMappingService;
