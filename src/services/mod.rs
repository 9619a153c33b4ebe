//! Services Layer
//!
//! Business logic extracted from HTTP handlers.

pub mod contact_service;
pub mod upload_service;

pub use contact_service::SubmittedForm;
pub use upload_service::{PUBLIC_PREFIX, UploadStore};
