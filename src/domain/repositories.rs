//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::DomainError;
use crate::models::contact::Contact;

/// Fields for inserting a contact. Required fields are optional here so that
/// a missing value surfaces as a validation error rather than a parse error.
#[derive(Debug, Default, Clone)]
pub struct NewContact {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub image: Option<String>,
    pub favorite: bool,
}

/// Columns to overwrite on an existing contact. `None` keeps the stored value.
#[derive(Debug, Default, Clone)]
pub struct ContactChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub image: Option<String>,
    pub favorite: Option<bool>,
}

/// Repository trait for Contact entity
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Insert a new contact, assigning its id
    async fn create(&self, contact: NewContact) -> Result<Contact, DomainError>;

    /// Find every contact
    async fn list_all(&self) -> Result<Vec<Contact>, DomainError>;

    /// Find a contact by ID, `NotFound` if absent
    async fn get_by_id(&self, id: i32) -> Result<Contact, DomainError>;

    /// Overwrite the supplied columns, returning the number of rows touched
    async fn update_by_id(&self, id: i32, changes: ContactChanges) -> Result<u64, DomainError>;

    /// Delete a contact by ID. Missing ids are not an error.
    async fn delete_by_id(&self, id: i32) -> Result<(), DomainError>;
}
