//! Contact Service - Pure business logic without HTTP layer
//!
//! Turns submitted forms into store calls and keeps the content root in step
//! with the rows that reference it.

use std::collections::HashMap;

use crate::domain::{ContactChanges, ContactRepository, DomainError, NewContact};
use crate::models::Contact;
use crate::services::upload_service::UploadStore;

/// Scalar fields of a submitted form plus the public path of a stored image
#[derive(Debug, Default, Clone)]
pub struct SubmittedForm {
    pub fields: HashMap<String, String>,
    pub image: Option<String>,
}

impl SubmittedForm {
    fn take(&mut self, key: &str) -> Option<String> {
        self.fields.remove(key)
    }

    fn take_favorite(&mut self) -> Result<Option<bool>, DomainError> {
        match self.take("favorite") {
            Some(value) if !value.trim().is_empty() => parse_flag(&value).map(Some),
            _ => Ok(None),
        }
    }

    pub fn into_new_contact(mut self) -> Result<NewContact, DomainError> {
        let favorite = self.take_favorite()?.unwrap_or(false);

        Ok(NewContact {
            name: self.take("name"),
            phone: self.take("phone"),
            email: self.take("email"),
            address: self.take("address"),
            facebook: self.take("facebook"),
            instagram: self.take("instagram"),
            image: self.image.take(),
            favorite,
        })
    }

    /// Split an update form into the target id and the columns to overwrite
    pub fn into_changes(mut self) -> Result<(i32, ContactChanges), DomainError> {
        let id = match self.take("id") {
            Some(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse::<i32>()
                .map_err(|_| DomainError::Validation(format!("id must be an integer, got '{}'", raw)))?,
            _ => return Err(DomainError::Validation("id is required".to_string())),
        };
        let favorite = self.take_favorite()?;

        let changes = ContactChanges {
            name: self.take("name"),
            phone: self.take("phone"),
            email: self.take("email"),
            address: self.take("address"),
            facebook: self.take("facebook"),
            instagram: self.take("instagram"),
            image: self.image.take(),
            favorite,
        };

        Ok((id, changes))
    }
}

fn parse_flag(value: &str) -> Result<bool, DomainError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" => Ok(true),
        "false" | "0" | "off" => Ok(false),
        other => Err(DomainError::Validation(format!(
            "favorite must be a boolean, got '{}'",
            other
        ))),
    }
}

/// Create a contact from a submitted form.
/// A stored image is removed again if the row can't be inserted.
pub async fn create_contact(
    repo: &dyn ContactRepository,
    uploads: &UploadStore,
    form: SubmittedForm,
) -> Result<Contact, DomainError> {
    let image = form.image.clone();

    let result = match form.into_new_contact() {
        Ok(new_contact) => repo.create(new_contact).await,
        Err(e) => Err(e),
    };

    if let Err(e) = &result {
        tracing::error!("Failed to create contact: {}", e);
        if let Some(path) = image {
            uploads.discard(&path).await;
        }
    }

    result
}

/// Apply an update form. Returns the number of rows changed (0 for an unknown id).
///
/// With `prune` set, the image replaced by a new upload is deleted once the
/// row change has committed.
pub async fn update_contact(
    repo: &dyn ContactRepository,
    uploads: &UploadStore,
    form: SubmittedForm,
    prune: bool,
) -> Result<u64, DomainError> {
    let new_image = form.image.clone();

    let outcome = async {
        let (id, changes) = form.into_changes()?;

        let previous = if prune && new_image.is_some() {
            match repo.get_by_id(id).await {
                Ok(contact) => contact.image,
                Err(DomainError::NotFound) => None,
                Err(e) => return Err(e),
            }
        } else {
            None
        };

        let updated = repo.update_by_id(id, changes).await?;
        Ok((updated, previous))
    }
    .await;

    match outcome {
        Ok((updated, previous)) => {
            if updated == 0 {
                // Nothing references the new file
                if let Some(path) = &new_image {
                    uploads.discard(path).await;
                }
            } else if let Some(old) = previous
                && new_image.as_deref() != Some(old.as_str())
            {
                uploads.discard(&old).await;
            }
            Ok(updated)
        }
        Err(e) => {
            tracing::error!("Failed to update contact: {}", e);
            if let Some(path) = &new_image {
                uploads.discard(path).await;
            }
            Err(e)
        }
    }
}

/// Delete a contact. With `prune` set, its image is removed after the row.
pub async fn delete_contact(
    repo: &dyn ContactRepository,
    uploads: &UploadStore,
    id: i32,
    prune: bool,
) -> Result<(), DomainError> {
    let image = if prune {
        match repo.get_by_id(id).await {
            Ok(contact) => contact.image,
            Err(DomainError::NotFound) => None,
            Err(e) => return Err(e),
        }
    } else {
        None
    };

    repo.delete_by_id(id).await?;

    if let Some(path) = image {
        uploads.discard(&path).await;
    }

    Ok(())
}
