//! Client-side state: the form being edited and the list of known contacts
//!
//! The list mirrors the server once after `load`; later changes are applied
//! locally as requests complete. Favorites are toggled locally only and are
//! not sent until the contact is next submitted.

use super::api_client::{ApiClient, ContactForm, SelectedImage, StoredContact};
use super::ClientError;

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EditTarget {
    index: usize,
    id: i32,
}

pub struct ContactBook {
    api: ApiClient,
    form: ContactForm,
    contacts: Vec<StoredContact>,
    editing: Option<EditTarget>,
}

impl ContactBook {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            form: ContactForm::default(),
            contacts: Vec::new(),
            editing: None,
        }
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    /// Field bindings for the view
    pub fn form_mut(&mut self) -> &mut ContactForm {
        &mut self.form
    }

    pub fn contacts(&self) -> &[StoredContact] {
        &self.contacts
    }

    pub fn editing_index(&self) -> Option<usize> {
        self.editing.map(|target| target.index)
    }

    pub fn select_image(&mut self, image: SelectedImage) {
        self.form.image = Some(image);
    }

    /// Replace the local list with the server's. Returns the number loaded.
    /// An edit in progress follows its contact to the new position, or is
    /// dropped if the contact is gone.
    pub async fn load(&mut self) -> Result<usize, ClientError> {
        match self.api.list().await {
            Ok(contacts) => {
                tracing::debug!("Loaded {} contacts", contacts.len());
                self.contacts = contacts;
                self.relocate_edit_target();
                Ok(self.contacts.len())
            }
            Err(e) => {
                tracing::error!("Failed to load contacts: {}", e);
                Err(e)
            }
        }
    }

    fn relocate_edit_target(&mut self) {
        let Some(target) = self.editing else {
            return;
        };

        match self.contacts.iter().position(|c| c.id == target.id) {
            Some(index) => self.editing = Some(EditTarget { index, ..target }),
            None => {
                tracing::warn!("Contact {} being edited is no longer listed", target.id);
                self.reset_form();
            }
        }
    }

    /// Create or update depending on whether an edit is in progress.
    /// On failure the form stays populated.
    pub async fn submit(&mut self) -> Result<(), ClientError> {
        let editing = self.editing;
        let result = match editing {
            Some(target) => self.submit_update(target).await,
            None => self.submit_create().await,
        };

        match result {
            Ok(()) => {
                self.reset_form();
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to submit contact: {}", e);
                Err(e)
            }
        }
    }

    async fn submit_create(&mut self) -> Result<(), ClientError> {
        let created = self.api.create(&self.form).await?;
        self.contacts.push(created);
        Ok(())
    }

    async fn submit_update(&mut self, target: EditTarget) -> Result<(), ClientError> {
        let updated = self.api.update(target.id, &self.form).await?;
        if updated == 0 {
            tracing::warn!("Server had no contact with id {}", target.id);
        }

        let form = &self.form;
        let entry = self
            .contacts
            .get_mut(target.index)
            .ok_or(ClientError::InvalidIndex(target.index))?;

        // Merge without waiting for the stored image path
        entry.name = form.name.clone();
        entry.phone = form.phone.clone();
        entry.email = form.email.clone();
        entry.address = form.address.clone();
        entry.facebook = non_empty(&form.facebook);
        entry.instagram = non_empty(&form.instagram);
        entry.favorite = form.favorite;
        if let Some(image) = &form.image {
            entry.image_preview = Some(image.preview());
        }

        Ok(())
    }

    /// Seed the form from the contact at `index` and enter edit mode
    pub fn start_edit(&mut self, index: usize) -> Result<(), ClientError> {
        let contact = self
            .contacts
            .get(index)
            .ok_or(ClientError::InvalidIndex(index))?;

        self.form = ContactForm {
            name: contact.name.clone(),
            phone: contact.phone.clone(),
            email: contact.email.clone(),
            address: contact.address.clone(),
            facebook: contact.facebook.clone().unwrap_or_default(),
            instagram: contact.instagram.clone().unwrap_or_default(),
            favorite: contact.favorite,
            image: None,
        };
        self.editing = Some(EditTarget {
            index,
            id: contact.id,
        });

        Ok(())
    }

    /// Clear the form and leave edit mode
    pub fn reset_form(&mut self) {
        self.form = ContactForm::default();
        self.editing = None;
    }

    /// Flip the favorite flag locally. Returns the new value.
    pub fn toggle_favorite(&mut self, index: usize) -> Result<bool, ClientError> {
        let contact = self
            .contacts
            .get_mut(index)
            .ok_or(ClientError::InvalidIndex(index))?;

        contact.favorite = !contact.favorite;
        Ok(contact.favorite)
    }

    /// Delete on the server, then drop the entry once any response arrives.
    /// The response status is not inspected.
    pub async fn delete_contact(&mut self, index: usize, id: i32) -> Result<(), ClientError> {
        if index >= self.contacts.len() {
            return Err(ClientError::InvalidIndex(index));
        }

        let status = self.api.delete(id).await.map_err(|e| {
            tracing::error!("Failed to delete contact {}: {}", id, e);
            e
        })?;
        tracing::debug!("Delete of contact {} answered {}", id, status);

        self.contacts.remove(index);

        let editing = self.editing;
        match editing {
            Some(target) if target.index == index => self.reset_form(),
            Some(target) if target.index > index => {
                self.editing = Some(EditTarget {
                    index: target.index - 1,
                    ..target
                });
            }
            _ => {}
        }

        Ok(())
    }
}
