//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::ContactRepository;
use crate::infrastructure::SeaOrmContactRepository;
use crate::infrastructure::config::{Config, StatusMode};
use crate::services::UploadStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Contact repository
    pub contact_repo: Arc<dyn ContactRepository>,
    /// Content root for uploaded images
    pub uploads: Arc<UploadStore>,
    /// Error-to-status translation
    pub status_mode: StatusMode,
    /// Delete images that are superseded or orphaned by a delete
    pub prune_uploads: bool,
}

impl AppState {
    /// Create a new AppState backed by SeaORM, hardened status codes and no pruning
    pub fn new(db: DatabaseConnection, uploads: UploadStore) -> Self {
        Self::with_repository(Arc::new(SeaOrmContactRepository::new(db)), uploads)
    }

    pub fn with_repository(contact_repo: Arc<dyn ContactRepository>, uploads: UploadStore) -> Self {
        Self {
            contact_repo,
            uploads: Arc::new(uploads),
            status_mode: StatusMode::Hardened,
            prune_uploads: false,
        }
    }

    pub fn from_config(db: DatabaseConnection, config: &Config) -> Self {
        Self::new(db, UploadStore::new(&config.upload_dir))
            .status_mode(config.status_mode)
            .prune_uploads(config.prune_uploads)
    }

    pub fn status_mode(mut self, mode: StatusMode) -> Self {
        self.status_mode = mode;
        self
    }

    pub fn prune_uploads(mut self, prune: bool) -> Self {
        self.prune_uploads = prune;
        self
    }
}
