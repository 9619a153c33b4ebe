pub mod contact;
pub mod error;
pub mod health;
pub mod upload;

use axum::{Router, extract::DefaultBodyLimit, routing::get};

use crate::infrastructure::AppState;

/// Largest accepted request body, image included
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Contacts
        .route(
            "/contact",
            get(contact::list_contacts)
                .post(contact::create_contact)
                .put(contact::update_contact),
        )
        .route(
            "/contact/:id",
            get(contact::get_contact).delete(contact::delete_contact),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
