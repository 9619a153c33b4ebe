//! Client for the contact API plus the form/list state a UI binds to

pub mod api_client;
pub mod contact_book;
pub mod error;

pub use api_client::{ApiClient, ContactForm, SelectedImage, StoredContact};
pub use contact_book::ContactBook;
pub use error::ClientError;
