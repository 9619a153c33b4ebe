//! Domain layer - Pure business abstractions
//!
//! Trait definitions and domain error types. The only framework type that
//! leaks in is the SeaORM error, converted at the boundary.

pub mod errors;
pub mod repositories;

pub use errors::DomainError;
pub use repositories::*;
