//! Repository implementations using SeaORM

pub mod contact_repository;

pub use contact_repository::SeaOrmContactRepository;
