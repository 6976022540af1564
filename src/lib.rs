//! AssetFlow asset lifecycle core
//!
//! Tracks organizational IT assets, their assignment to staff and their
//! return. The crate owns the concurrency-sensitive pieces: sequence-backed
//! code allocation under row locks, optimistic-version conflict detection,
//! and the asset / assignment / return-request state machines. The HTTP
//! surface, authentication and plain CRUD live in the surrounding
//! application.

pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
