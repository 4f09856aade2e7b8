//! Users module
//!
//! User records and a repository that lists them by cursor or by page.
//!
//! # Overview
//!
//! - `User` - typed user row (decoded from any JSON-yielding data source)
//! - `UserRepository` - lookups, counts, offset and cursor listings
//!
//! Soft-deleted users (`deleted_at` set) never appear in listings or counts.

mod repository;
mod types;

pub use repository::UserRepository;
pub use types::{Role, User};
