//! SQLite backend for the Quill blog store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Referential integrity (the
//! cascade and nullify-on-delete rules) lives entirely in the schema's
//! foreign-key actions.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
