//! Core types and trait definitions for the Quill publishing platform.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! It defines the domain entities (posts, groups, comments, users, follow
//! edges), the [`store::BlogStore`] abstraction implemented by storage
//! backends, the feed pagination types, and the mutation handlers that
//! enforce validation and authorship rules on top of any store.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod comment;
pub mod error;
pub mod feed;
pub mod follow;
pub mod group;
pub mod mutation;
pub mod post;
pub mod store;
pub mod user;

pub use error::{Error, Result};
