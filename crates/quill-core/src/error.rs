//! Error types for `quill-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("post not found: {0}")]
  PostNotFound(Uuid),

  #[error("group not found: {0}")]
  GroupNotFound(String),

  #[error("user not found: {0}")]
  UserNotFound(String),

  /// A required text field is empty or whitespace-only. The field name is
  /// surfaced so the presentation boundary can redisplay the input form
  /// with a field-level message.
  #[error("{field} must not be empty")]
  EmptyText { field: &'static str },

  /// The comment denylist policy rejected a word.
  #[error("comment contains a forbidden word: {0:?}")]
  ForbiddenWord(String),

  #[error("username already taken: {0:?}")]
  UsernameTaken(String),

  #[error("group slug already taken: {0:?}")]
  SlugTaken(String),

  /// A storage backend failure, boxed so this crate stays independent of
  /// any concrete backend's error type.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error in [`Error::Store`].
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
