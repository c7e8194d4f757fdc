//! Error type for `quill-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] quill_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

/// Domain failures pass through unchanged so callers above the
/// [`quill_core::store::BlogStore`] boundary see one error taxonomy;
/// backend failures are boxed into [`quill_core::Error::Store`].
impl From<Error> for quill_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(core) => core,
      other => quill_core::Error::store(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
