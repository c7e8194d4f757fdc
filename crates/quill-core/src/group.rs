//! Group — a named topical category posts may belong to.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
  pub group_id:    Uuid,
  pub title:       String,
  /// URL-safe identifier; globally unique.
  pub slug:        String,
  pub description: String,
}

/// Input to [`crate::store::BlogStore::add_group`]. Groups are created
/// administratively; there is no per-user ownership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGroup {
  pub title:       String,
  pub slug:        String,
  #[serde(default)]
  pub description: String,
}

impl NewGroup {
  /// Field-level validation applied before the store is touched.
  pub fn validate(&self) -> Result<()> {
    if self.title.trim().is_empty() {
      return Err(Error::EmptyText { field: "title" });
    }
    if self.slug.trim().is_empty() {
      return Err(Error::EmptyText { field: "slug" });
    }
    Ok(())
  }
}
