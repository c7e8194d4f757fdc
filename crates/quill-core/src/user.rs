//! User — the author/reader identity referenced by every other entity.
//!
//! Authentication itself lives outside this crate; callers pass an already
//! authenticated user id into every mutation. This type exists so profile
//! feeds can be resolved from a username and so the store can enforce
//! cascade rules on user deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:    Uuid,
  /// Globally unique handle used in profile URLs and unfollow-by-name.
  pub username:   String,
  pub created_at: DateTime<Utc>,
}
