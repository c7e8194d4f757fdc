//! Comment — a reply attached to a post.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reply to a post. Deleting the parent post deletes its comments;
/// deleting the author deletes their comments. `post_id` is nullable at
/// the storage layer to tolerate orphaned rows, though no code path here
/// produces one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id: Uuid,
  pub post_id:    Option<Uuid>,
  pub author_id:  Uuid,
  pub text:       String,
  pub created_at: DateTime<Utc>,
}
