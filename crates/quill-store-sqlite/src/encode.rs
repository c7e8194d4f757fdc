//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use quill_core::{comment::Comment, group::Group, post::Post, user::User};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub username:   String,
  pub created_at: String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    decode_uuid(&self.user_id)?,
      username:   self.username,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `groups` row.
pub struct RawGroup {
  pub group_id:    String,
  pub title:       String,
  pub slug:        String,
  pub description: String,
}

impl RawGroup {
  pub fn into_group(self) -> Result<Group> {
    Ok(Group {
      group_id:    decode_uuid(&self.group_id)?,
      title:       self.title,
      slug:        self.slug,
      description: self.description,
    })
  }
}

/// Raw strings read directly from a `posts` row.
pub struct RawPost {
  pub post_id:    String,
  pub author_id:  String,
  pub group_id:   Option<String>,
  pub text:       String,
  pub image:      Option<String>,
  pub created_at: String,
}

impl RawPost {
  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      post_id:    decode_uuid(&self.post_id)?,
      author_id:  decode_uuid(&self.author_id)?,
      group_id:   self.group_id.as_deref().map(decode_uuid).transpose()?,
      text:       self.text,
      image:      self.image,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `comments` row.
pub struct RawComment {
  pub comment_id: String,
  pub post_id:    Option<String>,
  pub author_id:  String,
  pub text:       String,
  pub created_at: String,
}

impl RawComment {
  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      comment_id: decode_uuid(&self.comment_id)?,
      post_id:    self.post_id.as_deref().map(decode_uuid).transpose()?,
      author_id:  decode_uuid(&self.author_id)?,
      text:       self.text,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
