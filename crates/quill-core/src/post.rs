//! Post — a single authored piece of content, optionally grouped.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of characters shown in a post's short display form.
pub const SHORT_TEXT_LEN: usize = 15;

/// An authored post. The author is set at creation and never changes;
/// `group_id` is cleared (not cascaded) when the owning group is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
  pub post_id:    Uuid,
  pub author_id:  Uuid,
  /// `None` for ungrouped posts.
  pub group_id:   Option<Uuid>,
  pub text:       String,
  /// Path reference to an uploaded image; no binary data lives in the
  /// database.
  pub image:      Option<String>,
  /// Server-assigned; preserved across edits.
  pub created_at: DateTime<Utc>,
}

impl Post {
  /// The short display form: the first [`SHORT_TEXT_LEN`] characters of the
  /// text. Respects character boundaries, so multi-byte text never panics.
  pub fn short_text(&self) -> &str {
    match self.text.char_indices().nth(SHORT_TEXT_LEN) {
      Some((idx, _)) => &self.text[..idx],
      None => &self.text,
    }
  }
}

impl fmt::Display for Post {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.short_text())
  }
}

/// The caller-supplied fields of a post; everything else (id, author,
/// timestamp) is assigned by the store. Used both for creation and edits —
/// an edit replaces exactly these three fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDraft {
  pub text:     String,
  #[serde(default)]
  pub group_id: Option<Uuid>,
  #[serde(default)]
  pub image:    Option<String>,
}

impl PostDraft {
  pub fn new(text: impl Into<String>) -> Self {
    Self {
      text:     text.into(),
      group_id: None,
      image:    None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn post(text: &str) -> Post {
    Post {
      post_id:    Uuid::new_v4(),
      author_id:  Uuid::new_v4(),
      group_id:   None,
      text:       text.to_owned(),
      image:      None,
      created_at: Utc::now(),
    }
  }

  #[test]
  fn short_text_truncates_long_posts() {
    let p = post("a very long post body that keeps going");
    assert_eq!(p.to_string(), "a very long pos");
    assert_eq!(p.to_string().chars().count(), SHORT_TEXT_LEN);
  }

  #[test]
  fn short_text_is_identity_for_short_posts() {
    let p = post("short");
    assert_eq!(p.to_string(), "short");
  }

  #[test]
  fn short_text_respects_char_boundaries() {
    let p = post("привет, это длинный пост");
    assert_eq!(p.to_string(), "привет, это дли");
  }
}
