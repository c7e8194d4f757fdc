//! Mutation handlers — validated, authorised writes for posts and comments.
//!
//! Each handler takes the acting user's id explicitly; there is no ambient
//! "current user". Callers are responsible for authentication — by the time
//! a handler runs, the id refers to a real, signed-in user.
//!
//! Authorship violations on edit and delete are handled fail-soft: the
//! mutation is discarded and the unchanged post is returned, so the
//! presentation boundary can answer with the read view instead of an error
//! page.

use uuid::Uuid;

use crate::{
  Error, Result,
  comment::Comment,
  post::{Post, PostDraft},
  store::BlogStore,
};

// ─── Comment policy ──────────────────────────────────────────────────────────

/// Optional denylist applied to comment text. Matching is case-insensitive
/// over whitespace-separated tokens. An empty list disables the policy.
#[derive(Debug, Clone, Default)]
pub struct CommentPolicy {
  forbidden: Vec<String>,
}

impl CommentPolicy {
  pub fn new(words: impl IntoIterator<Item = String>) -> Self {
    Self {
      forbidden: words.into_iter().map(|w| w.to_lowercase()).collect(),
    }
  }

  /// No forbidden words; every comment passes.
  pub fn disabled() -> Self { Self::default() }

  /// The first forbidden word found in `text`, if any.
  fn violation(&self, text: &str) -> Option<&str> {
    if self.forbidden.is_empty() {
      return None;
    }
    text
      .split_whitespace()
      .map(str::to_lowercase)
      .find_map(|token| {
        self
          .forbidden
          .iter()
          .find(|w| **w == token)
          .map(String::as_str)
      })
  }
}

// ─── Post mutations ──────────────────────────────────────────────────────────

/// The result of an edit or delete attempt.
#[derive(Debug, Clone)]
pub enum EditOutcome {
  /// The acting user is the author; the mutation was applied.
  Updated(Post),
  /// The acting user is not the author; nothing changed. Carries the
  /// untouched post so the caller can render its read view.
  NotAuthor(Post),
}

impl EditOutcome {
  pub fn post(&self) -> &Post {
    match self {
      Self::Updated(p) | Self::NotAuthor(p) => p,
    }
  }
}

/// Create a post owned by `author`. Fails if the text is empty or
/// whitespace-only.
pub async fn create_post<S: BlogStore>(
  store: &S,
  author: Uuid,
  draft: PostDraft,
) -> Result<Post> {
  if draft.text.trim().is_empty() {
    return Err(Error::EmptyText { field: "text" });
  }
  store.insert_post(author, draft).await.map_err(Into::into)
}

/// Edit a post's text, group, and image, preserving its author and
/// creation timestamp. Fails with `PostNotFound` if the post is absent;
/// if `user` is not the author the edit is silently discarded.
pub async fn edit_post<S: BlogStore>(
  store: &S,
  user: Uuid,
  post_id: Uuid,
  draft: PostDraft,
) -> Result<EditOutcome> {
  let post = store
    .get_post(post_id)
    .await
    .map_err(Into::into)?
    .ok_or(Error::PostNotFound(post_id))?;

  if post.author_id != user {
    return Ok(EditOutcome::NotAuthor(post));
  }
  if draft.text.trim().is_empty() {
    return Err(Error::EmptyText { field: "text" });
  }

  let updated = store
    .update_post(post_id, draft)
    .await
    .map_err(Into::into)?
    .ok_or(Error::PostNotFound(post_id))?;
  Ok(EditOutcome::Updated(updated))
}

/// Delete a post, cascading to its comments. Same fail-soft authorship
/// rule as [`edit_post`].
pub async fn delete_post<S: BlogStore>(
  store: &S,
  user: Uuid,
  post_id: Uuid,
) -> Result<EditOutcome> {
  let post = store
    .get_post(post_id)
    .await
    .map_err(Into::into)?
    .ok_or(Error::PostNotFound(post_id))?;

  if post.author_id != user {
    return Ok(EditOutcome::NotAuthor(post));
  }

  store.delete_post(post_id).await.map_err(Into::into)?;
  Ok(EditOutcome::Updated(post))
}

// ─── Comment mutations ───────────────────────────────────────────────────────

/// Append a comment to an existing post. Fails with `PostNotFound` if the
/// post is absent, `EmptyText` on blank text, and `ForbiddenWord` when the
/// policy rejects; a rejected comment is never persisted.
pub async fn create_comment<S: BlogStore>(
  store: &S,
  author: Uuid,
  post_id: Uuid,
  text: &str,
  policy: &CommentPolicy,
) -> Result<Comment> {
  if text.trim().is_empty() {
    return Err(Error::EmptyText { field: "text" });
  }
  if let Some(word) = policy.violation(text) {
    return Err(Error::ForbiddenWord(word.to_owned()));
  }

  store
    .get_post(post_id)
    .await
    .map_err(Into::into)?
    .ok_or(Error::PostNotFound(post_id))?;

  store
    .insert_comment(post_id, author, text)
    .await
    .map_err(Into::into)
}
