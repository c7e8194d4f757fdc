//! Follow graph — a directed, self-loop-free "user follows author" relation.
//!
//! The handlers here enforce the self-follow rule and username resolution;
//! idempotency under concurrent duplicate creation is the store's job (a
//! uniqueness constraint plus insert-or-ignore, never check-then-insert).

use uuid::Uuid;

use crate::{Result, store::BlogStore};

/// Ensure `user` follows `author`. A self-follow is a silent no-op; a
/// duplicate follow leaves the existing edge untouched. Returns `true`
/// only when a new edge was created.
pub async fn follow<S: BlogStore>(
  store: &S,
  user: Uuid,
  author: Uuid,
) -> Result<bool> {
  if user == author {
    return Ok(false);
  }
  store
    .insert_follow_edge(user, author)
    .await
    .map_err(Into::into)
}

/// Remove every edge from `user` to the author named `author_username`.
/// Redundant unfollows — including a username that resolves to nobody —
/// are no-ops, not errors. Returns how many edges were removed.
pub async fn unfollow<S: BlogStore>(
  store: &S,
  user: Uuid,
  author_username: &str,
) -> Result<u64> {
  let author = match store
    .get_user_by_username(author_username)
    .await
    .map_err(Into::into)?
  {
    Some(author) => author,
    None => return Ok(0),
  };
  store
    .delete_follow_edges(user, author.user_id)
    .await
    .map_err(Into::into)
}

/// Pure query: does `user` currently follow `author`?
pub async fn is_following<S: BlogStore>(
  store: &S,
  user: Uuid,
  author: Uuid,
) -> Result<bool> {
  store.is_following(user, author).await.map_err(Into::into)
}
