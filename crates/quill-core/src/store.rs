//! The `BlogStore` trait — the storage abstraction everything builds on.
//!
//! The trait is implemented by storage backends (e.g. `quill-store-sqlite`).
//! Higher layers (the mutation handlers in this crate, `quill-api`) depend
//! on this abstraction, not on any concrete backend.
//!
//! Referential integrity is the backend's job: deleting a post cascades to
//! its comments, deleting a user cascades to their posts, comments, and
//! follow edges, and deleting a group clears (never deletes) its posts.

use std::future::Future;

use uuid::Uuid;

use crate::{
  comment::Comment,
  feed::{FeedScope, PageRequest, PostPage},
  group::{Group, NewGroup},
  post::{Post, PostDraft},
  user::User,
};

/// Abstraction over a Quill storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`). Read-by-id
/// misses are `Ok(None)`, not errors; the presentation boundary decides
/// how to render them.
pub trait BlogStore: Send + Sync {
  /// Backend error type. Must convert into [`crate::Error`] so domain
  /// failures (e.g. a taken username) survive the trait boundary intact.
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create a user with a unique username. Fails if the username is taken.
  fn add_user<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + 'a;

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn get_user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// All users, username ascending.
  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Delete a user and, by cascade, their posts, comments, and follow
  /// edges in both directions. Returns `false` if the user did not exist.
  fn delete_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Groups ────────────────────────────────────────────────────────────

  /// Create a group. Fails if the slug is taken.
  fn add_group(
    &self,
    input: NewGroup,
  ) -> impl Future<Output = Result<Group, Self::Error>> + Send + '_;

  fn get_group_by_slug<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<Option<Group>, Self::Error>> + Send + 'a;

  /// All groups, title ascending.
  fn list_groups(
    &self,
  ) -> impl Future<Output = Result<Vec<Group>, Self::Error>> + Send + '_;

  /// Delete a group, clearing the group reference of its posts. The posts
  /// themselves survive. Returns `false` if the group did not exist.
  fn delete_group(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Posts ─────────────────────────────────────────────────────────────

  /// Persist a new post owned by `author_id`. The id and creation
  /// timestamp are assigned by the store. Fails with
  /// [`Error::GroupNotFound`](crate::Error::GroupNotFound) if the draft
  /// names a nonexistent group.
  fn insert_post(
    &self,
    author_id: Uuid,
    draft: PostDraft,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  fn get_post(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// Replace a post's text, group, and image in place, preserving its
  /// author and creation timestamp. Returns the updated post, or `None`
  /// if the post does not exist. Authorship checks belong to the caller
  /// ([`crate::mutation::edit_post`]).
  fn update_post(
    &self,
    id: Uuid,
    draft: PostDraft,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// Delete a post and, by cascade, its comments. Returns `false` if the
  /// post did not exist.
  fn delete_post(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// One page of the feed selected by `scope`, newest first with the
  /// author's username as tie-break, plus the total count for pager UI.
  /// A page past the end is `Ok` and empty.
  fn list_posts(
    &self,
    scope: FeedScope,
    page: PageRequest,
  ) -> impl Future<Output = Result<PostPage, Self::Error>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  /// Append a comment to an existing post. The post's existence is the
  /// caller's precondition ([`crate::mutation::create_comment`]).
  fn insert_comment<'a>(
    &'a self,
    post_id: Uuid,
    author_id: Uuid,
    text: &'a str,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + 'a;

  /// All comments on a post, newest first.
  fn comments_for_post(
    &self,
    post_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + '_;

  // ── Follow edges ──────────────────────────────────────────────────────

  /// Idempotently ensure a (follower, author) edge exists. Must be an
  /// insert-or-ignore against a uniqueness constraint so concurrent calls
  /// converge to exactly one edge. Returns `true` if an edge was created.
  fn insert_follow_edge(
    &self,
    user_id: Uuid,
    author_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete all edges from `user_id` to `author_id`; returns how many
  /// were removed (0 is a valid outcome, not an error).
  fn delete_follow_edges(
    &self,
    user_id: Uuid,
    author_id: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  fn is_following(
    &self,
    user_id: Uuid,
    author_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// The authors `user_id` follows, username ascending.
  fn list_following(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;
}
