//! JSON API for Quill.
//!
//! Exposes an axum [`Router`] backed by any [`quill_core::store::BlogStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility; the
//! authenticated identity arrives as an opaque user id in a request header
//! (see [`identity`]).
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", quill_api::router(AppState::new(store, &config)))
//! ```

pub mod cache;
pub mod error;
pub mod feeds;
pub mod groups;
pub mod identity;
pub mod posts;
pub mod users;

use std::{sync::Arc, time::Duration};

use axum::{
  Router,
  routing::{get, post, put},
};
use quill_core::{feed, mutation::CommentPolicy, store::BlogStore};
use serde::Deserialize;

pub use error::ApiError;
use cache::TimelineCache;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Configuration consumed (not owned) by the API layer.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  /// Posts per feed page.
  pub page_size:       u32,
  /// TTL of the global-timeline page cache; zero disables it.
  pub feed_cache_ttl:  Duration,
  /// Comment denylist; empty disables the policy.
  pub forbidden_words: Vec<String>,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      page_size:       feed::DEFAULT_PAGE_SIZE,
      feed_cache_ttl:  Duration::from_secs(20),
      forbidden_words: Vec::new(),
    }
  }
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:          Arc<S>,
  pub policy:         Arc<CommentPolicy>,
  pub timeline_cache: Arc<TimelineCache>,
  pub page_size:      u32,
}

// Manual impl: `S` itself need not be `Clone`, only the `Arc`s are cloned.
impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:          Arc::clone(&self.store),
      policy:         Arc::clone(&self.policy),
      timeline_cache: Arc::clone(&self.timeline_cache),
      page_size:      self.page_size,
    }
  }
}

impl<S> AppState<S> {
  pub fn new(store: S, config: &ApiConfig) -> Self {
    Self {
      store:          Arc::new(store),
      policy:         Arc::new(CommentPolicy::new(
        config.forbidden_words.iter().cloned(),
      )),
      timeline_cache: Arc::new(TimelineCache::new(config.feed_cache_ttl)),
      page_size:      config.page_size,
    }
  }
}

// ─── Shared query params ─────────────────────────────────────────────────────

/// The `?page=` query parameter, accepted as a raw string so non-numeric
/// values fall back to page 1 instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
  pub page: Option<String>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn router<S>(state: AppState<S>) -> Router<()>
where
  S: BlogStore + 'static,
{
  Router::new()
    // Feeds
    .route("/feed", get(feeds::global::<S>))
    .route("/feed/following", get(feeds::following::<S>))
    // Groups
    .route("/groups", get(groups::list::<S>).post(groups::create::<S>))
    .route("/groups/{slug}/posts", get(groups::posts::<S>))
    // Users & the follow graph
    .route("/users", post(users::create::<S>))
    .route("/users/{username}/posts", get(users::posts::<S>))
    .route(
      "/users/{username}/follow",
      put(users::follow_author::<S>).delete(users::unfollow_author::<S>),
    )
    // Posts & comments
    .route("/posts", post(posts::create::<S>))
    .route(
      "/posts/{id}",
      get(posts::get_one::<S>)
        .put(posts::update::<S>)
        .delete(posts::delete::<S>),
    )
    .route("/posts/{id}/comments", post(posts::comment::<S>))
    .with_state(state)
}
