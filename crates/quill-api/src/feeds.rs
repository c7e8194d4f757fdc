//! Handlers for the timeline feeds.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/feed` | Global timeline; served through the TTL cache |
//! | `GET`  | `/feed/following` | Personalized feed; requires identity |

use axum::{
  Json,
  extract::{Query, State},
};
use quill_core::{
  feed::{FeedScope, PageRequest, PostPage},
  store::BlogStore,
};

use crate::{AppState, PageParams, error::ApiError, identity::CurrentUser};

/// `GET /feed[?page=N]`
///
/// Cached per page for the configured TTL; a stale page is refreshed on
/// the first read after expiry.
pub async fn global<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<PageParams>,
) -> Result<Json<PostPage>, ApiError>
where
  S: BlogStore,
{
  let request = PageRequest::from_param(params.page.as_deref(), state.page_size);

  if let Some(cached) = state.timeline_cache.get(request.page).await {
    return Ok(Json(cached));
  }

  let page = state
    .store
    .list_posts(FeedScope::Global, request)
    .await
    .map_err(ApiError::from_store)?;

  state.timeline_cache.put(request.page, page.clone()).await;
  Ok(Json(page))
}

/// `GET /feed/following[?page=N]` — posts by every author the caller
/// follows. Following nobody yields an empty page.
pub async fn following<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Query(params): Query<PageParams>,
) -> Result<Json<PostPage>, ApiError>
where
  S: BlogStore,
{
  let request = PageRequest::from_param(params.page.as_deref(), state.page_size);
  let page = state
    .store
    .list_posts(FeedScope::FollowedBy(user.user_id), request)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(page))
}
