//! Handlers for `/groups` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/groups` | All groups, title ascending |
//! | `POST` | `/groups` | Administrative creation; requires identity |
//! | `GET`  | `/groups/{slug}/posts` | 404 on unknown slug |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use quill_core::{
  feed::{FeedScope, PageRequest, PostPage},
  group::{Group, NewGroup},
  store::BlogStore,
};
use serde::Serialize;

use crate::{AppState, PageParams, error::ApiError, identity::CurrentUser};

/// `GET /groups`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Group>>, ApiError>
where
  S: BlogStore,
{
  let groups = state
    .store
    .list_groups()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(groups))
}

/// `POST /groups` — body: `{"title":..., "slug":..., "description":...}`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentUser(_user): CurrentUser,
  Json(body): Json<NewGroup>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BlogStore,
{
  body.validate()?;
  let group = state
    .store
    .add_group(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(group)))
}

/// A group page: the group itself plus one page of its posts.
#[derive(Debug, Serialize)]
pub struct GroupFeed {
  pub group: Group,
  pub page:  PostPage,
}

/// `GET /groups/{slug}/posts[?page=N]`
pub async fn posts<S>(
  State(state): State<AppState<S>>,
  Path(slug): Path<String>,
  Query(params): Query<PageParams>,
) -> Result<Json<GroupFeed>, ApiError>
where
  S: BlogStore,
{
  let group = state
    .store
    .get_group_by_slug(&slug)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(quill_core::Error::GroupNotFound(slug))?;

  let request = PageRequest::from_param(params.page.as_deref(), state.page_size);
  let page = state
    .store
    .list_posts(FeedScope::Group(group.group_id), request)
    .await
    .map_err(ApiError::from_store)?;

  Ok(Json(GroupFeed { group, page }))
}
