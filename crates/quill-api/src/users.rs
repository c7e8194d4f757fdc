//! Handlers for `/users` endpoints — profiles and the follow graph.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/users` | Bootstrap/registration; gated by the fronting auth layer |
//! | `GET`    | `/users/{username}/posts` | Profile feed; `following` flag when a viewer is present |
//! | `PUT`    | `/users/{username}/follow` | Idempotent; self-follow is a no-op |
//! | `DELETE` | `/users/{username}/follow` | Idempotent, including unknown usernames |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use quill_core::{
  Error as CoreError,
  feed::{FeedScope, PageRequest, PostPage},
  follow,
  store::BlogStore,
  user::User,
};
use serde::{Deserialize, Serialize};

use crate::{
  AppState, PageParams,
  error::ApiError,
  identity::{CurrentUser, MaybeUser},
};

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub username: String,
}

/// `POST /users` — body: `{"username":"alice"}`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BlogStore,
{
  if body.username.trim().is_empty() {
    return Err(CoreError::EmptyText { field: "username" }.into());
  }
  let user = state
    .store
    .add_user(body.username.trim())
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Profile feed ────────────────────────────────────────────────────────────

/// A profile page: the author, one page of their posts, and — when the
/// request carries a viewer identity — whether that viewer follows them.
#[derive(Debug, Serialize)]
pub struct ProfileFeed {
  pub author:    User,
  pub following: Option<bool>,
  pub page:      PostPage,
}

/// `GET /users/{username}/posts[?page=N]`
pub async fn posts<S>(
  State(state): State<AppState<S>>,
  Path(username): Path<String>,
  MaybeUser(viewer): MaybeUser,
  Query(params): Query<PageParams>,
) -> Result<Json<ProfileFeed>, ApiError>
where
  S: BlogStore,
{
  let author = state
    .store
    .get_user_by_username(&username)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(CoreError::UserNotFound(username))?;

  let request = PageRequest::from_param(params.page.as_deref(), state.page_size);
  let page = state
    .store
    .list_posts(FeedScope::Author(author.user_id), request)
    .await
    .map_err(ApiError::from_store)?;

  let following = match &viewer {
    Some(viewer) => Some(
      follow::is_following(&*state.store, viewer.user_id, author.user_id)
        .await?,
    ),
    None => None,
  };

  Ok(Json(ProfileFeed {
    author,
    following,
    page,
  }))
}

// ─── Follow / unfollow ───────────────────────────────────────────────────────

/// `PUT /users/{username}/follow`
pub async fn follow_author<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(username): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: BlogStore,
{
  let author = state
    .store
    .get_user_by_username(&username)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(CoreError::UserNotFound(username))?;

  follow::follow(&*state.store, user.user_id, author.user_id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /users/{username}/follow` — a no-op (still 204) when no edge
/// exists or the username is unknown.
pub async fn unfollow_author<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(username): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: BlogStore,
{
  follow::unfollow(&*state.store, user.user_id, &username).await?;
  Ok(StatusCode::NO_CONTENT)
}
