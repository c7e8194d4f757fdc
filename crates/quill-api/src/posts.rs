//! Handlers for `/posts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/posts` | 422 on empty text; 201 + post |
//! | `GET`    | `/posts/{id}` | Post + its comments, newest first |
//! | `PUT`    | `/posts/{id}` | Fail-soft: a non-author gets 200 + the unchanged post |
//! | `DELETE` | `/posts/{id}` | Same fail-soft rule; 204 on success |
//! | `POST`   | `/posts/{id}/comments` | Requires identity; policy-filtered |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use quill_core::{
  comment::Comment,
  mutation::{self, EditOutcome},
  post::{Post, PostDraft},
  store::BlogStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError, identity::CurrentUser};

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /posts` — body: `{"text":..., "group_id":..., "image":...}`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Json(draft): Json<PostDraft>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BlogStore,
{
  let post = mutation::create_post(&*state.store, user.user_id, draft).await?;
  Ok((StatusCode::CREATED, Json(post)))
}

// ─── Read ────────────────────────────────────────────────────────────────────

/// A post's read view: the post plus its comments.
#[derive(Debug, Serialize)]
pub struct PostDetail {
  pub post:     Post,
  pub comments: Vec<Comment>,
}

/// `GET /posts/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<PostDetail>, ApiError>
where
  S: BlogStore,
{
  let post = state
    .store
    .get_post(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(quill_core::Error::PostNotFound(id))?;
  let comments = state
    .store
    .comments_for_post(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(PostDetail { post, comments }))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /posts/{id}`
///
/// When the caller is not the author the attempt is silently discarded and
/// the response is the post's unchanged read view — the JSON equivalent of
/// redirecting an unauthorised editor back to the detail page.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
  Json(draft): Json<PostDraft>,
) -> Result<Json<Post>, ApiError>
where
  S: BlogStore,
{
  let outcome =
    mutation::edit_post(&*state.store, user.user_id, id, draft).await?;
  Ok(Json(outcome.post().clone()))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /posts/{id}` — 204 when deleted; a non-author gets the
/// unchanged post back instead.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Response, ApiError>
where
  S: BlogStore,
{
  let outcome = mutation::delete_post(&*state.store, user.user_id, id).await?;
  Ok(match outcome {
    EditOutcome::Updated(_) => StatusCode::NO_CONTENT.into_response(),
    EditOutcome::NotAuthor(post) => Json(post).into_response(),
  })
}

// ─── Comments ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CommentBody {
  pub text: String,
}

/// `POST /posts/{id}/comments` — body: `{"text":"..."}`
pub async fn comment<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<CommentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BlogStore,
{
  let comment = mutation::create_comment(
    &*state.store,
    user.user_id,
    id,
    &body.text,
    &state.policy,
  )
  .await?;
  Ok((StatusCode::CREATED, Json(comment)))
}
