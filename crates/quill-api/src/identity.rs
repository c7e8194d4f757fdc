//! Request identity extractors.
//!
//! Authentication is an external collaborator's job: a fronting proxy (or
//! the server binary's session layer) verifies the caller and asserts the
//! authenticated user id in the `x-quill-user` header. The extractors here
//! only resolve that opaque id to a stored [`User`] — [`CurrentUser`]
//! rejects with 401 when it can't, [`MaybeUser`] degrades to `None` so
//! public pages can still personalise when a viewer is present.

use axum::http::request::Parts;
use quill_core::{store::BlogStore, user::User};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Header carrying the authenticated user id.
pub const USER_HEADER: &str = "x-quill-user";

/// A verified, present identity. Extraction fails with 401 if the header
/// is missing, malformed, or names an unknown user.
pub struct CurrentUser(pub User);

/// An optional identity for routes that serve anonymous readers too.
pub struct MaybeUser(pub Option<User>);

async fn resolve<S: BlogStore>(
  parts: &Parts,
  state: &AppState<S>,
) -> Result<Option<User>, ApiError> {
  let Some(raw) = parts.headers.get(USER_HEADER) else {
    return Ok(None);
  };
  let Some(id) = raw.to_str().ok().and_then(|s| Uuid::parse_str(s).ok())
  else {
    return Ok(None);
  };
  state
    .store
    .get_user(id)
    .await
    .map_err(ApiError::from_store)
}

impl<S> axum::extract::FromRequestParts<AppState<S>> for CurrentUser
where
  S: BlogStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    match resolve(parts, state).await? {
      Some(user) => Ok(Self(user)),
      None => Err(ApiError::Unauthorized),
    }
  }
}

impl<S> axum::extract::FromRequestParts<AppState<S>> for MaybeUser
where
  S: BlogStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    Ok(Self(resolve(parts, state).await?))
  }
}
