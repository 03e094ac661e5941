// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Donor identification for the checkout endpoints.

use crate::HttpError;
use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

/// Header carrying the donor's user id.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Extractor for the donor a checkout request is made for.
///
/// The id is forwarded to the course service as `userId`.
///
/// # Errors
///
/// Returns HTTP 401 Unauthorized if the header is missing, empty, or not
/// valid ASCII.
pub struct DonorId(pub String);

impl<S> FromRequestParts<S> for DonorId
where
    S: Send + Sync,
{
    type Rejection = SessionError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value: &str = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| {
                debug!("Missing user id header");
                SessionError::MissingUserId
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid user id header encoding");
                SessionError::InvalidUserId
            })?;

        let user_id: &str = value.trim();
        if user_id.is_empty() {
            warn!("Empty user id header");
            return Err(SessionError::InvalidUserId);
        }

        Ok(Self(user_id.to_string()))
    }
}

/// Donor extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// The user id header is missing.
    MissingUserId,
    /// The user id header is empty or unreadable.
    InvalidUserId,
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message: &str = match self {
            Self::MissingUserId => "Missing X-User-Id header",
            Self::InvalidUserId => "Invalid X-User-Id header",
        };
        HttpError {
            status: StatusCode::UNAUTHORIZED,
            message: message.to_string(),
        }
        .into_response()
    }
}
