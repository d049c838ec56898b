// ABOUTME: Authorization guard resolving the calling lawyer from the session cookie
// ABOUTME: Any handler taking `CurrentUser` rejects unauthenticated requests before doing work

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::{AppState, error::AppError, session};

/// Attribution used when the caller has no display name.
pub const FALLBACK_DISPLAY_NAME: &str = "User";

#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl CurrentUser {
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            FALLBACK_DISPLAY_NAME
        } else {
            &self.name
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let session_data = session::extract_session_from_jar(&jar, &state.sessions)?;

        Ok(CurrentUser {
            id: session_data.user_id,
            name: session_data.name,
            email: session_data.email,
        })
    }
}
