use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::prelude::*;

/// The caller, resolved from an `Authorization: Bearer` token.
#[derive(Debug, Clone)]
pub(crate) struct AuthUser {
    pub(crate) user_id: String,
}

fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .map(str::to_owned);
        let identity = state.identity.clone();

        async move {
            let token = token.ok_or(AppError::Unauthorized)?;
            match identity.user_for_token(&token).await {
                Ok(Some(user_id)) => Ok(Self { user_id }),
                Ok(None) => Err(AppError::Unauthorized),
                Err(err) => {
                    debug!("Identity lookup failed: {}", err);
                    Err(AppError::Unauthorized)
                }
            }
        }
    }
}
