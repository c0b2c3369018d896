use auth::TokenKind;
use auth::UserRole;
use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use chrono::Utc;

use super::handlers::ApiError;
use crate::account::models::UserId;
use crate::account::ports::AuthServicePort;
use crate::account::ports::TokenStore;
use crate::account::ports::UserRepository;
use crate::inbound::http::router::AppState;

/// Authenticated caller identity, inserted into request extensions after
/// the token clears both integrity and registry checks.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
    pub nickname: String,
    pub role: UserRole,
}

/// Middleware gating protected routes on a presented access token.
///
/// Delegates to the domain service, which requires the token to be
/// signature-valid, unexpired, and byte-equal to the registry's current
/// entry for its subject.
pub async fn authenticate<UR, TS>(
    State(state): State<AppState<UR, TS>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response>
where
    UR: UserRepository,
    TS: TokenStore,
{
    let raw = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;

    let claims = state
        .auth_service
        .authorize(raw, TokenKind::Access, Utc::now())
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Access token rejected");
            ApiError::from(e).into_response()
        })?;

    let user_id = UserId::from_string(&claims.sub)
        .map_err(|_| unauthorized("Invalid token subject"))?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id,
        username: claims.username,
        nickname: claims.nickname,
        role: claims.user_role,
    });

    Ok(next.run(req).await)
}

fn unauthorized(message: &str) -> Response {
    ApiError::Unauthorized(message.to_string()).into_response()
}
