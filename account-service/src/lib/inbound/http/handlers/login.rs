use axum::extract::State;
use axum::http::header;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::response::AppendHeaders;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::models::IssuedTokens;
use crate::account::models::LoginCommand;
use crate::account::models::Username;
use crate::account::ports::AuthServicePort;
use crate::account::ports::TokenStore;
use crate::account::ports::UserRepository;
use crate::inbound::http::router::AppState;

/// Cookie carrying the access token
pub const ACCESS_TOKEN_COOKIE: &str = "Authorization";
/// Cookie carrying the refresh token
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

pub async fn login<UR, TS>(
    State(state): State<AppState<UR, TS>>,
    Json(body): Json<LoginRequest>,
) -> Result<(AppendHeaders<[(HeaderName, String); 2]>, ApiSuccess<LoginResponseData>), ApiError>
where
    UR: UserRepository,
    TS: TokenStore,
{
    // A username that cannot even pass signup validation cannot exist;
    // report it exactly like any other failed credential
    let username = Username::new(body.username)
        .map_err(|_| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let (_, tokens) = state
        .auth_service
        .login(LoginCommand {
            username,
            password: body.password,
        })
        .await
        .map_err(ApiError::from)?;

    // Each cookie exactly once, max-age tracking the token's own TTL
    let cookies = AppendHeaders([
        (
            header::SET_COOKIE,
            token_cookie(ACCESS_TOKEN_COOKIE, &tokens.access_token, tokens.access_ttl.num_seconds()),
        ),
        (
            header::SET_COOKIE,
            token_cookie(REFRESH_TOKEN_COOKIE, &tokens.refresh_token, tokens.refresh_ttl.num_seconds()),
        ),
    ]);

    Ok((
        cookies,
        ApiSuccess::new(StatusCode::OK, LoginResponseData::from(&tokens)),
    ))
}

fn token_cookie(name: &str, token: &str, max_age_secs: i64) -> String {
    // Cookie values cannot contain spaces; encode the one in the scheme prefix
    let value = token.replace(' ', "%20");
    format!(
        "{}={}; HttpOnly; Secure; Path=/; SameSite=Strict; Max-Age={}",
        name, value, max_age_secs
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
}

impl From<&IssuedTokens> for LoginResponseData {
    fn from(tokens: &IssuedTokens) -> Self {
        Self {
            token: tokens.access_token.clone(),
        }
    }
}
