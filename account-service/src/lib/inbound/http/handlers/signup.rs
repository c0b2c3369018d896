use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::NicknameError;
use crate::account::errors::PasswordPolicyError;
use crate::account::errors::UsernameError;
use crate::account::models::Nickname;
use crate::account::models::Password;
use crate::account::models::SignupCommand;
use crate::account::models::User;
use crate::account::models::Username;
use crate::account::ports::AuthServicePort;
use crate::account::ports::TokenStore;
use crate::account::ports::UserRepository;
use crate::inbound::http::router::AppState;

pub async fn signup<UR, TS>(
    State(state): State<AppState<UR, TS>>,
    Json(body): Json<SignupRequest>,
) -> Result<ApiSuccess<SignupResponseData>, ApiError>
where
    UR: UserRepository,
    TS: TokenStore,
{
    state
        .auth_service
        .signup(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for signup (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignupRequest {
    username: String,
    password: String,
    nickname: String,
}

#[derive(Debug, Clone, Error)]
enum ParseSignupRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid nickname: {0}")]
    Nickname(#[from] NicknameError),

    #[error("Weak password: {0}")]
    Password(#[from] PasswordPolicyError),
}

impl SignupRequest {
    fn try_into_command(self) -> Result<SignupCommand, ParseSignupRequestError> {
        let username = Username::new(self.username)?;
        let nickname = Nickname::new(self.nickname)?;
        let password = Password::new(self.password)?;
        Ok(SignupCommand::new(username, nickname, password))
    }
}

impl From<ParseSignupRequestError> for ApiError {
    fn from(err: ParseSignupRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

/// Signup response: the new profile, never the password or its hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupResponseData {
    pub username: String,
    pub nickname: String,
    pub authorities: Vec<String>,
}

impl From<&User> for SignupResponseData {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.as_str().to_string(),
            nickname: user.nickname.as_str().to_string(),
            authorities: vec![user.role.as_str().to_string()],
        }
    }
}
