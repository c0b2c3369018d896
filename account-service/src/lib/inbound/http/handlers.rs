use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::account::errors::AuthError;

pub mod get_me;
pub mod login;
pub mod signup;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    ServiceUnavailable(String),
    UnprocessableEntity(String),
    Conflict(String),
    Unauthorized(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateUsername(_) => ApiError::Conflict(err.to_string()),
            AuthError::InvalidUsername(_)
            | AuthError::InvalidNickname(_)
            | AuthError::WeakPassword(_) => ApiError::UnprocessableEntity(err.to_string()),
            // Unknown username and wrong password are indistinguishable to
            // the client; internal detail stays in the logs
            AuthError::UnknownUser(_)
            | AuthError::WrongPassword(_)
            | AuthError::RevokedToken
            | AuthError::Token(_)
            | AuthError::InvalidUserId(_) => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            AuthError::StorageUnavailable(_) => {
                ApiError::ServiceUnavailable("Storage unavailable".to_string())
            }
            AuthError::Issuance(_) => {
                ApiError::InternalServerError("Token issuance failed".to_string())
            }
            AuthError::Password(_) | AuthError::DatabaseError(_) => {
                ApiError::InternalServerError("Internal error".to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::errors::UserIdError;

    #[test]
    fn test_credential_errors_collapse_to_one_message() {
        let unknown: ApiError = AuthError::UnknownUser("ghost".to_string()).into();
        let wrong: ApiError = AuthError::WrongPassword("user123".to_string()).into();

        // Username enumeration resistance: identical externally
        assert_eq!(unknown, wrong);
        assert_eq!(unknown, ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    #[test]
    fn test_server_side_errors_do_not_leak_detail() {
        let err: ApiError =
            AuthError::DatabaseError("connect to 10.0.0.5:5432 refused".to_string()).into();
        assert_eq!(err, ApiError::InternalServerError("Internal error".to_string()));

        let err: ApiError = AuthError::Issuance("redis timeout".to_string()).into();
        assert_eq!(err, ApiError::InternalServerError("Token issuance failed".to_string()));
    }

    #[test]
    fn test_unreachable_registry_maps_to_service_unavailable() {
        let err: ApiError =
            AuthError::StorageUnavailable("registry read timed out".to_string()).into();
        assert_eq!(
            err,
            ApiError::ServiceUnavailable("Storage unavailable".to_string())
        );
    }

    #[test]
    fn test_duplicate_username_maps_to_conflict() {
        let err: ApiError = AuthError::DuplicateUsername("user123".to_string()).into();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn test_token_sub_parse_failure_maps_to_unauthorized() {
        let err: ApiError =
            AuthError::InvalidUserId(UserIdError::InvalidFormat("bad".to_string())).into();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}
