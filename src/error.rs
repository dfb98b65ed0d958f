use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Clone, Debug, Serialize, strum_macros::AsRefStr)]
#[serde(tag = "type", content = "data")]
pub enum Error {
    // -- Auth errors.
    AuthFailNoAuthToken,
    AuthFailTokenInvalid,
    AuthFailCronSecret,

    // -- Input errors.
    InvalidInput { reason: String },

    // -- Model errors.
    SongNotFound { id: String },
    CommentNotFound { id: String },
    UserNotFound { id: String },
    PermissionDenied { reason: String },

    // -- Infra errors.
    DbError(String),
    EnvVarError(String),
    IoError(String),
}

impl core::fmt::Display for Error {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::result::Result<(), core::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, client_error) = self.client_status_and_error();

        if status_code.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let response_body = serde_json::json!({
            "success": false,
            "error": client_error.as_ref(),
            "details": self.client_message(),
        });

        (status_code, Json(response_body)).into_response()
    }
}

impl Error {
    pub fn client_status_and_error(&self) -> (StatusCode, ClientError) {
        match self {
            Self::AuthFailNoAuthToken | Self::AuthFailTokenInvalid | Self::AuthFailCronSecret => {
                (StatusCode::UNAUTHORIZED, ClientError::NO_AUTH)
            }

            Self::InvalidInput { .. } => (StatusCode::BAD_REQUEST, ClientError::INVALID_PARAMS),

            Self::SongNotFound { .. } | Self::CommentNotFound { .. } | Self::UserNotFound { .. } => {
                (StatusCode::NOT_FOUND, ClientError::RESOURCE_NOT_FOUND)
            }

            Self::PermissionDenied { .. } => {
                (StatusCode::FORBIDDEN, ClientError::PERMISSION_DENIED)
            }

            Self::DbError(_) | Self::EnvVarError(_) | Self::IoError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ClientError::SERVICE_ERROR,
            ),
        }
    }

    /// Short human-readable reason. Infra details stay in the server logs.
    pub fn client_message(&self) -> String {
        match self {
            Self::AuthFailNoAuthToken => "Authentication required".to_string(),
            Self::AuthFailTokenInvalid => "Invalid or expired identity token".to_string(),
            Self::AuthFailCronSecret => "Invalid scheduler credentials".to_string(),
            Self::InvalidInput { reason } => reason.clone(),
            Self::SongNotFound { id } => format!("Song '{id}' not found"),
            Self::CommentNotFound { id } => format!("Comment '{id}' not found"),
            Self::UserNotFound { id } => format!("User '{id}' not found"),
            Self::PermissionDenied { reason } => reason.clone(),
            Self::DbError(_) | Self::EnvVarError(_) | Self::IoError(_) => {
                "Something went wrong, please try again".to_string()
            }
        }
    }
}

#[derive(Debug, strum_macros::AsRefStr)]
#[allow(non_camel_case_types)]
pub enum ClientError {
    NO_AUTH,
    INVALID_PARAMS,
    PERMISSION_DENIED,
    RESOURCE_NOT_FOUND,
    SERVICE_ERROR,
}

impl From<surrealdb::Error> for Error {
    fn from(err: surrealdb::Error) -> Self {
        Error::DbError(err.to_string())
    }
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Error::EnvVarError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        Error::AuthFailTokenInvalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let (status, client) = Error::InvalidInput {
            reason: "empty".to_string(),
        }
        .client_status_and_error();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(client.as_ref(), "INVALID_PARAMS");

        let (status, _) = Error::CommentNotFound {
            id: "c1".to_string(),
        }
        .client_status_and_error();
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, client) = Error::PermissionDenied {
            reason: "nope".to_string(),
        }
        .client_status_and_error();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(client.as_ref(), "PERMISSION_DENIED");

        let (status, _) = Error::AuthFailNoAuthToken.client_status_and_error();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_db_error_details_are_hidden() {
        let err = Error::DbError("connection reset by peer at 10.0.0.3".to_string());
        let (status, client) = err.client_status_and_error();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(client.as_ref(), "SERVICE_ERROR");
        assert!(!err.client_message().contains("10.0.0.3"));
    }
}
