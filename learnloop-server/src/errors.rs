use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use learnloop_market::{AuthError, DatabaseError, ProfileError, QuizError, SessionError};

pub type ServerResult<T> = Result<T, ServerError>;

/// Every failure a handler can surface. Nothing propagates past a handler:
/// each variant maps to an HTTP status and a JSON message body.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{resource}:{identifier} not found")]
    NotFound {
        resource: &'static str,
        identifier: &'static str,
    },
    #[error("{resource} with {field} of value {value} already exists")]
    Conflict {
        resource: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    InvalidRole(String),
    #[error("{0}")]
    InvalidTransition(String),
    #[error("The meeting has not been started yet")]
    NotStarted,
    #[error("{0}")]
    InvalidInput(String),
    #[error("Unknown internal error: {0}")]
    Unknown(String),
}

impl ServerError {
    fn as_status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::InvalidCredentials
            | Self::InvalidRole(_)
            | Self::InvalidTransition(_)
            | Self::NotStarted
            | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "message": self.to_string() }));

        (self.as_status_code(), body).into_response()
    }
}

impl From<DatabaseError> for ServerError {
    fn from(value: DatabaseError) -> Self {
        match value {
            DatabaseError::NotFound {
                resource,
                identifier,
            } => Self::NotFound {
                resource,
                identifier,
            },
            DatabaseError::Conflict {
                resource,
                field,
                value,
            } => Self::Conflict {
                resource,
                field,
                value,
            },
            e => Self::Unknown(e.to_string()),
        }
    }
}

impl From<AuthError> for ServerError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::Db(e) => e.into(),
            e => Self::Unknown(e.to_string()),
        }
    }
}

impl From<ProfileError> for ServerError {
    fn from(value: ProfileError) -> Self {
        match value {
            ProfileError::InvalidRole { .. } => Self::InvalidRole(value.to_string()),
            ProfileError::Db(e) => e.into(),
        }
    }
}

impl From<SessionError> for ServerError {
    fn from(value: SessionError) -> Self {
        match value {
            SessionError::InvalidTransition(_) => Self::InvalidTransition(value.to_string()),
            SessionError::NotStarted => Self::NotStarted,
            SessionError::Db(e) => e.into(),
        }
    }
}

impl From<QuizError> for ServerError {
    fn from(value: QuizError) -> Self {
        match value {
            QuizError::InvalidQuestion(_) => Self::InvalidInput(value.to_string()),
            QuizError::UnknownSubject(_) => Self::NotFound {
                resource: "questions",
                identifier: "subject",
            },
            QuizError::Db(e) => e.into(),
        }
    }
}
