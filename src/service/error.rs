use axum::http::StatusCode;
use thiserror::Error;

use crate::error::{ErrorMessage, HttpError};

#[derive(Error, Debug, PartialEq)]
pub enum ServiceError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email {0} is already in use")]
    EmailInUse(String),

    #[error("User must be logged in to perform this action")]
    NotAuthenticated,

    #[error("Ticket with ID {0} not found")]
    TicketNotFound(String),

    #[error("Solution with ID {0} not found")]
    SolutionNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Session storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::TicketNotFound(_)
            | ServiceError::SolutionNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::InvalidCredentials
            | ServiceError::EmailInUse(_)
            | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,

            ServiceError::NotAuthenticated => StatusCode::UNAUTHORIZED,

            ServiceError::PermissionDenied(_) => StatusCode::FORBIDDEN,

            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        let message = match &error {
            ServiceError::InvalidCredentials => ErrorMessage::WrongCredentials.to_string(),
            ServiceError::EmailInUse(_) => ErrorMessage::EmailExist.to_string(),
            ServiceError::NotAuthenticated => ErrorMessage::UserNotAuthenticated.to_string(),
            ServiceError::Storage(detail) => {
                tracing::error!("Session storage failure: {}", detail);
                return HttpError::server_error(ErrorMessage::ServerError.to_string());
            }
            _ => error.to_string(),
        };

        HttpError::new(message, error.status_code())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::Storage(err.to_string())
    }
}
