use std::fmt::{Debug, Display};
use std::io::Error as IoError;

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derivative::Derivative;
use mongodb::error::{Error as DatabaseError, ErrorKind, WriteFailure};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::campaign::CampaignId;

/// A single field-level validation failure. `field` is the external
/// (camelCase) name, or `_schema` for cross-field and whole-body rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> FieldError {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Derivative)]
#[derivative(PartialEq, Eq)]
pub enum Error {
    // 400
    InvalidJson(#[derivative(PartialEq = "ignore")] JsonPayloadError),
    InvalidPath(#[derivative(PartialEq = "ignore")] PathError),
    InvalidQuery(#[derivative(PartialEq = "ignore")] QueryPayloadError),
    Validation {
        errors: Vec<FieldError>,
    },
    ConstraintViolation {
        message: String,
    },

    // 404
    PathNotFound,
    CampaignNotFound {
        campaign_id: CampaignId,
    },

    // 405
    MethodNotAllowed,

    // 500
    ExistentialState(String),
    FailedDatabaseCall(#[derivative(PartialEq = "ignore")] DatabaseError),
    IoError(#[derivative(PartialEq = "ignore")] IoError),
}

impl Error {
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "bad_request",
            Error::InvalidPath(_) => "bad_request",
            Error::InvalidQuery(_) => "bad_request",
            Error::Validation { .. } => "validation_error",
            Error::ConstraintViolation { .. } => "validation_error",
            Error::PathNotFound => "not_found",
            Error::CampaignNotFound { .. } => "not_found",
            Error::MethodNotAllowed => "method_not_allowed",
            Error::ExistentialState(_) => "server_error",
            Error::FailedDatabaseCall(_) => "server_error",
            Error::IoError(_) => "server_error",
        }
    }

    pub fn error_message(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "Request body must be valid JSON",
            Error::InvalidPath(_) => "The given path could not be parsed",
            Error::InvalidQuery(_) => "The given query string could not be parsed",
            Error::Validation { .. } => "Validation failed",
            Error::ConstraintViolation { .. } => "Database constraint violation",
            Error::PathNotFound => "The requested path was not found",
            Error::CampaignNotFound { .. } => "Campaign not found",
            Error::MethodNotAllowed => "Method not allowed",
            // 500s share one generic message; detail stays in the server log.
            Error::ExistentialState(_) => "An internal server error occurred",
            Error::FailedDatabaseCall(_) => "An internal server error occurred",
            Error::IoError(_) => "An internal server error occurred",
        }
    }

    fn details(&self) -> Option<Vec<FieldError>> {
        match self {
            Error::Validation { errors } => Some(errors.clone()),
            Error::ConstraintViolation { message } => {
                Some(vec![FieldError::new("_schema", message.clone())])
            }
            _ => None,
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Error::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::ConstraintViolation { .. } => StatusCode::BAD_REQUEST,
            Error::PathNotFound => StatusCode::NOT_FOUND,
            Error::CampaignNotFound { .. } => StatusCode::NOT_FOUND,
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Error::ExistentialState(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedDatabaseCall(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        #[derive(Serialize)]
        struct ErrorBody {
            code: &'static str,
            message: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<Vec<FieldError>>,
        }

        let status = self.status_code();
        if status.is_server_error() {
            error!("request failed: {}", self);
        }

        HttpResponse::build(status).json(&ErrorBody {
            code: self.error_code(),
            message: self.error_message(),
            details: self.details(),
        })
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        Debug::fmt(self, f)
    }
}

impl From<DatabaseError> for Error {
    fn from(error: DatabaseError) -> Error {
        // Duplicate-key writes are a data problem, not a server fault.
        if let ErrorKind::Write(WriteFailure::WriteError(write)) = error.kind.as_ref() {
            if write.code == 11000 {
                return Error::ConstraintViolation {
                    message: write.message.clone(),
                };
            }
        }
        Error::FailedDatabaseCall(error)
    }
}

impl From<IoError> for Error {
    fn from(error: IoError) -> Error {
        Error::IoError(error)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidJson(err) => Some(err),
            Error::InvalidPath(err) => Some(err),
            Error::InvalidQuery(err) => Some(err),
            Error::FailedDatabaseCall(err) => Some(err),
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_statuses() {
        let err = Error::Validation {
            errors: vec![FieldError::new("budget", "Must be greater than 0.")],
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "validation_error");

        let err = Error::CampaignNotFound {
            campaign_id: CampaignId::new(),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), "not_found");

        assert_eq!(
            Error::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn constraint_violations_render_as_validation_details() {
        let err = Error::ConstraintViolation {
            message: "duplicate key".to_string(),
        };
        assert_eq!(err.error_code(), "validation_error");
        assert_eq!(
            err.details(),
            Some(vec![FieldError::new("_schema", "duplicate key")])
        );
    }

    #[test]
    fn server_errors_do_not_leak_detail() {
        let err = Error::ExistentialState("campaign store lock poisoned".to_string());
        assert_eq!(err.error_message(), "An internal server error occurred");
    }
}
