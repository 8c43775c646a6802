use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

use crate::store::StoreError;

/// Why a check-in was not admitted.
#[derive(Debug, Display)]
pub enum CheckInError {
    #[display(fmt = "Student ID is required")]
    MissingStudentId,

    #[display(fmt = "Invalid time format, expected MM/DD/YYYY hh:mm AM|PM")]
    InvalidTimeFormat { raw: String },

    #[display(fmt = "User already checked in at this exact time.")]
    ExactDuplicate,

    #[display(
        fmt = "User already checked in within {} minutes on this day.",
        min_interval_minutes
    )]
    CooldownViolation {
        elapsed_minutes: i64,
        min_interval_minutes: i64,
    },

    #[display(fmt = "Persistence failure: {}", _0)]
    Persistence(StoreError),
}

impl CheckInError {
    /// Business-rule and validation rejections, as opposed to store failures.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, CheckInError::Persistence(_))
    }
}

impl std::error::Error for CheckInError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CheckInError::Persistence(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for CheckInError {
    fn from(e: StoreError) -> Self {
        match e {
            // the store's unique key on (student_id, encoded_time) fired
            StoreError::UniqueViolation => CheckInError::ExactDuplicate,
            other => CheckInError::Persistence(other),
        }
    }
}

impl ResponseError for CheckInError {
    fn status_code(&self) -> StatusCode {
        if self.is_rejection() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_rejection() {
            self.to_string()
        } else {
            "Internal Server Error".to_string()
        };

        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}
