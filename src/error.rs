//! Error types for Matchpoint server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Application error codes carried in every error response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    DbFailure = 2,
    NoSuchRecord = 3,
    BadValue = 4,
    FieldUnavailable = 5,
    InvalidDuration = 6,
    PastBooking = 7,
    AdvanceLimitExceeded = 8,
    OutsideOperatingHours = 9,
    SlotUnavailable = 10,
    BookingImmutable = 11,
    ModificationWindowClosed = 12,
    AlreadyCancelled = 13,
    InvalidStateTransition = 14,
    PaymentFailure = 15,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Field is not available for booking: {0}")]
    FieldUnavailable(String),

    #[error("Invalid booking duration: {0}")]
    InvalidDuration(String),

    #[error("Booking start time must be in the future")]
    PastBooking,

    #[error("Booking start exceeds the advance window of {days} days")]
    AdvanceLimitExceeded { days: i32 },

    #[error("Requested time falls outside the field's operating hours")]
    OutsideOperatingHours,

    #[error("Requested slot overlaps {} existing booking(s)", conflicts.len())]
    SlotUnavailable { conflicts: Vec<Uuid> },

    #[error("Booking is {status} and can no longer be modified")]
    BookingImmutable { status: String },

    #[error("Modification window closed: less than {hours}h before start")]
    ModificationWindowClosed { hours: i32 },

    #[error("Booking is already cancelled")]
    AlreadyCancelled,

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Payment gateway error: {0}")]
    Payment(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    /// IDs of the bookings occupying the requested slot, on 409 responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<Vec<Uuid>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut conflicts = None;

        let (status, code, message) = match &self {
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchRecord, msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::FieldUnavailable(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::FieldUnavailable,
                msg.clone(),
            ),
            AppError::InvalidDuration(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidDuration, msg.clone())
            }
            AppError::PastBooking => (
                StatusCode::BAD_REQUEST,
                ErrorCode::PastBooking,
                self.to_string(),
            ),
            AppError::AdvanceLimitExceeded { .. } => (
                StatusCode::BAD_REQUEST,
                ErrorCode::AdvanceLimitExceeded,
                self.to_string(),
            ),
            AppError::OutsideOperatingHours => (
                StatusCode::BAD_REQUEST,
                ErrorCode::OutsideOperatingHours,
                self.to_string(),
            ),
            AppError::SlotUnavailable { conflicts: ids } => {
                // Expected under contention; callers retry with another slot.
                conflicts = Some(ids.clone());
                (StatusCode::CONFLICT, ErrorCode::SlotUnavailable, self.to_string())
            }
            AppError::BookingImmutable { .. } => (
                StatusCode::CONFLICT,
                ErrorCode::BookingImmutable,
                self.to_string(),
            ),
            AppError::ModificationWindowClosed { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::ModificationWindowClosed,
                self.to_string(),
            ),
            AppError::AlreadyCancelled => (
                StatusCode::CONFLICT,
                ErrorCode::AlreadyCancelled,
                self.to_string(),
            ),
            AppError::InvalidStateTransition { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::InvalidStateTransition,
                self.to_string(),
            ),
            AppError::Payment(msg) => {
                (StatusCode::BAD_GATEWAY, ErrorCode::PaymentFailure, msg.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            conflicts,
        });

        (status, body).into_response()
    }
}

impl AppError {
    /// SQLSTATE codes that signal a race resolved in the opponent's favor:
    /// serialization failure (40001) or the bookings exclusion constraint
    /// firing between our conflict check and insert (23P01). Retried once.
    pub fn is_retryable_conflict(&self) -> bool {
        match self {
            AppError::Database(sqlx::Error::Database(db)) => {
                matches!(db.code().as_deref(), Some("40001") | Some("23P01"))
            }
            _ => false,
        }
    }

    /// SQLSTATE 23505: a row with this key already exists
    pub fn is_unique_violation(&self) -> bool {
        match self {
            AppError::Database(sqlx::Error::Database(db)) => {
                db.code().as_deref() == Some("23505")
            }
            _ => false,
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(ErrorCode::Success as u32, 0);
        assert_eq!(ErrorCode::SlotUnavailable as u32, 10);
        assert_eq!(ErrorCode::PaymentFailure as u32, 15);
    }

    #[test]
    fn slot_unavailable_message_counts_conflicts() {
        let err = AppError::SlotUnavailable {
            conflicts: vec![Uuid::new_v4(), Uuid::new_v4()],
        };
        assert!(err.to_string().contains("2 existing booking(s)"));
    }
}
