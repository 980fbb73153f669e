//! Unified error types for the occupancy engine.
//!
//! Every user-visible failure carries the offending values (the rejected
//! amount, the current balance, the room's actual status) so callers can
//! self-correct without guessing. Validation failures are raised before any
//! write; once a database transaction has begun, any error aborts the whole
//! multi-step unit.

use crate::entities::RoomStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed, missing, or out-of-range input. Never mutates state.
    #[error("invalid {field}: {message}")]
    Validation {
        /// The request field that failed validation
        field: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// The room's state machine rejected a check-in or transition.
    #[error("room is not available: current status is {status}")]
    RoomNotAvailable {
        /// The room's actual status at the time of the attempt
        status: RoomStatus,
    },

    /// A payment would push `paid_amount` past `total_amount`.
    #[error("payment of {requested:.2} exceeds outstanding balance of {balance:.2}")]
    ExceedsBalance {
        /// The rejected payment amount
        requested: f64,
        /// The outstanding balance at the time of the attempt
        balance: f64,
    },

    /// Checkout attempted with money still owed on the stay.
    #[error("checkout blocked: outstanding balance of {balance:.2} must be collected first")]
    PaymentIncomplete {
        /// The outstanding balance blocking the checkout
        balance: f64,
    },

    /// A ledger or revision operation hit a stay that has already ended.
    #[error("occupancy {occupancy_id} is already checked out")]
    AlreadyClosed {
        /// The closed occupancy
        occupancy_id: i64,
    },

    /// Unknown room/occupancy/guest reference.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Which kind of record was missing
        entity: &'static str,
        /// The id that failed to resolve
        id: i64,
    },

    /// The record exists but belongs to a property outside the caller's scope.
    #[error("access denied: record belongs to property {property_id}")]
    Forbidden {
        /// The property the record actually belongs to
        property_id: i64,
    },

    /// Configuration loading or parsing failure.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Opaque storage-layer failure; the enclosing transaction rolled back.
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// The check-in transaction exceeded its extended deadline.
    #[error("transaction timed out after {seconds}s")]
    Timeout {
        /// The deadline that was exceeded
        seconds: u64,
    },
}

impl Error {
    /// The HTTP status an external transport should map this error to.
    ///
    /// The engine owns no routes; this keeps the mapping in one place for
    /// whatever surface ends up serving it.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::Validation { .. }
            | Self::RoomNotAvailable { .. }
            | Self::ExceedsBalance { .. }
            | Self::PaymentIncomplete { .. }
            | Self::AlreadyClosed { .. } => 400,
            Self::Forbidden { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::Config { .. } | Self::Database(_) | Self::Timeout { .. } => 500,
        }
    }
}

// Nested transaction closures surface their inner error through
// `TransactionError`; flatten it back into our own type.
impl From<sea_orm::TransactionError<Error>> for Error {
    fn from(value: sea_orm::TransactionError<Error>) -> Self {
        match value {
            sea_orm::TransactionError::Connection(e) => Self::Database(e),
            sea_orm::TransactionError::Transaction(e) => e,
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        let validation = Error::Validation {
            field: "rate",
            message: "must be positive".to_string(),
        };
        assert_eq!(validation.http_status(), 400);

        let forbidden = Error::Forbidden { property_id: 7 };
        assert_eq!(forbidden.http_status(), 403);

        let not_found = Error::NotFound {
            entity: "occupancy",
            id: 42,
        };
        assert_eq!(not_found.http_status(), 404);

        let timeout = Error::Timeout { seconds: 15 };
        assert_eq!(timeout.http_status(), 500);
    }

    #[test]
    fn test_messages_carry_offending_values() {
        let err = Error::ExceedsBalance {
            requested: 2500.0,
            balance: 1500.0,
        };
        let message = err.to_string();
        assert!(message.contains("2500.00"));
        assert!(message.contains("1500.00"));

        let err = Error::PaymentIncomplete { balance: 1500.0 };
        assert!(err.to_string().contains("1500.00"));

        let err = Error::RoomNotAvailable {
            status: crate::entities::RoomStatus::Occupied,
        };
        assert!(err.to_string().contains("OCCUPIED"));
    }
}
