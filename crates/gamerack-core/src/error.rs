//! # Error Types
//!
//! Domain-specific error types for gamerack-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  gamerack-core errors (this file)                                      │
//! │  ├── LedgerError      - Rental lifecycle failures                      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  gamerack-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → LedgerError → caller maps ErrorKind           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ids, limits)
//! 3. Errors are enum variants, never String
//! 4. Every variant reports a machine-distinguishable [`ErrorKind`], so an
//!    outer layer can map each kind to a stable response without parsing
//!    message text

use thiserror::Error;

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse classification of a [`LedgerError`].
///
/// Business-rule failures are terminal: callers must not retry them
/// automatically. Only `Internal` may be worth a retry at the caller's
/// discretion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range argument (a caller bug).
    InvalidInput,
    /// A referenced id does not exist.
    NotFound,
    /// The request conflicts with current state (stock exhausted,
    /// already-returned rental, duplicate unique key).
    Conflict,
    /// The target exists but is not in a state that permits the operation.
    FailedPrecondition,
    /// Unexpected storage failure, surfaced opaquely.
    Internal,
}

// =============================================================================
// Ledger Error
// =============================================================================

/// Rental lifecycle errors.
///
/// These represent business rule violations raised by the [`RentalLedger`]
/// and the stores beneath it. None of them are process-fatal.
///
/// [`RentalLedger`]: crate::ledger::RentalLedger
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Input validation failed before any lookup ran.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No customer matches the given id.
    #[error("customer not found: {0}")]
    CustomerNotFound(i64),

    /// No game matches the given id.
    #[error("game not found: {0}")]
    GameNotFound(i64),

    /// No rental matches the given id.
    #[error("rental not found: {0}")]
    RentalNotFound(i64),

    /// Every copy of the game is currently out on an open rental.
    ///
    /// ## When This Occurs
    /// - Opening a rental while `count_open(game_id) >= stock_total`
    #[error("no stock available for game {game_id}: all {stock_total} copies are out")]
    StockExhausted { game_id: i64, stock_total: i64 },

    /// The rental already has a return date recorded.
    ///
    /// A conflict, not a bad request: returning twice would silently
    /// overwrite the recorded delay fee.
    #[error("rental {rental_id} has already been returned")]
    AlreadyReturned { rental_id: i64 },

    /// The rental is still open; only closed rentals may be deleted.
    #[error("rental {rental_id} has not been returned yet")]
    RentalStillOpen { rental_id: i64 },

    /// Opaque storage failure. Logged at the storage layer; never retried
    /// automatically by the ledger.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Returns the coarse classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Validation(_) => ErrorKind::InvalidInput,
            LedgerError::CustomerNotFound(_)
            | LedgerError::GameNotFound(_)
            | LedgerError::RentalNotFound(_) => ErrorKind::NotFound,
            LedgerError::StockExhausted { .. } | LedgerError::AlreadyReturned { .. } => {
                ErrorKind::Conflict
            }
            LedgerError::RentalStillOpen { .. } => ErrorKind::FailedPrecondition,
            LedgerError::Storage(_) => ErrorKind::Internal,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., non-digit cpf, bad phone length).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with LedgerError.
pub type CoreResult<T> = Result<T, LedgerError>;

// =============================================================================
// Unit Tests
// =============================================================================
