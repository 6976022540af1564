//! Error types for the AssetFlow core

use thiserror::Error;

/// Main application error type.
///
/// Every domain condition a caller can act on gets its own variant; only
/// unexpected storage failures are carried as an opaque `Database` error.
#[derive(Error, Debug)]
pub enum AppError {
    // Validation
    #[error("Category prefix is null or empty")]
    CategoryPrefixEmpty,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid assignment status: {0}")]
    InvalidAssignmentStatus(String),

    #[error("Invalid asset return state: {0}")]
    InvalidReturnState(String),

    #[error("The updated assigned date must be later than the original assigned date")]
    InvalidDateUpdate,

    // Not found
    #[error("Category not found")]
    CategoryNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Asset does not exist or has already been deleted")]
    AssetNotFound,

    #[error("Assignment does not exist or has already been deleted")]
    AssignmentNotFound,

    #[error("Assignment has already been deleted")]
    AssignmentAlreadyDeleted,

    #[error("Asset return request not found")]
    ReturnRequestNotFound,

    // Optimistic version conflicts
    #[error("Asset is currently being modified by another user")]
    AssetBeingModified,

    #[error("Assignment is currently being modified by another user")]
    AssignmentBeingModified,

    #[error("Asset return is currently being modified by another user")]
    ReturnBeingModified,

    // Allocator lock contention, surfaced after retries are exhausted
    #[error("Sequence counter for key '{0}' is locked by another transaction")]
    AllocatorContention(String),

    // Invalid transitions
    #[error("The asset cannot be modified due to its current state")]
    AssetNotEditable,

    #[error("The assignment cannot be updated due to its current status")]
    AssignmentNotUpdatable,

    #[error("The assignment cannot be deleted due to its current status")]
    AssignmentNotDeletable,

    #[error("Asset return is not updatable")]
    ReturnNotUpdatable,

    // Permissions
    #[error("Access denied")]
    AccessDenied,

    #[error("User and asset location mismatch")]
    LocationMismatch,

    // Business rules
    #[error("Asset not available for assignment")]
    AssetNotAvailable,

    #[error("Asset cannot be deleted because it is currently assigned or has been assigned in the past")]
    AssetNotDeletable,

    #[error("Assignment is not accepted and cannot be returned")]
    AssignmentNotAccepted,

    #[error("Asset return already exists for this assignment")]
    ReturnRequestAlreadyExists,

    #[error("Asset has already been returned")]
    AssetAlreadyReturned,

    // Storage
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
