//! Shared domain enums for the asset, assignment and return lifecycles

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// AssetState
// ---------------------------------------------------------------------------

/// Lifecycle state of an asset. New assets start in `Available`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "asset_state", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetState {
    Available,
    Assigned,
    NotAvailable,
    WaitingForRecycling,
    Recycled,
}

impl AssetState {
    pub fn is_available(self) -> bool {
        self == AssetState::Available
    }

    pub fn is_assigned(self) -> bool {
        self == AssetState::Assigned
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssetState::Available => "AVAILABLE",
            AssetState::Assigned => "ASSIGNED",
            AssetState::NotAvailable => "NOT_AVAILABLE",
            AssetState::WaitingForRecycling => "WAITING_FOR_RECYCLING",
            AssetState::Recycled => "RECYCLED",
        }
    }
}

impl fmt::Display for AssetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(AssetState::Available),
            "ASSIGNED" => Ok(AssetState::Assigned),
            "NOT_AVAILABLE" => Ok(AssetState::NotAvailable),
            "WAITING_FOR_RECYCLING" => Ok(AssetState::WaitingForRecycling),
            "RECYCLED" => Ok(AssetState::Recycled),
            other => Err(format!("unknown asset state: {}", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// AssignmentStatus
// ---------------------------------------------------------------------------

/// Status of an assignment. `Declined` and `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "assignment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    WaitingForAcceptance,
    Accepted,
    Declined,
    Completed,
}

impl AssignmentStatus {
    pub fn is_waiting_for_acceptance(self) -> bool {
        self == AssignmentStatus::WaitingForAcceptance
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, AssignmentStatus::Declined | AssignmentStatus::Completed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentStatus::WaitingForAcceptance => "WAITING_FOR_ACCEPTANCE",
            AssignmentStatus::Accepted => "ACCEPTED",
            AssignmentStatus::Declined => "DECLINED",
            AssignmentStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING_FOR_ACCEPTANCE" => Ok(AssignmentStatus::WaitingForAcceptance),
            "ACCEPTED" => Ok(AssignmentStatus::Accepted),
            "DECLINED" => Ok(AssignmentStatus::Declined),
            "COMPLETED" => Ok(AssignmentStatus::Completed),
            other => Err(format!("unknown assignment status: {}", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// ReturnState
// ---------------------------------------------------------------------------

/// State of a return request. `Completed` and `Canceled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "return_state", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnState {
    WaitingForReturning,
    Completed,
    Canceled,
}

impl ReturnState {
    pub fn is_waiting_for_returning(self) -> bool {
        self == ReturnState::WaitingForReturning
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReturnState::WaitingForReturning => "WAITING_FOR_RETURNING",
            ReturnState::Completed => "COMPLETED",
            ReturnState::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for ReturnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReturnState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING_FOR_RETURNING" => Ok(ReturnState::WaitingForReturning),
            "COMPLETED" => Ok(ReturnState::Completed),
            "CANCELED" => Ok(ReturnState::Canceled),
            other => Err(format!("unknown return state: {}", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Role of an acting user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Staff,
}
