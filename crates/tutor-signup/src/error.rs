//! Error taxonomy for the scheduling engine and registry client.
//!
//! Every error is terminal for the operation that raised it: the engine
//! never retries, and the calling surface presents the failure and leaves
//! the store as-is for a manual re-attempt. A declined confirmation is not
//! an error at all; it maps to the `Cancelled` outcome variants instead.

use thiserror::Error;

use crate::record::{SessionKind, Weekday};

/// A wire row that could not be decoded into a typed record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseRecordError {
    #[error("unknown day {0:?}")]
    UnknownDay(String),
    #[error("unknown session {0:?}")]
    UnknownSession(String),
}

/// A registry read or write failed.
///
/// Calls either fully succeed or fail; there is no partial-success state
/// within one call. The engine surfaces these unchanged.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("registry returned status {status} for {operation}")]
    UnexpectedStatus {
        operation: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("invalid registry base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Input rejected before any registry traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name is empty; enter a full name")]
    EmptyName,
    #[error("no session selected; pick at least one of EP1, EP2, After School")]
    NoSessionSelected,
    #[error("no days selected; pick at least one day to remove")]
    NoDaysSelected,
}

/// Failure of a scheduling operation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{session} is not offered on {day}")]
    NotOffered { day: Weekday, session: SessionKind },

    #[error("already signed up for {0}")]
    Duplicate(SessionKind),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
