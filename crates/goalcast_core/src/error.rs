//! Errors raised by the stores and by input validation

use std::fmt;

use crate::model::GoalId;

/// Failures reported by the assumptions and goals collaborators
///
/// The projection core never creates these for numeric reasons; they only
/// pass through from the stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Backing store could not be reached or refused the operation
    Unavailable(String),
    GoalNotFound(GoalId),
    /// A lock guarding in-process state was poisoned by a panicking writer
    Poisoned(&'static str),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
            StoreError::GoalNotFound(id) => write!(f, "goal {id} not found"),
            StoreError::Poisoned(what) => write!(f, "{what} lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        StoreError::Poisoned("store")
    }
}

/// Input rejected before it reaches the engine
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type Result<T> = std::result::Result<T, StoreError>;
