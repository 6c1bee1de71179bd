//! # Error Types
//!
//! The single error taxonomy surfaced by every CareBridge operation.
//!
//! | Kind | Meaning |
//! |------|---------|
//! | `Validation` | Missing or out-of-range input, with a per-field detail map |
//! | `Forbidden` | Role or ownership check failed |
//! | `NotFound` | Referenced user, case or donor row is absent |
//! | `Conflict` | State-machine precondition violated |
//! | `Unavailable` | Downstream persistence or identity failure |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Field-level validation details, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error for `field`. The first message for a field wins.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when nothing was recorded, otherwise a `Validation` error.
    pub fn into_result(self) -> CareResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CareError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{} {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Coarse classification of a [`CareError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Forbidden,
    NotFound,
    Conflict,
    Unavailable,
}

/// Errors returned by CareBridge operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CareError {
    /// One or more input fields are missing or invalid.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// The actor's role or ownership does not permit the operation.
    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    /// A referenced row does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The operation is illegal in the current state.
    #[error("Conflict: {reason}")]
    Conflict { reason: String },

    /// A downstream collaborator failed.
    #[error("Unavailable: {reason}")]
    Unavailable { reason: String },
}

impl CareError {
    /// Validation error for a single field.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.push(field, message);
        CareError::Validation(errors)
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        CareError::Forbidden {
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CareError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        CareError::Conflict {
            reason: reason.into(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        CareError::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CareError::Validation(_) => ErrorKind::Validation,
            CareError::Forbidden { .. } => ErrorKind::Forbidden,
            CareError::NotFound { .. } => ErrorKind::NotFound,
            CareError::Conflict { .. } => ErrorKind::Conflict,
            CareError::Unavailable { .. } => ErrorKind::Unavailable,
        }
    }

    /// Field map for validation errors.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            CareError::Validation(fields) => Some(fields),
            _ => None,
        }
    }

    /// Message without the kind prefix.
    pub fn detail(&self) -> String {
        match self {
            CareError::Validation(fields) => match fields.iter().next() {
                Some((_, message)) if fields.len() == 1 => message.to_string(),
                _ => fields.to_string(),
            },
            CareError::Forbidden { reason }
            | CareError::Conflict { reason }
            | CareError::Unavailable { reason } => reason.clone(),
            CareError::NotFound { entity, id } => format!("{} {}", entity, id),
        }
    }
}

/// Result type for CareBridge operations.
pub type CareResult<T> = Result<T, CareError>;
