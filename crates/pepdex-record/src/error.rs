use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::{Number, Status};

/// Why a header block could not become a [`crate::ProposalRecord`].
///
/// Both variants carry the document identifier the caller passed in and the
/// field name as used in the record (`number`, `post_history`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordError {
    #[error("{document}: missing required field `{field}`")]
    MissingField { document: String, field: String },

    #[error("{document}: malformed field `{field}`: {reason}")]
    MalformedField {
        document: String,
        field: String,
        reason: String,
    },
}

impl RecordError {
    pub fn missing(document: &str, field: &str) -> Self {
        Self::MissingField {
            document: document.to_string(),
            field: field.to_string(),
        }
    }

    pub fn malformed(document: &str, field: &str, reason: impl Into<String>) -> Self {
        Self::MalformedField {
            document: document.to_string(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn document(&self) -> &str {
        match self {
            Self::MissingField { document, .. } | Self::MalformedField { document, .. } => {
                document
            }
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field, .. } | Self::MalformedField { field, .. } => field,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("proposal {number}: cannot move from {from} to {to}")]
    Transition {
        number: Number,
        from: Status,
        to: Status,
    },

    #[error("proposal {number}: post date {date} precedes {floor}")]
    PostOutOfOrder {
        number: Number,
        date: String,
        floor: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("proposal {0} is already registered")]
    Duplicate(Number),

    #[error("proposal {0} is not registered")]
    Unknown(Number),

    #[error("proposal {0} cannot replace itself")]
    SelfReplacement(Number),

    #[error("proposal {number} is already linked to {existing}")]
    AlreadyLinked { number: Number, existing: Number },

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}
