//! The typed proposal record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::date::{HeaderDate, PostEntry};

pub type Number = u32;

// ============================================================================
// Enumerations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    Draft,
    Active,
    Accepted,
    Deferred,
    Rejected,
    Withdrawn,
    Final,
    Superseded,
    Replaced,
}

impl Status {
    pub const ALL: [Status; 9] = [
        Status::Draft,
        Status::Active,
        Status::Accepted,
        Status::Deferred,
        Status::Rejected,
        Status::Withdrawn,
        Status::Final,
        Status::Superseded,
        Status::Replaced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Draft => "Draft",
            Status::Active => "Active",
            Status::Accepted => "Accepted",
            Status::Deferred => "Deferred",
            Status::Rejected => "Rejected",
            Status::Withdrawn => "Withdrawn",
            Status::Final => "Final",
            Status::Superseded => "Superseded",
            Status::Replaced => "Replaced",
        }
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Status::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown status `{s}`"))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProposalType {
    #[serde(rename = "Standards Track")]
    StandardsTrack,
    Informational,
    Process,
}

impl ProposalType {
    pub const ALL: [ProposalType; 3] = [
        ProposalType::StandardsTrack,
        ProposalType::Informational,
        ProposalType::Process,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProposalType::StandardsTrack => "Standards Track",
            ProposalType::Informational => "Informational",
            ProposalType::Process => "Process",
        }
    }
}

impl FromStr for ProposalType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Collapse runs of whitespace so `Standards  Track` still matches.
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        ProposalType::ALL
            .into_iter()
            .find(|ty| ty.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| format!("unknown type `{}`", s.trim()))
    }
}

impl fmt::Display for ProposalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Record
// ============================================================================

/// A header field the parser does not know, kept exactly as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraField {
    /// Key as spelled in the document.
    pub key: String,
    /// Raw value: text after `Key:` plus any continuation lines, with their
    /// original indentation, joined by `\n`.
    pub value: String,
}

/// Structured metadata of one proposal document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRecord {
    number: Number,
    pub title: String,
    pub author: Vec<String>,
    pub status: Status,
    #[serde(rename = "type")]
    pub proposal_type: ProposalType,
    pub created: HeaderDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaces: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superseded_by: Option<Number>,
    #[serde(default)]
    pub post_history: Vec<PostEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discussions_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<ExtraField>,
}

impl ProposalRecord {
    /// A freshly filed record with only the mandatory fields set.
    pub fn new(
        number: Number,
        title: impl Into<String>,
        status: Status,
        proposal_type: ProposalType,
        created: HeaderDate,
    ) -> Self {
        Self {
            number,
            title: title.into(),
            author: Vec::new(),
            status,
            proposal_type,
            created,
            python_version: None,
            replaces: None,
            superseded_by: None,
            post_history: Vec::new(),
            requires: Vec::new(),
            discussions_to: None,
            resolution: None,
            content_type: None,
            extra: Vec::new(),
        }
    }

    /// The proposal number. It is fixed at construction.
    pub fn number(&self) -> Number {
        self.number
    }

    /// Whether the record has reached a status it can never leave.
    pub fn is_closed(&self) -> bool {
        self.status.stage() == 2
    }
}
