//! Batch parsing: many documents, each on its own.
//!
//! A failing document is recorded and skipped; it never stops the batch.

use pepdex_record::{parse_record, LinkIssue, ProposalRecord, RecordError, Registry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::{SourceDocument, UnreadableInput};

/// A document that parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub document_id: String,
    pub path: PathBuf,
    pub record: ProposalRecord,
}

/// A document that did not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedDocument {
    pub path: PathBuf,
    pub error: RecordError,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub parsed: Vec<ParsedDocument>,
    pub failed: Vec<FailedDocument>,
    pub link_issues: Vec<LinkIssue>,
    /// Inputs that never reached the parser.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unreadable: Vec<UnreadableInput>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.link_issues.is_empty() && self.unreadable.is_empty()
    }

    /// Parsed records keyed by number.
    pub fn registry(&self) -> Registry {
        self.parsed.iter().map(|d| d.record.clone()).collect()
    }
}

/// Parse every document, then check links across the ones that parsed.
///
/// A second document claiming an already-used number is reported as a
/// malformed `number` and left out of the link check.
pub fn parse_batch(docs: &[SourceDocument]) -> BatchReport {
    let mut report = BatchReport::default();
    let mut owners: BTreeMap<u32, String> = BTreeMap::new();

    for doc in docs {
        match parse_record(&doc.text, &doc.document_id) {
            Ok(record) => {
                if let Some(first) = owners.get(&record.number()) {
                    let error = RecordError::malformed(
                        &doc.document_id,
                        "number",
                        format!("{} is already used by {first}", record.number()),
                    );
                    tracing::warn!(path = %doc.path.display(), %error, "duplicate proposal number");
                    report.failed.push(FailedDocument {
                        path: doc.path.clone(),
                        error,
                    });
                    continue;
                }
                owners.insert(record.number(), doc.document_id.clone());
                report.parsed.push(ParsedDocument {
                    document_id: doc.document_id.clone(),
                    path: doc.path.clone(),
                    record,
                });
            }
            Err(error) => {
                tracing::warn!(path = %doc.path.display(), %error, "header rejected");
                report.failed.push(FailedDocument {
                    path: doc.path.clone(),
                    error,
                });
            }
        }
    }

    report.link_issues = report.registry().check_links();

    tracing::info!(
        parsed = report.parsed.len(),
        failed = report.failed.len(),
        link_issues = report.link_issues.len(),
        "batch finished"
    );
    report
}
