//! `index.json`: a snapshot of a parsed corpus.

use anyhow::{anyhow, Context, Result};
use pepdex_record::digest::header_digest;
use pepdex_record::{LinkIssue, ProposalRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{BatchReport, FailedDocument};

pub const INDEX_VERSION_V1: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexFileV1 {
    pub version: u32,
    /// Unix seconds as string.
    pub generated_at: String,
    /// Root directory (or inputs) the index was built from.
    pub source: String,
    pub entries: Vec<IndexEntryV1>,
    #[serde(default)]
    pub failures: Vec<FailedDocument>,
    #[serde(default)]
    pub link_issues: Vec<LinkIssue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntryV1 {
    pub document_id: String,
    pub path: String,
    /// See [`pepdex_record::digest::header_digest`].
    pub digest: String,
    pub record: ProposalRecord,
}

impl IndexFileV1 {
    pub fn from_report(report: &BatchReport, source: &str, generated_at: String) -> Self {
        let mut entries: Vec<IndexEntryV1> = report
            .parsed
            .iter()
            .map(|doc| IndexEntryV1 {
                document_id: doc.document_id.clone(),
                path: doc.path.to_string_lossy().to_string(),
                digest: header_digest(&doc.record),
                record: doc.record.clone(),
            })
            .collect();
        entries.sort_by_key(|e| e.record.number());

        Self {
            version: INDEX_VERSION_V1,
            generated_at,
            source: source.to_string(),
            entries,
            failures: report.failed.clone(),
            link_issues: report.link_issues.clone(),
        }
    }

    pub fn get(&self, number: u32) -> Option<&IndexEntryV1> {
        self.entries.iter().find(|e| e.record.number() == number)
    }
}

pub fn write_index(index: &IndexFileV1, out: &Path) -> Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(index)?;
    std::fs::write(out, json).with_context(|| format!("failed to write {}", out.display()))?;
    Ok(())
}

pub fn read_index(path: &Path) -> Result<IndexFileV1> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let index: IndexFileV1 = serde_json::from_str(&text)
        .with_context(|| format!("failed to decode {}", path.display()))?;
    if index.version != INDEX_VERSION_V1 {
        return Err(anyhow!(
            "{}: unsupported index version {} (expected {INDEX_VERSION_V1})",
            path.display(),
            index.version
        ));
    }
    Ok(index)
}
