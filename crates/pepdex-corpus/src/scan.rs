//! Directory scan for proposal documents.

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Options controlling which files count as proposal documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Maximum number of documents to read (safety cap).
    pub max_files: usize,
    /// Maximum file size to read (bytes).
    pub max_file_bytes: u64,
    /// File extensions to include (lowercase, without dot).
    pub include_extensions: Vec<String>,
    /// Directory names to skip (exact match).
    pub exclude_dir_names: Vec<String>,
    /// Regex the file stem must match. `None` accepts every stem.
    pub file_name_pattern: Option<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_files: 20_000,
            max_file_bytes: 1024 * 1024,
            include_extensions: vec!["rst".to_string(), "txt".to_string()],
            exclude_dir_names: vec![
                ".git".to_string(),
                "build".to_string(),
                "target".to_string(),
                "node_modules".to_string(),
            ],
            file_name_pattern: Some(r"^pep-\d+$".to_string()),
        }
    }
}

/// One document read from disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    pub path: PathBuf,
    /// File stem, e.g. `pep-0487`. Used to identify the document in errors.
    pub document_id: String,
    pub text: String,
}

impl SourceDocument {
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            document_id: document_id_for(path),
            text,
        })
    }
}

pub fn document_id_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Walk `root` and read every matching document, sorted by path.
///
/// Unreadable, oversized, or non-UTF-8 files are skipped with a warning.
pub fn scan_corpus(root: &Path, options: &ScanOptions) -> Result<Vec<SourceDocument>> {
    if !root.is_dir() {
        return Err(anyhow!("{} is not a directory", root.display()));
    }

    let include: BTreeSet<String> = options.include_extensions.iter().cloned().collect();
    let exclude_dirs: BTreeSet<String> = options.exclude_dir_names.iter().cloned().collect();
    let stem_re = options
        .file_name_pattern
        .as_deref()
        .map(Regex::new)
        .transpose()
        .context("invalid file_name_pattern")?;

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !exclude_dirs.contains(name.as_ref())
        });

    let mut docs = Vec::new();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();

        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(e) => e.to_lowercase(),
            None => continue,
        };
        if !include.contains(&ext) {
            continue;
        }

        let stem = document_id_for(path);
        if let Some(re) = &stem_re {
            if !re.is_match(&stem) {
                continue;
            }
        }

        if docs.len() >= options.max_files {
            tracing::warn!(max_files = options.max_files, "file cap reached, stopping scan");
            break;
        }

        let size = match entry.metadata() {
            Ok(m) => m.len(),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping file without metadata");
                continue;
            }
        };
        if size > options.max_file_bytes {
            tracing::warn!(
                path = %path.display(),
                size,
                max_file_bytes = options.max_file_bytes,
                "skipping oversized file"
            );
            continue;
        }

        match SourceDocument::read(path) {
            Ok(doc) => docs.push(doc),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping unreadable file");
            }
        }
    }

    tracing::debug!(root = %root.display(), documents = docs.len(), "scan finished");
    Ok(docs)
}

/// An input file that could not be read as text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadableInput {
    pub path: PathBuf,
    pub reason: String,
}

/// Documents gathered from command-line inputs.
#[derive(Debug, Clone, Default)]
pub struct CollectedInputs {
    pub documents: Vec<SourceDocument>,
    pub unreadable: Vec<UnreadableInput>,
}

/// Expand a mix of files and directories into documents.
///
/// Files are taken as given (no extension or name filtering); directories are
/// scanned with `options`. A file reached twice (listed directly and through
/// its directory, or under two spellings) is read once. A file that cannot be
/// read is recorded and the rest are still collected.
pub fn collect_documents(inputs: &[PathBuf], options: &ScanOptions) -> Result<CollectedInputs> {
    let mut collected = CollectedInputs::default();
    let mut seen: BTreeSet<PathBuf> = BTreeSet::new();
    let mut first_visit = |path: &Path| {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        seen.insert(key)
    };

    for input in inputs {
        if input.is_dir() {
            for doc in scan_corpus(input, options)? {
                if first_visit(doc.path.as_path()) {
                    collected.documents.push(doc);
                }
            }
            continue;
        }

        if !first_visit(input.as_path()) {
            tracing::debug!(path = %input.display(), "input already collected");
            continue;
        }
        match SourceDocument::read(input) {
            Ok(doc) => collected.documents.push(doc),
            Err(err) => {
                tracing::warn!(path = %input.display(), error = %err, "unreadable input");
                collected.unreadable.push(UnreadableInput {
                    path: input.clone(),
                    reason: format!("{err:#}"),
                });
            }
        }
    }
    Ok(collected)
}
