//! [`ProposalRecord`] → canonical header block.
//!
//! Known fields are written in [`KnownField::ALL`] order with their canonical
//! keys; unknown fields follow in document order, exactly as they were read.
//! Parsing the output yields the same record.

use crate::header::{split_document, KnownField};
use crate::record::ProposalRecord;

fn join_numbers(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn field_value(record: &ProposalRecord, field: KnownField) -> Option<String> {
    match field {
        KnownField::Number => Some(record.number().to_string()),
        KnownField::Title => Some(record.title.clone()),
        KnownField::Author => (!record.author.is_empty()).then(|| record.author.join(", ")),
        KnownField::DiscussionsTo => record.discussions_to.clone(),
        KnownField::Status => Some(record.status.to_string()),
        KnownField::Type => Some(record.proposal_type.to_string()),
        KnownField::ContentType => record.content_type.clone(),
        KnownField::Requires => {
            (!record.requires.is_empty()).then(|| join_numbers(&record.requires))
        }
        KnownField::Created => Some(record.created.to_string()),
        KnownField::PythonVersion => record.python_version.clone(),
        KnownField::PostHistory => (!record.post_history.is_empty()).then(|| {
            record
                .post_history
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        }),
        KnownField::Replaces => record.replaces.map(|n| n.to_string()),
        KnownField::SupersededBy => record.superseded_by.map(|n| n.to_string()),
        KnownField::Resolution => record.resolution.clone(),
    }
}

fn push_line(out: &mut String, key: &str, value: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(key);
    out.push(':');
    if !value.is_empty() {
        out.push(' ');
        out.push_str(value);
    }
}

/// Render the header block, without the terminating blank line.
pub fn format_header(record: &ProposalRecord) -> String {
    let mut out = String::new();
    for field in KnownField::ALL {
        if let Some(value) = field_value(record, field) {
            push_line(&mut out, field.header_key(), &value);
        }
    }
    for extra in &record.extra {
        push_line(&mut out, &extra.key, &extra.value);
    }
    out
}

/// Line ending of the first line of `text`; `\n` when there is none.
fn line_ending(text: &str) -> &'static str {
    match text.find('\n') {
        Some(i) if text[..i].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

/// Replace the header block of `text` with the formatted `record`, keeping the
/// body unchanged. The header is written with the document's line ending.
pub fn rewrite_header(text: &str, record: &ProposalRecord) -> String {
    let (_, body) = split_document(text);
    let eol = line_ending(text);
    let mut header = format_header(record);
    if eol != "\n" {
        header = header.replace('\n', eol);
    }
    if body.is_empty() {
        format!("{header}{eol}")
    } else {
        format!("{header}{eol}{eol}{body}")
    }
}
