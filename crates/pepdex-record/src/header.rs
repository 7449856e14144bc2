//! Header block → [`ProposalRecord`].
//!
//! The header is every line before the first blank line (leading blank lines
//! are skipped). Each field starts on a non-indented `Key: Value` line; an
//! indented line continues the previous field. Keys are case-insensitive and
//! treat `-` and `_` alike, so `Post-History` and `post_history` are the same
//! field. Unknown fields are kept verbatim in [`ProposalRecord::extra`].

use nom::{
    bytes::complete::take_till1,
    character::complete::{char as pchar, digit1},
    combinator::all_consuming,
    sequence::terminated,
    IResult,
};

use crate::date::{HeaderDate, PostEntry};
use crate::error::RecordError;
use crate::record::{ExtraField, Number, ProposalRecord, ProposalType, Status};

/// Pseudo field name used when a header line itself cannot be read.
pub const HEADER_FIELD: &str = "header";

// ============================================================================
// Known fields
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum KnownField {
    Number,
    Title,
    Author,
    DiscussionsTo,
    Status,
    Type,
    ContentType,
    Requires,
    Created,
    PythonVersion,
    PostHistory,
    Replaces,
    SupersededBy,
    Resolution,
}

impl KnownField {
    /// Canonical header order.
    pub const ALL: [KnownField; 14] = [
        KnownField::Number,
        KnownField::Title,
        KnownField::Author,
        KnownField::DiscussionsTo,
        KnownField::Status,
        KnownField::Type,
        KnownField::ContentType,
        KnownField::Requires,
        KnownField::Created,
        KnownField::PythonVersion,
        KnownField::PostHistory,
        KnownField::Replaces,
        KnownField::SupersededBy,
        KnownField::Resolution,
    ];

    pub const MANDATORY: [KnownField; 5] = [
        KnownField::Number,
        KnownField::Title,
        KnownField::Status,
        KnownField::Type,
        KnownField::Created,
    ];

    /// Field name as used on the record and in errors.
    pub fn name(self) -> &'static str {
        match self {
            KnownField::Number => "number",
            KnownField::Title => "title",
            KnownField::Author => "author",
            KnownField::DiscussionsTo => "discussions_to",
            KnownField::Status => "status",
            KnownField::Type => "type",
            KnownField::ContentType => "content_type",
            KnownField::Requires => "requires",
            KnownField::Created => "created",
            KnownField::PythonVersion => "python_version",
            KnownField::PostHistory => "post_history",
            KnownField::Replaces => "replaces",
            KnownField::SupersededBy => "superseded_by",
            KnownField::Resolution => "resolution",
        }
    }

    /// Key as written by the formatter.
    pub fn header_key(self) -> &'static str {
        match self {
            KnownField::Number => "PEP",
            KnownField::Title => "Title",
            KnownField::Author => "Author",
            KnownField::DiscussionsTo => "Discussions-To",
            KnownField::Status => "Status",
            KnownField::Type => "Type",
            KnownField::ContentType => "Content-Type",
            KnownField::Requires => "Requires",
            KnownField::Created => "Created",
            KnownField::PythonVersion => "Python-Version",
            KnownField::PostHistory => "Post-History",
            KnownField::Replaces => "Replaces",
            KnownField::SupersededBy => "Superseded-By",
            KnownField::Resolution => "Resolution",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let normalized = key.trim().to_ascii_lowercase().replace('-', "_");
        if normalized == "pep" {
            return Some(KnownField::Number);
        }
        KnownField::ALL
            .into_iter()
            .find(|field| field.name() == normalized)
    }
}

// ============================================================================
// Document split
// ============================================================================

/// Split a document into `(header, body)`.
///
/// The body starts after the blank line that terminates the header and is
/// returned byte-for-byte.
pub fn split_document(text: &str) -> (&str, &str) {
    let mut offset = 0usize;
    let mut start: Option<usize> = None;

    for line in text.split_inclusive('\n') {
        let blank = line.trim().is_empty();
        match start {
            None if blank => {}
            None => start = Some(offset),
            Some(s) if blank => return (&text[s..offset], &text[offset + line.len()..]),
            Some(_) => {}
        }
        offset += line.len();
    }

    match start {
        Some(s) => (&text[s..], ""),
        None => ("", ""),
    }
}

// ============================================================================
// Raw fields
// ============================================================================

#[derive(Debug)]
struct RawField<'a> {
    key: &'a str,
    first: &'a str,
    continuation: Vec<&'a str>,
}

impl RawField<'_> {
    /// Value with continuation lines folded into single spaces.
    fn folded(&self) -> String {
        std::iter::once(self.first)
            .chain(self.continuation.iter().map(|l| l.trim()))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Value exactly as written, continuation lines included.
    fn verbatim(&self) -> String {
        let mut out = self.first.to_string();
        for line in &self.continuation {
            out.push('\n');
            out.push_str(line);
        }
        out
    }
}

/// A key is any text up to the first `:`. Known keys are plain ASCII; anything
/// else ends up in `extra` as written.
fn field_key(input: &str) -> IResult<&str, &str> {
    terminated(take_till1(|c: char| c == ':'), pchar(':'))(input)
}

fn split_field_line(line: &str) -> Result<(&str, &str), String> {
    match field_key(line) {
        Ok((rest, key)) => Ok((key, rest.trim())),
        Err(_) => Err(format!("expected `Key: Value`, found `{}`", line.trim())),
    }
}

fn collect_fields<'a>(header: &'a str, document: &str) -> Result<Vec<RawField<'a>>, RecordError> {
    let mut fields: Vec<RawField<'a>> = Vec::new();

    for (i, line) in header.lines().enumerate() {
        let line_no = i + 1;
        if line.trim().is_empty() {
            break;
        }

        if line.starts_with([' ', '\t']) {
            match fields.last_mut() {
                Some(field) => field.continuation.push(line.trim_end()),
                None => {
                    return Err(RecordError::malformed(
                        document,
                        HEADER_FIELD,
                        format!("line {line_no}: continuation line before any field"),
                    ))
                }
            }
            continue;
        }

        let (key, first) = split_field_line(line.trim_end()).map_err(|message| {
            RecordError::malformed(document, HEADER_FIELD, format!("line {line_no}: {message}"))
        })?;
        fields.push(RawField {
            key,
            first,
            continuation: Vec::new(),
        });
    }

    Ok(fields)
}

// ============================================================================
// Value parsers
// ============================================================================

fn parse_number(value: &str) -> Result<Number, String> {
    let value = value.trim();
    let (_, digits) = all_consuming(digit1::<&str, nom::error::Error<&str>>)(value)
        .map_err(|_| format!("`{value}` is not a proposal number"))?;
    let n: Number = digits
        .parse()
        .map_err(|_| format!("`{value}` is out of range"))?;
    if n == 0 {
        return Err("proposal numbers start at 1".to_string());
    }
    Ok(n)
}

/// Split on commas that are not inside `<...>` or `(...)`.
pub fn split_top_level_commas(s: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();

    for c in s.chars() {
        match c {
            '<' | '(' => depth += 1,
            '>' | ')' => depth = (depth - 1).max(0),
            ',' if depth == 0 => {
                out.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    out.push(current);

    out.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

// ============================================================================
// Entry point
// ============================================================================

/// Parse a document's header block into a [`ProposalRecord`].
///
/// `document` identifies the input in errors (usually the file stem).
/// Only the header is read; the body is ignored.
pub fn parse_record(text: &str, document: &str) -> Result<ProposalRecord, RecordError> {
    let (header, _body) = split_document(text);
    let raw = collect_fields(header, document)?;

    let mut known: Vec<(KnownField, String)> = Vec::new();
    let mut extra: Vec<ExtraField> = Vec::new();

    for field in &raw {
        match KnownField::from_key(field.key) {
            Some(kf) => {
                if known.iter().any(|(k, _)| *k == kf) {
                    return Err(RecordError::malformed(
                        document,
                        kf.name(),
                        "field given more than once",
                    ));
                }
                known.push((kf, field.folded()));
            }
            None => extra.push(ExtraField {
                key: field.key.to_string(),
                value: field.verbatim(),
            }),
        }
    }

    let value_of = |kf: KnownField| {
        known
            .iter()
            .find(|(k, _)| *k == kf)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    };

    for kf in KnownField::MANDATORY {
        if value_of(kf).is_none() {
            return Err(RecordError::missing(document, kf.name()));
        }
    }

    let malformed = |kf: KnownField| {
        move |reason: String| RecordError::malformed(document, kf.name(), reason)
    };
    let required = |kf: KnownField| value_of(kf).unwrap_or_default();

    let number = parse_number(required(KnownField::Number)).map_err(malformed(KnownField::Number))?;
    let title = required(KnownField::Title).to_string();
    let status: Status = required(KnownField::Status)
        .parse()
        .map_err(malformed(KnownField::Status))?;
    let proposal_type: ProposalType = required(KnownField::Type)
        .parse()
        .map_err(malformed(KnownField::Type))?;
    let created: HeaderDate = required(KnownField::Created)
        .parse()
        .map_err(malformed(KnownField::Created))?;

    let mut record = ProposalRecord::new(number, title, status, proposal_type, created);

    if let Some(v) = value_of(KnownField::Author) {
        record.author = split_top_level_commas(v);
    }
    if let Some(v) = value_of(KnownField::Replaces) {
        record.replaces = Some(parse_number(v).map_err(malformed(KnownField::Replaces))?);
    }
    if let Some(v) = value_of(KnownField::SupersededBy) {
        record.superseded_by =
            Some(parse_number(v).map_err(malformed(KnownField::SupersededBy))?);
    }
    if let Some(v) = value_of(KnownField::PostHistory) {
        record.post_history = split_top_level_commas(v)
            .iter()
            .map(|entry| entry.parse::<PostEntry>())
            .collect::<Result<_, _>>()
            .map_err(malformed(KnownField::PostHistory))?;
    }
    if let Some(v) = value_of(KnownField::Requires) {
        record.requires = v
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_number)
            .collect::<Result<_, _>>()
            .map_err(malformed(KnownField::Requires))?;
    }

    record.python_version = value_of(KnownField::PythonVersion)
        .map(str::to_string)
        .and_then(non_empty);
    record.discussions_to = value_of(KnownField::DiscussionsTo)
        .map(str::to_string)
        .and_then(non_empty);
    record.resolution = value_of(KnownField::Resolution)
        .map(str::to_string)
        .and_then(non_empty);
    record.content_type = value_of(KnownField::ContentType)
        .map(str::to_string)
        .and_then(non_empty);
    record.extra = extra;

    Ok(record)
}
