//! Commands that rewrite a document's header block.
//!
//! Every edit parses the header, changes the record, and writes the canonical
//! header back in front of the untouched body. A document that does not parse
//! is never rewritten.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use pepdex_corpus::document_id_for;
use pepdex_record::date::{HeaderDate, PostEntry};
use pepdex_record::{parse_record, rewrite_header, ProposalRecord, Registry, Status};

/// Where an edited document goes.
#[derive(Debug, Clone, Copy)]
pub enum Output<'a> {
    /// Print to stdout.
    Stdout,
    /// Overwrite the input.
    InPlace,
    File(&'a Path),
}

impl<'a> Output<'a> {
    pub fn from_flags(out: Option<&'a Path>, write: bool) -> Result<Self> {
        match (out, write) {
            (Some(_), true) => Err(anyhow!("cannot use --write and --out together")),
            (Some(path), false) => Ok(Output::File(path)),
            (None, true) => Ok(Output::InPlace),
            (None, false) => Ok(Output::Stdout),
        }
    }
}

fn load(input: &Path) -> Result<(String, ProposalRecord)> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let record = parse_record(&text, &document_id_for(input))?;
    Ok((text, record))
}

fn emit(input: &Path, rendered: &str, output: Output<'_>) -> Result<()> {
    match output {
        Output::Stdout => {
            print!("{rendered}");
        }
        Output::InPlace => {
            std::fs::write(input, rendered)
                .with_context(|| format!("failed to write {}", input.display()))?;
            println!("{} {}", "updated".green(), input.display());
        }
        Output::File(out) => {
            std::fs::write(out, rendered)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("{} {}", "wrote".green(), out.display());
        }
    }
    Ok(())
}

pub fn cmd_fmt(input: &Path, output: Output<'_>) -> Result<()> {
    let (text, record) = load(input)?;
    let rendered = rewrite_header(&text, &record);
    if rendered == text {
        tracing::debug!(path = %input.display(), "header already canonical");
    }
    emit(input, &rendered, output)
}

pub fn cmd_advance(input: &Path, to: Status, output: Output<'_>) -> Result<()> {
    let (text, mut record) = load(input)?;
    let from = record.status;
    record.advance_status(to)?;
    tracing::info!(number = record.number(), %from, %to, "status advanced");
    emit(input, &rewrite_header(&text, &record), output)
}

pub fn cmd_post(
    input: &Path,
    date: HeaderDate,
    link: Option<String>,
    output: Output<'_>,
) -> Result<()> {
    let (text, mut record) = load(input)?;
    record.record_post(PostEntry { date, link })?;
    tracing::info!(number = record.number(), %date, "post date recorded");
    emit(input, &rewrite_header(&text, &record), output)
}

/// Link `new` as the replacement of `old` and rewrite both files in place.
pub fn cmd_supersede(old: &Path, new: &Path) -> Result<()> {
    let (old_text, old_record) = load(old)?;
    let (new_text, new_record) = load(new)?;
    let (old_number, new_number) = (old_record.number(), new_record.number());

    let mut registry = Registry::new();
    registry.insert(old_record)?;
    registry.insert(new_record)?;
    registry.link_replacement(old_number, new_number)?;

    for (path, text, number) in [(old, &old_text, old_number), (new, &new_text, new_number)] {
        let record = registry
            .get(number)
            .ok_or_else(|| anyhow!("proposal {number} vanished from the registry"))?;
        emit(path, &rewrite_header(text, record), Output::InPlace)?;
    }
    println!(
        "{} {} {} {}",
        "linked".green().bold(),
        new_number,
        "replaces".cyan(),
        old_number
    );
    Ok(())
}
