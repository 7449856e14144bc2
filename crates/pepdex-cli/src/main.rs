//! pepdex CLI
//!
//! Command-line interface for proposal header blocks:
//! - Parsing one document into its record (`parse`)
//! - Checking a corpus: header errors + cross-references (`check`)
//! - Writing a JSON index of a corpus (`index`)
//! - Canonicalizing and updating headers (`fmt`, `advance`, `post`, `supersede`)

use anyhow::{anyhow, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use pepdex_corpus::{collect_documents, parse_batch, write_index, BatchReport, IndexFileV1};
use pepdex_record::date::HeaderDate;
use pepdex_record::{parse_record, ProposalRecord, Status};

mod config;
mod header_edit;

use config::ScanArgs;
use header_edit::Output;

#[derive(Parser)]
#[command(name = "pepdex")]
#[command(author, version, about = "pepdex: proposal header parser and corpus checker")]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). `PEPDEX_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one document and print its header record.
    Parse {
        /// Input document.
        input: PathBuf,
        /// Print the record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check documents and directories: header errors and cross-references.
    ///
    /// Exits non-zero when any document fails to parse or any link issue is
    /// found (unless `--no-fail`).
    Check {
        /// Files and/or directories.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[command(flatten)]
        scan: ScanArgs,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
        /// Always exit 0.
        #[arg(long)]
        no_fail: bool,
    },

    /// Parse a corpus directory and write `index.json`.
    Index {
        /// Corpus root.
        root: PathBuf,
        /// Output index file.
        #[arg(short, long, default_value = "index.json")]
        out: PathBuf,
        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Rewrite a document's header in canonical form.
    Fmt {
        input: PathBuf,
        /// Write to this file instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Overwrite the input.
        #[arg(long)]
        write: bool,
    },

    /// Move a proposal to a new status (forward only).
    Advance {
        input: PathBuf,
        /// Target status, e.g. `Accepted`.
        #[arg(long)]
        to: Status,
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(long)]
        write: bool,
    },

    /// Append a Post-History date (DD-Mon-YYYY).
    Post {
        input: PathBuf,
        #[arg(long)]
        date: HeaderDate,
        /// Discussion URL; the entry is written as a reST link.
        #[arg(long)]
        link: Option<String>,
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(long)]
        write: bool,
    },

    /// Mark NEW as replacing OLD; both files are rewritten in place.
    Supersede { old: PathBuf, new: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    config::init_logging(cli.verbose)?;

    match cli.command {
        Commands::Parse { input, json } => cmd_parse(&input, json),
        Commands::Check {
            inputs,
            scan,
            json,
            no_fail,
        } => cmd_check(&inputs, &scan, json, no_fail),
        Commands::Index { root, out, scan } => cmd_index(&root, &out, &scan),
        Commands::Fmt { input, out, write } => {
            header_edit::cmd_fmt(&input, Output::from_flags(out.as_deref(), write)?)
        }
        Commands::Advance {
            input,
            to,
            out,
            write,
        } => header_edit::cmd_advance(&input, to, Output::from_flags(out.as_deref(), write)?),
        Commands::Post {
            input,
            date,
            link,
            out,
            write,
        } => header_edit::cmd_post(&input, date, link, Output::from_flags(out.as_deref(), write)?),
        Commands::Supersede { old, new } => header_edit::cmd_supersede(&old, &new),
    }
}

fn unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        .to_string()
}

fn print_record(record: &ProposalRecord) {
    println!("  Number: {}", record.number().to_string().cyan());
    println!("  Title: {}", record.title);
    println!("  Status: {}", record.status.to_string().yellow());
    println!("  Type: {}", record.proposal_type);
    println!("  Created: {}", record.created);
    if !record.author.is_empty() {
        println!("  Authors: {}", record.author.join("; "));
    }
    if let Some(v) = &record.python_version {
        println!("  Python-Version: {v}");
    }
    if let Some(n) = record.replaces {
        println!("  Replaces: {n}");
    }
    if let Some(n) = record.superseded_by {
        println!("  Superseded-By: {n}");
    }
    if !record.post_history.is_empty() {
        println!("  Posts: {}", record.post_history.len());
    }
    if !record.extra.is_empty() {
        println!("  Other fields: {}", record.extra.len());
    }
}

fn cmd_parse(input: &PathBuf, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(input)?;
    let record = parse_record(&text, &pepdex_corpus::document_id_for(input))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("{} {}", "Parsed".green().bold(), input.display());
    print_record(&record);
    Ok(())
}

fn print_report(report: &BatchReport) {
    for unreadable in &report.unreadable {
        println!(
            "  {} {}: {}",
            "✗".red(),
            unreadable.path.display(),
            unreadable.reason
        );
    }
    for failed in &report.failed {
        println!(
            "  {} {}: {}",
            "✗".red(),
            failed.path.display(),
            failed.error
        );
    }
    for issue in &report.link_issues {
        println!("  {} {}", "!".yellow(), issue);
    }
    println!(
        "  {} parsed, {} failed, {} link issue(s)",
        report.parsed.len().to_string().green(),
        (report.failed.len() + report.unreadable.len()).to_string().red(),
        report.link_issues.len().to_string().yellow()
    );
}

fn cmd_check(inputs: &[PathBuf], scan: &ScanArgs, json: bool, no_fail: bool) -> Result<()> {
    let options = scan.to_options()?;
    let collected = collect_documents(inputs, &options)?;
    let mut report = parse_batch(&collected.documents);
    report.unreadable = collected.unreadable;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} {} document(s)",
            "Checking".green().bold(),
            collected.documents.len()
        );
        print_report(&report);
    }

    if !report.is_clean() && !no_fail {
        return Err(anyhow!(
            "check found {} failed document(s), {} unreadable input(s) and {} link issue(s)",
            report.failed.len(),
            report.unreadable.len(),
            report.link_issues.len()
        ));
    }
    Ok(())
}

fn cmd_index(root: &PathBuf, out: &PathBuf, scan: &ScanArgs) -> Result<()> {
    println!("{} {}", "Indexing".green().bold(), root.display());

    let options = scan.to_options()?;
    let docs = pepdex_corpus::scan_corpus(root, &options)?;
    let report = parse_batch(&docs);
    let index = IndexFileV1::from_report(&report, &root.to_string_lossy(), unix_seconds());
    write_index(&index, out)?;

    print_report(&report);
    println!("  {} {}", "→".cyan(), out.display());
    Ok(())
}
