//! Proposal header records
//!
//! A proposal document starts with a block of `Key: Value` lines terminated by
//! a blank line. This crate turns that block into a typed [`ProposalRecord`]
//! and back, and owns the rules that govern records over their lifetime:
//!
//! - `header`: header block → record (pure, no IO)
//! - `format`: record → canonical header block
//! - `lifecycle`: one-directional status transitions
//! - `registry`: a set of records and their `Replaces` / `Superseded-By` links
//! - `digest`: stable identity of a parsed header
//!
//! Filesystem access lives in `pepdex-corpus`.

pub mod date;
pub mod digest;
pub mod error;
pub mod format;
pub mod header;
pub mod lifecycle;
pub mod record;
pub mod registry;

pub use error::{LifecycleError, RecordError, RegistryError};
pub use format::{format_header, rewrite_header};
pub use header::{parse_record, split_document};
pub use record::{ExtraField, ProposalRecord, ProposalType, Status};
pub use registry::{LinkIssue, Registry};
