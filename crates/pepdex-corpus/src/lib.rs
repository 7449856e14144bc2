//! Proposal corpus ingestion
//!
//! Reads a directory of proposal documents and turns it into:
//! - parsed [`pepdex_record::ProposalRecord`]s, one per document,
//! - per-document failures (never fatal to the rest of the batch),
//! - cross-reference issues across the parsed records,
//! - an `index.json` snapshot of all of the above.
//!
//! Parsing itself is pure and lives in `pepdex-record`; this crate owns IO.

pub mod batch;
pub mod index;
pub mod scan;

pub use batch::*;
pub use index::*;
pub use scan::*;
