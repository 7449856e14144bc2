//! Header digests.
//!
//! A digest identifies the *parsed* header, not the file: it is computed over
//! the canonical formatting, so whitespace, key spelling and field order in
//! the source do not change it, while any change to a field value does.
//!
//! - algorithm: **FNV-1a 64-bit**
//! - input: UTF-8 bytes of [`crate::format_header`]
//! - output: `"fnv1a64:<16 lowercase hex digits>"`
//!
//! Not a security primitive.

use crate::format::format_header;
use crate::record::ProposalRecord;

pub const DIGEST_PREFIX: &str = "fnv1a64:";

pub fn fnv1a64_digest_bytes(bytes: &[u8]) -> String {
    const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x00000100000001b3;

    let mut hash = FNV_OFFSET_BASIS;
    for b in bytes {
        hash ^= (*b) as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }

    format!("{DIGEST_PREFIX}{hash:016x}")
}

pub fn header_digest(record: &ProposalRecord) -> String {
    fnv1a64_digest_bytes(format_header(record).as_bytes())
}
