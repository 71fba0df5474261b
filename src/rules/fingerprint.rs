//! Deterministic issue fingerprints.
//!
//! A fingerprint identifies one issue instance across runs so that an
//! external baseline can suppress issues that were already accepted. It only
//! depends on the rule code, the root-relative file path and an anchor (a
//! symbol name when one exists, the line otherwise), never on wall-clock time
//! or scan order.

use sha2::{Digest, Sha256};

/// Length of a fingerprint in hex characters.
pub const FINGERPRINT_LEN: usize = 32;

/// What an issue is anchored to within its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor<'a> {
    /// A named symbol (class, imported module); survives unrelated edits.
    Symbol(&'a str),
    /// A line number, for issues without a stable name.
    Line(usize),
}

impl std::fmt::Display for Anchor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Anchor::Symbol(name) => write!(f, "symbol:{}", name),
            Anchor::Line(line) => write!(f, "line:{}", line),
        }
    }
}

/// Compute the fingerprint for `(rule_code, relative_path, anchor)`.
///
/// Backslashes in `relative_path` are normalised so the value is identical
/// on every platform.
pub fn fingerprint(rule_code: &str, relative_path: &str, anchor: Anchor<'_>) -> String {
    let path = relative_path.replace('\\', "/");
    let anchor = anchor.to_string();

    let mut hasher = Sha256::new();
    for part in [rule_code, path.as_str(), anchor.as_str()] {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    let hash = hasher.finalize();
    hex::encode(&hash[..FINGERPRINT_LEN / 2])
}
