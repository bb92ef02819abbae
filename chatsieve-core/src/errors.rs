//! errors.rs - Custom error types for the chatsieve-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//! All variants describe configuration-time failures: message classification
//! itself is total and has no error type.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;
use thiserror::Error;

/// Identifies which of the three catalog patterns an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    Allowlist,
    Emoji,
    Emoticon,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PatternKind::Allowlist => write!(f, "allowlist"),
            PatternKind::Emoji => write!(f, "emoji"),
            PatternKind::Emoticon => write!(f, "emoticon"),
        }
    }
}

/// This enum represents all possible error types in the `chatsieve-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions. This prevents them from
/// matching all variants exhaustively, thus avoiding breaking changes.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    /// A configured badword entry has empty match text. The reload that
    /// carried it is rejected wholesale.
    #[error("Badword entry {index} has empty match text")]
    EmptyBadwordText { index: usize },

    /// One of the three catalog patterns failed to compile.
    #[error("Failed to compile {kind} pattern: {source}")]
    PatternCompile {
        kind: PatternKind,
        #[source]
        source: regex::Error,
    },

    /// A catalog pattern exceeds the maximum allowed source length.
    #[error("{kind} pattern length ({len}) exceeds maximum allowed ({max})")]
    PatternLengthExceeded {
        kind: PatternKind,
        len: usize,
        max: usize,
    },

    /// A badword phrase failed to compile into a matcher.
    #[error("Failed to compile badword phrase '{phrase}': {source}")]
    BadwordCompile {
        phrase: String,
        #[source]
        source: regex::Error,
    },

    /// A persisted allow-list matcher artifact does not correspond to the
    /// currently configured pattern, or is corrupt. Recovered internally by
    /// recompiling; never fatal to a reload.
    #[error("Cached matcher artifact does not match the configured pattern")]
    CacheArtifactInvalid,

    #[error("An unexpected I/O error occurred: {0}")]
    Io(#[from] std::io::Error),
}
