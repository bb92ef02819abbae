// chatsieve-core/src/lib.rs
//! # ChatSieve Core Library
//!
//! `chatsieve-core` provides the fundamental, server-independent logic for
//! deciding whether an outbound chat message is well-formed enough to
//! deliver, and if not, whether to block it or rewrite it. It detects
//! mixed-script spoofing, classifies non-ASCII content against a layered
//! allow policy (printable-ASCII fast path, allow-list pattern scan,
//! emoji/emoticon whole-string checks), and performs overlap-safe
//! banned-phrase substitution.
//!
//! The library is pure CPU work: no I/O at classification time, no
//! suspension points, and no runtime error path. A message either passes,
//! is blocked with a structured reason, or comes back rewritten. All
//! fallibility is concentrated at configuration time.
//!
//! ## Modules
//!
//! * `config`: Defines `FilterConfig`, the badword table and pattern sources.
//! * `script`: The mixed-script detection heuristic.
//! * `catalog`: Compiles and caches the allow-list/emoji/emoticon patterns.
//! * `classifier`: The layered allow/deny decision for message content.
//! * `censor`: Banned-phrase detection and substitution.
//! * `pipeline`: The `MessageFilter` trait, `FilterPipeline`, and `Verdict`.
//! * `generation`: Immutable config generations and the atomic-swap manager.
//! * `errors`: The structured `ConfigError` type.
//!
//! ## Usage Example
//!
//! ```rust
//! use chatsieve_core::{BadwordEntry, FilterConfig, FilterManager, Verdict};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     // 1. Start from the embedded defaults and add an operator rule.
//!     let mut config = FilterConfig::load_defaults()?;
//!     config.badwords.push(BadwordEntry {
//!         text: "heck".to_string(),
//!         replace: "h*ck".to_string(),
//!     });
//!
//!     // 2. Build the manager; it owns the active configuration generation.
//!     let manager = FilterManager::new(config)?;
//!
//!     // 3. Classify outbound messages.
//!     match manager.classify("what the heck") {
//!         Verdict::Pass => println!("deliver unchanged"),
//!         Verdict::Rewrite { text } => println!("deliver rewritten: {text}"),
//!         Verdict::Block { reason } => println!("refuse delivery: {reason}"),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Configuration errors ([`ConfigError`]) are fatal to the load or reload
//! that carried them and leave the previously active generation untouched.
//! Classification itself is total: any `&str` (and, via
//! [`FilterPipeline::classify_bytes`], any `&[u8]`) yields a [`Verdict`].
//!
//! ## Design Principles
//!
//! * **Immutable generations:** compiled patterns and the phrase table are
//!   built together and published atomically; in-flight classification
//!   never observes a half-updated configuration.
//! * **Stateless classification:** one snapshot in, one verdict out.
//! * **Caller-owned policy:** operator notification, exemptions, and
//!   delivery targets stay with the surrounding server; the core only
//!   returns structured reasons.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod catalog;
pub mod censor;
pub mod classifier;
pub mod config;
pub mod errors;
pub mod generation;
pub mod pipeline;
pub mod script;

/// Re-exports the public configuration types and functions.
pub use config::{
    merge_configs, BadwordEntry, FilterConfig, PatternSources, DEFAULT_ALLOWLIST_PATTERN,
    DEFAULT_EMOJI_PATTERN, DEFAULT_EMOTICON_PATTERN, MAX_PATTERN_LENGTH,
};

/// Re-exports the custom error types for clear error reporting.
pub use errors::{ConfigError, PatternKind};

/// Re-exports the mixed-script detection heuristic.
pub use script::is_mixed_script;

/// Re-exports the pattern catalog and its compilation/caching entry points.
pub use catalog::{compile_with_artifact, get_or_compile, write_artifact, PatternCatalog};

/// Re-exports the allow/deny content classifier.
pub use classifier::ContentClassifier;

/// Re-exports the banned-phrase table and its outcome type.
pub use censor::{CensorOutcome, PhraseCensor};

/// Re-exports the filter pipeline, verdict types, and the one-shot helper.
pub use pipeline::{classify_message, BlockReason, FilterPipeline, MessageFilter, Verdict};

/// Re-exports configuration-generation management.
pub use generation::{ConfigGeneration, FilterManager};
