//! pipeline.rs - The filter pipeline and its verdict types.
//!
//! Defines the `MessageFilter` trait and the concrete `FilterPipeline`
//! that runs a message through the three checks in order: mixed-script
//! detection, allowed-content classification, and phrase substitution,
//! short-circuiting on the first block. The pipeline is the entire
//! externally observable contract of the core: one deterministic function
//! from message text to `Verdict`, free of I/O.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::censor::CensorOutcome;
use crate::classifier::ContentClassifier;
use crate::config::FilterConfig;
use crate::errors::ConfigError;
use crate::generation::ConfigGeneration;
use crate::script;

/// Why a message was refused delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BlockReason {
    /// Characters from two incompatible script buckets appeared together.
    MixedScript,
    /// The content failed every branch of the allow policy.
    DisallowedContent,
    /// A banned phrase with an empty replacement matched; carries the
    /// triggering phrase.
    BannedPhrase(String),
}

impl BlockReason {
    /// Stable machine-readable reason tag for operator-facing reporting.
    pub fn tag(&self) -> &'static str {
        match self {
            BlockReason::MixedScript => "mixed-script",
            BlockReason::DisallowedContent => "disallowed-characters",
            BlockReason::BannedPhrase(_) => "banned-phrase",
        }
    }
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BlockReason::BannedPhrase(phrase) => write!(f, "banned-phrase ({phrase})"),
            other => f.write_str(other.tag()),
        }
    }
}

/// The three-way outcome of classifying one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Verdict {
    /// Deliver the message unchanged.
    Pass,
    /// Refuse delivery; the caller decides how to notify anyone.
    Block { reason: BlockReason },
    /// Deliver the rewritten text instead of the original.
    Rewrite { text: String },
}

/// A trait for anything that can turn message text into a `Verdict`.
///
/// This decouples message-delivery callers from the concrete pipeline,
/// allowing alternative filter implementations to be swapped in.
pub trait MessageFilter: Send + Sync {
    /// Classifies `text`. Total: never fails, never panics, for any input.
    fn classify(&self, text: &str) -> Verdict;
}

/// The concrete pipeline over one configuration generation snapshot.
///
/// Holding the snapshot by `Arc` means a pipeline constructed before a
/// reload keeps classifying against its own, fully consistent generation.
#[derive(Debug, Clone)]
pub struct FilterPipeline {
    generation: Arc<ConfigGeneration>,
}

impl FilterPipeline {
    pub fn new(generation: Arc<ConfigGeneration>) -> Self {
        Self { generation }
    }

    /// The generation this pipeline classifies against.
    pub fn generation(&self) -> &Arc<ConfigGeneration> {
        &self.generation
    }

    /// Classifies a raw byte message. Invalid UTF-8 is classified
    /// conservatively as disallowed content rather than causing a fault.
    pub fn classify_bytes(&self, raw: &[u8]) -> Verdict {
        match std::str::from_utf8(raw) {
            Ok(text) => self.classify(text),
            Err(_) => Verdict::Block {
                reason: BlockReason::DisallowedContent,
            },
        }
    }
}

impl MessageFilter for FilterPipeline {
    fn classify(&self, text: &str) -> Verdict {
        if script::is_mixed_script(text) {
            debug!("Message blocked: mixed scripts detected.");
            return Verdict::Block {
                reason: BlockReason::MixedScript,
            };
        }

        let classifier = ContentClassifier::new(self.generation.catalog());
        if !classifier.is_allowed(text) {
            debug!("Message blocked: content failed the allow policy.");
            return Verdict::Block {
                reason: BlockReason::DisallowedContent,
            };
        }

        match self.generation.censor().apply(text) {
            CensorOutcome::Clean => Verdict::Pass,
            CensorOutcome::Blocked { phrase } => Verdict::Block {
                reason: BlockReason::BannedPhrase(phrase),
            },
            CensorOutcome::Rewritten { text } => Verdict::Rewrite { text },
        }
    }
}

/// Builds a one-off generation from `config` and classifies `text` with it.
///
/// Convenience entry point for callers that do not manage a long-lived
/// `FilterManager`; repeated use pays the phrase-table build on every call
/// (the pattern catalog itself is served from the global cache).
pub fn classify_message(config: &FilterConfig, text: &str) -> Result<Verdict, ConfigError> {
    let generation = Arc::new(ConfigGeneration::build(0, config)?);
    Ok(FilterPipeline::new(generation).classify(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BadwordEntry;

    fn pipeline(badwords: &[(&str, &str)]) -> FilterPipeline {
        let config = FilterConfig {
            badwords: badwords
                .iter()
                .map(|(text, replace)| BadwordEntry {
                    text: text.to_string(),
                    replace: replace.to_string(),
                })
                .collect(),
            ..FilterConfig::default()
        };
        let generation = Arc::new(ConfigGeneration::build(0, &config).unwrap());
        FilterPipeline::new(generation)
    }

    #[test]
    fn script_check_runs_before_phrase_check() {
        // "badword" would block on its own, but the mixed-script check wins.
        let pipeline = pipeline(&[("badword", "")]);
        assert_eq!(
            pipeline.classify("badword é中"),
            Verdict::Block {
                reason: BlockReason::MixedScript
            }
        );
    }

    #[test]
    fn disallowed_content_blocks_before_phrases() {
        let pipeline = pipeline(&[("badword", "")]);
        assert_eq!(
            pipeline.classify("привет badword"),
            Verdict::Block {
                reason: BlockReason::DisallowedContent
            }
        );
    }

    #[test]
    fn invalid_utf8_is_disallowed_not_a_fault() {
        let pipeline = pipeline(&[]);
        assert_eq!(
            pipeline.classify_bytes(&[0x68, 0x69, 0xFF, 0xFE]),
            Verdict::Block {
                reason: BlockReason::DisallowedContent
            }
        );
        assert_eq!(pipeline.classify_bytes(b"hi"), Verdict::Pass);
    }

    #[test]
    fn block_reason_tags_are_stable() {
        assert_eq!(BlockReason::MixedScript.tag(), "mixed-script");
        assert_eq!(BlockReason::DisallowedContent.tag(), "disallowed-characters");
        assert_eq!(
            BlockReason::BannedPhrase("x".to_string()).tag(),
            "banned-phrase"
        );
        assert_eq!(
            BlockReason::BannedPhrase("x".to_string()).to_string(),
            "banned-phrase (x)"
        );
    }

    #[test]
    fn classify_message_one_shot() {
        let config = FilterConfig {
            badwords: vec![BadwordEntry {
                text: "heck".to_string(),
                replace: "h*ck".to_string(),
            }],
            ..FilterConfig::default()
        };
        assert_eq!(
            classify_message(&config, "what the heck").unwrap(),
            Verdict::Rewrite {
                text: "what the h*ck".to_string()
            }
        );
    }
}
