//! censor.rs - Banned-phrase detection and substitution.
//!
//! Holds the compiled banned-phrase table for one configuration generation
//! and performs repeated, overlap-safe substitution over a message. Matching
//! is deliberately substring-based with no word boundaries ("ass" matches
//! inside "class"); the table is the operator's blunt instrument.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

use crate::config::BadwordEntry;
use crate::errors::ConfigError;

/// Outcome of running the phrase table over one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CensorOutcome {
    /// No phrase matched; the message is untouched.
    Clean,
    /// A phrase with an empty replacement matched: the message is banned
    /// outright.
    Blocked { phrase: String },
    /// At least one substitution was made and no blocking phrase fired.
    Rewritten { text: String },
}

/// One compiled banned-phrase rule.
#[derive(Debug, Clone)]
struct PhraseRule {
    phrase: String,
    matcher: Regex,
    replace: String,
}

/// The compiled banned-phrase table.
///
/// Built wholesale from configuration entries; never mutated afterwards.
/// Entries are tried in insertion order, and a later config entry for the
/// same (case-insensitive) phrase overwrites the earlier one in place.
#[derive(Debug, Clone, Default)]
pub struct PhraseCensor {
    rules: Vec<PhraseRule>,
}

impl PhraseCensor {
    /// Compiles the phrase table from configuration entries.
    ///
    /// An entry with empty match text rejects the whole build: silently
    /// skipping it would leave the operator believing a ban is active.
    pub fn build(entries: &[BadwordEntry]) -> Result<Self, ConfigError> {
        let mut rules: Vec<PhraseRule> = Vec::with_capacity(entries.len());
        let mut index_by_key: HashMap<String, usize> = HashMap::new();

        for (index, entry) in entries.iter().enumerate() {
            if entry.text.is_empty() {
                return Err(ConfigError::EmptyBadwordText { index });
            }

            let matcher = RegexBuilder::new(&regex::escape(&entry.text))
                .case_insensitive(true)
                .build()
                .map_err(|source| ConfigError::BadwordCompile {
                    phrase: entry.text.clone(),
                    source,
                })?;

            let rule = PhraseRule {
                phrase: entry.text.clone(),
                matcher,
                replace: entry.replace.clone(),
            };

            let key = entry.text.to_lowercase();
            match index_by_key.get(&key) {
                Some(&existing) => {
                    debug!("Later badword entry overrides '{}'.", entry.text);
                    rules[existing] = rule;
                }
                None => {
                    index_by_key.insert(key, rules.len());
                    rules.push(rule);
                }
            }
        }

        Ok(Self { rules })
    }

    /// The number of active phrase rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Runs the phrase table over `text`.
    ///
    /// Phrases are visited in table order, each operating on the cumulative
    /// rewrite so far. For a non-empty replacement every occurrence is
    /// spliced out; the next search resumes just past the spliced-in text,
    /// so the cursor strictly advances even when the replacement contains
    /// the phrase. An empty replacement blocks on the first occurrence.
    ///
    /// Single-pass semantics: re-applying to a `Rewritten` output yields
    /// `Clean` unless a replacement itself reintroduced a banned phrase.
    pub fn apply(&self, text: &str) -> CensorOutcome {
        let mut out = text.to_string();
        let mut rewritten = false;

        for rule in &self.rules {
            if rule.replace.is_empty() {
                if rule.matcher.is_match(&out) {
                    debug!("Message blocked by banned phrase '{}'.", rule.phrase);
                    return CensorOutcome::Blocked {
                        phrase: rule.phrase.clone(),
                    };
                }
                continue;
            }

            let mut cursor = 0;
            while cursor <= out.len() {
                let Some(m) = rule.matcher.find_at(&out, cursor) else {
                    break;
                };
                let start = m.start();
                let end = m.end();
                out.replace_range(start..end, &rule.replace);
                rewritten = true;
                cursor = start + rule.replace.len();
            }
        }

        if rewritten {
            CensorOutcome::Rewritten { text: out }
        } else {
            CensorOutcome::Clean
        }
    }
}
