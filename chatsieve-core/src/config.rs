//! Configuration management for `chatsieve-core`.
//!
//! This module defines the core data structures for the banned-phrase table
//! and the catalog pattern sources. It handles serialization/deserialization
//! of YAML configurations and provides utilities for loading and merging
//! these configs. Structural validation (empty phrase text, pattern
//! compilation) happens when a configuration generation is built, so that a
//! rejected reload leaves the previous generation active.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maximum allowed length for a catalog pattern source string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Default pattern for whole-string emoji content.
pub const DEFAULT_EMOJI_PATTERN: &str = r"^[\p{Emoji}]+$";

/// Default allow-list pattern: Latin and common-script text.
pub const DEFAULT_ALLOWLIST_PATTERN: &str = r"^[\p{Latin}\p{Common} ]+$";

/// Default pattern for classic ASCII-art emoticons (`:)`, `;-P`, `O;3`, ...).
pub const DEFAULT_EMOTICON_PATTERN: &str = r"[:;][-~]?[)DdpP]|O[:;]3";

/// One banned-phrase entry: a phrase to find and the text to splice in for
/// it. An empty `replace` means the phrase is an outright ban, not a
/// deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BadwordEntry {
    /// The phrase to match, case-insensitively, anywhere in a message.
    pub text: String,
    /// The replacement text. Empty = block the message outright.
    pub replace: String,
}

/// The three pattern source strings the catalog compiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct PatternSources {
    /// Whole-string matcher for emoji-only messages.
    pub emoji: String,
    /// Contains-matcher marking non-ASCII content as permitted.
    pub allowlist: String,
    /// Whole-string matcher for emoticon-only messages.
    pub emoticon: String,
}

impl Default for PatternSources {
    fn default() -> Self {
        Self {
            emoji: DEFAULT_EMOJI_PATTERN.to_string(),
            allowlist: DEFAULT_ALLOWLIST_PATTERN.to_string(),
            emoticon: DEFAULT_EMOTICON_PATTERN.to_string(),
        }
    }
}

/// Represents the top-level configuration structure for the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    /// The banned-phrase table, in the order entries should be tried.
    pub badwords: Vec<BadwordEntry>,
    /// Catalog pattern sources.
    pub patterns: PatternSources,
}

impl FilterConfig {
    /// Loads a filter configuration from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading filter configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: FilterConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        info!(
            "Loaded {} badword entries from {}.",
            config.badwords.len(),
            path.display()
        );
        Ok(config)
    }

    /// Loads the default filter configuration from the embedded YAML.
    pub fn load_defaults() -> Result<Self> {
        debug!("Loading default filter configuration from embedded string...");
        let default_yaml = include_str!("../config/default_filter.yaml");
        let config: FilterConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default configuration")?;
        Ok(config)
    }
}

/// Merges a user-provided configuration over the defaults.
///
/// User badword entries overwrite default entries with the same
/// (case-insensitive) phrase text in place, preserving the default entry's
/// position; new phrases are appended. The user's pattern sources replace
/// the defaults wholesale (absent fields already carry the default values
/// via serde).
pub fn merge_configs(
    default_config: FilterConfig,
    user_config: Option<FilterConfig>,
) -> FilterConfig {
    let mut badwords = default_config.badwords;
    let mut patterns = default_config.patterns;

    if let Some(user_cfg) = user_config {
        debug!("Merging {} user badword entries.", user_cfg.badwords.len());
        for entry in user_cfg.badwords {
            let key = entry.text.to_lowercase();
            match badwords.iter().position(|e| e.text.to_lowercase() == key) {
                Some(idx) => {
                    debug!("User config overrides badword entry '{}'.", entry.text);
                    badwords[idx] = entry;
                }
                None => badwords.push(entry),
            }
        }
        patterns = user_cfg.patterns;
    }

    FilterConfig { badwords, patterns }
}
