//! catalog.rs - Manages the compilation and caching of the pattern catalog.
//!
//! The catalog holds the three compiled patterns one configuration
//! generation needs: the permissive allow-list matcher (a *contains* check)
//! and the emoji and emoticon matchers (anchored whole-string checks). A
//! thread-safe, global cache avoids redundant recompilation when a reload
//! carries unchanged pattern sources, and an optional on-disk artifact lets
//! a restarted process validate that its allow-list source is unchanged
//! before trusting previously built state.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::config::{PatternSources, MAX_PATTERN_LENGTH};
use crate::errors::{ConfigError, PatternKind};

/// The compiled pattern triple for one configuration generation.
///
/// Immutable once compiled; matching operations are pure reads, so one
/// catalog may be shared freely across concurrent classification calls.
#[derive(Debug)]
pub struct PatternCatalog {
    allowlist: Regex,
    emoji: Regex,
    emoticon: Regex,
    sources: PatternSources,
}

impl PatternCatalog {
    /// Compiles the three patterns from their sources.
    ///
    /// Any failure names the offending pattern and aborts the whole compile,
    /// so a half-built catalog can never become active.
    pub fn compile(sources: &PatternSources) -> Result<Self, ConfigError> {
        debug!("Compiling pattern catalog.");
        let allowlist = compile_contains(&sources.allowlist, PatternKind::Allowlist)?;
        let emoji = compile_full_match(&sources.emoji, PatternKind::Emoji)?;
        let emoticon = compile_full_match(&sources.emoticon, PatternKind::Emoticon)?;

        Ok(Self {
            allowlist,
            emoji,
            emoticon,
            sources: sources.clone(),
        })
    }

    /// Reports whether the allow-list pattern fires anywhere in `text`.
    /// This is the permissive fast path, not a whole-string check.
    pub fn matches_allowlist(&self, text: &str) -> bool {
        self.allowlist.is_match(text)
    }

    /// Reports whether the emoji pattern accounts for the entire input.
    pub fn is_emoji_only(&self, text: &str) -> bool {
        self.emoji.is_match(text)
    }

    /// Reports whether the emoticon pattern accounts for the entire input.
    pub fn is_emoticon_only(&self, text: &str) -> bool {
        self.emoticon.is_match(text)
    }

    /// The pattern sources this catalog was compiled from.
    pub fn sources(&self) -> &PatternSources {
        &self.sources
    }
}

fn check_length(pattern: &str, kind: PatternKind) -> Result<(), ConfigError> {
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(ConfigError::PatternLengthExceeded {
            kind,
            len: pattern.len(),
            max: MAX_PATTERN_LENGTH,
        });
    }
    Ok(())
}

/// Compiles a pattern for contains-style matching: case-insensitive and
/// Unicode-aware.
fn compile_contains(pattern: &str, kind: PatternKind) -> Result<Regex, ConfigError> {
    check_length(pattern, kind)?;
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
        .build()
        .map_err(|source| ConfigError::PatternCompile { kind, source })
}

/// Compiles a pattern so that a match must account for the entire input.
fn compile_full_match(pattern: &str, kind: PatternKind) -> Result<Regex, ConfigError> {
    check_length(pattern, kind)?;
    let anchored = format!(r"\A(?:{pattern})\z");
    RegexBuilder::new(&anchored)
        .size_limit(10 * (1 << 20))
        .build()
        .map_err(|source| ConfigError::PatternCompile { kind, source })
}

lazy_static! {
    /// A thread-safe, global cache for compiled catalogs.
    /// The key is a hash of the three pattern source strings.
    static ref CATALOG_CACHE: RwLock<HashMap<u64, Arc<PatternCatalog>>> =
        RwLock::new(HashMap::new());
}

fn hash_sources(sources: &PatternSources) -> u64 {
    let mut hasher = DefaultHasher::new();
    sources.hash(&mut hasher);
    hasher.finish()
}

/// Gets a `PatternCatalog` from the cache or compiles it if not found.
///
/// This is the public entry point for retrieving a catalog. It returns an
/// `Arc`, allowing for cheap sharing across configuration generations.
pub fn get_or_compile(sources: &PatternSources) -> Result<Arc<PatternCatalog>, ConfigError> {
    let cache_key = hash_sources(sources);

    // Attempt to acquire a read lock first.
    {
        let cache = CATALOG_CACHE.read().unwrap();
        if let Some(catalog) = cache.get(&cache_key) {
            debug!("Serving pattern catalog from cache for key: {}", &cache_key);
            return Ok(Arc::clone(catalog));
        }
    } // Read lock is released here.

    debug!("Pattern catalog not found in cache. Compiling now.");
    let compiled = Arc::new(PatternCatalog::compile(sources)?);

    CATALOG_CACHE
        .write()
        .unwrap()
        .insert(cache_key, Arc::clone(&compiled));

    debug!("Successfully compiled and cached catalog for key: {}", &cache_key);
    Ok(compiled)
}

/// On-disk record of the allow-list matcher source, with an integrity
/// digest. The artifact is keyed by the exact pattern text: it is only
/// trusted when the digest verifies and the stored source equals the
/// currently configured pattern.
#[derive(Debug, Serialize, Deserialize)]
struct AllowlistArtifact {
    pattern: String,
    digest: String,
}

fn pattern_digest(pattern: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pattern.as_bytes());
    hex::encode(hasher.finalize())
}

/// Writes the allow-list artifact for `sources` to `path`.
pub fn write_artifact<P: AsRef<Path>>(path: P, sources: &PatternSources) -> Result<(), ConfigError> {
    let artifact = AllowlistArtifact {
        pattern: sources.allowlist.clone(),
        digest: pattern_digest(&sources.allowlist),
    };
    let bytes = bincode::serde::encode_to_vec(&artifact, bincode::config::standard())
        .map_err(std::io::Error::other)?;
    std::fs::write(path.as_ref(), bytes)?;
    Ok(())
}

fn load_artifact(path: &Path, expected_pattern: &str) -> Result<(), ConfigError> {
    let bytes = std::fs::read(path)?;
    let (artifact, _): (AllowlistArtifact, usize) =
        bincode::serde::decode_from_slice(&bytes, bincode::config::standard())
            .map_err(|_| ConfigError::CacheArtifactInvalid)?;

    if artifact.digest != pattern_digest(&artifact.pattern)
        || artifact.pattern != expected_pattern
    {
        return Err(ConfigError::CacheArtifactInvalid);
    }
    Ok(())
}

/// Compiles a catalog, consulting the artifact at `path` for the allow-list
/// pattern.
///
/// A missing, corrupt, or mismatched artifact is recovered automatically:
/// the catalog is compiled from the configured sources and the artifact is
/// rewritten. Artifact problems are never surfaced as hard failures.
pub fn compile_with_artifact<P: AsRef<Path>>(
    path: P,
    sources: &PatternSources,
) -> Result<Arc<PatternCatalog>, ConfigError> {
    let path = path.as_ref();
    match load_artifact(path, &sources.allowlist) {
        Ok(()) => {
            debug!(
                "Allow-list artifact at {} validated against configured pattern.",
                path.display()
            );
            get_or_compile(sources)
        }
        Err(err) => {
            warn!(
                "Allow-list artifact at {} is unusable ({}); recompiling.",
                path.display(),
                err
            );
            let catalog = get_or_compile(sources)?;
            if let Err(write_err) = write_artifact(path, sources) {
                warn!(
                    "Failed to refresh allow-list artifact at {}: {}",
                    path.display(),
                    write_err
                );
            }
            Ok(catalog)
        }
    }
}
