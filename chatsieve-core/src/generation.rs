//! generation.rs - Configuration generations and their lifecycle.
//!
//! A `ConfigGeneration` is one immutable snapshot of compiled filter state:
//! the pattern catalog and the phrase table, built together from the same
//! `FilterConfig`. The `FilterManager` owns the active generation behind an
//! atomic handle and replaces it wholesale on reload; a failed reload
//! leaves the previous generation active, so the system is never left
//! without a working (even if stale) configuration.
//!
//! License: MIT OR APACHE 2.0

use arc_swap::ArcSwap;
use log::info;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::catalog::{self, PatternCatalog};
use crate::censor::PhraseCensor;
use crate::config::FilterConfig;
use crate::errors::ConfigError;
use crate::pipeline::{FilterPipeline, MessageFilter, Verdict};

/// One immutable snapshot of compiled filter state.
///
/// The catalog and the phrase table always come from the same build, so a
/// classification call can never pair an old pattern set with a new phrase
/// table or vice versa.
#[derive(Debug)]
pub struct ConfigGeneration {
    serial: u64,
    catalog: Arc<PatternCatalog>,
    censor: PhraseCensor,
}

impl ConfigGeneration {
    /// Builds a complete generation from `config`, or fails without side
    /// effects.
    pub fn build(serial: u64, config: &FilterConfig) -> Result<Self, ConfigError> {
        let censor = PhraseCensor::build(&config.badwords)?;
        let catalog = catalog::get_or_compile(&config.patterns)?;
        Ok(Self {
            serial,
            catalog,
            censor,
        })
    }

    /// Monotonic generation number, for diagnostics.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    pub fn censor(&self) -> &PhraseCensor {
        &self.censor
    }
}

/// Owns the active configuration generation and publishes replacements
/// atomically.
///
/// Classification calls in flight during a reload observe either entirely
/// the old or entirely the new generation, never a mix.
#[derive(Debug)]
pub struct FilterManager {
    active: ArcSwap<ConfigGeneration>,
    next_serial: AtomicU64,
}

impl FilterManager {
    /// Builds generation 1 from `config` and activates it.
    pub fn new(config: FilterConfig) -> Result<Self, ConfigError> {
        let generation = ConfigGeneration::build(1, &config)?;
        info!(
            "Activated filter generation 1 ({} badword entries).",
            generation.censor().len()
        );
        Ok(Self {
            active: ArcSwap::from_pointee(generation),
            next_serial: AtomicU64::new(2),
        })
    }

    /// Builds a new generation off to the side and publishes it with a
    /// single atomic store. On error the active generation is untouched.
    /// Returns the new generation's serial.
    pub fn reload(&self, config: FilterConfig) -> Result<u64, ConfigError> {
        let serial = self.next_serial.fetch_add(1, Ordering::Relaxed);
        let generation = ConfigGeneration::build(serial, &config)?;
        let entries = generation.censor().len();
        self.active.store(Arc::new(generation));
        info!("Activated filter generation {serial} ({entries} badword entries).");
        Ok(serial)
    }

    /// A handle to the currently active generation. The snapshot stays
    /// valid for the caller even if a reload lands afterwards.
    pub fn current(&self) -> Arc<ConfigGeneration> {
        self.active.load_full()
    }

    /// Classifies `text` against one snapshot of the active generation.
    pub fn classify(&self, text: &str) -> Verdict {
        FilterPipeline::new(self.current()).classify(text)
    }

    /// Byte-level variant of [`classify`](Self::classify); invalid UTF-8 is
    /// conservatively disallowed.
    pub fn classify_bytes(&self, raw: &[u8]) -> Verdict {
        FilterPipeline::new(self.current()).classify_bytes(raw)
    }
}
