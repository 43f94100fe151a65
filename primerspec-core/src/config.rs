//! Typed run configuration.
//!
//! Values come from an optional TOML file overlaid with command line flags;
//! the merged result is validated once and handed to the pipeline as an
//! immutable [`RunConfig`]. Unknown keys in the file are rejected at the
//! boundary rather than smuggled through as untyped key-value pairs.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::errors::ConfigError;
use crate::models::region::{ProductSizeRange, TargetRegion};
use crate::significance::SignificanceThresholds;

pub const DEFAULT_MATCH_LIMIT: usize = 5;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub region: RegionSection,
    #[serde(default)]
    pub thresholds: ThresholdSection,
    #[serde(default)]
    pub primer3: Primer3Settings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionSection {
    pub target_begin: Option<i64>,
    pub target_end: Option<i64>,
    pub product_size_min: Option<i64>,
    pub product_size_max: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdSection {
    pub last_must_match: Option<u32>,
    pub last_to_check: Option<u32>,
    pub last_max_error: Option<u32>,
    pub match_limit: Option<usize>,
}

/// Named design engine knobs. Each is emitted into the engine input only
/// when set, leaving the engine's own defaults in charge otherwise.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Primer3Settings {
    pub num_return: Option<u32>,
    pub opt_size: Option<u32>,
    pub min_size: Option<u32>,
    pub max_size: Option<u32>,
    pub opt_tm: Option<f64>,
    pub min_tm: Option<f64>,
    pub max_tm: Option<f64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ConfigError::FileReadError(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Command line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub position: Option<(i64, i64)>,
    pub size: Option<(i64, i64)>,
    pub last_must_match: Option<u32>,
    pub last_to_check: Option<u32>,
    pub last_max_error: Option<u32>,
    pub match_limit: Option<usize>,
}

/// The fully resolved, validated configuration of one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub target: TargetRegion,
    pub size: ProductSizeRange,
    pub thresholds: SignificanceThresholds,
    pub match_limit: usize,
    pub primer3: Primer3Settings,
}

impl RunConfig {
    pub fn resolve(file: FileConfig, overrides: &Overrides) -> Result<Self, ConfigError> {
        let region = &file.region;
        let (begin, end) = overrides
            .position
            .or_else(|| Some((region.target_begin?, region.target_end?)))
            .ok_or(ConfigError::MissingTargetRegion)?;
        let (min, max) = overrides
            .size
            .or_else(|| Some((region.product_size_min?, region.product_size_max?)))
            .ok_or(ConfigError::MissingSizeRange)?;

        let target = TargetRegion::new(begin, end)?;
        let size = ProductSizeRange::new(min, max)?;

        let defaults = SignificanceThresholds::default();
        let thresholds = SignificanceThresholds {
            last_must_match: overrides
                .last_must_match
                .or(file.thresholds.last_must_match)
                .unwrap_or(defaults.last_must_match),
            last_to_check: overrides
                .last_to_check
                .or(file.thresholds.last_to_check)
                .unwrap_or(defaults.last_to_check),
            last_max_error: overrides
                .last_max_error
                .or(file.thresholds.last_max_error)
                .unwrap_or(defaults.last_max_error),
        };
        let match_limit = overrides
            .match_limit
            .or(file.thresholds.match_limit)
            .unwrap_or(DEFAULT_MATCH_LIMIT);

        Ok(RunConfig {
            target,
            size,
            thresholds,
            match_limit,
            primer3: file.primer3,
        })
    }
}
