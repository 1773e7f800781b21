//! Process-wide configuration: observer site and optimizer hyper-parameters.
//!
//! Loaded from a TOML file, mirroring the repository-configuration idiom
//! used elsewhere in this crate (`toml` + `serde`, `from_file`/
//! `from_default_location`). Unlike the source this crate grew from — which
//! re-read a mutable `tmp/global_vars.json` from every component — this
//! configuration is loaded once and threaded through explicitly via
//! [`crate::optimizer::context::OptimizerContext`].

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{SchedulerError, SchedulerResult};

/// Observer site settings (degrees).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SiteConfig {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            latitude_deg: crate::astro::site::SKA_LATITUDE,
            longitude_deg: crate::astro::site::SKA_LONGITUDE,
        }
    }
}

/// Hyper-parameters for the direct-encoding genetic optimizer (C5).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DirectOptimizerConfig {
    #[serde(default = "default_crossover_rate")]
    pub crossover_rate: f64,
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    #[serde(default = "default_elitism_fraction")]
    pub elitism_fraction: f64,
}

fn default_crossover_rate() -> f64 {
    0.2
}
fn default_mutation_rate() -> f64 {
    0.1
}
fn default_elitism_fraction() -> f64 {
    0.75
}

impl Default for DirectOptimizerConfig {
    fn default() -> Self {
        Self {
            crossover_rate: default_crossover_rate(),
            mutation_rate: default_mutation_rate(),
            elitism_fraction: default_elitism_fraction(),
        }
    }
}

/// Hyper-parameters for the hyper-heuristic optimizer (C6).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HyperHeuristicConfig {
    #[serde(default = "default_hh_mutation_rate")]
    pub mutation_rate: f64,
    #[serde(default = "default_tournament_size")]
    pub tournament_size: usize,
    #[serde(default = "default_slot_duration_s")]
    pub slot_duration_s: f64,
    #[serde(default = "default_hard_penalty")]
    pub hard_constraint_penalty: u64,
}

fn default_hh_mutation_rate() -> f64 {
    0.1
}
fn default_tournament_size() -> usize {
    3
}
fn default_slot_duration_s() -> f64 {
    60.0
}
fn default_hard_penalty() -> u64 {
    100_000
}

impl Default for HyperHeuristicConfig {
    fn default() -> Self {
        Self {
            mutation_rate: default_hh_mutation_rate(),
            tournament_size: default_tournament_size(),
            slot_duration_s: default_slot_duration_s(),
            hard_constraint_penalty: default_hard_penalty(),
        }
    }
}

/// Top-level process configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SchedulerConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub direct: DirectOptimizerConfig,
    #[serde(default)]
    pub hyper_heuristic: HyperHeuristicConfig,
    /// Constant antenna availability used by the simple feasibility model.
    #[serde(default = "default_antennas_available")]
    pub antennas_available: u32,
    /// Top-level RNG seed; each worker derives a thread-local generator from
    /// this value for reproducibility.
    #[serde(default = "default_rng_seed")]
    pub rng_seed: u64,
}

fn default_antennas_available() -> u32 {
    64
}

fn default_rng_seed() -> u64 {
    0x5348_4544_554c_4552 // "SCHEDULER" truncated, an arbitrary fixed default
}

impl SchedulerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> SchedulerResult<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| SchedulerError::Configuration(format!("failed to read config file: {e}")))?;
        let config: SchedulerConfig = toml::from_str(&content)
            .map_err(|e| SchedulerError::Configuration(format!("failed to parse config file: {e}")))?;
        Ok(config)
    }

    /// Load configuration from a `scheduler.toml` in the current directory,
    /// falling back to defaults if no such file exists.
    pub fn from_default_location() -> Self {
        let search_paths = [
            PathBuf::from("scheduler.toml"),
            PathBuf::from("./scheduler.toml"),
        ];
        for path in search_paths {
            if path.exists() {
                if let Ok(cfg) = Self::from_file(&path) {
                    return cfg;
                }
            }
        }
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_values() {
        let cfg = SchedulerConfig::default();
        assert_eq!(cfg.direct.crossover_rate, 0.2);
        assert_eq!(cfg.direct.mutation_rate, 0.1);
        assert_eq!(cfg.direct.elitism_fraction, 0.75);
        assert_eq!(cfg.antennas_available, 64);
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let toml = r#"
[site]
latitude_deg = -30.5
longitude_deg = 21.5
"#;
        let cfg: SchedulerConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.site.latitude_deg, -30.5);
        assert_eq!(cfg.direct.crossover_rate, 0.2);
    }
}
