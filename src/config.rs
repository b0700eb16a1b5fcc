use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::life::grid::BoundaryPolicy;
use crate::life::rules::RuleVariant;
use crate::life::seed::PATTERN_COUNT;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("grid size {rows}x{cols} must exceed the 3x3 seed pattern in both axes")]
    GridTooSmall { rows: usize, cols: usize },
    #[error("run.generations must be positive")]
    ZeroGenerations,
    #[error("run.trials_per_point must be positive")]
    ZeroTrials,
    #[error("noise.{field} = {value} outside [0, 1]")]
    NoiseOutOfRange { field: &'static str, value: f64 },
    #[error("noise.step must be positive, got {0}")]
    NonPositiveNoiseStep(f64),
    #[error("noise.start {start} exceeds noise.stop {stop}")]
    NoiseRangeInverted { start: f64, stop: f64 },
    #[error("patterns list is empty")]
    EmptyPatterns,
    #[error("pattern id {0} out of range (must be < 512)")]
    PatternOutOfRange(u16),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "GridConfig::default_rows")]
    pub rows: usize,
    #[serde(default = "GridConfig::default_cols")]
    pub cols: usize,
}

impl GridConfig {
    fn default_rows() -> usize {
        64
    }
    fn default_cols() -> usize {
        64
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: Self::default_rows(),
            cols: Self::default_cols(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "RunConfig::default_generations")]
    pub generations: u32,
    #[serde(default = "RunConfig::default_trials_per_point")]
    pub trials_per_point: u32,
    #[serde(default = "RunConfig::default_base_seed")]
    pub base_seed: u64,
    /// Worker threads; 0 means one per available core.
    #[serde(default)]
    pub threads: usize,
}

impl RunConfig {
    fn default_generations() -> u32 {
        256
    }
    fn default_trials_per_point() -> u32 {
        100
    }
    fn default_base_seed() -> u64 {
        42
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            generations: Self::default_generations(),
            trials_per_point: Self::default_trials_per_point(),
            base_seed: Self::default_base_seed(),
            threads: 0,
        }
    }
}

/// Inclusive arithmetic sweep of noise levels, `start, start+step, ..= stop`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseSweepConfig {
    #[serde(default)]
    pub start: f64,
    #[serde(default = "NoiseSweepConfig::default_stop")]
    pub stop: f64,
    #[serde(default = "NoiseSweepConfig::default_step")]
    pub step: f64,
}

impl NoiseSweepConfig {
    fn default_stop() -> f64 {
        1.0
    }
    fn default_step() -> f64 {
        0.01
    }

    /// Materialize the sweep. The stop value is included up to a small
    /// tolerance so 0.0..=1.0 by 0.01 yields 101 levels.
    pub fn levels(&self) -> Vec<f64> {
        let tolerance = self.step * 1e-9;
        (0..)
            .map(|i| self.start + i as f64 * self.step)
            .take_while(|v| *v <= self.stop + tolerance)
            .collect()
    }
}

impl Default for NoiseSweepConfig {
    fn default() -> Self {
        Self {
            start: 0.0,
            stop: Self::default_stop(),
            step: Self::default_step(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    // Plain values first so the TOML serializer emits them before tables.
    #[serde(default = "SimConfig::default_rule")]
    pub rule: RuleVariant,
    /// Boundary override; absent means the rule variant's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary: Option<BoundaryPolicy>,
    /// Explicit seed pattern ids; absent means all 512.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<u16>>,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub noise: NoiseSweepConfig,
}

impl SimConfig {
    fn default_rule() -> RuleVariant {
        RuleVariant::NoisyStandard
    }

    pub fn boundary(&self) -> BoundaryPolicy {
        self.boundary.unwrap_or_else(|| self.rule.default_boundary())
    }

    pub fn worker_threads(&self) -> usize {
        if self.run.threads > 0 {
            self.run.threads
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        }
    }

    /// Pattern ids to sweep, in stable order.
    pub fn pattern_ids(&self) -> Vec<u16> {
        match &self.patterns {
            Some(ids) => ids.clone(),
            None => (0..PATTERN_COUNT).collect(),
        }
    }

    /// Reject bad configuration before any simulation work starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.rows <= 3 || self.grid.cols <= 3 {
            return Err(ConfigError::GridTooSmall {
                rows: self.grid.rows,
                cols: self.grid.cols,
            });
        }
        if self.run.generations == 0 {
            return Err(ConfigError::ZeroGenerations);
        }
        if self.run.trials_per_point == 0 {
            return Err(ConfigError::ZeroTrials);
        }
        for (field, value) in [("start", self.noise.start), ("stop", self.noise.stop)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::NoiseOutOfRange { field, value });
            }
        }
        if self.noise.step <= 0.0 {
            return Err(ConfigError::NonPositiveNoiseStep(self.noise.step));
        }
        if self.noise.start > self.noise.stop {
            return Err(ConfigError::NoiseRangeInverted {
                start: self.noise.start,
                stop: self.noise.stop,
            });
        }
        if let Some(ids) = &self.patterns {
            if ids.is_empty() {
                return Err(ConfigError::EmptyPatterns);
            }
            if let Some(&bad) = ids.iter().find(|&&id| id >= PATTERN_COUNT) {
                return Err(ConfigError::PatternOutOfRange(bad));
            }
        }
        Ok(())
    }

    /// Read the config file if it exists; otherwise write the defaults there
    /// and use them. A file that fails to read or parse falls back to the
    /// defaults with a warning.
    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        tracing::warn!("failed to parse config {path}: {err}; using defaults");
                    }
                },
                Err(err) => {
                    tracing::warn!("failed to read config {path}: {err}; using defaults");
                }
            }
            return Self::default();
        }

        let default_cfg = Self::default();
        match toml::to_string_pretty(&default_cfg) {
            Ok(text) => {
                if let Err(err) = fs::write(path_obj, text) {
                    tracing::warn!("failed to write default config to {path}: {err}");
                }
            }
            Err(err) => {
                tracing::warn!("failed to serialize default config: {err}");
            }
        }
        default_cfg
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rule: Self::default_rule(),
            boundary: None,
            patterns: None,
            grid: GridConfig::default(),
            run: RunConfig::default(),
            noise: NoiseSweepConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn unique_path(name: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!(
            "noisylife_config_test_{}_{}",
            name,
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        p
    }

    #[test]
    fn default_sweep_has_101_levels() {
        let levels = NoiseSweepConfig::default().levels();
        assert_eq!(levels.len(), 101);
        assert_eq!(levels[0], 0.0);
        assert!((levels[100] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn defaults_validate() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validation_names_the_bad_field() {
        let mut cfg = SimConfig::default();
        cfg.grid.rows = 3;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::GridTooSmall { rows: 3, cols: 64 })
        ));

        let mut cfg = SimConfig::default();
        cfg.run.generations = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroGenerations));

        let mut cfg = SimConfig::default();
        cfg.noise.stop = 1.5;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::NoiseOutOfRange {
                field: "stop",
                value: 1.5
            })
        );

        let mut cfg = SimConfig::default();
        cfg.patterns = Some(vec![1, 512]);
        assert_eq!(cfg.validate(), Err(ConfigError::PatternOutOfRange(512)));

        let mut cfg = SimConfig::default();
        cfg.patterns = Some(Vec::new());
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyPatterns));
    }

    #[test]
    fn boundary_defaults_follow_the_rule() {
        let mut cfg = SimConfig::default();
        cfg.rule = RuleVariant::RegressionCorrected;
        assert_eq!(cfg.boundary(), BoundaryPolicy::Wrap);
        cfg.boundary = Some(BoundaryPolicy::ZeroPadded);
        assert_eq!(cfg.boundary(), BoundaryPolicy::ZeroPadded);
    }

    #[test]
    fn load_or_default_writes_defaults() {
        let path = unique_path("defaults.toml");
        let path_str = path.to_string_lossy().to_string();
        let _ = fs::remove_file(&path);

        let cfg = SimConfig::load_or_default(&path_str);
        assert!(path.exists(), "config file should be created");
        assert_eq!(cfg.grid.rows, 64);
        assert_eq!(cfg.run.generations, 256);
        assert_eq!(cfg.run.trials_per_point, 100);
        assert_eq!(cfg.rule, RuleVariant::NoisyStandard);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn load_or_default_reads_existing() {
        let path = unique_path("custom.toml");
        let path_str = path.to_string_lossy().to_string();
        let custom = r#"
            rule = "tiered-regression-corrected"
            boundary = "wrap"
            patterns = [0, 255, 511]

            [grid]
            rows = 59
            cols = 59

            [run]
            generations = 250
            trials_per_point = 20
            base_seed = 7

            [noise]
            start = 0.1
            stop = 0.5
            step = 0.1
        "#;
        fs::write(&path, custom).unwrap();

        let cfg = SimConfig::load_or_default(&path_str);
        assert_eq!(cfg.rule, RuleVariant::TieredRegressionCorrected);
        assert_eq!(cfg.boundary, Some(BoundaryPolicy::Wrap));
        assert_eq!(cfg.patterns, Some(vec![0, 255, 511]));
        assert_eq!(cfg.grid.rows, 59);
        assert_eq!(cfg.run.generations, 250);
        assert_eq!(cfg.run.trials_per_point, 20);
        assert_eq!(cfg.run.base_seed, 7);
        assert_eq!(cfg.noise.levels().len(), 5);
        assert_eq!(cfg.validate(), Ok(()));

        let _ = fs::remove_file(&path);
    }
}
