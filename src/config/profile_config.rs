//! Profile Configuration - model constants and defaults as TOML values
//!
//! Every constant the models use is a field here. Each struct implements
//! `Default` with the standard model constants, so an empty (or absent)
//! config file reproduces the built-in behaviour exactly.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;
use crate::physics_engine::{
    AdvisoryLimits, EffectiveWobModel, ExponentialDecayModel, HoleCleaningModelKind,
    RegressionDecayModel,
};
use crate::types::DrillingParameters;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration.
///
/// Load with `ProfileConfig::load()` which searches:
/// 1. `$WELLPROFILE_CONFIG`
/// 2. `./profile_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Well identification (logs and reports only)
    #[serde(default)]
    pub well: WellInfo,

    /// Default drilling parameters, overridable per request
    #[serde(default)]
    pub parameters: DrillingParameters,

    /// Sampling of the depth and inclination domains
    #[serde(default)]
    pub domain: DomainConfig,

    /// Hole-cleaning strategy selection and constants
    #[serde(default)]
    pub hole_cleaning: HoleCleaningConfig,

    /// Effective WOB constants
    #[serde(default)]
    pub effective_wob: EffectiveWobModel,

    /// Limits for suggested actions
    #[serde(default)]
    pub advisory: AdvisoryLimits,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

impl ProfileConfig {
    /// Load configuration using the standard search order:
    /// 1. `$WELLPROFILE_CONFIG` environment variable
    /// 2. `./profile_config.toml` in the current working directory
    /// 3. Built-in defaults
    ///
    /// Files that fail to load are logged and skipped.
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), well = %config.well.name, "Loaded profile config from {}", defaults::CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", defaults::CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", defaults::CONFIG_ENV_VAR);
            }
        }

        // 2. Check ./profile_config.toml
        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(well = %config.well.name, "Loaded profile config from ./{}", defaults::LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", defaults::LOCAL_CONFIG_FILE);
                }
            }
        }

        // 3. Defaults
        info!("No profile config found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, err) => ConfigError::Parse(path.to_path_buf(), err),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys are logged as warnings and never fail the parse.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        // Two-pass: check for unknown keys first (warnings only)
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<inline>"), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Save config to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Profile config saved");
        Ok(())
    }

    /// Validate model constants and default parameters.
    ///
    /// Rules:
    /// - Every number must be finite
    /// - Decay lengths and reference normalisers must be > 0 (used as divisors)
    /// - Sample count must not exceed `MAX_SAMPLES`
    /// - The server address must parse
    ///
    /// Suspicious but usable values are logged as warnings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        for (name, value) in self.numeric_fields() {
            if !value.is_finite() {
                errors.push(format!("{name}: value must be finite (got {value})"));
            }
        }

        let exp = &self.hole_cleaning.exponential;
        Self::check_divisor(exp.decay_length, "hole_cleaning.exponential.decay_length", &mut errors);
        Self::check_divisor(exp.reference_flow, "hole_cleaning.exponential.reference_flow", &mut errors);
        Self::check_divisor(exp.reference_rpm, "hole_cleaning.exponential.reference_rpm", &mut errors);

        let reg = &self.hole_cleaning.regression;
        Self::check_divisor(reg.decay_length, "hole_cleaning.regression.decay_length", &mut errors);
        Self::check_divisor(
            reg.reference_viscosity,
            "hole_cleaning.regression.reference_viscosity",
            &mut errors,
        );
        if reg.depth_end < 0.0 {
            errors.push(format!(
                "hole_cleaning.regression.depth_end ({:.1}) cannot be negative",
                reg.depth_end
            ));
        }

        let wob = &self.effective_wob;
        Self::check_divisor(wob.transfer_decay_deg, "effective_wob.transfer_decay_deg", &mut errors);
        Self::check_divisor(
            wob.saturation_decay_deg,
            "effective_wob.saturation_decay_deg",
            &mut errors,
        );

        let d = &self.domain;
        if d.samples > defaults::MAX_SAMPLES {
            errors.push(format!(
                "domain.samples ({}) exceeds the maximum of {}",
                d.samples,
                defaults::MAX_SAMPLES
            ));
        }
        if let Some(end) = d.depth_end {
            if !end.is_finite() || end < 0.0 {
                errors.push(format!("domain.depth_end ({end}) must be a finite, non-negative depth"));
            }
        }

        if self.server.addr.parse::<SocketAddr>().is_err() {
            errors.push(format!(
                "server.addr '{}' is not a valid socket address",
                self.server.addr
            ));
        }

        // Physical range validation
        let (range_errors, range_warnings) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_divisor(value: f64, name: &str, errors: &mut Vec<String>) {
        // NaN comparisons silently pass, they are reported by the finite sweep
        if value <= 0.0 {
            errors.push(format!("{name} must be > 0 (used as divisor), got {value}"));
        }
    }

    /// Dotted names and values of every model constant.
    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        let exp = &self.hole_cleaning.exponential;
        let reg = &self.hole_cleaning.regression;
        let wob = &self.effective_wob;
        let adv = &self.advisory;
        vec![
            ("domain.inclination_start_deg", self.domain.inclination_start_deg),
            ("domain.inclination_end_deg", self.domain.inclination_end_deg),
            ("hole_cleaning.exponential.decay_length", exp.decay_length),
            ("hole_cleaning.exponential.reference_flow", exp.reference_flow),
            ("hole_cleaning.exponential.reference_rpm", exp.reference_rpm),
            (
                "hole_cleaning.exponential.low_concentration_threshold",
                exp.low_concentration_threshold,
            ),
            ("hole_cleaning.regression.intercept", reg.intercept),
            ("hole_cleaning.regression.wob_coefficient", reg.wob_coefficient),
            ("hole_cleaning.regression.rpm_coefficient", reg.rpm_coefficient),
            ("hole_cleaning.regression.flow_coefficient", reg.flow_coefficient),
            ("hole_cleaning.regression.rop_coefficient", reg.rop_coefficient),
            ("hole_cleaning.regression.decay_length", reg.decay_length),
            ("hole_cleaning.regression.depth_end", reg.depth_end),
            ("hole_cleaning.regression.reference_viscosity", reg.reference_viscosity),
            ("hole_cleaning.regression.bed_height_factor", reg.bed_height_factor),
            ("hole_cleaning.regression.critical_concentration", reg.critical_concentration),
            ("effective_wob.transfer_decay_deg", wob.transfer_decay_deg),
            ("effective_wob.saturation_decay_deg", wob.saturation_decay_deg),
            ("effective_wob.low_ratio", wob.low_ratio),
            ("advisory.rpm_target", adv.rpm_target),
            ("advisory.flow_target", adv.flow_target),
            ("advisory.wob_limit", adv.wob_limit),
        ]
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Well Info
// ============================================================================

/// Identification metadata, not used for logic but shown in logs and reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellInfo {
    /// Well name / identifier
    #[serde(default = "default_well_name")]
    pub name: String,

    /// Field name
    #[serde(default)]
    pub field: String,

    /// Rig name
    #[serde(default)]
    pub rig: String,
}

fn default_well_name() -> String {
    "DEFAULT".to_string()
}

impl Default for WellInfo {
    fn default() -> Self {
        Self {
            name: default_well_name(),
            field: String::new(),
            rig: String::new(),
        }
    }
}

// ============================================================================
// Domain
// ============================================================================

/// How the depth and inclination domains are sampled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Samples per domain
    #[serde(default = "default_samples")]
    pub samples: usize,

    /// Bottom of the depth domain, in the active strategy's unit.
    /// Unset means the strategy default (pipe length, or the regression
    /// model's `depth_end`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_end: Option<f64>,

    #[serde(default = "default_inclination_start")]
    pub inclination_start_deg: f64,

    #[serde(default = "default_inclination_end")]
    pub inclination_end_deg: f64,
}

fn default_samples() -> usize { defaults::DEFAULT_SAMPLES }
fn default_inclination_start() -> f64 { defaults::DEFAULT_INCLINATION_START_DEG }
fn default_inclination_end() -> f64 { defaults::DEFAULT_INCLINATION_END_DEG }

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            depth_end: None,
            inclination_start_deg: default_inclination_start(),
            inclination_end_deg: default_inclination_end(),
        }
    }
}

// ============================================================================
// Hole Cleaning
// ============================================================================

/// Strategy selection plus the constants of both strategies.
///
/// Only the selected strategy is evaluated, but both stay configurable so
/// switching `model` never changes the other's constants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HoleCleaningConfig {
    #[serde(default)]
    pub model: HoleCleaningModelKind,

    #[serde(default)]
    pub exponential: ExponentialDecayModel,

    #[serde(default)]
    pub regression: RegressionDecayModel,
}

// ============================================================================
// Server
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for `wellprofile serve`
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

fn default_server_addr() -> String {
    defaults::DEFAULT_SERVER_ADDR.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}
