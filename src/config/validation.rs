//! Config validation: unknown-key detection with Levenshtein suggestions
//! and physical range checks on drilling parameters.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.
//!
//! The models themselves accept any real input; the range checks here are
//! what the CLI and HTTP layers run on caller-supplied parameters.

use std::collections::HashSet;

use super::defaults;
use crate::types::DrillingParameters;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, ", did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for ProfileConfig.
///
/// Maintained by hand to match the struct hierarchy in profile_config.rs.
/// Any new field added to ProfileConfig must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [well]
        "well",
        "well.name",
        "well.field",
        "well.rig",
        // [parameters]
        "parameters",
        "parameters.rpm",
        "parameters.wob",
        "parameters.flow_rate",
        "parameters.rop",
        "parameters.mud_density",
        "parameters.plastic_viscosity",
        "parameters.yield_point",
        "parameters.bore_diameter",
        "parameters.pipe_diameter",
        "parameters.pipe_length",
        "parameters.bha_diameter",
        "parameters.bha_length",
        "parameters.mud_viscosity",
        // [domain]
        "domain",
        "domain.samples",
        "domain.depth_end",
        "domain.inclination_start_deg",
        "domain.inclination_end_deg",
        // [hole_cleaning]
        "hole_cleaning",
        "hole_cleaning.model",
        // [hole_cleaning.exponential]
        "hole_cleaning.exponential",
        "hole_cleaning.exponential.decay_length",
        "hole_cleaning.exponential.reference_flow",
        "hole_cleaning.exponential.reference_rpm",
        "hole_cleaning.exponential.low_concentration_threshold",
        // [hole_cleaning.regression]
        "hole_cleaning.regression",
        "hole_cleaning.regression.intercept",
        "hole_cleaning.regression.wob_coefficient",
        "hole_cleaning.regression.rpm_coefficient",
        "hole_cleaning.regression.flow_coefficient",
        "hole_cleaning.regression.rop_coefficient",
        "hole_cleaning.regression.decay_length",
        "hole_cleaning.regression.depth_end",
        "hole_cleaning.regression.reference_viscosity",
        "hole_cleaning.regression.bed_height_factor",
        "hole_cleaning.regression.critical_concentration",
        // [effective_wob]
        "effective_wob",
        "effective_wob.transfer_decay_deg",
        "effective_wob.saturation_decay_deg",
        "effective_wob.low_ratio",
        // [advisory]
        "advisory",
        "advisory.rpm_target",
        "advisory.flow_target",
        "advisory.wob_limit",
        // [server]
        "server",
        "server.addr",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();
    if a.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties resolve to the alphabetically first key so output is stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    let mut candidates: Vec<&str> = known.iter().copied().collect();
    candidates.sort_unstable();

    let mut best: Option<(&str, usize)> = None;
    for k in candidates {
        let dist = levenshtein(unknown, k);
        if dist <= 3 && best.map_or(true, |(_, best_dist)| dist < best_dist) {
            best = Some((k, dist));
        }
    }
    best.map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys, it only warns. Existing configs
/// always continue to work.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    let found = walk_toml_keys(&value, "");
    let mut warnings = Vec::new();

    for key in &found {
        if !known.contains(key.as_str()) {
            let suggestion = suggest_correction(key, &known);
            let message = format!("Unknown config key '{key}'");
            warnings.push(ValidationWarning {
                field: key.clone(),
                message,
                suggestion,
            });
        }
    }

    warnings
}

// ============================================================================
// Physical Range Validation
// ============================================================================

/// Validate a drilling parameter set.
///
/// Returns (errors, warnings). Errors are values no well can have
/// (non-finite, negative); warnings are usable but outside the typical
/// operating envelope or geometrically inconsistent.
pub fn validate_parameters(params: &DrillingParameters) -> (Vec<String>, Vec<ValidationWarning>) {
    let prefix = "parameters";
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let fields: [(&str, f64); 13] = [
        ("rpm", params.rpm),
        ("wob", params.wob),
        ("flow_rate", params.flow_rate),
        ("rop", params.rop),
        ("mud_density", params.mud_density),
        ("plastic_viscosity", params.plastic_viscosity),
        ("yield_point", params.yield_point),
        ("bore_diameter", params.bore_diameter),
        ("pipe_diameter", params.pipe_diameter),
        ("pipe_length", params.pipe_length),
        ("bha_diameter", params.bha_diameter),
        ("bha_length", params.bha_length),
        ("mud_viscosity", params.mud_viscosity),
    ];

    for (name, value) in fields {
        if !value.is_finite() {
            errors.push(format!("{prefix}.{name} = {value} must be a finite number"));
        } else if value < 0.0 {
            errors.push(format!("{prefix}.{name} = {value:.2} cannot be negative"));
        }
    }

    let ranged: [(&str, f64, (f64, f64), &str); 6] = [
        ("rpm", params.rpm, defaults::RPM_RANGE, "rpm"),
        ("wob", params.wob, defaults::WOB_RANGE_LBF, "lbf"),
        ("flow_rate", params.flow_rate, defaults::FLOW_RATE_RANGE_GPM, "gpm"),
        ("rop", params.rop, defaults::ROP_RANGE_MH, "m/h"),
        ("mud_density", params.mud_density, defaults::MUD_DENSITY_RANGE_PPG, "ppg"),
        ("mud_viscosity", params.mud_viscosity, defaults::MUD_VISCOSITY_RANGE_CP, "cP"),
    ];

    for (name, value, (lo, hi), unit) in ranged {
        // Non-finite and negative values are already errors
        if value.is_finite() && value >= 0.0 && (value < lo || value > hi) {
            warnings.push(ValidationWarning {
                field: format!("{prefix}.{name}"),
                message: format!(
                    "{name} = {value:.1} is outside typical range ({lo}-{hi} {unit})"
                ),
                suggestion: None,
            });
        }
    }

    if params.pipe_diameter >= params.bore_diameter {
        warnings.push(ValidationWarning {
            field: format!("{prefix}.pipe_diameter"),
            message: format!(
                "pipe_diameter ({:.2} in) is not smaller than bore_diameter ({:.2} in)",
                params.pipe_diameter, params.bore_diameter
            ),
            suggestion: None,
        });
    }
    if params.bha_diameter >= params.bore_diameter {
        warnings.push(ValidationWarning {
            field: format!("{prefix}.bha_diameter"),
            message: format!(
                "bha_diameter ({:.2} in) is not smaller than bore_diameter ({:.2} in)",
                params.bha_diameter, params.bore_diameter
            ),
            suggestion: None,
        });
    }
    if params.bha_length > params.pipe_length {
        warnings.push(ValidationWarning {
            field: format!("{prefix}.bha_length"),
            message: format!(
                "bha_length ({:.0} m) exceeds pipe_length ({:.0} m)",
                params.bha_length, params.pipe_length
            ),
            suggestion: None,
        });
    }

    (errors, warnings)
}

/// Validate physical ranges on a parsed ProfileConfig.
///
/// Returns (errors, warnings). Errors are impossible values that must
/// prevent startup; warnings are suspicious but not fatal.
pub fn validate_physical_ranges(
    config: &super::ProfileConfig,
) -> (Vec<String>, Vec<ValidationWarning>) {
    let (errors, mut warnings) = validate_parameters(&config.parameters);

    let d = &config.domain;
    if d.inclination_start_deg < 0.0 || d.inclination_end_deg > 180.0 {
        warnings.push(ValidationWarning {
            field: "domain.inclination".to_string(),
            message: format!(
                "inclination domain {:.0}-{:.0} deg extends outside 0-180 deg",
                d.inclination_start_deg, d.inclination_end_deg
            ),
            suggestion: None,
        });
    }

    let ratio = config.effective_wob.low_ratio;
    if !(0.0..=1.0).contains(&ratio) {
        warnings.push(ValidationWarning {
            field: "effective_wob.low_ratio".to_string(),
            message: format!("effective_wob.low_ratio = {ratio:.2} is outside 0-1"),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
