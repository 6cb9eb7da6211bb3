//! Core data types for the depth-profile models
//!
//! Everything here is plain data: drilling inputs, sampled domains, the
//! derived profiles and the recommendations attached to them. The physics
//! that produces these values lives in [`crate::physics_engine`].

use serde::{Deserialize, Serialize};

// ============================================================================
// Drilling Parameters
// ============================================================================

/// Immutable snapshot of the drilling inputs for one model evaluation.
///
/// No cross-field invariant is enforced: a pipe wider than the bore, or a
/// zero flow rate, is passed through to the model unchanged. Range checks
/// belong to whoever collects the values (see `config::validation`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillingParameters {
    /// Rotary speed (rpm)
    pub rpm: f64,
    /// Weight on bit (lbf)
    pub wob: f64,
    /// Pump flow rate (gpm)
    pub flow_rate: f64,
    /// Rate of penetration (m/h)
    pub rop: f64,
    /// Mud density (ppg)
    pub mud_density: f64,
    /// Plastic viscosity (cP)
    pub plastic_viscosity: f64,
    /// Yield point (lbf/100ft²)
    pub yield_point: f64,
    /// Hole diameter (in)
    pub bore_diameter: f64,
    /// Drill pipe OD (in)
    pub pipe_diameter: f64,
    /// Drill pipe length (m)
    pub pipe_length: f64,
    /// BHA OD (in)
    pub bha_diameter: f64,
    /// BHA length (m)
    pub bha_length: f64,
    /// Apparent mud viscosity (cP)
    pub mud_viscosity: f64,
}

impl Default for DrillingParameters {
    fn default() -> Self {
        Self {
            rpm: 120.0,
            wob: 20_000.0,
            flow_rate: 600.0,
            rop: 15.0,
            mud_density: 10.5,
            plastic_viscosity: 35.0,
            yield_point: 25.0,
            bore_diameter: 8.5,
            pipe_diameter: 5.0,
            pipe_length: 3000.0,
            bha_diameter: 6.5,
            bha_length: 150.0,
            mud_viscosity: 40.0,
        }
    }
}

/// Partial parameter set supplied by a caller (CLI flags, HTTP body).
///
/// Every field is optional; `apply` layers the present ones over a base
/// value and returns a new [`DrillingParameters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, clap::Args)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterOverrides {
    /// Rotary speed (rpm)
    #[arg(long)]
    pub rpm: Option<f64>,
    /// Weight on bit (lbf)
    #[arg(long)]
    pub wob: Option<f64>,
    /// Flow rate (gpm)
    #[arg(long)]
    pub flow_rate: Option<f64>,
    /// Rate of penetration (m/h)
    #[arg(long)]
    pub rop: Option<f64>,
    /// Mud density (ppg)
    #[arg(long)]
    pub mud_density: Option<f64>,
    /// Plastic viscosity (cP)
    #[arg(long)]
    pub plastic_viscosity: Option<f64>,
    /// Yield point (lbf/100ft²)
    #[arg(long)]
    pub yield_point: Option<f64>,
    /// Hole diameter (in)
    #[arg(long)]
    pub bore_diameter: Option<f64>,
    /// Drill pipe OD (in)
    #[arg(long)]
    pub pipe_diameter: Option<f64>,
    /// Drill pipe length (m)
    #[arg(long)]
    pub pipe_length: Option<f64>,
    /// BHA OD (in)
    #[arg(long)]
    pub bha_diameter: Option<f64>,
    /// BHA length (m)
    #[arg(long)]
    pub bha_length: Option<f64>,
    /// Mud viscosity (cP)
    #[arg(long)]
    pub mud_viscosity: Option<f64>,
}

impl ParameterOverrides {
    pub fn apply(&self, base: DrillingParameters) -> DrillingParameters {
        DrillingParameters {
            rpm: self.rpm.unwrap_or(base.rpm),
            wob: self.wob.unwrap_or(base.wob),
            flow_rate: self.flow_rate.unwrap_or(base.flow_rate),
            rop: self.rop.unwrap_or(base.rop),
            mud_density: self.mud_density.unwrap_or(base.mud_density),
            plastic_viscosity: self.plastic_viscosity.unwrap_or(base.plastic_viscosity),
            yield_point: self.yield_point.unwrap_or(base.yield_point),
            bore_diameter: self.bore_diameter.unwrap_or(base.bore_diameter),
            pipe_diameter: self.pipe_diameter.unwrap_or(base.pipe_diameter),
            pipe_length: self.pipe_length.unwrap_or(base.pipe_length),
            bha_diameter: self.bha_diameter.unwrap_or(base.bha_diameter),
            bha_length: self.bha_length.unwrap_or(base.bha_length),
            mud_viscosity: self.mud_viscosity.unwrap_or(base.mud_viscosity),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ============================================================================
// Domain
// ============================================================================

/// Unit of a depth domain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DepthUnit {
    #[default]
    Feet,
    Metres,
}

impl std::fmt::Display for DepthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DepthUnit::Feet => write!(f, "ft"),
            DepthUnit::Metres => write!(f, "m"),
        }
    }
}

/// Ordered, evenly spaced samples over a closed range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Domain {
    values: Vec<f64>,
}

impl Domain {
    /// `n` evenly spaced samples from `start` to `end` inclusive.
    ///
    /// `n == 0` yields an empty domain and `n == 1` yields `[start]`. The
    /// last sample is exactly `end` so accumulated rounding never shifts it.
    pub fn linspace(start: f64, end: f64, n: usize) -> Self {
        let values = match n {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (end - start) / (n - 1) as f64;
                (0..n)
                    .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                    .collect()
            }
        };
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

impl From<Vec<f64>> for Domain {
    fn from(values: Vec<f64>) -> Self {
        Self { values }
    }
}

// ============================================================================
// Recommendations
// ============================================================================

/// Outcome of a threshold check on a profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Acceptable,
    Low,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Acceptable => write!(f, "ACCEPTABLE"),
            Severity::Low => write!(f, "LOW"),
        }
    }
}

/// Which profile a recommendation was derived from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationTopic {
    HoleCleaning,
    EffectiveWob,
}

impl std::fmt::Display for RecommendationTopic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendationTopic::HoleCleaning => write!(f, "Hole cleaning"),
            RecommendationTopic::EffectiveWob => write!(f, "Effective WOB"),
        }
    }
}

/// Operational change suggested alongside a LOW recommendation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Raise rotary speed to improve cuttings agitation
    IncreaseRpm,
    /// Raise pump rate to improve cuttings transport
    IncreaseFlowRate,
    /// Lower WOB to limit buckling
    ReduceWob,
    /// Check for pipe buckling and cuttings accumulation
    CheckBucklingAndCuttings,
}

impl std::fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestedAction::IncreaseRpm => write!(f, "Increase RPM to improve agitation"),
            SuggestedAction::IncreaseFlowRate => {
                write!(f, "Increase flow rate to enhance cuttings transport")
            }
            SuggestedAction::ReduceWob => {
                write!(f, "Reduce WOB to minimize buckling and improve cleaning")
            }
            SuggestedAction::CheckBucklingAndCuttings => {
                write!(f, "Verify pipe buckling and cuttings accumulation")
            }
        }
    }
}

/// A discrete recommendation attached to a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub topic: RecommendationTopic,
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub actions: Vec<SuggestedAction>,
    /// Number of samples that violated the policy threshold
    pub critical_samples: usize,
}

impl Recommendation {
    pub fn is_low(&self) -> bool {
        self.severity == Severity::Low
    }
}

// ============================================================================
// Profiles
// ============================================================================

/// Cuttings concentration and bed height sampled over depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoleCleaningProfile {
    /// Name of the strategy that produced the profile
    pub model: String,
    pub depth_unit: DepthUnit,
    pub depth: Vec<f64>,
    pub concentration: Vec<f64>,
    pub bed_height: Vec<f64>,
    /// Depth samples that violated the cleaning policy
    pub critical_depths: Vec<f64>,
    pub recommendation: Recommendation,
}

impl HoleCleaningProfile {
    pub fn len(&self) -> usize {
        self.depth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depth.is_empty()
    }

    /// Depth samples expressed in feet, whatever unit the profile uses.
    pub fn depth_ft(&self) -> Vec<f64> {
        match self.depth_unit {
            DepthUnit::Feet => self.depth.clone(),
            DepthUnit::Metres => self
                .depth
                .iter()
                .map(|&d| crate::physics_engine::units::metres_to_feet(d))
                .collect(),
        }
    }
}

/// Bottom hole pressure along a hole-cleaning depth domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressureProfile {
    /// Unit of `depth` (the pressure itself is always computed in feet)
    pub depth_unit: DepthUnit,
    pub depth: Vec<f64>,
    /// Bottom hole pressure (psi)
    pub pressure: Vec<f64>,
}

/// Effective weight on bit sampled over inclination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WobProfile {
    /// Inclination samples (degrees)
    pub inclination: Vec<f64>,
    /// Effective WOB at each sample (lbf)
    pub effective_wob: Vec<f64>,
    pub recommendation: Recommendation,
}

/// Complete model output for one parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResult {
    pub parameters: DrillingParameters,
    pub hole_cleaning: HoleCleaningProfile,
    /// Bottom hole pressure (psi) at each hole-cleaning depth sample
    pub pressure: Vec<f64>,
    pub wob: WobProfile,
}

impl ProfileResult {
    pub fn recommendations(&self) -> Vec<&Recommendation> {
        vec![&self.hole_cleaning.recommendation, &self.wob.recommendation]
    }

    pub fn concentration(&self) -> &[f64] {
        &self.hole_cleaning.concentration
    }

    pub fn bed_height(&self) -> &[f64] {
        &self.hole_cleaning.bed_height
    }

    pub fn effective_wob(&self) -> &[f64] {
        &self.wob.effective_wob
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints() {
        let d = Domain::linspace(0.0, 3000.0, 100);
        assert_eq!(d.len(), 100);
        assert_eq!(d.values()[0], 0.0);
        assert_eq!(d.values()[99], 3000.0);
    }

    #[test]
    fn test_linspace_degenerate_counts() {
        assert!(Domain::linspace(0.0, 10.0, 0).is_empty());
        assert_eq!(Domain::linspace(5.0, 10.0, 1).values(), &[5.0]);
        assert_eq!(Domain::linspace(0.0, 10.0, 2).values(), &[0.0, 10.0]);
    }

    #[test]
    fn test_linspace_zero_width_range() {
        let d = Domain::linspace(0.0, 0.0, 4);
        assert!(d.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_overrides_apply_only_present_fields() {
        let base = DrillingParameters::default();
        let overrides = ParameterOverrides {
            rpm: Some(180.0),
            mud_density: Some(12.0),
            ..Default::default()
        };
        let p = overrides.apply(base);
        assert_eq!(p.rpm, 180.0);
        assert_eq!(p.mud_density, 12.0);
        assert_eq!(p.flow_rate, base.flow_rate);
        assert!(!overrides.is_empty());
        assert!(ParameterOverrides::default().is_empty());
    }

    #[test]
    fn test_overrides_reject_unknown_fields() {
        let parsed: Result<ParameterOverrides, _> = serde_json::from_str(r#"{"rmp": 100.0}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_overrides_parse_from_cli_flags() {
        use clap::Parser;

        #[derive(Parser)]
        struct Flags {
            #[command(flatten)]
            params: ParameterOverrides,
        }

        let flags = Flags::try_parse_from(["wellprofile", "--rpm", "90", "--mud-viscosity", "55.5"])
            .unwrap();
        assert_eq!(flags.params.rpm, Some(90.0));
        assert_eq!(flags.params.mud_viscosity, Some(55.5));
        assert_eq!(flags.params.wob, None);

        assert!(Flags::try_parse_from(["wellprofile", "--rmp", "90"]).is_err());
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Low.to_string(), "LOW");
        assert_eq!(Severity::Acceptable.to_string(), "ACCEPTABLE");
    }
}
