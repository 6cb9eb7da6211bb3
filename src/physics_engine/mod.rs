//! Physics Engine Module
//!
//! Deterministic, closed-form drilling models evaluated over sampled domains.
//! Every function here is pure: no I/O, no shared state, no validation.
//! Out-of-range inputs produce degenerate but well-defined arrays.
//!
//! ## Models
//! - `hole_cleaning` - cuttings concentration and bed height vs depth
//!   (two independent strategies)
//! - `pressure` - bottom hole pressure from mud density and bed height
//! - `wob` - effective weight on bit vs inclination
//! - `advisory` - suggested actions for LOW results
//!
//! [`ProfileModel`] bundles a configured strategy with the domain settings
//! and evaluates everything for one parameter set.

pub mod advisory;
pub mod hole_cleaning;
pub mod pressure;
pub mod units;
pub mod wob;

pub use advisory::{hole_cleaning_actions, AdvisoryLimits};
pub use hole_cleaning::{
    compute_hole_cleaning_profile, CleaningPolicy, ExponentialDecayModel, HoleCleaningModel,
    HoleCleaningModelKind, RegressionDecayModel,
};
pub use pressure::{
    compute_bottom_hole_pressure, hydrostatic_pressure, HYDROSTATIC_GRADIENT_PSI_FT_PER_PPG,
};
pub use wob::{compute_effective_wob, EffectiveWobModel};

use tracing::debug;

use crate::config::ProfileConfig;
use crate::types::{
    DrillingParameters, Domain, HoleCleaningProfile, PressureProfile, ProfileResult, WobProfile,
};

// ============================================================================
// Profile Model
// ============================================================================

/// A configured set of models plus the domains they are sampled over.
///
/// Holds only immutable settings; share it freely between callers.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileModel {
    pub hole_cleaning: HoleCleaningModelKind,
    pub exponential: ExponentialDecayModel,
    pub regression: RegressionDecayModel,
    pub effective_wob: EffectiveWobModel,
    pub advisory: AdvisoryLimits,
    /// Sample count for both domains
    pub samples: usize,
    /// Overrides the strategy's default bottom depth
    pub depth_end: Option<f64>,
    pub inclination_start_deg: f64,
    pub inclination_end_deg: f64,
}

impl Default for ProfileModel {
    fn default() -> Self {
        Self::from_config(&ProfileConfig::default())
    }
}

impl ProfileModel {
    pub fn from_config(config: &ProfileConfig) -> Self {
        Self {
            hole_cleaning: config.hole_cleaning.model,
            exponential: config.hole_cleaning.exponential,
            regression: config.hole_cleaning.regression,
            effective_wob: config.effective_wob,
            advisory: config.advisory,
            samples: config.domain.samples,
            depth_end: config.domain.depth_end,
            inclination_start_deg: config.domain.inclination_start_deg,
            inclination_end_deg: config.domain.inclination_end_deg,
        }
    }

    pub fn with_model(mut self, kind: HoleCleaningModelKind) -> Self {
        self.hole_cleaning = kind;
        self
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_depth_end(mut self, depth_end: Option<f64>) -> Self {
        self.depth_end = depth_end;
        self
    }

    /// The active hole-cleaning strategy.
    pub fn hole_cleaning_model(&self) -> &dyn HoleCleaningModel {
        match self.hole_cleaning {
            HoleCleaningModelKind::Exponential => &self.exponential,
            HoleCleaningModelKind::Regression => &self.regression,
        }
    }

    /// Bottom of the depth domain: the override, else the strategy default.
    pub fn resolved_depth_end(&self, params: &DrillingParameters) -> f64 {
        self.depth_end
            .unwrap_or_else(|| self.hole_cleaning_model().default_depth_end(params))
    }

    /// Depth domain `[0, end]` in the active strategy's unit.
    pub fn depth_domain(&self, params: &DrillingParameters) -> Domain {
        Domain::linspace(0.0, self.resolved_depth_end(params), self.samples)
    }

    pub fn inclination_domain(&self) -> Domain {
        Domain::linspace(self.inclination_start_deg, self.inclination_end_deg, self.samples)
    }

    /// Hole-cleaning profile over the default depth domain.
    pub fn hole_cleaning(&self, params: &DrillingParameters) -> HoleCleaningProfile {
        let depth = self.depth_domain(params);
        self.hole_cleaning_over(params, depth.values())
    }

    /// Hole-cleaning profile over a caller-supplied depth domain.
    pub fn hole_cleaning_over(
        &self,
        params: &DrillingParameters,
        depth: &[f64],
    ) -> HoleCleaningProfile {
        compute_hole_cleaning_profile(self.hole_cleaning_model(), params, depth, &self.advisory)
    }

    /// Bottom hole pressure (psi) along a hole-cleaning profile.
    ///
    /// Metre domains are converted to feet before the hydrostatic gradient
    /// is applied.
    pub fn bottom_hole_pressure(
        &self,
        params: &DrillingParameters,
        profile: &HoleCleaningProfile,
    ) -> Vec<f64> {
        compute_bottom_hole_pressure(params, &profile.depth_ft(), &profile.bed_height)
    }

    /// Bottom hole pressure over the default depth domain.
    pub fn pressure_profile(&self, params: &DrillingParameters) -> PressureProfile {
        let profile = self.hole_cleaning(params);
        let pressure = self.bottom_hole_pressure(params, &profile);
        PressureProfile {
            depth_unit: profile.depth_unit,
            depth: profile.depth,
            pressure,
        }
    }

    /// Effective WOB over the default inclination domain.
    pub fn effective_wob(&self, params: &DrillingParameters) -> WobProfile {
        let inclination = self.inclination_domain();
        compute_effective_wob(&self.effective_wob, params, inclination.values())
    }

    /// Evaluate every model for one parameter set.
    pub fn evaluate(&self, params: &DrillingParameters) -> ProfileResult {
        let hole_cleaning = self.hole_cleaning(params);
        let pressure = self.bottom_hole_pressure(params, &hole_cleaning);
        let wob = self.effective_wob(params);

        debug!(
            model = %self.hole_cleaning,
            samples = self.samples,
            hole_cleaning = %hole_cleaning.recommendation.severity,
            effective_wob = %wob.recommendation.severity,
            "Profile evaluated"
        );

        ProfileResult {
            parameters: *params,
            hole_cleaning,
            pressure,
            wob,
        }
    }
}
