//! Parameter-driven operational suggestions
//!
//! When a profile comes back LOW, these rules turn the current drilling
//! parameters into concrete actions for the driller.

use serde::{Deserialize, Serialize};

use crate::types::{DrillingParameters, SuggestedAction};

/// Limits that decide which actions accompany a LOW hole-cleaning result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryLimits {
    /// Suggest more RPM below this rotary speed (rpm)
    pub rpm_target: f64,
    /// Suggest more flow below this pump rate (gpm)
    pub flow_target: f64,
    /// Suggest less WOB above this load (lbf)
    pub wob_limit: f64,
}

impl Default for AdvisoryLimits {
    fn default() -> Self {
        Self {
            rpm_target: 200.0,
            flow_target: 600.0,
            wob_limit: 30_000.0,
        }
    }
}

/// Actions for a LOW hole-cleaning result, in a fixed order.
///
/// Empty when every parameter is already on the right side of its limit.
pub fn hole_cleaning_actions(
    params: &DrillingParameters,
    limits: &AdvisoryLimits,
) -> Vec<SuggestedAction> {
    let mut actions = Vec::new();
    if params.rpm < limits.rpm_target {
        actions.push(SuggestedAction::IncreaseRpm);
    }
    if params.flow_rate < limits.flow_target {
        actions.push(SuggestedAction::IncreaseFlowRate);
    }
    if params.wob > limits.wob_limit {
        actions.push(SuggestedAction::ReduceWob);
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_actions_when_parameters_are_aggressive() {
        let p = DrillingParameters {
            rpm: 220.0,
            flow_rate: 800.0,
            wob: 15_000.0,
            ..DrillingParameters::default()
        };
        assert!(hole_cleaning_actions(&p, &AdvisoryLimits::default()).is_empty());
    }

    #[test]
    fn test_limits_are_exclusive() {
        let limits = AdvisoryLimits::default();
        let p = DrillingParameters {
            rpm: 200.0,
            flow_rate: 600.0,
            wob: 30_000.0,
            ..DrillingParameters::default()
        };
        assert!(hole_cleaning_actions(&p, &limits).is_empty());
    }

    #[test]
    fn test_default_parameters_suggest_rpm_only() {
        let actions =
            hole_cleaning_actions(&DrillingParameters::default(), &AdvisoryLimits::default());
        assert_eq!(actions, vec![SuggestedAction::IncreaseRpm]);
    }
}
