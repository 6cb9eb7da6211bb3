//! Effective weight on bit versus inclination
//!
//! `WOB_eff = WOB · exp(-θ/45) · (1 - min(1, exp(-θ/30)))`
//!
//! The first factor is the weight-transfer loss as the string lies on the
//! low side. The second is a saturation term for the onset of buckling and
//! cuttings accumulation; it is zero in a vertical hole, so the curve starts
//! at zero and peaks at intermediate inclination.

use serde::{Deserialize, Serialize};

use crate::types::{
    DrillingParameters, Recommendation, RecommendationTopic, Severity, SuggestedAction, WobProfile,
};

/// Decay constants and the LOW policy for the effective WOB curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectiveWobModel {
    /// Weight-transfer decay (degrees)
    pub transfer_decay_deg: f64,
    /// Buckling / accumulation saturation decay (degrees)
    pub saturation_decay_deg: f64,
    /// LOW when the minimum effective WOB is below this fraction of surface WOB
    pub low_ratio: f64,
}

impl Default for EffectiveWobModel {
    fn default() -> Self {
        Self {
            transfer_decay_deg: 45.0,
            saturation_decay_deg: 30.0,
            low_ratio: 0.5,
        }
    }
}

impl EffectiveWobModel {
    /// Effective WOB at a single inclination (same unit as `wob`).
    ///
    /// Zero wherever the saturation term is zero (θ ≤ 0), even where the
    /// transfer term has overflowed to infinity.
    pub fn effective_wob_at(&self, wob: f64, inclination_deg: f64) -> f64 {
        let saturation = 1.0 - (-inclination_deg / self.saturation_decay_deg).exp().min(1.0);
        if saturation == 0.0 {
            return 0.0;
        }
        let transfer = (-inclination_deg / self.transfer_decay_deg).exp();
        wob * transfer * saturation
    }
}

/// Evaluate the effective WOB curve over an inclination domain.
pub fn compute_effective_wob(
    model: &EffectiveWobModel,
    params: &DrillingParameters,
    inclination: &[f64],
) -> WobProfile {
    let effective_wob: Vec<f64> = inclination
        .iter()
        .map(|&incl| model.effective_wob_at(params.wob, incl))
        .collect();

    let floor = model.low_ratio * params.wob;
    let critical_samples = effective_wob.iter().filter(|&&w| w < floor).count();

    let recommendation = if critical_samples > 0 {
        Recommendation {
            topic: RecommendationTopic::EffectiveWob,
            severity: Severity::Low,
            message: format!(
                "Effective WOB is low: {} sample(s) below {:.0}% of surface WOB",
                critical_samples,
                model.low_ratio * 100.0
            ),
            actions: vec![SuggestedAction::CheckBucklingAndCuttings],
            critical_samples,
        }
    } else {
        Recommendation {
            topic: RecommendationTopic::EffectiveWob,
            severity: Severity::Acceptable,
            message: "Effective WOB is within the expected range".to_string(),
            actions: Vec::new(),
            critical_samples: 0,
        }
    };

    WobProfile {
        inclination: inclination.to_vec(),
        effective_wob,
        recommendation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Domain;

    #[test]
    fn test_vertical_hole_has_zero_effective_wob() {
        let model = EffectiveWobModel::default();
        assert_eq!(model.effective_wob_at(20_000.0, 0.0), 0.0);
    }

    #[test]
    fn test_large_negative_inclination_is_zero_not_nan() {
        let model = EffectiveWobModel::default();
        for incl in [-10.0, -40_000.0, -1.0e300] {
            let w = model.effective_wob_at(20_000.0, incl);
            assert_eq!(w, 0.0, "incl {incl}");
        }

        let profile =
            compute_effective_wob(&model, &DrillingParameters::default(), &[-40_000.0, -35_000.0]);
        assert!(profile.effective_wob.iter().all(|w| w.is_finite()));
        assert_eq!(profile.recommendation.severity, Severity::Low);
        assert_eq!(profile.recommendation.critical_samples, 2);
    }

    #[test]
    fn test_horizontal_value() {
        let model = EffectiveWobModel::default();
        // exp(-2) * (1 - exp(-3)) = 0.135335 * 0.950213 = 0.128597
        let w = model.effective_wob_at(20_000.0, 90.0);
        assert!((w - 2571.94).abs() < 0.1, "wob: {}", w);
    }

    #[test]
    fn test_curve_peaks_at_intermediate_inclination() {
        let model = EffectiveWobModel::default();
        let params = DrillingParameters::default();
        let incl = Domain::linspace(0.0, 90.0, 91);
        let profile = compute_effective_wob(&model, &params, incl.values());
        let (peak_idx, _) = profile
            .effective_wob
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |acc, (i, &w)| if w > acc.1 { (i, w) } else { acc });
        assert!(peak_idx > 10 && peak_idx < 40, "peak at {}", peak_idx);
    }

    #[test]
    fn test_low_recommendation_from_zero_inclination() {
        let model = EffectiveWobModel::default();
        let params = DrillingParameters::default();
        let profile = compute_effective_wob(&model, &params, &[0.0, 45.0]);
        assert_eq!(profile.recommendation.severity, Severity::Low);
        assert_eq!(
            profile.recommendation.actions,
            vec![SuggestedAction::CheckBucklingAndCuttings]
        );
    }

    #[test]
    fn test_empty_domain_is_acceptable() {
        let profile =
            compute_effective_wob(&EffectiveWobModel::default(), &DrillingParameters::default(), &[]);
        assert!(profile.effective_wob.is_empty());
        assert_eq!(profile.recommendation.severity, Severity::Acceptable);
    }

    #[test]
    fn test_zero_ratio_never_low() {
        let model = EffectiveWobModel {
            low_ratio: 0.0,
            ..EffectiveWobModel::default()
        };
        let profile = compute_effective_wob(&model, &DrillingParameters::default(), &[0.0, 30.0]);
        assert_eq!(profile.recommendation.severity, Severity::Acceptable);
    }
}
