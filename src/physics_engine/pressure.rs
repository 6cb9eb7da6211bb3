//! Bottom hole pressure over a depth profile.

/// Hydrostatic gradient of a 1 ppg fluid (psi/ft).
///
/// `P = 0.052 × MW × TVD` with MW in ppg and TVD in ft: one gallon-per-foot
/// column of fluid over a square inch (12 in/ft ÷ 231 in³/gal).
pub const HYDROSTATIC_GRADIENT_PSI_FT_PER_PPG: f64 = 0.052;

/// Hydrostatic pressure of a mud column (psi).
pub fn hydrostatic_pressure(mud_density_ppg: f64, depth_ft: f64) -> f64 {
    HYDROSTATIC_GRADIENT_PSI_FT_PER_PPG * mud_density_ppg * depth_ft
}

/// Bottom hole pressure at each depth sample (psi).
///
/// `P[i] = 0.052·MW·d[i] + 0.5·bed[i]·0.052·MW`. The cuttings-bed term adds
/// half the bed height (ft) as extra hydrostatic head.
///
/// Series of unequal length are evaluated over the shorter one.
pub fn compute_bottom_hole_pressure(
    params: &crate::types::DrillingParameters,
    depth_ft: &[f64],
    bed_height: &[f64],
) -> Vec<f64> {
    let gradient = HYDROSTATIC_GRADIENT_PSI_FT_PER_PPG * params.mud_density;
    depth_ft
        .iter()
        .zip(bed_height)
        .map(|(&d, &bed)| gradient * d + 0.5 * bed * gradient)
        .collect()
}
