//! Text and CSV rendering for profiles and surveys.
//!
//! Text output is a compact table sampled across the domain followed by the
//! recommendation banner. CSV output is one column per series, for charting
//! in an external tool.

use std::io::{self, Write};

use crate::config::defaults::{REPORT_TABLE_ROWS, SURVEY_PREVIEW_ROWS};
use crate::survey::Survey;
use crate::types::{
    HoleCleaningProfile, PressureProfile, ProfileResult, Recommendation, Severity, WobProfile,
};

/// Indices of at most `rows` samples spread evenly over `len`, first and last included.
pub fn sample_indices(len: usize, rows: usize) -> Vec<usize> {
    if len <= rows {
        return (0..len).collect();
    }
    if rows <= 1 {
        return vec![0; rows];
    }
    let mut indices: Vec<usize> = (0..rows)
        .map(|i| ((i * (len - 1)) as f64 / (rows - 1) as f64).round() as usize)
        .collect();
    indices.dedup();
    indices
}

fn render_recommendation(rec: &Recommendation) -> String {
    let mut output = String::new();
    let marker = match rec.severity {
        Severity::Acceptable => "OK",
        Severity::Low => "!!",
    };
    output.push_str(&format!(
        "[{marker}] {} {}: {}\n",
        rec.topic, rec.severity, rec.message
    ));
    for action in &rec.actions {
        output.push_str(&format!("     - {action}\n"));
    }
    output
}

// ============================================================================
// Text Rendering
// ============================================================================

pub fn render_hole_cleaning(profile: &HoleCleaningProfile) -> String {
    let unit = profile.depth_unit;
    let mut output = String::new();
    output.push_str(&format!("Hole Cleaning ({})\n", profile.model));
    output.push_str("==========================\n");
    output.push_str(&format!(
        "{:>12}  {:>14}  {:>10}\n",
        format!("Depth ({unit})"),
        "Concentration",
        "Bed Height"
    ));
    let rows = profile
        .depth
        .len()
        .min(profile.concentration.len())
        .min(profile.bed_height.len());
    for i in sample_indices(rows, REPORT_TABLE_ROWS) {
        output.push_str(&format!(
            "{:>12.1}  {:>14.4}  {:>10.4}\n",
            profile.depth[i], profile.concentration[i], profile.bed_height[i]
        ));
    }
    if let Some((first, last)) = profile.critical_depths.first().zip(profile.critical_depths.last()) {
        output.push_str(&format!(
            "Critical zone(s): {} sample(s) between {first:.1} and {last:.1} {unit}\n",
            profile.critical_depths.len()
        ));
    }
    output.push('\n');
    output.push_str(&render_recommendation(&profile.recommendation));
    output
}

pub fn render_pressure(profile: &PressureProfile) -> String {
    let mut output = String::new();
    output.push_str("Bottom Hole Pressure\n");
    output.push_str("====================\n");
    output.push_str(&format!(
        "{:>12}  {:>14}\n",
        format!("Depth ({})", profile.depth_unit),
        "Pressure (psi)"
    ));
    let len = profile.depth.len().min(profile.pressure.len());
    for i in sample_indices(len, REPORT_TABLE_ROWS) {
        output.push_str(&format!(
            "{:>12.1}  {:>14.1}\n",
            profile.depth[i], profile.pressure[i]
        ));
    }
    if let Some(max) = profile.pressure.iter().copied().reduce(f64::max) {
        output.push_str(&format!("Maximum: {max:.1} psi\n"));
    }
    output
}

pub fn render_wob(profile: &WobProfile) -> String {
    let mut output = String::new();
    output.push_str("Effective WOB\n");
    output.push_str("=============\n");
    output.push_str(&format!(
        "{:>12}  {:>18}\n",
        "Incl (deg)", "Effective WOB (lbf)"
    ));
    let rows = profile.inclination.len().min(profile.effective_wob.len());
    for i in sample_indices(rows, REPORT_TABLE_ROWS) {
        output.push_str(&format!(
            "{:>12.1}  {:>18.1}\n",
            profile.inclination[i], profile.effective_wob[i]
        ));
    }
    output.push('\n');
    output.push_str(&render_recommendation(&profile.recommendation));
    output
}

pub fn render_result(result: &ProfileResult) -> String {
    let pressure = PressureProfile {
        depth_unit: result.hole_cleaning.depth_unit,
        depth: result.hole_cleaning.depth.clone(),
        pressure: result.pressure.clone(),
    };

    let mut output = String::new();
    output.push_str(&render_hole_cleaning(&result.hole_cleaning));
    output.push('\n');
    output.push_str(&render_pressure(&pressure));
    output.push('\n');
    output.push_str(&render_wob(&result.wob));
    output.push_str("\nRecommendations\n");
    output.push_str("===============\n");
    for rec in result.recommendations() {
        output.push_str(&render_recommendation(rec));
    }
    output
}

/// Survey summary plus the first `preview` stations (defaults to a handful).
pub fn render_survey(survey: &Survey, preview: Option<usize>) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Survey: {} station(s) ({:?})\n",
        survey.len(),
        survey.format
    ));
    if let Some((lo, hi)) = survey.md_range() {
        output.push_str(&format!("MD range: {lo:.1} - {hi:.1} m\n"));
    }
    if let Some(max) = survey.max_inclination() {
        output.push_str(&format!("Max inclination: {max:.2} deg\n"));
    }
    let rows = preview.unwrap_or(SURVEY_PREVIEW_ROWS);
    if rows > 0 && !survey.is_empty() {
        output.push_str(&format!(
            "\n{:>10}  {:>12}  {:>10}\n",
            "MD (m)", "Inclination", "Azimuth"
        ));
        for s in survey.stations.iter().take(rows) {
            output.push_str(&format!(
                "{:>10.2}  {:>12.2}  {:>10.2}\n",
                s.md, s.inclination, s.azimuth
            ));
        }
    }
    output
}

// ============================================================================
// CSV Series
// ============================================================================

/// Write named series as CSV columns. Shorter series leave trailing cells empty.
pub fn write_csv_series<W: Write>(out: W, series: &[(&str, &[f64])]) -> io::Result<()> {
    let mut writer = io::BufWriter::new(out);
    let header: Vec<&str> = series.iter().map(|(name, _)| *name).collect();
    writeln!(writer, "{}", header.join(","))?;

    let rows = series.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
    for i in 0..rows {
        let row: Vec<String> = series
            .iter()
            .map(|(_, v)| v.get(i).map(|x| x.to_string()).unwrap_or_default())
            .collect();
        writeln!(writer, "{}", row.join(","))?;
    }
    writer.flush()
}

pub fn write_hole_cleaning_csv<W: Write>(out: W, profile: &HoleCleaningProfile) -> io::Result<()> {
    let depth_header = format!("depth_{}", profile.depth_unit);
    write_csv_series(
        out,
        &[
            (depth_header.as_str(), profile.depth.as_slice()),
            ("concentration", profile.concentration.as_slice()),
            ("bed_height", profile.bed_height.as_slice()),
        ],
    )
}

pub fn write_pressure_csv<W: Write>(out: W, profile: &PressureProfile) -> io::Result<()> {
    let depth_header = format!("depth_{}", profile.depth_unit);
    write_csv_series(
        out,
        &[
            (depth_header.as_str(), profile.depth.as_slice()),
            ("pressure_psi", profile.pressure.as_slice()),
        ],
    )
}

pub fn write_wob_csv<W: Write>(out: W, profile: &WobProfile) -> io::Result<()> {
    write_csv_series(
        out,
        &[
            ("inclination_deg", profile.inclination.as_slice()),
            ("effective_wob_lbf", profile.effective_wob.as_slice()),
        ],
    )
}

pub fn write_result_csv<W: Write>(out: W, result: &ProfileResult) -> io::Result<()> {
    let hc = &result.hole_cleaning;
    let depth_header = format!("depth_{}", hc.depth_unit);
    write_csv_series(
        out,
        &[
            (depth_header.as_str(), hc.depth.as_slice()),
            ("concentration", hc.concentration.as_slice()),
            ("bed_height", hc.bed_height.as_slice()),
            ("pressure_psi", result.pressure.as_slice()),
            ("inclination_deg", result.wob.inclination.as_slice()),
            ("effective_wob_lbf", result.wob.effective_wob.as_slice()),
        ],
    )
}

pub fn write_survey_csv<W: Write>(out: W, survey: &Survey) -> io::Result<()> {
    let md: Vec<f64> = survey.stations.iter().map(|s| s.md).collect();
    let inclination: Vec<f64> = survey.stations.iter().map(|s| s.inclination).collect();
    let azimuth: Vec<f64> = survey.stations.iter().map(|s| s.azimuth).collect();
    write_csv_series(
        out,
        &[
            ("md", md.as_slice()),
            ("inclination", inclination.as_slice()),
            ("azimuth", azimuth.as_slice()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics_engine::ProfileModel;
    use crate::types::DrillingParameters;

    #[test]
    fn test_sample_indices() {
        assert_eq!(sample_indices(5, 11), vec![0, 1, 2, 3, 4]);
        assert_eq!(sample_indices(0, 11), Vec::<usize>::new());
        let idx = sample_indices(100, 11);
        assert_eq!(idx.len(), 11);
        assert_eq!(idx[0], 0);
        assert_eq!(idx[10], 99);
    }

    #[test]
    fn test_csv_series_pads_short_columns() {
        let mut buf = Vec::new();
        write_csv_series(&mut buf, &[("a", &[1.0, 2.0][..]), ("b", &[3.5][..])]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "a,b\n1,3.5\n2,\n");
    }

    #[test]
    fn test_mismatched_series_render_shortest() {
        let mut profile = ProfileModel::default()
            .with_samples(8)
            .hole_cleaning(&DrillingParameters::default());
        profile.concentration.truncate(3);
        profile.bed_height.truncate(5);
        let text = render_hole_cleaning(&profile);
        let table_rows = text
            .lines()
            .skip(3)
            .take_while(|l| !l.is_empty() && !l.starts_with("Critical"))
            .count();
        assert_eq!(table_rows, 3);

        let mut wob = ProfileModel::default()
            .with_samples(8)
            .effective_wob(&DrillingParameters::default());
        wob.effective_wob.truncate(2);
        assert!(render_wob(&wob).contains("Effective WOB"));
    }

    #[test]
    fn test_result_text_contains_banners() {
        let result = ProfileModel::default().evaluate(&DrillingParameters::default());
        let text = render_result(&result);
        assert!(text.contains("Hole Cleaning (exponential_decay)"));
        assert!(text.contains("Bottom Hole Pressure"));
        assert!(text.contains("Effective WOB LOW"));
        assert!(text.contains("Recommendations"));
    }

    #[test]
    fn test_result_csv_header() {
        let result = ProfileModel::default()
            .with_samples(3)
            .evaluate(&DrillingParameters::default());
        let mut buf = Vec::new();
        write_result_csv(&mut buf, &result).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("depth_m,concentration,bed_height,pressure_psi,inclination_deg,effective_wob_lbf")
        );
        assert_eq!(lines.count(), 3);
    }
}
