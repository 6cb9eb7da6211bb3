//! Directional Survey Loader
//!
//! Reads survey stations (measured depth, inclination, azimuth) from a
//! delimited text file or an `.xlsx` workbook. The three required columns
//! are matched by header name, case-insensitively:
//!
//! | Column        | Unit    |
//! |---------------|---------|
//! | `MD`          | m       |
//! | `Inclination` | degrees |
//! | `Azimuth`     | degrees |
//!
//! Extra columns are ignored. Any missing column or unparsable value is
//! reported as a [`SurveyError`] naming the column (and row) at fault; the
//! loader never panics on bad input.
//!
//! # Usage
//!
//! ```ignore
//! use wellprofile::survey::Survey;
//!
//! let survey = Survey::load("surveys/F-9A.csv")?;
//! for station in &survey.stations {
//!     println!("{} {} {}", station.md, station.inclination, station.azimuth);
//! }
//! ```

mod delimited;
mod xlsx;

pub use delimited::detect_delimiter;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Header names of the required columns, in report order.
pub const REQUIRED_COLUMNS: [&str; 3] = ["Azimuth", "Inclination", "MD"];

// ============================================================================
// Errors
// ============================================================================

/// Survey parsing failure. Reported to the user, never fatal to the process.
#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("Failed to read survey file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported survey file type '{0}' (expected .csv, .tsv, .txt or .xlsx)")]
    UnsupportedFormat(String),

    #[error("Survey file is empty")]
    Empty,

    #[error("Survey file is missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Row {row}: column '{column}' value '{value}' is not a number")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),
}

// ============================================================================
// Survey Types
// ============================================================================

/// Source format of a loaded survey.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SurveyFormat {
    Delimited,
    Xlsx,
}

impl SurveyFormat {
    /// Pick the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, SurveyError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" | "tsv" | "txt" => Ok(Self::Delimited),
            "xlsx" => Ok(Self::Xlsx),
            _ => Err(SurveyError::UnsupportedFormat(ext)),
        }
    }
}

/// A single survey station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurveyStation {
    /// Measured depth (m)
    pub md: f64,
    /// Inclination (degrees)
    pub inclination: f64,
    /// Azimuth (degrees)
    pub azimuth: f64,
}

/// A loaded directional survey, stations in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    pub format: SurveyFormat,
    pub stations: Vec<SurveyStation>,
}

impl Survey {
    /// Load a survey file, choosing the parser by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SurveyError> {
        let path = path.as_ref();
        let format = SurveyFormat::from_path(path)?;
        let bytes = std::fs::read(path).map_err(|source| SurveyError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let survey = match format {
            SurveyFormat::Delimited => {
                let text = String::from_utf8_lossy(&bytes);
                Self::from_delimited_str(&text)?
            }
            SurveyFormat::Xlsx => Self::from_xlsx_bytes(&bytes)?,
        };

        info!(
            path = %path.display(),
            format = ?format,
            stations = survey.len(),
            "Survey loaded"
        );
        Ok(survey)
    }

    /// Parse delimited text (comma, semicolon or tab, detected from the header).
    pub fn from_delimited_str(text: &str) -> Result<Self, SurveyError> {
        let rows = delimited::parse_rows(text);
        Ok(Self {
            format: SurveyFormat::Delimited,
            stations: stations_from_rows(&rows)?,
        })
    }

    /// Parse the first worksheet of an `.xlsx` workbook.
    pub fn from_xlsx_bytes(bytes: &[u8]) -> Result<Self, SurveyError> {
        let rows = xlsx::read_first_sheet(bytes)?;
        Ok(Self {
            format: SurveyFormat::Xlsx,
            stations: stations_from_rows(&rows)?,
        })
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Shallowest and deepest measured depth, `None` for an empty survey.
    pub fn md_range(&self) -> Option<(f64, f64)> {
        self.stations.iter().fold(None, |acc, s| match acc {
            None => Some((s.md, s.md)),
            Some((lo, hi)) => Some((lo.min(s.md), hi.max(s.md))),
        })
    }

    pub fn max_inclination(&self) -> Option<f64> {
        self.stations
            .iter()
            .map(|s| s.inclination)
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }

    /// `(azimuth, inclination, md)` triples for a 3D line plot.
    pub fn trajectory_points(&self) -> Vec<[f64; 3]> {
        self.stations
            .iter()
            .map(|s| [s.azimuth, s.inclination, s.md])
            .collect()
    }
}

// ============================================================================
// Row Table -> Stations
// ============================================================================

/// Row number (1-based, as a spreadsheet user sees it) plus cell values.
pub(crate) type Row = (usize, Vec<String>);

/// Locate the required columns in the header and parse every data row.
///
/// The first row is the header. Rows with every cell blank are skipped.
fn stations_from_rows(rows: &[Row]) -> Result<Vec<SurveyStation>, SurveyError> {
    let (header, data) = rows.split_first().ok_or(SurveyError::Empty)?;

    let find = |name: &str| {
        header
            .1
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    let mut missing = Vec::new();
    let mut indices = [0usize; 3];
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        match find(name) {
            Some(idx) => *slot = idx,
            None => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(SurveyError::MissingColumns(missing));
    }
    let [azimuth_idx, inclination_idx, md_idx] = indices;
    debug!(azimuth_idx, inclination_idx, md_idx, "Survey columns located");

    let mut stations = Vec::with_capacity(data.len());
    for (row_no, cells) in data {
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        let value = |idx: usize, column: &str| -> Result<f64, SurveyError> {
            let raw = cells.get(idx).map(|s| s.trim()).unwrap_or("");
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| SurveyError::InvalidValue {
                    row: *row_no,
                    column: column.to_string(),
                    value: raw.to_string(),
                })
        };
        stations.push(SurveyStation {
            md: value(md_idx, "MD")?,
            inclination: value(inclination_idx, "Inclination")?,
            azimuth: value(azimuth_idx, "Azimuth")?,
        });
    }

    Ok(stations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&[&str]]) -> Vec<Row> {
        lines
            .iter()
            .enumerate()
            .map(|(i, cells)| (i + 1, cells.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_columns_matched_case_insensitively_in_any_order() {
        let table = rows(&[
            &["md", " AZIMUTH ", "TVD", "inclination"],
            &["100", "45", "99.9", "2.5"],
        ]);
        let stations = stations_from_rows(&table).unwrap();
        assert_eq!(
            stations,
            vec![SurveyStation {
                md: 100.0,
                inclination: 2.5,
                azimuth: 45.0
            }]
        );
    }

    #[test]
    fn test_missing_md_named_in_error() {
        let table = rows(&[&["Azimuth", "Inclination"], &["10", "1"]]);
        let err = stations_from_rows(&table).unwrap_err();
        match &err {
            SurveyError::MissingColumns(cols) => assert_eq!(cols, &vec!["MD".to_string()]),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.to_string().contains("MD"));
    }

    #[test]
    fn test_bad_value_reports_row_and_column() {
        let table = rows(&[
            &["MD", "Inclination", "Azimuth"],
            &["0", "0", "0"],
            &["100", "abc", "12"],
        ]);
        let err = stations_from_rows(&table).unwrap_err();
        match err {
            SurveyError::InvalidValue { row, column, value } => {
                assert_eq!(row, 3);
                assert_eq!(column, "Inclination");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_short_row_is_invalid_value() {
        let table = rows(&[&["MD", "Inclination", "Azimuth"], &["100", "2"]]);
        assert!(matches!(
            stations_from_rows(&table),
            Err(SurveyError::InvalidValue { column, .. }) if column == "Azimuth"
        ));
    }

    #[test]
    fn test_header_only_is_empty_survey() {
        let table = rows(&[&["MD", "Inclination", "Azimuth"]]);
        assert!(stations_from_rows(&table).unwrap().is_empty());
        assert!(matches!(stations_from_rows(&[]), Err(SurveyError::Empty)));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            SurveyFormat::from_path(Path::new("a/B.CSV")).unwrap(),
            SurveyFormat::Delimited
        );
        assert_eq!(
            SurveyFormat::from_path(Path::new("b.xlsx")).unwrap(),
            SurveyFormat::Xlsx
        );
        assert!(matches!(
            SurveyFormat::from_path(Path::new("c.xls")),
            Err(SurveyError::UnsupportedFormat(ext)) if ext == "xls"
        ));
    }

    #[test]
    fn test_summary_helpers() {
        let survey = Survey {
            format: SurveyFormat::Delimited,
            stations: vec![
                SurveyStation { md: 0.0, inclination: 0.0, azimuth: 0.0 },
                SurveyStation { md: 500.0, inclination: 12.0, azimuth: 80.0 },
                SurveyStation { md: 250.0, inclination: 4.0, azimuth: 75.0 },
            ],
        };
        assert_eq!(survey.md_range(), Some((0.0, 500.0)));
        assert_eq!(survey.max_inclination(), Some(12.0));
        assert_eq!(survey.trajectory_points()[1], [80.0, 12.0, 500.0]);

        let empty = Survey {
            format: SurveyFormat::Xlsx,
            stations: Vec::new(),
        };
        assert_eq!(empty.md_range(), None);
        assert_eq!(empty.max_inclination(), None);
    }
}
