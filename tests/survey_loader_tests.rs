//! Survey Loader Tests
//!
//! Load real files from a temp directory through `Survey::load`, covering
//! every supported extension and the user-facing error cases.

use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;
use wellprofile::survey::{Survey, SurveyError, SurveyFormat};

fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Minimal xlsx: workbook + relationships + one sheet + optional shared strings.
fn build_xlsx(sheet_xml: &str, shared_strings: Option<&str>) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Stored);

    let workbook = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets><sheet name="Survey" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#;
    let rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/survey.xml"/>
</Relationships>"#;

    zip.start_file("xl/workbook.xml", options).unwrap();
    zip.write_all(workbook.as_bytes()).unwrap();
    zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
    zip.write_all(rels.as_bytes()).unwrap();
    zip.start_file("xl/worksheets/survey.xml", options).unwrap();
    zip.write_all(sheet_xml.as_bytes()).unwrap();
    if let Some(sst) = shared_strings {
        zip.start_file("xl/sharedStrings.xml", options).unwrap();
        zip.write_all(sst.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

// ============================================================================
// Delimited Text
// ============================================================================

#[test]
fn csv_survey_loads_stations_in_order() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "F-9A.csv",
        b"MD,Inclination,Azimuth,TVD\n0,0,0,0\n150.5,2.25,118.0,150.4\n300,6.5,121.75,299.1\n",
    );

    let survey = Survey::load(&path).unwrap();
    assert_eq!(survey.format, SurveyFormat::Delimited);
    assert_eq!(survey.len(), 3);
    assert_eq!(survey.stations[1].md, 150.5);
    assert_eq!(survey.stations[1].inclination, 2.25);
    assert_eq!(survey.stations[2].azimuth, 121.75);
    assert_eq!(survey.md_range(), Some((0.0, 300.0)));
    assert_eq!(survey.trajectory_points()[2], [121.75, 6.5, 300.0]);
}

#[test]
fn tsv_and_semicolon_files_are_detected() {
    let dir = TempDir::new().unwrap();
    let tsv = write_file(&dir, "s.tsv", b"Azimuth\tMD\tInclination\n10\t100\t1\n");
    let semi = write_file(&dir, "s.txt", b"md;inclination;azimuth\n100;1;10\n");

    for path in [tsv, semi] {
        let survey = Survey::load(&path).unwrap();
        assert_eq!(survey.len(), 1, "{}", path.display());
        assert_eq!(survey.stations[0].md, 100.0);
        assert_eq!(survey.stations[0].inclination, 1.0);
        assert_eq!(survey.stations[0].azimuth, 10.0);
    }
}

#[test]
fn missing_md_column_is_named_in_error() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "no_md.csv", b"Inclination,Azimuth\n1,2\n");

    let err = Survey::load(&path).unwrap_err();
    match &err {
        SurveyError::MissingColumns(cols) => assert_eq!(cols, &vec!["MD".to_string()]),
        other => panic!("expected MissingColumns, got {other:?}"),
    }
    assert!(err.to_string().contains("MD"), "message: {err}");
}

#[test]
fn all_missing_columns_are_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "wrong.csv", b"Depth,Angle\n1,2\n");
    match Survey::load(&path).unwrap_err() {
        SurveyError::MissingColumns(cols) => {
            assert_eq!(cols, vec!["Azimuth", "Inclination", "MD"]);
        }
        other => panic!("expected MissingColumns, got {other:?}"),
    }
}

#[test]
fn non_numeric_value_reports_file_row() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "bad.csv", b"MD,Inclination,Azimuth\n0,0,0\n\n100,n/a,12\n");

    match Survey::load(&path).unwrap_err() {
        SurveyError::InvalidValue { row, column, value } => {
            assert_eq!(row, 4);
            assert_eq!(column, "Inclination");
            assert_eq!(value, "n/a");
        }
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}

#[test]
fn empty_and_header_only_files() {
    let dir = TempDir::new().unwrap();
    let empty = write_file(&dir, "empty.csv", b"");
    let header_only = write_file(&dir, "header.csv", b"MD,Inclination,Azimuth\n");

    assert!(matches!(Survey::load(&empty), Err(SurveyError::Empty)));
    let survey = Survey::load(&header_only).unwrap();
    assert!(survey.is_empty());
    assert_eq!(survey.md_range(), None);
}

#[test]
fn unsupported_extension_and_missing_file() {
    let dir = TempDir::new().unwrap();
    let pdf = write_file(&dir, "survey.pdf", b"%PDF");
    assert!(matches!(
        Survey::load(&pdf),
        Err(SurveyError::UnsupportedFormat(ext)) if ext == "pdf"
    ));

    let missing = dir.path().join("nope.csv");
    assert!(matches!(Survey::load(&missing), Err(SurveyError::Io { .. })));
}

// ============================================================================
// XLSX
// ============================================================================

#[test]
fn xlsx_survey_with_shared_strings() {
    let sst = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="3" uniqueCount="3">
  <si><t>MD</t></si><si><t>Inclination</t></si><si><t>Azimuth</t></si>
</sst>"#;
    let sheet = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c><c r="C1" t="s"><v>2</v></c></row>
    <row r="2"><c r="A2"><v>0</v></c><c r="B2"><v>0</v></c><c r="C2"><v>0</v></c></row>
    <row r="3"><c r="A3"><v>512.25</v></c><c r="B3"><v>14.5</v></c><c r="C3"><v>233</v></c></row>
  </sheetData>
</worksheet>"#;

    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "survey.xlsx", &build_xlsx(sheet, Some(sst)));

    let survey = Survey::load(&path).unwrap();
    assert_eq!(survey.format, SurveyFormat::Xlsx);
    assert_eq!(survey.len(), 2);
    assert_eq!(survey.stations[1].md, 512.25);
    assert_eq!(survey.max_inclination(), Some(14.5));
}

#[test]
fn xlsx_missing_md_column_is_named_in_error() {
    let sheet = r#"<worksheet><sheetData>
  <row r="1"><c r="A1" t="inlineStr"><is><t>Inclination</t></is></c><c r="B1" t="inlineStr"><is><t>Azimuth</t></is></c></row>
  <row r="2"><c r="A2"><v>1</v></c><c r="B2"><v>2</v></c></row>
</sheetData></worksheet>"#;

    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "no_md.xlsx", &build_xlsx(sheet, None));

    let err = Survey::load(&path).unwrap_err();
    assert!(matches!(&err, SurveyError::MissingColumns(cols) if cols == &vec!["MD".to_string()]));
    assert!(err.to_string().contains("MD"));
}

#[test]
fn xlsx_bad_cell_reports_sheet_row() {
    let sheet = r#"<worksheet><sheetData>
  <row r="1"><c r="A1" t="inlineStr"><is><t>MD</t></is></c><c r="B1" t="inlineStr"><is><t>Inclination</t></is></c><c r="C1" t="inlineStr"><is><t>Azimuth</t></is></c></row>
  <row r="7"><c r="A7"><v>100</v></c><c r="B7" t="str"><v>steep</v></c><c r="C7"><v>5</v></c></row>
</sheetData></worksheet>"#;

    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "bad.xlsx", &build_xlsx(sheet, None));

    match Survey::load(&path).unwrap_err() {
        SurveyError::InvalidValue { row, column, value } => {
            assert_eq!(row, 7);
            assert_eq!(column, "Inclination");
            assert_eq!(value, "steep");
        }
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}

#[test]
fn corrupt_xlsx_is_spreadsheet_error() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "corrupt.xlsx", b"MD,Inclination,Azimuth\n");
    assert!(matches!(Survey::load(&path), Err(SurveyError::Spreadsheet(_))));
}

#[test]
fn xlsx_cell_beyond_last_column_is_spreadsheet_error() {
    let sheet = r#"<worksheet><sheetData>
  <row r="1"><c r="ZZZZZZZZZ1" t="inlineStr"><is><t>MD</t></is></c></row>
</sheetData></worksheet>"#;

    match Survey::from_xlsx_bytes(&build_xlsx(sheet, None)) {
        Err(SurveyError::Spreadsheet(msg)) => assert!(msg.contains("out of range"), "{msg}"),
        other => panic!("expected Spreadsheet error, got {other:?}"),
    }
}
