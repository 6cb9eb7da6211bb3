//! Minimal `.xlsx` reader: first worksheet only, cell text only.
//!
//! An xlsx workbook is a zip archive of XML parts. The first sheet is
//! resolved through `xl/workbook.xml` and its relationships file, falling
//! back to `xl/worksheets/sheet1.xml`. Shared strings, inline strings and
//! plain values are supported; styles and formulas are ignored (a formula
//! cell contributes its cached value).

use std::io::{Cursor, Read, Seek};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use super::{Row, SurveyError};

const FALLBACK_SHEET: &str = "xl/worksheets/sheet1.xml";

fn xml_err(e: impl std::fmt::Display) -> SurveyError {
    SurveyError::Spreadsheet(format!("malformed workbook XML: {e}"))
}

/// Read the first worksheet into numbered rows of cell text.
///
/// Rows whose cells are all blank are dropped.
pub(crate) fn read_first_sheet(bytes: &[u8]) -> Result<Vec<Row>, SurveyError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| SurveyError::Spreadsheet(format!("not an xlsx archive: {e}")))?;

    let shared = match read_entry(&mut archive, "xl/sharedStrings.xml")? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };

    let sheet_path = first_sheet_path(&mut archive)?;
    let sheet_xml = read_entry(&mut archive, &sheet_path)?.ok_or_else(|| {
        SurveyError::Spreadsheet(format!("worksheet '{sheet_path}' not found in workbook"))
    })?;

    let mut rows = parse_sheet(&sheet_xml, &shared)?;
    rows.retain(|(_, cells)| cells.iter().any(|c| !c.trim().is_empty()));
    Ok(rows)
}

/// Read a zip entry as text, `None` when the entry does not exist.
fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, SurveyError> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => {
            return Err(SurveyError::Spreadsheet(format!("failed to open {name}: {e}")));
        }
    };
    let mut content = String::new();
    entry
        .read_to_string(&mut content)
        .map_err(|e| SurveyError::Spreadsheet(format!("failed to read {name}: {e}")))?;
    Ok(Some(content))
}

/// Value of the attribute whose local name is `key`.
fn attr(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, SurveyError> {
    for a in e.attributes() {
        let a = a.map_err(xml_err)?;
        if a.key.local_name().as_ref() == key {
            return Ok(Some(a.unescape_value().map_err(xml_err)?.into_owned()));
        }
    }
    Ok(None)
}

// ============================================================================
// Workbook Structure
// ============================================================================

fn first_sheet_path<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String, SurveyError> {
    let Some(workbook) = read_entry(archive, "xl/workbook.xml")? else {
        return Ok(FALLBACK_SHEET.to_string());
    };
    let Some(rel_id) = first_sheet_rel_id(&workbook)? else {
        return Ok(FALLBACK_SHEET.to_string());
    };
    let Some(rels) = read_entry(archive, "xl/_rels/workbook.xml.rels")? else {
        return Ok(FALLBACK_SHEET.to_string());
    };

    Ok(relationship_target(&rels, &rel_id)?
        .map(|target| match target.strip_prefix('/') {
            Some(absolute) => absolute.to_string(),
            None => format!("xl/{target}"),
        })
        .unwrap_or_else(|| FALLBACK_SHEET.to_string()))
}

/// `r:id` of the first `<sheet>` in workbook.xml.
fn first_sheet_rel_id(xml: &str) -> Result<Option<String>, SurveyError> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sheet" => {
                return attr(&e, b"id");
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// `Target` of the relationship with the given `Id`.
fn relationship_target(xml: &str, id: &str) -> Result<Option<String>, SurveyError> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if attr(&e, b"Id")?.as_deref() == Some(id) {
                    return attr(&e, b"Target");
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

// ============================================================================
// Shared Strings
// ============================================================================

fn parse_shared_strings(xml: &str) -> Result<Vec<String>, SurveyError> {
    let mut reader = Reader::from_str(xml);
    let mut strings = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;
    let mut in_phonetic = false;

    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"si" => current = Some(String::new()),
                b"t" => in_text = !in_phonetic,
                b"rPh" => in_phonetic = true,
                _ => {}
            },
            Event::Empty(e) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Event::Text(t) if in_text => {
                if let Some(s) = current.as_mut() {
                    s.push_str(&t.unescape().map_err(xml_err)?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"rPh" => in_phonetic = false,
                b"si" => {
                    if let Some(s) = current.take() {
                        strings.push(s);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(strings)
}

// ============================================================================
// Worksheet
// ============================================================================

/// Last column Excel can address (`XFD`), zero-based.
const MAX_COLUMN: usize = 16_383;

/// Zero-based column index from a cell reference such as `AB12`.
///
/// `Ok(None)` when the reference carries no column letters.
fn column_index(cell_ref: &str) -> Result<Option<usize>, SurveyError> {
    let out_of_range =
        || SurveyError::Spreadsheet(format!("cell reference '{cell_ref}' out of range"));
    let mut one_based = 0usize;
    for c in cell_ref.chars().take_while(char::is_ascii_alphabetic) {
        let digit = c.to_ascii_uppercase() as usize - 'A' as usize + 1;
        one_based = one_based
            .checked_mul(26)
            .and_then(|acc| acc.checked_add(digit))
            .filter(|&n| n <= MAX_COLUMN + 1)
            .ok_or_else(out_of_range)?;
    }
    Ok(one_based.checked_sub(1))
}

/// Column of a `<c>` element, falling back to the running position.
fn cell_column(e: &BytesStart<'_>, next_col: usize) -> Result<usize, SurveyError> {
    let explicit = match attr(e, b"r")? {
        Some(r) => column_index(&r)?,
        None => None,
    };
    let col = explicit.unwrap_or(next_col);
    if col > MAX_COLUMN {
        return Err(SurveyError::Spreadsheet(format!(
            "cell column {} out of range",
            col + 1
        )));
    }
    Ok(col)
}

fn resolve_cell(raw: &str, kind: Option<&str>, shared: &[String]) -> Result<String, SurveyError> {
    match kind {
        Some("s") => {
            let idx: usize = raw.trim().parse().map_err(|_| {
                SurveyError::Spreadsheet(format!("invalid shared string index '{raw}'"))
            })?;
            shared.get(idx).cloned().ok_or_else(|| {
                SurveyError::Spreadsheet(format!("shared string index {idx} out of range"))
            })
        }
        _ => Ok(raw.trim().to_string()),
    }
}

fn parse_sheet(xml: &str, shared: &[String]) -> Result<Vec<Row>, SurveyError> {
    let mut reader = Reader::from_str(xml);
    let mut rows: Vec<Row> = Vec::new();
    let mut row_no = 0usize;
    let mut row_cells: Vec<String> = Vec::new();
    let mut next_col = 0usize;
    // (column, type attribute) of the open <c>
    let mut cell: Option<(usize, Option<String>)> = None;
    let mut cell_value = String::new();
    let mut in_value = false;

    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"row" => {
                    row_no = attr(&e, b"r")?
                        .and_then(|r| r.parse().ok())
                        .unwrap_or(row_no + 1);
                    row_cells.clear();
                    next_col = 0;
                }
                b"c" => {
                    let col = cell_column(&e, next_col)?;
                    cell = Some((col, attr(&e, b"t")?));
                    cell_value.clear();
                }
                b"v" | b"t" => in_value = cell.is_some(),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"row" => {
                    row_no = attr(&e, b"r")?
                        .and_then(|r| r.parse().ok())
                        .unwrap_or(row_no + 1);
                }
                b"c" => next_col = cell_column(&e, next_col)? + 1,
                _ => {}
            },
            Event::Text(t) if in_value => {
                cell_value.push_str(&t.unescape().map_err(xml_err)?);
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"c" => {
                    if let Some((col, kind)) = cell.take() {
                        let text = resolve_cell(&cell_value, kind.as_deref(), shared)?;
                        if row_cells.len() <= col {
                            row_cells.resize(col + 1, String::new());
                        }
                        row_cells[col] = text;
                        next_col = col + 1;
                    }
                }
                b"row" => rows.push((row_no, std::mem::take(&mut row_cells))),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(rows)
}
