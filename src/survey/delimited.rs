//! Delimited text parsing (CSV, semicolon-separated, TSV).

use super::Row;

/// Delimiters tried against the header, in tie-break order.
const CANDIDATE_DELIMITERS: [char; 3] = [',', ';', '\t'];

/// Pick the delimiter that splits the header into the most fields.
///
/// Falls back to `,` when none of the candidates appear.
pub fn detect_delimiter(header: &str) -> char {
    let mut best = (',', 0usize);
    for delim in CANDIDATE_DELIMITERS {
        let count = split_line(header, delim).len();
        if count > best.1 {
            best = (delim, count);
        }
    }
    best.0
}

/// Split one line respecting quoted fields (delimiters inside quotes are kept).
fn split_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    // Check for escaped quote ("")
                    if chars.peek() == Some(&'"') {
                        current.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == delimiter && !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// Split text into numbered rows, skipping blank lines.
///
/// Row numbers are 1-based physical line numbers. The delimiter is detected
/// from the first non-blank line.
pub(crate) fn parse_rows(text: &str) -> Vec<Row> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut delimiter = None;
    let mut rows = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let delim = *delimiter.get_or_insert_with(|| detect_delimiter(line));
        rows.push((idx + 1, split_line(line, delim)));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("MD,Inclination,Azimuth"), ',');
        assert_eq!(detect_delimiter("MD;Inclination;Azimuth"), ';');
        assert_eq!(detect_delimiter("MD\tInclination\tAzimuth"), '\t');
        assert_eq!(detect_delimiter("MD"), ',');
    }

    #[test]
    fn test_semicolon_header_with_decimal_points() {
        assert_eq!(detect_delimiter("MD;Inc.;Azi"), ';');
    }

    #[test]
    fn test_quoted_fields() {
        let fields = split_line(r#""Well, A",100,"say ""hi""""#, ',');
        assert_eq!(fields, vec!["Well, A", "100", r#"say "hi""#]);
    }

    #[test]
    fn test_parse_rows_skips_blank_lines_and_bom() {
        let text = "\u{feff}MD,Inclination,Azimuth\r\n\r\n100,1,2\r\n";
        let rows = parse_rows(text);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].1[0], "MD");
        assert_eq!(rows[1].0, 3);
        assert_eq!(rows[1].1, vec!["100", "1", "2"]);
    }

    #[test]
    fn test_trailing_empty_field_kept() {
        assert_eq!(split_line("a,b,", ','), vec!["a", "b", ""]);
    }
}
