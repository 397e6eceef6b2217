//! PDF text extraction and the table grid derived from it.

use crate::error::{IngestError, Result};

/// Extract the text layer of a PDF supplied as bytes.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| IngestError::Pdf(e.to_string()))
}

/// One row of a detected table grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    /// 1-based line number in the extracted text
    pub line_no: usize,
    pub cells: Vec<String>,
}

/// A space-separated cell with its char offsets in the line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Span {
    start: usize,
    end: usize,
    text: String,
}

/// Cells separated by runs of two or more spaces. Single spaces stay inside a cell.
fn spaced_cells(line: &str) -> Vec<Span> {
    let chars: Vec<char> = line.chars().collect();
    let mut spans = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == ' ' {
            i += 1;
            continue;
        }
        let start = i;
        let mut end = i;
        while i < chars.len() {
            if chars[i] != ' ' {
                i += 1;
                end = i;
                continue;
            }
            let run = chars[i..].iter().take_while(|c| **c == ' ').count();
            if run >= 2 || i + run == chars.len() {
                break;
            }
            i += run;
        }
        spans.push(Span {
            start,
            end,
            text: chars[start..end].iter().collect(),
        });
    }
    spans
}

/// Column titles: several cells and no digits.
fn is_header(line: &str, cells: &[Span]) -> bool {
    cells.len() >= 3 && !line.chars().any(|c| c.is_ascii_digit())
}

/// Header column whose span overlaps the cell most. Column `i` runs from its
/// title's start to the next title's start.
fn column_for(header: &[Span], cell: &Span) -> usize {
    let mut best = (0, 0);
    for (i, h) in header.iter().enumerate() {
        let until = header.get(i + 1).map_or(usize::MAX, |next| next.start);
        let overlap = cell.end.min(until).saturating_sub(cell.start.max(h.start));
        if overlap > best.1 {
            best = (i, overlap);
        }
    }
    best.0
}

fn align_to_header(header: &[Span], cells: &[Span]) -> Vec<String> {
    let mut out = vec![String::new(); header.len()];
    for cell in cells {
        let slot = &mut out[column_for(header, cell)];
        if !slot.is_empty() {
            slot.push(' ');
        }
        slot.push_str(&cell.text);
    }
    out
}

/// Without a header, the narrowest gap in the line is one column break and
/// every further multiple of it is a blank cell.
fn pad_wide_gaps(cells: &[Span]) -> Vec<String> {
    let unit = cells.windows(2).map(|w| w[1].start - w[0].end).min();
    let mut out = Vec::with_capacity(cells.len());
    for (i, cell) in cells.iter().enumerate() {
        if let (Some(unit), Some(prev)) = (unit, i.checked_sub(1).map(|p| &cells[p])) {
            let blanks = (cell.start - prev.end) / unit - 1;
            out.extend(std::iter::repeat_n(String::new(), blanks));
        }
        out.push(cell.text.clone());
    }
    out
}

/// Turn extracted page text into table rows. Blank cells are kept as empty
/// strings so every row keeps its column positions.
///
/// - A line containing tabs is split on each tab.
/// - Otherwise columns are separated by two or more spaces. Once a header
///   line (several cells, no digits) has been seen, rows with fewer cells
///   than the header are placed by column offset under it; the header stays
///   in effect until the next one.
/// - Rows seen before any header pad wide gaps with blank cells.
///
/// Blank lines produce no row.
pub fn table_grid(text: &str) -> Vec<GridRow> {
    let mut header: Option<Vec<Span>> = None;
    let mut rows = Vec::new();

    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<String> = if line.contains('\t') {
            line.trim_matches(' ').split('\t').map(|c| c.trim().to_string()).collect()
        } else {
            let spans = spaced_cells(line);
            if is_header(line, &spans) {
                let plain: Vec<String> = spans.iter().map(|s| s.text.clone()).collect();
                header = Some(spans);
                plain
            } else {
                match &header {
                    Some(h) if spans.len() < h.len() => align_to_header(h, &spans),
                    Some(_) => spans.iter().map(|s| s.text.clone()).collect(),
                    None => pad_wide_gaps(&spans),
                }
            }
        };
        rows.push(GridRow { line_no: i + 1, cells });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_splits_on_wide_gaps() {
        let text = "Date  Ref  Description\n\n01-Jan-2024\tFP01\tOffice rent  x\n";
        let rows = table_grid(text);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cells, vec!["Date", "Ref", "Description"]);
        assert_eq!(rows[1].line_no, 3);
        assert_eq!(rows[1].cells, vec!["01-Jan-2024", "FP01", "Office rent  x"]);
    }

    #[test]
    fn test_tab_rows_keep_blank_and_trailing_cells() {
        let rows = table_grid("05-Jan-2024\tDD7\tOffice rent\tDD\t750.00\t\t\n");
        assert_eq!(
            rows[0].cells,
            vec!["05-Jan-2024", "DD7", "Office rent", "DD", "750.00", "", ""]
        );
    }

    #[test]
    fn test_rows_align_under_header_columns() {
        let header = format!(
            "{:<13}{:<6}{:<20}{:<7}{:<9}{:<11}{}",
            "Date", "Ref", "Description", "Type", "Debit", "Credit", "Balance"
        );
        let debit_row = format!(
            "{:<13}{:<6}{:<20}{:<7}{:>9}{:>11}{:>11}",
            "05-Jan-2024", "DD7", "Office rent", "DD", "750.00", "", "2,450.00"
        );
        let credit_row = format!(
            "{:<13}{:<6}{:<20}{:<7}{:>9}{:>11}{:>11}",
            "06-Jan-2024", "FP1", "Invoice 42 Globex", "FPI", "", "1,200.00", "3,650.00"
        );
        let rows = table_grid(&format!("{header}\n{debit_row}\n{credit_row}\n"));

        assert_eq!(
            rows[1].cells,
            vec!["05-Jan-2024", "DD7", "Office rent", "DD", "750.00", "", "2,450.00"]
        );
        assert_eq!(
            rows[2].cells,
            vec!["06-Jan-2024", "FP1", "Invoice 42 Globex", "FPI", "", "1,200.00", "3,650.00"]
        );
    }

    #[test]
    fn test_wide_gap_without_header_is_a_blank_cell() {
        let rows = table_grid("05-Jan-2024  DD7  Office rent  DD  750.00    2,450.00\n");
        assert_eq!(
            rows[0].cells,
            vec!["05-Jan-2024", "DD7", "Office rent", "DD", "750.00", "", "2,450.00"]
        );
    }

    #[test]
    fn test_spaced_cells_offsets() {
        let spans = spaced_cells("  Office rent   750.00 ");
        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].start, spans[0].end), (2, 13));
        assert_eq!(spans[0].text, "Office rent");
        assert_eq!((spans[1].start, spans[1].end), (16, 22));
    }
}
