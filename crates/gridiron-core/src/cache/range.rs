// A1-notation sheet range descriptors ("Draft!A1:V24").

use std::fmt;

/// A parsed `sheet!startCell:endCell` range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    pub sheet: String,
    pub start_col: String,
    pub start_row: u32,
    pub end_col: String,
    pub end_row: u32,
}

impl SheetRange {
    /// Parse a range descriptor. Anything not of the form
    /// `sheet!A1:B2` returns `None`.
    pub fn parse(range: &str) -> Option<Self> {
        let (sheet, cells) = range.trim().rsplit_once('!')?;
        if sheet.is_empty() {
            return None;
        }
        let (start, end) = cells.split_once(':')?;
        let (start_col, start_row) = split_cell(start)?;
        let (end_col, end_row) = split_cell(end)?;
        Some(SheetRange {
            sheet: sheet.to_string(),
            start_col,
            start_row,
            end_col,
            end_row,
        })
    }

    /// Same sheet and columns, new row span.
    pub fn with_rows(&self, start_row: u32, end_row: u32) -> Self {
        SheetRange {
            start_row,
            end_row,
            ..self.clone()
        }
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}!{}{}:{}{}",
            self.sheet, self.start_col, self.start_row, self.end_col, self.end_row
        )
    }
}

/// Split "AB12" into ("AB", 12).
fn split_cell(cell: &str) -> Option<(String, u32)> {
    let cell = cell.trim();
    let digits_at = cell.find(|c: char| c.is_ascii_digit())?;
    let (col, row) = cell.split_at(digits_at);
    if col.is_empty() || !col.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let row: u32 = row.parse().ok()?;
    Some((col.to_ascii_uppercase(), row))
}
