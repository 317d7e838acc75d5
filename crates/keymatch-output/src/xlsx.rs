//! Styled Excel output.
//!
//! The offer columns are written unchanged. The appended block (reference
//! columns followed by `used_code`) is filled green for matched rows and red
//! for unmatched rows, and framed by thick left and right borders. The
//! `matched` flag is not written; the fill carries it.

use std::path::Path;

use keymatch_core::{MatchedTable, USED_CODE_COLUMN};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use tracing::{debug, info};

use crate::error::{OutputError, Result};

const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

/// Visual settings for [`write_xlsx`].
#[derive(Debug, Clone, PartialEq)]
pub struct XlsxStyle {
    /// Width applied to every column, in Excel character units.
    pub column_width: f64,
    /// Fill for the appended block of matched rows (`0xRRGGBB`).
    pub matched_fill: u32,
    /// Fill for the appended block of unmatched rows (`0xRRGGBB`).
    pub unmatched_fill: u32,
    pub sheet_name: String,
}

impl Default for XlsxStyle {
    fn default() -> Self {
        Self {
            column_width: 25.0,
            matched_fill: 0xC6EFCE,
            unmatched_fill: 0xFF9999,
            sheet_name: "Matched".to_string(),
        }
    }
}

/// Formats for one appended column, indexed by match state.
struct BlockFormats {
    matched: Format,
    unmatched: Format,
}

/// Left and right borders of the appended column at `position`: thick on
/// the outer edges of the block, thin inside it.
fn edge_borders(position: usize, width: usize) -> (FormatBorder, FormatBorder) {
    let edge = |outer: bool| {
        if outer {
            FormatBorder::Thick
        } else {
            FormatBorder::Thin
        }
    };
    (edge(position == 0), edge(position + 1 == width))
}

impl BlockFormats {
    fn new(style: &XlsxStyle, left: FormatBorder, right: FormatBorder) -> Self {
        let base = Format::new()
            .set_align(FormatAlign::Left)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
            .set_border_left(left)
            .set_border_right(right);
        Self {
            matched: base
                .clone()
                .set_background_color(Color::RGB(style.matched_fill)),
            unmatched: base.set_background_color(Color::RGB(style.unmatched_fill)),
        }
    }

    fn pick(&self, matched: bool) -> &Format {
        if matched { &self.matched } else { &self.unmatched }
    }
}

fn block_formats(style: &XlsxStyle, width: usize) -> Vec<BlockFormats> {
    (0..width)
        .map(|position| {
            let (left, right) = edge_borders(position, width);
            BlockFormats::new(style, left, right)
        })
        .collect()
}

fn fill_sheet(
    worksheet: &mut Worksheet,
    table: &MatchedTable,
    style: &XlsxStyle,
) -> std::result::Result<(), XlsxError> {
    worksheet.set_name(&style.sheet_name)?;

    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);

    let offer_width = table.offer_columns().len();
    let mut headers: Vec<String> = table.offer_columns().to_vec();
    headers.extend(table.reference_columns().iter().cloned());
    headers.push(USED_CODE_COLUMN.to_string());
    let block_width = headers.len() - offer_width;

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
        worksheet.set_column_width(col as u16, style.column_width)?;
    }

    let block = block_formats(style, block_width);

    for (position, row) in table.rows().iter().enumerate() {
        let excel_row = position as u32 + 1;
        for (col, value) in row.offer_cells().iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(excel_row, col as u16, value)?;
            }
        }
        let appended = row
            .reference_cells()
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(row.used_code()));
        for (offset, value) in appended.enumerate() {
            let col = (offer_width + offset) as u16;
            let format = block[offset].pick(row.is_matched());
            if value.is_empty() {
                worksheet.write_blank(excel_row, col, format)?;
            } else {
                worksheet.write_string_with_format(excel_row, col, value, format)?;
            }
        }
    }
    Ok(())
}

/// Write the table as a single-sheet workbook.
pub fn write_xlsx(table: &MatchedTable, path: &Path, style: &XlsxStyle) -> Result<()> {
    let columns = table.offer_columns().len() + table.reference_columns().len() + 1;
    if columns > MAX_COLUMNS {
        return Err(OutputError::TooManyColumns { columns });
    }
    if table.len() + 1 > MAX_ROWS {
        return Err(OutputError::TooManyRows { rows: table.len() });
    }
    let xlsx_error = |source| OutputError::Xlsx {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = Workbook::new();
    fill_sheet(workbook.add_worksheet(), table, style).map_err(xlsx_error)?;
    debug!(columns, rows = table.len(), "filled worksheet");
    workbook.save(path).map_err(xlsx_error)?;
    info!(path = %path.display(), rows = table.len(), "wrote workbook");
    Ok(())
}
