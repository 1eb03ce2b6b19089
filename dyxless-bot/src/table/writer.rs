//! Writing result tables. `.xlsx` output uses one `Results` sheet; columns are sized to their
//! longest value (+2, at most 60) and every cell wraps and aligns to the top.

use std::path::Path;

use rust_xlsxwriter::{Format, FormatAlign, Workbook};

use super::{Cell, FileFormat, Table, TableError};

const SHEET_NAME: &str = "Results";
const MAX_COLUMN_WIDTH: usize = 60;
/// Excel's per-cell character limit.
const MAX_CELL_CHARS: usize = 32_767;

/// Writes in the given format.
pub fn write_table(table: &Table, path: &Path, format: FileFormat) -> Result<(), TableError> {
    match format {
        FileFormat::Xlsx => write_xlsx(table, path),
        FileFormat::Csv => write_csv(table, path),
    }
}

pub fn write_xlsx(table: &Table, path: &Path) -> Result<(), TableError> {
    let mut workbook = Workbook::new();
    let format = Format::new().set_text_wrap().set_align(FormatAlign::Top);
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in table.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, clip(header), &format)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Empty => {
                    worksheet.write_blank(row_num, col, &format)?;
                }
                Cell::Text(s) => {
                    worksheet.write_string_with_format(row_num, col, clip(s), &format)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number_with_format(row_num, col, *n, &format)?;
                }
            }
        }
    }

    for (col, width) in column_widths(table).into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width as f64)?;
    }

    workbook.save(path)?;
    Ok(())
}

pub fn write_csv(table: &Table, path: &Path) -> Result<(), TableError> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        let mut record: Vec<String> = row.iter().map(Cell::to_string).collect();
        record.resize(table.headers.len().max(record.len()), String::new());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Width per column: longest value in chars (header included) + 2, capped at 60.
pub fn column_widths(table: &Table) -> Vec<usize> {
    let columns = table
        .rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(table.headers.len()))
        .max()
        .unwrap_or(0);

    (0..columns)
        .map(|col| {
            let header = table.headers.get(col).map_or(0, |h| h.chars().count());
            let longest = table
                .rows
                .iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.to_string().chars().count())
                .fold(header, usize::max);
            (longest + 2).min(MAX_COLUMN_WIDTH)
        })
        .collect()
}

fn clip(s: &str) -> &str {
    match s.char_indices().nth(MAX_CELL_CHARS) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_column_widths() {
        let mut table = Table::new(vec!["Id".to_string(), "Всё".to_string()]);
        table.rows.push(vec![Cell::text("12345"), Cell::text("x".repeat(100))]);
        table.rows.push(vec![Cell::Number(7.0)]);
        assert_eq!(column_widths(&table), vec![7, 60]);
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut table = Table::new(vec!["a".to_string(), "b".to_string()]);
        table.rows.push(vec![Cell::Number(1.0), Cell::text("x, y")]);
        table.rows.push(vec![Cell::Empty]);
        write_table(&table, &path, FileFormat::Csv).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "a,b\n1,\"x, y\"\n,\n");
    }

    #[test]
    fn test_write_xlsx_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let mut table = Table::new(vec!["a".to_string()]);
        table.rows.push(vec![Cell::text("y".repeat(40_000))]);
        write_xlsx(&table, &path).unwrap();
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_clip_respects_char_boundaries() {
        let long = "ж".repeat(MAX_CELL_CHARS + 5);
        assert_eq!(clip(&long).chars().count(), MAX_CELL_CHARS);
        assert_eq!(clip("short"), "short");
    }
}
