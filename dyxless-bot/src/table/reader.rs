//! Reading uploaded spreadsheets: `.xlsx` via calamine (first sheet), `.csv` via the csv crate.
//! The first row is the header.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use super::{Cell, FileFormat, Table, TableError};

pub fn read_table(path: &Path) -> Result<Table, TableError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    match FileFormat::from_file_name(name) {
        Some(FileFormat::Xlsx) => read_xlsx(path),
        Some(FileFormat::Csv) => read_csv(path),
        None => Err(TableError::UnsupportedFormat(name.to_string())),
    }
}

fn read_xlsx(path: &Path) -> Result<Table, TableError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(TableError::EmptySheet)??;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or(TableError::EmptySheet)?
        .iter()
        .map(|c| cell_from_data(c).to_string())
        .collect();

    let mut table = Table::new(headers);
    for row in rows {
        table.rows.push(row.iter().map(cell_from_data).collect());
    }
    Ok(table)
}

fn read_csv(path: &Path) -> Result<Table, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut table = Table::new(headers);
    for record in reader.records() {
        let record = record?;
        table.rows.push(record.iter().map(Cell::text).collect());
    }
    Ok(table)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s.as_str()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        other => Cell::text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inn.csv");
        fs::write(&path, "Name,Результат (ИНН)\nA, 7736207543 \nB,\nC,123,extra\n").unwrap();

        let table = read_table(&path).unwrap();
        assert_eq!(table.headers, vec!["Name", "Результат (ИНН)"]);
        assert_eq!(table.len(), 3);
        let idx = table.column_index("Результат (ИНН)").unwrap();
        assert_eq!(table.column_values(idx), vec!["7736207543", "", "123"]);
    }

    #[test]
    fn test_read_unsupported_extension() {
        let err = read_table(Path::new("/tmp/file.txt")).unwrap_err();
        assert!(matches!(err, TableError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_xlsx_written_then_read_keeps_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inn.xlsx");
        let mut table = Table::new(vec!["Результат (ИНН)".to_string()]);
        table.rows.push(vec![Cell::Number(7736207543.0)]);
        table.rows.push(vec![Cell::text("500100732259")]);
        crate::table::write_xlsx(&table, &path).unwrap();

        let read = read_table(&path).unwrap();
        assert_eq!(read.headers, table.headers);
        assert_eq!(read.column_values(0), vec!["7736207543", "500100732259"]);
    }
}
