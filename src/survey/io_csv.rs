// Primitives for reading CSV files.

use std::fs::File;

use crate::survey::*;

pub fn read_csv_table(path: &str) -> SurveyResult<Table> {
    let records = get_records(path)?;
    let mut rows: Vec<Vec<RawCell>> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_csv_table: lineno: {:?} row: {:?}", lineno, line);
        rows.push(line.iter().map(read_cell).collect());
    }
    info!("read_csv_table: {} rows read from {:?}", rows.len(), path);
    Ok(Table::new(rows))
}

fn get_records(path: &str) -> SurveyResult<csv::StringRecordsIntoIter<File>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(OpeningCsvSnafu { path })?;
    Ok(rdr.into_records())
}

// Everything is kept as text: the coercion of the integer fields takes care of the numbers.
fn read_cell(s: &str) -> RawCell {
    if s.trim().is_empty() {
        RawCell::Empty
    } else {
        RawCell::Text(s.to_string())
    }
}
