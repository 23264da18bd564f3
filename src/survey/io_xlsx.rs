use calamine::DataType;

use crate::survey::*;

/// Reads the responses worksheet of a workbook.
pub fn read_xlsx_table(path: &str, cfs: &FileSource) -> SurveyResult<Table> {
    let wrange = get_range(path, cfs)?;
    debug!(
        "read_xlsx_table: start: {:?} size: {:?}",
        wrange.start(),
        wrange.get_size()
    );
    let table = range_to_table(&wrange);
    info!(
        "read_xlsx_table: {} rows read from {:?}",
        table.rows().len(),
        path
    );
    Ok(table)
}

/// Converts a worksheet range so that the column indexes match the letters of
/// the worksheet (index 0 is column A).
///
/// The range starts at the first used row: leading empty rows are not part of it.
pub fn range_to_table(wrange: &calamine::Range<DataType>) -> Table {
    let col_offset = wrange.start().map(|(_, c)| c as usize).unwrap_or(0);
    let rows: Vec<Vec<RawCell>> = wrange
        .rows()
        .map(|row| {
            let mut cells: Vec<RawCell> = vec![RawCell::Empty; col_offset];
            cells.extend(row.iter().map(read_cell));
            cells
        })
        .collect();
    Table::new(rows)
}

pub fn read_cell(cell: &DataType) -> RawCell {
    match cell {
        DataType::String(s) => RawCell::Text(s.clone()),
        DataType::Float(f) => RawCell::Number(*f),
        DataType::Int(i) => RawCell::Number(*i as f64),
        DataType::Bool(b) => RawCell::Text(b.to_string()),
        // Serial date number, as stored by Excel
        DataType::DateTime(f) => RawCell::Number(*f),
        DataType::Empty => RawCell::Empty,
        _ => {
            debug!("read_cell: ignoring cell {:?}", cell);
            RawCell::Empty
        }
    }
}

fn get_range(path: &str, cfs: &FileSource) -> SurveyResult<calamine::Range<DataType>> {
    let worksheet_name_o = cfs.excel_worksheet_name.clone();
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(&worksheet_name)
            .context(MissingWorksheetSnafu {
                name: worksheet_name.clone(),
                path,
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let names = workbook.sheet_names().to_owned();
        if names.len() > 1 {
            warn!(
                "get_range: {} worksheets in {:?}, using the first one {:?}",
                names.len(),
                path,
                names.first()
            );
        }
        let wrange = workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::Range;

    fn s(x: &str) -> DataType {
        DataType::String(x.to_string())
    }

    #[test]
    fn cells() {
        assert_eq!(read_cell(&s("Híbrido")), RawCell::Text("Híbrido".to_string()));
        assert_eq!(read_cell(&DataType::Int(4)), RawCell::Number(4.0));
        assert_eq!(read_cell(&DataType::Float(3.5)), RawCell::Number(3.5));
        assert_eq!(read_cell(&DataType::Empty), RawCell::Empty);
    }

    #[test]
    fn offset_range() {
        // The answers start in column C
        let mut r: Range<DataType> = Range::new((0, 2), (3, 3));
        r.set_value((0, 2), s("Faixa Etária"));
        r.set_value((0, 3), s("Produtividade"));
        r.set_value((1, 2), s("18-24 anos"));
        r.set_value((1, 3), DataType::Float(4.0));
        r.set_value((2, 2), s("25-34 anos"));
        r.set_value((2, 3), s("5"));
        let table = range_to_table(&r);

        let rules = FieldRules::age_bracket();
        let ages = table
            .column(&ColumnId::parse("C").unwrap(), &rules.header_tokens)
            .unwrap();
        assert_eq!(ages.header, Some("Faixa Etária".to_string()));
        assert_eq!(
            ages.cells,
            vec![
                RawCell::Text("18-24 anos".to_string()),
                RawCell::Text("25-34 anos".to_string())
            ]
        );

        let rules = FieldRules::productivity();
        let scores = table
            .column(&ColumnId::parse("D").unwrap(), &rules.header_tokens)
            .unwrap();
        assert_eq!(
            scores.cells,
            vec![RawCell::Number(4.0), RawCell::Text("5".to_string())]
        );
        // Row 3 is empty: the extent stops there.
        assert_eq!(table.content_extent(), 3);
    }

    #[test]
    fn missing_workbook() {
        let cfs = FileSource {
            provider: "xlsx".to_string(),
            file_path: "/nonexistent/planilha.xlsx".to_string(),
            excel_worksheet_name: None,
            remote_path: None,
        };
        let res = read_xlsx_table(&cfs.file_path, &cfs);
        assert!(matches!(res, Err(SurveyError::OpeningExcel { .. })));
    }
}
