use log::debug;

pub use crate::config::*;

/// A reference to a column of a table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ColumnId {
    /// Position of the column, starting at 0.
    Index(usize),
    /// Spreadsheet column letters (`G`, `AB`). A header label spelled the
    /// same way (`ID`) takes precedence.
    Letters(String),
    /// Label of the column in the first row.
    Name(String),
}

impl ColumnId {
    /// Parses a column reference.
    ///
    /// - uppercase letters (`G`, `AB`) are spreadsheet column letters
    /// - digits are 1-based column numbers
    /// - anything else is the name of the column in the header row
    pub fn parse(s: &str) -> Result<ColumnId, StatsErrors> {
        let s = s.trim();
        if s.is_empty() {
            return Err(StatsErrors::InvalidColumn(s.to_string()));
        }
        if s.len() <= 3 && s.chars().all(|c| c.is_ascii_uppercase()) {
            return Ok(ColumnId::Letters(s.to_string()));
        }
        if s.chars().all(|c| c.is_ascii_digit()) {
            return match s.parse::<usize>() {
                Ok(x) if x >= 1 => Ok(ColumnId::Index(x - 1)),
                _ => Err(StatsErrors::InvalidColumn(s.to_string())),
            };
        }
        Ok(ColumnId::Name(s.to_string()))
    }
}

fn letters_index(letters: &str) -> usize {
    letters
        .chars()
        .fold(0usize, |acc, c| acc * 26 + (c as usize - 'A' as usize + 1))
        - 1
}

/// The content of a worksheet, materialised in memory.
///
/// The first row is the one written by the form system with the question labels.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Table {
    rows: Vec<Vec<RawCell>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<RawCell>>) -> Table {
        Table { rows }
    }

    pub fn rows(&self) -> &[Vec<RawCell>] {
        &self.rows
    }

    /// The number of rows before the first fully empty one.
    ///
    /// Worksheets regularly report a larger dimension than what is filled
    /// (formatting, deleted answers), so anything after a blank row is ignored.
    pub fn content_extent(&self) -> usize {
        self.rows
            .iter()
            .position(|row| !row.iter().any(|c| c.has_value()))
            .unwrap_or(self.rows.len())
    }

    pub fn resolve(&self, column: &ColumnId) -> Result<usize, StatsErrors> {
        match column {
            ColumnId::Index(idx) => Ok(*idx),
            ColumnId::Letters(letters) => match self.header_position(letters) {
                Some(idx) => {
                    debug!("resolve: {:?} matches a header label at {}", letters, idx);
                    Ok(idx)
                }
                None => Ok(letters_index(letters)),
            },
            ColumnId::Name(name) => self
                .header_position(name)
                .ok_or_else(|| StatsErrors::UnknownColumn(name.clone())),
        }
    }

    fn header_position(&self, label: &str) -> Option<usize> {
        self.rows.first().and_then(|header| {
            header.iter().position(|c| match c {
                RawCell::Text(s) => s.trim() == label,
                _ => false,
            })
        })
    }

    /// Extracts the non-empty cells of a column, in row order.
    ///
    /// The first cell is dropped if it looks like a header: some text that
    /// contains none of the header tokens (case-insensitive).
    pub fn column(
        &self,
        column: &ColumnId,
        header_tokens: &[String],
    ) -> Result<ColumnSeries, StatsErrors> {
        let idx = self.resolve(column)?;
        let extent = self.content_extent();
        debug!(
            "column: {:?} -> index {} over {} rows (extent {})",
            column,
            idx,
            self.rows.len(),
            extent
        );
        let mut cells: Vec<RawCell> = self.rows[..extent]
            .iter()
            .filter_map(|row| row.get(idx))
            .filter(|c| c.has_value())
            .cloned()
            .collect();

        let header = match cells.first() {
            Some(RawCell::Text(s)) if is_header_label(s, header_tokens) => Some(s.clone()),
            _ => None,
        };
        if header.is_some() {
            cells.remove(0);
        }
        debug!("column: {:?} header: {:?} cells: {}", column, header, cells.len());
        Ok(ColumnSeries { cells, header })
    }
}

fn is_header_label(s: &str, header_tokens: &[String]) -> bool {
    let lower = s.to_lowercase();
    !header_tokens
        .iter()
        .any(|t| lower.contains(t.to_lowercase().as_str()))
}
