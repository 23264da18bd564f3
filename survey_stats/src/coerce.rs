use log::debug;

pub use crate::config::*;

/// The outcome of coercing a series of cells to integers.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Coerced {
    /// The converted values, in the order of the input.
    pub values: Vec<i64>,
    /// The number of cells that could not be converted and were dropped.
    pub skipped: usize,
}

/// Converts cells to integers on a best-effort basis.
///
/// Numbers are truncated towards zero, text is parsed after trimming.
/// Anything else is dropped and accounted for in `skipped`.
pub fn coerce_integers(cells: &[RawCell]) -> Coerced {
    let mut res = Coerced::default();
    for cell in cells {
        match coerce_cell(cell) {
            Some(x) => res.values.push(x),
            None => {
                debug!("coerce_integers: dropping {:?}", cell);
                res.skipped += 1;
            }
        }
    }
    res
}

fn coerce_cell(cell: &RawCell) -> Option<i64> {
    match cell {
        RawCell::Number(f) => truncate(*f),
        RawCell::Text(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        RawCell::Empty => None,
    }
}

fn truncate(f: f64) -> Option<i64> {
    if f.is_finite() {
        Some(f.trunc() as i64)
    } else {
        None
    }
}
