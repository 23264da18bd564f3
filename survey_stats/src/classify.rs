use log::debug;

pub use crate::config::*;

/// Maps raw responses onto the fixed choices of a field.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Classifier {
    known: Vec<String>,
}

impl Classifier {
    pub fn new(known: &[String]) -> Classifier {
        Classifier {
            known: known.to_vec(),
        }
    }

    /// Exact, case-sensitive match against the known literals.
    pub fn classify(&self, response: &str) -> Category {
        if self.known.iter().any(|k| k == response) {
            Category::Known(response.to_string())
        } else {
            debug!("classify: {:?} -> {}", response, OTHER_LABEL);
            Category::Other
        }
    }

    pub fn classify_score(&self, score: i64) -> Category {
        self.classify(score.to_string().as_str())
    }

    /// Classifies the non-empty cells of a series. Numbers are matched on
    /// their shortest decimal representation (`3.0` is `"3"`).
    pub fn classify_cells(&self, cells: &[RawCell]) -> Vec<Category> {
        cells
            .iter()
            .filter_map(|c| match c {
                RawCell::Text(s) => Some(self.classify(s.as_str())),
                RawCell::Number(f) => Some(self.classify(format_number(*f).as_str())),
                RawCell::Empty => None,
            })
            .collect()
    }
}

fn format_number(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}
