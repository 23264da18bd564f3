use std::collections::HashMap;

use log::debug;

use crate::classify::Classifier;
use crate::coerce::coerce_integers;
pub use crate::config::*;
use crate::distribution::Distribution;

/// A builder for accumulating the responses to one field.
///
/// Responses can come from several series (for instance several snapshots
/// of the same form, or several worksheets).
///
/// ```
/// pub use survey_stats::builder::Builder;
/// pub use survey_stats::{Category, FieldRules};
/// # use survey_stats::StatsErrors;
///
/// let mut builder = Builder::new(&FieldRules::work_mode());
///
/// builder.add_response("Híbrido");
/// builder.add_response("Outro: depende da semana");
///
/// let dist = builder.build();
/// assert_eq!(dist.total_observations(), 2);
/// assert_eq!(dist.count(&Category::Other), 1);
///
/// # Ok::<(), StatsErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: FieldRules,
    pub(crate) _classifier: Classifier,
    pub(crate) _counts: HashMap<Category, u64>,
    pub(crate) _encountered: Vec<Category>,
    pub(crate) _values: Vec<i64>,
    pub(crate) _skipped: usize,
}

impl Builder {
    pub fn new(rules: &FieldRules) -> Builder {
        Builder {
            _rules: rules.clone(),
            _classifier: Classifier::new(&rules.categories),
            _counts: HashMap::new(),
            _encountered: Vec::new(),
            _values: Vec::new(),
            _skipped: 0,
        }
    }

    /// Adds a free-text response.
    pub fn add_response(&mut self, response: &str) {
        let c = self._classifier.classify(response);
        self.add_category(c);
    }

    pub fn add_category(&mut self, category: Category) {
        let e = self._counts.entry(category.clone()).or_insert(0);
        if *e == 0 {
            self._encountered.push(category);
        }
        *e += 1;
    }

    /// Adds all the cells of a series, coercing or classifying them
    /// depending on the kind of the field.
    pub fn add_series(&mut self, series: &ColumnSeries) {
        match self._rules.kind {
            FieldKind::Categorical => {
                for c in self._classifier.classify_cells(&series.cells) {
                    self.add_category(c);
                }
            }
            FieldKind::Integer => {
                let coerced = coerce_integers(&series.cells);
                debug!(
                    "add_series: {} integers, {} skipped",
                    coerced.values.len(),
                    coerced.skipped
                );
                self._skipped += coerced.skipped;
                for x in coerced.values.iter() {
                    let c = self._classifier.classify_score(*x);
                    self.add_category(c);
                }
                self._values.extend(coerced.values);
            }
        }
    }

    /// The number of cells dropped because they could not be coerced.
    pub fn skipped(&self) -> usize {
        self._skipped
    }

    /// The coerced values of an integer field, in order of insertion.
    pub fn values(&self) -> &[i64] {
        &self._values
    }

    pub fn build(&self) -> Distribution {
        Distribution::from_counts(&self._counts, &self._encountered, &self._rules.categories)
    }
}
