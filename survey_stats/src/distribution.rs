use log::{debug, warn};
use std::collections::HashMap;

pub use crate::config::*;

/// The number of responses per category, in display order.
///
/// Invariants: every entry has a count of at least 1, and each category
/// appears once.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Distribution {
    entries: Vec<(Category, u64)>,
}

impl Distribution {
    /// Counts the categories and orders them.
    ///
    /// The categories of `canonical_order` come first, in that order, as long
    /// as they were observed. Anything else follows in order of first
    /// appearance.
    pub fn from_categories(values: &[Category], canonical_order: &[String]) -> Distribution {
        let mut counts: HashMap<Category, u64> = HashMap::new();
        let mut encountered: Vec<Category> = Vec::new();
        for v in values {
            let e = counts.entry(v.clone()).or_insert(0);
            if *e == 0 {
                encountered.push(v.clone());
            }
            *e += 1;
        }
        Distribution::from_counts(&counts, &encountered, canonical_order)
    }

    pub(crate) fn from_counts(
        counts: &HashMap<Category, u64>,
        encountered: &[Category],
        canonical_order: &[String],
    ) -> Distribution {
        let count_of = |c: &Category| counts.get(c).cloned().unwrap_or(0);

        let mut entries: Vec<(Category, u64)> = Vec::new();
        for name in canonical_order {
            let c = Category::Known(name.clone());
            let n = count_of(&c);
            // A repeated canonical name keeps its first position only.
            if n > 0 && !entries.iter().any(|(c2, _)| *c2 == c) {
                entries.push((c, n));
            }
        }
        for c in encountered {
            let is_canonical = match c {
                Category::Known(name) => canonical_order.contains(name),
                Category::Other => false,
            };
            if !is_canonical && count_of(c) > 0 && !entries.iter().any(|(c2, _)| c2 == c) {
                entries.push((c.clone(), count_of(c)));
            }
        }
        debug!("from_counts: entries: {:?}", entries);
        Distribution { entries }
    }

    pub fn entries(&self) -> &[(Category, u64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, category: &Category) -> u64 {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn total_observations(&self) -> u64 {
        self.entries.iter().map(|(_, n)| *n).sum()
    }

    fn checked_total(&self) -> Result<u64, StatsErrors> {
        match self.total_observations() {
            0 => Err(StatsErrors::NoData),
            x => Ok(x),
        }
    }

    /// The share of each category, in percent, in display order.
    pub fn percentages(&self) -> Result<Vec<(Category, f64)>, StatsErrors> {
        let total = self.checked_total()?;
        Ok(self
            .entries
            .iter()
            .map(|(c, n)| (c.clone(), percentage(*n, total)))
            .collect())
    }

    /// The most frequent category and its count.
    ///
    /// Ties go to the category that comes first in display order.
    pub fn mode(&self) -> Result<(Category, u64), StatsErrors> {
        let mut best: Option<&(Category, u64)> = None;
        for e in self.entries.iter() {
            match best {
                Some((_, n)) if *n >= e.1 => {}
                _ => best = Some(e),
            }
        }
        best.cloned().ok_or(StatsErrors::NoData)
    }

    /// The mean of the categories, each weighted by its count and valued by
    /// its midpoint.
    ///
    /// Categories without a midpoint are left out of both the sum and the
    /// number of observations, and reported in `excluded`.
    pub fn weighted_mean(&self, midpoints: &[(String, f64)]) -> Result<WeightedMean, StatsErrors> {
        self.checked_total()?;
        let mut sum: f64 = 0.0;
        let mut observations: u64 = 0;
        let mut excluded: Vec<Category> = Vec::new();
        for (c, n) in self.entries.iter() {
            match lookup_midpoint(midpoints, c) {
                Some(m) => {
                    sum += m * (*n as f64);
                    observations += n;
                }
                None => {
                    warn!(
                        "weighted_mean: no midpoint for category {:?}, excluding {} observations",
                        c.label(),
                        n
                    );
                    excluded.push(c.clone());
                }
            }
        }
        let value = if observations > 0 {
            Some(sum / (observations as f64))
        } else {
            None
        };
        Ok(WeightedMean {
            value,
            observations,
            excluded,
        })
    }

    /// All the summary statistics. The weighted mean is only computed when
    /// midpoints are provided.
    pub fn summarize(&self, midpoints: &[(String, f64)]) -> Result<SummaryStats, StatsErrors> {
        let total = self.checked_total()?;
        let (mode, mode_count) = self.mode()?;
        let weighted_mean = if midpoints.is_empty() {
            None
        } else {
            Some(self.weighted_mean(midpoints)?)
        };
        Ok(SummaryStats {
            total_observations: total,
            mode,
            mode_count,
            mode_percentage: percentage(mode_count, total),
            weighted_mean,
        })
    }
}

fn lookup_midpoint(midpoints: &[(String, f64)], category: &Category) -> Option<f64> {
    match category {
        Category::Known(name) => midpoints.iter().find(|(c, _)| c == name).map(|(_, m)| *m),
        Category::Other => None,
    }
}

fn percentage(count: u64, total: u64) -> f64 {
    (count as f64) / (total as f64) * 100.0
}

/// Renders a percentage with one decimal: `66.7%`.
pub fn format_percentage(p: f64) -> String {
    format!("{:.1}%", p)
}

/// The median of a series of integers, or None if it is empty.
pub fn median(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0)
    } else {
        Some(sorted[mid] as f64)
    }
}
