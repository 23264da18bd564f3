//! Statistics over the answers of a form-based survey.
//!
//! The answers arrive as spreadsheet cells. They are extracted per column,
//! coerced to integers or classified into the fixed choices of the question,
//! then counted into an ordered [`Distribution`] from which the summary
//! statistics are derived.
//!
//! Nothing in this crate performs I/O: readers hand over a [`Table`] of
//! [`RawCell`] values.

mod config;
pub mod builder;
pub mod classify;
pub mod coerce;
pub mod distribution;
pub mod extract;
pub mod manual;

use log::{debug, info};

pub use crate::config::*;
pub use crate::distribution::{format_percentage, median, Distribution};
pub use crate::extract::{ColumnId, Table};

use crate::builder::Builder;

/// The complete analysis of one field.
#[derive(PartialEq, Debug, Clone)]
pub struct FieldReport {
    pub distribution: Distribution,
    pub summary: SummaryStats,
    /// Cells dropped by the integer coercion.
    pub skipped: usize,
    /// Only for integer fields.
    pub median: Option<f64>,
}

/// Runs the extraction and the statistics for one field over one or more
/// series of cells.
///
/// Arguments:
/// * `series` the extracted columns, for example one per snapshot
/// * `rules` the categories, ordering and midpoints of the field
///
/// Returns `StatsErrors::NoData` if no cell could be used.
pub fn run_field_stats(
    series: &[ColumnSeries],
    rules: &FieldRules,
) -> Result<FieldReport, StatsErrors> {
    info!(
        "Processing {:?} series ({} cells), rules: {:?}",
        series.len(),
        series.iter().map(|s| s.cells.len()).sum::<usize>(),
        rules
    );
    let mut builder = Builder::new(rules);
    for s in series {
        builder.add_series(s);
    }
    let distribution = builder.build();
    debug!("run_field_stats: distribution: {:?}", distribution);
    let summary = distribution.summarize(&rules.midpoints)?;
    info!(
        "run_field_stats: {} observations, mode {} ({})",
        summary.total_observations,
        summary.mode,
        format_percentage(summary.mode_percentage)
    );
    let median = match rules.kind {
        FieldKind::Integer => median(builder.values()),
        FieldKind::Categorical => None,
    };
    Ok(FieldReport {
        distribution,
        summary,
        skipped: builder.skipped(),
        median,
    })
}
