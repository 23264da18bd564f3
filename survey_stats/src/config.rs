// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The content of one spreadsheet cell, as handed over by a spreadsheet reader.
///
/// Readers are expected to map their own cell types onto these three states.
/// Whitespace-only text counts as an empty cell.
#[derive(PartialEq, Debug, Clone)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
}

impl RawCell {
    pub fn has_value(&self) -> bool {
        match self {
            RawCell::Empty => false,
            RawCell::Text(s) => !s.trim().is_empty(),
            RawCell::Number(_) => true,
        }
    }
}

/// The non-empty cells of one column, in row order.
#[derive(PartialEq, Debug, Clone)]
pub struct ColumnSeries {
    pub cells: Vec<RawCell>,
    /// The header label, if the first cell was detected as one and dropped.
    pub header: Option<String>,
}

/// The label used when displaying the catch-all category.
pub const OTHER_LABEL: &str = "Other";

/// A classified response.
///
/// Every response maps to exactly one of the known literals of a field, or to
/// the catch-all `Other`.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Category {
    /// One of the fixed choices offered by the form.
    Known(String),
    /// Anything else: custom free-text answers, out-of-range scores.
    Other,
}

impl Category {
    pub fn label(&self) -> &str {
        match self {
            Category::Known(s) => s.as_str(),
            Category::Other => OTHER_LABEL,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ******** Output data structures *********

/// The weighted mean of an ordinal field.
#[derive(PartialEq, Debug, Clone)]
pub struct WeightedMean {
    /// None when no present category has a midpoint.
    pub value: Option<f64>,
    /// The number of observations that contributed to the mean.
    pub observations: u64,
    /// Present categories without a midpoint, in distribution order.
    pub excluded: Vec<Category>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct SummaryStats {
    pub total_observations: u64,
    pub mode: Category,
    pub mode_count: u64,
    /// Share of the mode, in percent of the total observations.
    pub mode_percentage: f64,
    /// Only computed for fields that carry a midpoint mapping.
    pub weighted_mean: Option<WeightedMean>,
}

/// Errors that prevent the statistics from being computed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum StatsErrors {
    /// Zero valid observations after extraction and classification.
    NoData,
    /// The column identifier could not be understood.
    InvalidColumn(String),
    /// No column carries this name in the header row.
    UnknownColumn(String),
}

impl Error for StatsErrors {}

impl Display for StatsErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsErrors::NoData => write!(f, "no valid observation"),
            StatsErrors::InvalidColumn(c) => write!(f, "invalid column identifier {:?}", c),
            StatsErrors::UnknownColumn(c) => write!(f, "no column named {:?}", c),
        }
    }
}

// ********* Configuration **********

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum FieldKind {
    /// Free text matched against the known literals.
    Categorical,
    /// Integer scores. Cells are coerced first, then matched against the known literals.
    Integer,
}

/// How a single survey question is extracted and aggregated.
#[derive(PartialEq, Debug, Clone)]
pub struct FieldRules {
    pub kind: FieldKind,
    /// The known literals, in canonical display order.
    pub categories: Vec<String>,
    /// Lowercase substrings marking a first cell as data rather than a header.
    pub header_tokens: Vec<String>,
    /// Representative numeric value of each category, for the weighted mean.
    /// Empty for nominal fields.
    pub midpoints: Vec<(String, f64)>,
}

pub const AGE_BRACKETS: [&str; 7] = [
    "Menos de 18 anos",
    "18-24 anos",
    "25-34 anos",
    "35-44 anos",
    "45-54 anos",
    "55-64 anos",
    "65 anos ou mais",
];

pub const AGE_HEADER_TOKENS: [&str; 4] = ["ano", "18-", "25-", "35-"];

// The open-ended brackets use 16 and 70.
pub const AGE_MIDPOINTS: [(&str, f64); 7] = [
    ("Menos de 18 anos", 16.0),
    ("18-24 anos", 21.0),
    ("25-34 anos", 29.5),
    ("35-44 anos", 39.5),
    ("45-54 anos", 49.5),
    ("55-64 anos", 59.5),
    ("65 anos ou mais", 70.0),
];

/// From fully remote to fully on-site.
pub const WORK_MODES: [&str; 5] = [
    "Totalmente remoto",
    "Majoritariamente remoto",
    "Híbrido",
    "Majoritariamente presencial",
    "Totalmente presencial",
];

fn to_strings(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

impl FieldRules {
    /// Rules for a categorical field, using the lowercased categories as header tokens.
    pub fn categorical(categories: &[String]) -> FieldRules {
        FieldRules {
            kind: FieldKind::Categorical,
            categories: categories.to_vec(),
            header_tokens: categories.iter().map(|c| c.to_lowercase()).collect(),
            midpoints: Vec::new(),
        }
    }

    /// Rules for an integer score field. Each score is its own midpoint.
    pub fn integer_scale(min: i64, max: i64) -> FieldRules {
        let categories: Vec<String> = (min..=max).map(|x| x.to_string()).collect();
        FieldRules {
            kind: FieldKind::Integer,
            header_tokens: categories.clone(),
            midpoints: (min..=max).map(|x| (x.to_string(), x as f64)).collect(),
            categories,
        }
    }

    pub fn age_bracket() -> FieldRules {
        FieldRules {
            kind: FieldKind::Categorical,
            categories: to_strings(&AGE_BRACKETS),
            header_tokens: to_strings(&AGE_HEADER_TOKENS),
            midpoints: AGE_MIDPOINTS
                .iter()
                .map(|(c, m)| (c.to_string(), *m))
                .collect(),
        }
    }

    pub fn work_mode() -> FieldRules {
        FieldRules::categorical(&to_strings(&WORK_MODES))
    }

    /// Self-assessed productivity, from 1 to 5.
    pub fn productivity() -> FieldRules {
        FieldRules::integer_scale(1, 5)
    }
}
