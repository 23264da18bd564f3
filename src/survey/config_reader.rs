use crate::survey::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use std::collections::HashMap;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "surveyName")]
    pub survey_name: String,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub survey: String,
    pub source: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "remotePath")]
    pub remote_path: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    pub column: JSValue,
    pub kind: String,
    pub categories: Vec<String>,
    #[serde(rename = "headerTokens")]
    pub header_tokens: Option<Vec<String>>,
    pub midpoints: Option<HashMap<String, f64>>,
}

impl FieldConfig {
    pub fn column_id(&self) -> SurveyResult<ColumnId> {
        read_js_column(&self.column).context(ColumnSnafu {
            field: self.name.clone(),
        })
    }

    pub fn from_rules(name: &str, column: &str, rules: &FieldRules) -> FieldConfig {
        FieldConfig {
            name: name.to_string(),
            column: JSValue::String(column.to_string()),
            kind: match rules.kind {
                FieldKind::Categorical => "categorical".to_string(),
                FieldKind::Integer => "integer".to_string(),
            },
            categories: rules.categories.clone(),
            header_tokens: Some(rules.header_tokens.clone()),
            midpoints: if rules.midpoints.is_empty() {
                None
            } else {
                Some(rules.midpoints.iter().cloned().collect())
            },
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    pub source: FileSource,
    pub fields: Vec<FieldConfig>,
}

impl SurveyConfig {
    /// The remote work survey: age bracket, work mode and productivity.
    pub fn builtin(file_path: &str, provider: &str) -> SurveyConfig {
        SurveyConfig {
            output_settings: OutputSettings {
                survey_name: "Impacto do Trabalho Remoto na Eficiência do Trabalhador".to_string(),
                output_path: None,
            },
            source: FileSource {
                provider: provider.to_string(),
                file_path: file_path.to_string(),
                excel_worksheet_name: None,
                remote_path: None,
            },
            fields: vec![
                FieldConfig::from_rules("Faixa Etária", "G", &FieldRules::age_bracket()),
                FieldConfig::from_rules("Modo de trabalho", "H", &FieldRules::work_mode()),
                FieldConfig::from_rules("Produtividade", "I", &FieldRules::productivity()),
            ],
        }
    }
}

pub fn read_config(path: &str) -> SurveyResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: SurveyConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: String) -> SurveyResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

/// Checks a field description and turns it into the rules of the statistics.
pub fn validate_field(field: &FieldConfig) -> SurveyResult<FieldRules> {
    if field.categories.is_empty() {
        whatever!("field {:?}: no categories", field.name)
    }
    let mut rules = match field.kind.as_str() {
        "categorical" => FieldRules::categorical(&field.categories),
        "integer" => {
            // Scores are stored in their canonical spelling: " 1" is "1".
            let mut scores: Vec<i64> = Vec::new();
            for c in field.categories.iter() {
                match c.trim().parse::<i64>() {
                    Ok(x) => scores.push(x),
                    Err(_) => {
                        whatever!(
                            "field {:?}: category {:?} is not an integer",
                            field.name,
                            c
                        )
                    }
                }
            }
            let categories: Vec<String> = scores.iter().map(|x| x.to_string()).collect();
            FieldRules {
                kind: FieldKind::Integer,
                categories: categories.clone(),
                header_tokens: categories,
                midpoints: scores.iter().map(|x| (x.to_string(), *x as f64)).collect(),
            }
        }
        x => {
            whatever!(
                "field {:?}: cannot use kind {:?} (expected categorical or integer)",
                field.name,
                x
            )
        }
    };
    for (i, c) in rules.categories.iter().enumerate() {
        if c == OTHER_LABEL {
            whatever!(
                "field {:?}: {:?} is reserved for the answers outside the categories",
                field.name,
                c
            )
        }
        if rules.categories[..i].contains(c) {
            whatever!("field {:?}: duplicate category {:?}", field.name, c)
        }
    }
    if let Some(tokens) = field.header_tokens.clone() {
        rules.header_tokens = tokens;
    }
    if let Some(midpoints) = field.midpoints.as_ref() {
        // Follow the order of the categories, then anything else sorted by name.
        let mut ms: Vec<(String, f64)> = midpoints.iter().map(|(c, m)| (c.clone(), *m)).collect();
        ms.sort_by_key(|(c, _)| {
            (
                rules
                    .categories
                    .iter()
                    .position(|c2| c2 == c)
                    .unwrap_or(usize::MAX),
                c.clone(),
            )
        });
        rules.midpoints = ms;
    }
    debug!("validate_field: {:?} -> {:?}", field.name, rules);
    Ok(rules)
}

fn read_js_column(x: &JSValue) -> Result<ColumnId, StatsErrors> {
    match x {
        // Column numbers start at 1 to respect the conventions of the excel world
        JSValue::Number(n) => match n.as_u64() {
            Some(x) if x >= 1 => Ok(ColumnId::Index((x - 1) as usize)),
            _ => Err(StatsErrors::InvalidColumn(n.to_string())),
        },
        JSValue::String(s) => ColumnId::parse(s),
        _ => Err(StatsErrors::InvalidColumn(x.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(js: JSValue) -> FieldConfig {
        serde_json::from_value(js).unwrap()
    }

    #[test]
    fn columns() {
        assert_eq!(
            read_js_column(&json!("G")),
            Ok(ColumnId::Letters("G".to_string()))
        );
        assert_eq!(read_js_column(&json!(3)), Ok(ColumnId::Index(2)));
        assert_eq!(
            read_js_column(&json!("Faixa Etária")),
            Ok(ColumnId::Name("Faixa Etária".to_string()))
        );
        assert!(read_js_column(&json!(0)).is_err());
        assert!(read_js_column(&json!(null)).is_err());
    }

    #[test]
    fn categorical_field() {
        let f = field(json!({
            "name": "Modo",
            "column": "H",
            "kind": "categorical",
            "categories": ["Híbrido", "Totalmente remoto"]
        }));
        let rules = validate_field(&f).unwrap();
        assert_eq!(rules.kind, FieldKind::Categorical);
        assert_eq!(rules.header_tokens, vec!["híbrido", "totalmente remoto"]);
        assert!(rules.midpoints.is_empty());
    }

    #[test]
    fn integer_field_midpoints() {
        let f = field(json!({
            "name": "Produtividade",
            "column": 9,
            "kind": "integer",
            "categories": ["1", "2", "3"]
        }));
        let rules = validate_field(&f).unwrap();
        assert_eq!(rules.kind, FieldKind::Integer);
        assert_eq!(
            rules.midpoints,
            vec![
                ("1".to_string(), 1.0),
                ("2".to_string(), 2.0),
                ("3".to_string(), 3.0)
            ]
        );
        assert_eq!(f.column_id().unwrap(), ColumnId::Index(8));
    }

    #[test]
    fn explicit_midpoints_follow_categories() {
        let f = field(json!({
            "name": "Idade",
            "column": "G",
            "kind": "categorical",
            "categories": ["18-24 anos", "25-34 anos"],
            "headerTokens": ["ano"],
            "midpoints": { "25-34 anos": 29.5, "18-24 anos": 21.0 }
        }));
        let rules = validate_field(&f).unwrap();
        assert_eq!(rules.header_tokens, vec!["ano"]);
        assert_eq!(
            rules.midpoints,
            vec![("18-24 anos".to_string(), 21.0), ("25-34 anos".to_string(), 29.5)]
        );
    }

    #[test]
    fn invalid_fields() {
        let wrong_kind = field(json!({
            "name": "x", "column": "A", "kind": "date", "categories": ["a"]
        }));
        assert!(validate_field(&wrong_kind).is_err());
        let not_integers = field(json!({
            "name": "x", "column": "A", "kind": "integer", "categories": ["low", "high"]
        }));
        assert!(validate_field(&not_integers).is_err());
        let no_categories = field(json!({
            "name": "x", "column": "A", "kind": "categorical", "categories": []
        }));
        assert!(validate_field(&no_categories).is_err());
    }

    #[test]
    fn duplicate_categories() {
        let repeated = field(json!({
            "name": "Modo", "column": "H", "kind": "categorical",
            "categories": ["Híbrido", "Totalmente remoto", "Híbrido"]
        }));
        assert!(matches!(
            validate_field(&repeated),
            Err(SurveyError::Whatever { .. })
        ));
        // Same score, two spellings
        let scores = field(json!({
            "name": "Produtividade", "column": "I", "kind": "integer",
            "categories": ["1", " 1", "2"]
        }));
        assert!(validate_field(&scores).is_err());
    }

    #[test]
    fn other_is_reserved() {
        let f = field(json!({
            "name": "Modo", "column": "H", "kind": "categorical",
            "categories": ["Híbrido", "Other"]
        }));
        assert!(matches!(
            validate_field(&f),
            Err(SurveyError::Whatever { .. })
        ));
    }

    #[test]
    fn integer_categories_are_canonical() {
        let f = field(json!({
            "name": "Produtividade", "column": "I", "kind": "integer",
            "categories": [" 1", "02", "3 "]
        }));
        let rules = validate_field(&f).unwrap();
        assert_eq!(rules.categories, vec!["1", "2", "3"]);
        assert_eq!(rules.header_tokens, vec!["1", "2", "3"]);
        let mut b = survey_stats::builder::Builder::new(&rules);
        b.add_series(&ColumnSeries {
            cells: vec![RawCell::Number(1.0), RawCell::Text("2".to_string())],
            header: None,
        });
        let d = b.build();
        assert_eq!(d.count(&Category::Known("1".to_string())), 1);
        assert_eq!(d.count(&Category::Other), 0);
    }

    #[test]
    fn builtin_survey() {
        let c = SurveyConfig::builtin("planilha.xlsx", "xlsx");
        assert_eq!(c.fields.len(), 3);
        let age = validate_field(&c.fields[0]).unwrap();
        assert_eq!(age, FieldRules::age_bracket());
        let productivity = validate_field(&c.fields[2]).unwrap();
        assert_eq!(productivity, FieldRules::productivity());
        assert_eq!(
            c.fields[1].column_id().unwrap(),
            ColumnId::Letters("H".to_string())
        );
    }
}
