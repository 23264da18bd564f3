use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use survey_stats::coerce::coerce_integers;
use survey_stats::*;

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Reader, Xlsx};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

pub mod config_reader;
mod fetch;
mod io_common;
mod io_csv;
mod io_xlsx;

use crate::args::Args;
use crate::survey::config_reader::*;
use crate::survey::fetch::*;
use crate::survey::io_common::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Could not parse line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("No worksheet {name} in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("No worksheet in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Error reading file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Could not fetch {remote_path}"))]
    FetchFailed {
        source: std::io::Error,
        remote_path: String,
    },
    #[snafu(display("Could not write the snapshot {path}"))]
    WritingSnapshot {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Field {field}: {source}"))]
    Column { source: StatsErrors, field: String },
    #[snafu(display("Missing parent directory"))]
    MissingParentDir {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

fn field_report_to_json(
    field: &FieldConfig,
    header_dropped: bool,
    report: &FieldReport,
) -> SurveyResult<JSValue> {
    let percentages = report
        .distribution
        .percentages()
        .context(ColumnSnafu {
            field: field.name.clone(),
        })?;
    let mut distribution: Vec<JSValue> = Vec::new();
    for ((category, count), (_, pct)) in report.distribution.entries().iter().zip(percentages) {
        info!(
            "{}: {:>6} {:>7} {}",
            field.name,
            count,
            format_percentage(pct),
            category
        );
        distribution.push(json!({
            "category": category.label(),
            "count": count,
            "percentage": format_percentage(pct)
        }));
    }

    let summary = &report.summary;
    let mut js = json!({
        "field": field.name,
        "column": field.column,
        "totalObservations": summary.total_observations,
        "skippedCells": report.skipped,
        "headerDropped": header_dropped,
        "distribution": distribution,
        "mode": summary.mode.label(),
        "modeCount": summary.mode_count,
        "modePercentage": format_percentage(summary.mode_percentage),
    });
    if let Some(wm) = summary.weighted_mean.as_ref() {
        if let Some(v) = wm.value {
            js["weightedMean"] = json!(round3(v));
        }
        if !wm.excluded.is_empty() {
            let excluded: Vec<&str> = wm.excluded.iter().map(|c| c.label()).collect();
            js["excludedFromMean"] = json!(excluded);
        }
    }
    if let Some(m) = report.median {
        js["median"] = json!(m);
    }
    Ok(js)
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

fn analyze_field(table: &Table, field: &FieldConfig) -> SurveyResult<JSValue> {
    let rules = validate_field(field)?;
    let column = field.column_id()?;
    let series = table
        .column(&column, &rules.header_tokens)
        .context(ColumnSnafu {
            field: field.name.clone(),
        })?;
    debug!(
        "analyze_field: {:?}: header: {:?} cells: {}",
        field.name,
        series.header,
        series.cells.len()
    );
    let header_dropped = series.header.is_some();

    match run_field_stats(std::slice::from_ref(&series), &rules) {
        Ok(report) => {
            if report.skipped > 0 {
                info!(
                    "Field {:?}: {} cells could not be converted to integers",
                    field.name, report.skipped
                );
            }
            field_report_to_json(field, header_dropped, &report)
        }
        Err(StatsErrors::NoData) => {
            warn!("Field {:?}: no valid answer", field.name);
            let skipped = match rules.kind {
                FieldKind::Integer => coerce_integers(&series.cells).skipped,
                FieldKind::Categorical => 0,
            };
            Ok(json!({
                "field": field.name,
                "column": field.column,
                "noData": true,
                "skippedCells": skipped,
            }))
        }
        Err(e) => Err(e).context(ColumnSnafu {
            field: field.name.clone(),
        }),
    }
}

fn read_table(path: &str, cfs: &FileSource) -> SurveyResult<Table> {
    info!("Attempting to read survey file {:?}", path);
    match cfs.provider.as_str() {
        "xlsx" => io_xlsx::read_xlsx_table(path, cfs),
        "csv" => io_csv::read_csv_table(path),
        x => whatever!("Provider not implemented {:?}", x),
    }
}

fn build_summary_js(config: &SurveyConfig, snapshot_path: &str, results: Vec<JSValue>) -> JSValue {
    let c = OutputConfig {
        survey: config.output_settings.survey_name.clone(),
        source: simplify_file_name(snapshot_path),
    };
    json!({
        "config": c,
        "results": results })
}

/// Reads the snapshot and computes the summary of all the fields.
pub fn run_survey_config(config: &SurveyConfig, snapshot_path: &str) -> SurveyResult<JSValue> {
    let table = read_table(snapshot_path, &config.source)?;
    let mut results: Vec<JSValue> = Vec::new();
    for field in config.fields.iter() {
        results.push(analyze_field(&table, field)?);
    }
    Ok(build_summary_js(config, snapshot_path, results))
}

fn guess_provider(path: &str) -> &'static str {
    if path.to_lowercase().ends_with(".csv") {
        "csv"
    } else {
        "xlsx"
    }
}

fn write_summary(out: Option<String>, pretty_js: &str) -> SurveyResult<()> {
    match out.as_deref() {
        None | Some("stdout") => {
            println!("{}", pretty_js);
        }
        Some(path) => {
            fs::write(path, pretty_js).context(WritingOutputSnafu { path })?;
            info!("Summary written to {:?}", path);
        }
    }
    Ok(())
}

fn check_summary(summary_path: String, pretty_js_stats: &str) -> SurveyResult<()> {
    let summary_ref = read_summary(summary_path)?;
    debug!("summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        whatever!("Difference detected between calculated summary and reference summary")
    }
    Ok(())
}

pub fn run_survey(args: &Args) -> SurveyResult<()> {
    let (mut config, root_p): (SurveyConfig, PathBuf) = match args.config.as_ref() {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root_p = Path::new(config_path.as_str())
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (config, root_p)
        }
        None => {
            let input = args.input.clone().unwrap_or_else(|| "planilha.xlsx".to_string());
            (
                SurveyConfig::builtin(&input, guess_provider(&input)),
                PathBuf::from("."),
            )
        }
    };
    debug!("config: {:?}", config);

    // The command line overrides the configuration file.
    let snapshot_path = match args.input.as_ref() {
        Some(input) => input.clone(),
        None => resolve_path(&root_p, &config.source.file_path),
    };
    if let Some(provider) = args.input_type.as_ref() {
        config.source.provider = provider.clone();
    }
    if let Some(worksheet) = args.excel_worksheet_name.as_ref() {
        config.source.excel_worksheet_name = Some(worksheet.clone());
    }

    if let Some(remote_path) = args.remote.clone().or_else(|| config.source.remote_path.clone()) {
        let library_dir = match args.library_dir.as_ref() {
            Some(d) => d.clone(),
            None => {
                whatever!(
                    "Cannot refresh {:?}: the document library directory is missing (--library-dir)",
                    remote_path
                )
            }
        };
        let fetcher = MirrorFetcher {
            root: PathBuf::from(library_dir),
        };
        let credentials = Credentials {
            user: args.user.clone(),
            password: args.password.clone(),
        };
        refresh_snapshot(&fetcher, &remote_path, &credentials, &snapshot_path)?;
    }

    let summary_js = run_survey_config(&config, &snapshot_path)?;
    let pretty_js_stats = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;

    let out = args.out.clone().or_else(|| {
        config
            .output_settings
            .output_path
            .as_ref()
            .map(|p| resolve_path(&root_p, p))
    });
    write_summary(out, &pretty_js_stats)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = args.reference.clone() {
        check_summary(summary_p, &pretty_js_stats)?;
    }

    Ok(())
}

#[cfg(test)]
fn run_survey_test(test_name: &str, config_lpath: &str, summary_lpath: &str) -> SurveyResult<()> {
    let test_dir = format!("{}/tests/data", env!("CARGO_MANIFEST_DIR"));
    info!("Running test {}", test_name);
    let config_path = format!("{}/{}/{}", test_dir, test_name, config_lpath);
    let config = read_config(&config_path)?;
    let root_p = Path::new(config_path.as_str())
        .parent()
        .context(MissingParentDirSnafu {})?;
    let snapshot_path = resolve_path(root_p, &config.source.file_path);
    let summary_js = run_survey_config(&config, &snapshot_path)?;
    let pretty_js_stats = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;
    check_summary(
        format!("{}/{}/{}", test_dir, test_name, summary_lpath),
        &pretty_js_stats,
    )
}

#[cfg(test)]
fn test_wrapper(test_name: &str) -> SurveyResult<()> {
    run_survey_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_summary.json", test_name).as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn data_path(p: &str) -> String {
        format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), p)
    }

    #[test]
    fn remote_work() {
        init();
        test_wrapper("remote_work").unwrap();
    }

    #[test]
    fn remote_work_wrong_reference() {
        init();
        let res = run_survey_test(
            "remote_work",
            "remote_work_config.json",
            "../age_only/age_only_expected_summary.json",
        );
        assert!(matches!(res, Err(SurveyError::Whatever { .. })));
    }

    #[test]
    fn age_only() {
        init();
        test_wrapper("age_only").unwrap();
    }

    #[test]
    fn remote_work_values() {
        init();
        let config = read_config(&data_path("remote_work/remote_work_config.json")).unwrap();
        let js =
            run_survey_config(&config, &data_path("remote_work/respostas.csv")).unwrap();
        let results = js["results"].as_array().unwrap();
        assert_eq!(results.len(), 4);

        let age = &results[0];
        assert_eq!(age["totalObservations"], json!(6));
        assert_eq!(age["mode"], json!("18-24 anos"));
        assert_eq!(age["modePercentage"], json!("50.0%"));
        let total: u64 = age["distribution"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["count"].as_u64().unwrap())
            .sum();
        assert_eq!(total, 6);

        let mode = &results[1];
        let categories: Vec<&str> = mode["distribution"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["category"].as_str().unwrap())
            .collect();
        assert_eq!(
            categories,
            vec![
                "Totalmente remoto",
                "Híbrido",
                "Totalmente presencial",
                "Other"
            ]
        );
        assert!(mode.get("weightedMean").is_none());

        let productivity = &results[2];
        assert_eq!(productivity["skippedCells"], json!(1));
        assert_eq!(productivity["median"], json!(4.0));

        assert_eq!(results[3]["noData"], json!(true));
    }

    #[test]
    fn unknown_column_name() {
        init();
        let mut config =
            read_config(&data_path("remote_work/remote_work_config.json")).unwrap();
        config.fields[1].column = json!("Modo de Trabalho");
        let res = run_survey_config(&config, &data_path("remote_work/respostas.csv"));
        assert!(matches!(
            res,
            Err(SurveyError::Column {
                source: StatsErrors::UnknownColumn(_),
                ..
            })
        ));
    }

    #[test]
    fn unknown_provider() {
        init();
        let mut config =
            read_config(&data_path("remote_work/remote_work_config.json")).unwrap();
        config.source.provider = "ods".to_string();
        let res = run_survey_config(&config, &data_path("remote_work/respostas.csv"));
        assert!(matches!(res, Err(SurveyError::Whatever { .. })));
    }

    #[test]
    fn missing_snapshot() {
        init();
        let config = SurveyConfig::builtin("/nonexistent/planilha.xlsx", "xlsx");
        let res = run_survey_config(&config, "/nonexistent/planilha.xlsx");
        assert!(matches!(res, Err(SurveyError::OpeningExcel { .. })));
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let d = std::env::temp_dir().join(format!("surveydash-{}-{}", std::process::id(), name));
        fs::create_dir_all(&d).unwrap();
        d
    }

    fn args() -> Args {
        Args {
            config: None,
            reference: None,
            out: None,
            input: None,
            input_type: None,
            excel_worksheet_name: None,
            remote: None,
            library_dir: None,
            user: None,
            password: None,
            verbose: false,
        }
    }

    #[test]
    fn input_overrides_file_path() {
        init();
        let a = Args {
            config: Some(data_path("remote_work/remote_work_config.json")),
            input: Some("/nonexistent/respostas.csv".to_string()),
            ..args()
        };
        let res = run_survey(&a);
        assert!(matches!(res, Err(SurveyError::OpeningCsv { .. })));
    }

    #[test]
    fn remote_without_library_dir() {
        init();
        let a = Args {
            config: Some(data_path("remote_work/remote_work_config.json")),
            remote: Some("Documents/respostas.csv".to_string()),
            ..args()
        };
        let res = run_survey(&a);
        assert!(matches!(res, Err(SurveyError::Whatever { .. })));
    }

    #[test]
    fn output_path_is_relative_to_config() {
        init();
        let dir = scratch_dir("output");
        let mut config = read_config(&data_path("remote_work/remote_work_config.json")).unwrap();
        config.source.file_path = data_path("remote_work/respostas.csv");
        config.output_settings.output_path = Some("summary.json".to_string());
        let config_path = dir.join("survey.json");
        fs::write(&config_path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let a = Args {
            config: Some(config_path.display().to_string()),
            ..args()
        };
        run_survey(&a).unwrap();

        let written = read_summary(dir.join("summary.json").display().to_string()).unwrap();
        let expected =
            read_summary(data_path("remote_work/remote_work_expected_summary.json")).unwrap();
        assert_eq!(written, expected);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn remote_refresh_from_library() {
        init();
        let dir = scratch_dir("library");
        let library = dir.join("library");
        fs::create_dir_all(library.join("Documents")).unwrap();
        fs::copy(
            data_path("remote_work/respostas.csv"),
            library.join("Documents/respostas.csv"),
        )
        .unwrap();
        let snapshot = dir.join("respostas.csv");

        let a = Args {
            config: Some(data_path("remote_work/remote_work_config.json")),
            reference: Some(data_path("remote_work/remote_work_expected_summary.json")),
            out: Some(dir.join("out.json").display().to_string()),
            input: Some(snapshot.display().to_string()),
            remote: Some("Documents/respostas.csv".to_string()),
            library_dir: Some(library.display().to_string()),
            user: Some("analyst@example.org".to_string()),
            ..args()
        };
        run_survey(&a).unwrap();
        assert!(snapshot.exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn providers() {
        assert_eq!(guess_provider("respostas.CSV"), "csv");
        assert_eq!(guess_provider("planilha.xlsx"), "xlsx");
    }

    #[test]
    fn rounding() {
        assert_eq!(round3(161.5 / 6.0), 26.917);
        assert_eq!(round3(4.0), 4.0);
    }
}
