use clap::Parser;

/// This is a survey analysis program: it computes the distribution of the answers
/// of a form, as exported in a spreadsheet.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the survey: the spreadsheet and the fields to analyze.
    /// If not provided, the built-in remote work survey is used.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing a summary in JSON format. If provided, surveydash will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The spreadsheet snapshot to read. Setting this option overrides the
    /// path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default xlsx) The type of the input: xlsx or csv.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (path, optional) The location of the workbook in the document library. If provided,
    /// the snapshot is refreshed from the library before the analysis.
    #[clap(long, value_parser)]
    pub remote: Option<String>,

    /// (directory) The local copy of the document library, as synchronised by the sharing client.
    #[clap(long, value_parser, env = "SURVEY_LIBRARY_DIR")]
    pub library_dir: Option<String>,

    /// The account used to access the document library.
    #[clap(long, value_parser, env = "SURVEY_USER")]
    pub user: Option<String>,

    #[clap(long, value_parser, env = "SURVEY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
