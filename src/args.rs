use clap::Parser;

/// This is a survey normalization and cross-tabulation program.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration describing the survey: the
    /// source file, the column phrases, the role vocabulary and the answer
    /// mappings. Command line flags override the source settings.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, crosstab
    /// will check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the
    /// analysis will be written in JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) If specified, the normalized records will be exported as
    /// CSV to the given location, one row per respondent.
    #[clap(short, long, value_parser)]
    pub export: Option<String>,

    /// (file path) The survey responses. Overrides the source that may be
    /// specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv or xlsx) The type of the input. Inferred from the file extension
    /// when not specified.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    /// Defaults to the first worksheet.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (default 1) The row holding the column headers. The index starts at 1
    /// to respect most conventions in the excel world.
    #[clap(long, value_parser)]
    pub header_row: Option<usize>,

    // Filter selections, applied before aggregating.
    /// Restricts the analysis to one role.
    #[clap(long, value_parser)]
    pub role: Option<String>,

    /// Restricts the analysis to respondents who selected this ethnicity.
    #[clap(long, value_parser)]
    pub ethnicity: Option<String>,

    /// Restricts the analysis to respondents who selected this disability.
    #[clap(long, value_parser)]
    pub disability: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
