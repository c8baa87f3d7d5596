use clap::Parser;

/// This is a survey tallying program.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The JSON file describing the questions of the survey and the graphs to produce.
    #[clap(short, long, value_parser)]
    pub config: String,

    /// (file path, optional) The spreadsheet containing the responses. Setting this option overrides
    /// the 'xlsFile' entry of the configuration.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (optional) The name of the worksheet holding the responses. Setting this option overrides
    /// the 'sheetName' entry of the configuration. It may be omitted when the workbook has a single worksheet.
    #[clap(long, value_parser)]
    pub sheet: Option<String>,

    /// (directory path, 'stdout' or empty) Where the summary of the results will be written in JSON format.
    /// Setting this option overrides the 'output-dir' entry of the configuration.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path, optional) A reference file containing a summary in JSON format. If provided, surveytally will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
