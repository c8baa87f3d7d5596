use log::{debug, info, warn};

use survey_scoring::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::survey::config_reader::*;
use crate::survey::render::*;

pub mod config_reader;
mod io_common;
mod io_excel;
mod render;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SurveyAppError {
    #[snafu(display("Error opening spreadsheet {path}"))]
    OpeningExcel {
        source: calamine::Error,
        path: String,
    },
    #[snafu(display("Worksheet {sheet_name:?} not found in {path}"))]
    MissingWorksheet { sheet_name: String, path: String },
    #[snafu(display(
        "The workbook {path} has {count} worksheets, the sheet name must be provided"
    ))]
    AmbiguousWorksheet { path: String, count: usize },
    #[snafu(display("The worksheet in {path} is empty"))]
    EmptyExcel { path: String },
    #[snafu(display("Cannot read the cell at row {row}, column {column}: {content}"))]
    ExcelWrongCellType {
        row: usize,
        column: usize,
        content: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON in {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the summary"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The configuration needs either 'xlsFile' or 'link'"))]
    MissingSource {},
    #[snafu(display("{source}"))]
    Survey { source: SurveyError },
    #[snafu(display("Difference detected between the summary and the reference {path}"))]
    ReferenceMismatch { path: String },
}

pub type AppResult<T> = Result<T, SurveyAppError>;

/// Settings of one run, as given on the command line.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RunOptions {
    pub config_path: String,
    pub input: Option<String>,
    pub sheet_name: Option<String>,
    pub out: Option<String>,
    pub reference: Option<String>,
}

/// Where the responses come from.
#[derive(Eq, PartialEq, Debug, Clone)]
enum DataSource {
    Spreadsheet {
        path: String,
        sheet_name: Option<String>,
    },
    RemoteForm(String),
}

fn resolve(root: &Path, p: &str) -> String {
    let pb: PathBuf = [root, Path::new(p)].iter().collect();
    pb.as_path().display().to_string()
}

fn data_source(config: &SurveyConfig, root: &Path, opts: &RunOptions) -> AppResult<DataSource> {
    let sheet_name = opts.sheet_name.clone().or_else(|| config.sheet_name.clone());
    if let Some(p) = opts.input.clone() {
        return Ok(DataSource::Spreadsheet {
            path: p,
            sheet_name,
        });
    }
    match (&config.xls_file, &config.link) {
        (Some(p), _) => Ok(DataSource::Spreadsheet {
            path: resolve(root, p),
            sheet_name,
        }),
        (None, Some(link)) => Ok(DataSource::RemoteForm(link.clone())),
        (None, None) => MissingSourceSnafu {}.fail(),
    }
}

fn output_target(config: &SurveyConfig, root: &Path, opts: &RunOptions) -> OutputTarget {
    match (&opts.out, &config.output_dir) {
        (Some(o), _) if o == "stdout" => OutputTarget::Stdout,
        (Some(o), _) => OutputTarget::Directory(PathBuf::from(o)),
        (None, Some(d)) => OutputTarget::Directory(PathBuf::from(resolve(root, d))),
        (None, None) => OutputTarget::Stdout,
    }
}

/// Ingests the responses and scores every graph of the configuration.
pub fn tally_survey(
    config: &SurveyConfig,
    source: &DataSourceRef,
) -> AppResult<(Registry, Vec<Figure>)> {
    let questions = validate_questions(&config.questions).context(SurveySnafu {})?;
    let specs = validate_analysis(&config.analysis).context(SurveySnafu {})?;

    let registry = match source {
        DataSourceRef::Table(table) => ingest(&questions, *table).context(SurveySnafu {})?,
        DataSourceRef::RemoteForm(link) => {
            ingest_remote_form(link, &questions).context(SurveySnafu {})?
        }
    };
    let figures = analyze(&registry, specs).context(SurveySnafu {})?;
    Ok((registry, figures))
}

/// A data source ready to be ingested.
pub enum DataSourceRef<'a> {
    Table(&'a dyn TableSource),
    RemoteForm(&'a str),
}

pub fn run_survey(opts: &RunOptions) -> AppResult<()> {
    let config = read_config(&opts.config_path)?;
    info!("config: {:?}", config);
    let config_p = Path::new(opts.config_path.as_str());
    let root_p = config_p.parent().unwrap_or_else(|| Path::new(""));

    let (registry, figures) = match data_source(&config, root_p, opts)? {
        DataSource::Spreadsheet { path, sheet_name } => {
            info!("Attempting to read responses from {:?}", path);
            let table = io_excel::read_worksheet(&path, sheet_name.as_deref())?;
            tally_survey(&config, &DataSourceRef::Table(&table))?
        }
        DataSource::RemoteForm(link) => {
            tally_survey(&config, &DataSourceRef::RemoteForm(&link))?
        }
    };

    for s in registry.unmatched_answers() {
        debug!("unmatched answer: {:?}", s);
    }

    let summary_js = build_summary_js(&registry, &figures);
    let pretty_js_summary =
        serde_json::to_string_pretty(&summary_js).context(SerializingJsonSnafu {})?;
    write_outputs(&output_target(&config, root_p, opts), &figures, &pretty_js_summary)?;

    // The reference summary, if provided for comparison
    if let Some(reference_p) = &opts.reference {
        let summary_ref = read_summary(reference_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(SerializingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_summary {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_summary.as_str(),
                "\n",
            );
            return ReferenceMismatchSnafu {
                path: reference_p.clone(),
            }
            .fail();
        }
        info!("The summary matches the reference {:?}", reference_p);
    }
    Ok(())
}

fn read_summary(path: &str) -> AppResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_scoring::builder::MemoryTable;

    fn config() -> SurveyConfig {
        serde_json::from_str(
            r#"{
                "xlsFile": "responses.xlsx",
                "sheetName": "Form Responses 1",
                "questions": [
                    {"id": "agree", "question": "Do you agree?", "answers": ["yes", "no", "unsure"]},
                    {"id": "color", "question": "Color", "answers": ["red", "blue"]},
                    {"id": "pets", "question": "Pets", "answers": ["cat", "dog"], "select-all": true}
                ],
                "analysis": [
                    {"title": "Colors", "config": {"id": "color", "sort-by": "agree"}},
                    {"title": "Pets", "nrows": 1, "ncols": 2, "sub-plots": [
                        {"config": {"id": "pets", "percentage": true}},
                        {"config": {"id": "pets", "filters": [{"id": "color", "answers": [1]}]}}
                    ]}
                ]
            }"#,
        )
        .unwrap()
    }

    fn table() -> MemoryTable {
        MemoryTable::new(&["Timestamp", "Do you agree?", "Color", "Pets"])
            .row(&["1", "yes", "red", "cat, dog, "])
            .row(&["2", "no", "blue", "dog"])
            .row(&["3", "maybe", "blue", ""])
    }

    #[test]
    fn tally_from_config() {
        let (registry, figures) =
            tally_survey(&config(), &DataSourceRef::Table(&table())).unwrap();
        assert_eq!(registry.num_respondents(), 3);
        assert_eq!(registry.unmatched_answers(), &["maybe".to_string()]);
        // Three sorted charts and one grid.
        assert_eq!(figures.len(), 4);
        match &figures[3] {
            Figure::Grid { charts, .. } => {
                assert_eq!(charts[0].scores, vec![1.0 / 3.0, 2.0 / 3.0]);
                assert_eq!(charts[1].scores, vec![0.0, 1.0]);
                assert_eq!(charts[1].response_count, 1.0);
            }
            Figure::Single(_) => panic!("expected a grid"),
        }
    }

    #[test]
    fn remote_forms_fail() {
        let err = tally_survey(&config(), &DataSourceRef::RemoteForm("https://example.com"))
            .unwrap_err();
        assert!(matches!(
            err,
            SurveyAppError::Survey {
                source: SurveyError::UnsupportedSource { .. }
            }
        ));
    }

    #[test]
    fn sources() {
        let root = Path::new("/data");
        let mut c = config();
        let opts = RunOptions::default();
        assert_eq!(
            data_source(&c, root, &opts).unwrap(),
            DataSource::Spreadsheet {
                path: "/data/responses.xlsx".to_string(),
                sheet_name: Some("Form Responses 1".to_string()),
            }
        );
        c.xls_file = None;
        c.link = Some("https://example.com/form".to_string());
        assert_eq!(
            data_source(&c, root, &opts).unwrap(),
            DataSource::RemoteForm("https://example.com/form".to_string())
        );
        c.link = None;
        assert!(data_source(&c, root, &opts).is_err());
    }

    #[test]
    fn outputs() {
        let root = Path::new("/data");
        let mut c = config();
        let mut opts = RunOptions::default();
        assert_eq!(output_target(&c, root, &opts), OutputTarget::Stdout);
        c.output_dir = Some("charts".to_string());
        assert_eq!(
            output_target(&c, root, &opts),
            OutputTarget::Directory(PathBuf::from("/data/charts"))
        );
        opts.out = Some("stdout".to_string());
        assert_eq!(output_target(&c, root, &opts), OutputTarget::Stdout);
    }
}
