use crate::survey::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct QuestionEntry {
    pub id: Option<String>,
    pub question: String,
    pub answers: Vec<String>,
    pub format: Option<String>,
    // Older configurations flag select-all questions this way.
    #[serde(rename = "select-all")]
    pub select_all: Option<bool>,
    pub optional: Option<bool>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FilterEntry {
    pub id: String,
    pub answers: Option<Vec<usize>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ScoringEntry {
    pub id: Option<String>,
    pub percentage: Option<bool>,
    pub answer: Option<usize>,
    pub ranks: Option<Vec<usize>>,
    pub filters: Option<Vec<FilterEntry>>,
    #[serde(rename = "sort-by")]
    pub sort_by: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct GraphEntry {
    pub title: Option<String>,
    #[serde(rename = "x-axis")]
    pub x_axis: Option<String>,
    #[serde(rename = "y-axis")]
    pub y_axis: Option<String>,
    pub bars: Option<Vec<String>>,
    #[serde(rename = "no-show-responses")]
    pub no_show_responses: Option<bool>,
    #[serde(rename = "save-as")]
    pub save_as: Option<String>,
    pub nrows: Option<usize>,
    pub ncols: Option<usize>,
    #[serde(rename = "sub-plots")]
    pub sub_plots: Option<Vec<GraphEntry>>,
    pub config: Option<ScoringEntry>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(rename = "xlsFile")]
    pub xls_file: Option<String>,
    #[serde(rename = "sheetName")]
    pub sheet_name: Option<String>,
    pub link: Option<String>,
    pub questions: Vec<QuestionEntry>,
    #[serde(default)]
    pub analysis: Vec<GraphEntry>,
    #[serde(rename = "output-dir")]
    pub output_dir: Option<String>,
}

pub fn read_config(path: &str) -> AppResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}

fn validate_question(entry: &QuestionEntry) -> SurveyResult<QuestionDef> {
    if entry.question.trim().is_empty() {
        return Err(invalid_question(entry, "the question text is blank"));
    }
    if entry.answers.is_empty() {
        return Err(invalid_question(entry, "no 'answers' are declared"));
    }
    let format = match entry.format.as_deref() {
        Some("ranked") => QuestionFormat::Ranked,
        Some("select-all") => QuestionFormat::SelectAll,
        Some(x) => {
            warn!(
                "Unknown format {:?} for question {:?}, reading it as a plain question",
                x, entry.question
            );
            QuestionFormat::Plain
        }
        None if entry.select_all.unwrap_or(false) => QuestionFormat::SelectAll,
        None => QuestionFormat::Plain,
    };
    Ok(QuestionDef {
        id: entry.id.clone(),
        prompt: entry.question.clone(),
        answers: entry.answers.clone(),
        format,
        optional: entry.optional.unwrap_or(false),
    })
}

fn invalid_question(entry: &QuestionEntry, message: &str) -> SurveyError {
    SurveyError::InvalidQuestion {
        prompt: entry.question.clone(),
        message: message.to_string(),
    }
}

pub fn validate_questions(entries: &[QuestionEntry]) -> SurveyResult<Vec<QuestionDef>> {
    entries.iter().map(validate_question).collect()
}

fn invalid_graph(entry: &GraphEntry, message: &str) -> SurveyError {
    SurveyError::InvalidGraphSpec {
        title: entry.title.clone().unwrap_or_default(),
        message: message.to_string(),
    }
}

fn validate_scoring(entry: &GraphEntry, scoring: &ScoringEntry) -> SurveyResult<ScoreConfig> {
    let id = scoring
        .id
        .clone()
        .ok_or_else(|| invalid_graph(entry, "the scoring configuration has no 'id'"))?;
    let filters = scoring
        .filters
        .clone()
        .unwrap_or_default()
        .into_iter()
        .map(|f| FilterSpec {
            id: f.id,
            answers: f.answers.unwrap_or_default(),
        })
        .collect();
    Ok(ScoreConfig {
        id,
        percentage: scoring.percentage.unwrap_or(false),
        answer: scoring.answer,
        ranks: scoring.ranks.clone(),
        filters,
        sort_by: scoring.sort_by.clone(),
    })
}

fn validate_graph(entry: &GraphEntry) -> SurveyResult<GraphSpec> {
    let plot = match (&entry.sub_plots, &entry.config) {
        (Some(sub_plots), _) => {
            if entry.config.is_some() {
                warn!(
                    "Graph {:?} has sub-plots, ignoring its own 'config'",
                    entry.title
                );
            }
            let (nrows, ncols) = match (entry.nrows, entry.ncols) {
                (Some(r), Some(c)) => (r, c),
                _ => return Err(invalid_graph(entry, "sub-plots need 'nrows' and 'ncols'")),
            };
            Plot::Grid {
                nrows,
                ncols,
                sub_plots: validate_analysis(sub_plots)?,
            }
        }
        (None, Some(scoring)) => Plot::Single(validate_scoring(entry, scoring)?),
        (None, None) => return Err(invalid_graph(entry, "missing 'config'")),
    };
    Ok(GraphSpec {
        title: entry.title.clone(),
        x_axis: entry.x_axis.clone(),
        y_axis: entry.y_axis.clone(),
        bars: entry.bars.clone(),
        show_responses: !entry.no_show_responses.unwrap_or(false),
        save_as: entry.save_as.clone(),
        plot,
    })
}

pub fn validate_analysis(entries: &[GraphEntry]) -> SurveyResult<Vec<GraphSpec>> {
    entries.iter().map(validate_graph).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(js: &str) -> SurveyConfig {
        serde_json::from_str(js).unwrap()
    }

    #[test]
    fn questions() {
        let c = parse(
            r#"{
                "xlsFile": "a.xlsx",
                "questions": [
                    {"question": "Q1", "answers": ["a", "b"]},
                    {"id": "q2", "question": "Q2", "answers": ["a"], "format": "ranked", "optional": true},
                    {"id": "q3", "question": "Q3", "answers": ["a"], "format": "select-all"},
                    {"id": "q4", "question": "Q4", "answers": ["a"], "select-all": true},
                    {"id": "q5", "question": "Q5", "answers": ["a"], "format": "likert"}
                ]
            }"#,
        );
        assert!(c.analysis.is_empty());
        let defs = validate_questions(&c.questions).unwrap();
        assert_eq!(defs[0].id, None);
        assert_eq!(defs[0].format, QuestionFormat::Plain);
        assert_eq!(defs[1].format, QuestionFormat::Ranked);
        assert!(defs[1].optional);
        assert_eq!(defs[2].format, QuestionFormat::SelectAll);
        assert_eq!(defs[3].format, QuestionFormat::SelectAll);
        assert_eq!(defs[4].format, QuestionFormat::Plain);
    }

    #[test]
    fn invalid_questions() {
        let c = parse(r#"{"questions": [{"id": "q", "question": "Q", "answers": []}]}"#);
        let err = validate_questions(&c.questions).unwrap_err();
        assert!(matches!(err, SurveyError::InvalidQuestion { ref prompt, .. } if prompt == "Q"));
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let c = parse(r#"{"questions": [{"question": "  ", "answers": ["a"]}]}"#);
        assert!(validate_questions(&c.questions).is_err());
    }

    #[test]
    fn graphs() {
        let c = parse(
            r#"{
                "questions": [],
                "output-dir": "out",
                "analysis": [
                    {
                        "title": "Favorite",
                        "x-axis": "Answer",
                        "y-axis": "Count",
                        "no-show-responses": true,
                        "save-as": "favorite.png",
                        "config": {
                            "id": "fav",
                            "percentage": true,
                            "ranks": [0, 1],
                            "filters": [{"id": "loc", "answers": [0, 2]}, {"id": "age"}]
                        }
                    },
                    {
                        "nrows": 2,
                        "ncols": 1,
                        "sub-plots": [{"config": {"id": "fav", "answer": 2, "sort-by": "loc"}}]
                    }
                ]
            }"#,
        );
        let specs = validate_analysis(&c.analysis).unwrap();
        assert_eq!(specs.len(), 2);
        assert!(!specs[0].show_responses);
        assert_eq!(specs[0].x_axis.as_deref(), Some("Answer"));
        match &specs[0].plot {
            Plot::Single(config) => {
                assert!(config.percentage);
                assert_eq!(config.ranks, Some(vec![0, 1]));
                assert_eq!(config.filters[0].answers, vec![0, 2]);
                assert!(config.filters[1].answers.is_empty());
            }
            Plot::Grid { .. } => panic!("expected a single plot"),
        }
        match &specs[1].plot {
            Plot::Grid {
                nrows,
                ncols,
                sub_plots,
            } => {
                assert_eq!((*nrows, *ncols), (2, 1));
                assert!(matches!(
                    &sub_plots[0].plot,
                    Plot::Single(ScoreConfig { answer: Some(2), sort_by: Some(s), .. }) if s == "loc"
                ));
            }
            Plot::Single(_) => panic!("expected a grid"),
        }
    }

    #[test]
    fn graph_without_id() {
        let c = parse(r#"{"questions": [], "analysis": [{"title": "T", "config": {}}]}"#);
        let err = validate_analysis(&c.analysis).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn grid_without_dimensions() {
        let c = parse(
            r#"{"questions": [], "analysis": [{"sub-plots": [{"config": {"id": "a"}}]}]}"#,
        );
        assert!(validate_analysis(&c.analysis).is_err());
    }
}
