// ********* Answer data structures ***********

use std::fmt::Display;

/// Sequential identifier of a respondent. The first data row is respondent 1.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct RespondentId(pub u32);

impl Display for RespondentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a respondent answered to one question, after matching against the
/// canonical answers.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Answer {
    /// A single canonical answer index.
    Answered(usize),
    /// Every canonical answer selected in a select-all question. May be empty.
    AnsweredMulti(Vec<usize>),
    /// One canonical answer per ranked sub-column, in column order.
    AnsweredRanked(Vec<usize>),
    /// The cell was empty.
    NoAnswer,
    /// The cell had content that matched no canonical answer.
    Unmatched(String),
}

/// The outcome of looking up raw cell text in a canonical answer list.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum AnswerMatch {
    Matched(usize),
    Unmatched(String),
}

/// Finds the canonical index of some raw text. The comparison is exact and
/// case-sensitive, after trimming surrounding whitespace.
pub fn match_canonical_answer(answers: &[String], raw: &str) -> AnswerMatch {
    let trimmed = raw.trim();
    match answers.iter().position(|a| a == trimmed) {
        Some(idx) => AnswerMatch::Matched(idx),
        None => AnswerMatch::Unmatched(trimmed.to_string()),
    }
}

// ********* Question configuration ***********

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum QuestionFormat {
    /// One column, one answer.
    Plain,
    /// Several columns `"<prompt> [<item>]"`, one rank position each.
    Ranked,
    /// One column holding a `", "`-separated list of answers.
    SelectAll,
}

/// The declaration of a question, as validated from the configuration.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct QuestionDef {
    pub id: Option<String>,
    pub prompt: String,
    pub answers: Vec<String>,
    pub format: QuestionFormat,
    pub optional: bool,
}

impl QuestionDef {
    pub fn new(id: &str, prompt: &str, answers: &[&str]) -> QuestionDef {
        QuestionDef {
            id: Some(id.to_string()),
            prompt: prompt.to_string(),
            answers: answers.iter().map(|s| s.to_string()).collect(),
            format: QuestionFormat::Plain,
            optional: false,
        }
    }

    pub fn format(self, format: QuestionFormat) -> QuestionDef {
        QuestionDef { format, ..self }
    }

    pub fn optional(self, optional: bool) -> QuestionDef {
        QuestionDef { optional, ..self }
    }
}

// ********* Scoring configuration ***********

/// Keeps the respondents whose answer to question `id` is one of `answers`.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FilterSpec {
    pub id: String,
    pub answers: Vec<usize>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ScoreConfig {
    /// The question to score.
    pub id: String,
    /// Report fractions of the total instead of raw counts.
    pub percentage: bool,
    /// Ranked questions only: histogram of the positions given to this answer.
    pub answer: Option<usize>,
    /// Ranked questions only: restrict the tally to these rank positions (0 is first).
    pub ranks: Option<Vec<usize>>,
    /// Applied in order, each one narrowing the respondents kept by the previous.
    pub filters: Vec<FilterSpec>,
    /// Removed by the expansion, which replaces it with one filter per answer.
    pub sort_by: Option<String>,
}

impl ScoreConfig {
    pub fn new(id: &str) -> ScoreConfig {
        ScoreConfig {
            id: id.to_string(),
            percentage: false,
            answer: None,
            ranks: None,
            filters: Vec::new(),
            sort_by: None,
        }
    }
}

// ********* Graph specifications ***********

/// What a graph specification plots.
#[derive(PartialEq, Debug, Clone)]
pub enum Plot {
    Single(ScoreConfig),
    /// A `nrows` x `ncols` grid. After expansion it must hold exactly
    /// `nrows * ncols` sub-plots.
    Grid {
        nrows: usize,
        ncols: usize,
        sub_plots: Vec<GraphSpec>,
    },
}

#[derive(PartialEq, Debug, Clone)]
pub struct GraphSpec {
    pub title: Option<String>,
    pub x_axis: Option<String>,
    pub y_axis: Option<String>,
    /// Labels for the bars, overriding the canonical answers.
    pub bars: Option<Vec<String>>,
    pub show_responses: bool,
    pub save_as: Option<String>,
    pub plot: Plot,
}

impl GraphSpec {
    pub fn single(title: Option<&str>, config: ScoreConfig) -> GraphSpec {
        GraphSpec {
            title: title.map(|s| s.to_string()),
            x_axis: None,
            y_axis: None,
            bars: None,
            show_responses: true,
            save_as: None,
            plot: Plot::Single(config),
        }
    }

    pub fn grid(
        title: Option<&str>,
        nrows: usize,
        ncols: usize,
        sub_plots: Vec<GraphSpec>,
    ) -> GraphSpec {
        GraphSpec {
            title: title.map(|s| s.to_string()),
            x_axis: None,
            y_axis: None,
            bars: None,
            show_responses: true,
            save_as: None,
            plot: Plot::Grid {
                nrows,
                ncols,
                sub_plots,
            },
        }
    }

    pub(crate) fn display_title(&self) -> String {
        self.title.clone().unwrap_or_default()
    }
}

// ******** Output data structures *********

/// One bar chart, ready to be handed to a renderer.
#[derive(PartialEq, Debug, Clone)]
pub struct Chart {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
    pub response_count: f64,
    pub title: Option<String>,
    pub x_axis: Option<String>,
    pub y_axis: Option<String>,
    pub show_responses: bool,
    pub save_as: Option<String>,
}

#[derive(PartialEq, Debug, Clone)]
pub enum Figure {
    Single(Chart),
    Grid {
        title: Option<String>,
        nrows: usize,
        ncols: usize,
        save_as: Option<String>,
        charts: Vec<Chart>,
    },
}
