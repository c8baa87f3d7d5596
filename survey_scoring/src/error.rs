use snafu::Snafu;

use crate::config::RespondentId;

/// The broad families of failures. Every failure aborts the current run.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ErrorKind {
    /// Something in the configuration does not line up with the data. User-correctable.
    Configuration,
    /// A data row could not be read for a required question. User-correctable.
    Ingestion,
    /// An internal invariant was broken. Not user-correctable.
    Consistency,
    /// The requested data source is not implemented.
    UnsupportedSource,
    /// A filter was requested on a question that cannot be filtered.
    FilterUnsupported,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SurveyError {
    #[snafu(display("Did not find question in the header row: {prompt:?}"))]
    QuestionNotFound { prompt: String },

    #[snafu(display("Question id {id:?} is declared more than once"))]
    DuplicateQuestionId { id: String },

    #[snafu(display("No question with id {id:?} is declared"))]
    UnknownQuestionId { id: String },

    #[snafu(display("Optional question {id:?} was not found in the data and cannot be used"))]
    QuestionNotConfigured { id: String },

    #[snafu(display("Invalid question {prompt:?}: {message}"))]
    InvalidQuestion { prompt: String, message: String },

    #[snafu(display("Invalid graph specification {title:?}: {message}"))]
    InvalidGraphSpec { title: String, message: String },

    #[snafu(display("Invalid scoring configuration for question {id:?}: {message}"))]
    InvalidScoreConfig { id: String, message: String },

    #[snafu(display(
        "Grid {title:?} expects {expected} sub-plots ({nrows} x {ncols}) but has {actual} after expansion"
    ))]
    SubPlotCountMismatch {
        title: String,
        nrows: usize,
        ncols: usize,
        expected: usize,
        actual: usize,
    },

    #[snafu(display(
        "Row for respondent {respondent} has {len} cells, question {prompt:?} reads column {column}"
    ))]
    RowTooShort {
        prompt: String,
        respondent: RespondentId,
        column: usize,
        len: usize,
    },

    #[snafu(display(
        "Internal error: respondent {respondent} has no recorded answer for question {prompt:?}. \
         This is a bug, please contact the maintainer."
    ))]
    MissingAnswer {
        prompt: String,
        respondent: RespondentId,
    },

    #[snafu(display("Reading from {source_name} is not supported yet"))]
    UnsupportedSource { source_name: String },

    #[snafu(display("Question {id:?} is a ranked question and cannot be used as a filter"))]
    FilterUnsupported { id: String },
}

impl SurveyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SurveyError::QuestionNotFound { .. }
            | SurveyError::DuplicateQuestionId { .. }
            | SurveyError::UnknownQuestionId { .. }
            | SurveyError::QuestionNotConfigured { .. }
            | SurveyError::InvalidQuestion { .. }
            | SurveyError::InvalidGraphSpec { .. }
            | SurveyError::InvalidScoreConfig { .. }
            | SurveyError::SubPlotCountMismatch { .. } => ErrorKind::Configuration,
            SurveyError::RowTooShort { .. } => ErrorKind::Ingestion,
            SurveyError::MissingAnswer { .. } => ErrorKind::Consistency,
            SurveyError::UnsupportedSource { .. } => ErrorKind::UnsupportedSource,
            SurveyError::FilterUnsupported { .. } => ErrorKind::FilterUnsupported,
        }
    }

    /// True when editing the configuration or the input file can fix the problem.
    pub fn is_user_correctable(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Consistency)
    }
}

pub type SurveyResult<T> = Result<T, SurveyError>;
