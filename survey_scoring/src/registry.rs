use log::{debug, info, warn};
use snafu::prelude::*;

use std::collections::HashMap;

use crate::config::*;
use crate::error::*;
use crate::question::{Question, Tally};

/// Row access to the table of responses.
///
/// The first row is the header. Data rows are numbered from 1 to `num_rows()`.
pub trait TableSource {
    fn header_row(&self) -> Vec<String>;
    fn num_rows(&self) -> usize;
    fn data_row(&self, n: usize) -> Vec<String>;
}

/// The questions of one survey and the answers of all its respondents.
///
/// A registry is built by a single ingestion run and is read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    questions: Vec<Question>,
    by_id: HashMap<String, usize>,
    num_respondents: u32,
    unmatched: Vec<String>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Adds a question. Questions without id can be ingested but not referenced.
    pub fn register(&mut self, question: Question) -> SurveyResult<()> {
        if let Some(id) = question.id() {
            ensure!(
                !self.by_id.contains_key(id),
                DuplicateQuestionIdSnafu { id }
            );
            self.by_id.insert(id.to_string(), self.questions.len());
        }
        self.questions.push(question);
        Ok(())
    }

    pub fn question(&self, id: &str) -> SurveyResult<&Question> {
        self.by_id
            .get(id)
            .map(|idx| &self.questions[*idx])
            .context(UnknownQuestionIdSnafu { id })
    }

    /// Like `question`, but also fails if the question was not found in the data.
    pub fn configured_question(&self, id: &str) -> SurveyResult<&Question> {
        let q = self.question(id)?;
        ensure!(q.is_configured(), QuestionNotConfiguredSnafu { id });
        Ok(q)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn num_respondents(&self) -> u32 {
        self.num_respondents
    }

    /// All the respondents, in ingestion order.
    pub fn respondents(&self) -> Vec<RespondentId> {
        (1..=self.num_respondents).map(RespondentId).collect()
    }

    /// Every non-empty cell that matched no canonical answer, in reading order.
    pub fn unmatched_answers(&self) -> &[String] {
        &self.unmatched
    }

    /// Records the next data row and returns the id assigned to its respondent.
    pub fn add_row(&mut self, row: &[String]) -> SurveyResult<RespondentId> {
        let rid = RespondentId(self.num_respondents + 1);
        for q in self.questions.iter_mut().filter(|q| q.is_configured()) {
            q.add_answer(rid, row, &mut self.unmatched)?;
        }
        self.num_respondents = rid.0;
        Ok(rid)
    }

    /// Applies the filters in order, starting from every respondent.
    pub fn filter_respondents(&self, filters: &[FilterSpec]) -> SurveyResult<Vec<RespondentId>> {
        let mut respondents = self.respondents();
        for f in filters.iter() {
            let q = self.configured_question(&f.id)?;
            respondents = q.filter(f, &respondents)?;
            debug!(
                "filter_respondents: {:?} {:?} keeps {} respondents",
                f.id,
                f.answers,
                respondents.len()
            );
        }
        Ok(respondents)
    }

    /// Filters the respondents and scores question `config.id` over them.
    pub fn score(&self, config: &ScoreConfig) -> SurveyResult<(Vec<f64>, f64)> {
        let respondents = self.filter_respondents(&config.filters)?;
        self.configured_question(&config.id)?
            .score(config, &respondents)
    }
}

/// Configures every question against the header and reads all the data rows.
///
/// Fails on the first problem: a required question missing from the header, a
/// duplicate id or a row too short for a required question.
pub fn ingest(defs: &[QuestionDef], source: &dyn TableSource) -> SurveyResult<Registry> {
    let header = source.header_row();
    debug!("ingest: header: {:?}", header);

    let mut registry = Registry::new();
    for def in defs.iter() {
        let mut q = Question::new(def.clone());
        q.configure(&header)?;
        registry.register(q)?;
    }
    let num_configured = registry
        .questions
        .iter()
        .filter(|q| q.is_configured())
        .count();
    info!(
        "ingest: {} questions declared, {} configured",
        defs.len(),
        num_configured
    );

    for n in 1..=source.num_rows() {
        let row = source.data_row(n);
        registry.add_row(&row)?;
    }
    info!("ingest: {} respondents", registry.num_respondents);
    if !registry.unmatched.is_empty() {
        warn!(
            "ingest: {} answers did not match any declared answer",
            registry.unmatched.len()
        );
    }
    Ok(registry)
}

/// Ingestion from an online form. Not implemented.
pub fn ingest_remote_form(link: &str, _defs: &[QuestionDef]) -> SurveyResult<Registry> {
    UnsupportedSourceSnafu {
        source_name: format!("remote form {:?}", link),
    }
    .fail()
}
