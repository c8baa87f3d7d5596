use log::{debug, warn};
use snafu::prelude::*;

use std::collections::HashMap;

use crate::config::*;
use crate::error::*;
use crate::scoring::finish;

/// The capabilities every kind of question provides.
///
/// The lifecycle is strict: `configure` once against the header row, then
/// `add_answer` once per respondent, then any number of `filter` and `score`
/// calls.
pub trait Tally {
    /// Locates the source column(s) in the header row. An optional question
    /// that cannot be located stays unconfigured and is not an error.
    fn configure(&mut self, header: &[String]) -> SurveyResult<()>;

    /// Records the answer of one respondent. Unmatched raw text is appended
    /// to `unmatched`.
    fn add_answer(
        &mut self,
        respondent: RespondentId,
        row: &[String],
        unmatched: &mut Vec<String>,
    ) -> SurveyResult<()>;

    /// The subset of `respondents` whose answer is one of `spec.answers`.
    fn filter(
        &self,
        spec: &FilterSpec,
        respondents: &[RespondentId],
    ) -> SurveyResult<Vec<RespondentId>>;

    /// The scores per bucket and the number of responses counted.
    fn score(
        &self,
        config: &ScoreConfig,
        respondents: &[RespondentId],
    ) -> SurveyResult<(Vec<f64>, f64)>;
}

// State shared by all the question variants.
#[derive(Debug, Clone)]
struct QuestionCore {
    def: QuestionDef,
    // None until configured.
    columns: Option<Vec<usize>>,
    responses: HashMap<RespondentId, Answer>,
}

impl QuestionCore {
    fn new(def: QuestionDef) -> QuestionCore {
        QuestionCore {
            def,
            columns: None,
            responses: HashMap::new(),
        }
    }

    fn id_or_prompt(&self) -> String {
        self.def.id.clone().unwrap_or_else(|| self.def.prompt.clone())
    }

    /// Records the located columns, or applies the `optional` policy when
    /// nothing was found.
    fn set_columns(&mut self, columns: Vec<usize>) -> SurveyResult<()> {
        if columns.is_empty() {
            ensure!(
                self.def.optional,
                QuestionNotFoundSnafu {
                    prompt: self.def.prompt.clone()
                }
            );
            warn!(
                "configure: optional question not found, skipping it: {:?}",
                self.def.prompt
            );
            return Ok(());
        }
        debug!(
            "configure: question {:?} reads columns {:?}",
            self.def.prompt, columns
        );
        self.columns = Some(columns);
        Ok(())
    }

    fn configure_single(&mut self, header: &[String]) -> SurveyResult<()> {
        let columns: Vec<usize> = header
            .iter()
            .position(|h| *h == self.def.prompt)
            .into_iter()
            .collect();
        self.set_columns(columns)
    }

    fn single_column(&self) -> Option<usize> {
        self.columns.as_ref().and_then(|cols| cols.first().cloned())
    }

    /// The raw text of the cell, or None when the row does not reach the column.
    fn read_cell<'a>(
        &self,
        respondent: RespondentId,
        row: &'a [String],
        column: usize,
    ) -> SurveyResult<Option<&'a str>> {
        match row.get(column) {
            Some(s) => Ok(Some(s.as_str())),
            None if self.def.optional => Ok(None),
            None => RowTooShortSnafu {
                prompt: self.def.prompt.clone(),
                respondent,
                column,
                len: row.len(),
            }
            .fail(),
        }
    }

    fn record(&mut self, respondent: RespondentId, answer: Answer) {
        debug!(
            "add_answer: {:?} respondent {}: {:?}",
            self.def.prompt, respondent, answer
        );
        self.responses.insert(respondent, answer);
    }

    fn recorded(&self, respondent: RespondentId) -> SurveyResult<&Answer> {
        self.responses
            .get(&respondent)
            .with_context(|| MissingAnswerSnafu {
                prompt: self.def.prompt.clone(),
                respondent,
            })
    }

    /// Keeps the respondents for which `accept` holds on their answer.
    /// A filter that names no answer matches nobody.
    fn filter_with<F>(
        &self,
        spec: &FilterSpec,
        respondents: &[RespondentId],
        accept: F,
    ) -> SurveyResult<Vec<RespondentId>>
    where
        F: Fn(&Answer) -> bool,
    {
        if spec.answers.is_empty() {
            debug!(
                "filter: {:?}: no answers given, the filter matches nobody",
                spec.id
            );
            return Ok(Vec::new());
        }
        let mut res: Vec<RespondentId> = Vec::new();
        for rid in respondents.iter() {
            if accept(self.recorded(*rid)?) {
                res.push(*rid);
            }
        }
        Ok(res)
    }

    fn warn_ranked_options(&self, config: &ScoreConfig) {
        if config.answer.is_some() || config.ranks.is_some() {
            warn!(
                "score: question {:?} is not ranked, ignoring 'answer' and 'ranks'",
                self.id_or_prompt()
            );
        }
    }
}

/// A single-choice question read from one column.
#[derive(Debug, Clone)]
pub struct PlainQuestion {
    core: QuestionCore,
}

impl Tally for PlainQuestion {
    fn configure(&mut self, header: &[String]) -> SurveyResult<()> {
        self.core.configure_single(header)
    }

    fn add_answer(
        &mut self,
        respondent: RespondentId,
        row: &[String],
        unmatched: &mut Vec<String>,
    ) -> SurveyResult<()> {
        let column = match self.core.single_column() {
            Some(c) => c,
            None => return Ok(()),
        };
        let answer = match self.core.read_cell(respondent, row, column)? {
            None => Answer::NoAnswer,
            Some(s) if s.trim().is_empty() => Answer::NoAnswer,
            Some(s) => match match_canonical_answer(&self.core.def.answers, s) {
                AnswerMatch::Matched(idx) => Answer::Answered(idx),
                AnswerMatch::Unmatched(raw) => {
                    unmatched.push(raw.clone());
                    Answer::Unmatched(raw)
                }
            },
        };
        self.core.record(respondent, answer);
        Ok(())
    }

    fn filter(
        &self,
        spec: &FilterSpec,
        respondents: &[RespondentId],
    ) -> SurveyResult<Vec<RespondentId>> {
        self.core.filter_with(spec, respondents, |a| match a {
            Answer::Answered(idx) => spec.answers.contains(idx),
            _ => false,
        })
    }

    fn score(
        &self,
        config: &ScoreConfig,
        respondents: &[RespondentId],
    ) -> SurveyResult<(Vec<f64>, f64)> {
        self.core.warn_ranked_options(config);
        let mut counts: Vec<f64> = vec![0.0; self.core.def.answers.len()];
        for rid in respondents.iter() {
            if let Answer::Answered(idx) = self.core.recorded(*rid)? {
                counts[*idx] += 1.0;
            }
        }
        Ok(finish(config, counts))
    }
}

/// A question ranking the canonical answers over several columns, one per
/// rank position.
#[derive(Debug, Clone)]
pub struct RankedQuestion {
    core: QuestionCore,
}

/// Removes a trailing `" [...]"` from a header, if there is one.
fn strip_bracket_suffix(header: &str) -> &str {
    let trimmed = header.trim_end();
    if trimmed.ends_with(']') {
        if let Some(pos) = trimmed.rfind('[') {
            return trimmed[..pos].trim_end();
        }
    }
    header
}

impl RankedQuestion {
    /// Number of rank positions, 0 when unconfigured.
    pub fn num_ranks(&self) -> usize {
        self.core.columns.as_ref().map(|c| c.len()).unwrap_or(0)
    }

    // Histogram of the positions at which `answer` was placed.
    fn score_positions(
        &self,
        answer: usize,
        respondents: &[RespondentId],
    ) -> SurveyResult<(Vec<f64>, usize)> {
        let mut counts: Vec<f64> = vec![0.0; self.num_ranks()];
        let mut counted = 0;
        for rid in respondents.iter() {
            if let Answer::AnsweredRanked(order) = self.core.recorded(*rid)? {
                if let Some(pos) = order.iter().position(|a| *a == answer) {
                    counts[pos] += 1.0;
                    counted += 1;
                }
            }
        }
        Ok((counts, counted))
    }

    // One point per mention at the selected positions.
    fn score_mentions(
        &self,
        ranks: &[usize],
        respondents: &[RespondentId],
    ) -> SurveyResult<(Vec<f64>, usize)> {
        let mut counts: Vec<f64> = vec![0.0; self.core.def.answers.len()];
        let mut counted = 0;
        for rid in respondents.iter() {
            if let Answer::AnsweredRanked(order) = self.core.recorded(*rid)? {
                for pos in ranks.iter() {
                    counts[order[*pos]] += 1.0;
                }
                counted += 1;
            }
        }
        Ok((counts, counted))
    }

    // Borda count: with k ranks, first place is worth k-1 points and last place 0.
    fn score_borda(&self, respondents: &[RespondentId]) -> SurveyResult<(Vec<f64>, usize)> {
        let num_answers = self.core.def.answers.len();
        let max_points = self.num_ranks().saturating_sub(1) as f64;
        let mut raw: Vec<f64> = vec![0.0; num_answers];
        let mut mentions: Vec<f64> = vec![0.0; num_answers];
        let mut counted = 0;
        for rid in respondents.iter() {
            if let Answer::AnsweredRanked(order) = self.core.recorded(*rid)? {
                for (pos, idx) in order.iter().enumerate() {
                    raw[*idx] += pos as f64;
                    mentions[*idx] += 1.0;
                }
                counted += 1;
            }
        }
        let points = raw
            .iter()
            .zip(mentions.iter())
            .map(|(r, m)| m * max_points - r)
            .collect();
        Ok((points, counted))
    }
}

impl Tally for RankedQuestion {
    fn configure(&mut self, header: &[String]) -> SurveyResult<()> {
        let mut matched: Vec<(&String, usize)> = header
            .iter()
            .enumerate()
            .filter(|(_, h)| strip_bracket_suffix(h) == self.core.def.prompt)
            .map(|(idx, h)| (h, idx))
            .collect();
        // The rank positions follow the order of the full header texts.
        matched.sort_by(|a, b| a.0.cmp(b.0));
        let columns = matched.iter().map(|(_, idx)| *idx).collect();
        self.core.set_columns(columns)
    }

    fn add_answer(
        &mut self,
        respondent: RespondentId,
        row: &[String],
        unmatched: &mut Vec<String>,
    ) -> SurveyResult<()> {
        let columns = match self.core.columns.clone() {
            Some(c) => c,
            None => return Ok(()),
        };
        let mut order: Vec<usize> = Vec::new();
        let mut complete = true;
        for column in columns {
            let cell = row.get(column).map(|s| s.as_str()).unwrap_or("");
            if cell.trim().is_empty() {
                complete = false;
                continue;
            }
            match match_canonical_answer(&self.core.def.answers, cell) {
                AnswerMatch::Matched(idx) => order.push(idx),
                AnswerMatch::Unmatched(raw) => {
                    unmatched.push(raw);
                    complete = false;
                }
            }
        }
        let answer = if complete {
            Answer::AnsweredRanked(order)
        } else {
            Answer::NoAnswer
        };
        self.core.record(respondent, answer);
        Ok(())
    }

    fn filter(
        &self,
        spec: &FilterSpec,
        _respondents: &[RespondentId],
    ) -> SurveyResult<Vec<RespondentId>> {
        FilterUnsupportedSnafu {
            id: spec.id.clone(),
        }
        .fail()
    }

    fn score(
        &self,
        config: &ScoreConfig,
        respondents: &[RespondentId],
    ) -> SurveyResult<(Vec<f64>, f64)> {
        let id = self.core.id_or_prompt();
        let num_ranks = self.num_ranks();
        let (counts, counted) = match (config.answer, config.ranks.as_deref()) {
            (Some(_), Some(_)) => {
                return InvalidScoreConfigSnafu {
                    id,
                    message: "'answer' and 'ranks' cannot be used together",
                }
                .fail();
            }
            (Some(answer), None) => {
                ensure!(
                    answer < self.core.def.answers.len(),
                    InvalidScoreConfigSnafu {
                        id,
                        message: format!(
                            "answer {} is out of range, there are {} answers",
                            answer,
                            self.core.def.answers.len()
                        ),
                    }
                );
                self.score_positions(answer, respondents)?
            }
            (None, Some(ranks)) => {
                if let Some(bad) = ranks.iter().find(|r| **r >= num_ranks) {
                    return InvalidScoreConfigSnafu {
                        id,
                        message: format!(
                            "rank {} is out of range, there are {} ranks",
                            bad, num_ranks
                        ),
                    }
                    .fail();
                }
                self.score_mentions(ranks, respondents)?
            }
            (None, None) => self.score_borda(respondents)?,
        };
        debug!(
            "score: ranked question {:?}: counts {:?} from {} respondents",
            id, counts, counted
        );
        let (scores, _) = finish(config, counts);
        Ok((scores, counted as f64))
    }
}

/// A question whose single cell lists every selected answer.
#[derive(Debug, Clone)]
pub struct SelectAllQuestion {
    core: QuestionCore,
}

/// Answers containing the delimiter cannot be represented.
pub const SELECT_ALL_DELIMITER: &str = ", ";

impl Tally for SelectAllQuestion {
    fn configure(&mut self, header: &[String]) -> SurveyResult<()> {
        self.core.configure_single(header)
    }

    fn add_answer(
        &mut self,
        respondent: RespondentId,
        row: &[String],
        unmatched: &mut Vec<String>,
    ) -> SurveyResult<()> {
        let column = match self.core.single_column() {
            Some(c) => c,
            None => return Ok(()),
        };
        let cell = match self.core.read_cell(respondent, row, column)? {
            None => {
                self.core.record(respondent, Answer::NoAnswer);
                return Ok(());
            }
            Some(s) if s.trim().is_empty() => {
                self.core.record(respondent, Answer::NoAnswer);
                return Ok(());
            }
            Some(s) => s,
        };
        let mut selected: Vec<usize> = Vec::new();
        // Blank tokens, including the one left by a trailing delimiter, are skipped.
        for token in cell
            .split(SELECT_ALL_DELIMITER)
            .filter(|t| !t.trim().is_empty())
        {
            match match_canonical_answer(&self.core.def.answers, token) {
                AnswerMatch::Matched(idx) if !selected.contains(&idx) => selected.push(idx),
                AnswerMatch::Matched(_) => {}
                AnswerMatch::Unmatched(raw) => unmatched.push(raw),
            }
        }
        self.core.record(respondent, Answer::AnsweredMulti(selected));
        Ok(())
    }

    fn filter(
        &self,
        spec: &FilterSpec,
        respondents: &[RespondentId],
    ) -> SurveyResult<Vec<RespondentId>> {
        self.core.filter_with(spec, respondents, |a| match a {
            Answer::AnsweredMulti(selected) => selected.iter().any(|s| spec.answers.contains(s)),
            _ => false,
        })
    }

    fn score(
        &self,
        config: &ScoreConfig,
        respondents: &[RespondentId],
    ) -> SurveyResult<(Vec<f64>, f64)> {
        self.core.warn_ranked_options(config);
        let mut counts: Vec<f64> = vec![0.0; self.core.def.answers.len()];
        for rid in respondents.iter() {
            if let Answer::AnsweredMulti(selected) = self.core.recorded(*rid)? {
                for idx in selected.iter() {
                    counts[*idx] += 1.0;
                }
            }
        }
        Ok(finish(config, counts))
    }
}

/// A configured question, of one of the supported formats.
#[derive(Debug, Clone)]
pub enum Question {
    Plain(PlainQuestion),
    Ranked(RankedQuestion),
    SelectAll(SelectAllQuestion),
}

impl Question {
    pub fn new(def: QuestionDef) -> Question {
        let format = def.format;
        let core = QuestionCore::new(def);
        match format {
            QuestionFormat::Plain => Question::Plain(PlainQuestion { core }),
            QuestionFormat::Ranked => Question::Ranked(RankedQuestion { core }),
            QuestionFormat::SelectAll => Question::SelectAll(SelectAllQuestion { core }),
        }
    }

    fn core(&self) -> &QuestionCore {
        match self {
            Question::Plain(q) => &q.core,
            Question::Ranked(q) => &q.core,
            Question::SelectAll(q) => &q.core,
        }
    }

    fn tally(&self) -> &dyn Tally {
        match self {
            Question::Plain(q) => q,
            Question::Ranked(q) => q,
            Question::SelectAll(q) => q,
        }
    }

    fn tally_mut(&mut self) -> &mut dyn Tally {
        match self {
            Question::Plain(q) => q,
            Question::Ranked(q) => q,
            Question::SelectAll(q) => q,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.core().def.id.as_deref()
    }

    pub fn prompt(&self) -> &str {
        &self.core().def.prompt
    }

    pub fn answers(&self) -> &[String] {
        &self.core().def.answers
    }

    pub fn format(&self) -> QuestionFormat {
        self.core().def.format
    }

    pub fn is_optional(&self) -> bool {
        self.core().def.optional
    }

    pub fn is_configured(&self) -> bool {
        self.core().columns.is_some()
    }

    /// The source columns, in rank order for ranked questions.
    pub fn columns(&self) -> Option<&[usize]> {
        self.core().columns.as_deref()
    }

    pub fn answer_of(&self, respondent: RespondentId) -> Option<&Answer> {
        self.core().responses.get(&respondent)
    }

    /// The labels of the buckets returned by `score` for this configuration.
    pub fn score_labels(&self, config: &ScoreConfig) -> Vec<String> {
        match self {
            Question::Ranked(q) if config.answer.is_some() => {
                (1..=q.num_ranks()).map(|r| r.to_string()).collect()
            }
            _ => self.answers().to_vec(),
        }
    }
}

impl Tally for Question {
    fn configure(&mut self, header: &[String]) -> SurveyResult<()> {
        self.tally_mut().configure(header)
    }

    fn add_answer(
        &mut self,
        respondent: RespondentId,
        row: &[String],
        unmatched: &mut Vec<String>,
    ) -> SurveyResult<()> {
        self.tally_mut().add_answer(respondent, row, unmatched)
    }

    fn filter(
        &self,
        spec: &FilterSpec,
        respondents: &[RespondentId],
    ) -> SurveyResult<Vec<RespondentId>> {
        self.tally().filter(spec, respondents)
    }

    fn score(
        &self,
        config: &ScoreConfig,
        respondents: &[RespondentId],
    ) -> SurveyResult<(Vec<f64>, f64)> {
        self.tally().score(config, respondents)
    }
}
