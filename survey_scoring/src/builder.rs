use crate::registry::TableSource;

/// A table of responses held in memory.
///
/// It is the simplest way to feed responses that do not come from a
/// spreadsheet, and the one used in tests.
///
/// ```
/// use survey_scoring::builder::MemoryTable;
/// use survey_scoring::{ingest, QuestionDef, ScoreConfig};
/// # use survey_scoring::SurveyError;
///
/// let table = MemoryTable::new(&["Name", "Loc", "Color"])
///     .row(&["A", "X", "red"]);
///
/// let registry = ingest(&[QuestionDef::new("color", "Color", &["red", "blue"])], &table)?;
/// let (scores, responses) = registry.score(&ScoreConfig::new("color"))?;
/// assert_eq!(scores, vec![1.0, 0.0]);
/// assert_eq!(responses, 1.0);
///
/// # Ok::<(), SurveyError>(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct MemoryTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl MemoryTable {
    pub fn new(header: &[&str]) -> MemoryTable {
        MemoryTable {
            header: header.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a data row. Rows may be shorter than the header.
    pub fn row(mut self, cells: &[&str]) -> MemoryTable {
        self.push_row(cells.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn from_rows(header: Vec<String>, rows: Vec<Vec<String>>) -> MemoryTable {
        MemoryTable { header, rows }
    }
}

impl TableSource for MemoryTable {
    fn header_row(&self) -> Vec<String> {
        self.header.clone()
    }

    fn num_rows(&self) -> usize {
        self.rows.len()
    }

    fn data_row(&self, n: usize) -> Vec<String> {
        n.checked_sub(1)
            .and_then(|idx| self.rows.get(idx))
            .cloned()
            .unwrap_or_default()
    }
}
