use serde::{Deserialize, Serialize};

/// Column name for the issue title
pub const COLUMN_TITLE: &str = "Title";

/// Column name for the issue description
pub const COLUMN_DESCRIPTION: &str = "Description";

/// Column name for the area label
pub const COLUMN_AREA: &str = "Area";

/// Fixed column order of the dataset files
pub const COLUMNS: [&str; 3] = [COLUMN_TITLE, COLUMN_DESCRIPTION, COLUMN_AREA];

/// A single GitHub issue record
///
/// The area label is present on dataset rows and absent on ad-hoc records
/// passed to the single-prediction path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    /// Issue title
    pub title: String,

    /// Issue description
    pub description: String,

    /// Area label (training/evaluation only)
    pub area: Option<String>,
}

impl IssueRecord {
    /// Create a labeled record
    pub fn new(title: impl Into<String>, description: impl Into<String>, area: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            area: Some(area.into()),
        }
    }

    /// Create an unlabeled record for single prediction
    pub fn unlabeled(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            area: None,
        }
    }
}

/// An in-memory tabular dataset of issue records
#[derive(Debug, Clone, Default)]
pub struct IssueDataset {
    records: Vec<IssueRecord>,
}

impl IssueDataset {
    /// Create a dataset from records
    pub fn new(records: Vec<IssueRecord>) -> Self {
        Self { records }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over the records
    pub fn iter(&self) -> std::slice::Iter<'_, IssueRecord> {
        self.records.iter()
    }

    /// The records as a slice
    pub fn records(&self) -> &[IssueRecord] {
        &self.records
    }

    /// Iterate over the area labels of rows that carry one
    pub fn areas(&self) -> impl Iterator<Item = &str> {
        self.records.iter().filter_map(|r| r.area.as_deref())
    }
}
