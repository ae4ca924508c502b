//! Dataset loading and the issue record schema.

pub mod loader;
pub mod record;

pub use loader::load_tsv;
pub use record::{IssueDataset, IssueRecord, COLUMNS, COLUMN_AREA, COLUMN_DESCRIPTION, COLUMN_TITLE};
