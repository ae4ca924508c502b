use crate::data::record::{IssueDataset, IssueRecord, COLUMNS};
use crate::error::{Result, TriageError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// Load a tab-separated issue dataset bound to the fixed issue schema.
///
/// Columns must appear in the order Title, Description, Area. When
/// `has_header` is set the first line is validated against the expected
/// column names before any rows are read.
pub fn load_tsv(path: &Path, has_header: bool) -> Result<IssueDataset> {
    if !path.exists() {
        return Err(TriageError::FileNotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    if has_header {
        let header = match lines.next() {
            Some(line) => line?,
            None => {
                return Err(TriageError::SchemaMismatch(format!(
                    "{}: expected a header row, found an empty file",
                    path.display()
                )))
            }
        };
        validate_header(path, &header)?;
    }

    let mut records = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != COLUMNS.len() {
            // Line numbers are 1-based and account for the header row.
            let line_no = idx + 1 + usize::from(has_header);
            return Err(TriageError::SchemaMismatch(format!(
                "{}:{}: expected {} columns, found {}",
                path.display(),
                line_no,
                COLUMNS.len(),
                fields.len()
            )));
        }

        records.push(IssueRecord::new(fields[0], fields[1], fields[2]));
    }

    info!("Loaded {} issues from {}", records.len(), path.display());

    Ok(IssueDataset::new(records))
}

fn validate_header(path: &Path, header: &str) -> Result<()> {
    let names: Vec<&str> = header.split('\t').collect();
    if names != COLUMNS {
        return Err(TriageError::SchemaMismatch(format!(
            "{}: expected header {:?}, found {:?}",
            path.display(),
            COLUMNS,
            names
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_tsv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_with_header() {
        let file = write_tsv(
            "Title\tDescription\tArea\n\
             App crashes\tPanics on startup\tarea-runtime\n\
             Docs typo\tBroken link in readme\tarea-docs\n",
        );

        let dataset = load_tsv(file.path(), true).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].title, "App crashes");
        assert_eq!(dataset.records()[1].area.as_deref(), Some("area-docs"));
    }

    #[test]
    fn test_load_without_header() {
        let file = write_tsv("App crashes\tPanics on startup\tarea-runtime\n");

        let dataset = load_tsv(file.path(), false).unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let err = load_tsv(Path::new("definitely/not/here.tsv"), true).unwrap_err();
        assert!(matches!(err, TriageError::FileNotFound(_)));
    }

    #[test]
    fn test_wrong_header_names() {
        let file = write_tsv("Title\tBody\tArea\nA\tB\tC\n");

        let err = load_tsv(file.path(), true).unwrap_err();
        assert!(matches!(err, TriageError::SchemaMismatch(_)));
    }

    #[test]
    fn test_missing_column() {
        let file = write_tsv("Title\tDescription\tArea\nApp crashes\tarea-runtime\n");

        let err = load_tsv(file.path(), true).unwrap_err();
        match err {
            TriageError::SchemaMismatch(msg) => assert!(msg.contains("expected 3 columns")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_lines_skipped() {
        let file = write_tsv("Title\tDescription\tArea\n\nA\tB\tarea-docs\n\n");

        let dataset = load_tsv(file.path(), true).unwrap();
        assert_eq!(dataset.len(), 1);
    }
}
