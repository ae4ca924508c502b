use crate::error::{Result, TriageError};
use crate::model::{Transformer, TriageModel};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

/// Artifact magic bytes
const MAGIC: [u8; 8] = *b"TRIAGEMD";

/// Artifact format version
const VERSION: u16 = 1;

/// Serialize a trained model to a single binary artifact.
///
/// The file is created or truncated and written inside one scoped handle, so
/// it is released on every exit path. Parent directories are created as
/// needed.
pub fn save_model(model: &TriageModel, path: &Path) -> Result<()> {
    let payload = model.to_bytes()?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    {
        let mut file = File::create(path)?;
        file.write_all(&MAGIC)?;
        file.write_all(&VERSION.to_le_bytes())?;
        file.write_all(&payload)?;
    }

    info!("The model is saved to {}", path.display());

    Ok(())
}

/// Deserialize a previously saved model artifact.
///
/// A missing file, a truncated header, unknown magic bytes, an unsupported
/// format version or an undecodable payload all surface as
/// [`TriageError::CorruptArtifact`].
pub fn load_model(path: &Path) -> Result<TriageModel> {
    if !path.exists() {
        return Err(TriageError::CorruptArtifact(format!(
            "{}: no model artifact at this path",
            path.display()
        )));
    }

    let mut file = File::open(path)?;

    let mut magic = [0u8; 8];
    read_header(&mut file, &mut magic, path)?;
    if magic != MAGIC {
        return Err(TriageError::CorruptArtifact(format!(
            "{}: not an issue-triage model artifact",
            path.display()
        )));
    }

    let mut version = [0u8; 2];
    read_header(&mut file, &mut version, path)?;
    let version = u16::from_le_bytes(version);
    if version != VERSION {
        return Err(TriageError::CorruptArtifact(format!(
            "{}: unsupported artifact version {} (expected {})",
            path.display(),
            version,
            VERSION
        )));
    }

    let mut payload = Vec::new();
    file.read_to_end(&mut payload)?;

    let model = TriageModel::from_bytes(&payload)?;

    info!("Loaded model from {}", path.display());

    Ok(model)
}

fn read_header(file: &mut File, buf: &mut [u8], path: &Path) -> Result<()> {
    file.read_exact(buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            TriageError::CorruptArtifact(format!("{}: truncated artifact header", path.display()))
        } else {
            TriageError::Io(e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FeatureConfig, TrainerConfig};
    use crate::data::record::{IssueDataset, IssueRecord};
    use crate::model::Trainer;
    use crate::pipeline::feature_pipeline;
    use std::io::Write;
    use tempfile::TempDir;

    fn trained_model() -> TriageModel {
        let records = vec![
            IssueRecord::new("Database down", "Connection to the database failed", "area-data"),
            IssueRecord::new("Database slow", "Database queries take seconds", "area-data"),
            IssueRecord::new("Docs typo", "The documentation spells the name wrong", "area-docs"),
            IssueRecord::new("Docs link broken", "The documentation links nowhere", "area-docs"),
        ];
        Trainer::new(FeatureConfig::default(), TrainerConfig::default(), 0)
            .fit(feature_pipeline(), &IssueDataset::new(records))
            .unwrap()
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.bin");
        let model = trained_model();

        save_model(&model, &path).unwrap();
        let reloaded = load_model(&path).unwrap();

        assert_eq!(model.metadata(), reloaded.metadata());

        // Round-trip fidelity: the reloaded model transforms identically.
        let dataset = IssueDataset::new(vec![IssueRecord::unlabeled(
            "Database acting up",
            "The database dropped the connection",
        )]);
        let before = model.transform(&dataset).unwrap();
        let after = reloaded.transform(&dataset).unwrap();
        assert_eq!(before[0].area, after[0].area);
        assert_eq!(before[0].scores, after[0].scores);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/models/model.bin");

        save_model(&trained_model(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_load_missing_path() {
        let err = load_model(Path::new("never/written/model.bin")).unwrap_err();
        assert!(matches!(err, TriageError::CorruptArtifact(_)));
    }

    #[test]
    fn test_load_truncated_artifact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.bin");
        std::fs::write(&path, b"TRI").unwrap();

        let err = load_model(&path).unwrap_err();
        assert!(matches!(err, TriageError::CorruptArtifact(_)));
    }

    #[test]
    fn test_load_wrong_magic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.bin");
        std::fs::write(&path, b"NOTAMODELXXXXXXXXXXX").unwrap();

        let err = load_model(&path).unwrap_err();
        match err {
            TriageError::CorruptArtifact(msg) => assert!(msg.contains("not an issue-triage")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_unsupported_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.bin");
        let mut file = File::create(&path).unwrap();
        file.write_all(&MAGIC).unwrap();
        file.write_all(&99u16.to_le_bytes()).unwrap();
        drop(file);

        let err = load_model(&path).unwrap_err();
        match err {
            TriageError::CorruptArtifact(msg) => assert!(msg.contains("unsupported artifact version")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_garbage_payload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.bin");
        let mut file = File::create(&path).unwrap();
        file.write_all(&MAGIC).unwrap();
        file.write_all(&VERSION.to_le_bytes()).unwrap();
        file.write_all(&[0xde, 0xad, 0xbe, 0xef]).unwrap();
        drop(file);

        let err = load_model(&path).unwrap_err();
        assert!(matches!(err, TriageError::CorruptArtifact(_)));
    }
}
