use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::checkpoint::metadata::ModelMetadata;
use crate::error::CheckpointError;

const FILE_PREFIX: &str = "model_v";
const WEIGHTS_EXT: &str = "mpk";
const METADATA_SUFFIX: &str = ".meta.json";

/// Versioned model directory.
///
/// Each version `v` owns two files: `model_v{v:03}.mpk` with the weights
/// and `model_v{v:03}.meta.json` with its [`ModelMetadata`].
#[derive(Debug, Clone)]
pub struct ModelVersionStore {
    dir: PathBuf,
}

impl ModelVersionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ModelVersionStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn artifact_name(version: u32) -> String {
        format!("{FILE_PREFIX}{version:03}.{WEIGHTS_EXT}")
    }

    pub fn artifact_path(&self, version: u32) -> PathBuf {
        self.dir.join(Self::artifact_name(version))
    }

    pub fn metadata_path(&self, version: u32) -> PathBuf {
        self.dir.join(format!("{FILE_PREFIX}{version:03}{METADATA_SUFFIX}"))
    }

    /// One past the highest version found in the directory, or 1.
    pub fn next_version(&self) -> Result<u32, CheckpointError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(1),
            Err(e) => return Err(e.into()),
        };

        let mut max_version = 0;
        for entry in entries {
            let name = entry?.file_name();
            if let Some(version) = parse_version(&name.to_string_lossy()) {
                max_version = max_version.max(version);
            }
        }
        Ok(max_version + 1)
    }

    /// Write metadata for `version`, replacing any existing file atomically.
    pub fn save_metadata(
        &self,
        version: u32,
        best_score: u32,
        games_played: usize,
        mean_score: f64,
    ) -> Result<ModelMetadata, CheckpointError> {
        let metadata = ModelMetadata::new(
            version,
            best_score,
            games_played,
            mean_score,
            Self::artifact_name(version),
        );
        self.write_metadata(&metadata)?;
        Ok(metadata)
    }

    fn write_metadata(&self, metadata: &ModelMetadata) -> Result<(), CheckpointError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.metadata_path(metadata.version);
        let tmp_path = path.with_extension("json.tmp");

        fs::write(&tmp_path, serde_json::to_string_pretty(metadata)?)?;
        fs::rename(&tmp_path, &path)?;
        debug!(version = metadata.version, path = %path.display(), "metadata written");
        Ok(())
    }

    pub fn load_metadata(&self, version: u32) -> Result<ModelMetadata, CheckpointError> {
        read_metadata(&self.metadata_path(version))
    }

    /// All readable metadata, sorted by version. Corrupt files are skipped.
    pub fn list(&self) -> Result<Vec<ModelMetadata>, CheckpointError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut results = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_metadata = path
                .file_name()
                .map(|n| n.to_string_lossy())
                .is_some_and(|n| n.starts_with(FILE_PREFIX) && n.ends_with(METADATA_SUFFIX));
            if !is_metadata {
                continue;
            }
            match read_metadata(&path) {
                Ok(metadata) => results.push(metadata),
                Err(e) => warn!("skipping unreadable model metadata: {e}"),
            }
        }
        results.sort_by_key(|m| m.version);
        Ok(results)
    }

    /// Metadata whose weights file is present on disk.
    pub fn loadable(&self) -> Result<Vec<ModelMetadata>, CheckpointError> {
        let mut results = self.list()?;
        results.retain(|m| {
            let artifact = self.dir.join(&m.model_file);
            let present = artifact.is_file();
            if !present {
                warn!(
                    version = m.version,
                    path = %artifact.display(),
                    "skipping model version without weights file"
                );
            }
            present
        });
        Ok(results)
    }

    /// Loadable version with the highest best score. Ties go to the newest version.
    pub fn best(&self) -> Result<Option<ModelMetadata>, CheckpointError> {
        Ok(self
            .loadable()?
            .into_iter()
            .max_by_key(|m| (m.best_score, m.version)))
    }

    /// Highest loadable version.
    pub fn latest(&self) -> Result<Option<ModelMetadata>, CheckpointError> {
        Ok(self.loadable()?.into_iter().max_by_key(|m| m.version))
    }
}

fn read_metadata(path: &Path) -> Result<ModelMetadata, CheckpointError> {
    let json = fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|e| CheckpointError::CorruptMetadata {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Version number in a `model_vNNN.<ext>` file name.
fn parse_version(file_name: &str) -> Option<u32> {
    let rest = file_name.strip_prefix(FILE_PREFIX)?;
    let (digits, ext) = rest.split_once('.')?;
    if digits.is_empty() || ext.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    fn save_with_weights(store: &ModelVersionStore, version: u32, score: u32, games: usize) {
        store.save_metadata(version, score, games, 1.0).unwrap();
        touch(store.dir(), &ModelVersionStore::artifact_name(version));
    }

    #[test]
    fn test_next_version_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelVersionStore::new(dir.path());
        assert_eq!(store.next_version().unwrap(), 1);
    }

    #[test]
    fn test_next_version_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelVersionStore::new(dir.path().join("not_there"));
        assert_eq!(store.next_version().unwrap(), 1);
    }

    #[test]
    fn test_next_version_after_gap() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "model_v001.mpk");
        touch(dir.path(), "model_v003.mpk");
        let store = ModelVersionStore::new(dir.path());
        assert_eq!(store.next_version().unwrap(), 4);
    }

    #[test]
    fn test_next_version_skips_malformed_names() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "model_v002.meta.json");
        touch(dir.path(), "model_vabc.mpk");
        touch(dir.path(), "model_v.mpk");
        touch(dir.path(), "model_v999");
        touch(dir.path(), "notes.txt");
        let store = ModelVersionStore::new(dir.path());
        assert_eq!(store.next_version().unwrap(), 3);
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("model_v007.mpk"), Some(7));
        assert_eq!(parse_version("model_v1234.meta.json"), Some(1234));
        assert_eq!(parse_version("model_v12a.mpk"), None);
        assert_eq!(parse_version("other_v001.mpk"), None);
    }

    #[test]
    fn test_save_and_load_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelVersionStore::new(dir.path().join("models"));

        let saved = store.save_metadata(2, 15, 120, 4.5).unwrap();
        assert_eq!(saved.model_file, "model_v002.mpk");
        assert!(store.metadata_path(2).exists());

        let loaded = store.load_metadata(2).unwrap();
        assert_eq!(loaded, saved);

        // Only the final file remains.
        let names: Vec<String> = fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["model_v002.meta.json".to_string()]);
    }

    #[test]
    fn test_save_metadata_overwrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelVersionStore::new(dir.path());
        store.save_metadata(1, 10, 50, 3.0).unwrap();
        store.save_metadata(1, 10, 60, 3.5).unwrap();

        let list = store.list().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].games_played, 60);
        assert_eq!(list[0].mean_score, 3.5);
    }

    #[test]
    fn test_list_skips_corrupt_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelVersionStore::new(dir.path());
        store.save_metadata(1, 4, 10, 1.0).unwrap();
        fs::write(store.metadata_path(2), "{ not json").unwrap();
        fs::write(store.metadata_path(3), r#"{"version": 3}"#).unwrap();

        let list = store.list().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].version, 1);

        let err = store.load_metadata(2).unwrap_err();
        assert!(matches!(err, CheckpointError::CorruptMetadata { .. }));
    }

    #[test]
    fn test_best_and_latest() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelVersionStore::new(dir.path());
        assert!(store.best().unwrap().is_none());
        assert!(store.latest().unwrap().is_none());

        save_with_weights(&store, 1, 12, 100);
        save_with_weights(&store, 2, 30, 200);
        save_with_weights(&store, 3, 18, 300);

        assert_eq!(store.best().unwrap().unwrap().version, 2);
        assert_eq!(store.latest().unwrap().unwrap().version, 3);
    }

    #[test]
    fn test_best_tie_goes_to_newest() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelVersionStore::new(dir.path());
        save_with_weights(&store, 1, 20, 100);
        save_with_weights(&store, 4, 20, 400);
        save_with_weights(&store, 2, 9, 150);

        let best = store.best().unwrap().unwrap();
        assert_eq!(best.version, 4);
        assert_eq!(best.best_score, 20);
    }

    #[test]
    fn test_versions_without_weights_are_not_selected() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelVersionStore::new(dir.path());
        save_with_weights(&store, 1, 5, 50);
        store.save_metadata(2, 9, 80, 3.0).unwrap();

        assert_eq!(store.list().unwrap().len(), 2);
        let loadable = store.loadable().unwrap();
        assert_eq!(loadable.len(), 1);
        assert_eq!(loadable[0].version, 1);
        assert_eq!(store.best().unwrap().unwrap().version, 1);
        assert_eq!(store.latest().unwrap().unwrap().version, 1);
    }

    #[test]
    fn test_best_none_when_no_weights() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelVersionStore::new(dir.path());
        store.save_metadata(1, 5, 50, 1.0).unwrap();
        assert!(store.best().unwrap().is_none());
        assert!(store.latest().unwrap().is_none());
    }
}
