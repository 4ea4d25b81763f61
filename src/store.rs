use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::codec::{decode_slice, encode, to_json_bytes};
use crate::error::AlignmentError;
use crate::location::{record_id, record_path};
use crate::types::{AlignmentView, LoadedAlignment};

/// Raw record bytes keyed by alignment id.
pub trait RecordStorage: Send + Sync {
    fn read_bytes(&self, id: &str) -> Result<Vec<u8>, AlignmentError>;
    fn write_bytes(&self, id: &str, bytes: &[u8]) -> Result<(), AlignmentError>;
    /// Ids of every stored record, sorted.
    fn ids(&self) -> Result<Vec<String>, AlignmentError>;
}

/// Records as `<root>/<id>.json` files.
#[derive(Debug, Clone)]
pub struct FsRecordStorage {
    root: PathBuf,
}

impl FsRecordStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl RecordStorage for FsRecordStorage {
    fn read_bytes(&self, id: &str) -> Result<Vec<u8>, AlignmentError> {
        let path = record_path(&self.root, id)?;
        tracing::debug!(id, path = %path.display(), "reading alignment record");
        fs::read(&path).map_err(|e| AlignmentError::io("read alignment record", e))
    }

    fn write_bytes(&self, id: &str, bytes: &[u8]) -> Result<(), AlignmentError> {
        let path = record_path(&self.root, id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AlignmentError::io("create alignment record directory", e))?;
        }

        // Readers see either the previous record or the complete new one.
        let mut tmp_name = path.clone().into_os_string();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);
        if let Err(err) = write_then_rename(&tmp_path, &path, bytes) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err);
        }

        tracing::debug!(id, path = %path.display(), bytes = bytes.len(), "wrote alignment record");
        Ok(())
    }

    fn ids(&self) -> Result<Vec<String>, AlignmentError> {
        let mut ids = Vec::new();
        if self.root.is_dir() {
            collect_ids(&self.root, &self.root, &mut ids)?;
        }
        ids.sort();
        tracing::debug!(root = %self.root.display(), count = ids.len(), "listed alignment records");
        Ok(ids)
    }
}

fn write_then_rename(tmp_path: &Path, path: &Path, bytes: &[u8]) -> Result<(), AlignmentError> {
    let mut file =
        File::create(tmp_path).map_err(|e| AlignmentError::io("create alignment record", e))?;
    file.write_all(bytes)
        .and_then(|()| file.sync_all())
        .map_err(|e| AlignmentError::io("write alignment record", e))?;
    drop(file);
    fs::rename(tmp_path, path).map_err(|e| AlignmentError::io("finalize alignment record", e))
}

fn collect_ids(root: &Path, dir: &Path, out: &mut Vec<String>) -> Result<(), AlignmentError> {
    let entries = fs::read_dir(dir).map_err(|e| AlignmentError::io("list alignment records", e))?;
    for entry in entries {
        let entry = entry.map_err(|e| AlignmentError::io("list alignment records", e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| AlignmentError::io("list alignment records", e))?;
        let path = entry.path();
        if file_type.is_dir() {
            collect_ids(root, &path, out)?;
        } else if let Some(id) = record_id(root, &path) {
            out.push(id);
        }
    }
    Ok(())
}

/// Encode/decode on top of a [`RecordStorage`].
pub struct AlignmentStore {
    storage: Box<dyn RecordStorage>,
}

impl AlignmentStore {
    pub fn new(storage: Box<dyn RecordStorage>) -> Self {
        Self { storage }
    }

    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(FsRecordStorage::new(root)))
    }

    /// Encode and persist under the alignment's own id.
    ///
    /// Nothing is written if encoding fails.
    pub fn write<A>(&self, alignment: &A) -> Result<(), AlignmentError>
    where
        A: AlignmentView + ?Sized,
    {
        let record = encode(alignment)?;
        let bytes = to_json_bytes(&record)?;
        self.storage.write_bytes(&record.id, &bytes)
    }

    pub fn read(&self, id: &str) -> Result<LoadedAlignment, AlignmentError> {
        let bytes = self.storage.read_bytes(id)?;
        decode_slice(&bytes, id)
    }

    pub fn ids(&self) -> Result<Vec<String>, AlignmentError> {
        self.storage.ids()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use super::*;
    use crate::types::{AlignmentMeta, FreshAlignment, RawAlignmentArrays, Segment, SegmentTiers};

    #[derive(Default)]
    struct MemoryStorage {
        records: Mutex<BTreeMap<String, Vec<u8>>>,
    }

    impl RecordStorage for MemoryStorage {
        fn read_bytes(&self, id: &str) -> Result<Vec<u8>, AlignmentError> {
            self.records
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .ok_or_else(|| {
                    AlignmentError::io(
                        "read alignment record",
                        std::io::Error::new(std::io::ErrorKind::NotFound, id.to_string()),
                    )
                })
        }

        fn write_bytes(&self, id: &str, bytes: &[u8]) -> Result<(), AlignmentError> {
            self.records
                .lock()
                .unwrap()
                .insert(id.to_string(), bytes.to_vec());
            Ok(())
        }

        fn ids(&self) -> Result<Vec<String>, AlignmentError> {
            Ok(self.records.lock().unwrap().keys().cloned().collect())
        }
    }

    fn fresh(id: &str) -> FreshAlignment {
        FreshAlignment {
            meta: AlignmentMeta {
                id: id.to_string(),
                n_model_frames: 50,
                n_audio_samples: 16_000,
                sampling_rate: 16_000,
                partition_score: -3.5,
                recognised: "hi there".to_string(),
            },
            tiers: SegmentTiers {
                words: vec![
                    Segment::new("hi", 3.0, 10.0, 0.95),
                    Segment::new("there", 12.0, 30.0, 0.7),
                ],
                ..SegmentTiers::default()
            },
            arrays: RawAlignmentArrays {
                log_probs: vec![vec![-0.1; 32]; 50],
                ..RawAlignmentArrays::default()
            },
        }
    }

    #[test]
    fn write_creates_nested_record_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = AlignmentStore::open(dir.path());
        store.write(&fresh("audio/one.mp3")).unwrap();

        let path = dir.path().join("audio").join("one.mp3.json");
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"id\": \"audio/one.mp3\""));
        assert!(!dir.path().join("audio").join("one.mp3.json.tmp").exists());
    }

    #[test]
    fn failed_rename_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory where the record file should go.
        let blocker = dir.path().join("audio").join("one.mp3.json");
        fs::create_dir_all(&blocker).unwrap();
        fs::write(blocker.join("keep"), "x").unwrap();

        let store = AlignmentStore::open(dir.path());
        assert!(matches!(
            store.write(&fresh("audio/one.mp3")),
            Err(AlignmentError::Io { .. })
        ));
        assert!(!dir.path().join("audio").join("one.mp3.json.tmp").exists());
        assert!(blocker.join("keep").exists());
    }

    #[test]
    fn read_returns_frame_units_without_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let store = AlignmentStore::open(dir.path());
        let original = fresh("audio/one.mp3");
        store.write(&original).unwrap();

        let loaded = store.read("audio/one.mp3").unwrap();
        assert_eq!(loaded.meta, original.meta);
        assert_eq!(loaded.tiers.words.len(), 2);
        assert!((loaded.tiers.words[1].start - 12.0).abs() < 1e-9);
        assert!((loaded.tiers.words[1].end - 30.0).abs() < 1e-9);
    }

    #[test]
    fn missing_record_surfaces_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = AlignmentStore::open(dir.path());
        match store.read("audio/missing.mp3") {
            Err(AlignmentError::Io { source, .. }) => {
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound)
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn degenerate_alignment_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = AlignmentStore::open(dir.path());
        let mut alignment = fresh("audio/one.mp3");
        alignment.meta.sampling_rate = 0;
        assert!(matches!(
            store.write(&alignment),
            Err(AlignmentError::DegenerateAlignment { .. })
        ));
        assert!(store.ids().unwrap().is_empty());
        assert!(!dir.path().join("audio").exists());
    }

    #[test]
    fn ids_lists_records_recursively_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let store = AlignmentStore::open(dir.path());
        for id in ["b.wav", "audio/one.mp3", "audio/deep/two.mp3"] {
            store.write(&fresh(id)).unwrap();
        }
        fs::write(dir.path().join("audio").join("notes.txt"), "ignored").unwrap();

        assert_eq!(
            store.ids().unwrap(),
            ["audio/deep/two.mp3", "audio/one.mp3", "b.wav"]
        );
    }

    #[test]
    fn ids_of_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = AlignmentStore::open(dir.path().join("nope"));
        assert!(store.ids().unwrap().is_empty());
    }

    #[test]
    fn invalid_id_is_rejected_before_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = AlignmentStore::open(dir.path());
        assert!(matches!(
            store.write(&fresh("../escape.wav")),
            Err(AlignmentError::InvalidInput { .. })
        ));
    }

    #[test]
    fn store_works_over_any_storage() {
        let store = AlignmentStore::new(Box::new(MemoryStorage::default()));
        store.write(&fresh("a.wav")).unwrap();
        store.write(&fresh("b.wav").into_loaded()).unwrap();
        assert_eq!(store.ids().unwrap(), ["a.wav", "b.wav"]);
        assert_eq!(store.read("b.wav").unwrap().meta.recognised, "hi there");
        assert!(matches!(
            store.read("c.wav"),
            Err(AlignmentError::Io { .. })
        ));
    }
}
