//! MessagePack implementation of the session repository.
//!
//! This adapter implements the SessionRepository port using rmp_serde for
//! compact binary serialization.

use std::{
    fs::File,
    hash::Hash,
    io::{BufReader, BufWriter},
    path::Path,
};

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    Result, error::Error, ports::SessionRepository, q_learning::SavedSession,
};

/// MessagePack-based session repository.
///
/// Stores training sessions in the MessagePack binary format, which preserves
/// f64 Q-values exactly across a save/load round trip.
///
/// # Examples
///
/// ```no_run
/// use flappy::adapters::MsgPackRepository;
/// use flappy::ports::SessionRepository;
/// use flappy::q_learning::{Hyperparameters, QTable, SavedSession};
/// use std::path::Path;
///
/// let repo = MsgPackRepository::new();
/// let table: QTable<(i32, i32, i32), u8> = QTable::initialize(&[(0, 0, 0)], &[0, 1]);
/// let session = SavedSession::new(0, Hyperparameters::default(), table);
///
/// repo.save(&session, Path::new("session.msgpack"))?;
/// let loaded: SavedSession<(i32, i32, i32), u8> = repo.load(Path::new("session.msgpack"))?;
/// # Ok::<(), flappy::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl<S, A> SessionRepository<S, A> for MsgPackRepository
where
    S: Serialize + DeserializeOwned + Eq + Hash,
    A: Serialize + DeserializeOwned + Eq + Hash,
{
    fn save(&self, session: &SavedSession<S, A>, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, session).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize session to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedSession<S, A>> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;
        let reader = BufReader::new(file);

        let session =
            rmp_serde::decode::from_read(reader).map_err(|e| Error::SerializationContext {
                operation: "deserialize session from MessagePack".to_string(),
                message: e.to_string(),
            })?;

        Ok(session)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::q_learning::{Hyperparameters, QTable};

    fn sample_session() -> SavedSession<(i32, i32), u8> {
        let mut table = QTable::initialize(&[(0, 0), (1, -1)], &[0u8, 1u8]);
        table.set(0, (1, -1), 42.5);
        SavedSession::new(77, Hyperparameters::default(), table)
    }

    #[test]
    fn test_msgpack_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("test_session.msgpack");

        let repo = MsgPackRepository::new();
        let session = sample_session();

        repo.save(&session, &file_path).expect("Failed to save");
        let loaded = repo.load(&file_path).expect("Failed to load");

        assert_eq!(loaded, session);
    }

    #[test]
    fn test_exists_reflects_filesystem() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("test_session.msgpack");

        let repo = MsgPackRepository::new();
        assert!(!SessionRepository::<(i32, i32), u8>::exists(&repo, &file_path));

        repo.save(&sample_session(), &file_path)
            .expect("Failed to save");
        assert!(SessionRepository::<(i32, i32), u8>::exists(&repo, &file_path));
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let repo = MsgPackRepository::new();
        let result: Result<SavedSession<(i32, i32), u8>> =
            repo.load(Path::new("/tmp/nonexistent_12345.msgpack"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_corrupted_file_returns_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("garbage.msgpack");
        std::fs::write(&file_path, b"not a messagepack session").unwrap();

        let repo = MsgPackRepository::new();
        let result: Result<SavedSession<(i32, i32), u8>> = repo.load(&file_path);
        assert!(matches!(
            result,
            Err(Error::SerializationContext { .. })
        ));
    }

    #[test]
    fn test_save_to_invalid_path_returns_error() {
        let repo = MsgPackRepository::new();
        let result = repo.save(
            &sample_session(),
            Path::new("/invalid_dir_12345/file.msgpack"),
        );
        assert!(result.is_err());
    }
}
