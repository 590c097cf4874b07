//! Flat-file entry store.
//!
//! Each collection lives in one JSON array under the data directory, created
//! on first write. Every mutation rewrites the whole file: the new array is
//! written to a temporary sibling and renamed over the original, so readers
//! observe either the old or the new array and never a partial write.
//!
//! Mutations within one process are serialised by an async mutex. The guard
//! moves into the blocking job, so a caller that stops waiting does not let
//! the next writer start before the job finishes. Each write stages into its
//! own uniquely named sibling. Separate processes sharing a data directory
//! are not coordinated and the last writer wins.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use mockable::Clock;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{EntryRepository, EntryRepositoryError};
use crate::domain::{Entry, EntryCollection, EntryDraft, EntryId};

/// JSON-file-backed implementation of [`EntryRepository`].
pub struct JsonFileEntryRepository {
    data_dir: PathBuf,
    file_name: &'static str,
    clock: Arc<dyn Clock>,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileEntryRepository {
    /// Store `collection` under `data_dir`.
    ///
    /// Nothing touches the filesystem until the first operation.
    pub fn new(
        data_dir: impl Into<PathBuf>,
        collection: EntryCollection,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            file_name: collection.file_name(),
            clock,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Full path of the backing file.
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        self.data_dir.join(self.file_name)
    }

    async fn mutate<T, F>(&self, change: F) -> Result<T, EntryRepositoryError>
    where
        F: FnOnce(&mut Vec<Entry>) -> (T, bool) + Send + 'static,
        T: Send + 'static,
    {
        let guard = Arc::clone(&self.write_lock).lock_owned().await;
        let data_dir = self.data_dir.clone();
        let file_name = self.file_name;
        run_blocking(move || {
            let _guard = guard;
            let dir = open_or_create_dir(&data_dir)
                .map_err(|err| EntryRepositoryError::connection(describe(&data_dir, &err)))?;
            let mut entries = read_entries(&dir, file_name)?;
            let (outcome, changed) = change(&mut entries);
            if changed {
                write_entries(&dir, file_name, &entries)?;
            }
            Ok(outcome)
        })
        .await
    }
}

#[async_trait]
impl EntryRepository for JsonFileEntryRepository {
    async fn create(&self, draft: EntryDraft) -> Result<Entry, EntryRepositoryError> {
        let entry = draft.stamp(self.clock.as_ref());
        let stored = entry.clone();
        self.mutate(move |entries| {
            entries.push(stored);
            ((), true)
        })
        .await?;
        debug!(path = %self.file_path().display(), entry_id = %entry.id, "entry appended");
        Ok(entry)
    }

    async fn list(&self) -> Result<Vec<Entry>, EntryRepositoryError> {
        let data_dir = self.data_dir.clone();
        let file_name = self.file_name;
        run_blocking(move || match Dir::open_ambient_dir(&data_dir, ambient_authority()) {
            Ok(dir) => read_entries(&dir, file_name),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(EntryRepositoryError::connection(describe(&data_dir, &err))),
        })
        .await
    }

    async fn delete(&self, id: &EntryId) -> Result<bool, EntryRepositoryError> {
        let id = *id;
        self.mutate(move |entries| {
            let position = entries.iter().position(|entry| entry.id == id);
            match position {
                Some(index) => {
                    entries.remove(index);
                    (true, true)
                }
                None => (false, false),
            }
        })
        .await
    }
}

async fn run_blocking<T, F>(work: F) -> Result<T, EntryRepositoryError>
where
    F: FnOnce() -> Result<T, EntryRepositoryError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| EntryRepositoryError::write(format!("file store task failed: {err}")))?
}

fn open_or_create_dir(path: &Path) -> io::Result<Dir> {
    Dir::create_ambient_dir_all(path, ambient_authority())?;
    Dir::open_ambient_dir(path, ambient_authority())
}

fn read_entries(dir: &Dir, file_name: &str) -> Result<Vec<Entry>, EntryRepositoryError> {
    let text = match dir.read_to_string(file_name) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            return Err(EntryRepositoryError::query(format!(
                "read {file_name}: {err}"
            )));
        }
    };
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&text)
        .map_err(|err| EntryRepositoryError::query(format!("decode {file_name}: {err}")))
}

fn write_entries(dir: &Dir, file_name: &str, entries: &[Entry]) -> Result<(), EntryRepositoryError> {
    let bytes = serde_json::to_vec_pretty(entries)
        .map_err(|err| EntryRepositoryError::write(format!("encode {file_name}: {err}")))?;
    let staging = format!(".{file_name}.{}.tmp", Uuid::new_v4().simple());
    dir.write(&staging, bytes)
        .and_then(|()| dir.rename(&staging, dir, file_name))
        .map_err(|err| {
            let _ = dir.remove_file(&staging);
            EntryRepositoryError::write(format!("write {file_name}: {err}"))
        })
}

fn describe(path: &Path, err: &io::Error) -> String {
    format!("data directory {}: {err}", path.display())
}
