use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::db::StoreError;
use crate::models::{Requirement, User};

/// How long to wait for another process to release the lock file
const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Delay between lock attempts
const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// On-disk layout of the YAML record file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFile {
    #[serde(default = "first_id")]
    pub next_user_id: i64,
    #[serde(default = "first_id")]
    pub next_requirement_id: i64,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

fn first_id() -> i64 {
    1
}

impl RecordFile {
    pub fn new() -> Self {
        Self {
            next_user_id: first_id(),
            next_requirement_id: first_id(),
            users: Vec::new(),
            requirements: Vec::new(),
        }
    }

    /// Raises the id counters past every stored id
    ///
    /// Hand-edited files may lack the counters or carry stale ones.
    fn reconcile_ids(&mut self) {
        let max_user = self.users.iter().map(|u| u.id).max().unwrap_or(0);
        let max_requirement = self.requirements.iter().map(|r| r.id).max().unwrap_or(0);
        self.next_user_id = self.next_user_id.max(max_user + 1);
        self.next_requirement_id = self.next_requirement_id.max(max_requirement + 1);
    }
}

impl Default for RecordFile {
    fn default() -> Self {
        Self::new()
    }
}

/// Handles saving and loading the record file from disk with file locking
/// for rudimentary multi-user support
pub struct Storage {
    file_path: PathBuf,
    lock_file_path: PathBuf,
    lock_timeout: Duration,
}

impl Storage {
    /// Creates a new Storage instance
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        let mut lock_name = file_path.clone().into_os_string();
        lock_name.push(".lock");
        Self {
            file_path,
            lock_file_path: PathBuf::from(lock_name),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Overrides how long lock acquisition waits before giving up
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Returns the path to the storage file
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Returns the path to the lock file guarding the storage file
    pub fn lock_path(&self) -> &Path {
        &self.lock_file_path
    }

    /// Acquire a lock on the lock file, shared for readers and exclusive for writers
    /// Returns the lock file handle which must be held during the operation
    fn acquire_lock(&self, exclusive: bool) -> Result<File, StoreError> {
        if let Some(parent) = self.lock_file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&self.lock_file_path)?;

        let start = Instant::now();
        loop {
            let attempt = if exclusive {
                FileExt::try_lock_exclusive(&lock_file)
            } else {
                FileExt::try_lock_shared(&lock_file)
            };

            match attempt {
                Ok(()) => return Ok(lock_file),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    if start.elapsed() > self.lock_timeout {
                        return Err(StoreError::Locked(self.file_path.clone()));
                    }
                    std::thread::sleep(LOCK_POLL_INTERVAL);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Reads the file without locking; a missing file is an empty record set
    fn read_unlocked(&self) -> Result<RecordFile, StoreError> {
        if !self.file_path.exists() {
            return Ok(RecordFile::new());
        }

        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let mut records: RecordFile = serde_yaml::from_reader(reader)?;
        records.reconcile_ids();
        Ok(records)
    }

    fn write_unlocked(&self, records: &RecordFile) -> Result<(), StoreError> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml = serde_yaml::to_string(records)?;
        fs::write(&self.file_path, yaml)?;
        Ok(())
    }

    /// Loads the record file under a shared lock
    pub fn load(&self) -> Result<RecordFile, StoreError> {
        let _lock = self.acquire_lock(false)?;
        self.read_unlocked()
    }

    /// Saves the record file under an exclusive lock
    pub fn save(&self, records: &RecordFile) -> Result<(), StoreError> {
        let mut lock_file = self.acquire_lock(true)?;

        // Lock holder info, for whoever finds a stale lock file
        let _ = writeln!(lock_file, "Locked by PID {}", std::process::id());

        self.write_unlocked(records)
    }

    /// Reloads the file, applies `update_fn` and saves, all under one exclusive lock
    ///
    /// Nothing is written when `update_fn` fails.
    pub fn update_atomically<T, F>(&self, update_fn: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut RecordFile) -> Result<T, StoreError>,
    {
        let mut lock_file = self.acquire_lock(true)?;
        let _ = writeln!(lock_file, "Locked by PID {}", std::process::id());

        let mut records = self.read_unlocked()?;
        let value = update_fn(&mut records)?;
        self.write_unlocked(&records)?;

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("records.yaml"));

        let records = storage.load().unwrap();
        assert_eq!(records, RecordFile::new());
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("nested").join("records.yaml"));

        let mut records = RecordFile::new();
        records.users.push(User {
            id: 1,
            username: "Alice".into(),
            role_id: 1,
        });
        records.next_user_id = 2;
        storage.save(&records).unwrap();

        assert_eq!(storage.load().unwrap(), records);
        assert!(storage.lock_path().ends_with("records.yaml.lock"));
    }

    #[test]
    fn test_missing_counters_start_after_stored_ids() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("records.yaml"));
        fs::write(
            storage.path(),
            "users:\n  - id: 4\n    username: Alice\n    role_id: 1\n\
             next_requirement_id: 1\n\
             requirements:\n  - id: 9\n    title: Login\n",
        )
        .unwrap();

        let records = storage.load().unwrap();
        assert_eq!(records.next_user_id, 5);
        assert_eq!(records.next_requirement_id, 10);
    }

    #[test]
    fn test_failed_update_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("records.yaml"));

        let result: Result<(), StoreError> = storage.update_atomically(|records| {
            records.next_user_id = 42;
            Err(StoreError::Constraint("nope".into()))
        });

        assert!(result.is_err());
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_lock_timeout() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("records.yaml"))
            .with_lock_timeout(Duration::from_millis(200));

        let holder = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(storage.lock_path())
            .unwrap();
        FileExt::lock_exclusive(&holder).unwrap();

        let err = storage.save(&RecordFile::new()).unwrap_err();
        assert!(matches!(err, StoreError::Locked(_)));

        FileExt::unlock(&holder).unwrap();
        storage.save(&RecordFile::new()).unwrap();
    }
}
