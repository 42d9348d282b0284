use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use lettervideo_domain::{DomainError, KeyValueStore};

/// Key-value pairs kept in a small JSON object on disk.
///
/// Every write replaces the file through a sibling temp file and a rename, so a
/// crash leaves either the old or the new content. An unreadable file is logged and
/// treated as empty.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileKeyValueStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        let values = load(&path)?;
        tracing::debug!(path = %path.display(), keys = values.len(), "opened state file");
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>) -> bool,
    ) -> Result<(), DomainError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| DomainError::storage_error("state file lock poisoned"))?;
        let mut next = values.clone();
        if !change(&mut next) {
            return Ok(());
        }
        self.persist(&next)?;
        *values = next;
        Ok(())
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| storage_error(parent, err))?;
        }
        let json = serde_json::to_vec_pretty(values)
            .map_err(|err| DomainError::storage_error(err.to_string()))?;
        let temp = self.path.with_extension("tmp");
        fs::write(&temp, json).map_err(|err| storage_error(&temp, err))?;
        fs::rename(&temp, &self.path).map_err(|err| storage_error(&self.path, err))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let values = self
            .values
            .lock()
            .map_err(|_| DomainError::storage_error("state file lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.update(|values| {
            values.insert(key.to_string(), value.to_string()).as_deref() != Some(value)
        })
    }

    fn remove(&self, key: &str) -> Result<(), DomainError> {
        self.update(|values| values.remove(key).is_some())
    }
}

fn load(path: &Path) -> Result<BTreeMap<String, String>, DomainError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(err) => return Err(storage_error(path, err)),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(BTreeMap::new());
    }
    match serde_json::from_slice(&bytes) {
        Ok(values) => Ok(values),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "state file is unreadable; starting empty");
            Ok(BTreeMap::new())
        }
    }
}

fn storage_error(path: &Path, err: std::io::Error) -> DomainError {
    DomainError::storage_error(format!("{}: {err}", path.display()))
}
