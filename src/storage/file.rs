//! Directory-backed key/value storage.
//!
//! Each key is stored in its own file `<key>.kv` inside the storage
//! directory. A `LOCK` file guards the directory against a second process.

use super::KeyValueStorage;
use crate::error::{Result, StoreError};
use fs2::FileExt;
use parking_lot::Mutex;
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

/// Magic bytes for value files.
const VALUE_MAGIC: &[u8; 4] = b"KVS\0";

/// Current value file format version.
const VALUE_VERSION: u8 = 1;

/// Extension of value files.
const VALUE_EXT: &str = "kv";

/// Bytes around the value: magic, version, length prefix and checksum.
const VALUE_OVERHEAD: u64 = 4 + 1 + 8 + 4;

/// Persistent storage that survives process restarts.
pub struct FileStorage {
    /// Directory holding value files.
    path: PathBuf,

    /// Lock file for exclusive access.
    _lock_file: File,

    /// Serializes writes within this process.
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Open (creating if needed) a storage directory.
    ///
    /// Fails with `StoreError::Locked` if another handle holds the directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        fs::create_dir_all(&path)?;

        let lock_file = Self::acquire_lock(&path)?;

        Ok(Self {
            path,
            _lock_file: lock_file,
            write_lock: Mutex::new(()),
        })
    }

    /// Directory this storage writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List stored keys.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();

        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(VALUE_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }

    fn acquire_lock(path: &Path) -> Result<File> {
        let lock_file = File::create(path.join("LOCK"))?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| StoreError::Locked)?;

        Ok(lock_file)
    }

    fn value_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.path.join(format!("{}.{}", key, VALUE_EXT)))
    }

    fn read_value(path: &Path) -> Result<String> {
        let mut file = File::open(path)?;
        let file_len = file.metadata()?.len();

        // Read and verify magic
        let mut magic = [0u8; 4];
        file.read_exact(&mut magic)?;
        if &magic != VALUE_MAGIC {
            return Err(StoreError::InvalidFormat("Invalid value file magic".into()));
        }

        let mut version = [0u8; 1];
        file.read_exact(&mut version)?;
        if version[0] != VALUE_VERSION {
            return Err(StoreError::InvalidFormat(format!(
                "Unsupported value file version: {}",
                version[0]
            )));
        }

        let mut len_bytes = [0u8; 8];
        file.read_exact(&mut len_bytes)?;
        let len = u64::from_le_bytes(len_bytes);
        if len > file_len.saturating_sub(VALUE_OVERHEAD) {
            return Err(StoreError::Corruption(format!(
                "Value length {} exceeds file size {}",
                len, file_len
            )));
        }
        let len = usize::try_from(len)
            .map_err(|_| StoreError::Corruption(format!("Value length {} too large", len)))?;

        let mut content = vec![0u8; len];
        file.read_exact(&mut content)?;

        // Read and verify checksum
        let mut checksum_bytes = [0u8; 4];
        file.read_exact(&mut checksum_bytes)?;
        let stored_checksum = u32::from_le_bytes(checksum_bytes);
        let computed_checksum = crc32fast::hash(&content);

        if stored_checksum != computed_checksum {
            return Err(StoreError::ChecksumMismatch {
                expected: stored_checksum,
                got: computed_checksum,
            });
        }

        String::from_utf8(content)
            .map_err(|e| StoreError::Corruption(format!("Value is not UTF-8: {}", e)))
    }

    fn write_value(path: &Path, content: &[u8]) -> Result<()> {
        let mut file = File::create(path)?;

        file.write_all(VALUE_MAGIC)?;
        file.write_all(&[VALUE_VERSION])?;
        file.write_all(&(content.len() as u64).to_le_bytes())?;
        file.write_all(content)?;
        file.write_all(&crc32fast::hash(content).to_le_bytes())?;

        file.sync_all()?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_path(key)?;
        match Self::read_value(&path) {
            Ok(value) => Ok(Some(value)),
            Err(StoreError::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.value_path(key)?;
        let _lock = self.write_lock.lock();

        // Write to a temp file then rename so readers never see a partial value
        let tmp_path = path.with_extension("tmp");
        let written = Self::write_value(&tmp_path, value.as_bytes())
            .and_then(|()| fs::rename(&tmp_path, &path).map_err(StoreError::from));
        if written.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        written
    }

    fn remove_item(&self, key: &str) -> Result<bool> {
        let path = self.value_path(key)?;
        let _lock = self.write_lock.lock();

        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self) -> Result<()> {
        for key in self.keys()? {
            self.remove_item(&key)?;
        }
        Ok(())
    }
}
