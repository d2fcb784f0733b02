//! JSON 文件键值存储
//!
//! 文件内容为 `{ "<key>": "<base64 value>" }`，每次写入通过临时文件 + 重命名落盘。

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::error::StoreResult;
use super::KeyValueStore;

/// 以 JSON 文件为后端的存储
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// 打开存储文件，文件不存在时从空存储开始
    ///
    /// 无法解析的文件被移到 `<path>.corrupt`，存储从空开始；只有读取失败才返回错误。
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(entries) => {
                    tracing::info!(path = %path.display(), count = entries.len(), "Shortcut store loaded");
                    entries
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Shortcut store is malformed, starting empty");
                    Self::set_aside(&path);
                    BTreeMap::new()
                }
            }
        } else {
            tracing::info!(path = %path.display(), "Shortcut store not found, starting empty");
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// 保留损坏的文件以便排查
    fn set_aside(path: &Path) {
        let mut target = path.as_os_str().to_owned();
        target.push(".corrupt");
        let target = PathBuf::from(target);
        match std::fs::rename(path, &target) {
            Ok(()) => tracing::info!(path = %target.display(), "Malformed shortcut store moved aside"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to move malformed shortcut store"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;

        tracing::debug!(path = %self.path.display(), "Shortcut store saved");
        Ok(())
    }

    /// 在副本上修改并落盘，成功后才替换内存内容
    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> StoreResult<()> {
        let mut entries = self.lock();
        let mut next = entries.clone();
        apply(&mut next);
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let encoded = self.lock().get(key).cloned()?;
        match STANDARD.decode(encoded.as_bytes()) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Stored value is not valid base64");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let encoded = STANDARD.encode(value);
        self.update(|entries| {
            entries.insert(key.to_string(), encoded);
        })
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        if !self.exists(key) {
            return Ok(());
        }
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn exists(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("shortcuts.json");

        let store = JsonFileStore::open(&path).unwrap();
        store.set("KeyboardShortcuts_toggle", b"{\"keyCode\":23}").unwrap();
        store.set("KeyboardShortcuts_other", b"false").unwrap();
        assert!(path.exists());

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("KeyboardShortcuts_toggle"),
            Some(b"{\"keyCode\":23}".to_vec())
        );
        assert_eq!(reopened.get("KeyboardShortcuts_other"), Some(b"false".to_vec()));

        reopened.remove("KeyboardShortcuts_other").unwrap();
        let again = JsonFileStore::open(&path).unwrap();
        assert!(!again.exists("KeyboardShortcuts_other"));
        assert!(again.exists("KeyboardShortcuts_toggle"));
    }

    #[test]
    fn test_invalid_base64_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shortcuts.json");
        std::fs::write(&path, r#"{"k": "!!not base64!!"}"#).unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.exists("k"));
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_open_malformed_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shortcuts.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.get("anything").is_none());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("shortcuts.json.corrupt")).unwrap(),
            "not json"
        );
        assert!(!path.exists());

        store.set("k", b"v").unwrap();
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("k"), Some(b"v".to_vec()));
    }
}
