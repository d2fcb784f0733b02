//! 键值存储适配层
//!
//! 注册表通过 [`KeyValueStore`] 读写每个名称的绑定。键使用固定前缀加名称，
//! 值为 [`Shortcut::encode`] 的输出；显式清除的绑定写入墓碑值 `false`，
//! 以区别于“从未设置”（此时默认值生效）。

mod error;
mod file;
mod memory;

use std::sync::Arc;

pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::names::Name;
use crate::shortcut::Shortcut;

/// 默认键前缀
pub const DEFAULT_KEY_PREFIX: &str = "KeyboardShortcuts_";

/// 显式清除的墓碑值
pub const TOMBSTONE: &[u8] = b"false";

/// 外部键值存储
///
/// 实现需自行保证内部一致性；注册表只在控制线程上访问它。
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
    fn exists(&self, key: &str) -> bool;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn exists(&self, key: &str) -> bool {
        (**self).exists(key)
    }
}

/// 某个名称的持久化绑定状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingState {
    /// 没有记录，默认值可以生效
    Absent,
    /// 已显式清除，默认值不得重新生效
    Cleared,
    /// 绑定到快捷键
    Bound(Shortcut),
    /// 记录存在但无法解码，按未绑定处理
    Corrupt,
}

impl BindingState {
    /// 有效的快捷键；损坏的记录视为没有绑定
    pub fn shortcut(&self) -> Option<Shortcut> {
        match self {
            BindingState::Bound(shortcut) => Some(*shortcut),
            _ => None,
        }
    }

    /// 存储中是否已有记录
    pub fn has_entry(&self) -> bool {
        !matches!(self, BindingState::Absent)
    }
}

/// 带命名空间的绑定读写
#[derive(Clone)]
pub struct BindingStore {
    store: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl BindingStore {
    pub fn new(store: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// 名称对应的存储键
    pub fn key_for(&self, name: &Name) -> String {
        format!("{}{}", self.prefix, name.raw_value())
    }

    pub fn has_entry(&self, name: &Name) -> bool {
        self.store.exists(&self.key_for(name))
    }

    /// 读取绑定，解码失败降级为 [`BindingState::Corrupt`]
    pub fn load(&self, name: &Name) -> BindingState {
        let key = self.key_for(name);
        let Some(bytes) = self.store.get(&key) else {
            return if self.store.exists(&key) {
                BindingState::Corrupt
            } else {
                BindingState::Absent
            };
        };

        if bytes.as_slice() == TOMBSTONE {
            return BindingState::Cleared;
        }

        match Shortcut::decode(&bytes) {
            Ok(shortcut) => BindingState::Bound(shortcut),
            Err(e) => {
                tracing::warn!(name = %name, error = %e, "Ignoring corrupt shortcut binding");
                BindingState::Corrupt
            }
        }
    }

    pub fn save(&self, name: &Name, shortcut: &Shortcut) -> StoreResult<()> {
        self.store.set(&self.key_for(name), &shortcut.encode())
    }

    /// 写入墓碑值
    pub fn clear(&self, name: &Name) -> StoreResult<()> {
        self.store.set(&self.key_for(name), TOMBSTONE)
    }
}

impl std::fmt::Debug for BindingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingStore")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}
