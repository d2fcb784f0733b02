//! 集成测试共用的假后端与存储

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use hotbind::bridge::BridgeResult;
use hotbind::store::StoreResult;
use hotbind::{
    BridgeError, HotKeyBackend, Key, KeyEventKind, KeyValueStore, MemoryStore, Modifier,
    ModifierSet, OsHandle, OsKeyEvent, Registry, Shortcut, StaticShortcuts, StoreError,
};

#[derive(Default)]
struct FakeState {
    live: HashMap<OsHandle, Shortcut>,
    rejected: HashSet<Shortcut>,
    fail_releases: bool,
    releases: usize,
}

/// 仿照系统行为的假后端，克隆体共享状态
///
/// 句柄取 `HotKey::id()`，同一系统热键重复注册会被拒绝。
#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// 之后对该快捷键的注册请求都会失败
    pub fn reject(&self, shortcut: Shortcut) {
        self.state.lock().unwrap().rejected.insert(shortcut);
    }

    /// 切换注销是否失败
    pub fn fail_releases(&self, fail: bool) {
        self.state.lock().unwrap().fail_releases = fail;
    }

    pub fn live(&self) -> Vec<Shortcut> {
        self.state.lock().unwrap().live.values().copied().collect()
    }

    pub fn live_count(&self) -> usize {
        self.state.lock().unwrap().live.len()
    }

    pub fn is_live(&self, shortcut: &Shortcut) -> bool {
        self.handle_for(shortcut).is_some()
    }

    pub fn handle_for(&self, shortcut: &Shortcut) -> Option<OsHandle> {
        self.state
            .lock()
            .unwrap()
            .live
            .iter()
            .find(|(_, s)| s.same_hotkey(shortcut))
            .map(|(h, _)| *h)
    }

    pub fn release_count(&self) -> usize {
        self.state.lock().unwrap().releases
    }
}

impl HotKeyBackend for FakeBackend {
    fn reserve(&mut self, shortcut: &Shortcut) -> BridgeResult<OsHandle> {
        let mut state = self.state.lock().unwrap();
        let failed = |reason: &str| BridgeError::RegistrationFailed {
            shortcut: shortcut.to_string(),
            reason: reason.to_string(),
        };
        if state.rejected.contains(shortcut) {
            return Err(failed("rejected by fake backend"));
        }
        let hotkey = shortcut
            .hotkey_identity()
            .to_hotkey()
            .ok_or_else(|| failed("modifier-only"))?;
        let handle = OsHandle::new(hotkey.id());
        if state.live.contains_key(&handle) {
            return Err(failed("AlreadyRegistered (OS)"));
        }
        state.live.insert(handle, *shortcut);
        Ok(handle)
    }

    fn release(&mut self, handle: OsHandle) -> BridgeResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_releases {
            return Err(BridgeError::ReleaseFailed {
                shortcut: format!("{handle:?}"),
                reason: "refused by fake backend".to_string(),
            });
        }
        if state.live.remove(&handle).is_some() {
            state.releases += 1;
        }
        Ok(())
    }
}

/// 可以切换为写入失败的内存存储
#[derive(Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StoreError::Backend("write refused".to_string()))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.check()?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.check()?;
        self.inner.remove(key)
    }

    fn exists(&self, key: &str) -> bool {
        self.inner.exists(key)
    }
}

pub fn shortcut(key: Key, modifiers: &[Modifier]) -> Shortcut {
    Shortcut::new(Some(key), modifiers.iter().copied().collect::<ModifierSet>()).unwrap()
}

pub fn build_registry(backend: &FakeBackend, store: Arc<dyn KeyValueStore>) -> Arc<Registry> {
    Registry::builder()
        .store(store)
        .backend(Box::new(backend.clone()))
        .system_shortcuts(Box::new(StaticShortcuts(vec![])))
        .build()
        .unwrap()
}

pub fn memory_registry(backend: &FakeBackend) -> Arc<Registry> {
    build_registry(backend, Arc::new(MemoryStore::new()))
}

/// 模拟系统对某个快捷键投递事件
pub fn os_event(backend: &FakeBackend, shortcut: &Shortcut, kind: KeyEventKind) -> OsKeyEvent {
    let handle = backend
        .handle_for(shortcut)
        .expect("shortcut is not registered with the backend");
    OsKeyEvent::new(handle, kind)
}
