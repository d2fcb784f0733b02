//! 快捷键注册表
//!
//! 把名称表、绑定存储、系统热键桥接、变更通知和冲突检测组合在一起，
//! 对外提供声明名称、设置/清除/重置绑定、注册按键处理函数等操作。
//!
//! # 示例
//!
//! ```no_run
//! use hotbind::{Key, Modifier, Registry, Shortcut};
//!
//! let registry = Registry::builder().build()?;
//! let toggle = registry.declare(
//!     "toggleMode",
//!     Some(Shortcut::new(Some(Key::T), [Modifier::Command, Modifier::Shift])?),
//! );
//! registry.on_key_down(&toggle, || println!("toggled"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
pub mod global;
mod handlers;

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use error::{RegistryError, RegistryResult};

use handlers::HandlerTable;

use crate::bridge::{
    install_event_handler, BridgeError, EventDisposition, GlobalHotKeyBackend, HotKeyBackend, HotKeyBridge,
    KeyCallback, KeyEventKind, OsKeyEvent,
};
use crate::config::RegistryConfig;
use crate::conflict::{Conflict, ConflictResolver, PlatformShortcuts, SystemShortcuts};
use crate::names::{Name, NameList, NameTable};
use crate::notifier::{ChangeNotifier, Subscription};
use crate::recording::{PauseFlag, RecordingSession};
use crate::shortcut::Shortcut;
use crate::store::{BindingState, BindingStore, JsonFileStore, KeyValueStore, MemoryStore};

/// 注册表构建器
///
/// 未指定的部件使用默认实现：存储按配置选择文件或内存，
/// 后端使用 [`GlobalHotKeyBackend`] 并安装系统事件回调。
#[derive(Default)]
pub struct RegistryBuilder {
    config: RegistryConfig,
    store: Option<Arc<dyn KeyValueStore>>,
    backend: Option<Box<dyn HotKeyBackend>>,
    system: Option<Box<dyn SystemShortcuts>>,
}

impl RegistryBuilder {
    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// 使用自定义后端
    ///
    /// 自定义后端不会自动接入系统事件，需要调用方通过 [`Registry::dispatch`] 投递事件。
    pub fn backend(mut self, backend: Box<dyn HotKeyBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn system_shortcuts(mut self, system: Box<dyn SystemShortcuts>) -> Self {
        self.system = Some(system);
        self
    }

    pub fn build(self) -> RegistryResult<Arc<Registry>> {
        let config = self.config;

        let store: Arc<dyn KeyValueStore> = match self.store {
            Some(store) => store,
            None => match &config.store_path {
                Some(path) => Arc::new(JsonFileStore::open(path.clone())?),
                None => Arc::new(MemoryStore::new()),
            },
        };

        let pause = PauseFlag::new();
        let (backend, route_os_events) = match self.backend {
            Some(backend) => (backend, false),
            None => {
                let backend: Box<dyn HotKeyBackend> = Box::new(GlobalHotKeyBackend::new()?);
                (backend, true)
            }
        };
        let bridge = Arc::new(HotKeyBridge::new(backend, pause.clone()));
        if route_os_events {
            install_event_handler(&bridge);
        }

        let system = self
            .system
            .unwrap_or_else(|| Box::new(PlatformShortcuts));
        let resolver =
            ConflictResolver::new(system).with_system_check(config.check_system_reserved);

        tracing::info!(
            prefix = %config.key_prefix,
            store_path = ?config.store_path,
            "Shortcut registry created"
        );

        Ok(Arc::new(Registry {
            bindings: BindingStore::new(store, config.key_prefix.clone()),
            config,
            names: Mutex::new(NameTable::new()),
            bridge,
            handlers: Arc::new(HandlerTable::default()),
            disabled: Mutex::new(HashSet::new()),
            notifier: ChangeNotifier::new(),
            resolver,
            recording: RecordingSession::new(pause),
        }))
    }
}

/// 快捷键注册表
///
/// 持有名称、绑定与系统注册的一致视图：
/// 已绑定且未被禁用的名称在系统中恰好有一个注册，清除/未绑定的名称没有注册。
pub struct Registry {
    config: RegistryConfig,
    names: Mutex<NameTable>,
    bindings: BindingStore,
    bridge: Arc<HotKeyBridge>,
    handlers: Arc<HandlerTable>,
    disabled: Mutex<HashSet<Name>>,
    notifier: ChangeNotifier,
    resolver: ConflictResolver,
    recording: RecordingSession,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn lock_names(&self) -> MutexGuard<'_, NameTable> {
        self.names.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_disabled(&self) -> MutexGuard<'_, HashSet<Name>> {
        self.disabled.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 返回名称表中的规范名称（携带首次声明的默认值）
    fn declared(&self, name: &Name) -> RegistryResult<Name> {
        self.lock_names()
            .get(name.raw_value())
            .cloned()
            .ok_or_else(|| RegistryError::UnknownName(name.raw_value().to_string()))
    }

    /// 声明名称
    ///
    /// 同一原始字符串只有首次声明生效。首次声明时应用默认值，
    /// 或把已持久化的绑定注册到系统；失败只记录日志，不影响返回的名称。
    pub fn declare(&self, raw: &str, default: Option<Shortcut>) -> Name {
        let declaration = self.lock_names().declare(raw, default);

        if declaration.is_new {
            if let Err(e) = self.ensure_default_applied(&declaration.name) {
                tracing::warn!(
                    name = %declaration.name,
                    error = %e,
                    "Failed to apply binding for newly declared shortcut"
                );
            }
        }

        declaration.name
    }

    /// 以 `"Shift+Command+T"` 形式的字符串声明默认值
    pub fn declare_str(&self, raw: &str, default: &str) -> RegistryResult<Name> {
        let shortcut: Shortcut = default.parse()?;
        Ok(self.declare(raw, Some(shortcut)))
    }

    /// 确保名称已应用默认值
    ///
    /// 存储中没有任何条目时写入默认值；已有绑定时确保它在系统中注册；
    /// 已清除或数据损坏时不做任何事。
    pub fn ensure_default_applied(&self, name: &Name) -> RegistryResult<()> {
        let name = self.declared(name)?;

        match self.bindings.load(&name) {
            BindingState::Absent => match name.default_shortcut() {
                Some(default) => {
                    tracing::debug!(name = %name, shortcut = %default, "Applying default shortcut");
                    self.set_binding(&name, Some(default))
                }
                None => Ok(()),
            },
            BindingState::Bound(shortcut) => self.activate(&name, &shortcut),
            BindingState::Cleared | BindingState::Corrupt => Ok(()),
        }
    }

    fn key_callbacks(&self, name: &Name) -> (KeyCallback, KeyCallback) {
        let make = |kind: KeyEventKind| -> KeyCallback {
            let handlers = Arc::clone(&self.handlers);
            let name = name.clone();
            Arc::new(move || handlers.fire(&name, kind))
        };
        (make(KeyEventKind::KeyDown), make(KeyEventKind::KeyUp))
    }

    /// 在系统中注册名称的快捷键；禁用的名称跳过
    fn activate(&self, name: &Name, shortcut: &Shortcut) -> RegistryResult<()> {
        if self.lock_disabled().contains(name) {
            tracing::debug!(name = %name, "Shortcut disabled, skipping registration");
            return Ok(());
        }

        let (on_key_down, on_key_up) = self.key_callbacks(name);
        self.bridge
            .register(name, shortcut, on_key_down, on_key_up)?;
        Ok(())
    }

    /// 恢复名称在操作前的系统注册
    fn restore_registration(&self, name: &Name, previous: Option<Shortcut>) {
        match previous {
            Some(shortcut) => {
                if let Err(e) = self.activate(name, &shortcut) {
                    tracing::error!(
                        name = %name,
                        shortcut = %shortcut,
                        error = %e,
                        "Failed to restore previous registration"
                    );
                }
            }
            None => {
                self.bridge.unregister(name);
            }
        }
    }

    /// 设置或清除名称的绑定
    ///
    /// 系统注册与持久化要么都成功，要么都保持原状；成功后通知订阅者。
    pub fn set_binding(&self, name: &Name, shortcut: Option<Shortcut>) -> RegistryResult<()> {
        let name = self.declared(name)?;
        let previous = self.bridge.registration(&name).map(|r| r.shortcut);

        match shortcut {
            Some(shortcut) => {
                // 禁用的名称不经过桥接层，重复检查须在这里完成
                if let Some(holder) = self.holder_of(&shortcut, &name) {
                    return Err(BridgeError::AlreadyRegistered {
                        shortcut: shortcut.to_string(),
                        holder: holder.to_string(),
                    }
                    .into());
                }
                self.activate(&name, &shortcut)?;
                if let Err(e) = self.bindings.save(&name, &shortcut) {
                    tracing::error!(name = %name, error = %e, "Failed to persist shortcut binding");
                    self.restore_registration(&name, previous);
                    return Err(e.into());
                }
                tracing::info!(name = %name, shortcut = %shortcut, "Shortcut binding set");
            }
            None => {
                self.bridge.unregister(&name);
                if let Err(e) = self.bindings.clear(&name) {
                    tracing::error!(name = %name, error = %e, "Failed to persist cleared binding");
                    self.restore_registration(&name, previous);
                    return Err(e.into());
                }
                tracing::info!(name = %name, "Shortcut binding cleared");
            }
        }

        self.notifier.publish(&name);
        Ok(())
    }

    /// 当前绑定的快捷键；未绑定、已清除或数据损坏时为 None
    pub fn shortcut(&self, name: &Name) -> Option<Shortcut> {
        self.bindings.load(name).shortcut()
    }

    pub fn binding_state(&self, name: &Name) -> BindingState {
        self.bindings.load(name)
    }

    /// 把名称重置为默认值（无默认值的名称被清除）
    ///
    /// 每个名称独立处理，返回遇到的第一个错误。
    pub fn reset<'a, I>(&self, names: I) -> RegistryResult<()>
    where
        I: IntoIterator<Item = &'a Name>,
    {
        let mut first_error = None;

        for name in names {
            let result = self
                .declared(name)
                .and_then(|canonical| self.set_binding(&canonical, canonical.default_shortcut()));
            if let Err(e) = result {
                tracing::warn!(name = %name, error = %e, "Failed to reset shortcut");
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// 重置全部已声明的名称
    pub fn reset_all(&self) -> RegistryResult<()> {
        let names = self.all_names();
        self.reset(&names)
    }

    /// 全部已声明名称，按声明顺序
    pub fn all_names(&self) -> NameList {
        self.lock_names().snapshot()
    }

    /// 除 `excluding` 外所有名称的当前绑定
    fn other_bindings(&self, excluding: &Name) -> Vec<(Name, Shortcut)> {
        self.all_names()
            .iter()
            .filter(|name| *name != excluding)
            .filter_map(|name| self.shortcut(name).map(|s| (name.clone(), s)))
            .collect()
    }

    /// 已绑定同一系统热键的其他名称，多个时取名称最小者
    fn holder_of(&self, shortcut: &Shortcut, excluding: &Name) -> Option<Name> {
        self.other_bindings(excluding)
            .into_iter()
            .filter(|(_, bound)| bound.same_hotkey(shortcut))
            .map(|(name, _)| name)
            .min_by(|a, b| a.raw_value().cmp(b.raw_value()))
    }

    /// 检查候选快捷键能否分配给 `excluding`
    pub fn check_conflict(&self, candidate: &Shortcut, excluding: &Name) -> Conflict {
        let bound = self.other_bindings(excluding);
        self.resolver
            .check_conflict(candidate, excluding, bound.iter().map(|(n, s)| (n, s)))
    }

    /// 应用录制得到的快捷键：无冲突时设置绑定，否则原样返回冲突
    pub fn apply_recorded(&self, name: &Name, candidate: Shortcut) -> RegistryResult<Conflict> {
        let conflict = self.check_conflict(&candidate, name);
        if conflict.is_available() {
            self.set_binding(name, Some(candidate))?;
        } else {
            tracing::debug!(name = %name, shortcut = %candidate, conflict = ?conflict, "Recorded shortcut rejected");
        }
        Ok(conflict)
    }

    pub fn system_reserved_shortcuts(&self) -> Vec<Shortcut> {
        self.resolver.system_reserved_shortcuts()
    }

    /// 注册按下处理函数；同一名称可注册多个，按注册顺序调用
    pub fn on_key_down<F>(&self, name: &Name, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.handlers.add(name, KeyEventKind::KeyDown, Arc::new(handler));
    }

    /// 注册松开处理函数
    pub fn on_key_up<F>(&self, name: &Name, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.handlers.add(name, KeyEventKind::KeyUp, Arc::new(handler));
    }

    pub fn handler_count(&self, name: &Name) -> usize {
        self.handlers.count(name)
    }

    pub fn remove_handlers(&self, name: &Name) {
        self.handlers.remove(name);
    }

    pub fn remove_all_handlers(&self) {
        self.handlers.clear();
    }

    /// 订阅名称的绑定变更
    pub fn subscribe<F>(&self, name: &Name, handler: F) -> Subscription
    where
        F: Fn(&Name) + Send + Sync + 'static,
    {
        self.notifier.subscribe(name, handler)
    }

    /// 录制会话；录制期间系统事件不会触发处理函数
    pub fn recording(&self) -> &RecordingSession {
        &self.recording
    }

    /// 禁用名称：保留绑定，但取消系统注册
    pub fn disable<'a, I>(&self, names: I)
    where
        I: IntoIterator<Item = &'a Name>,
    {
        for name in names {
            self.lock_disabled().insert(name.clone());
            if self.bridge.unregister(name) {
                tracing::debug!(name = %name, "Shortcut disabled");
            }
        }
    }

    /// 重新启用名称，把已绑定的快捷键注册回系统
    pub fn enable<'a, I>(&self, names: I) -> RegistryResult<()>
    where
        I: IntoIterator<Item = &'a Name>,
    {
        let mut first_error = None;

        for name in names {
            if !self.lock_disabled().remove(name) {
                continue;
            }
            if let Some(shortcut) = self.shortcut(name) {
                if let Err(e) = self.activate(name, &shortcut) {
                    tracing::warn!(name = %name, error = %e, "Failed to re-enable shortcut");
                    first_error.get_or_insert(e);
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    pub fn is_enabled(&self, name: &Name) -> bool {
        !self.lock_disabled().contains(name)
    }

    /// 投递一个系统按键事件
    pub fn dispatch(&self, event: OsKeyEvent) -> EventDisposition {
        self.bridge.dispatch(event)
    }

    pub fn bridge(&self) -> &Arc<HotKeyBridge> {
        &self.bridge
    }

    /// 释放全部系统注册，绑定保持不变；可重复调用
    pub fn shutdown(&self) -> usize {
        let released = self.bridge.release_all();
        tracing::info!(released, "Shortcut registry shut down");
        released
    }

    /// 拆除注册表：释放系统注册并清空名称、处理函数、订阅和禁用状态
    pub fn teardown(&self) {
        self.shutdown();
        self.lock_names().clear();
        self.handlers.clear();
        self.notifier.clear();
        self.lock_disabled().clear();
    }
}
