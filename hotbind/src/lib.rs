//! hotbind：具名全局快捷键注册表
//!
//! 应用声明具名快捷键（可带默认值），用户绑定的快捷键持久化到键值存储，
//! 并注册为系统级热键；按下/松开时调用对应名称的处理函数。

/// 快捷键值类型与编解码
pub mod shortcut;

/// 名称表
pub mod names;

/// 绑定持久化
pub mod store;

/// 系统热键桥接
pub mod bridge;

/// 变更通知
pub mod notifier;

/// 冲突检测
pub mod conflict;

/// 录制状态
pub mod recording;

/// 注册表
pub mod registry;

/// 配置
pub mod config;

/// Utility modules
pub mod utils;

pub use bridge::{
    BridgeError, EventDisposition, GlobalHotKeyBackend, HotKeyBackend, HotKeyBridge, KeyEventKind,
    OsHandle, OsKeyEvent,
};
pub use config::RegistryConfig;
pub use conflict::{Conflict, PlatformShortcuts, StaticShortcuts, SystemShortcuts};
pub use names::{Name, NameList};
pub use notifier::Subscription;
pub use recording::{RecordingGuard, RecordingSession};
pub use registry::{Registry, RegistryBuilder, RegistryError, RegistryResult};
pub use shortcut::{HotKeyIdentity, Key, Modifier, ModifierSet, Shortcut, ShortcutError};
pub use store::{BindingState, JsonFileStore, KeyValueStore, MemoryStore, StoreError};
