//! 系统热键后端
//!
//! [`HotKeyBackend`] 是桥接层与操作系统之间的唯一接缝；
//! [`GlobalHotKeyBackend`] 基于 `global-hotkey` 实现，并在进程内只安装一次事件回调。

use std::collections::HashMap;
use std::sync::{Arc, Once, PoisonError, RwLock, Weak};

use global_hotkey::hotkey::HotKey;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};

use super::error::{BridgeError, BridgeResult};
use super::{HotKeyBridge, KeyEventKind, OsKeyEvent};
use crate::shortcut::Shortcut;

/// 不透明的系统注册句柄
///
/// 系统事件通过它回指注册项；句柄只在桥接层与后端之间传递。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OsHandle(u32);

impl OsHandle {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// 系统热键预留接口
pub trait HotKeyBackend: Send {
    /// 向系统预留快捷键
    fn reserve(&mut self, shortcut: &Shortcut) -> BridgeResult<OsHandle>;

    /// 释放预留；重复释放同一句柄不得报错
    fn release(&mut self, handle: OsHandle) -> BridgeResult<()>;
}

/// 基于 `global-hotkey` 的后端
///
/// 必须在主线程创建（macOS 要求）。
pub struct GlobalHotKeyBackend {
    manager: GlobalHotKeyManager,
    hotkeys: HashMap<OsHandle, (HotKey, Shortcut)>,
}

impl GlobalHotKeyBackend {
    pub fn new() -> BridgeResult<Self> {
        let manager = GlobalHotKeyManager::new()
            .map_err(|e| BridgeError::BackendUnavailable(e.to_string()))?;
        Ok(Self {
            manager,
            hotkeys: HashMap::new(),
        })
    }
}

impl HotKeyBackend for GlobalHotKeyBackend {
    fn reserve(&mut self, shortcut: &Shortcut) -> BridgeResult<OsHandle> {
        let hotkey = shortcut
            .hotkey_identity()
            .to_hotkey()
            .ok_or_else(|| BridgeError::RegistrationFailed {
                shortcut: shortcut.to_string(),
                reason: "modifier-only shortcuts cannot be registered".to_string(),
            })?;
        self.manager
            .register(hotkey)
            .map_err(|e| BridgeError::RegistrationFailed {
                shortcut: shortcut.to_string(),
                reason: e.to_string(),
            })?;

        let handle = OsHandle::new(hotkey.id());
        self.hotkeys.insert(handle, (hotkey, *shortcut));
        Ok(handle)
    }

    fn release(&mut self, handle: OsHandle) -> BridgeResult<()> {
        let Some((hotkey, shortcut)) = self.hotkeys.get(&handle).copied() else {
            return Ok(());
        };
        // 注销成功后才移除，失败的句柄可以再次释放
        self.manager
            .unregister(hotkey)
            .map_err(|e| BridgeError::ReleaseFailed {
                shortcut: shortcut.to_string(),
                reason: e.to_string(),
            })?;
        self.hotkeys.remove(&handle);
        Ok(())
    }
}

/// 当前接收系统事件的桥接层
static EVENT_TARGET: RwLock<Option<Weak<HotKeyBridge>>> = RwLock::new(None);
static INSTALL_HANDLER: Once = Once::new();

/// 将系统热键事件路由到 `bridge`
///
/// 进程内只安装一次 `global-hotkey` 事件回调；再次调用只替换路由目标。
pub fn install_event_handler(bridge: &Arc<HotKeyBridge>) {
    *EVENT_TARGET.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::downgrade(bridge));

    INSTALL_HANDLER.call_once(|| {
        GlobalHotKeyEvent::set_event_handler(Some(|event: GlobalHotKeyEvent| {
            let target = EVENT_TARGET
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .as_ref()
                .and_then(Weak::upgrade);

            let Some(bridge) = target else {
                tracing::debug!(id = event.id, "Hotkey event with no active bridge");
                return;
            };

            let kind = match event.state {
                HotKeyState::Pressed => KeyEventKind::KeyDown,
                HotKeyState::Released => KeyEventKind::KeyUp,
            };
            let disposition = bridge.dispatch(OsKeyEvent::new(OsHandle::new(event.id), kind));
            tracing::trace!(id = event.id, ?kind, ?disposition, "Hotkey event routed");
        }));
        tracing::info!("Global hotkey event handler installed");
    });
}

/// 停止向已安装的桥接层路由事件
pub fn clear_event_target() {
    *EVENT_TARGET.write().unwrap_or_else(PoisonError::into_inner) = None;
}
