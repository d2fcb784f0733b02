//! 系统热键桥接层
//!
//! 维护“当前绑定的快捷键 → 系统注册句柄”的映射，并把唯一的进程级系统事件回调
//! 分发给对应注册项的按下/松开回调。
//!
//! # 线程模型
//!
//! 所有操作应在同一控制线程（通常是主线程）上调用。内部互斥锁只用于满足系统回调的
//! `Send + Sync` 约束；分发时会在调用回调前释放锁，回调中可以安全地修改绑定。

mod backend;
mod error;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use backend::{
    clear_event_target, install_event_handler, GlobalHotKeyBackend, HotKeyBackend, OsHandle,
};
pub use error::{BridgeError, BridgeResult};

use crate::names::Name;
use crate::recording::PauseFlag;
use crate::shortcut::{HotKeyIdentity, Shortcut};

/// 按键回调
pub type KeyCallback = Arc<dyn Fn() + Send + Sync>;

/// 注册项内部标识，单调递增
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationId(u64);

impl RegistrationId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// 按键事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    KeyDown,
    KeyUp,
}

/// 系统送达的热键事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OsKeyEvent {
    pub handle: OsHandle,
    pub kind: KeyEventKind,
}

impl OsKeyEvent {
    pub fn new(handle: OsHandle, kind: KeyEventKind) -> Self {
        Self { handle, kind }
    }
}

/// 分发结果，告知系统事件是否已处理
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    Handled,
    /// 未处理，系统可以继续传递该事件
    NotHandled,
}

/// 一个活跃的系统热键注册
struct HotKeyRegistration {
    name: Name,
    shortcut: Shortcut,
    os_handle: OsHandle,
    on_key_down: KeyCallback,
    on_key_up: KeyCallback,
}

/// 注册项的只读视图
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationInfo {
    pub id: RegistrationId,
    pub name: Name,
    pub shortcut: Shortcut,
    pub os_handle: OsHandle,
}

struct BridgeInner {
    backend: Box<dyn HotKeyBackend>,
    next_id: u64,
    registrations: HashMap<RegistrationId, HotKeyRegistration>,
    by_name: HashMap<Name, RegistrationId>,
    by_handle: HashMap<OsHandle, RegistrationId>,
    by_identity: HashMap<HotKeyIdentity, RegistrationId>,
    /// 系统拒绝注销的句柄，之后重试
    pending_release: Vec<(OsHandle, Shortcut)>,
}

impl BridgeInner {
    fn allocate_id(&mut self) -> RegistrationId {
        self.next_id += 1;
        RegistrationId(self.next_id)
    }

    fn insert(&mut self, id: RegistrationId, registration: HotKeyRegistration) {
        self.by_name.insert(registration.name.clone(), id);
        self.by_handle.insert(registration.os_handle, id);
        self.by_identity
            .insert(registration.shortcut.hotkey_identity(), id);
        self.registrations.insert(id, registration);
    }

    fn take(&mut self, id: RegistrationId) -> Option<HotKeyRegistration> {
        let registration = self.registrations.remove(&id)?;
        self.by_name.remove(&registration.name);
        self.by_handle.remove(&registration.os_handle);
        self.by_identity
            .remove(&registration.shortcut.hotkey_identity());
        Some(registration)
    }

    /// 移除注册并注销系统句柄
    ///
    /// 注销失败的句柄进入重试列表，注册项本身不再接收事件。
    fn release(&mut self, id: RegistrationId) -> Option<HotKeyRegistration> {
        let registration = self.take(id)?;
        match self.backend.release(registration.os_handle) {
            Ok(()) => tracing::info!(
                name = %registration.name,
                shortcut = %registration.shortcut,
                id = id.value(),
                "Unregistered hotkey"
            ),
            Err(e) => {
                tracing::warn!(
                    name = %registration.name,
                    error = %e,
                    "Failed to release hotkey, will retry"
                );
                self.pending_release
                    .push((registration.os_handle, registration.shortcut));
            }
        }
        Some(registration)
    }

    /// 重试之前失败的注销，返回本次成功释放的数量
    fn retry_pending(&mut self) -> usize {
        if self.pending_release.is_empty() {
            return 0;
        }
        let pending = std::mem::take(&mut self.pending_release);
        let mut released = 0;
        for (handle, shortcut) in pending {
            match self.backend.release(handle) {
                Ok(()) => {
                    tracing::info!(shortcut = %shortcut, "Released hotkey on retry");
                    released += 1;
                }
                Err(e) => {
                    tracing::debug!(shortcut = %shortcut, error = %e, "Hotkey release still failing");
                    self.pending_release.push((handle, shortcut));
                }
            }
        }
        released
    }
}

/// 系统热键桥接层
pub struct HotKeyBridge {
    inner: Mutex<BridgeInner>,
    pause: PauseFlag,
}

impl HotKeyBridge {
    pub fn new(backend: Box<dyn HotKeyBackend>, pause: PauseFlag) -> Self {
        Self {
            inner: Mutex::new(BridgeInner {
                backend,
                next_id: 0,
                registrations: HashMap::new(),
                by_name: HashMap::new(),
                by_handle: HashMap::new(),
                by_identity: HashMap::new(),
                pending_release: Vec::new(),
            }),
            pause,
        }
    }

    fn lock(&self) -> MutexGuard<'_, BridgeInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 为名称注册快捷键
    ///
    /// 先向系统预留新快捷键，成功后才注销该名称之前的注册；预留失败时桥接层状态
    /// 保持不变。名称已持有同一系统热键时只更新快捷键值和回调。
    pub fn register(
        &self,
        name: &Name,
        shortcut: &Shortcut,
        on_key_down: KeyCallback,
        on_key_up: KeyCallback,
    ) -> BridgeResult<RegistrationId> {
        let mut inner = self.lock();
        inner.retry_pending();

        let holder_id = inner.by_identity.get(&shortcut.hotkey_identity()).copied();
        if let Some(holder_id) = holder_id {
            if let Some(holder) = inner.registrations.get_mut(&holder_id) {
                if holder.name != *name {
                    return Err(BridgeError::AlreadyRegistered {
                        shortcut: shortcut.to_string(),
                        holder: holder.name.to_string(),
                    });
                }
                holder.shortcut = *shortcut;
                holder.on_key_down = on_key_down;
                holder.on_key_up = on_key_up;
                return Ok(holder_id);
            }
        }

        let os_handle = match inner.backend.reserve(shortcut) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(name = %name, shortcut = %shortcut, error = %e, "Hotkey registration rejected");
                return Err(e);
            }
        };

        let previous = inner.by_name.get(name).copied();
        if let Some(previous) = previous {
            inner.release(previous);
        }

        let id = inner.allocate_id();
        inner.insert(
            id,
            HotKeyRegistration {
                name: name.clone(),
                shortcut: *shortcut,
                os_handle,
                on_key_down,
                on_key_up,
            },
        );
        tracing::info!(
            name = %name,
            shortcut = %shortcut,
            id = id.value(),
            "Registered hotkey"
        );
        Ok(id)
    }

    /// 注销名称的注册，返回是否存在注册
    pub fn unregister(&self, name: &Name) -> bool {
        let mut inner = self.lock();
        let Some(id) = inner.by_name.get(name).copied() else {
            return false;
        };
        inner.release(id).is_some()
    }

    /// 处理系统事件
    ///
    /// 找不到注册项或处于暂停状态时返回 [`EventDisposition::NotHandled`]，不调用回调。
    pub fn dispatch(&self, event: OsKeyEvent) -> EventDisposition {
        let callback = {
            let inner = self.lock();
            let Some(registration) = inner
                .by_handle
                .get(&event.handle)
                .and_then(|id| inner.registrations.get(id))
            else {
                tracing::debug!(handle = event.handle.raw(), "Hotkey event for unknown handle");
                return EventDisposition::NotHandled;
            };

            if self.pause.is_paused() {
                tracing::debug!(name = %registration.name, "Hotkey dispatch paused during recording");
                return EventDisposition::NotHandled;
            }

            tracing::debug!(name = %registration.name, kind = ?event.kind, "Dispatching hotkey");
            match event.kind {
                KeyEventKind::KeyDown => Arc::clone(&registration.on_key_down),
                KeyEventKind::KeyUp => Arc::clone(&registration.on_key_up),
            }
        };

        callback();
        EventDisposition::Handled
    }

    /// 释放全部注册并重试失败的注销，可重复调用
    ///
    /// 返回移除的注册数量。
    pub fn release_all(&self) -> usize {
        let mut inner = self.lock();
        inner.retry_pending();
        let ids: Vec<RegistrationId> = inner.registrations.keys().copied().collect();
        let released = ids.into_iter().filter_map(|id| inner.release(id)).count();
        if released > 0 {
            tracing::info!(count = released, "Released all hotkeys");
        }
        if !inner.pending_release.is_empty() {
            tracing::warn!(
                count = inner.pending_release.len(),
                "Some hotkeys could not be released"
            );
        }
        released
    }

    /// 等待重试注销的系统句柄数量
    pub fn pending_release_count(&self) -> usize {
        self.lock().pending_release.len()
    }

    /// 名称当前的注册
    pub fn registration(&self, name: &Name) -> Option<RegistrationInfo> {
        let inner = self.lock();
        let id = *inner.by_name.get(name)?;
        inner.registrations.get(&id).map(|reg| RegistrationInfo {
            id,
            name: reg.name.clone(),
            shortcut: reg.shortcut,
            os_handle: reg.os_handle,
        })
    }

    /// 持有该系统热键的注册
    pub fn registration_for_shortcut(&self, shortcut: &Shortcut) -> Option<RegistrationInfo> {
        let inner = self.lock();
        let id = *inner.by_identity.get(&shortcut.hotkey_identity())?;
        inner.registrations.get(&id).map(|reg| RegistrationInfo {
            id,
            name: reg.name.clone(),
            shortcut: reg.shortcut,
            os_handle: reg.os_handle,
        })
    }

    pub fn is_registered(&self, shortcut: &Shortcut) -> bool {
        self.lock()
            .by_identity
            .contains_key(&shortcut.hotkey_identity())
    }

    pub fn registration_count(&self) -> usize {
        self.lock().registrations.len()
    }

    /// 全部注册，按内部标识排序
    pub fn registrations(&self) -> Vec<RegistrationInfo> {
        let inner = self.lock();
        let mut all: Vec<RegistrationInfo> = inner
            .registrations
            .iter()
            .map(|(id, reg)| RegistrationInfo {
                id: *id,
                name: reg.name.clone(),
                shortcut: reg.shortcut,
                os_handle: reg.os_handle,
            })
            .collect();
        all.sort_by_key(|info| info.id);
        all
    }
}

impl Drop for HotKeyBridge {
    fn drop(&mut self) {
        self.release_all();
    }
}
