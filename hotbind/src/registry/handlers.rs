//! 每个名称的按键处理函数表

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::bridge::{KeyCallback, KeyEventKind};
use crate::names::Name;

#[derive(Default)]
struct NameHandlers {
    key_down: Vec<KeyCallback>,
    key_up: Vec<KeyCallback>,
}

impl NameHandlers {
    fn list(&self, kind: KeyEventKind) -> &Vec<KeyCallback> {
        match kind {
            KeyEventKind::KeyDown => &self.key_down,
            KeyEventKind::KeyUp => &self.key_up,
        }
    }

    fn list_mut(&mut self, kind: KeyEventKind) -> &mut Vec<KeyCallback> {
        match kind {
            KeyEventKind::KeyDown => &mut self.key_down,
            KeyEventKind::KeyUp => &mut self.key_up,
        }
    }
}

#[derive(Default)]
pub(crate) struct HandlerTable {
    handlers: Mutex<HashMap<Name, NameHandlers>>,
}

impl HandlerTable {
    fn lock(&self) -> MutexGuard<'_, HashMap<Name, NameHandlers>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn add(&self, name: &Name, kind: KeyEventKind, callback: KeyCallback) {
        self.lock()
            .entry(name.clone())
            .or_default()
            .list_mut(kind)
            .push(callback);
    }

    pub(crate) fn remove(&self, name: &Name) {
        self.lock().remove(name);
    }

    pub(crate) fn clear(&self) {
        self.lock().clear();
    }

    pub(crate) fn count(&self, name: &Name) -> usize {
        self.lock()
            .get(name)
            .map_or(0, |h| h.key_down.len() + h.key_up.len())
    }

    /// 调用名称的处理函数；调用时不持有锁
    pub(crate) fn fire(&self, name: &Name, kind: KeyEventKind) {
        let callbacks: Vec<KeyCallback> = self
            .lock()
            .get(name)
            .map(|h| h.list(kind).clone())
            .unwrap_or_default();

        for callback in callbacks {
            callback();
        }
    }
}
