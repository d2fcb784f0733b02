//! 进程级注册表
//!
//! 首次使用时显式初始化；[`teardown`] 供进程退出和测试之间重置使用。

use std::sync::{Arc, PoisonError, RwLock};

use super::{Registry, RegistryResult};
use crate::bridge::clear_event_target;

static GLOBAL: RwLock<Option<Arc<Registry>>> = RwLock::new(None);

/// 安装进程级注册表，返回被替换的旧实例
pub fn install(registry: Arc<Registry>) -> Option<Arc<Registry>> {
    let previous = GLOBAL
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .replace(registry);
    if previous.is_some() {
        tracing::warn!("Replacing the installed shortcut registry");
    }
    previous
}

/// 当前的进程级注册表
pub fn global() -> Option<Arc<Registry>> {
    GLOBAL
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// 获取进程级注册表，未安装时用 `init` 创建
pub fn get_or_init<F>(init: F) -> RegistryResult<Arc<Registry>>
where
    F: FnOnce() -> RegistryResult<Arc<Registry>>,
{
    let mut slot = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(registry) = slot.as_ref() {
        return Ok(Arc::clone(registry));
    }

    let registry = init()?;
    *slot = Some(Arc::clone(&registry));
    tracing::info!("Shortcut registry initialized");
    Ok(registry)
}

/// 拆除进程级注册表：释放全部系统注册并清空全局槽位，可重复调用
pub fn teardown() -> bool {
    let registry = GLOBAL.write().unwrap_or_else(PoisonError::into_inner).take();
    clear_event_target();

    match registry {
        Some(registry) => {
            registry.teardown();
            tracing::info!("Shortcut registry torn down");
            true
        }
        None => false,
    }
}
