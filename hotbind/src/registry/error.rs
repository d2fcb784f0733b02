//! 注册表错误类型

use thiserror::Error;

use crate::bridge::BridgeError;
use crate::shortcut::ShortcutError;
use crate::store::StoreError;

/// 注册表错误
#[derive(Error, Debug)]
pub enum RegistryError {
    /// 名称未声明
    #[error("Shortcut name '{0}' has not been declared")]
    UnknownName(String),

    /// 系统热键错误
    #[error("Hotkey error: {0}")]
    Bridge(#[from] BridgeError),

    /// 存储错误
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// 快捷键错误
    #[error("Shortcut error: {0}")]
    Shortcut(#[from] ShortcutError),
}

/// 注册表的结果类型
pub type RegistryResult<T> = Result<T, RegistryError>;
