//! 热键桥接相关错误类型

use thiserror::Error;

/// 热键桥接错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BridgeError {
    /// 系统拒绝注册热键
    #[error("Failed to register hotkey '{shortcut}': {reason}")]
    RegistrationFailed { shortcut: String, reason: String },

    /// 系统注销热键失败
    #[error("Failed to release hotkey '{shortcut}': {reason}")]
    ReleaseFailed { shortcut: String, reason: String },

    /// 快捷键已被另一个名称注册
    #[error("Hotkey '{shortcut}' is already registered for '{holder}'")]
    AlreadyRegistered { shortcut: String, holder: String },

    /// 系统热键服务不可用
    #[error("Global hotkey backend is not available: {0}")]
    BackendUnavailable(String),
}

/// 桥接模块的结果类型
pub type BridgeResult<T> = Result<T, BridgeError>;
