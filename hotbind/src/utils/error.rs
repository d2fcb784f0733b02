//! 全局错误处理模块
//!
//! 把各模块的错误聚合为 `AppError`，并提供错误代码、用户提示和恢复建议，
//! 供设置界面等上层直接展示。
//!
//! # 使用示例
//!
//! ```
//! use hotbind::utils::error::{AppError, ErrorCode};
//! use hotbind::Shortcut;
//!
//! fn parse(text: &str) -> Result<Shortcut, AppError> {
//!     Ok(text.parse::<Shortcut>()?)
//! }
//!
//! let err = parse("Command+Nope").unwrap_err();
//! assert_eq!(err.code(), ErrorCode::ShortcutUnsupportedKey);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bridge::BridgeError;
use crate::config::ConfigError;
use crate::registry::RegistryError;
use crate::shortcut::ShortcutError;
use crate::store::StoreError;

/// 应用错误类型
#[derive(Error, Debug)]
pub enum AppError {
    /// 快捷键错误
    #[error("Shortcut error: {0}")]
    Shortcut(#[from] ShortcutError),

    /// 存储错误
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// 系统热键错误
    #[error("Hotkey error: {0}")]
    Bridge(#[from] BridgeError),

    /// 注册表错误
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// 配置错误
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// 错误代码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// 既没有按键也没有修饰键
    ShortcutInvalid,
    /// 不支持的按键
    ShortcutUnsupportedKey,
    /// 存储的数据无法解码
    ShortcutCorrupt,
    /// 文本格式错误
    ShortcutInvalidFormat,

    /// 读写失败
    StoreIoFailed,
    /// 存储数据格式错误
    StoreInvalid,

    /// 系统拒绝注册
    HotkeyRegistrationFailed,
    /// 释放失败
    HotkeyReleaseFailed,
    /// 快捷键已被其他名称占用
    HotkeyAlreadyRegistered,
    /// 系统热键服务不可用
    HotkeyBackendUnavailable,

    /// 名称未声明
    RegistryUnknownName,

    /// 配置加载失败
    ConfigLoadFailed,
    /// 配置无效
    ConfigInvalid,
}

/// 错误上下文信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// 错误代码
    pub code: ErrorCode,
    /// 用户友好的错误消息
    pub message: String,
    /// 详细错误信息（用于日志）
    pub detail: Option<String>,
    /// 恢复建议
    pub recovery_hint: Option<String>,
    /// 是否可恢复
    pub recoverable: bool,
}

impl ErrorContext {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            detail: None,
            recovery_hint: None,
            recoverable: true,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_recovery_hint(mut self, hint: impl Into<String>) -> Self {
        self.recovery_hint = Some(hint.into());
        self
    }

    /// 标记为不可恢复
    pub fn not_recoverable(mut self) -> Self {
        self.recoverable = false;
        self
    }
}

fn shortcut_code(err: &ShortcutError) -> ErrorCode {
    match err {
        ShortcutError::InvalidShortcut => ErrorCode::ShortcutInvalid,
        ShortcutError::UnsupportedKey(_) => ErrorCode::ShortcutUnsupportedKey,
        ShortcutError::CorruptData(_) => ErrorCode::ShortcutCorrupt,
        ShortcutError::InvalidFormat(_) => ErrorCode::ShortcutInvalidFormat,
    }
}

fn store_code(err: &StoreError) -> ErrorCode {
    match err {
        StoreError::Json(_) => ErrorCode::StoreInvalid,
        StoreError::Io(_) | StoreError::Backend(_) => ErrorCode::StoreIoFailed,
    }
}

fn bridge_code(err: &BridgeError) -> ErrorCode {
    match err {
        BridgeError::RegistrationFailed { .. } => ErrorCode::HotkeyRegistrationFailed,
        BridgeError::ReleaseFailed { .. } => ErrorCode::HotkeyReleaseFailed,
        BridgeError::AlreadyRegistered { .. } => ErrorCode::HotkeyAlreadyRegistered,
        BridgeError::BackendUnavailable(_) => ErrorCode::HotkeyBackendUnavailable,
    }
}

impl AppError {
    /// 获取错误代码；注册表错误按其内部来源归类
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Shortcut(e) | AppError::Registry(RegistryError::Shortcut(e)) => {
                shortcut_code(e)
            }
            AppError::Store(e) | AppError::Registry(RegistryError::Store(e)) => store_code(e),
            AppError::Bridge(e) | AppError::Registry(RegistryError::Bridge(e)) => bridge_code(e),
            AppError::Registry(RegistryError::UnknownName(_)) => ErrorCode::RegistryUnknownName,
            AppError::Config(ConfigError::Io(_)) => ErrorCode::ConfigLoadFailed,
            AppError::Config(ConfigError::Json(_)) => ErrorCode::ConfigInvalid,
        }
    }

    /// 获取适合直接显示给用户的错误消息
    pub fn user_message(&self) -> String {
        match self.code() {
            ErrorCode::ShortcutInvalid => "快捷键至少需要一个按键或修饰键".to_string(),
            ErrorCode::ShortcutUnsupportedKey => "不支持该按键，请换一个按键".to_string(),
            ErrorCode::ShortcutCorrupt => "已保存的快捷键数据已损坏".to_string(),
            ErrorCode::ShortcutInvalidFormat => "快捷键格式错误".to_string(),
            ErrorCode::StoreIoFailed => "无法保存快捷键设置".to_string(),
            ErrorCode::StoreInvalid => "快捷键设置文件格式错误".to_string(),
            ErrorCode::HotkeyRegistrationFailed => "无法注册该快捷键，可能已被其他应用占用".to_string(),
            ErrorCode::HotkeyReleaseFailed => "无法注销快捷键".to_string(),
            ErrorCode::HotkeyAlreadyRegistered => "该快捷键已被其他功能使用".to_string(),
            ErrorCode::HotkeyBackendUnavailable => "系统快捷键服务不可用".to_string(),
            ErrorCode::RegistryUnknownName => "未知的快捷键名称".to_string(),
            ErrorCode::ConfigLoadFailed => "无法读取配置文件".to_string(),
            ErrorCode::ConfigInvalid => "配置文件格式错误".to_string(),
        }
    }

    /// 获取完整的错误上下文
    pub fn context(&self) -> ErrorContext {
        let mut ctx = ErrorContext::new(self.code(), self.user_message())
            .with_detail(self.to_string());

        ctx.recovery_hint = self.recovery_hint();

        if !self.is_recoverable() {
            ctx = ctx.not_recoverable();
        }

        ctx
    }

    /// 获取恢复建议
    pub fn recovery_hint(&self) -> Option<String> {
        match self.code() {
            ErrorCode::HotkeyRegistrationFailed => {
                Some("请关闭占用该快捷键的应用，或录制一个新的快捷键".to_string())
            }
            ErrorCode::HotkeyAlreadyRegistered => {
                Some("请先清除另一个功能的快捷键，或选择其他组合".to_string())
            }
            ErrorCode::ShortcutCorrupt => Some("请重置为默认快捷键".to_string()),
            ErrorCode::StoreIoFailed => Some("请检查设置目录的写入权限".to_string()),
            _ => None,
        }
    }

    /// 检查错误是否可恢复
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self.code(),
            ErrorCode::HotkeyBackendUnavailable | ErrorCode::ConfigInvalid
        )
    }

    /// 检查是否是快捷键冲突
    pub fn is_conflict(&self) -> bool {
        matches!(
            self.code(),
            ErrorCode::HotkeyAlreadyRegistered | ErrorCode::HotkeyRegistrationFailed
        )
    }
}

/// 应用结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn registration_failed() -> BridgeError {
        BridgeError::RegistrationFailed {
            shortcut: "⌘T".to_string(),
            reason: "taken".to_string(),
        }
    }

    #[test]
    fn test_error_code() {
        let err = AppError::Shortcut(ShortcutError::InvalidShortcut);
        assert_eq!(err.code(), ErrorCode::ShortcutInvalid);

        let err = AppError::Bridge(registration_failed());
        assert_eq!(err.code(), ErrorCode::HotkeyRegistrationFailed);

        let err = AppError::Registry(RegistryError::UnknownName("x".to_string()));
        assert_eq!(err.code(), ErrorCode::RegistryUnknownName);
    }

    #[test]
    fn test_registry_error_uses_inner_code() {
        let err = AppError::from(RegistryError::Bridge(registration_failed()));
        assert_eq!(err.code(), ErrorCode::HotkeyRegistrationFailed);
        assert!(err.is_conflict());
    }

    #[test]
    fn test_user_message() {
        let err = AppError::Bridge(registration_failed());
        assert!(err.user_message().contains("快捷键"));

        let err = AppError::Store(StoreError::Backend("disk full".to_string()));
        assert_eq!(err.code(), ErrorCode::StoreIoFailed);
        assert!(err.user_message().contains("保存"));
    }

    #[test]
    fn test_error_context() {
        let err = AppError::Bridge(registration_failed());
        let ctx = err.context();

        assert_eq!(ctx.code, ErrorCode::HotkeyRegistrationFailed);
        assert!(!ctx.message.is_empty());
        assert!(ctx.detail.is_some());
        assert!(ctx.recovery_hint.is_some());
        assert!(ctx.recoverable);
    }

    #[test]
    fn test_recoverable() {
        let err = AppError::Shortcut(ShortcutError::UnsupportedKey("F24".to_string()));
        assert!(err.is_recoverable());

        let err = AppError::Bridge(BridgeError::BackendUnavailable("no display".to_string()));
        assert!(!err.is_recoverable());
        assert!(!err.context().recoverable);
    }

    #[test]
    fn test_error_code_serialization() {
        let code = ErrorCode::HotkeyAlreadyRegistered;
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"HOTKEY_ALREADY_REGISTERED\"");

        let deserialized: ErrorCode = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, code);
    }

    #[test]
    fn test_error_context_serialization() {
        let ctx = ErrorContext::new(ErrorCode::ShortcutCorrupt, "Test message")
            .with_detail("Detailed error")
            .with_recovery_hint("Reset");

        let json = serde_json::to_string(&ctx).unwrap();
        assert!(json.contains("SHORTCUT_CORRUPT"));

        let deserialized: ErrorContext = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.code, ErrorCode::ShortcutCorrupt);
        assert_eq!(deserialized.message, "Test message");
    }
}
