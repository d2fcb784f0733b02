//! 快捷键相关错误类型

use thiserror::Error;

/// 快捷键相关错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShortcutError {
    /// 既没有按键也没有修饰键的组合
    #[error("Invalid shortcut: a shortcut needs a key or at least one modifier")]
    InvalidShortcut,

    /// 原始按键无法映射到已知按键
    #[error("Unsupported key: {0}")]
    UnsupportedKey(String),

    /// 存储的快捷键数据无法解码
    #[error("Corrupt shortcut data: {0}")]
    CorruptData(String),

    /// 快捷键字符串格式错误
    #[error("Invalid shortcut format: {0}")]
    InvalidFormat(String),
}

/// 快捷键模块的结果类型
pub type ShortcutResult<T> = Result<T, ShortcutError>;
