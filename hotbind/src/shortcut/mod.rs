//! 快捷键数据模型
//!
//! [`Shortcut`] 是不可变的按键 + 修饰键组合，提供：
//!
//! - 构造校验（空组合无效）
//! - 从原始按键事件解析（[`RawKeyEvent`]）
//! - 存储编码/解码（[`Shortcut::encode`] / [`Shortcut::decode`]）
//! - 显示字形（[`Shortcut::display_string`]）和快捷键字符串（`"Command+Shift+T"`）

mod error;
mod event;
mod key;
mod modifier;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use error::{ShortcutError, ShortcutResult};
pub use event::{HotKeyIdentity, RawKeyEvent};
pub use key::Key;
pub use modifier::{Modifier, ModifierSet};

/// 按键 + 修饰键组合
///
/// 相等性和哈希仅由 `(key, modifiers)` 决定。系统是否视为同一热键见
/// [`Shortcut::hotkey_identity`]。
///
/// # Examples
///
/// ```
/// use hotbind::shortcut::{Key, Modifier, ModifierSet, Shortcut};
///
/// let shortcut = Shortcut::new(
///     Some(Key::T),
///     ModifierSet::from([Modifier::Command, Modifier::Shift]),
/// )
/// .unwrap();
/// assert_eq!(shortcut.display_string(), "⇧⌘T");
/// assert_eq!(shortcut.to_string(), "Shift+Command+T");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shortcut {
    key: Option<Key>,
    modifiers: ModifierSet,
}

/// 存储格式
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredShortcut {
    #[serde(default)]
    key_code: Option<u16>,
    #[serde(default)]
    modifiers: ModifierSet,
}

impl Shortcut {
    /// 创建快捷键
    ///
    /// 按键和修饰键都为空时返回 [`ShortcutError::InvalidShortcut`]。
    pub fn new(key: Option<Key>, modifiers: impl Into<ModifierSet>) -> ShortcutResult<Self> {
        let modifiers = modifiers.into();
        if key.is_none() && modifiers.is_empty() {
            return Err(ShortcutError::InvalidShortcut);
        }
        Ok(Self { key, modifiers })
    }

    /// 带按键的快捷键，总是有效
    pub fn with_key(key: Key, modifiers: impl Into<ModifierSet>) -> Self {
        Self {
            key: Some(key),
            modifiers: modifiers.into(),
        }
    }

    pub fn key(&self) -> Option<Key> {
        self.key
    }

    pub fn modifiers(&self) -> ModifierSet {
        self.modifiers
    }

    /// 编码为存储用字节
    pub fn encode(&self) -> Vec<u8> {
        let stored = StoredShortcut {
            key_code: self.key.map(Key::code),
            modifiers: self.modifiers,
        };
        // 仅含整数和枚举名，序列化不会失败
        serde_json::to_vec(&stored).unwrap_or_default()
    }

    /// 从存储字节解码
    ///
    /// 任何格式错误都返回 [`ShortcutError::CorruptData`]。
    pub fn decode(bytes: &[u8]) -> ShortcutResult<Self> {
        let stored: StoredShortcut = serde_json::from_slice(bytes)
            .map_err(|e| ShortcutError::CorruptData(e.to_string()))?;

        let key = match stored.key_code {
            Some(code) => Some(Key::from_code(code).ok_or_else(|| {
                ShortcutError::CorruptData(format!("unknown key code {code:#x}"))
            })?),
            None => None,
        };

        Shortcut::new(key, stored.modifiers)
            .map_err(|e| ShortcutError::CorruptData(e.to_string()))
    }

    /// 人类可读的字形序列，如 `⌃⌥⌘Space`
    pub fn display_string(&self) -> String {
        let mut out = String::new();
        for modifier in self.modifiers.iter() {
            out.push_str(modifier.glyph());
        }
        if let Some(key) = self.key {
            out.push_str(key.label());
        }
        out
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<&str> = self.modifiers.iter().map(Modifier::name).collect();
        if let Some(key) = self.key {
            parts.push(key.name());
        }
        f.write_str(&parts.join("+"))
    }
}

impl FromStr for Shortcut {
    type Err = ShortcutError;

    /// 解析 `"Command+Shift+T"` 形式的快捷键字符串
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ShortcutError::InvalidShortcut);
        }

        let mut modifiers = ModifierSet::empty();
        let mut key = None;
        let tokens: Vec<&str> = s.split('+').map(str::trim).collect();

        for (index, token) in tokens.iter().enumerate() {
            if token.is_empty() {
                return Err(ShortcutError::InvalidFormat(s.to_string()));
            }
            if let Some(modifier) = Modifier::from_name(token) {
                modifiers.insert(modifier);
                continue;
            }
            // 按键只能出现在最后
            if index + 1 != tokens.len() {
                return Err(ShortcutError::InvalidFormat(s.to_string()));
            }
            let parsed = Key::from_name(token)
                .ok_or_else(|| ShortcutError::UnsupportedKey(token.to_string()))?;
            key = Some(parsed);
        }

        // 与录制结果保持一致
        if key.is_some_and(Key::is_numpad) {
            modifiers.insert(Modifier::NumericPad);
        }

        Shortcut::new(key, modifiers)
    }
}
