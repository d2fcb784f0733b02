//! 修饰键集合

use std::fmt;

use serde::{Deserialize, Serialize};

/// 单个修饰键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Modifier {
    Shift,
    Control,
    /// Option / Alt
    Option,
    /// Command / Super / Windows 键
    Command,
    CapsLock,
    /// 小键盘按键标记
    NumericPad,
    Function,
}

impl Modifier {
    /// 全部修饰键，顺序即集合的迭代顺序
    pub const ALL: [Modifier; 7] = [
        Modifier::Function,
        Modifier::Control,
        Modifier::Option,
        Modifier::Shift,
        Modifier::Command,
        Modifier::CapsLock,
        Modifier::NumericPad,
    ];

    fn bit(self) -> u8 {
        match self {
            Modifier::Shift => 1 << 0,
            Modifier::Control => 1 << 1,
            Modifier::Option => 1 << 2,
            Modifier::Command => 1 << 3,
            Modifier::CapsLock => 1 << 4,
            Modifier::NumericPad => 1 << 5,
            Modifier::Function => 1 << 6,
        }
    }

    /// 显示用字形；小键盘标记不显示
    pub fn glyph(self) -> &'static str {
        match self {
            Modifier::Function => "fn",
            Modifier::Control => "⌃",
            Modifier::Option => "⌥",
            Modifier::Shift => "⇧",
            Modifier::Command => "⌘",
            Modifier::CapsLock => "⇪",
            Modifier::NumericPad => "",
        }
    }

    /// 快捷键字符串中的规范名称
    pub fn name(self) -> &'static str {
        match self {
            Modifier::Shift => "Shift",
            Modifier::Control => "Control",
            Modifier::Option => "Option",
            Modifier::Command => "Command",
            Modifier::CapsLock => "CapsLock",
            Modifier::NumericPad => "NumericPad",
            Modifier::Function => "Fn",
        }
    }

    /// 按名称解析修饰键（不区分大小写）
    pub fn from_name(name: &str) -> Option<Self> {
        let modifier = match name.trim().to_ascii_lowercase().as_str() {
            "shift" => Modifier::Shift,
            "ctrl" | "control" => Modifier::Control,
            "alt" | "option" | "opt" => Modifier::Option,
            "cmd" | "command" | "meta" | "super" | "win" => Modifier::Command,
            "commandorcontrol" | "cmdorctrl" => {
                if cfg!(target_os = "macos") {
                    Modifier::Command
                } else {
                    Modifier::Control
                }
            }
            "capslock" => Modifier::CapsLock,
            "numericpad" | "numpad" => Modifier::NumericPad,
            "fn" | "function" => Modifier::Function,
            _ => return None,
        };
        Some(modifier)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 修饰键集合
///
/// 通过 [`Modifier`] 枚举操作，序列化为修饰键名称数组。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Modifier>", into = "Vec<Modifier>")]
pub struct ModifierSet {
    bits: u8,
}

impl ModifierSet {
    /// 空集合
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn contains(&self, modifier: Modifier) -> bool {
        self.bits & modifier.bit() != 0
    }

    pub fn insert(&mut self, modifier: Modifier) {
        self.bits |= modifier.bit();
    }

    pub fn remove(&mut self, modifier: Modifier) {
        self.bits &= !modifier.bit();
    }

    /// 添加修饰键，返回新集合
    pub fn with(mut self, modifier: Modifier) -> Self {
        self.insert(modifier);
        self
    }

    /// 移除修饰键，返回新集合
    pub fn without(mut self, modifier: Modifier) -> Self {
        self.remove(modifier);
        self
    }

    /// 按 [`Modifier::ALL`] 的顺序迭代
    pub fn iter(&self) -> impl Iterator<Item = Modifier> + '_ {
        Modifier::ALL.into_iter().filter(|m| self.contains(*m))
    }
}

impl FromIterator<Modifier> for ModifierSet {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        let mut set = ModifierSet::empty();
        for modifier in iter {
            set.insert(modifier);
        }
        set
    }
}

impl<const N: usize> From<[Modifier; N]> for ModifierSet {
    fn from(modifiers: [Modifier; N]) -> Self {
        modifiers.into_iter().collect()
    }
}

impl From<Vec<Modifier>> for ModifierSet {
    fn from(modifiers: Vec<Modifier>) -> Self {
        modifiers.into_iter().collect()
    }
}

impl From<ModifierSet> for Vec<Modifier> {
    fn from(set: ModifierSet) -> Self {
        set.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove() {
        let mut set = ModifierSet::empty();
        assert!(set.is_empty());

        set.insert(Modifier::Command);
        set.insert(Modifier::Shift);
        assert!(set.contains(Modifier::Command));
        assert!(set.contains(Modifier::Shift));
        assert!(!set.contains(Modifier::Option));
        assert_eq!(set.len(), 2);

        set.remove(Modifier::Command);
        assert!(!set.contains(Modifier::Command));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_iteration_order_is_canonical() {
        let set = ModifierSet::from([Modifier::Command, Modifier::Shift, Modifier::Control]);
        let order: Vec<Modifier> = set.iter().collect();
        assert_eq!(
            order,
            vec![Modifier::Control, Modifier::Shift, Modifier::Command]
        );
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let a = ModifierSet::from([Modifier::Shift, Modifier::Option]);
        let b = ModifierSet::from([Modifier::Option, Modifier::Shift]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_serialize_as_names() {
        let set = ModifierSet::from([Modifier::Command, Modifier::CapsLock]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["command","capsLock"]"#);

        let parsed: ModifierSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, set);
    }

    #[test]
    fn test_from_name_aliases() {
        assert_eq!(Modifier::from_name("cmd"), Some(Modifier::Command));
        assert_eq!(Modifier::from_name("Ctrl"), Some(Modifier::Control));
        assert_eq!(Modifier::from_name("ALT"), Some(Modifier::Option));
        assert_eq!(Modifier::from_name("fn"), Some(Modifier::Function));
        assert_eq!(Modifier::from_name("hyper"), None);
    }
}
