//! macOS 符号热键
//!
//! 系统设置中“键盘快捷键”一栏的组合由 `CopySymbolicHotKeys` 提供，每项包含
//! Mac 虚拟键码、Carbon 修饰键标志和启用状态。用户关闭的项不算保留。

#![cfg_attr(not(target_os = "macos"), allow(dead_code))]

use crate::shortcut::{Key, Modifier, ModifierSet, Shortcut};

// Carbon 修饰键标志（HIToolbox/Events.h）
const CMD_KEY: u32 = 1 << 8;
const SHIFT_KEY: u32 = 1 << 9;
const OPTION_KEY: u32 = 1 << 11;
const CONTROL_KEY: u32 = 1 << 12;

/// 未分配按键的项使用的键码
const NO_KEY: u16 = 0xFFFF;

/// 一条系统符号热键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SymbolicHotKey {
    pub virtual_key: u16,
    pub modifiers: u32,
    pub enabled: bool,
}

impl SymbolicHotKey {
    /// 已启用且按键可识别时转换为快捷键
    pub(crate) fn to_shortcut(self) -> Option<Shortcut> {
        if !self.enabled || self.virtual_key == NO_KEY {
            return None;
        }
        let key = key_for_virtual_code(self.virtual_key)?;

        let mut modifiers: ModifierSet = [
            (CMD_KEY, Modifier::Command),
            (SHIFT_KEY, Modifier::Shift),
            (OPTION_KEY, Modifier::Option),
            (CONTROL_KEY, Modifier::Control),
        ]
        .into_iter()
        .filter(|(flag, _)| self.modifiers & flag != 0)
        .map(|(_, modifier)| modifier)
        .collect();
        if key.is_numpad() {
            modifiers.insert(Modifier::NumericPad);
        }

        Some(Shortcut::with_key(key, modifiers))
    }
}

/// 启用的符号热键，按系统返回顺序去重
pub(crate) fn enabled_shortcuts<I>(entries: I) -> Vec<Shortcut>
where
    I: IntoIterator<Item = SymbolicHotKey>,
{
    let mut shortcuts: Vec<Shortcut> = Vec::new();
    for shortcut in entries.into_iter().filter_map(SymbolicHotKey::to_shortcut) {
        if !shortcuts.contains(&shortcut) {
            shortcuts.push(shortcut);
        }
    }
    shortcuts
}

/// Mac 虚拟键码（kVK_*）到按键
fn key_for_virtual_code(code: u16) -> Option<Key> {
    let key = match code {
        0x00 => Key::A,
        0x01 => Key::S,
        0x02 => Key::D,
        0x03 => Key::F,
        0x04 => Key::H,
        0x05 => Key::G,
        0x06 => Key::Z,
        0x07 => Key::X,
        0x08 => Key::C,
        0x09 => Key::V,
        0x0B => Key::B,
        0x0C => Key::Q,
        0x0D => Key::W,
        0x0E => Key::E,
        0x0F => Key::R,
        0x10 => Key::Y,
        0x11 => Key::T,
        0x12 => Key::Digit1,
        0x13 => Key::Digit2,
        0x14 => Key::Digit3,
        0x15 => Key::Digit4,
        0x16 => Key::Digit6,
        0x17 => Key::Digit5,
        0x18 => Key::Equal,
        0x19 => Key::Digit9,
        0x1A => Key::Digit7,
        0x1B => Key::Minus,
        0x1C => Key::Digit8,
        0x1D => Key::Digit0,
        0x1E => Key::BracketRight,
        0x1F => Key::O,
        0x20 => Key::U,
        0x21 => Key::BracketLeft,
        0x22 => Key::I,
        0x23 => Key::P,
        0x24 => Key::Enter,
        0x25 => Key::L,
        0x26 => Key::J,
        0x27 => Key::Quote,
        0x28 => Key::K,
        0x29 => Key::Semicolon,
        0x2A => Key::Backslash,
        0x2B => Key::Comma,
        0x2C => Key::Slash,
        0x2D => Key::N,
        0x2E => Key::M,
        0x2F => Key::Period,
        0x30 => Key::Tab,
        0x31 => Key::Space,
        0x32 => Key::Backquote,
        0x33 => Key::Backspace,
        0x35 => Key::Escape,
        0x40 => Key::F17,
        0x41 => Key::NumpadDecimal,
        0x43 => Key::NumpadMultiply,
        0x45 => Key::NumpadAdd,
        0x4B => Key::NumpadDivide,
        0x4C => Key::NumpadEnter,
        0x4E => Key::NumpadSubtract,
        0x4F => Key::F18,
        0x50 => Key::F19,
        0x52 => Key::Numpad0,
        0x53 => Key::Numpad1,
        0x54 => Key::Numpad2,
        0x55 => Key::Numpad3,
        0x56 => Key::Numpad4,
        0x57 => Key::Numpad5,
        0x58 => Key::Numpad6,
        0x59 => Key::Numpad7,
        0x5A => Key::F20,
        0x5B => Key::Numpad8,
        0x5C => Key::Numpad9,
        0x60 => Key::F5,
        0x61 => Key::F6,
        0x62 => Key::F7,
        0x63 => Key::F3,
        0x64 => Key::F8,
        0x65 => Key::F9,
        0x67 => Key::F11,
        0x69 => Key::F13,
        0x6A => Key::F16,
        0x6B => Key::F14,
        0x6D => Key::F10,
        0x6F => Key::F12,
        0x71 => Key::F15,
        0x72 => Key::Insert,
        0x73 => Key::Home,
        0x74 => Key::PageUp,
        0x75 => Key::Delete,
        0x76 => Key::F4,
        0x77 => Key::End,
        0x78 => Key::F2,
        0x79 => Key::PageDown,
        0x7A => Key::F1,
        0x7B => Key::ArrowLeft,
        0x7C => Key::ArrowRight,
        0x7D => Key::ArrowDown,
        0x7E => Key::ArrowUp,
        _ => return None,
    };
    Some(key)
}

#[cfg(target_os = "macos")]
pub(crate) use carbon::copy_symbolic_hotkeys;

#[cfg(target_os = "macos")]
mod carbon {
    use core_foundation::array::{CFArray, CFArrayRef};
    use core_foundation::base::{CFType, TCFType};
    use core_foundation::boolean::CFBoolean;
    use core_foundation::dictionary::CFDictionary;
    use core_foundation::number::CFNumber;
    use core_foundation::string::CFString;

    use super::SymbolicHotKey;

    #[link(name = "Carbon", kind = "framework")]
    unsafe extern "C" {
        fn CopySymbolicHotKeys(out_hot_key_array: *mut CFArrayRef) -> i32;
    }

    /// 读取当前的系统符号热键
    pub(crate) fn copy_symbolic_hotkeys() -> Result<Vec<SymbolicHotKey>, String> {
        let mut array_ref: CFArrayRef = std::ptr::null();
        // SAFETY: 输出参数指向有效的栈变量
        let status = unsafe { CopySymbolicHotKeys(&mut array_ref) };
        if status != 0 || array_ref.is_null() {
            return Err(format!("CopySymbolicHotKeys returned {status}"));
        }
        // SAFETY: Copy 函数返回的数组归调用方所有
        let array: CFArray<CFDictionary<CFString, CFType>> =
            unsafe { CFArray::wrap_under_create_rule(array_ref) };

        let code_key = CFString::new("kHISymbolicHotKeyCode");
        let modifiers_key = CFString::new("kHISymbolicHotKeyModifiers");
        let enabled_key = CFString::new("kHISymbolicHotKeyEnabled");

        let entries = array
            .iter()
            .filter_map(|entry| {
                let number = |key: &CFString| {
                    entry
                        .find(key)
                        .and_then(|value| value.downcast::<CFNumber>())
                        .and_then(|n| n.to_i64())
                };
                let virtual_key = u16::try_from(number(&code_key)?).ok()?;
                let modifiers = u32::try_from(number(&modifiers_key).unwrap_or(0)).ok()?;
                let enabled = entry
                    .find(&enabled_key)
                    .and_then(|value| value.downcast::<CFBoolean>())
                    .is_some_and(bool::from);
                Some(SymbolicHotKey {
                    virtual_key,
                    modifiers,
                    enabled,
                })
            })
            .collect();
        Ok(entries)
    }
}
