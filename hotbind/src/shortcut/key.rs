//! 物理按键表
//!
//! 按键标识使用 USB HID 键盘用法码（Usage Page 0x07），与平台虚拟键码无关，
//! 可安全持久化。

use global_hotkey::hotkey::Code;

macro_rules! key_table {
    ($($variant:ident = $code:literal, $os:ident, $name:literal, $label:literal;)*) => {
        /// 物理按键
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Key {
            $($variant,)*
        }

        impl Key {
            /// 全部已知按键
            pub const ALL: &'static [Key] = &[$(Key::$variant,)*];

            /// HID 用法码
            pub fn code(self) -> u16 {
                match self {
                    $(Key::$variant => $code,)*
                }
            }

            /// 从 HID 用法码查找按键
            pub fn from_code(code: u16) -> Option<Self> {
                match code {
                    $($code => Some(Key::$variant),)*
                    _ => None,
                }
            }

            /// 对应的平台按键码
            pub fn os_code(self) -> Code {
                match self {
                    $(Key::$variant => Code::$os,)*
                }
            }

            /// 从平台按键码查找按键
            pub fn from_os_code(code: Code) -> Option<Self> {
                match code {
                    $(Code::$os => Some(Key::$variant),)*
                    _ => None,
                }
            }

            /// 规范名称，用于快捷键字符串
            pub fn name(self) -> &'static str {
                match self {
                    $(Key::$variant => $name,)*
                }
            }

            /// 显示用字形
            pub fn label(self) -> &'static str {
                match self {
                    $(Key::$variant => $label,)*
                }
            }
        }
    };
}

key_table! {
    A               = 0x04, KeyA, "A", "A";
    B               = 0x05, KeyB, "B", "B";
    C               = 0x06, KeyC, "C", "C";
    D               = 0x07, KeyD, "D", "D";
    E               = 0x08, KeyE, "E", "E";
    F               = 0x09, KeyF, "F", "F";
    G               = 0x0A, KeyG, "G", "G";
    H               = 0x0B, KeyH, "H", "H";
    I               = 0x0C, KeyI, "I", "I";
    J               = 0x0D, KeyJ, "J", "J";
    K               = 0x0E, KeyK, "K", "K";
    L               = 0x0F, KeyL, "L", "L";
    M               = 0x10, KeyM, "M", "M";
    N               = 0x11, KeyN, "N", "N";
    O               = 0x12, KeyO, "O", "O";
    P               = 0x13, KeyP, "P", "P";
    Q               = 0x14, KeyQ, "Q", "Q";
    R               = 0x15, KeyR, "R", "R";
    S               = 0x16, KeyS, "S", "S";
    T               = 0x17, KeyT, "T", "T";
    U               = 0x18, KeyU, "U", "U";
    V               = 0x19, KeyV, "V", "V";
    W               = 0x1A, KeyW, "W", "W";
    X               = 0x1B, KeyX, "X", "X";
    Y               = 0x1C, KeyY, "Y", "Y";
    Z               = 0x1D, KeyZ, "Z", "Z";
    Digit1          = 0x1E, Digit1, "1", "1";
    Digit2          = 0x1F, Digit2, "2", "2";
    Digit3          = 0x20, Digit3, "3", "3";
    Digit4          = 0x21, Digit4, "4", "4";
    Digit5          = 0x22, Digit5, "5", "5";
    Digit6          = 0x23, Digit6, "6", "6";
    Digit7          = 0x24, Digit7, "7", "7";
    Digit8          = 0x25, Digit8, "8", "8";
    Digit9          = 0x26, Digit9, "9", "9";
    Digit0          = 0x27, Digit0, "0", "0";
    Enter           = 0x28, Enter, "Enter", "↩";
    Escape          = 0x29, Escape, "Escape", "⎋";
    Backspace       = 0x2A, Backspace, "Backspace", "⌫";
    Tab             = 0x2B, Tab, "Tab", "⇥";
    Space           = 0x2C, Space, "Space", "Space";
    Minus           = 0x2D, Minus, "Minus", "-";
    Equal           = 0x2E, Equal, "Equal", "=";
    BracketLeft     = 0x2F, BracketLeft, "BracketLeft", "[";
    BracketRight    = 0x30, BracketRight, "BracketRight", "]";
    Backslash       = 0x31, Backslash, "Backslash", "\\";
    Semicolon       = 0x33, Semicolon, "Semicolon", ";";
    Quote           = 0x34, Quote, "Quote", "'";
    Backquote       = 0x35, Backquote, "Backquote", "`";
    Comma           = 0x36, Comma, "Comma", ",";
    Period          = 0x37, Period, "Period", ".";
    Slash           = 0x38, Slash, "Slash", "/";
    F1              = 0x3A, F1, "F1", "F1";
    F2              = 0x3B, F2, "F2", "F2";
    F3              = 0x3C, F3, "F3", "F3";
    F4              = 0x3D, F4, "F4", "F4";
    F5              = 0x3E, F5, "F5", "F5";
    F6              = 0x3F, F6, "F6", "F6";
    F7              = 0x40, F7, "F7", "F7";
    F8              = 0x41, F8, "F8", "F8";
    F9              = 0x42, F9, "F9", "F9";
    F10             = 0x43, F10, "F10", "F10";
    F11             = 0x44, F11, "F11", "F11";
    F12             = 0x45, F12, "F12", "F12";
    Insert          = 0x49, Insert, "Insert", "Ins";
    Home            = 0x4A, Home, "Home", "↖";
    PageUp          = 0x4B, PageUp, "PageUp", "⇞";
    Delete          = 0x4C, Delete, "Delete", "⌦";
    End             = 0x4D, End, "End", "↘";
    PageDown        = 0x4E, PageDown, "PageDown", "⇟";
    ArrowRight      = 0x4F, ArrowRight, "Right", "→";
    ArrowLeft       = 0x50, ArrowLeft, "Left", "←";
    ArrowDown       = 0x51, ArrowDown, "Down", "↓";
    ArrowUp         = 0x52, ArrowUp, "Up", "↑";
    NumpadDivide    = 0x54, NumpadDivide, "NumpadDivide", "/";
    NumpadMultiply  = 0x55, NumpadMultiply, "NumpadMultiply", "*";
    NumpadSubtract  = 0x56, NumpadSubtract, "NumpadSubtract", "-";
    NumpadAdd       = 0x57, NumpadAdd, "NumpadAdd", "+";
    NumpadEnter     = 0x58, NumpadEnter, "NumpadEnter", "⌤";
    Numpad1         = 0x59, Numpad1, "Numpad1", "1";
    Numpad2         = 0x5A, Numpad2, "Numpad2", "2";
    Numpad3         = 0x5B, Numpad3, "Numpad3", "3";
    Numpad4         = 0x5C, Numpad4, "Numpad4", "4";
    Numpad5         = 0x5D, Numpad5, "Numpad5", "5";
    Numpad6         = 0x5E, Numpad6, "Numpad6", "6";
    Numpad7         = 0x5F, Numpad7, "Numpad7", "7";
    Numpad8         = 0x60, Numpad8, "Numpad8", "8";
    Numpad9         = 0x61, Numpad9, "Numpad9", "9";
    Numpad0         = 0x62, Numpad0, "Numpad0", "0";
    NumpadDecimal   = 0x63, NumpadDecimal, "NumpadDecimal", ".";
    F13             = 0x68, F13, "F13", "F13";
    F14             = 0x69, F14, "F14", "F14";
    F15             = 0x6A, F15, "F15", "F15";
    F16             = 0x6B, F16, "F16", "F16";
    F17             = 0x6C, F17, "F17", "F17";
    F18             = 0x6D, F18, "F18", "F18";
    F19             = 0x6E, F19, "F19", "F19";
    F20             = 0x6F, F20, "F20", "F20";
}

impl Key {
    /// 是否为小键盘按键
    pub fn is_numpad(self) -> bool {
        self.name().starts_with("Numpad")
    }

    /// 按名称查找按键（不区分大小写，支持常用别名）
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if let Some(key) = Self::ALL
            .iter()
            .copied()
            .find(|key| key.name().eq_ignore_ascii_case(name))
        {
            return Some(key);
        }

        let alias = match name.to_ascii_lowercase().as_str() {
            "return" => Key::Enter,
            "esc" => Key::Escape,
            "del" | "forwarddelete" => Key::Delete,
            "arrowup" => Key::ArrowUp,
            "arrowdown" => Key::ArrowDown,
            "arrowleft" => Key::ArrowLeft,
            "arrowright" => Key::ArrowRight,
            "pgup" => Key::PageUp,
            "pgdn" => Key::PageDown,
            "-" => Key::Minus,
            "=" => Key::Equal,
            "[" => Key::BracketLeft,
            "]" => Key::BracketRight,
            "\\" => Key::Backslash,
            ";" => Key::Semicolon,
            "'" => Key::Quote,
            "`" => Key::Backquote,
            "," => Key::Comma,
            "." => Key::Period,
            "/" => Key::Slash,
            _ => return None,
        };
        Some(alias)
    }
}
