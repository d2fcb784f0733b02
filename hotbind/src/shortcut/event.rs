//! 原始按键事件
//!
//! 录制控件从窗口系统收到的按键事件经由此类型转换为 [`Shortcut`]。

use global_hotkey::hotkey::{Code, HotKey, Modifiers};

use super::error::{ShortcutError, ShortcutResult};
use super::key::Key;
use super::modifier::{Modifier, ModifierSet};
use super::Shortcut;

/// 原始按键事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyEvent {
    /// 物理按键码
    pub code: Code,
    /// 事件发生时按下的修饰键
    pub modifiers: Modifiers,
}

impl RawKeyEvent {
    pub fn new(code: Code, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }
}

/// 将平台修饰键标志转换为修饰键集合
pub(crate) fn modifiers_from_os(modifiers: Modifiers) -> ModifierSet {
    let mut set = ModifierSet::empty();
    if modifiers.contains(Modifiers::SHIFT) {
        set.insert(Modifier::Shift);
    }
    if modifiers.contains(Modifiers::CONTROL) {
        set.insert(Modifier::Control);
    }
    if modifiers.contains(Modifiers::ALT) {
        set.insert(Modifier::Option);
    }
    if modifiers.intersects(Modifiers::META | Modifiers::SUPER) {
        set.insert(Modifier::Command);
    }
    if modifiers.contains(Modifiers::CAPS_LOCK) {
        set.insert(Modifier::CapsLock);
    }
    if modifiers.contains(Modifiers::FN) {
        set.insert(Modifier::Function);
    }
    set
}

/// 系统注册时有意义的修饰键
///
/// 大写锁定、小键盘和 Fn 标记不参与全局热键注册。
fn is_registrable(modifier: Modifier) -> bool {
    matches!(
        modifier,
        Modifier::Shift | Modifier::Control | Modifier::Option | Modifier::Command
    )
}

/// 将修饰键集合转换为平台可注册的修饰键标志
pub(crate) fn modifiers_to_os(set: ModifierSet) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    for modifier in set.iter() {
        match modifier {
            Modifier::Shift => modifiers |= Modifiers::SHIFT,
            Modifier::Control => modifiers |= Modifiers::CONTROL,
            Modifier::Option => modifiers |= Modifiers::ALT,
            Modifier::Command => modifiers |= Modifiers::META,
            Modifier::CapsLock | Modifier::NumericPad | Modifier::Function => {}
        }
    }
    modifiers
}

/// 快捷键在系统中的身份
///
/// 系统只按按键和可注册的修饰键区分热键，因此两个不相等的 [`Shortcut`]
/// 可能对应同一个系统热键。冲突检测和桥接层的重复检查都以此为准。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HotKeyIdentity {
    key: Option<Key>,
    modifiers: ModifierSet,
}

impl HotKeyIdentity {
    pub fn key(&self) -> Option<Key> {
        self.key
    }

    /// 仅含可注册修饰键
    pub fn modifiers(&self) -> ModifierSet {
        self.modifiers
    }

    /// 对应的 `global-hotkey` 热键；纯修饰键组合无法注册，返回 `None`
    pub fn to_hotkey(&self) -> Option<HotKey> {
        let key = self.key?;
        Some(HotKey::new(Some(modifiers_to_os(self.modifiers)), key.os_code()))
    }
}

impl Shortcut {
    /// 系统热键身份
    pub fn hotkey_identity(&self) -> HotKeyIdentity {
        HotKeyIdentity {
            key: self.key(),
            modifiers: self
                .modifiers()
                .iter()
                .filter(|m| is_registrable(*m))
                .collect(),
        }
    }

    /// 两个快捷键是否对应同一个系统热键
    pub fn same_hotkey(&self, other: &Shortcut) -> bool {
        self.hotkey_identity() == other.hotkey_identity()
    }

    /// 从原始按键事件解析快捷键
    ///
    /// 按键无法映射时返回 [`ShortcutError::UnsupportedKey`]。
    pub fn from_key_event(event: &RawKeyEvent) -> ShortcutResult<Self> {
        let key = Key::from_os_code(event.code)
            .ok_or_else(|| ShortcutError::UnsupportedKey(format!("{:?}", event.code)))?;

        let mut modifiers = modifiers_from_os(event.modifiers);
        if key.is_numpad() {
            modifiers.insert(Modifier::NumericPad);
        }

        Shortcut::new(Some(key), modifiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key_event() {
        let event = RawKeyEvent::new(Code::KeyT, Modifiers::META | Modifiers::SHIFT);
        let shortcut = Shortcut::from_key_event(&event).unwrap();

        assert_eq!(shortcut.key(), Some(Key::T));
        assert!(shortcut.modifiers().contains(Modifier::Command));
        assert!(shortcut.modifiers().contains(Modifier::Shift));
        assert_eq!(shortcut.modifiers().len(), 2);
    }

    #[test]
    fn test_from_key_event_marks_numpad() {
        let event = RawKeyEvent::new(Code::Numpad4, Modifiers::CONTROL);
        let shortcut = Shortcut::from_key_event(&event).unwrap();

        assert_eq!(shortcut.key(), Some(Key::Numpad4));
        assert!(shortcut.modifiers().contains(Modifier::NumericPad));
    }

    #[test]
    fn test_from_key_event_unsupported() {
        let event = RawKeyEvent::new(Code::MediaPlayPause, Modifiers::empty());
        let result = Shortcut::from_key_event(&event);
        assert!(matches!(result, Err(ShortcutError::UnsupportedKey(_))));
    }

    #[test]
    fn test_os_modifier_conversion() {
        let set = ModifierSet::from([Modifier::Command, Modifier::Option, Modifier::CapsLock]);
        let os = modifiers_to_os(set);
        assert_eq!(os, Modifiers::META | Modifiers::ALT);

        let back = modifiers_from_os(os);
        assert_eq!(back, ModifierSet::from([Modifier::Command, Modifier::Option]));
    }

    #[test]
    fn test_identity_ignores_unregistrable_flags() {
        let plain = Shortcut::with_key(Key::T, [Modifier::Command]);
        let caps = Shortcut::with_key(Key::T, [Modifier::Command, Modifier::CapsLock]);
        let fn_key = Shortcut::with_key(Key::T, [Modifier::Command, Modifier::Function]);

        assert_ne!(plain, caps);
        assert!(plain.same_hotkey(&caps));
        assert!(plain.same_hotkey(&fn_key));
        assert!(!plain.same_hotkey(&Shortcut::with_key(Key::T, [Modifier::Control])));
    }

    #[test]
    fn test_recorded_numpad_matches_parsed() {
        let recorded =
            Shortcut::from_key_event(&RawKeyEvent::new(Code::Numpad4, Modifiers::CONTROL)).unwrap();
        let parsed: Shortcut = "Control+Numpad4".parse().unwrap();

        assert!(recorded.same_hotkey(&parsed));
        assert_eq!(
            recorded.hotkey_identity().to_hotkey().map(|h| h.id()),
            parsed.hotkey_identity().to_hotkey().map(|h| h.id())
        );
    }

    #[test]
    fn test_modifier_only_identity_has_no_hotkey() {
        let shortcut = Shortcut::new(None, [Modifier::Command, Modifier::CapsLock]).unwrap();
        let identity = shortcut.hotkey_identity();
        assert_eq!(identity.modifiers(), ModifierSet::from([Modifier::Command]));
        assert!(identity.to_hotkey().is_none());
    }
}
