//! 系统保留快捷键
//!
//! 每次调用都重新生成列表，不跨调用缓存：用户可能随时在系统设置中修改这些组合。
//!
//! macOS 上实时读取系统符号热键，读取失败时退回内置列表；其他平台没有可查询的
//! 系统接口，只使用内置列表。

use crate::shortcut::{Key, Modifier, Shortcut};

/// 系统保留快捷键来源
pub trait SystemShortcuts: Send + Sync {
    fn reserved_shortcuts(&self) -> Vec<Shortcut>;
}

impl<F> SystemShortcuts for F
where
    F: Fn() -> Vec<Shortcut> + Send + Sync,
{
    fn reserved_shortcuts(&self) -> Vec<Shortcut> {
        self()
    }
}

/// 固定列表
#[derive(Debug, Clone, Default)]
pub struct StaticShortcuts(pub Vec<Shortcut>);

impl SystemShortcuts for StaticShortcuts {
    fn reserved_shortcuts(&self) -> Vec<Shortcut> {
        self.0.clone()
    }
}

/// 当前平台的系统快捷键
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformShortcuts;

impl SystemShortcuts for PlatformShortcuts {
    #[cfg(target_os = "macos")]
    fn reserved_shortcuts(&self) -> Vec<Shortcut> {
        match super::symbolic::copy_symbolic_hotkeys() {
            Ok(entries) => {
                let shortcuts = super::symbolic::enabled_shortcuts(entries);
                tracing::trace!(count = shortcuts.len(), "Queried system symbolic hotkeys");
                shortcuts
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to query system hotkeys, using built-in list");
                platform_reserved()
            }
        }
    }

    #[cfg(not(target_os = "macos"))]
    fn reserved_shortcuts(&self) -> Vec<Shortcut> {
        platform_reserved()
    }
}

fn combo<const N: usize>(modifiers: [Modifier; N], key: Key) -> Shortcut {
    Shortcut::with_key(key, modifiers)
}

/// 查询失败时使用的内置列表
#[cfg(target_os = "macos")]
fn platform_reserved() -> Vec<Shortcut> {
    use Modifier::{Command, Control, Option as Alt, Shift};

    vec![
        // Spotlight
        combo([Command], Key::Space),
        combo([Command, Alt], Key::Space),
        // 输入法切换
        combo([Control], Key::Space),
        combo([Control, Alt], Key::Space),
        // 应用切换
        combo([Command], Key::Tab),
        combo([Command, Shift], Key::Tab),
        combo([Command], Key::Backquote),
        // 截屏
        combo([Command, Shift], Key::Digit3),
        combo([Command, Shift], Key::Digit4),
        combo([Command, Shift], Key::Digit5),
        combo([Command, Shift], Key::Digit6),
        // 强制退出、锁屏、注销
        combo([Command, Alt], Key::Escape),
        combo([Control, Command], Key::Q),
        combo([Command, Shift], Key::Q),
        combo([Command, Alt], Key::D),
        // 调度中心
        combo([Control], Key::ArrowUp),
        combo([Control], Key::ArrowDown),
        combo([Control], Key::ArrowLeft),
        combo([Control], Key::ArrowRight),
    ]
}

#[cfg(target_os = "windows")]
fn platform_reserved() -> Vec<Shortcut> {
    use Modifier::{Command, Control, Option as Alt};

    vec![
        combo([Command], Key::L),
        combo([Command], Key::D),
        combo([Command], Key::E),
        combo([Command], Key::R),
        combo([Command], Key::Tab),
        combo([Alt], Key::Tab),
        combo([Alt], Key::F4),
        combo([Control, Alt], Key::Delete),
    ]
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn platform_reserved() -> Vec<Shortcut> {
    use Modifier::{Command, Option as Alt};

    vec![
        combo([Alt], Key::Tab),
        combo([Alt], Key::F4),
        combo([Command], Key::L),
        combo([Command], Key::D),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_list_is_not_empty() {
        let list = platform_reserved();
        assert!(!list.is_empty());
        assert!(list.iter().all(|s| s.key().is_some()));
    }

    #[test]
    fn test_platform_shortcuts_have_keys() {
        let list = PlatformShortcuts.reserved_shortcuts();
        assert!(list.iter().all(|s| s.key().is_some()));
    }

    #[test]
    fn test_closure_provider_is_queried_every_time() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let provider = move || {
            counter.fetch_add(1, Ordering::SeqCst);
            vec![combo([Modifier::Command], Key::Space)]
        };

        provider.reserved_shortcuts();
        provider.reserved_shortcuts();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
