//! 冲突检测
//!
//! 录制得到的候选快捷键在写入前需要检查：是否被系统保留，是否已被其他名称占用。
//! 冲突是正常流程的结果值，不是错误。

mod reserved;
mod symbolic;

pub use reserved::{PlatformShortcuts, StaticShortcuts, SystemShortcuts};

use crate::names::Name;
use crate::shortcut::Shortcut;

/// 冲突检测结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    /// 被系统保留
    Reserved,
    /// 已被其他名称绑定
    TakenBy(Name),
    /// 可用
    Available,
}

impl Conflict {
    pub fn is_available(&self) -> bool {
        matches!(self, Conflict::Available)
    }
}

/// 冲突检测器
pub struct ConflictResolver {
    system: Box<dyn SystemShortcuts>,
    check_system_reserved: bool,
}

impl ConflictResolver {
    pub fn new(system: Box<dyn SystemShortcuts>) -> Self {
        Self {
            system,
            check_system_reserved: true,
        }
    }

    /// 是否检查系统保留快捷键
    pub fn with_system_check(mut self, enabled: bool) -> Self {
        self.check_system_reserved = enabled;
        self
    }

    /// 当前的系统保留快捷键，每次调用都重新查询
    pub fn system_reserved_shortcuts(&self) -> Vec<Shortcut> {
        self.system.reserved_shortcuts()
    }

    /// 检查候选快捷键
    ///
    /// `bound` 为其他名称当前的绑定；`excluding` 本身会被跳过，以便重新录制相同的值。
    /// 比较按系统热键身份进行，只差大写锁定、小键盘或 Fn 标记的组合视为相同。
    /// 结果与遍历顺序无关：多个名称同时匹配时返回名称最小者。
    pub fn check_conflict<'a, I>(&self, candidate: &Shortcut, excluding: &Name, bound: I) -> Conflict
    where
        I: IntoIterator<Item = (&'a Name, &'a Shortcut)>,
    {
        let identity = candidate.hotkey_identity();
        if self.check_system_reserved
            && self
                .system_reserved_shortcuts()
                .iter()
                .any(|reserved| reserved.hotkey_identity() == identity)
        {
            tracing::debug!(shortcut = %candidate, "Candidate shortcut is reserved by the system");
            return Conflict::Reserved;
        }

        let holder = bound
            .into_iter()
            .filter(|(name, shortcut)| *name != excluding && shortcut.hotkey_identity() == identity)
            .map(|(name, _)| name)
            .min_by(|a, b| a.raw_value().cmp(b.raw_value()));

        match holder {
            Some(name) => {
                tracing::debug!(shortcut = %candidate, holder = %name, "Candidate shortcut already taken");
                Conflict::TakenBy(name.clone())
            }
            None => Conflict::Available,
        }
    }
}

impl std::fmt::Debug for ConflictResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConflictResolver")
            .field("check_system_reserved", &self.check_system_reserved)
            .finish_non_exhaustive()
    }
}
