//! 录制会话
//!
//! 用户在录制控件中输入新组合时暂停全局快捷键分发，防止录制过程中触发回调。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 进程级暂停标志
///
/// 为 true 时桥接层的分发路径不调用任何回调，系统注册保持不变。
#[derive(Debug, Clone, Default)]
pub struct PauseFlag(Arc<AtomicBool>);

impl PauseFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// 设置标志，返回之前的值
    fn replace(&self, paused: bool) -> bool {
        self.0.swap(paused, Ordering::SeqCst)
    }
}

/// 录制会话控制器
///
/// 嵌套的 `begin`/`end` 只产生一次标志变化；未调用 `begin` 时 `end` 是空操作。
#[derive(Debug, Clone, Default)]
pub struct RecordingSession {
    flag: PauseFlag,
}

impl RecordingSession {
    pub fn new(flag: PauseFlag) -> Self {
        Self { flag }
    }

    pub fn pause_flag(&self) -> &PauseFlag {
        &self.flag
    }

    /// 开始录制，返回是否发生了状态变化
    pub fn begin(&self) -> bool {
        let was_paused = self.flag.replace(true);
        if !was_paused {
            tracing::info!("Shortcut recording started, dispatch paused");
        }
        !was_paused
    }

    /// 结束录制，返回是否发生了状态变化
    pub fn end(&self) -> bool {
        let was_paused = self.flag.replace(false);
        if was_paused {
            tracing::info!("Shortcut recording ended, dispatch resumed");
        }
        was_paused
    }

    pub fn is_recording(&self) -> bool {
        self.flag.is_paused()
    }

    /// 开始录制并返回守卫，守卫释放时结束录制
    pub fn scoped(&self) -> RecordingGuard<'_> {
        self.begin();
        RecordingGuard { session: self }
    }
}

/// 录制守卫
#[must_use = "recording ends as soon as the guard is dropped"]
pub struct RecordingGuard<'a> {
    session: &'a RecordingSession,
}

impl Drop for RecordingGuard<'_> {
    fn drop(&mut self) {
        self.session.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_end() {
        let session = RecordingSession::default();
        assert!(!session.is_recording());

        assert!(session.begin());
        assert!(session.is_recording());
        assert!(session.pause_flag().is_paused());

        assert!(session.end());
        assert!(!session.is_recording());
    }

    #[test]
    fn test_nested_calls_collapse() {
        let session = RecordingSession::default();
        assert!(session.begin());
        assert!(!session.begin());
        assert!(session.end());
        assert!(!session.end());
        assert!(!session.is_recording());
    }

    #[test]
    fn test_end_without_begin_is_noop() {
        let session = RecordingSession::default();
        assert!(!session.end());
        assert!(!session.is_recording());
    }

    #[test]
    fn test_shared_flag() {
        let flag = PauseFlag::new();
        let session = RecordingSession::new(flag.clone());
        session.begin();
        assert!(flag.is_paused());
        session.end();
        assert!(!flag.is_paused());
    }

    #[test]
    fn test_scoped_guard() {
        let session = RecordingSession::default();
        {
            let _guard = session.scoped();
            assert!(session.is_recording());
        }
        assert!(!session.is_recording());
    }
}
