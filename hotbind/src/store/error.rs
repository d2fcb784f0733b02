//! 存储相关错误类型

use thiserror::Error;

/// 键值存储错误
#[derive(Error, Debug)]
pub enum StoreError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化/反序列化错误
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 存储后端拒绝写入
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// 存储模块的结果类型
pub type StoreResult<T> = Result<T, StoreError>;
