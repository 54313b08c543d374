//! 审计工具统一错误类型定义
//!
//! 三个工具共享的库代码统一使用 `AuditError`，二进制入口再转换为 `anyhow::Error`。

use thiserror::Error;

/// 审计工具统一错误类型
#[derive(Error, Debug)]
pub enum AuditError {
    /// 配置缺失或格式错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 无法识别的枚举值（动作类型、实体类型等）
    #[error("无效取值: {0}")]
    InvalidValue(String),

    /// 数据库错误
    #[error("数据库错误: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 其他内部错误
    #[error("内部错误: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AuditError {
    /// 创建配置错误
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// 创建无效取值错误
    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }

    /// 判断是否由配置问题引起，调用方可据此给出更明确的提示
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidValue(_))
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;

/// SeaORM 事务错误转换
impl<T> From<sea_orm::TransactionError<T>> for AuditError
where
    T: Into<AuditError>,
{
    fn from(err: sea_orm::TransactionError<T>) -> Self {
        match err {
            sea_orm::TransactionError::Connection(db) => Self::Database(db),
            sea_orm::TransactionError::Transaction(app) => app.into(),
        }
    }
}
