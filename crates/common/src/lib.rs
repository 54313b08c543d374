pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod filter;
pub mod generator;
pub mod models;

// ============ 重新导出常用类型 ============

// 错误处理
pub use error::{AuditError, Result};

// 配置相关
pub use config::AppConfig;

// 过滤条件
pub use filter::AuditLogFilter;

// 模拟数据
pub use generator::MockLogGenerator;

// 领域模型
pub use models::{ActionType, AuditLogEntry, AuditLogPage, EntityType, NewAuditLog, ValueSnapshot};
