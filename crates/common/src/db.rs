use crate::entities::audit_logs;
use crate::error::Result;
use crate::filter::AuditLogFilter;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter,
};
use std::time::Duration;

/// 工具均为顺序执行，连接池只保留一个连接
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    tracing::debug!(backend = ?db.get_database_backend(), "database connected");
    Ok(db)
}

pub async fn count_logs<C>(db: &C, filter: &AuditLogFilter) -> Result<u64>
where
    C: ConnectionTrait,
{
    let count = audit_logs::Entity::find()
        .filter(filter.condition(db.get_database_backend()))
        .count(db)
        .await?;
    Ok(count)
}
