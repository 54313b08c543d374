use anyhow::Result;
use audit_migration::Migrator;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

/// 连接数据库并确保 audit_logs 表及索引存在
pub async fn init_db(database_url: &str) -> Result<DatabaseConnection> {
    let db = audit_common::db::connect(database_url).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}
