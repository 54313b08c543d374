use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DbBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 索引名与业务系统自建表保持一致，已存在时跳过
const INDEXES: [(&str, AuditLogs); 4] = [
    ("idx_action_type", AuditLogs::ActionType),
    ("idx_entity_type", AuditLogs::EntityType),
    ("idx_performed_by", AuditLogs::PerformedById),
    ("idx_created_at", AuditLogs::CreatedAt),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = audit_logs_table();

        // MySQL 不支持 CREATE INDEX IF NOT EXISTS，索引随建表语句一起声明
        let inline_indexes = manager.get_database_backend() == DbBackend::MySql;
        if inline_indexes {
            for (name, column) in INDEXES {
                table.index(Index::create().name(name).col(column));
            }
        }

        manager.create_table(table).await?;

        if !inline_indexes {
            for (name, column) in INDEXES {
                manager
                    .create_index(
                        Index::create()
                            .name(name)
                            .table(AuditLogs::Table)
                            .col(column)
                            .if_not_exists()
                            .to_owned(),
                    )
                    .await?;
            }
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLogs::Table).if_exists().to_owned())
            .await
    }
}

fn audit_logs_table() -> TableCreateStatement {
    Table::create()
        .table(AuditLogs::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(AuditLogs::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(AuditLogs::ActionType).string_len(50).not_null())
        .col(ColumnDef::new(AuditLogs::EntityType).string_len(50).not_null())
        .col(ColumnDef::new(AuditLogs::EntityId).integer().null())
        .col(ColumnDef::new(AuditLogs::EntityName).string_len(255).null())
        .col(ColumnDef::new(AuditLogs::PerformedById).integer().null())
        .col(ColumnDef::new(AuditLogs::PerformedByType).string_len(50).null())
        .col(ColumnDef::new(AuditLogs::PerformedByName).string_len(255).null())
        .col(ColumnDef::new(AuditLogs::OldValues).json().null())
        .col(ColumnDef::new(AuditLogs::NewValues).json().null())
        .col(ColumnDef::new(AuditLogs::Description).text().null())
        .col(ColumnDef::new(AuditLogs::IpAddress).string_len(45).null())
        .col(
            ColumnDef::new(AuditLogs::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}

#[derive(Iden, Clone, Copy)]
enum AuditLogs {
    Table,
    Id,
    ActionType,
    EntityType,
    EntityId,
    EntityName,
    PerformedById,
    PerformedByType,
    PerformedByName,
    OldValues,
    NewValues,
    Description,
    IpAddress,
    CreatedAt,
}
