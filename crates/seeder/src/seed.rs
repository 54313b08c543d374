use audit_common::db::count_logs;
use audit_common::entities::audit_logs;
use audit_common::{AuditError, AuditLogFilter, MockLogGenerator, NewAuditLog};
use rand::Rng;
use sea_orm::{DatabaseConnection, EntityTrait, TransactionTrait};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub before: u64,
    pub inserted: u64,
    pub after: u64,
}

impl SeedReport {
    /// 期间若有其他写入方，总数增量会与插入行数不一致
    pub fn is_consistent(&self) -> bool {
        self.after.checked_sub(self.before) == Some(self.inserted)
    }
}

/// 单条 INSERT 的行数上限，每行 12 个绑定参数，需低于各数据库的变量数限制
const INSERT_CHUNK_ROWS: usize = 500;

/// 在单个事务中分块批量插入，统一提交，失败时整体回滚
pub async fn insert_batch(
    db: &DatabaseConnection,
    logs: Vec<NewAuditLog>,
) -> Result<u64, AuditError> {
    if logs.is_empty() {
        return Ok(0);
    }

    let models: Vec<audit_logs::ActiveModel> = logs.into_iter().map(Into::into).collect();
    let inserted = db
        .transaction::<_, u64, AuditError>(|txn| {
            Box::pin(async move {
                let mut rows = 0;
                for chunk in models.chunks(INSERT_CHUNK_ROWS) {
                    rows += audit_logs::Entity::insert_many(chunk.to_vec())
                        .exec_without_returning(txn)
                        .await?;
                }
                Ok(rows)
            })
        })
        .await?;
    Ok(inserted)
}

pub async fn run_seed<R: Rng>(
    db: &DatabaseConnection,
    generator: &mut MockLogGenerator<R>,
    count: usize,
) -> Result<SeedReport, AuditError> {
    let all = AuditLogFilter::default();
    let before = count_logs(db, &all).await?;

    let logs = generator.generate(count);
    info!(count, "inserting mock audit logs");
    let inserted = insert_batch(db, logs).await?;
    info!(inserted, "successfully inserted audit logs");

    let after = count_logs(db, &all).await?;
    info!(total = after, "total audit logs in database");

    let report = SeedReport {
        before,
        inserted,
        after,
    };
    if !report.is_consistent() {
        warn!(
            before,
            inserted,
            after,
            "row count changed by a different amount than inserted; another writer may be active"
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use audit_common::ActionType;
    use chrono::{DateTime, Utc};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use sea_orm::{ColumnTrait, QueryFilter};

    fn generator(seed: u64) -> MockLogGenerator<StdRng> {
        let now = DateTime::parse_from_rfc3339("2026-10-18T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        MockLogGenerator::with_rng(StdRng::seed_from_u64(seed), now)
    }

    #[tokio::test]
    async fn test_seed_increases_total_by_count() {
        let db = init_db("sqlite::memory:").await.unwrap();

        let first = run_seed(&db, &mut generator(1), 400).await.unwrap();
        assert_eq!(first, SeedReport { before: 0, inserted: 400, after: 400 });

        // 再次运行时表已存在，总数继续累加
        let second = run_seed(&db, &mut generator(2), 25).await.unwrap();
        assert_eq!(second.before, 400);
        assert_eq!(second.after, 425);
        assert!(second.is_consistent());
    }

    #[tokio::test]
    async fn test_inserted_rows_keep_generated_values() {
        let db = init_db("sqlite::memory:").await.unwrap();
        let logs = generator(3).generate(60);
        let expected_add_days = logs
            .iter()
            .filter(|l| l.action_type == ActionType::AddDays)
            .count();
        insert_batch(&db, logs).await.unwrap();

        let rows = audit_logs::Entity::find()
            .filter(audit_logs::Column::ActionType.eq("ADD_DAYS"))
            .all(&db)
            .await
            .unwrap();
        assert_eq!(rows.len(), expected_add_days);
        for row in rows {
            let old = row.old_values.unwrap();
            let new = row.new_values.unwrap();
            let delta = new["used_days"].as_i64().unwrap() - old["used_days"].as_i64().unwrap();
            assert!((1..=10).contains(&delta));
            assert_eq!(row.performed_by_type.as_deref(), Some("ADMIN"));
        }
    }

    #[tokio::test]
    async fn test_large_seed_is_split_into_chunks() {
        // 6000 行 × 12 个参数超出 SQLite 单条语句的变量上限
        let db = init_db("sqlite::memory:").await.unwrap();
        let report = run_seed(&db, &mut generator(5), 6000).await.unwrap();
        assert_eq!(report, SeedReport { before: 0, inserted: 6000, after: 6000 });
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        let db = init_db("sqlite::memory:").await.unwrap();
        assert_eq!(insert_batch(&db, Vec::new()).await.unwrap(), 0);
        let report = run_seed(&db, &mut generator(4), 0).await.unwrap();
        assert_eq!(report, SeedReport { before: 0, inserted: 0, after: 0 });
    }

    #[test]
    fn test_report_consistency() {
        assert!(SeedReport { before: 10, inserted: 5, after: 15 }.is_consistent());
        assert!(!SeedReport { before: 10, inserted: 5, after: 17 }.is_consistent());
        assert!(!SeedReport { before: 10, inserted: 5, after: 3 }.is_consistent());
    }
}
