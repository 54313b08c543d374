use audit_common::config::AppConfig;
use audit_common::db::count_logs;
use audit_common::filter::recent_window_start;
use audit_common::{AuditError, AuditLogFilter};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountCheck {
    pub label: String,
    pub filter: AuditLogFilter,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    pub total: u64,
    pub counts: Vec<(String, u64)>,
}

impl VerificationReport {
    /// 任一过滤后的数量都不应超过总数
    pub fn violations(&self) -> Vec<String> {
        self.counts
            .iter()
            .filter(|(_, count)| *count > self.total)
            .map(|(label, count)| format!("{label}: {count} exceeds total {}", self.total))
            .collect()
    }
}

/// 与 API 探测相同的过滤条件，直接在数据库上计数
pub fn default_checks(config: &AppConfig, today: NaiveDate) -> Vec<CountCheck> {
    let since = recent_window_start(today, config.recent_window_days);
    vec![
        CountCheck {
            label: format!("logs in last {} days", config.recent_window_days),
            filter: AuditLogFilter::since(since),
        },
        CountCheck {
            label: format!("logs by {}", config.performed_by_name),
            filter: AuditLogFilter::by_performer_name(config.performed_by_name.clone()),
        },
        CountCheck {
            label: format!("logs for employee {}", config.employee_number),
            filter: AuditLogFilter::by_employee_number(config.employee_number.clone()),
        },
        CountCheck {
            label: format!("logs with action {}", config.action_type),
            filter: AuditLogFilter::by_action_type(config.action_type),
        },
    ]
}

pub async fn verify(
    db: &DatabaseConnection,
    checks: &[CountCheck],
) -> Result<VerificationReport, AuditError> {
    let total = count_logs(db, &AuditLogFilter::default()).await?;
    info!(count = total, "total logs");

    let mut counts = Vec::with_capacity(checks.len());
    for check in checks {
        let count = count_logs(db, &check.filter).await?;
        info!(count, "{}", check.label);
        counts.push((check.label.clone(), count));
    }

    Ok(VerificationReport { total, counts })
}
