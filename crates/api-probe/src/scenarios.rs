use crate::client::AuditApiClient;
use audit_common::config::AppConfig;
use audit_common::filter::recent_window_start;
use audit_common::{AuditLogFilter, AuditLogPage};
use chrono::NaiveDate;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub label: String,
    pub filter: AuditLogFilter,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeSummary {
    pub passed: usize,
    pub failed: usize,
}

/// 各场景相互独立，依次执行
pub fn default_scenarios(config: &AppConfig, today: NaiveDate) -> Vec<Scenario> {
    let since = recent_window_start(today, config.recent_window_days);
    vec![
        Scenario {
            label: format!("all logs (limit {})", config.probe_limit),
            filter: AuditLogFilter::with_limit(config.probe_limit),
        },
        Scenario {
            label: format!(
                "date filter (past {} days, since {})",
                config.recent_window_days, since
            ),
            filter: AuditLogFilter::since(since),
        },
        Scenario {
            label: format!("performed by name ({})", config.performed_by_name),
            filter: AuditLogFilter::by_performer_name(config.performed_by_name.clone()),
        },
        Scenario {
            label: format!("employee number ({})", config.employee_number),
            filter: AuditLogFilter::by_employee_number(config.employee_number.clone()),
        },
        Scenario {
            label: format!("action type ({})", config.action_type),
            filter: AuditLogFilter::by_action_type(config.action_type),
        },
    ]
}

/// 校验返回页是否符合过滤条件，返回发现的问题
pub fn check_page(filter: &AuditLogFilter, page: &AuditLogPage) -> Vec<String> {
    let mut problems = Vec::new();
    let fetched = page.logs.len() as u64;

    if let Some(limit) = filter.limit {
        if fetched > limit {
            problems.push(format!("returned {fetched} logs but limit was {limit}"));
        }
    }
    if fetched > page.pagination.total {
        problems.push(format!(
            "returned {fetched} logs but pagination total is {}",
            page.pagination.total
        ));
    }
    for entry in page.logs.iter().filter(|entry| !filter.matches(entry)) {
        problems.push(format!(
            "log {} does not match filter (action_type={}, performed_by_name={})",
            entry.id.map_or_else(|| "?".to_string(), |id| id.to_string()),
            entry.action_type,
            entry.performed_by_name.as_deref().unwrap_or("-"),
        ));
    }
    problems
}

pub async fn run_scenarios(client: &AuditApiClient, scenarios: &[Scenario]) -> ProbeSummary {
    let mut summary = ProbeSummary::default();
    if !client.is_authenticated() {
        warn!("running scenarios without a token, every request will be rejected");
    }

    for (idx, scenario) in scenarios.iter().enumerate() {
        info!("{}. {}", idx + 1, scenario.label);
        match client.fetch_logs(&scenario.filter).await {
            Ok(page) => {
                info!(
                    fetched = page.logs.len(),
                    total = page.pagination.total,
                    "fetched logs"
                );
                let problems = check_page(&scenario.filter, &page);
                if problems.is_empty() {
                    summary.passed += 1;
                } else {
                    for problem in &problems {
                        warn!("{}: {}", scenario.label, problem);
                    }
                    summary.failed += 1;
                }
            }
            Err(err) => {
                warn!("{}: fetch failed: {}", scenario.label, err);
                summary.failed += 1;
            }
        }
    }

    summary
}
