//! 审计日志过滤条件
//!
//! 同一组过滤字段同时用于三个场景：拼接管理端 API 查询参数、
//! 生成直连数据库的 SQL 条件、以及在内存中校验 API 返回的记录。

use crate::entities::audit_logs;
use crate::models::{ActionType, AuditLogEntry, EntityType};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use sea_orm::sea_query::{Expr, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, DbBackend, prelude::DateTimeWithTimeZone};
use serde_json::Value as JsonValue;

const LIKE_ESCAPE: char = '!';

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLogFilter {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub action_type: Option<ActionType>,
    pub entity_type: Option<EntityType>,
    pub performed_by_id: Option<i32>,
    pub performed_by_name: Option<String>,
    pub employee_number: Option<String>,
}

/// 最近 N 天窗口的起始日期
pub fn recent_window_start(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

impl AuditLogFilter {
    pub fn with_limit(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    pub fn since(start_date: NaiveDate) -> Self {
        Self {
            start_date: Some(start_date),
            ..Default::default()
        }
    }

    pub fn by_performer_name(name: impl Into<String>) -> Self {
        Self {
            performed_by_name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn by_employee_number(number: impl Into<String>) -> Self {
        Self {
            employee_number: Some(number.into()),
            ..Default::default()
        }
    }

    pub fn by_action_type(action_type: ActionType) -> Self {
        Self {
            action_type: Some(action_type),
            ..Default::default()
        }
    }

    /// 管理端 API 的查询参数，仅输出已设置的字段
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(start) = self.start_date {
            pairs.push(("startDate", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("endDate", end.format("%Y-%m-%d").to_string()));
        }
        if let Some(action_type) = self.action_type {
            pairs.push(("actionType", action_type.as_str().to_string()));
        }
        if let Some(entity_type) = self.entity_type {
            pairs.push(("entityType", entity_type.as_str().to_string()));
        }
        if let Some(id) = self.performed_by_id {
            pairs.push(("performedById", id.to_string()));
        }
        if let Some(name) = &self.performed_by_name {
            pairs.push(("performedByName", name.clone()));
        }
        if let Some(number) = &self.employee_number {
            pairs.push(("employeeNumber", number.clone()));
        }
        pairs
    }

    /// 与管理端 API 相同语义的 SQL 条件，page/limit 不参与过滤
    pub fn condition(&self, backend: DbBackend) -> Condition {
        let mut condition = Condition::all();

        if let Some(entity_type) = self.entity_type {
            condition = condition.add(audit_logs::Column::EntityType.eq(entity_type.as_str()));
        }
        if let Some(action_type) = self.action_type {
            condition = condition.add(audit_logs::Column::ActionType.eq(action_type.as_str()));
        }
        if let Some(start) = self.start_date {
            condition = condition.add(audit_logs::Column::CreatedAt.gte(start_of_day(start)));
        }
        if let Some(end) = self.end_date {
            // DATE(created_at) <= end 等价于 created_at < end 次日零点
            if let Some(next) = end.succ_opt() {
                condition = condition.add(audit_logs::Column::CreatedAt.lt(start_of_day(next)));
            }
        }
        if let Some(id) = self.performed_by_id {
            condition = condition.add(audit_logs::Column::PerformedById.eq(id));
        }
        if let Some(name) = &self.performed_by_name {
            condition =
                condition.add(audit_logs::Column::PerformedByName.like(contains_pattern(name)));
        }
        if let Some(number) = &self.employee_number {
            condition = condition.add(
                Condition::any()
                    .add(
                        Expr::expr(json_text(backend, "new_values", "employee_number"))
                            .like(contains_pattern(number)),
                    )
                    .add(
                        Expr::expr(json_text(backend, "old_values", "employee_number"))
                            .like(contains_pattern(number)),
                    ),
            );
        }

        condition
    }

    /// 在内存中校验一条 API 返回记录是否满足过滤条件
    ///
    /// 姓名按 MySQL 默认排序规则不区分大小写；JSON 中取出的工号为二进制排序，区分大小写。
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        if let Some(action_type) = self.action_type {
            if entry.action_type != action_type.as_str() {
                return false;
            }
        }
        if let Some(entity_type) = self.entity_type {
            if entry.entity_type != entity_type.as_str() {
                return false;
            }
        }
        if let Some(id) = self.performed_by_id {
            if entry.performed_by_id != Some(i64::from(id)) {
                return false;
            }
        }
        if let Some(name) = &self.performed_by_name {
            let matched = entry
                .performed_by_name
                .as_deref()
                .is_some_and(|actual| contains_ignore_case(actual, name));
            if !matched {
                return false;
            }
        }
        if let Some(number) = &self.employee_number {
            let matched = [&entry.new_values, &entry.old_values]
                .into_iter()
                .filter_map(|values| snapshot_field(values.as_ref(), "employee_number"))
                .any(|actual| actual.contains(number.as_str()));
            if !matched {
                return false;
            }
        }
        if self.start_date.is_some() || self.end_date.is_some() {
            // 无法解析的时间交给服务端判断，不在本地误报
            if let Some(date) = entry.created_at.as_deref().and_then(parse_entry_date) {
                if self.start_date.is_some_and(|start| date < start) {
                    return false;
                }
                if self.end_date.is_some_and(|end| date > end) {
                    return false;
                }
            }
        }
        true
    }
}

/// 子串匹配的 LIKE 模式，转义 `%` 与 `_` 使其按字面匹配
fn contains_pattern(raw: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(raw.len() + 2);
    escaped.push('%');
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped.push('%');
    LikeExpr::new(escaped).escape(LIKE_ESCAPE)
}

fn start_of_day(date: NaiveDate) -> DateTimeWithTimeZone {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
        .fixed_offset()
}

/// 以文本形式取出 JSON 列中的字段，各数据库语法不同
fn json_text(backend: DbBackend, column: &str, key: &str) -> SimpleExpr {
    match backend {
        DbBackend::MySql => Expr::cust(format!(
            "JSON_UNQUOTE(JSON_EXTRACT(`{column}`, '$.{key}'))"
        )),
        DbBackend::Postgres => Expr::cust(format!("(\"{column}\" ->> '{key}')")),
        DbBackend::Sqlite => Expr::cust(format!("json_extract(\"{column}\", '$.{key}')")),
    }
}

fn snapshot_field<'a>(values: Option<&'a JsonValue>, key: &str) -> Option<&'a str> {
    values?.get(key)?.as_str()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn parse_entry_date(raw: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}
