use crate::entities::audit_logs;
use crate::error::AuditError;
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Create,
    Update,
    Delete,
    AddDays,
    SubtractDays,
    SetDays,
}

impl ActionType {
    pub const ALL: [ActionType; 6] = [
        ActionType::Create,
        ActionType::Update,
        ActionType::Delete,
        ActionType::AddDays,
        ActionType::SubtractDays,
        ActionType::SetDays,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::AddDays => "ADD_DAYS",
            Self::SubtractDays => "SUBTRACT_DAYS",
            Self::SetDays => "SET_DAYS",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AuditError::invalid_value(format!("unknown action type {s}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Employee,
    Admin,
}

impl EntityType {
    pub const ALL: [EntityType; 2] = [EntityType::Employee, EntityType::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "EMPLOYEE",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|entity| entity.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AuditError::invalid_value(format!("unknown entity type {s}")))
    }
}

/// 变更前后的员工快照，old_values 与 new_values 使用同一组键
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSnapshot {
    pub used_days: i32,
    pub employee_number: String,
    pub name: String,
}

impl ValueSnapshot {
    pub fn to_json(&self) -> JsonValue {
        json!({
            "used_days": self.used_days,
            "employee_number": self.employee_number,
            "name": self.name,
        })
    }
}

/// 待写入的审计记录，id 由数据库分配
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditLog {
    pub action_type: ActionType,
    pub entity_type: EntityType,
    pub entity_id: i32,
    pub entity_name: String,
    pub performed_by_id: i32,
    pub performed_by_type: String,
    pub performed_by_name: String,
    pub old_values: ValueSnapshot,
    pub new_values: ValueSnapshot,
    pub description: String,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
}

impl From<NewAuditLog> for audit_logs::ActiveModel {
    fn from(log: NewAuditLog) -> Self {
        audit_logs::ActiveModel {
            action_type: Set(log.action_type.as_str().to_string()),
            entity_type: Set(log.entity_type.as_str().to_string()),
            entity_id: Set(Some(log.entity_id)),
            entity_name: Set(Some(log.entity_name)),
            performed_by_id: Set(Some(log.performed_by_id)),
            performed_by_type: Set(Some(log.performed_by_type)),
            performed_by_name: Set(Some(log.performed_by_name)),
            old_values: Set(Some(log.old_values.to_json())),
            new_values: Set(Some(log.new_values.to_json())),
            description: Set(Some(log.description)),
            ip_address: Set(Some(log.ip_address)),
            created_at: Set(log.created_at.fixed_offset()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// 管理端 `/audit-logs` 返回的单条记录，字段按服务端原样保留
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditLogEntry {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub action_type: String,
    #[serde(default)]
    pub entity_type: String,
    #[serde(default)]
    pub entity_id: Option<i64>,
    #[serde(default)]
    pub entity_name: Option<String>,
    #[serde(default)]
    pub performed_by_id: Option<i64>,
    #[serde(default)]
    pub performed_by_name: Option<String>,
    #[serde(default)]
    pub old_values: Option<JsonValue>,
    #[serde(default)]
    pub new_values: Option<JsonValue>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_pages: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditLogPage {
    #[serde(default)]
    pub logs: Vec<AuditLogEntry>,
    #[serde(default)]
    pub pagination: Pagination,
}
