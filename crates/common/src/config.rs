use crate::error::{AuditError, Result};
use crate::models::ActionType;
use std::env;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/super-admin";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub api_url: String,
    pub api_email: Option<String>,
    pub api_password: Option<String>,
    pub seed_count: usize,
    pub probe_limit: u64,
    pub recent_window_days: u32,
    pub performed_by_name: String,
    pub employee_number: String,
    pub action_type: ActionType,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        // Load .env early so process env reads pick it up.
        let _ = dotenvy::dotenv();
        Self::from_source(|key| env::var(key).ok())
    }

    /// 从任意键值来源构建配置，`from_env` 与测试共用同一套解析逻辑
    pub fn from_source<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = non_empty(lookup("DATABASE_URL"));
        let api_url = non_empty(lookup("AUDIT_API_URL"))
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_email = non_empty(lookup("AUDIT_API_EMAIL"));
        let api_password = non_empty(lookup("AUDIT_API_PASSWORD"));

        let seed_count = parse_or(&lookup, "SEED_COUNT", 400usize)?;
        let probe_limit = parse_or(&lookup, "PROBE_LIMIT", 10u64)?;
        let recent_window_days = parse_or(&lookup, "RECENT_WINDOW_DAYS", 7u32)?;
        if probe_limit == 0 {
            return Err(AuditError::config("PROBE_LIMIT must be greater than 0"));
        }

        let performed_by_name = non_empty(lookup("FILTER_PERFORMED_BY_NAME"))
            .unwrap_or_else(|| "Benaiah".to_string());
        let employee_number = non_empty(lookup("FILTER_EMPLOYEE_NUMBER"))
            .unwrap_or_else(|| "EMP1234".to_string());
        let action_type = match non_empty(lookup("FILTER_ACTION_TYPE")) {
            Some(raw) => raw
                .parse::<ActionType>()
                .map_err(|err| AuditError::config(format!("FILTER_ACTION_TYPE: {err}")))?,
            None => ActionType::Create,
        };

        Ok(Self {
            database_url,
            api_url,
            api_email,
            api_password,
            seed_count,
            probe_limit,
            recent_window_days,
            performed_by_name,
            employee_number,
            action_type,
        })
    }

    pub fn require_database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .ok_or_else(|| AuditError::config("DATABASE_URL is required"))
    }

    pub fn require_api_credentials(&self) -> Result<(&str, &str)> {
        match (self.api_email.as_deref(), self.api_password.as_deref()) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(AuditError::config(
                "AUDIT_API_EMAIL and AUDIT_API_PASSWORD are required",
            )),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match non_empty(lookup(key)) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| AuditError::config(format!("{key} invalid value {raw}"))),
        None => Ok(default),
    }
}
