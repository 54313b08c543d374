//! 测试用的管理端 API 桩服务

use audit_common::{MockLogGenerator, NewAuditLog};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, SecondsFormat, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value as JsonValue, json};
use std::collections::HashMap;
use std::sync::Arc;

pub const EMAIL: &str = "superadmin@example.com";
pub const PASSWORD: &str = "superadmin123";
const TOKEN: &str = "stub-token";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StubMode {
    /// 按查询参数过滤
    Honest,
    /// 忽略过滤参数，原样返回全部记录
    IgnoreFilters,
    /// 登录成功但响应中没有 token
    NoToken,
}

#[derive(Clone)]
struct StubState {
    mode: StubMode,
    logs: Arc<Vec<JsonValue>>,
}

pub fn fixed_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-10-18T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn fixture_logs() -> Vec<JsonValue> {
    MockLogGenerator::with_rng(StdRng::seed_from_u64(42), fixed_now())
        .generate(60)
        .into_iter()
        .enumerate()
        .map(|(idx, log)| to_wire(idx as i64 + 1, log))
        .collect()
}

fn to_wire(id: i64, log: NewAuditLog) -> JsonValue {
    json!({
        "id": id,
        "action_type": log.action_type.as_str(),
        "entity_type": log.entity_type.as_str(),
        "entity_id": log.entity_id,
        "entity_name": log.entity_name,
        "performed_by_id": log.performed_by_id,
        "performed_by_type": log.performed_by_type,
        "performed_by_name": log.performed_by_name,
        "old_values": log.old_values.to_json(),
        "new_values": log.new_values.to_json(),
        "description": log.description,
        "ip_address": log.ip_address,
        "created_at": log.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

pub async fn spawn_stub(mode: StubMode) -> String {
    let state = StubState {
        mode,
        logs: Arc::new(fixture_logs()),
    };
    let app = Router::new()
        .route("/api/super-admin/login", post(login))
        .route("/api/super-admin/audit-logs", get(audit_logs))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/super-admin")
}

async fn login(State(state): State<StubState>, Json(body): Json<JsonValue>) -> Response {
    if body["email"] != EMAIL || body["password"] != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Invalid email or password"})),
        )
            .into_response();
    }
    if state.mode == StubMode::NoToken {
        return Json(json!({"success": true, "message": "Login successful"})).into_response();
    }
    Json(json!({"success": true, "message": "Login successful", "token": TOKEN})).into_response()
}

async fn audit_logs(
    State(state): State<StubState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(format!("Bearer {TOKEN}").as_str());
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Invalid token"})),
        )
            .into_response();
    }

    let limit: usize = params
        .get("limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);
    let matched: Vec<&JsonValue> = state
        .logs
        .iter()
        .filter(|log| state.mode == StubMode::IgnoreFilters || stub_matches(log, &params))
        .collect();
    let total = matched.len();
    let logs: Vec<&JsonValue> = matched.into_iter().take(limit).collect();

    Json(json!({
        "success": true,
        "logs": logs,
        "pagination": {
            "page": 1,
            "limit": limit,
            "total": total,
            "totalPages": total.div_ceil(limit.max(1)),
        }
    }))
    .into_response()
}

fn stub_matches(log: &JsonValue, params: &HashMap<String, String>) -> bool {
    let text = |key: &str| log[key].as_str().unwrap_or_default().to_string();
    if let Some(action) = params.get("actionType") {
        if &text("action_type") != action {
            return false;
        }
    }
    if let Some(name) = params.get("performedByName") {
        if !text("performed_by_name").contains(name.as_str()) {
            return false;
        }
    }
    if let Some(number) = params.get("employeeNumber") {
        let in_snapshot = ["old_values", "new_values"].iter().any(|key| {
            log[*key]["employee_number"]
                .as_str()
                .is_some_and(|value| value.contains(number.as_str()))
        });
        if !in_snapshot {
            return false;
        }
    }
    if let Some(start) = params.get("startDate") {
        // created_at 为 UTC 的 RFC3339，前 10 位即日期
        if &text("created_at")[..10] < start.as_str() {
            return false;
        }
    }
    true
}
