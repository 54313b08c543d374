use crate::error::ProbeError;
use audit_common::AuditLogFilter;
use audit_common::models::{AuditLogPage, LoginRequest, LoginResponse};
use reqwest::{Client, Response, Url};
use tracing::debug;

/// 管理端审计日志 API 客户端，登录后持有 bearer token
pub struct AuditApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl AuditApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            token: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ProbeError> {
        let url = format!("{}/login", self.base_url);
        let payload = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp = ensure_success(self.http.post(&url).json(&payload).send().await?).await?;

        let body: LoginResponse = resp.json().await?;
        let token = body
            .token
            .filter(|token| !token.is_empty())
            .ok_or(ProbeError::MissingToken)?;
        self.token = Some(token);
        Ok(())
    }

    pub async fn fetch_logs(&self, filter: &AuditLogFilter) -> Result<AuditLogPage, ProbeError> {
        let token = self.token.as_deref().ok_or(ProbeError::NotAuthenticated)?;
        let url = Url::parse_with_params(
            &format!("{}/audit-logs", self.base_url),
            filter.query_pairs(),
        )
        .map_err(|err| ProbeError::InvalidUrl(err.to_string()))?;
        debug!("GET {}", url);

        let resp = ensure_success(self.http.get(url).bearer_auth(token).send().await?).await?;
        Ok(resp.json::<AuditLogPage>().await?)
    }
}

async fn ensure_success(resp: Response) -> Result<Response, ProbeError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ProbeError::Status {
        status: status.as_u16(),
        body,
    })
}
