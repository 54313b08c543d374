mod client;
mod error;
mod scenarios;
#[cfg(test)]
mod stub;

use crate::client::AuditApiClient;
use anyhow::Result;
use audit_common::config::AppConfig;
use chrono::Utc;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        error!("audit logs API probe failed: {:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = AppConfig::from_env()?;
    let (email, password) = config.require_api_credentials()?;

    info!("--- testing audit logs API at {} ---", config.api_url);
    let mut client = AuditApiClient::new(config.api_url.clone());
    if let Err(err) = client.login(email, password).await {
        // 登录失败时后续请求都没有意义
        error!("login failed: {}", err);
        if err.status_code() == Some(401) {
            error!("check AUDIT_API_EMAIL and AUDIT_API_PASSWORD");
        }
        return Ok(());
    }
    info!("login successful, token obtained");

    let scenarios = scenarios::default_scenarios(&config, Utc::now().date_naive());
    let summary = scenarios::run_scenarios(&client, &scenarios).await;
    info!(
        passed = summary.passed,
        failed = summary.failed,
        "audit logs API probe finished"
    );
    Ok(())
}
