mod checks;

use anyhow::{Result, bail};
use audit_common::AuditError;
use audit_common::config::AppConfig;
use chrono::Utc;
use tracing::{error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        if err
            .downcast_ref::<AuditError>()
            .is_some_and(AuditError::is_config_error)
        {
            error!("check DATABASE_URL and the FILTER_* settings in the environment or .env");
        }
        error!("verification failed: {:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = AppConfig::from_env()?;
    let database_url = config.require_database_url()?;

    // 只读校验，不执行迁移
    let db = audit_common::db::connect(database_url).await?;
    let checks = checks::default_checks(&config, Utc::now().date_naive());
    let outcome = checks::verify(&db, &checks).await;

    if let Err(err) = db.close().await {
        warn!("failed to close database connection: {}", err);
    }

    let report = outcome?;
    let violations = report.violations();
    if !violations.is_empty() {
        for violation in &violations {
            error!("{}", violation);
        }
        bail!("{} count check(s) exceeded the total", violations.len());
    }
    info!("all filtered counts are within the total");
    Ok(())
}
