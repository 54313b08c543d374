mod db;
mod seed;

use crate::db::init_db;
use anyhow::Result;
use audit_common::config::AppConfig;
use audit_common::{AuditError, MockLogGenerator};
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
        if err
            .downcast_ref::<AuditError>()
            .is_some_and(AuditError::is_config_error)
        {
            error!("check DATABASE_URL and SEED_COUNT in the environment or .env");
        }
        error!("seeding failed: {:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = AppConfig::from_env()?;
    let database_url = config.require_database_url()?;

    let db = init_db(database_url).await?;
    info!("ensured audit_logs table exists");

    let mut generator = MockLogGenerator::new();
    let outcome = seed::run_seed(&db, &mut generator, config.seed_count).await;

    // 无论成功与否都释放连接
    if let Err(err) = db.close().await {
        error!("failed to close database connection: {}", err);
    }

    outcome?;
    Ok(())
}
