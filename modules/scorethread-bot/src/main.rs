use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use scorethread_bot::{build_engine, Scheduler};
use scorethread_common::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("scorethread=info".parse()?))
        .init();

    info!("ScoreThread bot starting...");

    let config = Config::from_env()?;
    config.log_redacted();

    let engine = build_engine(&config)?;
    let scheduler = Scheduler::new(config.poll_interval, config.quiet_hours);

    scheduler
        .run(&engine, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await;

    info!("ScoreThread bot stopped");
    Ok(())
}
