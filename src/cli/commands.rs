//! CLI command implementations

use std::path::Path;
use std::sync::Arc;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_response};
use crate::api::ApiHandler;
use crate::clock::SystemClock;
use crate::config::PlatformConfig;
use crate::models::Plan;
use crate::observability::Logger;
use crate::platform::Platform;
use crate::scheduler::ReconcileScheduler;
use crate::store::MemoryStore;

/// Parse arguments and dispatch
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match cli.command {
        Command::Serve { config } => serve(&config),
        Command::Tick { config } => tick(&config),
        Command::Weeks { config, plan } => weeks(&config, &plan),
    }
}

fn build_platform(config_path: &Path) -> CliResult<Arc<Platform>> {
    let config = PlatformConfig::load(config_path)?;
    let platform = Platform::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock), config)?;
    Ok(Arc::new(platform))
}

/// Serve JSON requests on stdin/stdout with the scheduler running in
/// the background
fn serve(config_path: &Path) -> CliResult<()> {
    let platform = build_platform(config_path)?;
    let scheduler = ReconcileScheduler::new(platform.clone(), &platform.config.reconcile_cron)?;

    // Fill the horizon before accepting requests
    scheduler.tick()?;
    Logger::info("SERVE_READY", &[("cron", &platform.config.reconcile_cron)]);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.spawn(async move { scheduler.run().await });

    let handler = ApiHandler::new(platform);
    while let Some(line) = read_request()? {
        if line.is_empty() {
            continue;
        }
        let response = handler.handle(&line);
        write_response(&response.to_json())?;
    }
    Ok(())
}

/// One-shot maintenance pass
fn tick(config_path: &Path) -> CliResult<()> {
    let platform = build_platform(config_path)?;
    let scheduler = ReconcileScheduler::new(platform.clone(), &platform.config.reconcile_cron)?;
    let report = scheduler.tick()?;
    write_response(&serde_json::to_string(&serde_json::json!({
        "activated": report.activated,
        "completed": report.completed,
        "failures": report.failures,
    }))?)?;
    Ok(())
}

/// Print week availability for a plan tier
fn weeks(config_path: &Path, plan: &str) -> CliResult<()> {
    let plan = match plan {
        "standard" => Plan::Standard,
        "premium" => Plan::Premium,
        other => return Err(CliError::UnknownPlan(other.to_string())),
    };

    let platform = build_platform(config_path)?;
    platform.lifecycle.ensure_upcoming_weeks()?;
    let weeks = platform.lifecycle.available_weeks(plan)?;
    write_response(&serde_json::to_string(&weeks)?)?;
    Ok(())
}
