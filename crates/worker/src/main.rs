//! `talentops-worker`: one-shot maintenance operations.

mod commands;
mod config;
mod throttle;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use talentops_core::types::DbId;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::WorkerConfig;

#[derive(Debug, Parser)]
#[command(name = "talentops-worker", version, about = "TalentOps maintenance operations")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Expand period-level assignments into daily rows.
    MigrateDailyAssignments {
        #[arg(long)]
        project: DbId,
        /// Writes per batch. Overrides BATCH_SIZE.
        #[arg(long)]
        batch_size: Option<u32>,
        /// Pause between batches in milliseconds. Overrides BATCH_PAUSE_MS.
        #[arg(long)]
        pause_ms: Option<u64>,
    },
    /// Delete daily rows and restore the saved schedules.
    RollbackDailyAssignments {
        #[arg(long)]
        project: DbId,
    },
    /// Report schedules that disagree with their daily rows.
    VerifyDailyAssignments {
        #[arg(long)]
        project: DbId,
    },
    /// Recompute readiness for one project, or all of them.
    RecomputeReadiness {
        #[arg(long)]
        project: Option<DbId>,
    },
    /// Recompute timecard daily figures and totals.
    RecomputeTimecardTotals {
        #[arg(long)]
        project: Option<DbId>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "talentops_worker=info".into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = ?e, "Worker command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> anyhow::Result<bool> {
    let config = WorkerConfig::from_env()?;
    let pool = talentops_db::create_pool(&config.database_url).await?;
    talentops_db::run_migrations(&pool).await?;
    tracing::debug!("Database ready");

    let outcome = match command {
        Command::MigrateDailyAssignments {
            project,
            batch_size,
            pause_ms,
        } => {
            let config = config.with_overrides(batch_size, pause_ms);
            commands::migrate_daily_assignments(&pool, &config, project).await
        }
        Command::RollbackDailyAssignments { project } => {
            commands::rollback_daily_assignments(&pool, project).await
        }
        Command::VerifyDailyAssignments { project } => {
            commands::verify_daily_assignments(&pool, project).await
        }
        Command::RecomputeReadiness { project } => {
            commands::recompute_readiness(&pool, project).await
        }
        Command::RecomputeTimecardTotals { project } => {
            commands::recompute_timecard_totals(&pool, project).await
        }
    };

    pool.close().await;
    outcome
}
