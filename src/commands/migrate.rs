//! `migrate` command.

use sea_orm::DbErr;

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Keep the driver message visible on the console.
fn failed(action: &str) -> impl Fn(DbErr) -> AppError + '_ {
    move |e| AppError::internal(format!("{} failed: {}", action, e))
}

pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    let db = Database::open(&config).await.map_err(failed("Connection"))?;

    match args.action {
        MigrateAction::Up => {
            db.migrate_up().await.map_err(failed("Migration"))?;
            tracing::info!("Schema is up to date");
        }
        MigrateAction::Down { steps } => {
            db.migrate_down(steps).await.map_err(failed("Rollback"))?;
            tracing::info!(steps, "Rolled back");
        }
        MigrateAction::Status => {
            let states = db.migration_states().await.map_err(failed("Status"))?;
            let pending = states.iter().filter(|s| !s.applied).count();
            for state in &states {
                println!(
                    "{:<8} {}",
                    if state.applied { "applied" } else { "pending" },
                    state.name
                );
            }
            tracing::info!(total = states.len(), pending, "Migration status");
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables");
            db.migrate_fresh().await.map_err(failed("Fresh migration"))?;
            tracing::info!("Schema rebuilt from scratch");
        }
    }

    Ok(())
}
