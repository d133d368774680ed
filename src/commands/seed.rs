//! Seed command - Ensures the default roles exist.

use crate::config::{Config, SEED_ROLES};
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Persistence, UnitOfWork};

/// Execute the seed command
pub async fn execute(config: Config) -> AppResult<()> {
    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    let created = seed_roles(&Persistence::new(db.get_connection())).await?;
    tracing::info!(created, "Seed completed");
    Ok(())
}

/// Create every missing default role; returns how many were created.
pub async fn seed_roles<U: UnitOfWork>(uow: &U) -> AppResult<usize> {
    let roles = uow.roles();
    let mut created = 0;

    for name in SEED_ROLES {
        if roles.find_by_name(name).await?.is_some() {
            tracing::debug!(role = name, "Role already present");
            continue;
        }
        roles.create(name).await?;
        tracing::info!(role = name, "Role created");
        created += 1;
    }

    Ok(created)
}
