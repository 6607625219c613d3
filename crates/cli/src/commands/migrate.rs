//! Database migration command.
//!
//! Applies the migrations embedded from `crates/server/migrations/` to
//! the database named by `DATABASE_URL`.

use super::CommandError;

/// Run pending migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration
/// fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
