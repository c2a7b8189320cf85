//! Migrate command - applies or reverts schema migrations, then exits

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::infrastructure::Database;

#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Roll back the most recently applied migration instead
    #[arg(long)]
    pub revert: bool,
}

pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let database = Database::connect(&config.database)
        .await
        .context("Failed to connect to the database")?;
    let migrator = database.migrator();

    if args.revert {
        migrator.revert().await.context("Failed to revert migration")?;
    } else {
        migrator.run().await.context("Failed to apply migrations")?;
    }

    let version = migrator.version().await?;
    info!(
        backend = %database.backend(),
        version = ?version,
        "Schema is at version {}",
        version.map_or_else(|| "none".to_string(), |v| v.to_string())
    );

    database.close().await;

    Ok(())
}
