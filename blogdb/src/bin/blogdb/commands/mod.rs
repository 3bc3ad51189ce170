pub mod init;
pub mod status;

use anyhow::{Context, Result};
use blogdb::{ConnectionSettings, MongoStore};

use crate::TargetArgs;
use crate::output::OutputManager;

/// Validate the target, connect, and ping before any command touches the database.
pub async fn connect(target: &TargetArgs, output: &OutputManager) -> Result<MongoStore> {
    let settings = ConnectionSettings::new(target.uri.clone(), target.database.clone());
    settings.validate().context("Invalid connection settings")?;

    output.key_value("Target", &settings.redacted_uri());
    output.key_value("Database", &settings.database);

    output.progress("Connecting to MongoDB");
    let store = MongoStore::connect(&settings).await;
    output.clear_line();

    let store = store.with_context(|| format!("Failed to connect to {}", settings.redacted_uri()))?;
    output.verbose("Server answered ping");
    Ok(store)
}
