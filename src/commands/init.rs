//! Init command implementation

use crate::config::Config;
use crate::error::{Error, Result};
use crate::store::SalesDb;
use std::path::Path;
use tracing::info;

/// Write the config file and create the sales store schema
pub async fn cmd_init(config: &Config, config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        return Err(Error::AlreadyInitialized(
            config_path.display().to_string(),
        ));
    }

    config.save(config_path)?;
    info!("Wrote config to {}", config_path.display());

    // Opening the store creates the database and schema if missing
    SalesDb::new(&config.store.db_file).await?;
    info!("Created sales store at {}", config.store.db_file.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_writes_config_and_store() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("salespipe.toml");

        let mut config = Config::default();
        config.store.db_file = tmp.path().join("sales_data.db");

        cmd_init(&config, &config_path, false).await.unwrap();
        assert!(config_path.exists());
        assert!(config.store.db_file.exists());
    }

    #[tokio::test]
    async fn test_init_refuses_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("salespipe.toml");
        std::fs::write(&config_path, "").unwrap();

        let result = cmd_init(&Config::default(), &config_path, false).await;
        assert!(matches!(result, Err(Error::AlreadyInitialized(_))));
    }
}
