//! Config and init commands.

use std::io::Write;

use super::write_failed;
use crate::Result;
use crate::config::ForecastsConfig;
use crate::storage::ContextFactory;

/// Prints the effective configuration as TOML.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn cmd_config<W: Write>(config: &ForecastsConfig, writer: &mut W) -> Result<()> {
    let toml = config.to_toml()?;
    write!(writer, "{toml}").map_err(write_failed)
}

/// Creates the backing store if it does not exist yet.
///
/// # Errors
///
/// Returns an error if the store cannot be created.
pub fn cmd_init<W: Write>(factory: &dyn ContextFactory, writer: &mut W) -> Result<()> {
    factory.ensure_created()?;
    writeln!(
        writer,
        "Initialized {} store at {}",
        factory.backend_name(),
        factory.location()
    )
    .map_err(write_failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteContextFactory;
    use tempfile::TempDir;

    #[test]
    fn test_cmd_config_prints_toml() {
        let mut buf = Vec::new();
        cmd_config(&ForecastsConfig::new().with_db_path("/srv/weather.db"), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("[storage]"));
        assert!(text.contains("path = \"/srv/weather.db\""));
        assert!(text.contains("port = 5000"));
    }

    #[test]
    fn test_cmd_init_creates_database() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("forecasts.db");
        let factory = SqliteContextFactory::new(path.clone());

        let mut buf = Vec::new();
        cmd_init(&factory, &mut buf).unwrap();

        assert!(path.exists());
        assert!(String::from_utf8(buf).unwrap().starts_with("Initialized sqlite store"));
    }
}
