/// CLI configuration
///
/// Read from `shelf.toml` (or the file given with `--config`), then overridden by
/// `SHELF_*` environment variables with `__` between section and key, e.g.
/// `SHELF_LIBRARY__DATABASE_URL` or `SHELF_SCAN__AUDIO_EXTENSIONS=mp3,m4b`.
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use shelf_artwork::CoverConfig;
use shelf_metadata::ProbeConfig;
use shelf_scanner::ScanConfig;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "shelf.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ShelfConfig {
    #[serde(default)]
    pub library: LibrarySettings,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub covers: CoverConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibrarySettings {
    /// Library scanned when `shelf scan` gets no path
    #[serde(default)]
    pub root: Option<PathBuf>,

    #[serde(default = "default_database_url")]
    pub database_url: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            root: None,
            database_url: default_database_url(),
        }
    }
}

impl LibrarySettings {
    /// On-disk database file named by a `sqlite:` URL, if any
    pub fn database_file(&self) -> Option<PathBuf> {
        let rest = self
            .database_url
            .strip_prefix("sqlite://")
            .or_else(|| self.database_url.strip_prefix("sqlite:"))?;
        let path = rest.split_once('?').map_or(rest, |(path, _)| path);

        if path.is_empty() || path.starts_with(":memory:") {
            None
        } else {
            Some(PathBuf::from(path))
        }
    }
}

fn default_database_url() -> String {
    "sqlite://./data/audiobooks.db".to_string()
}

impl ShelfConfig {
    /// Load configuration from file and environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Load configuration, reading overrides from `env` instead of the process environment
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            // An explicitly named file must exist
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("SHELF")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("scan.audio_extensions")
                .with_list_parse_key("covers.names")
                .with_list_parse_key("covers.image_extensions")
                .source(env),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.library.database_url.trim().is_empty() {
            return Err(CliError::Config(
                "database URL is required (set SHELF_LIBRARY__DATABASE_URL)".to_string(),
            ));
        }

        if self.scan.audio_extensions.is_empty() {
            return Err(CliError::Config(
                "at least one audio extension is required".to_string(),
            ));
        }

        if self.probe.timeout_secs == 0 {
            return Err(CliError::Config(
                "probe timeout must be at least one second".to_string(),
            ));
        }

        Ok(())
    }
}
