//! Audioshelf command-line front end
//!
//! Configuration loading and output rendering for the `shelf` binary.

pub mod config;
pub mod error;
pub mod render;

pub use config::ShelfConfig;
pub use error::{CliError, Result};

/// Log filter used when `RUST_LOG` is unset
///
/// Warnings from every crate get through; the binary and scanner also log progress.
pub const DEFAULT_LOG_FILTER: &str = "warn,shelf=info,shelf_cli=info,shelf_scanner=info";

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;
    use tracing_subscriber::EnvFilter;

    #[test]
    fn default_log_filter_parses() {
        let filter = EnvFilter::try_new(DEFAULT_LOG_FILTER).unwrap();
        assert_eq!(filter.max_level_hint(), Some(Level::INFO.into()));
    }

    #[test]
    fn default_log_filter_keeps_library_warnings() {
        let directives: Vec<&str> = DEFAULT_LOG_FILTER.split(',').collect();
        assert_eq!(directives[0], "warn");
        assert!(!directives
            .iter()
            .any(|d| d.starts_with("shelf_metadata") || d.starts_with("shelf_storage")));
    }
}
