pub mod build;
pub mod catalog;
pub mod config;
pub mod configurator;
mod error;
pub mod gallery;
pub mod metal;
pub mod pricing;
pub mod selection;
pub mod tier;

pub use catalog::{Catalog, Dimension, Product};
pub use config::EngineConfig;
pub use configurator::{Configurator, ConfiguratorView};
pub use error::{CatalogError, ClipboardError, ConfigError, SelectionError};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_filter` applies.
pub fn init_logging(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
