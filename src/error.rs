use std::time::Duration;

use thiserror::Error;

use crate::catalog::Dimension;

/// Fatal problems found while loading a catalog.
///
/// A malformed catalog must fail before any price is resolved, so every
/// variant here aborts the load.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product '{product}' lists '{label}' twice under {dimension}")]
    DuplicateOptionLabel {
        product: String,
        dimension: Dimension,
        label: String,
    },

    #[error("Product '{product}' declares default index {index} for {dimension}, which has {available} option(s)")]
    DefaultOutOfRange {
        product: String,
        dimension: Dimension,
        index: usize,
        available: usize,
    },

    #[error("Product '{product}' declares a default for unknown dimension '{name}'")]
    UnknownDimension { product: String, name: String },

    #[error("Tier '{tier}' of product '{product}' binds {dimension} '{label}', which the product does not offer")]
    UnknownTierOption {
        product: String,
        tier: String,
        dimension: Dimension,
        label: String,
    },

    #[error("Tier '{tier}' of product '{product}' must bind carat, colour and clarity or be marked bespoke")]
    IncompleteTier { product: String, tier: String },

    #[error("Product '{product}' declares tier '{tier}' twice")]
    DuplicateTierId { product: String, tier: String },

    #[error("Catalog declares product '{0}' twice")]
    DuplicateProductId(String),

    #[error("Catalog TOML is invalid: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Catalog JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-interaction selection failures. These never abort a session: the
/// offending call is ignored and the state is left untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("'{label}' is not a {dimension} option for this product")]
    IncompatibleOption { dimension: Dimension, label: String },

    #[error("This product does not offer {0}")]
    UnsupportedDimension(Dimension),

    #[error("{0} is not chosen from an option list")]
    NotAnOptionDimension(Dimension),

    #[error("Unknown tier '{0}'")]
    UnknownTier(String),
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("No clipboard tool available on this system")]
    Unavailable,

    #[error("Clipboard write timed out after {0:?}")]
    Timeout(Duration),

    #[error("Clipboard tool '{tool}' exited with status {status}")]
    ToolFailed { tool: String, status: String },

    #[error("Clipboard I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Clipboard rejected the write: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Config TOML is invalid: {0}")]
    Parse(#[from] toml::de::Error),
}
