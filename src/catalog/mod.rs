//! Product catalog and variant domains.
//!
//! The catalog is supplied whole by an external loader. This module turns
//! the raw records into validated [`Product`]s, each owning a
//! [`VariantDomain`] that says which dimensions exist and which options
//! each one offers.
//!
//! # Architecture
//!
//! - **Records**: serde types mirroring the TOML/JSON document
//! - **Validation**: duplicate labels, bad defaults and dangling tiers fail the load
//! - **Catalog**: an explicit read-only handle passed by reference into the engine
//!
//! # Example
//!
//! ```ignore
//! use ringbuilder::catalog::{load_catalog, Dimension};
//!
//! let catalog = load_catalog(Path::new("catalog.toml"))?;
//! let product = catalog.product("classic-solitaire").unwrap();
//!
//! for option in product.domain().options(Dimension::Metal) {
//!     println!("{} ({:+})", option.label, option.price_delta);
//! }
//! ```

mod dimension;
mod domain;
mod loader;
mod types;

pub use dimension::Dimension;
pub use domain::{Catalog, EngravingRule, Product, ProductOption, Tier, TierKind, VariantDomain};
pub use loader::{load_catalog, sample_catalog};
pub use types::*;
