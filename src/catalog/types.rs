//! Raw catalog records, exactly as the external loader hands them over.
//!
//! These types only describe the document shape (TOML or JSON). Nothing here
//! is validated; [`super::Product::from_record`] turns a record into a
//! checked product.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// DOCUMENT TYPES
// =============================================================================

/// Root of a catalog document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(default)]
    pub products: Vec<ProductRecord>,
}

/// One product as published by the catalog.
///
/// Every option list is optional: a product that omits `origin` simply does
/// not offer that dimension.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Stable product identifier (e.g., "classic-solitaire")
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Price in GBP before any option deltas
    pub base_price: Decimal,

    // === Option lists, one per dimension ===
    #[serde(default)]
    pub metal: Vec<OptionRecord>,
    #[serde(default)]
    pub origin: Vec<OptionRecord>,
    #[serde(default)]
    pub carat: Vec<OptionRecord>,
    #[serde(default, alias = "color")]
    pub colour: Vec<OptionRecord>,
    #[serde(default)]
    pub clarity: Vec<OptionRecord>,
    #[serde(default)]
    pub certificate: Vec<OptionRecord>,
    #[serde(default)]
    pub size: Vec<OptionRecord>,

    /// Engraving service; absent means the product cannot be engraved
    #[serde(default)]
    pub engraving: Option<EngravingRecord>,

    /// Default option index per dimension name (e.g., `metal = 1`)
    #[serde(default)]
    pub defaults: BTreeMap<String, usize>,

    // === Imagery ===
    /// Generic images used when no metal-specific gallery applies
    #[serde(default)]
    pub images: Vec<String>,
    /// Galleries keyed by metal label, in declared order; any spelling is
    /// accepted
    #[serde(default)]
    pub metal_galleries: IndexMap<String, Vec<String>>,

    /// Curated carat/colour/clarity bundles, in display order
    #[serde(default)]
    pub tiers: Vec<TierRecord>,
}

/// A selectable value within one dimension.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OptionRecord {
    pub label: String,
    /// Signed GBP adjustment; negative for discount options
    #[serde(default)]
    pub price_delta: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngravingRecord {
    /// GBP fee charged when engraving is switched on
    #[serde(default)]
    pub fee: Decimal,
    /// Maximum number of characters kept from the engraving text
    #[serde(default = "default_engraving_max_length")]
    pub max_length: usize,
}

fn default_engraving_max_length() -> usize {
    20
}

/// A named carat/colour/clarity bundle, or the bespoke sentinel.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TierRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub carat: Option<String>,
    #[serde(default, alias = "color")]
    pub colour: Option<String>,
    #[serde(default)]
    pub clarity: Option<String>,
    /// Marks the "requires consultation" tier, which binds no options
    #[serde(default)]
    pub bespoke: bool,
}

impl OptionRecord {
    pub fn new(label: impl Into<String>, price_delta: Decimal) -> Self {
        Self {
            label: label.into(),
            price_delta,
        }
    }
}
