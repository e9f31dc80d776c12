//! Metal label normalization.
//!
//! Catalog authors, galleries and old share links spell the same metal in
//! many ways ("Yellow Gold", "18k Yellow", "18ct yellow gold"). Everything
//! that keys on a metal goes through [`normalize_metal`] first so that all
//! spellings land on one of four canonical keys.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// The four canonical metal keys used to index per-metal galleries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalMetal {
    #[serde(rename = "18k Yellow Gold")]
    YellowGold,
    #[serde(rename = "18k White Gold")]
    WhiteGold,
    #[serde(rename = "18k Rose Gold")]
    RoseGold,
    #[serde(rename = "Platinum")]
    Platinum,
}

impl CanonicalMetal {
    pub const ALL: [CanonicalMetal; 4] = [
        CanonicalMetal::YellowGold,
        CanonicalMetal::WhiteGold,
        CanonicalMetal::RoseGold,
        CanonicalMetal::Platinum,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalMetal::YellowGold => "18k Yellow Gold",
            CanonicalMetal::WhiteGold => "18k White Gold",
            CanonicalMetal::RoseGold => "18k Rose Gold",
            CanonicalMetal::Platinum => "Platinum",
        }
    }

    /// Recognize a label spelling, or `None` for custom keys (two-tone etc).
    pub fn recognize(label: &str) -> Option<Self> {
        let key = fold_label(label);
        match key.as_str() {
            "18k yellow gold" | "yellow gold" | "18k yellow" | "yellow" | "18k yg" | "yg"
            | "gold yellow" => Some(CanonicalMetal::YellowGold),
            "18k white gold" | "white gold" | "18k white" | "white" | "18k wg" | "wg"
            | "gold white" => Some(CanonicalMetal::WhiteGold),
            "18k rose gold" | "rose gold" | "18k rose" | "rose" | "18k rg" | "rg"
            | "gold rose" | "18k pink gold" | "pink gold" => Some(CanonicalMetal::RoseGold),
            "platinum" | "plat" | "pt" | "pt950" | "950 platinum" | "platinum 950" => {
                Some(CanonicalMetal::Platinum)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for CanonicalMetal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map any metal label onto its canonical key.
///
/// Unrecognized labels are returned unchanged: they are either already a
/// custom catalog key or a two-tone combination the catalog keys directly.
pub fn normalize_metal(label: &str) -> Cow<'_, str> {
    match CanonicalMetal::recognize(label) {
        Some(metal) => Cow::Borrowed(metal.as_str()),
        None => Cow::Borrowed(label),
    }
}

/// Lowercase, collapse whitespace and fold karat spellings to `18k`.
fn fold_label(label: &str) -> String {
    label
        .split_whitespace()
        .map(|word| {
            let word = word.to_lowercase();
            match word.as_str() {
                "18ct" | "18kt" | "18karat" | "18carat" | "750" => "18k".to_string(),
                _ => word,
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
