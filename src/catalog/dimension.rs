use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One configurable axis of a ring.
///
/// The set is closed: every lookup that used to be keyed by a free-form
/// string goes through this enum instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Metal,
    Origin,
    Carat,
    Colour,
    Clarity,
    Certificate,
    Size,
    Engraving,
}

impl Dimension {
    pub const ALL: [Dimension; 8] = [
        Dimension::Metal,
        Dimension::Origin,
        Dimension::Carat,
        Dimension::Colour,
        Dimension::Clarity,
        Dimension::Certificate,
        Dimension::Size,
        Dimension::Engraving,
    ];

    /// Dimensions chosen from a catalog option list. Engraving is free text
    /// and is handled separately.
    pub const OPTION_DIMENSIONS: [Dimension; 7] = [
        Dimension::Metal,
        Dimension::Origin,
        Dimension::Carat,
        Dimension::Colour,
        Dimension::Clarity,
        Dimension::Certificate,
        Dimension::Size,
    ];

    pub fn is_option_based(self) -> bool {
        !matches!(self, Dimension::Engraving)
    }

    /// Slot in per-dimension arrays. Only meaningful for option dimensions.
    pub(crate) fn slot(self) -> usize {
        match self {
            Dimension::Metal => 0,
            Dimension::Origin => 1,
            Dimension::Carat => 2,
            Dimension::Colour => 3,
            Dimension::Clarity => 4,
            Dimension::Certificate => 5,
            Dimension::Size => 6,
            Dimension::Engraving => 7,
        }
    }

    /// Lowercase catalog name, as used in `defaults` tables.
    pub fn name(self) -> &'static str {
        match self {
            Dimension::Metal => "metal",
            Dimension::Origin => "origin",
            Dimension::Carat => "carat",
            Dimension::Colour => "colour",
            Dimension::Clarity => "clarity",
            Dimension::Certificate => "certificate",
            Dimension::Size => "size",
            Dimension::Engraving => "engraving",
        }
    }

    /// Query key used in share links. Engraving is split over two keys,
    /// see [`crate::build::LinkField`].
    pub fn link_key(self) -> &'static str {
        match self {
            Dimension::Size => "ringSize",
            Dimension::Engraving => "engravingOn",
            other => other.name(),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dimension {
    type Err = String;

    /// Accepts catalog names, link keys and the American spelling of colour.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metal" => Ok(Dimension::Metal),
            "origin" => Ok(Dimension::Origin),
            "carat" => Ok(Dimension::Carat),
            "colour" | "color" => Ok(Dimension::Colour),
            "clarity" => Ok(Dimension::Clarity),
            "certificate" => Ok(Dimension::Certificate),
            "size" | "ringsize" => Ok(Dimension::Size),
            "engraving" | "engravingon" => Ok(Dimension::Engraving),
            other => Err(format!("Unknown dimension '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_parse_accepts_link_keys_and_spellings() {
        assert_eq!("ringSize".parse::<Dimension>(), Ok(Dimension::Size));
        assert_eq!("Color".parse::<Dimension>(), Ok(Dimension::Colour));
        assert_eq!(" metal ".parse::<Dimension>(), Ok(Dimension::Metal));
        assert!("finish".parse::<Dimension>().is_err());
    }

    #[test]
    fn test_slots_are_unique() {
        let slots: HashSet<usize> = Dimension::ALL.iter().map(|d| d.slot()).collect();
        assert_eq!(slots.len(), Dimension::ALL.len());
        for dim in Dimension::OPTION_DIMENSIONS {
            assert!(dim.slot() < Dimension::OPTION_DIMENSIONS.len());
        }
    }

    #[test]
    fn test_link_keys() {
        assert_eq!(Dimension::Metal.link_key(), "metal");
        assert_eq!(Dimension::Size.link_key(), "ringSize");
        assert_eq!(Dimension::Colour.link_key(), "colour");
    }

    #[test]
    fn test_deserialize_lowercase() {
        let dim: Dimension = serde_json::from_str(r#""certificate""#).unwrap();
        assert_eq!(dim, Dimension::Certificate);
    }
}
