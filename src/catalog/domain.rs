//! Validated products and the per-product variant domain.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::CatalogError;
use crate::metal::normalize_metal;

use super::dimension::Dimension;
use super::types::{CatalogRecord, EngravingRecord, OptionRecord, ProductRecord, TierRecord};

const OPTION_SLOTS: usize = Dimension::OPTION_DIMENSIONS.len();

/// One selectable value of a dimension, after validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductOption {
    pub label: String,
    pub price_delta: Decimal,
}

/// Engraving terms for a product that offers it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EngravingRule {
    pub fee: Decimal,
    pub max_length: usize,
}

impl EngravingRule {
    /// Keep at most `max_length` characters.
    ///
    /// Applying this twice gives the same result as applying it once, which
    /// is what keeps encode and decode of share links in agreement.
    pub fn clamp<'a>(&self, text: &'a str) -> &'a str {
        match text.char_indices().nth(self.max_length) {
            Some((byte_idx, _)) => &text[..byte_idx],
            None => text,
        }
    }
}

/// Which dimensions a product offers and the ordered options of each.
#[derive(Debug, Clone, Default)]
pub struct VariantDomain {
    options: [Vec<ProductOption>; OPTION_SLOTS],
    engraving: Option<EngravingRule>,
}

impl VariantDomain {
    /// A dimension is supported when it has at least one option, or for
    /// engraving, when the product declares engraving terms.
    pub fn supports(&self, dimension: Dimension) -> bool {
        match dimension {
            Dimension::Engraving => self.engraving.is_some(),
            other => !self.options[other.slot()].is_empty(),
        }
    }

    /// Ordered options for a dimension; empty when unsupported.
    pub fn options(&self, dimension: Dimension) -> &[ProductOption] {
        match dimension {
            Dimension::Engraving => &[],
            other => &self.options[other.slot()],
        }
    }

    pub fn option(&self, dimension: Dimension, index: usize) -> Option<&ProductOption> {
        self.options(dimension).get(index)
    }

    /// Index of the option with exactly this label.
    pub fn find(&self, dimension: Dimension, label: &str) -> Option<usize> {
        self.options(dimension).iter().position(|o| o.label == label)
    }

    pub fn engraving(&self) -> Option<&EngravingRule> {
        self.engraving.as_ref()
    }

    /// Supported dimensions in canonical order.
    pub fn supported(&self) -> impl Iterator<Item = Dimension> + '_ {
        Dimension::ALL.into_iter().filter(|d| self.supports(*d))
    }
}

/// What a tier applies when selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TierKind {
    Bundle {
        carat: String,
        colour: String,
        clarity: String,
    },
    /// Requires a consultation; selecting it never changes the selection.
    Bespoke,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tier {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: TierKind,
}

impl Tier {
    pub fn is_bespoke(&self) -> bool {
        matches!(self.kind, TierKind::Bespoke)
    }
}

/// A catalog product whose option lists, defaults and tiers have been checked.
#[derive(Debug, Clone)]
pub struct Product {
    id: String,
    name: String,
    base_price: Decimal,
    domain: VariantDomain,
    defaults: [Option<usize>; OPTION_SLOTS],
    images: Vec<String>,
    metal_galleries: HashMap<String, Vec<String>>,
    tiers: Vec<Tier>,
}

impl Product {
    /// Validate a raw record.
    ///
    /// # Errors
    /// Any of the fatal [`CatalogError`] variants; a product that fails here
    /// never reaches pricing.
    pub fn from_record(record: ProductRecord) -> Result<Self, CatalogError> {
        let ProductRecord {
            id,
            name,
            base_price,
            metal,
            origin,
            carat,
            colour,
            clarity,
            certificate,
            size,
            engraving,
            defaults,
            images,
            metal_galleries,
            tiers,
        } = record;

        let lists = [metal, origin, carat, colour, clarity, certificate, size];
        let mut options: [Vec<ProductOption>; OPTION_SLOTS] = Default::default();
        for (dimension, list) in Dimension::OPTION_DIMENSIONS.into_iter().zip(lists) {
            options[dimension.slot()] = validate_options(&id, dimension, list)?;
        }

        let domain = VariantDomain {
            options,
            engraving: engraving.map(|EngravingRecord { fee, max_length }| EngravingRule {
                fee,
                max_length,
            }),
        };

        let mut default_slots = [None; OPTION_SLOTS];
        for (dim_name, index) in defaults {
            let dimension: Dimension =
                dim_name
                    .parse()
                    .map_err(|_| CatalogError::UnknownDimension {
                        product: id.clone(),
                        name: dim_name.clone(),
                    })?;
            let available = domain.options(dimension).len();
            if index >= available {
                return Err(CatalogError::DefaultOutOfRange {
                    product: id,
                    dimension,
                    index,
                    available,
                });
            }
            default_slots[dimension.slot()] = Some(index);
        }

        let tiers = validate_tiers(&id, &domain, tiers)?;
        let metal_galleries = normalize_galleries(&id, metal_galleries);

        Ok(Self {
            name: if name.is_empty() { id.clone() } else { name },
            id,
            base_price,
            domain,
            defaults: default_slots,
            images: images.into_iter().filter(|i| !i.trim().is_empty()).collect(),
            metal_galleries,
            tiers,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_price(&self) -> Decimal {
        self.base_price
    }

    pub fn domain(&self) -> &VariantDomain {
        &self.domain
    }

    /// Declared default option index; `None` leaves the dimension unselected.
    pub fn default_index(&self, dimension: Dimension) -> Option<usize> {
        if !dimension.is_option_based() {
            return None;
        }
        self.defaults[dimension.slot()]
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Gallery for an already-normalized metal key.
    pub fn metal_gallery(&self, key: &str) -> Option<&[String]> {
        self.metal_galleries.get(key).map(Vec::as_slice)
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn tier(&self, id: &str) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.id == id)
    }
}

fn validate_options(
    product: &str,
    dimension: Dimension,
    list: Vec<OptionRecord>,
) -> Result<Vec<ProductOption>, CatalogError> {
    let mut seen = HashSet::new();
    let mut options = Vec::with_capacity(list.len());
    for OptionRecord { label, price_delta } in list {
        if !seen.insert(label.clone()) {
            return Err(CatalogError::DuplicateOptionLabel {
                product: product.to_string(),
                dimension,
                label,
            });
        }
        options.push(ProductOption { label, price_delta });
    }
    Ok(options)
}

fn validate_tiers(
    product: &str,
    domain: &VariantDomain,
    records: Vec<TierRecord>,
) -> Result<Vec<Tier>, CatalogError> {
    let mut seen = HashSet::new();
    let mut tiers = Vec::with_capacity(records.len());

    for record in records {
        if !seen.insert(record.id.clone()) {
            return Err(CatalogError::DuplicateTierId {
                product: product.to_string(),
                tier: record.id,
            });
        }

        let name = if record.name.is_empty() {
            record.id.clone()
        } else {
            record.name
        };

        if record.bespoke {
            tiers.push(Tier {
                id: record.id,
                name,
                kind: TierKind::Bespoke,
            });
            continue;
        }

        let (Some(carat), Some(colour), Some(clarity)) =
            (record.carat, record.colour, record.clarity)
        else {
            return Err(CatalogError::IncompleteTier {
                product: product.to_string(),
                tier: record.id,
            });
        };

        for (dimension, label) in [
            (Dimension::Carat, &carat),
            (Dimension::Colour, &colour),
            (Dimension::Clarity, &clarity),
        ] {
            if domain.find(dimension, label).is_none() {
                return Err(CatalogError::UnknownTierOption {
                    product: product.to_string(),
                    tier: record.id,
                    dimension,
                    label: label.clone(),
                });
            }
        }

        tiers.push(Tier {
            id: record.id,
            name,
            kind: TierKind::Bundle {
                carat,
                colour,
                clarity,
            },
        });
    }

    Ok(tiers)
}

/// Re-key galleries by canonical metal. When two spellings collide, the
/// first non-empty gallery in declared order wins.
fn normalize_galleries(
    product: &str,
    galleries: impl IntoIterator<Item = (String, Vec<String>)>,
) -> HashMap<String, Vec<String>> {
    let mut normalized: HashMap<String, Vec<String>> = HashMap::new();
    for (label, images) in galleries {
        let images: Vec<String> = images.into_iter().filter(|i| !i.trim().is_empty()).collect();
        let key = normalize_metal(&label).into_owned();
        match normalized.get_mut(&key) {
            Some(existing) if existing.is_empty() => *existing = images,
            Some(_) => debug!(
                "Product '{}': gallery '{}' duplicates metal '{}', keeping the first",
                product, label, key
            ),
            None => {
                normalized.insert(key, images);
            }
        }
    }
    normalized
}

/// An explicit, read-only handle over validated products.
///
/// Owners construct it once and pass it by reference; there is no global
/// cache behind it.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn from_records(records: Vec<ProductRecord>) -> Result<Self, CatalogError> {
        let mut ids = HashSet::new();
        let mut products = Vec::with_capacity(records.len());
        for record in records {
            if !ids.insert(record.id.clone()) {
                return Err(CatalogError::DuplicateProductId(record.id));
            }
            products.push(Product::from_record(record)?);
        }
        info!("Loaded catalog with {} products", products.len());
        Ok(Self { products })
    }

    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        let record: CatalogRecord = toml::from_str(source)?;
        Self::from_records(record.products)
    }

    pub fn from_json_str(source: &str) -> Result<Self, CatalogError> {
        let record: CatalogRecord = serde_json::from_str(source)?;
        Self::from_records(record.products)
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ProductRecord {
        ProductRecord {
            id: "solitaire".to_string(),
            base_price: Decimal::from(1000),
            metal: vec![
                OptionRecord::new("18k Yellow Gold", Decimal::ZERO),
                OptionRecord::new("18k White Gold", Decimal::ZERO),
                OptionRecord::new("Platinum", Decimal::from(75)),
            ],
            carat: vec![
                OptionRecord::new("0.5ct", Decimal::ZERO),
                OptionRecord::new("1ct", Decimal::from(800)),
            ],
            colour: vec![OptionRecord::new("F", Decimal::ZERO)],
            clarity: vec![OptionRecord::new("VS1", Decimal::ZERO)],
            ..Default::default()
        }
    }

    #[test]
    fn test_supports_follows_option_lists() {
        let product = Product::from_record(record()).unwrap();
        let domain = product.domain();
        assert!(domain.supports(Dimension::Metal));
        assert!(domain.supports(Dimension::Carat));
        assert!(!domain.supports(Dimension::Origin));
        assert!(!domain.supports(Dimension::Size));
        assert!(!domain.supports(Dimension::Engraving));
        assert_eq!(domain.find(Dimension::Metal, "Platinum"), Some(2));
        assert_eq!(domain.find(Dimension::Metal, "platinum"), None);
        assert_eq!(product.name(), "solitaire");
    }

    #[test]
    fn test_duplicate_option_label_is_fatal() {
        let mut rec = record();
        rec.metal.push(OptionRecord::new("Platinum", Decimal::from(90)));
        let err = Product::from_record(rec).unwrap_err();
        match err {
            CatalogError::DuplicateOptionLabel {
                dimension, label, ..
            } => {
                assert_eq!(dimension, Dimension::Metal);
                assert_eq!(label, "Platinum");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_same_label_in_different_dimensions_is_fine() {
        let mut rec = record();
        rec.size = vec![OptionRecord::new("F", Decimal::ZERO)];
        assert!(Product::from_record(rec).is_ok());
    }

    #[test]
    fn test_defaults_are_validated() {
        let mut rec = record();
        rec.defaults.insert("metal".to_string(), 1);
        let product = Product::from_record(rec).unwrap();
        assert_eq!(product.default_index(Dimension::Metal), Some(1));
        assert_eq!(product.default_index(Dimension::Carat), None);

        let mut rec = record();
        rec.defaults.insert("origin".to_string(), 0);
        assert!(matches!(
            Product::from_record(rec),
            Err(CatalogError::DefaultOutOfRange { available: 0, .. })
        ));

        let mut rec = record();
        rec.defaults.insert("finish".to_string(), 0);
        assert!(matches!(
            Product::from_record(rec),
            Err(CatalogError::UnknownDimension { .. })
        ));
    }

    #[test]
    fn test_tiers_must_reference_known_options() {
        let mut rec = record();
        rec.tiers = vec![TierRecord {
            id: "signature".to_string(),
            carat: Some("2ct".to_string()),
            colour: Some("F".to_string()),
            clarity: Some("VS1".to_string()),
            ..Default::default()
        }];
        assert!(matches!(
            Product::from_record(rec),
            Err(CatalogError::UnknownTierOption { dimension: Dimension::Carat, .. })
        ));

        let mut rec = record();
        rec.tiers = vec![TierRecord {
            id: "partial".to_string(),
            carat: Some("1ct".to_string()),
            ..Default::default()
        }];
        assert!(matches!(
            Product::from_record(rec),
            Err(CatalogError::IncompleteTier { .. })
        ));
    }

    #[test]
    fn test_bespoke_tier_binds_nothing() {
        let mut rec = record();
        rec.tiers = vec![TierRecord {
            id: "bespoke".to_string(),
            name: "Bespoke".to_string(),
            bespoke: true,
            ..Default::default()
        }];
        let product = Product::from_record(rec).unwrap();
        assert!(product.tier("bespoke").unwrap().is_bespoke());
    }

    #[test]
    fn test_gallery_keys_are_normalized() {
        let mut rec = record();
        rec.metal_galleries.insert(
            "Yellow Gold".to_string(),
            vec!["yg-1.jpg".to_string(), "yg-2.jpg".to_string()],
        );
        rec.metal_galleries
            .insert("Platinum".to_string(), vec!["  ".to_string()]);
        let product = Product::from_record(rec).unwrap();
        assert_eq!(
            product.metal_gallery("18k Yellow Gold").unwrap(),
            ["yg-1.jpg", "yg-2.jpg"]
        );
        assert!(product.metal_gallery("Platinum").unwrap().is_empty());
    }

    #[test]
    fn test_colliding_galleries_keep_declared_order() {
        let catalog = Catalog::from_toml_str(
            r#"
            [[products]]
            id = "ring"
            base_price = 100

            [products.metal_galleries]
            "Yellow Gold" = ["declared-first.jpg"]
            "18k Yellow" = ["declared-second.jpg"]
            "#,
        )
        .unwrap();
        let product = catalog.product("ring").unwrap();
        assert_eq!(
            product.metal_gallery("18k Yellow Gold").unwrap(),
            ["declared-first.jpg"]
        );
    }

    #[test]
    fn test_engraving_clamp_counts_characters() {
        let rule = EngravingRule {
            fee: Decimal::from(50),
            max_length: 3,
        };
        assert_eq!(rule.clamp("abcdef"), "abc");
        assert_eq!(rule.clamp("ab"), "ab");
        assert_eq!(rule.clamp("é♥ü✓"), "é♥ü");
        assert_eq!(rule.clamp(rule.clamp("abcdef")), "abc");
    }

    #[test]
    fn test_catalog_rejects_duplicate_products() {
        let err = Catalog::from_records(vec![record(), record()]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateProductId(id) if id == "solitaire"));
    }
}
