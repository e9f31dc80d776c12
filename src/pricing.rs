//! Price computation.
//!
//! The total is always derived from the full current selection; nothing is
//! cached between edits.

use num_format::{Locale, ToFormattedString};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::catalog::{Dimension, Product};
use crate::selection::SelectionState;

/// One contribution to the total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceLine {
    /// `None` for the engraving fee
    pub dimension: Option<Dimension>,
    pub label: String,
    pub amount: Decimal,
}

/// Itemized price for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBreakdown {
    pub base: Decimal,
    pub lines: Vec<PriceLine>,
    /// Base plus every line, before clamping; saturates at the `Decimal` range
    pub subtotal: Decimal,
    /// `max(0, subtotal)`
    pub total: Decimal,
    /// True if the subtotal was negative or saturated
    pub clamped: bool,
}

/// `max(0, base + Σ picked deltas + engraving fee if engraving is on)`.
pub fn total_price(product: &Product, state: &SelectionState) -> Decimal {
    price_breakdown(product, state).total
}

pub fn price_breakdown(product: &Product, state: &SelectionState) -> PriceBreakdown {
    let domain = product.domain();
    let mut lines = Vec::new();

    for dimension in Dimension::OPTION_DIMENSIONS {
        if let Some(option) = state.option(domain, dimension) {
            lines.push(PriceLine {
                dimension: Some(dimension),
                label: option.label.clone(),
                amount: option.price_delta,
            });
        }
    }

    if state.engraving().on {
        if let Some(rule) = domain.engraving() {
            lines.push(PriceLine {
                dimension: None,
                label: "Engraving".to_string(),
                amount: rule.fee,
            });
        }
    }

    let base = product.base_price();
    let mut overflowed = false;
    let subtotal = lines.iter().fold(base, |acc, line| {
        acc.checked_add(line.amount).unwrap_or_else(|| {
            overflowed = true;
            if line.amount.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            }
        })
    });
    if overflowed {
        warn!(
            "Price for '{}' is out of range; saturating at {}",
            product.id(),
            subtotal
        );
    }
    let negative = subtotal < Decimal::ZERO;
    if negative {
        warn!(
            "Price for '{}' came to {} after deltas; clamping to zero",
            product.id(),
            subtotal
        );
    }
    let clamped = overflowed || negative;

    PriceBreakdown {
        base,
        lines,
        subtotal,
        total: subtotal.max(Decimal::ZERO),
        clamped,
    }
}

/// Render a GBP amount as `£1,125` or `£49.99`.
pub fn format_gbp(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let abs = rounded.abs();

    let whole = abs.trunc();
    let pence = ((abs - whole) * Decimal::ONE_HUNDRED).trunc();
    let grouped = whole
        .to_u128()
        .unwrap_or_default()
        .to_formatted_string(&Locale::en);

    let sign = if negative { "-" } else { "" };
    if pence.is_zero() {
        format!("{}£{}", sign, grouped)
    } else {
        format!("{}£{}.{:0>2}", sign, grouped, pence.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EngravingRecord, OptionRecord, ProductRecord};

    fn product() -> Product {
        let record = ProductRecord {
            id: "ring".to_string(),
            base_price: Decimal::from(1000),
            metal: vec![
                OptionRecord::new("18k White Gold", Decimal::ZERO),
                OptionRecord::new("Platinum", Decimal::from(75)),
            ],
            origin: vec![
                OptionRecord::new("Natural", Decimal::ZERO),
                OptionRecord::new("Lab Grown", Decimal::from(-1500)),
            ],
            size: vec![OptionRecord::new("K", Decimal::ZERO)],
            engraving: Some(EngravingRecord {
                fee: Decimal::from(50),
                max_length: 20,
            }),
            ..Default::default()
        };
        Product::from_record(record).unwrap()
    }

    #[test]
    fn test_platinum_with_engraving() {
        let p = product();
        let mut state = SelectionState::new();
        state
            .set_dimension(p.domain(), Dimension::Metal, Some("Platinum"))
            .unwrap();
        state.set_engraving(true, "A & B");
        assert_eq!(total_price(&p, &state), Decimal::from(1125));

        let breakdown = price_breakdown(&p, &state);
        assert_eq!(breakdown.lines.len(), 2);
        assert_eq!(breakdown.lines[1].dimension, None);
        assert!(!breakdown.clamped);
    }

    #[test]
    fn test_unselected_dimensions_add_nothing() {
        let p = product();
        let state = SelectionState::new();
        assert_eq!(total_price(&p, &state), Decimal::from(1000));
    }

    #[test]
    fn test_unknown_size_adds_nothing() {
        let p = product();
        let mut state = SelectionState::new();
        state
            .set_dimension(p.domain(), Dimension::Size, Some("unknown"))
            .unwrap();
        assert_eq!(total_price(&p, &state), Decimal::from(1000));
    }

    #[test]
    fn test_negative_total_is_clamped() {
        let p = product();
        let mut state = SelectionState::new();
        state
            .set_dimension(p.domain(), Dimension::Origin, Some("Lab Grown"))
            .unwrap();
        let breakdown = price_breakdown(&p, &state);
        assert_eq!(breakdown.subtotal, Decimal::from(-500));
        assert_eq!(breakdown.total, Decimal::ZERO);
        assert!(breakdown.clamped);
    }

    #[test]
    fn test_overflowing_subtotal_saturates() {
        let mut record = ProductRecord {
            id: "vault".to_string(),
            base_price: Decimal::MAX,
            metal: vec![OptionRecord::new("Platinum", Decimal::ONE)],
            ..Default::default()
        };
        record.defaults.insert("metal".to_string(), 0);
        let p = Product::from_record(record).unwrap();
        let state = SelectionState::with_defaults(&p);

        assert_eq!(total_price(&p, &state), Decimal::MAX);
        let breakdown = price_breakdown(&p, &state);
        assert_eq!(breakdown.subtotal, Decimal::MAX);
        assert!(breakdown.clamped);
    }

    #[test]
    fn test_underflowing_subtotal_clamps_to_zero() {
        let mut record = ProductRecord {
            id: "debt".to_string(),
            base_price: Decimal::MIN,
            origin: vec![OptionRecord::new("Lab Grown", Decimal::NEGATIVE_ONE)],
            ..Default::default()
        };
        record.defaults.insert("origin".to_string(), 0);
        let p = Product::from_record(record).unwrap();
        let breakdown = price_breakdown(&p, &SelectionState::with_defaults(&p));
        assert_eq!(breakdown.subtotal, Decimal::MIN);
        assert_eq!(breakdown.total, Decimal::ZERO);
        assert!(breakdown.clamped);
    }

    #[test]
    fn test_engraving_fee_ignored_without_engraving_support() {
        let record = ProductRecord {
            id: "plain".to_string(),
            base_price: Decimal::from(200),
            ..Default::default()
        };
        let p = Product::from_record(record).unwrap();
        let mut state = SelectionState::new();
        state.set_engraving(true, "hi");
        assert_eq!(total_price(&p, &state), Decimal::from(200));
    }

    #[test]
    fn test_format_gbp() {
        assert_eq!(format_gbp(Decimal::from(1125)), "£1,125");
        assert_eq!(format_gbp(Decimal::new(4999, 2)), "£49.99");
        assert_eq!(format_gbp(Decimal::new(12345050, 2)), "£123,450.50");
        assert_eq!(format_gbp(Decimal::from(999)), "£999");
        assert_eq!(format_gbp(Decimal::ZERO), "£0");
        assert_eq!(format_gbp(Decimal::from(-75)), "-£75");
        assert_eq!(format_gbp(Decimal::from(1_234_567_890u64)), "£1,234,567,890");
    }
}
