//! Carat/colour/clarity tiers.
//!
//! A tier groups three picks under one name. Selecting it writes all three
//! picks at once; the active tier is recomputed from the picks on demand,
//! so editing any one of the three simply makes the tier inactive.

use serde::Serialize;

use crate::catalog::{Dimension, Product, TierKind};
use crate::error::SelectionError;
use crate::selection::SelectionState;

/// Reported when no tier matches the current picks.
pub const NO_TIER: &str = "none";

/// Outcome of [`select_tier`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TierSelection {
    /// Carat, colour and clarity were replaced
    Applied,
    /// The bespoke tier; nothing changed, route the shopper to a consultation
    RequiresConsultation,
}

/// Apply a tier's three picks in one step.
///
/// All three labels are resolved before anything is written, so the state is
/// either fully updated or untouched.
pub fn select_tier(
    product: &Product,
    state: &mut SelectionState,
    tier_id: &str,
) -> Result<TierSelection, SelectionError> {
    let tier = product
        .tier(tier_id)
        .ok_or_else(|| SelectionError::UnknownTier(tier_id.to_string()))?;

    let (carat, colour, clarity) = match &tier.kind {
        TierKind::Bespoke => return Ok(TierSelection::RequiresConsultation),
        TierKind::Bundle {
            carat,
            colour,
            clarity,
        } => (carat, colour, clarity),
    };

    let domain = product.domain();
    let picks = [
        (Dimension::Carat, SelectionState::resolve(domain, Dimension::Carat, carat)?),
        (Dimension::Colour, SelectionState::resolve(domain, Dimension::Colour, colour)?),
        (Dimension::Clarity, SelectionState::resolve(domain, Dimension::Clarity, clarity)?),
    ];
    for (dimension, pick) in picks {
        state.set_pick(dimension, Some(pick));
    }

    Ok(TierSelection::Applied)
}

/// Id of the first tier, in declared order, whose carat, colour and clarity
/// labels equal the current picks; [`NO_TIER`] otherwise.
pub fn current_tier<'p>(product: &'p Product, state: &SelectionState) -> &'p str {
    let domain = product.domain();
    let carat = state.label(domain, Dimension::Carat);
    let colour = state.label(domain, Dimension::Colour);
    let clarity = state.label(domain, Dimension::Clarity);

    product
        .tiers()
        .iter()
        .find(|tier| match &tier.kind {
            TierKind::Bundle {
                carat: c,
                colour: co,
                clarity: cl,
            } => {
                carat == Some(c.as_str())
                    && colour == Some(co.as_str())
                    && clarity == Some(cl.as_str())
            }
            TierKind::Bespoke => false,
        })
        .map(|tier| tier.id.as_str())
        .unwrap_or(NO_TIER)
}
