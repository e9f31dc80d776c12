//! The current choice per dimension for one configurator instance.
//!
//! A [`SelectionState`] only stores option indices; labels and price deltas
//! always come from the product's [`VariantDomain`], so the state can never
//! hold an option the product does not offer.

use serde::Serialize;

use crate::catalog::{Dimension, Product, ProductOption, VariantDomain};
use crate::error::SelectionError;

/// Link and CLI value for "I don't know my ring size".
pub const UNKNOWN_SIZE: &str = "unknown";

const OPTION_SLOTS: usize = Dimension::OPTION_DIMENSIONS.len();

/// What is chosen for one option dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    /// Index into the domain's option list for that dimension
    Option(usize),
    /// Ring size not known yet; only valid for [`Dimension::Size`]
    UnknownSize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EngravingState {
    pub on: bool,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    picks: [Option<Pick>; OPTION_SLOTS],
    engraving: EngravingState,
}

impl SelectionState {
    /// An empty selection: nothing picked, engraving off.
    pub fn new() -> Self {
        Self::default()
    }

    /// A selection seeded with the product's declared defaults.
    pub fn with_defaults(product: &Product) -> Self {
        let mut state = Self::new();
        state.seed_defaults(product);
        state
    }

    /// Reset every dimension to the product-declared default.
    ///
    /// Dimensions without a declared default end up unselected; engraving is
    /// switched off.
    pub fn seed_defaults(&mut self, product: &Product) {
        for dimension in Dimension::OPTION_DIMENSIONS {
            self.picks[dimension.slot()] = product.default_index(dimension).map(Pick::Option);
        }
        self.engraving = EngravingState::default();
    }

    pub fn pick(&self, dimension: Dimension) -> Option<Pick> {
        if !dimension.is_option_based() {
            return None;
        }
        self.picks[dimension.slot()]
    }

    /// The picked option, if the pick refers to a catalog option.
    pub fn option<'d>(&self, domain: &'d VariantDomain, dimension: Dimension) -> Option<&'d ProductOption> {
        match self.pick(dimension)? {
            Pick::Option(index) => domain.option(dimension, index),
            Pick::UnknownSize => None,
        }
    }

    /// Label of the current pick, with the size sentinel spelled out.
    pub fn label<'d>(&self, domain: &'d VariantDomain, dimension: Dimension) -> Option<&'d str> {
        match self.pick(dimension)? {
            Pick::Option(index) => domain.option(dimension, index).map(|o| o.label.as_str()),
            Pick::UnknownSize => Some(UNKNOWN_SIZE),
        }
    }

    /// Resolve a label to a pick without touching the state.
    pub fn resolve(
        domain: &VariantDomain,
        dimension: Dimension,
        label: &str,
    ) -> Result<Pick, SelectionError> {
        if !dimension.is_option_based() {
            return Err(SelectionError::NotAnOptionDimension(dimension));
        }
        if !domain.supports(dimension) {
            return Err(SelectionError::UnsupportedDimension(dimension));
        }
        if let Some(index) = domain.find(dimension, label) {
            return Ok(Pick::Option(index));
        }
        if dimension == Dimension::Size && label.eq_ignore_ascii_case(UNKNOWN_SIZE) {
            return Ok(Pick::UnknownSize);
        }
        Err(SelectionError::IncompatibleOption {
            dimension,
            label: label.to_string(),
        })
    }

    /// Replace the choice for a dimension. `None` clears it.
    ///
    /// # Errors
    /// Rejects labels outside the product's domain; the state is unchanged.
    pub fn set_dimension(
        &mut self,
        domain: &VariantDomain,
        dimension: Dimension,
        label: Option<&str>,
    ) -> Result<(), SelectionError> {
        let pick = match label {
            Some(label) => Some(Self::resolve(domain, dimension, label)?),
            None if dimension.is_option_based() => None,
            None => return Err(SelectionError::NotAnOptionDimension(dimension)),
        };
        self.picks[dimension.slot()] = pick;
        Ok(())
    }

    /// Assign an already-resolved pick. Callers resolve against the domain
    /// first, so this cannot fail.
    pub(crate) fn set_pick(&mut self, dimension: Dimension, pick: Option<Pick>) {
        if dimension.is_option_based() {
            self.picks[dimension.slot()] = pick;
        }
    }

    /// Switch engraving on or off. Switching off clears the text.
    pub fn set_engraving(&mut self, on: bool, text: &str) {
        self.engraving.on = on;
        self.engraving.text = if on { text.to_string() } else { String::new() };
    }

    pub fn engraving(&self) -> &EngravingState {
        &self.engraving
    }

    /// Option dimensions that currently hold a pick, in canonical order.
    pub fn picked(&self) -> impl Iterator<Item = (Dimension, Pick)> + '_ {
        Dimension::OPTION_DIMENSIONS
            .into_iter()
            .filter_map(|d| self.picks[d.slot()].map(|p| (d, p)))
    }
}
