//! The configurator: one product, one selection, one live link.
//!
//! This is the surface rendering code consumes. It exposes the current
//! price, gallery and tier as plain values, one setter per dimension, and
//! `copy_link`. Every setter updates the selection and patches the live link
//! in the same call, so the link always reflects the in-memory state.
//! Failed edits are logged and returned; they never leave the selection
//! half-applied.

use std::borrow::Cow;
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::build::{
    encode, flag_value, write_with_timeout, Clipboard, LinkField, LiveLink, SkippedField,
};
use crate::catalog::{Dimension, Product};
use crate::config::EngineConfig;
use crate::error::SelectionError;
use crate::gallery::{resolve_gallery, resolve_primary};
use crate::pricing::{format_gbp, price_breakdown, total_price, PriceBreakdown};
use crate::selection::{EngravingState, SelectionState, UNKNOWN_SIZE};
use crate::tier::{current_tier, select_tier, TierSelection};

pub struct Configurator<'a> {
    product: &'a Product,
    config: &'a EngineConfig,
    state: SelectionState,
    link: LiveLink,
    skipped: Vec<SkippedField>,
}

impl<'a> Configurator<'a> {
    /// Start from the product's declared defaults.
    pub fn new(product: &'a Product, config: &'a EngineConfig) -> Self {
        let state = SelectionState::with_defaults(product);
        let mut link = LiveLink::new(&config.share_base_url);
        link.replace_build(&encode(product, &state));
        Self {
            product,
            config,
            state,
            link,
            skipped: Vec::new(),
        }
    }

    /// Restore a shared build. Link fields win over defaults; fields that
    /// no longer resolve are skipped and reported through
    /// [`Configurator::skipped_fields`].
    pub fn from_link(product: &'a Product, config: &'a EngineConfig, link: &str) -> Self {
        let mut live = LiveLink::parse(link, &config.share_base_url);
        let hydration = SelectionState::hydrate(product, &live.build());
        if !hydration.skipped.is_empty() {
            debug!(
                "Hydrated '{}' with {} skipped link field(s)",
                product.id(),
                hydration.skipped.len()
            );
        }
        live.replace_build(&encode(product, &hydration.state));
        Self {
            product,
            config,
            state: hydration.state,
            link: live,
            skipped: hydration.skipped,
        }
    }

    pub fn product(&self) -> &'a Product {
        self.product
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn link(&self) -> &LiveLink {
        &self.link
    }

    /// Link fields ignored when this configurator was restored.
    pub fn skipped_fields(&self) -> &[SkippedField] {
        &self.skipped
    }

    // --- Setters ---

    /// Replace the pick for an option dimension; `None` clears it.
    pub fn set_dimension(
        &mut self,
        dimension: Dimension,
        label: Option<&str>,
    ) -> Result<(), SelectionError> {
        if let Err(err) = self
            .state
            .set_dimension(self.product.domain(), dimension, label)
        {
            debug!("Ignoring {} change on '{}': {}", dimension, self.product.id(), err);
            return Err(err);
        }
        self.patch_dimension(dimension);
        Ok(())
    }

    pub fn set_metal(&mut self, label: &str) -> Result<(), SelectionError> {
        self.set_dimension(Dimension::Metal, Some(label))
    }

    pub fn set_origin(&mut self, label: &str) -> Result<(), SelectionError> {
        self.set_dimension(Dimension::Origin, Some(label))
    }

    pub fn set_carat(&mut self, label: &str) -> Result<(), SelectionError> {
        self.set_dimension(Dimension::Carat, Some(label))
    }

    pub fn set_colour(&mut self, label: &str) -> Result<(), SelectionError> {
        self.set_dimension(Dimension::Colour, Some(label))
    }

    pub fn set_clarity(&mut self, label: &str) -> Result<(), SelectionError> {
        self.set_dimension(Dimension::Clarity, Some(label))
    }

    pub fn set_certificate(&mut self, label: &str) -> Result<(), SelectionError> {
        self.set_dimension(Dimension::Certificate, Some(label))
    }

    pub fn set_size(&mut self, label: &str) -> Result<(), SelectionError> {
        self.set_dimension(Dimension::Size, Some(label))
    }

    pub fn set_size_unknown(&mut self) -> Result<(), SelectionError> {
        self.set_dimension(Dimension::Size, Some(UNKNOWN_SIZE))
    }

    /// Switch engraving on or off. The text is clamped to the product's
    /// maximum length; switching off clears it from the state and the link.
    pub fn set_engraving(&mut self, on: bool, text: &str) -> Result<(), SelectionError> {
        let Some(rule) = self.product.domain().engraving().copied() else {
            debug!("Ignoring engraving on '{}': not offered", self.product.id());
            return Err(SelectionError::UnsupportedDimension(Dimension::Engraving));
        };

        self.state.set_engraving(on, rule.clamp(text));

        let engraving = self.state.engraving();
        let text = Some(engraving.text.as_str()).filter(|t| engraving.on && !t.is_empty());
        self.link
            .set_field(LinkField::EngravingOn, Some(flag_value(engraving.on)));
        self.link.set_field(LinkField::EngravingText, text);
        Ok(())
    }

    /// Apply a carat/colour/clarity tier in one step.
    ///
    /// The bespoke tier changes nothing and returns
    /// [`TierSelection::RequiresConsultation`]; callers hand off to the
    /// enquiry flow.
    pub fn select_tier(&mut self, tier_id: &str) -> Result<TierSelection, SelectionError> {
        let outcome = select_tier(self.product, &mut self.state, tier_id).inspect_err(|err| {
            debug!("Ignoring tier on '{}': {}", self.product.id(), err);
        })?;
        if outcome == TierSelection::Applied {
            for dimension in [Dimension::Carat, Dimension::Colour, Dimension::Clarity] {
                self.patch_dimension(dimension);
            }
        }
        Ok(outcome)
    }

    fn patch_dimension(&mut self, dimension: Dimension) {
        let label = self.state.label(self.product.domain(), dimension);
        self.link.set_field(LinkField::Option(dimension), label);
    }

    // --- Derived values ---

    pub fn total_price(&self) -> Decimal {
        total_price(self.product, &self.state)
    }

    pub fn price_breakdown(&self) -> PriceBreakdown {
        price_breakdown(self.product, &self.state)
    }

    fn metal_label(&self) -> Option<&'a str> {
        self.state.label(self.product.domain(), Dimension::Metal)
    }

    pub fn gallery(&self) -> Cow<'a, [String]> {
        resolve_gallery(self.product, self.metal_label(), &self.config.placeholder_image)
    }

    pub fn primary_image(&self) -> &str {
        resolve_primary(self.product, self.metal_label(), &self.config.placeholder_image)
    }

    /// Active tier id, or `"none"`.
    pub fn current_tier(&self) -> &'a str {
        current_tier(self.product, &self.state)
    }

    pub fn share_url(&self) -> String {
        self.link.to_url()
    }

    /// Copy the share link. Returns whether the write succeeded; a failure
    /// is logged once and never propagated.
    pub async fn copy_link<C: Clipboard>(&self, clipboard: &C) -> bool {
        let url = self.share_url();
        match write_with_timeout(clipboard, &url, self.config.clipboard_timeout()).await {
            Ok(()) => {
                info!("Copied share link for '{}'", self.product.id());
                true
            }
            Err(e) => {
                warn!("Could not copy share link: {}", e);
                false
            }
        }
    }

    /// Snapshot of everything a renderer needs.
    pub fn view(&self) -> ConfiguratorView {
        let domain = self.product.domain();
        let selections = Dimension::OPTION_DIMENSIONS
            .into_iter()
            .filter_map(|d| self.state.label(domain, d).map(|l| (d, l.to_string())))
            .collect();
        let breakdown = self.price_breakdown();

        ConfiguratorView {
            product_id: self.product.id().to_string(),
            product_name: self.product.name().to_string(),
            selections,
            engraving: domain
                .supports(Dimension::Engraving)
                .then(|| self.state.engraving().clone()),
            total_price: breakdown.total,
            total_display: format_gbp(breakdown.total),
            breakdown,
            gallery: self.gallery().into_owned(),
            primary_image: self.primary_image().to_string(),
            tier: self.current_tier().to_string(),
            share_url: self.share_url(),
            skipped_fields: self.skipped.clone(),
        }
    }
}

/// Serializable snapshot of a configurator.
#[derive(Debug, Clone, Serialize)]
pub struct ConfiguratorView {
    pub product_id: String,
    pub product_name: String,
    pub selections: BTreeMap<Dimension, String>,
    pub engraving: Option<EngravingState>,
    pub total_price: Decimal,
    pub total_display: String,
    pub breakdown: PriceBreakdown,
    pub gallery: Vec<String>,
    pub primary_image: String,
    pub tier: String,
    pub share_url: String,
    pub skipped_fields: Vec<SkippedField>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::MemoryClipboard;
    use crate::catalog::sample_catalog;
    use crate::error::ClipboardError;

    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        async fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Rejected("permission denied".to_string()))
        }
    }

    #[test]
    fn test_new_link_reflects_defaults() {
        let catalog = sample_catalog().unwrap();
        let config = EngineConfig::default();
        let product = catalog.product("plain-band").unwrap();
        let configurator = Configurator::new(product, &config);
        assert_eq!(
            configurator.share_url(),
            format!(
                "{}?metal=18k%20Yellow%20Gold&engravingOn=false",
                config.share_base_url
            )
        );
    }

    #[test]
    fn test_rejected_setter_leaves_state_and_link() {
        let catalog = sample_catalog().unwrap();
        let config = EngineConfig::default();
        let product = catalog.product("plain-band").unwrap();
        let mut configurator = Configurator::new(product, &config);
        let url = configurator.share_url();
        let state = configurator.state().clone();

        assert!(configurator.set_metal("Titanium").is_err());
        assert!(configurator.set_carat("1ct").is_err());
        assert_eq!(configurator.share_url(), url);
        assert_eq!(configurator.state(), &state);
    }

    #[test]
    fn test_tier_patches_three_fields() {
        let catalog = sample_catalog().unwrap();
        let config = EngineConfig::default();
        let product = catalog.product("classic-solitaire").unwrap();
        let mut configurator = Configurator::new(product, &config);

        assert_eq!(
            configurator.select_tier("exceptional").unwrap(),
            TierSelection::Applied
        );
        let link = configurator.link();
        assert_eq!(link.get("carat"), Some("1.5ct"));
        assert_eq!(link.get("colour"), Some("D"));
        assert_eq!(link.get("clarity"), Some("VVS1"));
        assert_eq!(configurator.current_tier(), "exceptional");

        assert_eq!(
            configurator.select_tier("bespoke").unwrap(),
            TierSelection::RequiresConsultation
        );
        assert_eq!(configurator.current_tier(), "exceptional");
    }

    #[test]
    fn test_engraving_not_offered() {
        let catalog = sample_catalog().unwrap();
        let config = EngineConfig::default();
        let product = catalog.product("halo-pave").unwrap();
        let mut configurator = Configurator::new(product, &config);
        assert_eq!(
            configurator.set_engraving(true, "Hi"),
            Err(SelectionError::UnsupportedDimension(Dimension::Engraving))
        );
        assert!(configurator.view().engraving.is_none());
        assert!(configurator.link().get("engravingOn").is_none());
    }

    #[tokio::test]
    async fn test_copy_link_reports_success_and_failure() {
        let catalog = sample_catalog().unwrap();
        let config = EngineConfig::default();
        let product = catalog.product("classic-solitaire").unwrap();
        let configurator = Configurator::new(product, &config);

        let clipboard = MemoryClipboard::new();
        assert!(configurator.copy_link(&clipboard).await);
        assert_eq!(clipboard.contents(), Some(configurator.share_url()));

        assert!(!configurator.copy_link(&BrokenClipboard).await);
    }

    #[test]
    fn test_view_serializes() {
        let catalog = sample_catalog().unwrap();
        let config = EngineConfig::default();
        let product = catalog.product("classic-solitaire").unwrap();
        let configurator = Configurator::new(product, &config);
        let json = serde_json::to_value(configurator.view()).unwrap();
        assert_eq!(json["product_id"], "classic-solitaire");
        assert_eq!(json["selections"]["metal"], "18k White Gold");
        assert_eq!(json["tier"], "none");
        assert!(json["gallery"].as_array().unwrap().len() >= 1);
    }
}
