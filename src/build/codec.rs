//! Encoding a selection into a sparse [`Build`] and hydrating it back.

use serde::Serialize;
use tracing::debug;

use crate::catalog::{Dimension, Product};
use crate::error::SelectionError;
use crate::selection::{EngravingState, Pick, SelectionState};

/// A key a share link may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkField {
    /// One of the option dimensions (never [`Dimension::Engraving`])
    Option(Dimension),
    EngravingOn,
    EngravingText,
}

impl LinkField {
    /// Every field in the order links are written.
    pub const ALL: [LinkField; 9] = [
        LinkField::Option(Dimension::Metal),
        LinkField::Option(Dimension::Origin),
        LinkField::Option(Dimension::Carat),
        LinkField::Option(Dimension::Colour),
        LinkField::Option(Dimension::Clarity),
        LinkField::Option(Dimension::Certificate),
        LinkField::Option(Dimension::Size),
        LinkField::EngravingOn,
        LinkField::EngravingText,
    ];

    pub fn key(self) -> &'static str {
        match self {
            LinkField::Option(dimension) => dimension.link_key(),
            LinkField::EngravingOn => "engravingOn",
            LinkField::EngravingText => "engravingText",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    fn order(self) -> usize {
        Self::ALL
            .iter()
            .position(|f| *f == self)
            .unwrap_or(Self::ALL.len())
    }
}

/// Sparse serialized form of a selection: only fields that carry a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Build {
    fields: Vec<(LinkField, String)>,
}

impl Build {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: LinkField) -> Option<&str> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    /// Overwrite the field in place, or insert it at its canonical position.
    pub fn set(&mut self, field: LinkField, value: impl Into<String>) {
        let value = value.into();
        if let Some(slot) = self.fields.iter_mut().find(|(f, _)| *f == field) {
            slot.1 = value;
            return;
        }
        let at = self
            .fields
            .iter()
            .position(|(f, _)| f.order() > field.order())
            .unwrap_or(self.fields.len());
        self.fields.insert(at, (field, value));
    }

    pub fn remove(&mut self, field: LinkField) {
        self.fields.retain(|(f, _)| *f != field);
    }

    pub fn iter(&self) -> impl Iterator<Item = (LinkField, &str)> {
        self.fields.iter().map(|(f, v)| (*f, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Percent-encoded `key=value&...` form.
    pub fn to_query(&self) -> String {
        self.fields
            .iter()
            .map(|(f, v)| format!("{}={}", f.key(), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Parse a query string, keeping only keys this engine understands.
    /// A leading `?` is accepted. Repeated keys keep the last value.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut build = Self::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if let Some(field) = LinkField::from_key(&key) {
                build.set(field, value.into_owned());
            }
        }
        build
    }
}

/// Serialize the non-empty parts of a selection.
///
/// Unselected and unsupported dimensions are omitted. The engraving flag is
/// written whenever the product offers engraving; the text only when
/// engraving is on, clamped to the product's maximum length.
pub fn encode(product: &Product, state: &SelectionState) -> Build {
    let domain = product.domain();
    let mut build = Build::new();

    for (dimension, _) in state.picked() {
        if let Some(label) = state.label(domain, dimension) {
            build.set(LinkField::Option(dimension), label);
        }
    }

    if let Some(rule) = domain.engraving() {
        let engraving = state.engraving();
        build.set(LinkField::EngravingOn, flag_value(engraving.on));
        let text = rule.clamp(&engraving.text);
        if engraving.on && !text.is_empty() {
            build.set(LinkField::EngravingText, text);
        }
    }

    build
}

/// Why a link field was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The value is not an option of that dimension (e.g., since removed)
    UnknownOption,
    /// The product does not offer the dimension at all
    UnsupportedDimension,
    /// Engraving fields on a product that cannot be engraved
    EngravingNotOffered,
    /// `engravingOn` was not a recognizable boolean
    InvalidFlag,
    /// Engraving text on a link that switches engraving off
    EngravingOff,
}

/// A link field that was ignored during hydration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedField {
    pub key: String,
    pub value: String,
    pub reason: SkipReason,
}

/// The overlay a link applies on top of product defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    pub picks: Vec<(Dimension, Pick)>,
    pub engraving: Option<EngravingState>,
    pub skipped: Vec<SkippedField>,
}

/// Resolve every field of a build against the product, without applying
/// anything. Fields that do not resolve are reported and left out; the
/// remaining fields stay usable.
pub fn decode(product: &Product, build: &Build) -> Decoded {
    let domain = product.domain();
    let mut decoded = Decoded::default();

    for (field, value) in build.iter() {
        let LinkField::Option(dimension) = field else {
            continue;
        };
        match SelectionState::resolve(domain, dimension, value) {
            Ok(pick) => decoded.picks.push((dimension, pick)),
            Err(err) => {
                let reason = match err {
                    SelectionError::UnsupportedDimension(_) => SkipReason::UnsupportedDimension,
                    _ => SkipReason::UnknownOption,
                };
                skip(&mut decoded, field, value, reason);
            }
        }
    }

    let flag = build.get(LinkField::EngravingOn);
    let text = build.get(LinkField::EngravingText);
    match domain.engraving() {
        None => {
            for (field, value) in [
                (LinkField::EngravingOn, flag),
                (LinkField::EngravingText, text),
            ] {
                if let Some(value) = value {
                    skip(&mut decoded, field, value, SkipReason::EngravingNotOffered);
                }
            }
        }
        Some(rule) => {
            let on = match flag.map(parse_flag) {
                Some(Some(on)) => Some(on),
                Some(None) => {
                    skip(
                        &mut decoded,
                        LinkField::EngravingOn,
                        flag.unwrap_or_default(),
                        SkipReason::InvalidFlag,
                    );
                    None
                }
                // Text without a flag implies engraving is on.
                None => text.filter(|t| !t.is_empty()).map(|_| true),
            };

            match on {
                Some(true) => {
                    decoded.engraving = Some(EngravingState {
                        on: true,
                        text: rule.clamp(text.unwrap_or_default()).to_string(),
                    });
                }
                Some(false) => {
                    if let Some(text) = text.filter(|t| !t.is_empty()) {
                        skip(&mut decoded, LinkField::EngravingText, text, SkipReason::EngravingOff);
                    }
                    decoded.engraving = Some(EngravingState::default());
                }
                None => {}
            }
        }
    }

    decoded
}

/// Result of hydrating a selection from a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hydration {
    pub state: SelectionState,
    pub skipped: Vec<SkippedField>,
}

impl SelectionState {
    /// Two-phase initializer: product defaults first, then the link overlay
    /// in one pass. Link fields win; missing or unusable fields keep the
    /// default.
    pub fn hydrate(product: &Product, build: &Build) -> Hydration {
        let decoded = decode(product, build);
        let mut state = SelectionState::with_defaults(product);
        for (dimension, pick) in decoded.picks {
            state.set_pick(dimension, Some(pick));
        }
        if let Some(engraving) = decoded.engraving {
            state.set_engraving(engraving.on, &engraving.text);
        }
        Hydration {
            state,
            skipped: decoded.skipped,
        }
    }
}

fn skip(decoded: &mut Decoded, field: LinkField, value: &str, reason: SkipReason) {
    debug!(
        "Skipping link field {}={} ({:?})",
        field.key(),
        value,
        reason
    );
    decoded.skipped.push(SkippedField {
        key: field.key().to_string(),
        value: value.to_string(),
        reason,
    });
}

pub(crate) fn flag_value(on: bool) -> &'static str {
    if on {
        "true"
    } else {
        "false"
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
