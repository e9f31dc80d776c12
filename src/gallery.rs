//! Image gallery resolution for a (product, metal) pair.
//!
//! Fallback order:
//! 1. the product's gallery for the normalized metal, if non-empty
//! 2. the product's generic image list, if non-empty
//! 3. a single placeholder image
//!
//! The resolved list is never empty.

use std::borrow::Cow;

use crate::catalog::Product;
use crate::metal::normalize_metal;

pub fn resolve_gallery<'a>(
    product: &'a Product,
    metal: Option<&str>,
    placeholder: &'a str,
) -> Cow<'a, [String]> {
    if let Some(label) = metal {
        let key = normalize_metal(label);
        if let Some(images) = product.metal_gallery(&key).filter(|i| !i.is_empty()) {
            return Cow::Borrowed(images);
        }
    }

    if !product.images().is_empty() {
        return Cow::Borrowed(product.images());
    }

    Cow::Owned(vec![placeholder.to_string()])
}

/// First image of the resolved gallery.
pub fn resolve_primary<'a>(product: &'a Product, metal: Option<&str>, placeholder: &'a str) -> &'a str {
    if let Some(label) = metal {
        let key = normalize_metal(label);
        if let Some(first) = product.metal_gallery(&key).and_then(|i| i.first()) {
            return first;
        }
    }

    product
        .images()
        .first()
        .map(String::as_str)
        .unwrap_or(placeholder)
}
