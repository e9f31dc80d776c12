//! Catalog loading.
//!
//! Provides two loading methods:
//! - `sample_catalog()` - The demo catalog compiled into the binary
//! - `load_catalog(path)` - A TOML or JSON catalog from disk

use std::path::Path;

use anyhow::{Context, Result};

use crate::error::CatalogError;

use super::domain::Catalog;

/// Demo catalog embedded at compile time from `config/sample_catalog.toml`.
const SAMPLE_CATALOG: &str = include_str!("../../config/sample_catalog.toml");

/// Load and validate a catalog file.
///
/// Files ending in `.json` are parsed as JSON, everything else as TOML.
///
/// # Returns
/// * `Ok(Catalog)` - Every product validated
/// * `Err` - If the file cannot be read, does not parse, or fails validation
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog at {:?}", path))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let catalog = if is_json {
        Catalog::from_json_str(&content)
    } else {
        Catalog::from_toml_str(&content)
    }
    .with_context(|| format!("Invalid catalog at {:?}", path))?;

    Ok(catalog)
}

/// The embedded demo catalog.
pub fn sample_catalog() -> Result<Catalog, CatalogError> {
    Catalog::from_toml_str(SAMPLE_CATALOG)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::catalog::Dimension;

    #[test]
    fn test_sample_catalog_loads() {
        let catalog = sample_catalog().unwrap();
        assert!(!catalog.is_empty());
        for product in catalog.products() {
            assert!(product.domain().supports(Dimension::Metal));
        }
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            [[products]]
            id = "band"
            base_price = 300

            [[products.metal]]
            label = "Platinum"
            price_delta = 120
            "#
        )
        .unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.product("band").is_some());
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{ "products": [ {{ "id": "band", "base_price": "300.50", "size": [ {{ "label": "K" }} ] }} ] }}"#
        )
        .unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        let product = catalog.product("band").unwrap();
        assert!(product.domain().supports(Dimension::Size));
        assert_eq!(product.base_price().to_string(), "300.50");
    }

    #[test]
    fn test_duplicate_label_fails_load() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            [[products]]
            id = "band"
            base_price = 300
            metal = [{{ label = "Platinum" }}, {{ label = "Platinum" }}]
            "#
        )
        .unwrap();

        let err = load_catalog(file.path()).unwrap_err();
        let root = err.root_cause().to_string();
        assert!(root.contains("twice"), "unexpected error: {}", root);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_catalog(Path::new("/nonexistent/catalog.toml")).unwrap_err();
        assert!(err.to_string().contains("catalog.toml"));
    }
}
