//! The live share link.
//!
//! A [`LiveLink`] mirrors the page address: a base URL plus ordered query
//! parameters. Setters patch single keys in place so the link tracks the
//! in-memory selection without re-encoding everything. Parameters the engine
//! does not own (campaign tags and the like) are carried through untouched.

use url::Url;

use super::codec::{Build, LinkField};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveLink {
    base: String,
    /// Decoded key/value pairs in address order
    params: Vec<(String, String)>,
}

impl LiveLink {
    /// An empty link on the given base address. Any query or fragment on
    /// the base is dropped.
    pub fn new(base: &str) -> Self {
        Self {
            base: strip_query(base),
            params: Vec::new(),
        }
    }

    /// Parse an incoming link.
    ///
    /// Accepts a full URL, or a bare query string (with or without `?`) that
    /// is then attached to `fallback_base`.
    pub fn parse(input: &str, fallback_base: &str) -> Self {
        let input = input.trim();
        let (base, query) = match Url::parse(input) {
            Ok(url) => {
                let query = url.query().unwrap_or_default().to_string();
                (strip_query(input), query)
            }
            Err(_) => (
                strip_query(fallback_base),
                input.strip_prefix('?').unwrap_or(input).to_string(),
            ),
        };

        let params = url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Self { base, params }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Overwrite a key in place (dropping any repeats), or append it.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.params.iter().position(|(k, _)| k == key) {
            Some(first) => {
                self.params[first].1 = value.to_string();
                let mut index = 0;
                self.params.retain(|(k, _)| {
                    let keep = index <= first || k != key;
                    index += 1;
                    keep
                });
            }
            None => self.params.push((key.to_string(), value.to_string())),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.params.retain(|(k, _)| k != key);
    }

    /// Patch one engine field: `Some` overwrites or appends, `None` removes.
    pub fn set_field(&mut self, field: LinkField, value: Option<&str>) {
        match value {
            Some(value) => self.set(field.key(), value),
            None => self.remove(field.key()),
        }
    }

    /// Replace every engine field with the contents of `build`, leaving
    /// foreign parameters where they are.
    pub fn replace_build(&mut self, build: &Build) {
        self.params
            .retain(|(k, _)| LinkField::from_key(k).is_none());
        for (field, value) in build.iter() {
            self.params.push((field.key().to_string(), value.to_string()));
        }
    }

    /// The engine fields currently on the link.
    pub fn build(&self) -> Build {
        let mut build = Build::new();
        for (key, value) in &self.params {
            if let Some(field) = LinkField::from_key(key) {
                build.set(field, value.as_str());
            }
        }
        build
    }

    /// Percent-encoded query string, without the leading `?`.
    pub fn query(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// The full shareable address.
    pub fn to_url(&self) -> String {
        if self.params.is_empty() {
            self.base.clone()
        } else {
            format!("{}?{}", self.base, self.query())
        }
    }
}

impl std::fmt::Display for LiveLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_url())
    }
}

fn strip_query(address: &str) -> String {
    let end = address.find(['?', '#']).unwrap_or(address.len());
    address[..end].to_string()
}
