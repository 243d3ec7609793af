//! Binds configuration values onto page markers.
//!
//! # Marker Vocabulary
//! ```text
//! text-config-key="K"      → element text      = config[K]
//! href-config-key="K"      → href attribute    = config[K]
//! placeholder-config-key   → placeholder attr  = config[K]
//! src-config-key           → src attribute     = config[K]
//! style-bg-config-key      → background-image  = url("config[K]")
//!
//! PAGE_DESCRIPTION → meta[name=description], meta[property=og:description]
//! PAGE_TITLE       → meta[property=og:title]
//! OG_IMAGE         → meta[property=og:image]
//! ```

use std::collections::BTreeSet;

use serde::Serialize;

use crate::data::ConfigMap;
use crate::page::document::{Document, Element, MetaAttr};

/// Kinds of config marker an element can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Text,
    Href,
    Placeholder,
    Src,
    BackgroundImage,
}

impl MarkerKind {
    pub const ALL: [MarkerKind; 5] = [
        MarkerKind::Text,
        MarkerKind::Href,
        MarkerKind::Placeholder,
        MarkerKind::Src,
        MarkerKind::BackgroundImage,
    ];

    /// Attribute naming the config key.
    pub fn attribute(&self) -> &'static str {
        match self {
            MarkerKind::Text => "text-config-key",
            MarkerKind::Href => "href-config-key",
            MarkerKind::Placeholder => "placeholder-config-key",
            MarkerKind::Src => "src-config-key",
            MarkerKind::BackgroundImage => "style-bg-config-key",
        }
    }

    /// Write `value` into `element`. Returns true when anything changed.
    fn bind(&self, element: &mut Element, value: &str) -> bool {
        match self {
            MarkerKind::Text => replace(&mut element.text, value),
            MarkerKind::Href => set_attr(element, "href", value),
            MarkerKind::Placeholder => set_attr(element, "placeholder", value),
            MarkerKind::Src => set_attr(element, "src", value),
            MarkerKind::BackgroundImage => {
                let css = format!("url(\"{}\")", value);
                if element.background_image.as_deref() == Some(css.as_str()) {
                    false
                } else {
                    element.background_image = Some(css);
                    true
                }
            }
        }
    }
}

/// Config keys mirrored into page metadata.
const META_BINDINGS: [(&str, MetaAttr, &str); 4] = [
    ("PAGE_DESCRIPTION", MetaAttr::Name, "description"),
    ("PAGE_DESCRIPTION", MetaAttr::Property, "og:description"),
    ("PAGE_TITLE", MetaAttr::Property, "og:title"),
    ("OG_IMAGE", MetaAttr::Property, "og:image"),
];

/// Whether markers without a config value are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    #[default]
    Lenient,
    Strict,
}

/// Outcome of one apply pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Number of element or meta values actually changed.
    pub mutations: usize,
    /// Marker keys with no config value (strict mode only).
    pub unresolved: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigApplier {
    strictness: Strictness,
}

impl ConfigApplier {
    pub fn new(strictness: Strictness) -> Self {
        Self { strictness }
    }

    /// Bind `config` onto `document`. Idempotent; an empty config changes nothing.
    pub fn apply(&self, config: &ConfigMap, document: &mut Document) -> ApplyReport {
        let mut report = ApplyReport::default();
        if config.is_empty() {
            return report;
        }

        let mut unresolved = BTreeSet::new();

        for element in &mut document.elements {
            for kind in MarkerKind::ALL {
                let Some(key) = element.marker(kind).map(str::to_string) else {
                    continue;
                };
                match config.get(&key) {
                    Some(value) => {
                        if kind.bind(element, value) {
                            report.mutations += 1;
                        }
                    }
                    None => {
                        unresolved.insert(key);
                    }
                }
            }
        }

        for (key, attr, name) in META_BINDINGS {
            match config.get(key) {
                Some(value) if !value.is_empty() => {
                    if document.upsert_meta(attr, name, value) {
                        report.mutations += 1;
                    }
                }
                _ => {}
            }
        }

        if self.strictness == Strictness::Strict && !unresolved.is_empty() {
            report.unresolved = unresolved.into_iter().collect();
            tracing::warn!(keys = ?report.unresolved, "Config markers without a value");
        }

        report
    }
}

fn replace(slot: &mut String, value: &str) -> bool {
    if slot == value {
        return false;
    }
    *slot = value.to_string();
    true
}

fn set_attr(element: &mut Element, name: &str, value: &str) -> bool {
    if element.attr(name) == Some(value) {
        return false;
    }
    element.attributes.insert(name.to_string(), value.to_string());
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pairs: &[(&str, &str)]) -> ConfigMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn page() -> Document {
        let mut doc = Document::new();
        doc.push(Element::new("h1").with_attr("text-config-key", "TITLE").with_text("Loading"));
        doc.push(Element::new("span").with_attr("text-config-key", "TITLE"));
        doc.push(Element::new("a").with_attr("href-config-key", "BOOKING_URL").with_attr("href", "#"));
        doc.push(Element::new("input").with_attr("placeholder-config-key", "EMAIL_HINT"));
        doc.push(Element::new("img").with_attr("src-config-key", "LOGO"));
        doc.push(Element::new("section").with_attr("style-bg-config-key", "HERO_BG"));
        doc
    }

    #[test]
    fn test_empty_config_is_noop() {
        let mut doc = page();
        let before = doc.clone();
        let report = ConfigApplier::default().apply(&ConfigMap::new(), &mut doc);
        assert_eq!(report.mutations, 0);
        assert_eq!(doc, before);
    }

    #[test]
    fn test_text_binding_is_idempotent() {
        let mut doc = page();
        let applier = ConfigApplier::default();
        let cfg = config(&[("TITLE", "X")]);

        let first = applier.apply(&cfg, &mut doc);
        assert_eq!(first.mutations, 2);
        assert_eq!(doc.elements[0].text, "X");
        assert_eq!(doc.elements[1].text, "X");
        assert!(first.unresolved.is_empty());

        let after_first = doc.clone();
        let second = applier.apply(&cfg, &mut doc);
        assert_eq!(second.mutations, 0);
        assert_eq!(doc, after_first);
    }

    #[test]
    fn test_attribute_and_background_bindings() {
        let mut doc = page();
        let cfg = config(&[
            ("BOOKING_URL", "https://book.example"),
            ("EMAIL_HINT", "you@example.com"),
            ("LOGO", "assets/logo.png"),
            ("HERO_BG", "assets/hero.jpg"),
        ]);
        ConfigApplier::default().apply(&cfg, &mut doc);

        assert_eq!(doc.elements[2].attr("href"), Some("https://book.example"));
        assert_eq!(doc.elements[3].attr("placeholder"), Some("you@example.com"));
        assert_eq!(doc.elements[4].attr("src"), Some("assets/logo.png"));
        assert_eq!(
            doc.elements[5].background_image.as_deref(),
            Some("url(\"assets/hero.jpg\")")
        );
        // Unmatched markers are untouched.
        assert_eq!(doc.elements[0].text, "Loading");
    }

    #[test]
    fn test_meta_bindings_create_missing_tags() {
        let mut doc = Document::new();
        let cfg = config(&[
            ("PAGE_DESCRIPTION", "Bridal makeup"),
            ("PAGE_TITLE", "Studio"),
            ("OG_IMAGE", ""),
        ]);
        let report = ConfigApplier::default().apply(&cfg, &mut doc);

        assert_eq!(report.mutations, 3);
        assert_eq!(doc.meta_content(MetaAttr::Name, "description"), Some("Bridal makeup"));
        assert_eq!(doc.meta_content(MetaAttr::Property, "og:description"), Some("Bridal makeup"));
        assert_eq!(doc.meta_content(MetaAttr::Property, "og:title"), Some("Studio"));
        assert_eq!(doc.meta_content(MetaAttr::Property, "og:image"), None);
    }

    #[test]
    fn test_strict_reports_unresolved() {
        let mut doc = page();
        let cfg = config(&[("TITLE", "X")]);

        let lenient = ConfigApplier::new(Strictness::Lenient).apply(&cfg, &mut doc);
        assert!(lenient.unresolved.is_empty());

        let strict = ConfigApplier::new(Strictness::Strict).apply(&cfg, &mut doc);
        assert_eq!(strict.unresolved, vec!["BOOKING_URL", "EMAIL_HINT", "HERO_BG", "LOGO"]);
    }
}
