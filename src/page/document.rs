//! In-memory page model.
//!
//! Only the parts of a page configuration can touch are modelled: elements
//! carrying a config marker, and `<meta>` tags.

use std::collections::BTreeMap;

use scraper::{Html, Selector};
use serde::Serialize;
use thiserror::Error;

use crate::page::apply::MarkerKind;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },
}

/// Which attribute identifies a meta tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetaAttr {
    Name,
    Property,
}

impl MetaAttr {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetaAttr::Name => "name",
            MetaAttr::Property => "property",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaTag {
    pub attr: MetaAttr,
    pub name: String,
    pub content: String,
}

/// A page element that may carry config markers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Element {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Config key referenced by this element's `kind` marker.
    pub fn marker(&self, kind: MarkerKind) -> Option<&str> {
        self.attr(kind.attribute())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub elements: Vec<Element>,
    pub meta: Vec<MetaTag>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract marker-carrying elements and meta tags from an HTML page.
    pub fn from_html(html: &str) -> Result<Self, PageError> {
        let page = Html::parse_document(html);

        let marker_selector = MarkerKind::ALL
            .iter()
            .map(|kind| format!("[{}]", kind.attribute()))
            .collect::<Vec<_>>()
            .join(", ");
        let markers = selector(&marker_selector)?;
        let metas = selector("meta[name], meta[property]")?;

        let elements = page
            .select(&markers)
            .map(|el| {
                let value = el.value();
                Element {
                    tag: value.name().to_string(),
                    attributes: value
                        .attrs()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                    text: el.text().collect::<String>(),
                    background_image: value.attr("style").and_then(background_image),
                }
            })
            .collect();

        let meta = page
            .select(&metas)
            .filter_map(|el| {
                let value = el.value();
                let (attr, name) = match (value.attr("name"), value.attr("property")) {
                    (Some(name), _) => (MetaAttr::Name, name),
                    (None, Some(property)) => (MetaAttr::Property, property),
                    (None, None) => return None,
                };
                Some(MetaTag {
                    attr,
                    name: name.to_string(),
                    content: value.attr("content").unwrap_or_default().to_string(),
                })
            })
            .collect();

        Ok(Self { elements, meta })
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn meta_content(&self, attr: MetaAttr, name: &str) -> Option<&str> {
        self.meta
            .iter()
            .find(|m| m.attr == attr && m.name == name)
            .map(|m| m.content.as_str())
    }

    /// Set a meta tag's content, creating the tag if missing. Returns true on change.
    pub fn upsert_meta(&mut self, attr: MetaAttr, name: &str, content: &str) -> bool {
        match self.meta.iter_mut().find(|m| m.attr == attr && m.name == name) {
            Some(tag) if tag.content == content => false,
            Some(tag) => {
                tag.content = content.to_string();
                true
            }
            None => {
                self.meta.push(MetaTag {
                    attr,
                    name: name.to_string(),
                    content: content.to_string(),
                });
                true
            }
        }
    }
}

fn selector(raw: &str) -> Result<Selector, PageError> {
    Selector::parse(raw).map_err(|e| PageError::Selector {
        selector: raw.to_string(),
        reason: e.to_string(),
    })
}

/// `background-image` value of an inline style, if any.
fn background_image(style: &str) -> Option<String> {
    style.split(';').find_map(|decl| {
        let (prop, value) = decl.split_once(':')?;
        (prop.trim().eq_ignore_ascii_case("background-image")).then(|| value.trim().to_string())
    })
}
