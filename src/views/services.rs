//! Services catalog: category tabs, card grids and feature chips.

use serde::Serialize;

use crate::data::Row;
use crate::views::options::RenderOptions;
use crate::views::Section;

pub const DEFAULT_CHIP_ICON: &str = "fa-check-circle";

const CHIP_ICONS: [(&str, &str); 12] = [
    ("Color Analysis", "fa-palette"),
    ("Personal Style Analysis", "fa-user-tie"),
    ("Body Shape Analysis", "fa-bezier-curve"),
    ("Wardrobing", "fa-tags"),
    ("Lifestyle Analysis", "fa-mug-hot"),
    ("Virtual Shopping", "fa-laptop"),
    ("Lookbook Curation", "fa-book-open"),
    ("Shopping List", "fa-list-ul"),
    ("In-Person Shopping", "fa-shopping-bag"),
    ("Event Styling", "fa-magic"),
    ("Moodboard curation", "fa-images"),
    ("Luxury charge", "fa-gem"),
];

const UNAVAILABLE: &str = "Service menu is temporarily unavailable. Please check back later.";

pub fn chip_icon(label: &str) -> &'static str {
    CHIP_ICONS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_CHIP_ICON)
}

/// Tab id for a category: trimmed, whitespace runs to `-`, lowercase.
pub fn slug(category: &str) -> String {
    category
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chip {
    pub label: String,
    pub icon: &'static str,
}

/// Chips from a comma-separated `footer` cell.
pub fn chips(footer: &str) -> Vec<Chip> {
    if footer.is_empty() {
        return Vec::new();
    }
    footer
        .split(',')
        .map(str::trim)
        .map(|label| Chip {
            label: label.to_string(),
            icon: chip_icon(label),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCard {
    pub title: String,
    pub image_url: String,
    pub short_description: String,
    pub long_description: String,
    pub chips: Vec<Chip>,
}

impl From<&Row> for ServiceCard {
    fn from(row: &Row) -> Self {
        Self {
            title: row.field("title").to_string(),
            image_url: row.field("image_url").to_string(),
            short_description: row.field("short_description").to_string(),
            long_description: row.field("long_description").to_string(),
            chips: chips(row.field("footer")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTab {
    pub id: String,
    pub label: String,
    pub active: bool,
    pub cards: Vec<ServiceCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCatalog {
    pub tabs: Vec<CategoryTab>,
    pub auto_expand: bool,
    pub no_scroll: bool,
}

impl ServiceCatalog {
    /// Group filtered service rows into tabs, in first-seen category order.
    pub fn build(rows: &[Row], options: &RenderOptions) -> Section<ServiceCatalog> {
        if rows.is_empty() {
            return Section::unavailable(UNAVAILABLE);
        }

        let mut tabs: Vec<CategoryTab> = Vec::new();
        for row in rows.iter().filter(|r| options.admits(r.field("category"))) {
            let category = row.field("category");
            let index = match tabs.iter().position(|t| t.label == category) {
                Some(index) => index,
                None => {
                    tabs.push(CategoryTab {
                        id: slug(category),
                        label: category.to_string(),
                        active: tabs.is_empty(),
                        cards: Vec::new(),
                    });
                    tabs.len() - 1
                }
            };
            tabs[index].cards.push(ServiceCard::from(row));
        }

        Section::Ready(ServiceCatalog {
            tabs,
            auto_expand: options.auto_expand,
            no_scroll: options.no_scroll,
        })
    }

    /// Activate the tab named by a URL fragment. Unknown fragments change nothing.
    pub fn select_hash(&mut self, hash: &str) -> bool {
        let raw = hash.strip_prefix('#').unwrap_or(hash);
        let Ok(decoded) = urlencoding::decode(raw) else {
            return false;
        };
        let target = decoded.to_lowercase();
        if target.is_empty() || !self.tabs.iter().any(|t| t.id == target) {
            return false;
        }

        for tab in &mut self.tabs {
            tab.active = tab.id == target;
        }
        true
    }

    pub fn active(&self) -> Option<&CategoryTab> {
        self.tabs.iter().find(|t| t.active)
    }
}
