//! Home page category cards.

use serde::Serialize;

use crate::data::Row;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeCategory {
    pub name: String,
    pub description: String,
    pub href: String,
    pub image_url: String,
}

impl HomeCategory {
    /// Categories flagged `showOnHomePage`, in sheet order.
    pub fn build(rows: &[Row]) -> Vec<HomeCategory> {
        rows.iter()
            .filter(|row| is_truthy(row.field("showOnHomePage")))
            .map(|row| HomeCategory {
                name: row.field("name").to_string(),
                description: row.field("description").to_string(),
                href: row.field("href").to_string(),
                image_url: row.field("image_url").to_string(),
            })
            .collect()
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1" | "x"
    )
}
