//! Client reviews.

use serde::Serialize;

use crate::data::Row;
use crate::views::Section;

const UNAVAILABLE: &str = "Reviews are currently being updated.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewCard {
    pub author: String,
    /// Review text with embedded quote marks removed; the card adds its own.
    pub text: String,
}

impl ReviewCard {
    pub fn build(rows: &[Row]) -> Section<Vec<ReviewCard>> {
        if rows.is_empty() {
            return Section::unavailable(UNAVAILABLE);
        }
        Section::Ready(
            rows.iter()
                .map(|row| ReviewCard {
                    author: row.field("author").to_string(),
                    text: row.field("text").replace('"', ""),
                })
                .collect(),
        )
    }
}
