//! Team profiles.

use serde::Serialize;

use crate::data::Row;
use crate::views::Section;

/// Assets manifest folder holding team portraits.
pub const TEAM_FOLDER: &str = "meet-team-page";

const UNAVAILABLE: &str = "Team details coming soon.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    ImageLeft,
    ImageRight,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileCard {
    pub name: String,
    pub role: String,
    pub bio: String,
    pub alignment: Alignment,
    pub image_url: Option<String>,
}

impl ProfileCard {
    /// Profiles alternate sides; portraits match on first name.
    pub fn build(rows: &[Row], images: &[String]) -> Section<Vec<ProfileCard>> {
        if rows.is_empty() {
            return Section::unavailable(UNAVAILABLE);
        }

        Section::Ready(
            rows.iter()
                .enumerate()
                .map(|(index, row)| {
                    let name = row.field("name");
                    ProfileCard {
                        name: name.to_string(),
                        role: row.field("role").to_string(),
                        bio: row.field("bio").to_string(),
                        alignment: if index % 2 == 0 {
                            Alignment::ImageLeft
                        } else {
                            Alignment::ImageRight
                        },
                        image_url: portrait(name, images)
                            .map(|file| format!("assets/images/{}/{}", TEAM_FOLDER, file)),
                    }
                })
                .collect(),
        )
    }
}

/// First image whose name contains the person's first name, else the first image.
fn portrait<'a>(name: &str, images: &'a [String]) -> Option<&'a str> {
    let first_name = name.split(' ').next().unwrap_or_default().to_lowercase();
    images
        .iter()
        .find(|img| img.to_lowercase().contains(&first_name))
        .or_else(|| images.first())
        .map(String::as_str)
}
