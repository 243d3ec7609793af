//! Section rendering options.

use std::str::FromStr;

use serde::Serialize;

/// Extra scroll padding (px) applied when a card expands.
pub const SCROLL_OFFSET: u32 = 40;

/// Category of the gated collection.
pub const ICON_COLLECTION: &str = "Icon Service";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    Include,
    Exclude,
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "include" => Ok(FilterMode::Include),
            "exclude" => Ok(FilterMode::Exclude),
            other => Err(format!("unknown filter mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderOptions {
    /// Category to include or exclude. `None` keeps everything.
    pub filter: Option<String>,
    pub mode: FilterMode,
    /// Open the first card without a click.
    pub auto_expand: bool,
    /// Suppress scrolling to expanded cards.
    pub no_scroll: bool,
}

impl RenderOptions {
    /// Options used behind the access gate.
    pub fn icon_collection() -> Self {
        Self {
            filter: Some(ICON_COLLECTION.to_string()),
            mode: FilterMode::Include,
            auto_expand: true,
            no_scroll: true,
        }
    }

    /// Whether rows of `category` survive the filter.
    pub fn admits(&self, category: &str) -> bool {
        match (&self.filter, self.mode) {
            (None, _) => true,
            (Some(filter), FilterMode::Include) => category == filter,
            (Some(filter), FilterMode::Exclude) => category != filter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admits() {
        assert!(RenderOptions::default().admits("Bridal"));

        let icon = RenderOptions::icon_collection();
        assert!(icon.admits("Icon Service"));
        assert!(!icon.admits("Bridal"));

        let without_icon = RenderOptions {
            mode: FilterMode::Exclude,
            ..RenderOptions::icon_collection()
        };
        assert!(!without_icon.admits("Icon Service"));
        assert!(without_icon.admits("Bridal"));
    }

    #[test]
    fn test_filter_mode_parse() {
        assert_eq!(" Exclude ".parse::<FilterMode>(), Ok(FilterMode::Exclude));
        assert!("maybe".parse::<FilterMode>().is_err());
    }
}
