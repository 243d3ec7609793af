//! Resource type tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Key of the folder → image files tree inside the master document.
pub const ASSETS_MANIFEST_KEY: &str = "assets_manifest";

/// A named dataset the pipeline can fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Config,
    Services,
    Reviews,
    Team,
    Categories,
    Access,
    Version,
    Dialogs,
}

impl ResourceType {
    pub const ALL: [ResourceType; 8] = [
        ResourceType::Config,
        ResourceType::Services,
        ResourceType::Reviews,
        ResourceType::Team,
        ResourceType::Categories,
        ResourceType::Access,
        ResourceType::Version,
        ResourceType::Dialogs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Config => "config",
            ResourceType::Services => "services",
            ResourceType::Reviews => "reviews",
            ResourceType::Team => "team",
            ResourceType::Categories => "categories",
            ResourceType::Access => "access",
            ResourceType::Version => "version",
            ResourceType::Dialogs => "dialogs",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown resource type '{0}'")]
pub struct UnknownResource(pub String);

impl FromStr for ResourceType {
    type Err = UnknownResource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        ResourceType::ALL
            .into_iter()
            .find(|r| r.as_str() == name)
            .ok_or_else(|| UnknownResource(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for resource in ResourceType::ALL {
            assert_eq!(resource.as_str().parse::<ResourceType>(), Ok(resource));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(" Reviews ".parse::<ResourceType>(), Ok(ResourceType::Reviews));
        assert_eq!(
            "pricing".parse::<ResourceType>(),
            Err(UnknownResource("pricing".to_string()))
        );
    }

    #[test]
    fn test_serde_name_matches_display() {
        let json = serde_json::to_string(&ResourceType::Categories).unwrap();
        assert_eq!(json, "\"categories\"");
    }
}
