//! Per-resource source table built from configuration.

use std::collections::HashMap;
use std::path::Path;

use crate::config::SourceConfig;
use crate::data::ResourceType;
use crate::net::sheets::sheet_url;
use crate::net::source::{SourceError, SourceLocation};

/// A source as configured. Sheets are re-addressed on every read so each
/// request carries a fresh cache-busting parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    Sheet {
        base_url: String,
        spreadsheet_id: String,
        gid: String,
    },
    Fixed(SourceLocation),
}

impl SourceSpec {
    pub fn locate(&self) -> Result<SourceLocation, SourceError> {
        match self {
            SourceSpec::Sheet {
                base_url,
                spreadsheet_id,
                gid,
            } => sheet_url(base_url, spreadsheet_id, gid).map(SourceLocation::Remote),
            SourceSpec::Fixed(location) => Ok(location.clone()),
        }
    }
}

/// Primary (spreadsheet), secondary (local) and master document sources.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    primary: HashMap<ResourceType, SourceSpec>,
    secondary: HashMap<ResourceType, SourceSpec>,
    master: Option<SourceSpec>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self, SourceError> {
        let site_root = Path::new(&config.site_root);
        let mut map = Self::new();

        for (name, gid) in &config.sheets {
            match name.parse::<ResourceType>() {
                Ok(resource) => {
                    map.primary.insert(
                        resource,
                        SourceSpec::Sheet {
                            base_url: config.sheets_base_url.clone(),
                            spreadsheet_id: config.spreadsheet_id.clone(),
                            gid: gid.clone(),
                        },
                    );
                }
                Err(e) => tracing::warn!(error = %e, "Ignoring sheet source"),
            }
        }

        for (name, spec) in &config.local {
            match name.parse::<ResourceType>() {
                Ok(resource) => {
                    let location = SourceLocation::resolve(spec, site_root)?;
                    map.secondary.insert(resource, SourceSpec::Fixed(location));
                }
                Err(e) => tracing::warn!(error = %e, "Ignoring local source"),
            }
        }

        if let Some(spec) = &config.master_data {
            map.master = Some(SourceSpec::Fixed(SourceLocation::resolve(spec, site_root)?));
        }

        Ok(map)
    }

    pub fn with_primary(mut self, resource: ResourceType, spec: SourceSpec) -> Self {
        self.primary.insert(resource, spec);
        self
    }

    pub fn with_secondary(mut self, resource: ResourceType, spec: SourceSpec) -> Self {
        self.secondary.insert(resource, spec);
        self
    }

    pub fn with_master(mut self, spec: SourceSpec) -> Self {
        self.master = Some(spec);
        self
    }

    pub fn primary(&self, resource: ResourceType) -> Option<&SourceSpec> {
        self.primary.get(&resource)
    }

    pub fn secondary(&self, resource: ResourceType) -> Option<&SourceSpec> {
        self.secondary.get(&resource)
    }

    pub fn master(&self) -> Option<&SourceSpec> {
        self.master.as_ref()
    }

    /// Resources with a primary source, in declaration order.
    pub fn primary_resources(&self) -> Vec<ResourceType> {
        ResourceType::ALL
            .into_iter()
            .filter(|r| self.primary.contains_key(r))
            .collect()
    }
}
