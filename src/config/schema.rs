//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TransitConfig {
    /// Logging settings.
    pub observability: ObservabilityConfig,

    /// Route-type declarations, in any order.
    pub route_types: Vec<RouteTypeConfig>,
}

/// One route-type declaration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RouteTypeConfig {
    /// Unique type name.
    pub name: String,

    /// Parent type name. Omitted means a direct child of the root.
    #[serde(default)]
    pub parent: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter (e.g. "info", "route_transit=debug").
    pub log_level: String,

    /// Emit JSON lines instead of the human-readable format.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
