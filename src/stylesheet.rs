//! Stylesheet mapping object states to line colours
//!
//! Connector lines are coloured by the state of the object they represent.
//! Acknowledged problems and objects in downtime get their own colours,
//! taking precedence over the raw state.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::MapError;

/// A stylesheet mapping state names to concrete colours
#[derive(Debug, Clone)]
pub struct Stylesheet {
    /// Optional name for the stylesheet
    pub name: Option<String>,
    /// Colour mappings: lowercase state name -> colour
    pub colors: HashMap<String, String>,
}

/// TOML structure for deserializing stylesheets
#[derive(Deserialize)]
struct TomlStylesheet {
    metadata: Option<TomlMetadata>,
    colors: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
}

const DEFAULT_PALETTE: &str = r##"
[colors]
# Host states
up = "#00ff00"
down = "#ff0000"
unreachable = "#ff0000"

# Service states
ok = "#00ff00"
warning = "#ffff00"
critical = "#ff0000"
unknown = "#ffcc66"

# Shared
pending = "#c0c0c0"
error = "#0000ff"
ack = "#b0b0b0"
downtime = "#b0b0b0"

# Line border layer
border = "#000000"
"##;

/// Colour used when neither the stylesheet nor the defaults know a state
const FALLBACK_COLOR: &str = "#c0c0c0";

impl Stylesheet {
    /// Load stylesheet from TOML file
    pub fn from_file(path: &Path) -> Result<Self, MapError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load stylesheet from TOML string
    pub fn from_toml(content: &str) -> Result<Self, MapError> {
        let parsed: TomlStylesheet = toml::from_str(content)?;

        Ok(Stylesheet {
            name: parsed.metadata.and_then(|m| m.name),
            colors: parsed
                .colors
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
        })
    }

    /// Resolve a state name to a colour defined in this stylesheet
    pub fn resolve(&self, key: &str) -> Option<&str> {
        self.colors.get(&key.to_lowercase()).map(|s| s.as_str())
    }

    /// Resolve with fallback to the default palette
    pub fn resolve_or_default(&self, key: &str) -> String {
        if let Some(color) = self.resolve(key) {
            return color.to_string();
        }
        Self::default()
            .resolve(key)
            .unwrap_or(FALLBACK_COLOR)
            .to_string()
    }

    /// Colour for an object's status fields
    ///
    /// Acknowledgement wins over downtime, downtime wins over state.
    pub fn state_color(
        &self,
        state: Option<&str>,
        acknowledged: Option<&str>,
        in_downtime: Option<&str>,
    ) -> String {
        if acknowledged == Some("1") {
            return self.resolve_or_default("ack");
        }
        if in_downtime == Some("1") {
            return self.resolve_or_default("downtime");
        }
        self.resolve_or_default(state.unwrap_or("unknown"))
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::from_toml(DEFAULT_PALETTE).expect("Default palette should be valid TOML")
    }
}
