//! Configuration for HTML output

use std::path::Path;

use serde::Deserialize;

use crate::error::MapError;

/// Configuration options for rendered map output
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    /// Prefix joined with each object's `icon` to form the image source
    pub icon_base_path: String,

    /// Stroke width used for lines without a `line_width`
    pub default_line_width: f64,

    /// Id of the map container element
    pub surface_id: String,

    /// Whether to format output with indentation
    pub pretty_print: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            icon_base_path: "/nagvis/images/iconsets/".to_string(),
            default_line_width: 3.0,
            surface_id: "map".to_string(),
            pretty_print: true,
        }
    }
}

impl HtmlConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, MapError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string; missing keys keep defaults
    pub fn from_toml(content: &str) -> Result<Self, MapError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the icon base path
    pub fn with_icon_base_path(mut self, path: impl Into<String>) -> Self {
        self.icon_base_path = path.into();
        self
    }

    /// Set the fallback line width
    pub fn with_default_line_width(mut self, width: f64) -> Self {
        self.default_line_width = width;
        self
    }

    /// Set the container id
    pub fn with_surface_id(mut self, id: impl Into<String>) -> Self {
        self.surface_id = id.into();
        self
    }

    /// Set whether to pretty-print output
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }
}
