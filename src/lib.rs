//! Status Map - live status maps of monitored infrastructure
//!
//! This library turns entity snapshots from a monitoring backend into a
//! positioned element tree (icons, connector lines, labels) and re-renders
//! an entity only when its state, acknowledgement or downtime changes.
//!
//! # Example
//!
//! ```rust
//! use status_map::render;
//!
//! let html = render(r#"[{"id": "h1", "type": "host", "name": "web01", "x": 10, "y": 20}]"#).unwrap();
//! assert!(html.contains(r#"id="h1-icondiv""#));
//! ```

pub mod entity;
pub mod error;
pub mod macros;
pub mod map;
pub mod object;
pub mod renderer;
pub mod stylesheet;

pub use entity::{parse_tick, EntityConfig};
pub use error::MapError;
pub use map::{StatusMap, TickReport};
pub use object::{build_members, MapObject, ObjectType, StatefulObject};
pub use renderer::{HtmlConfig, LineDrawer, LineRequest, Renderer, Surface};

// Re-export Stylesheet for public API
pub use stylesheet::Stylesheet;

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// HTML output configuration
    pub html: HtmlConfig,
    /// Stylesheet for line colours
    pub stylesheet: Stylesheet,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTML configuration
    pub fn with_html(mut self, config: HtmlConfig) -> Self {
        self.html = config;
        self
    }

    /// Set the stylesheet for line colours
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    /// Create an empty map driven by this configuration
    pub fn into_map(self) -> StatusMap {
        StatusMap::with_stylesheet(self.html, self.stylesheet)
    }
}

/// Render a single JSON batch with default configuration
pub fn render(source: &str) -> Result<String, MapError> {
    render_with_config(source, RenderConfig::default())
}

/// Render a single JSON batch with custom configuration
///
/// Problems that affect only one entity are logged and skipped; only
/// malformed JSON fails the whole render.
///
/// # Example
///
/// ```rust
/// use status_map::{render_with_config, HtmlConfig, RenderConfig};
///
/// let config = RenderConfig::new()
///     .with_html(HtmlConfig::default().with_icon_base_path("/icons/"));
///
/// let html = render_with_config(r#"{"id": "h1", "type": "host", "icon": "std.png"}"#, config).unwrap();
/// assert!(html.contains(r#"src="/icons/std.png""#));
/// ```
pub fn render_with_config(source: &str, config: RenderConfig) -> Result<String, MapError> {
    let configs = parse_tick(source)?;
    let mut map = config.into_map();
    map.apply_tick(configs);
    Ok(map.to_html())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_simple_host() {
        let html = render(r#"{"id": "h1", "type": "host", "name": "web01"}"#).unwrap();
        assert!(html.starts_with(r#"<div id="map">"#));
        assert!(html.contains(r#"alt="web01""#));
    }

    #[test]
    fn test_render_skips_unsupported() {
        let html = render(r#"[{"id": "a", "type": "router"}, {"id": "b", "type": "shape"}]"#).unwrap();
        assert!(!html.contains(r#"id="a""#));
        assert!(html.contains(r#"id="b""#));
    }

    #[test]
    fn test_render_line() {
        let html = render(
            r#"{"id": "l1", "type": "service", "line_type": "11", "x": "10,100", "y": "10,10",
                "summary_state": "OK"}"#,
        )
        .unwrap();
        assert!(html.contains(r#"id="l1-line""#));
        assert!(html.contains(r#"id="l1-border""#));
        assert!(html.contains("<line"));
    }

    #[test]
    fn test_render_invalid_json_error() {
        assert!(matches!(render("{"), Err(MapError::Input(_))));
    }
}
