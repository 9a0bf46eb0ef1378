//! Element construction for map objects
//!
//! [`Renderer::parse`] turns one object's snapshot into a container element
//! (icon or connector, plus an optional label), attaches it to the surface
//! and hands the handle to the object. Rendering again replaces the previous
//! container entirely.

use tracing::debug;

use crate::entity::EntityConfig;
use crate::error::MapError;
use crate::macros;
use crate::object::{MapObject, ObjectType, RenderedNode};

use super::dom::{Element, Surface};
use super::line::{LineDrawer, LineRequest};
use super::HtmlConfig;

/// Path from the container to the icon layer
const ICON_PATH: [usize; 1] = [0];
/// Path from the container to the clickable line layer: linediv > line
const LINE_PATH: [usize; 2] = [0, 0];

/// Builds and attaches rendered nodes for map objects
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: HtmlConfig,
}

impl Renderer {
    pub fn new(config: HtmlConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HtmlConfig {
        &self.config
    }

    /// Render `object` onto `surface`, replacing any earlier rendering
    ///
    /// Connector geometry is painted by `drawer` after the container has been
    /// attached. Invalid connector coordinates leave the surface untouched.
    pub fn parse(
        &self,
        object: &mut MapObject,
        surface: &mut Surface,
        drawer: &mut dyn LineDrawer,
    ) -> Result<(), MapError> {
        let kind = object.object_type();
        let conf = macros::substitute(kind, object.object().conf());
        let id = conf.id().to_string();

        // validate before touching the surface
        let line = if conf.is_line() {
            Some(LineRequest::from_conf(&conf, self.config.default_line_width)?)
        } else {
            None
        };

        let mut container = Element::new("div").with_id(&id);
        let primary = if line.is_some() {
            container.push_child(self.parse_line(&conf));
            LINE_PATH.to_vec()
        } else {
            container.push_child(self.parse_icon(kind, &conf));
            ICON_PATH.to_vec()
        };

        if conf.shows_label() {
            container.push_child(self.parse_label(&conf));
        }

        let stateful = object.object_mut();
        if let Some(previous) = stateful.take_rendered() {
            debug!(id = %id, "detaching previous rendering");
            surface.detach(previous.into_handle());
        }
        let handle = surface.attach(container);

        if let Some(request) = &line {
            if let Some(linediv) = surface.get_mut(&handle).and_then(|c| c.descendant_mut(&[0])) {
                drawer.draw_line(linediv, request);
            }
        }

        stateful.replace_rendered(RenderedNode::new(id, handle, primary));
        Ok(())
    }

    /// Positioned icon wrapped in a link
    pub fn parse_icon(&self, kind: ObjectType, conf: &EntityConfig) -> Element {
        let id = conf.id();
        let icon = Element::new("img")
            .with_id(format!("{}-icon", id))
            .with_attr(
                "src",
                format!(
                    "{}{}",
                    self.config.icon_base_path,
                    conf.icon.as_deref().unwrap_or_default()
                ),
            )
            .with_attr("alt", kind.alt_text(conf));

        let link = Element::new("a")
            .with_attr("href", conf.url.as_deref().unwrap_or_default())
            .with_attr("target", conf.url_target.as_deref().unwrap_or_default())
            .with_child(icon);

        Element::new("div")
            .with_id(format!("{}-icondiv", id))
            .with_class("icon")
            .with_style("position", "absolute")
            .with_style("top", px(conf.y.as_deref().unwrap_or("0")))
            .with_style("left", px(conf.x.as_deref().unwrap_or("0")))
            .with_style("z-index", z_index(conf, 0))
            .with_child(link)
    }

    /// Empty clickable line layer and border layer for the drawer to fill
    pub fn parse_line(&self, conf: &EntityConfig) -> Element {
        let id = conf.id();
        let z = z_index(conf, 0);
        let onclick = format!(
            "window.open('{}','{}','');",
            js_quote(conf.url.as_deref().unwrap_or_default()),
            js_quote(conf.url_target.as_deref().unwrap_or_default())
        );

        Element::new("div")
            .with_id(format!("{}-linediv", id))
            .with_child(
                Element::new("div")
                    .with_id(format!("{}-line", id))
                    .with_attr("onclick", onclick)
                    .with_style("z-index", z.clone()),
            )
            .with_child(
                Element::new("div")
                    .with_id(format!("{}-border", id))
                    .with_style("z-index", z),
            )
    }

    /// Label overlay positioned relative to or independent of the object
    pub fn parse_label(&self, conf: &EntityConfig) -> Element {
        let id = conf.id();
        let x = conf.x.as_deref().unwrap_or_default();
        let y = conf.y.as_deref().unwrap_or_default();
        let label_x = resolve_label_coord(conf.label_x.as_deref(), x);
        let label_y = resolve_label_coord(conf.label_y.as_deref(), y);

        let border = conf.label_border.as_deref().unwrap_or_default();
        let mut label = Element::new("div")
            .with_id(format!("{}-label", id))
            .with_class("object_label")
            .with_style("background", conf.label_background.as_deref().unwrap_or_default())
            .with_style("border-color", border)
            .with_style("position", "absolute")
            .with_style("left", px(&label_x))
            .with_style("top", px(&label_y));

        if let Some(width) = label_width(conf.label_width.as_deref()) {
            label.set_style("width", width);
        }
        label.set_style("z-index", z_index(conf, 1));
        label.set_style("overflow", "visible");

        // a transparent border colour is not enough for every browser
        let style = if border == "transparent" { "none" } else { "solid" };
        label.set_style("border-style", style);

        label.with_child(
            Element::new("span").with_text(conf.label_text.as_deref().unwrap_or_default()),
        )
    }

    /// Attach a hover overlay to the object's icon or line layer
    ///
    /// Objects without a `hover_url` get no overlay. Calling it again replaces
    /// the previous overlay.
    pub fn parse_hover_menu(&self, object: &MapObject, surface: &mut Surface) -> Result<(), MapError> {
        let stateful = object.object();
        let rendered = stateful
            .rendered()
            .ok_or_else(|| MapError::not_rendered(object.id()))?;

        let conf = macros::substitute(object.object_type(), stateful.conf());
        let hover_url = match conf.hover_url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => return Ok(()),
        };

        let primary = surface
            .get_mut(rendered.handle())
            .and_then(|root| root.descendant_mut(rendered.primary_path()))
            .ok_or_else(|| MapError::not_rendered(object.id()))?;

        let overlay_id = format!("{}-hover", rendered.id());
        primary.remove_child(&overlay_id);
        primary.set_attr("data-hover-url", hover_url);
        primary.push_child(
            Element::new("div")
                .with_id(overlay_id)
                .with_class("hover_menu")
                .with_attr("data-src", hover_url)
                .with_style("display", "none"),
        );
        Ok(())
    }
}

/// Resolve a label coordinate against the object's own coordinate
///
/// A leading sign makes the value an offset; unset, empty or zero falls
/// back to the object's position; anything else is absolute.
pub fn resolve_label_coord(label: Option<&str>, object: &str) -> String {
    let label = label.map(str::trim).unwrap_or_default();

    if label.starts_with('+') || label.starts_with('-') {
        let offset = leading_number(label).unwrap_or(0.0);
        let base = leading_number(object).unwrap_or(0.0);
        return (base + offset).to_string();
    }

    if label.is_empty() || label.parse::<f64>().is_ok_and(|v| v == 0.0) {
        return object.to_string();
    }

    label.to_string()
}

/// Width with a unit appended, `auto` unchanged, `None` when unset
pub fn label_width(width: Option<&str>) -> Option<String> {
    match width.map(str::trim) {
        None | Some("") => None,
        Some("auto") => Some("auto".to_string()),
        Some(w) => Some(px(w)),
    }
}

/// Numeric prefix of a value; for coordinate lists the first entry
fn leading_number(value: &str) -> Option<f64> {
    value.split(',').next()?.trim().parse().ok()
}

fn px(value: &str) -> String {
    format!("{}px", value)
}

fn z_index(conf: &EntityConfig, raise: i64) -> String {
    let z = conf.z.as_deref().unwrap_or("0");
    match z.trim().parse::<i64>() {
        Ok(z) => z.saturating_add(raise).to_string(),
        Err(_) => z.to_string(),
    }
}

fn js_quote(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
