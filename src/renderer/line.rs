//! Connector line geometry
//!
//! The renderer only builds the empty line and border layers. Painting the
//! actual geometry is delegated to a [`LineDrawer`], which is called once the
//! layers are attached to the surface.

use crate::entity::EntityConfig;
use crate::error::MapError;
use crate::stylesheet::Stylesheet;

use super::dom::Element;

/// A 2D point in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint between two points
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Everything a drawer needs to paint one connector
#[derive(Debug, Clone, PartialEq)]
pub struct LineRequest {
    pub element_id: String,
    pub line_type: String,
    pub from: Point,
    pub to: Point,
    pub width: f64,
    pub state: Option<String>,
    pub acknowledged: Option<String>,
    pub in_downtime: Option<String>,
}

impl LineRequest {
    /// Build a request from an entity snapshot
    ///
    /// `x` and `y` must each hold exactly two comma-separated numbers.
    pub fn from_conf(conf: &EntityConfig, default_width: f64) -> Result<Self, MapError> {
        let id = conf.id();
        let xs = parse_pair(id, "x", conf.x.as_deref())?;
        let ys = parse_pair(id, "y", conf.y.as_deref())?;

        let width = match conf.line_width.as_deref().map(str::trim) {
            Some(w) if !w.is_empty() => w
                .parse::<f64>()
                .map_err(|_| MapError::invalid_line(id, format!("invalid line width '{}'", w)))?,
            _ => default_width,
        };

        Ok(Self {
            element_id: id.to_string(),
            line_type: conf.line_type.clone().unwrap_or_default(),
            from: Point::new(xs[0], ys[0]),
            to: Point::new(xs[1], ys[1]),
            width,
            state: conf.summary_state.clone(),
            acknowledged: conf.summary_problem_has_been_acknowledged.clone(),
            in_downtime: conf.summary_in_downtime.clone(),
        })
    }

    /// Segments to stroke for this line type
    ///
    /// Type `10` draws two arrows meeting in the middle, every other type
    /// draws one arrow from start to end.
    pub fn segments(&self) -> Vec<(Point, Point)> {
        if self.line_type == "10" {
            let mid = self.from.midpoint(self.to);
            vec![(self.from, mid), (self.to, mid)]
        } else {
            vec![(self.from, self.to)]
        }
    }
}

fn parse_pair(id: &str, axis: &str, value: Option<&str>) -> Result<[f64; 2], MapError> {
    let raw = value.unwrap_or_default();
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        return Err(MapError::invalid_line(
            id,
            format!("expected 2 {} coordinates, found {}", axis, parts.len()),
        ));
    }

    let mut out = [0.0; 2];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part.parse().map_err(|_| {
            MapError::invalid_line(id, format!("invalid {} coordinate '{}'", axis, part))
        })?;
    }
    Ok(out)
}

/// Paints line geometry into already-attached layers
pub trait LineDrawer {
    /// `target` is the attached line container; its first child is the
    /// clickable line layer and its second child the border layer.
    fn draw_line(&mut self, target: &mut Element, request: &LineRequest);
}

/// Draws connectors as inline SVG coloured through a [`Stylesheet`]
#[derive(Debug, Clone, Default)]
pub struct SvgLineDrawer {
    stylesheet: Stylesheet,
}

impl SvgLineDrawer {
    pub fn new(stylesheet: Stylesheet) -> Self {
        Self { stylesheet }
    }

    fn layer_svg(request: &LineRequest, color: &str, width: f64, arrows: bool) -> Element {
        let extent_x = request.from.x.max(request.to.x) + width * 4.0;
        let extent_y = request.from.y.max(request.to.y) + width * 4.0;

        let mut svg = Element::new("svg")
            .with_attr("xmlns", "http://www.w3.org/2000/svg")
            .with_attr("width", extent_x.to_string())
            .with_attr("height", extent_y.to_string())
            .with_style("position", "absolute")
            .with_style("left", "0px")
            .with_style("top", "0px")
            .with_style("overflow", "visible");

        for (start, end) in request.segments() {
            svg.push_child(
                Element::new("line")
                    .with_attr("x1", start.x.to_string())
                    .with_attr("y1", start.y.to_string())
                    .with_attr("x2", end.x.to_string())
                    .with_attr("y2", end.y.to_string())
                    .with_attr("stroke", color)
                    .with_attr("stroke-width", width.to_string()),
            );
            if arrows {
                let points = arrow_head(start, end, width)
                    .iter()
                    .map(|p| format!("{},{}", p.x, p.y))
                    .collect::<Vec<_>>()
                    .join(" ");
                svg.push_child(
                    Element::new("polygon")
                        .with_attr("points", points)
                        .with_attr("fill", color),
                );
            }
        }
        svg
    }
}

impl LineDrawer for SvgLineDrawer {
    fn draw_line(&mut self, target: &mut Element, request: &LineRequest) {
        let color = self.stylesheet.state_color(
            request.state.as_deref(),
            request.acknowledged.as_deref(),
            request.in_downtime.as_deref(),
        );
        let border = self.stylesheet.resolve_or_default("border");

        if let Some(line) = target.descendant_mut(&[0]) {
            line.push_child(Self::layer_svg(request, &color, request.width, true));
        }
        if let Some(outline) = target.descendant_mut(&[1]) {
            outline.push_child(Self::layer_svg(request, &border, request.width + 2.0, false));
        }
    }
}

/// Triangle at `end` pointing away from `start`
fn arrow_head(start: Point, end: Point, width: f64) -> [Point; 3] {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return [end, end, end];
    }
    let (ux, uy) = (dx / len, dy / len);
    let size = width * 3.0;
    let base = Point::new(end.x - ux * size, end.y - uy * size);
    [
        end,
        Point::new(base.x - uy * size / 2.0, base.y + ux * size / 2.0),
        Point::new(base.x + uy * size / 2.0, base.y - ux * size / 2.0),
    ]
}
