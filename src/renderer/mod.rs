//! HTML renderer for map objects
//!
//! This module turns object snapshots into element trees on a [`Surface`],
//! with connector geometry painted through a [`LineDrawer`].

pub mod config;
pub mod dom;
pub mod html;
pub mod line;

pub use config::HtmlConfig;
pub use dom::{Element, Node, NodeHandle, Surface};
pub use html::Renderer;
pub use line::{LineDrawer, LineRequest, Point, SvgLineDrawer};
