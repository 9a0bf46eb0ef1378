//! Map objects: typed variants over a shared stateful core
//!
//! Every supported member type is one [`MapObject`] variant wrapping a
//! [`StatefulObject`]. Type-specific behaviour (macro token names, alt text)
//! lives on [`ObjectType`], so the renderer and the change detection stay
//! shared across all variants.

mod factory;
mod stateful;

use std::fmt;
use std::str::FromStr;

pub use factory::{build_members, build_object, BuiltMembers};
pub use stateful::{RenderedNode, StatefulObject};

use crate::entity::EntityConfig;

/// Type discriminator of a map object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Host,
    Service,
    HostGroup,
    ServiceGroup,
    Map,
    Textbox,
    Shape,
}

impl ObjectType {
    /// All supported variants
    pub const ALL: [ObjectType; 7] = [
        ObjectType::Host,
        ObjectType::Service,
        ObjectType::HostGroup,
        ObjectType::ServiceGroup,
        ObjectType::Map,
        ObjectType::Textbox,
        ObjectType::Shape,
    ];

    /// The type discriminator as it appears in configuration
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectType::Host => "host",
            ObjectType::Service => "service",
            ObjectType::HostGroup => "hostgroup",
            ObjectType::ServiceGroup => "servicegroup",
            ObjectType::Map => "map",
            ObjectType::Textbox => "textbox",
            ObjectType::Shape => "shape",
        }
    }

    /// Macro token that resolves to the object's name in links
    ///
    /// Services are addressed through their host.
    pub fn name_token(self) -> &'static str {
        match self {
            ObjectType::Host | ObjectType::Service => "host_name",
            ObjectType::HostGroup => "hostgroup_name",
            ObjectType::ServiceGroup => "servicegroup_name",
            ObjectType::Map => "map_name",
            ObjectType::Textbox => "textbox_name",
            ObjectType::Shape => "shape_name",
        }
    }

    /// Macro token that resolves to the display name in labels
    pub fn label_name_token(self) -> &'static str {
        match self {
            ObjectType::Map => "alias",
            other => other.name_token(),
        }
    }

    /// Whether `[perfdata]` is meaningful for this type
    pub fn has_perfdata(self) -> bool {
        matches!(self, ObjectType::Host | ObjectType::Service)
    }

    /// Accessible text for an object of this type
    pub fn alt_text(self, conf: &EntityConfig) -> String {
        let name = conf.name.as_deref().unwrap_or_default();
        match self {
            ObjectType::Service => format!(
                "{}-{}",
                name,
                conf.service_description.as_deref().unwrap_or_default()
            ),
            _ => name.to_string(),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// One typed map member
#[derive(Debug)]
pub enum MapObject {
    Host(StatefulObject),
    Service(StatefulObject),
    HostGroup(StatefulObject),
    ServiceGroup(StatefulObject),
    Map(StatefulObject),
    Textbox(StatefulObject),
    Shape(StatefulObject),
}

impl MapObject {
    /// Wrap a stateful object in the variant for `kind`
    pub fn new(kind: ObjectType, object: StatefulObject) -> Self {
        match kind {
            ObjectType::Host => MapObject::Host(object),
            ObjectType::Service => MapObject::Service(object),
            ObjectType::HostGroup => MapObject::HostGroup(object),
            ObjectType::ServiceGroup => MapObject::ServiceGroup(object),
            ObjectType::Map => MapObject::Map(object),
            ObjectType::Textbox => MapObject::Textbox(object),
            ObjectType::Shape => MapObject::Shape(object),
        }
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            MapObject::Host(_) => ObjectType::Host,
            MapObject::Service(_) => ObjectType::Service,
            MapObject::HostGroup(_) => ObjectType::HostGroup,
            MapObject::ServiceGroup(_) => ObjectType::ServiceGroup,
            MapObject::Map(_) => ObjectType::Map,
            MapObject::Textbox(_) => ObjectType::Textbox,
            MapObject::Shape(_) => ObjectType::Shape,
        }
    }

    pub fn object(&self) -> &StatefulObject {
        match self {
            MapObject::Host(o)
            | MapObject::Service(o)
            | MapObject::HostGroup(o)
            | MapObject::ServiceGroup(o)
            | MapObject::Map(o)
            | MapObject::Textbox(o)
            | MapObject::Shape(o) => o,
        }
    }

    pub fn object_mut(&mut self) -> &mut StatefulObject {
        match self {
            MapObject::Host(o)
            | MapObject::Service(o)
            | MapObject::HostGroup(o)
            | MapObject::ServiceGroup(o)
            | MapObject::Map(o)
            | MapObject::Textbox(o)
            | MapObject::Shape(o) => o,
        }
    }

    /// Entity id of the wrapped object
    pub fn id(&self) -> &str {
        self.object().conf().id()
    }
}
