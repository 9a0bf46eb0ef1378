//! Construction of typed map members from raw configuration

use tracing::warn;

use crate::entity::EntityConfig;
use crate::error::MapError;

use super::{MapObject, ObjectType, StatefulObject};

/// Result of resolving a member list
#[derive(Debug, Default)]
pub struct BuiltMembers {
    /// Constructed members in configuration order
    pub members: Vec<MapObject>,
    /// Non-fatal problems, one per dropped member (nested levels included)
    pub warnings: Vec<MapError>,
}

/// Build one typed member per supported configuration
///
/// Unsupported types are reported and skipped; the remaining members keep
/// their relative order.
pub fn build_members(configs: &[EntityConfig]) -> BuiltMembers {
    let mut built = BuiltMembers::default();
    for conf in configs {
        match build_object(conf.clone(), &mut built.warnings) {
            Ok(member) => built.members.push(member),
            Err(err) => {
                warn!(
                    object_type = conf.type_name(),
                    id = conf.id(),
                    "dropping map member: {}",
                    err
                );
                built.warnings.push(err);
            }
        }
    }
    built
}

/// Build a single object and, recursively, its members
///
/// Warnings for unsupported nested members are appended to `warnings`.
pub fn build_object(
    conf: EntityConfig,
    warnings: &mut Vec<MapError>,
) -> Result<MapObject, MapError> {
    let kind = conf
        .type_name()
        .parse::<ObjectType>()
        .map_err(|unknown: String| MapError::unsupported(unknown, conf.id()))?;

    let nested = build_members(conf.member_configs());
    warnings.extend(nested.warnings);

    let object = StatefulObject::with_members(conf, nested.members);
    Ok(MapObject::new(kind, object))
}
