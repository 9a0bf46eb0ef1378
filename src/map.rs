//! Refresh driver for a whole map
//!
//! [`StatusMap::apply_tick`] runs one refresh cycle. For every entity in the
//! batch the order is fixed: apply the new snapshot, check for a state
//! change, re-render when needed, then save the snapshot. Objects that have
//! never been rendered are rendered regardless of their state. A failed
//! render leaves the saved snapshot at the state that is on the surface, so
//! the change is picked up again on the next tick. Entities missing from the
//! batch are removed together with their rendered node.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::entity::EntityConfig;
use crate::error::MapError;
use crate::object::{build_object, MapObject};
use crate::renderer::{HtmlConfig, LineDrawer, Renderer, Surface, SvgLineDrawer};
use crate::stylesheet::Stylesheet;

/// What happened during one refresh tick
#[derive(Debug, Default)]
pub struct TickReport {
    /// Ids of entities that were (re-)rendered, in batch order
    pub rendered: Vec<String>,
    /// Number of entities whose watched state did not change
    pub unchanged: usize,
    /// Ids of entities removed from the map
    pub removed: Vec<String>,
    /// Non-fatal problems; each affects a single entity
    pub warnings: Vec<MapError>,
}

/// A rendered map kept in sync with successive entity batches
pub struct StatusMap {
    renderer: Renderer,
    surface: Surface,
    drawer: Box<dyn LineDrawer>,
    objects: Vec<MapObject>,
}

impl StatusMap {
    /// Create an empty map with a custom line drawer
    pub fn new(config: HtmlConfig, drawer: Box<dyn LineDrawer>) -> Self {
        Self {
            surface: Surface::new(config.surface_id.clone()),
            renderer: Renderer::new(config),
            drawer,
            objects: vec![],
        }
    }

    /// Create an empty map that draws lines as SVG
    pub fn with_stylesheet(config: HtmlConfig, stylesheet: Stylesheet) -> Self {
        Self::new(config, Box::new(SvgLineDrawer::new(stylesheet)))
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Top-level objects in the order of the last batch
    pub fn objects(&self) -> &[MapObject] {
        &self.objects
    }

    pub fn object(&self, id: &str) -> Option<&MapObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    /// Serialize the current surface
    pub fn to_html(&self) -> String {
        self.surface.to_html(self.renderer.config().pretty_print)
    }

    /// Run one refresh cycle against a full batch of entity snapshots
    pub fn apply_tick(&mut self, configs: Vec<EntityConfig>) -> TickReport {
        let mut report = TickReport::default();
        let previous_ids: Vec<String> = self.objects.iter().map(|o| o.id().to_string()).collect();
        let mut existing: HashMap<String, MapObject> = self
            .objects
            .drain(..)
            .map(|o| (o.id().to_string(), o))
            .collect();
        let mut seen = HashSet::new();

        for conf in configs {
            let id = conf.id().to_string();
            if !seen.insert(id.clone()) {
                warn!(id = %id, "duplicate entity id in batch, ignoring");
                report.warnings.push(MapError::duplicate(id));
                continue;
            }

            let Some(mut object) = self.update_or_build(existing.remove(&id), conf, &mut report) else {
                continue;
            };

            let stateful = object.object();
            if stateful.rendered().is_none() || stateful.state_changed() {
                debug!(id = %id, "rendering map object");
                match self.render(&mut object) {
                    Ok(()) => {
                        object.object_mut().save_last_state();
                        report.rendered.push(id);
                    }
                    Err(err) => {
                        warn!(id = %id, "failed to render map object: {}", err);
                        report.warnings.push(err);
                    }
                }
            } else {
                object.object_mut().save_last_state();
                report.unchanged += 1;
            }
            self.objects.push(object);
        }

        for id in previous_ids {
            if let Some(mut gone) = existing.remove(&id) {
                debug!(id = %id, "entity removed from map");
                self.discard(&mut gone);
                report.removed.push(id);
            }
        }
        report
    }

    fn update_or_build(
        &mut self,
        previous: Option<MapObject>,
        conf: EntityConfig,
        report: &mut TickReport,
    ) -> Option<MapObject> {
        match previous {
            Some(mut object) if object.object_type().as_str() == conf.type_name() => {
                report.warnings.extend(object.object_mut().apply_config(conf));
                Some(object)
            }
            previous => {
                let replaced = previous.map(|mut old| {
                    self.discard(&mut old);
                    old.id().to_string()
                });
                match build_object(conf, &mut report.warnings) {
                    Ok(object) => Some(object),
                    Err(err) => {
                        warn!("dropping map object: {}", err);
                        report.warnings.push(err);
                        report.removed.extend(replaced);
                        None
                    }
                }
            }
        }
    }

    fn render(&mut self, object: &mut MapObject) -> Result<(), MapError> {
        self.renderer
            .parse(object, &mut self.surface, self.drawer.as_mut())?;
        self.renderer.parse_hover_menu(object, &mut self.surface)
    }

    fn discard(&mut self, object: &mut MapObject) {
        if let Some(node) = object.object_mut().take_rendered() {
            self.surface.detach(node.into_handle());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(id: &str, state: &str) -> EntityConfig {
        EntityConfig {
            id: Some(id.to_string()),
            object_type: Some("host".to_string()),
            name: Some(id.to_string()),
            x: Some("10".to_string()),
            y: Some("10".to_string()),
            summary_state: Some(state.to_string()),
            ..Default::default()
        }
    }

    fn map() -> StatusMap {
        StatusMap::with_stylesheet(HtmlConfig::default(), Stylesheet::default())
    }

    #[test]
    fn test_first_tick_renders_everything() {
        let mut map = map();
        let report = map.apply_tick(vec![host("a", "UP"), host("b", "DOWN")]);
        assert_eq!(report.rendered, vec!["a", "b"]);
        assert_eq!(map.surface().len(), 2);
    }

    #[test]
    fn test_unchanged_tick_skips_render() {
        let mut map = map();
        map.apply_tick(vec![host("a", "UP")]);
        let report = map.apply_tick(vec![host("a", "UP")]);
        assert!(report.rendered.is_empty());
        assert_eq!(report.unchanged, 1);
    }

    #[test]
    fn test_removed_entity_detached() {
        let mut map = map();
        map.apply_tick(vec![host("a", "UP"), host("b", "UP")]);
        let report = map.apply_tick(vec![host("a", "UP")]);
        assert_eq!(report.removed, vec!["b"]);
        assert_eq!(map.surface().count_id("b"), 0);
        assert!(map.object("b").is_none());
    }

    #[test]
    fn test_duplicate_ids_ignored() {
        let mut map = map();
        let report = map.apply_tick(vec![host("a", "UP"), host("a", "DOWN")]);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(map.surface().count_id("a"), 1);
    }

    #[test]
    fn test_type_change_rebuilds_object() {
        let mut map = map();
        map.apply_tick(vec![host("a", "UP")]);
        let mut group = host("a", "UP");
        group.object_type = Some("hostgroup".to_string());
        let report = map.apply_tick(vec![group]);
        assert_eq!(report.rendered, vec!["a"]);
        assert_eq!(map.surface().count_id("a"), 1);
    }

    #[test]
    fn test_unsupported_type_change_reports_removal() {
        let mut map = map();
        map.apply_tick(vec![host("a", "UP")]);
        let mut router = host("a", "UP");
        router.object_type = Some("router".to_string());

        let report = map.apply_tick(vec![router]);
        assert_eq!(report.removed, vec!["a"]);
        assert!(matches!(report.warnings[..], [MapError::UnsupportedType { .. }]));
        assert_eq!(map.surface().count_id("a"), 0);
        assert!(map.object("a").is_none());
    }

    #[test]
    fn test_removed_in_previous_order() {
        let mut map = map();
        let ids = ["e", "b", "d", "a", "c"];
        map.apply_tick(ids.iter().map(|id| host(id, "UP")).collect());
        let report = map.apply_tick(vec![]);
        assert_eq!(report.removed, ids);
    }
}
