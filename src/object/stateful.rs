//! Snapshot-holding core shared by every map object

use tracing::debug;

use crate::entity::EntityConfig;
use crate::error::MapError;
use crate::renderer::dom::NodeHandle;

use super::{build_members, MapObject};

/// The attached output of the most recent render
#[derive(Debug)]
pub struct RenderedNode {
    id: String,
    handle: NodeHandle,
    /// Child-index path from the root to the primary element
    primary: Vec<usize>,
}

impl RenderedNode {
    pub(crate) fn new(id: impl Into<String>, handle: NodeHandle, primary: Vec<usize>) -> Self {
        Self {
            id: id.into(),
            handle,
            primary,
        }
    }

    /// Entity id the node was rendered for
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn handle(&self) -> &NodeHandle {
        &self.handle
    }

    /// Path to the icon or line layer inside the rendered root
    pub fn primary_path(&self) -> &[usize] {
        &self.primary
    }

    pub(crate) fn into_handle(self) -> NodeHandle {
        self.handle
    }
}

/// An entity's current and last-saved snapshots plus its members
///
/// `last` only ever changes through [`StatefulObject::save_last_state`].
#[derive(Debug)]
pub struct StatefulObject {
    conf: EntityConfig,
    last_conf: Option<EntityConfig>,
    members: Vec<MapObject>,
    rendered: Option<RenderedNode>,
}

impl StatefulObject {
    /// Wrap a snapshot without resolving members
    pub fn new(conf: EntityConfig) -> Self {
        Self::with_members(conf, vec![])
    }

    /// Wrap a snapshot with already-resolved members
    pub fn with_members(conf: EntityConfig, members: Vec<MapObject>) -> Self {
        Self {
            conf,
            last_conf: None,
            members,
            rendered: None,
        }
    }

    /// Current snapshot
    pub fn conf(&self) -> &EntityConfig {
        &self.conf
    }

    /// Snapshot captured at the last save, if any
    pub fn last_conf(&self) -> Option<&EntityConfig> {
        self.last_conf.as_ref()
    }

    pub fn members(&self) -> &[MapObject] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [MapObject] {
        &mut self.members
    }

    pub fn rendered(&self) -> Option<&RenderedNode> {
        self.rendered.as_ref()
    }

    /// Replace the current snapshot with a fresh one from the backend
    ///
    /// Members are rebuilt only when the member configuration changed.
    /// Returns the warnings produced while rebuilding.
    pub fn apply_config(&mut self, conf: EntityConfig) -> Vec<MapError> {
        let membership_changed = conf.members != self.conf.members;
        self.conf = conf;
        if !membership_changed {
            return vec![];
        }

        debug!(id = self.conf.id(), "member configuration changed, re-resolving");
        let built = build_members(self.conf.member_configs());
        self.members = built.members;
        built.warnings
    }

    /// Copy the current snapshot into the last snapshot
    pub fn save_last_state(&mut self) {
        self.last_conf = Some(self.conf.clone());
    }

    /// Whether state, acknowledgement or downtime differ from the last save
    ///
    /// Without a prior save every defined watched attribute counts as changed.
    pub fn state_changed(&self) -> bool {
        let last = self
            .last_conf
            .as_ref()
            .map(EntityConfig::watched)
            .unwrap_or_default();
        self.conf.watched() != last
    }

    pub(crate) fn replace_rendered(&mut self, node: RenderedNode) -> Option<RenderedNode> {
        self.rendered.replace(node)
    }

    pub(crate) fn take_rendered(&mut self) -> Option<RenderedNode> {
        self.rendered.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(state: &str) -> EntityConfig {
        EntityConfig {
            id: Some("h1".to_string()),
            object_type: Some("host".to_string()),
            x: Some("100".to_string()),
            y: Some("50".to_string()),
            summary_state: Some(state.to_string()),
            summary_problem_has_been_acknowledged: Some("0".to_string()),
            summary_in_downtime: Some("0".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_check_is_changed() {
        let obj = StatefulObject::new(host("UP"));
        assert!(obj.last_conf().is_none());
        assert!(obj.state_changed());
    }

    #[test]
    fn test_unset_watched_fields_without_save() {
        let obj = StatefulObject::new(EntityConfig::default());
        assert!(!obj.state_changed());
    }

    #[test]
    fn test_save_then_unchanged() {
        let mut obj = StatefulObject::new(host("UP"));
        obj.save_last_state();
        assert!(!obj.state_changed());
        assert_eq!(obj.last_conf(), Some(obj.conf()));
    }

    #[test]
    fn test_watched_fields_flip_change() {
        let mut obj = StatefulObject::new(host("UP"));
        obj.save_last_state();

        obj.apply_config(host("DOWN"));
        assert!(obj.state_changed());

        let mut acked = host("UP");
        acked.summary_problem_has_been_acknowledged = Some("1".to_string());
        obj.apply_config(acked);
        assert!(obj.state_changed());

        let mut downtime = host("UP");
        downtime.summary_in_downtime = Some("1".to_string());
        obj.apply_config(downtime);
        assert!(obj.state_changed());
    }

    #[test]
    fn test_other_drift_is_invisible() {
        let mut obj = StatefulObject::new(host("UP"));
        obj.save_last_state();

        let mut moved = host("UP");
        moved.x = Some("300".to_string());
        moved.icon = Some("std_big.png".to_string());
        moved.label_text = Some("moved".to_string());
        obj.apply_config(moved);
        assert!(!obj.state_changed());
    }

    #[test]
    fn test_last_is_not_auto_synced() {
        let mut obj = StatefulObject::new(host("UP"));
        obj.save_last_state();
        obj.apply_config(host("DOWN"));
        assert_eq!(
            obj.last_conf().and_then(|c| c.summary_state.as_deref()),
            Some("UP")
        );
    }

    #[test]
    fn test_members_rebuilt_only_on_change() {
        let mut conf = host("UP");
        conf.members = Some(vec![EntityConfig {
            id: Some("s1".to_string()),
            object_type: Some("service".to_string()),
            ..Default::default()
        }]);
        let mut obj = StatefulObject::new(host("UP"));
        assert!(obj.members().is_empty());

        let warnings = obj.apply_config(conf.clone());
        assert!(warnings.is_empty());
        assert_eq!(obj.members().len(), 1);

        conf.members
            .as_mut()
            .expect("members set")
            .push(EntityConfig {
                object_type: Some("printer".to_string()),
                ..Default::default()
            });
        let warnings = obj.apply_config(conf);
        assert_eq!(warnings.len(), 1);
        assert_eq!(obj.members().len(), 1);
    }
}
