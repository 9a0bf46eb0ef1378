//! Entity configuration snapshots as delivered by the backend

use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::error::MapError;

/// Full attribute snapshot of one map entity
///
/// Every attribute is optional text. The backend is inconsistent about
/// scalar types (`"z": 5` and `"z": "5"` both occur), so any JSON scalar is
/// accepted and stored in its textual form.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    #[serde(deserialize_with = "scalar")]
    pub id: Option<String>,
    #[serde(rename = "type", deserialize_with = "scalar")]
    pub object_type: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub name: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub service_description: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub alias: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub output: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub perfdata: Option<String>,

    #[serde(deserialize_with = "scalar")]
    pub x: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub y: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub z: Option<String>,

    #[serde(deserialize_with = "scalar")]
    pub icon: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub url: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub url_target: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub hover_url: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub line_type: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub line_width: Option<String>,

    #[serde(deserialize_with = "scalar")]
    pub label_show: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub label_text: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub label_x: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub label_y: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub label_width: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub label_background: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub label_border: Option<String>,

    #[serde(deserialize_with = "scalar")]
    pub summary_state: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub summary_problem_has_been_acknowledged: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub summary_in_downtime: Option<String>,

    pub members: Option<Vec<EntityConfig>>,
}

/// The three status attributes that decide whether an entity changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WatchedState<'a> {
    pub state: Option<&'a str>,
    pub acknowledged: Option<&'a str>,
    pub in_downtime: Option<&'a str>,
}

impl EntityConfig {
    /// Parse a single entity from JSON
    pub fn from_json(content: &str) -> Result<Self, MapError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Entity id, empty when unset
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    /// Type discriminator, empty when unset
    pub fn type_name(&self) -> &str {
        self.object_type.as_deref().unwrap_or("")
    }

    /// Whether this entity is drawn as a connector line
    pub fn is_line(&self) -> bool {
        self.line_type.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Whether the label overlay is enabled
    pub fn shows_label(&self) -> bool {
        self.label_show.as_deref() == Some("1")
    }

    /// Member configurations, empty when none are configured
    pub fn member_configs(&self) -> &[EntityConfig] {
        self.members.as_deref().unwrap_or(&[])
    }

    /// Borrow the watched status attributes
    pub fn watched(&self) -> WatchedState<'_> {
        WatchedState {
            state: self.summary_state.as_deref(),
            acknowledged: self.summary_problem_has_been_acknowledged.as_deref(),
            in_downtime: self.summary_in_downtime.as_deref(),
        }
    }
}

/// Parse one refresh tick: either a single entity or an array of entities
pub fn parse_tick(content: &str) -> Result<Vec<EntityConfig>, MapError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tick {
        Many(Vec<EntityConfig>),
        One(Box<EntityConfig>),
    }

    Ok(match serde_json::from_str(content)? {
        Tick::Many(configs) => configs,
        Tick::One(config) => vec![*config],
    })
}

/// Read and parse a refresh tick from a JSON file
pub fn load_tick(path: &Path) -> Result<Vec<EntityConfig>, MapError> {
    let content = std::fs::read_to_string(path)?;
    parse_tick(&content)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Integer(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Flag(true) => "1".to_string(),
            Scalar::Flag(false) => "0".to_string(),
        }
    }
}

fn scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars_become_text() {
        let conf = EntityConfig::from_json(
            r#"{"id": 7, "type": "host", "x": 10.5, "z": "3", "label_show": true}"#,
        )
        .expect("Should parse");
        assert_eq!(conf.id(), "7");
        assert_eq!(conf.x.as_deref(), Some("10.5"));
        assert_eq!(conf.z.as_deref(), Some("3"));
        assert!(conf.shows_label());
    }

    #[test]
    fn test_null_and_missing_are_unset() {
        let conf = EntityConfig::from_json(r#"{"type": "host", "url": null}"#).expect("Should parse");
        assert_eq!(conf.url, None);
        assert_eq!(conf.summary_state, None);
        assert!(conf.member_configs().is_empty());
    }

    #[test]
    fn test_nested_members() {
        let conf = EntityConfig::from_json(
            r#"{"id": "hg", "type": "hostgroup", "members": [{"id": "h1", "type": "host"}]}"#,
        )
        .expect("Should parse");
        assert_eq!(conf.member_configs().len(), 1);
        assert_eq!(conf.member_configs()[0].id(), "h1");
    }

    #[test]
    fn test_empty_line_type_is_not_a_line() {
        let conf = EntityConfig {
            line_type: Some(String::new()),
            ..Default::default()
        };
        assert!(!conf.is_line());
    }

    #[test]
    fn test_parse_tick_single_and_array() {
        assert_eq!(parse_tick(r#"{"id": "a"}"#).expect("single").len(), 1);
        assert_eq!(parse_tick(r#"[{"id": "a"}, {"id": "b"}]"#).expect("array").len(), 2);
        assert!(parse_tick("not json").is_err());
    }
}
