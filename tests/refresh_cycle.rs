//! Integration tests for change detection across refresh ticks

use status_map::{build_members, parse_tick, RenderConfig, StatusMap, MapError, MapObject};

fn tick(json: &str) -> Vec<status_map::EntityConfig> {
    parse_tick(json).expect("valid tick JSON")
}

fn new_map() -> StatusMap {
    RenderConfig::default().into_map()
}

#[test]
fn test_factory_keeps_order_and_reports_one_warning() {
    let configs = tick(
        r#"[
            {"id": "1", "type": "host"},
            {"id": "2", "type": "service"},
            {"id": "3", "type": "hostgroup"},
            {"id": "x", "type": "switch"},
            {"id": "4", "type": "servicegroup"},
            {"id": "5", "type": "map"},
            {"id": "6", "type": "textbox"},
            {"id": "7", "type": "shape"}
        ]"#,
    );

    let built = build_members(&configs);
    let ids: Vec<_> = built.members.iter().map(MapObject::id).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6", "7"]);
    assert_eq!(built.warnings.len(), 1);
    assert!(matches!(built.warnings[0], MapError::UnsupportedType { .. }));
}

#[test]
fn test_state_change_triggers_rerender() {
    let mut map = new_map();
    let first = map.apply_tick(tick(
        r#"[{"id": "h1", "type": "host", "summary_state": "UP",
             "summary_problem_has_been_acknowledged": 0, "summary_in_downtime": 0}]"#,
    ));
    assert_eq!(first.rendered, vec!["h1"]);

    let moved = map.apply_tick(tick(
        r#"[{"id": "h1", "type": "host", "x": 500, "icon": "other.png", "summary_state": "UP",
             "summary_problem_has_been_acknowledged": 0, "summary_in_downtime": 0}]"#,
    ));
    assert!(moved.rendered.is_empty());
    assert_eq!(moved.unchanged, 1);

    let down = map.apply_tick(tick(
        r#"[{"id": "h1", "type": "host", "summary_state": "DOWN",
             "summary_problem_has_been_acknowledged": 0, "summary_in_downtime": 0}]"#,
    ));
    assert_eq!(down.rendered, vec!["h1"]);
    assert_eq!(map.surface().count_id("h1"), 1);

    let acked = map.apply_tick(tick(
        r#"[{"id": "h1", "type": "host", "summary_state": "DOWN",
             "summary_problem_has_been_acknowledged": 1, "summary_in_downtime": 0}]"#,
    ));
    assert_eq!(acked.rendered, vec!["h1"]);
}

#[test]
fn test_snapshot_saved_after_each_tick() {
    let mut map = new_map();
    map.apply_tick(tick(r#"{"id": "h1", "type": "host", "summary_state": "UP"}"#));

    let object = map.object("h1").expect("object kept");
    assert!(!object.object().state_changed());
    assert_eq!(
        object.object().last_conf().and_then(|c| c.summary_state.as_deref()),
        Some("UP")
    );
}

#[test]
fn test_failing_member_isolated() {
    let mut map = new_map();
    let report = map.apply_tick(tick(
        r#"[
            {"id": "bad", "type": "host", "line_type": "11", "x": "1", "y": "1", "summary_state": "UP"},
            {"id": "good", "type": "host", "summary_state": "UP"},
            {"id": "odd", "type": "teapot"}
        ]"#,
    ));
    assert_eq!(report.rendered, vec!["good"]);
    assert_eq!(report.warnings.len(), 2);
    assert!(report.warnings.iter().all(MapError::is_member_local));
    assert_eq!(map.surface().len(), 1);
}

#[test]
fn test_members_reresolved_on_membership_change() {
    let mut map = new_map();
    map.apply_tick(tick(
        r#"{"id": "hg", "type": "hostgroup", "members": [{"id": "a", "type": "host"}]}"#,
    ));
    assert_eq!(map.object("hg").expect("group").object().members().len(), 1);

    let report = map.apply_tick(tick(
        r#"{"id": "hg", "type": "hostgroup", "members": [
            {"id": "a", "type": "host"}, {"id": "b", "type": "host"}, {"id": "c", "type": "fridge"}
        ]}"#,
    ));
    let group = map.object("hg").expect("group");
    let ids: Vec<_> = group.object().members().iter().map(MapObject::id).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(report.warnings.len(), 1);
}

#[test]
fn test_removed_entities_leave_no_orphans() {
    let mut map = new_map();
    map.apply_tick(tick(
        r#"[{"id": "a", "type": "host"}, {"id": "b", "type": "shape"}, {"id": "c", "type": "map"}]"#,
    ));
    assert_eq!(map.surface().len(), 3);

    let report = map.apply_tick(tick(r#"[{"id": "c", "type": "map"}]"#));
    assert_eq!(report.removed, vec!["a", "b"]);
    assert_eq!(map.surface().len(), 1);
    assert_eq!(map.objects().len(), 1);
}

#[test]
fn test_failed_rerender_retried_next_tick() {
    let line = |x: &str, state: &str| {
        format!(
            r#"{{"id": "l1", "type": "service", "line_type": "11", "x": "{x}", "y": "10,10",
                "summary_state": "{state}"}}"#
        )
    };
    let mut map = new_map();
    map.apply_tick(tick(&line("10,100", "OK")));
    assert!(map.to_html().contains("#00ff00"));

    let broken = map.apply_tick(tick(&line("10,50,100", "CRITICAL")));
    assert!(broken.rendered.is_empty());
    assert_eq!(broken.warnings.len(), 1);
    assert_eq!(
        map.object("l1")
            .and_then(|o| o.object().last_conf())
            .and_then(|c| c.summary_state.as_deref()),
        Some("OK")
    );

    let fixed = map.apply_tick(tick(&line("10,100", "CRITICAL")));
    assert_eq!(fixed.rendered, vec!["l1"]);
    let html = map.to_html();
    assert!(html.contains("#ff0000"));
    assert!(!html.contains("#00ff00"));
    assert_eq!(map.surface().count_id("l1"), 1);
}
