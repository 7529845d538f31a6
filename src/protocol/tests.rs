//! Unit tests for protocol shapes and property validation

use super::*;
use crate::error::SurfaceError;
use proptest::prelude::*;
use serde_json::json;

#[test]
fn test_flags_only_set_for_sentinel() {
    let meta = WindowMeta {
        title: None,
        minimized: Some(json!(1)),
        maximized: Some(json!(0)),
        fullscreen: None,
    };
    let flags = DisplayFlags::from_meta(&meta);
    assert!(flags.minimized);
    assert!(!flags.maximized);
    assert!(!flags.fullscreen);
}

#[test]
fn test_flags_reject_non_numeric_truthy_values() {
    let meta = WindowMeta {
        title: None,
        minimized: Some(json!(true)),
        maximized: Some(json!("1")),
        fullscreen: Some(json!(2)),
    };
    assert_eq!(DisplayFlags::from_meta(&meta), DisplayFlags::default());
}

#[test]
fn test_flags_accept_float_sentinel() {
    assert!(is_state_set(Some(&json!(1.0))));
    assert!(!is_state_set(Some(&json!(1.5))));
    assert!(!is_state_set(None));
}

#[test]
fn test_descriptor_deserializes_with_defaults() {
    let descriptor: WindowDescriptor =
        serde_json::from_value(json!({"wid": 3, "x": 10, "y": 20, "w": 300, "h": 200})).unwrap();
    assert_eq!(descriptor.wid, WindowId(3));
    assert!(descriptor.props.is_empty());
    assert_eq!(descriptor.meta, WindowMeta::default());
}

#[test]
fn test_descriptor_props_are_typed() {
    let descriptor: WindowDescriptor = serde_json::from_value(json!({
        "wid": 1, "x": 0, "y": 0, "w": 10, "h": 10,
        "props": {"encoding": "png", "opaque": true, "depth": 24, "scale": 1.5,
                  "hints": ["a", "b"], "missing": null},
        "meta": {"title": "xterm", "maximized": 1}
    }))
    .unwrap();

    let props = &descriptor.props;
    assert_eq!(props.get_str("encoding"), Some("png"));
    assert_eq!(props.get_bool("opaque"), Some(true));
    assert_eq!(props.get_i64("depth"), Some(24));
    assert_eq!(props.get("scale").and_then(PropertyValue::as_f64), Some(1.5));
    assert!(!props.contains_key("missing"));
    assert_eq!(props.len(), 5);
    assert!(DisplayFlags::from_meta(&descriptor.meta).maximized);
}

#[test]
fn test_nested_property_objects_are_rejected() {
    let err = ClientProperties::try_from(json!({"geometry": {"x": 1}})).unwrap_err();
    assert_eq!(
        err,
        SurfaceError::InvalidProperty {
            key: "geometry".into(),
            reason: "nested objects are not supported".into(),
        }
    );
}

#[test]
fn test_non_object_property_root_is_rejected() {
    let result: Result<WindowDescriptor, _> = serde_json::from_value(json!({
        "wid": 1, "x": 0, "y": 0, "w": 1, "h": 1, "props": [1, 2]
    }));
    assert!(result.is_err());
}

#[test]
fn test_property_serialization_is_flat() {
    let props = ClientProperties::new()
        .with("depth", PropertyValue::Integer(32))
        .with("title", PropertyValue::Text("menu".into()));
    let value = serde_json::to_value(&props).unwrap();
    assert_eq!(value, json!({"depth": 32, "title": "menu"}));
}

#[test]
fn test_protocol_event_tagging() {
    let event: ProtocolEvent = serde_json::from_value(json!({
        "type": "new-overlay", "parent": 1, "wid": 7, "x": 110, "y": 60, "w": 30, "h": 20
    }))
    .unwrap();
    assert_eq!(
        event,
        ProtocolEvent::NewOverlay {
            parent: WindowId(1),
            wid: WindowId(7),
            x: 110,
            y: 60,
            w: 30,
            h: 20,
            props: ClientProperties::default(),
        }
    );
}

proptest! {
    #[test]
    fn prop_flags_true_iff_sentinel(
        minimized in proptest::option::of(-3i64..4),
        maximized in proptest::option::of(-3i64..4),
        fullscreen in proptest::option::of(-3i64..4),
    ) {
        let meta = WindowMeta {
            title: None,
            minimized: minimized.map(|v| json!(v)),
            maximized: maximized.map(|v| json!(v)),
            fullscreen: fullscreen.map(|v| json!(v)),
        };
        let flags = DisplayFlags::from_meta(&meta);
        prop_assert_eq!(flags.minimized, minimized == Some(STATE_SET));
        prop_assert_eq!(flags.maximized, maximized == Some(STATE_SET));
        prop_assert_eq!(flags.fullscreen, fullscreen == Some(STATE_SET));
    }
}
