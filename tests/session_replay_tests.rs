//! Integration tests for replaying protocol scripts through a session
//!
//! Scripts are written the way the replay tool reads them: a JSON array of
//! tagged protocol events, with configuration loaded from a TOML file.

use std::fs;
use std::rc::Rc;

use anyhow::Result;
use serde_json::json;
use tempfile::TempDir;

use remote_window::headless::{HeadlessProvider, MouseCall, RecordingClient, RecordingLayerFactory};
use remote_window::input::PointerEventKind;
use remote_window::protocol::{AppMetadata, ProtocolEvent, WindowId};
use remote_window::{RemoteWindowConfig, SurfaceError, SurfaceSession};

fn replay(config: RemoteWindowConfig, script: serde_json::Value) -> Result<Vec<MouseCall>> {
    let events: Vec<ProtocolEvent> = serde_json::from_value(script)?;
    let client = Rc::new(RecordingClient::new());
    let mut session = SurfaceSession::new(
        HeadlessProvider::new(config.headless.top_margin),
        client.clone(),
        Box::new(RecordingLayerFactory::new()),
        config,
        AppMetadata::new("Remote Desktop"),
    );
    for event in events {
        session.handle(event)?;
    }
    session.shutdown()?;
    Ok(client.calls())
}

fn basic_script() -> serde_json::Value {
    json!([
        {
            "type": "new-window",
            "descriptor": {
                "wid": 1, "x": 100, "y": 50, "w": 640, "h": 480,
                "props": { "encodings": ["rgb24", "webp"], "scaling": 1.5 },
                "meta": { "title": "xterm", "maximized": 1 }
            }
        },
        { "type": "new-overlay", "parent": 1, "wid": 7, "x": 110, "y": 60, "w": 30, "h": 20 },
        { "type": "pointer", "target": { "window": 1 }, "event": { "kind": "press", "x": 40.0, "y": 90.0, "button": "left" } },
        { "type": "pointer", "target": { "overlay": 7 }, "event": { "kind": "wheel", "x": 5.0, "y": 6.0,
          "delta": { "unit": "pixels", "dx": 0.0, "dy": -120.0 } } },
        { "type": "remove-overlay", "wid": 7 },
        { "type": "pointer", "target": { "overlay": 7 }, "event": { "kind": "move", "x": 1.0, "y": 1.0 } },
        { "type": "move", "wid": 1, "x": 0, "y": 0 },
        { "type": "resize", "wid": 1, "w": 800, "h": 600 },
        { "type": "close", "wid": 1 }
    ])
}

/// Test a full script replays into the expected pointer calls
#[test]
fn test_replay_script() -> Result<()> {
    let calls = replay(RemoteWindowConfig::default(), basic_script())?;

    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].wid, WindowId(1));
    assert_eq!(calls[0].kind, PointerEventKind::Press);
    assert_eq!((calls[0].x, calls[0].y, calls[0].top_margin), (40.0, 58.0, 32));
    assert!(calls[0].pressed);

    assert_eq!(calls[1].wid, WindowId(7));
    assert_eq!((calls[1].x, calls[1].y, calls[1].top_margin), (5.0, 6.0, 32));
    assert!(calls[1].wheel);
    Ok(())
}

/// Test that configuration from disk changes the replay
#[test]
fn test_replay_with_config_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("remote-window.toml");
    fs::write(
        &path,
        r#"
[headless]
top_margin = 20

[overlay]
z_index = 5
"#,
    )?;

    let config = RemoteWindowConfig::load(&path)?;
    assert_eq!(config.overlay.z_index, 5);
    assert_eq!(config.window.class_name, "RemoteWindow");

    let calls = replay(config, basic_script())?;
    assert_eq!(calls[0].y, 70.0);
    Ok(())
}

/// Test that the recorded calls serialize as the replay tool prints them
#[test]
fn test_calls_serialize_to_json() -> Result<()> {
    let calls = replay(RemoteWindowConfig::default(), basic_script())?;
    let printed = serde_json::to_value(&calls)?;

    assert_eq!(printed[0]["wid"], json!(1));
    assert_eq!(printed[0]["kind"], json!("press"));
    assert_eq!(printed[0]["button"], json!("left"));
    assert_eq!(printed[1]["kind"], json!("wheel"));
    assert_eq!(printed[1]["top_margin"], json!(32));
    Ok(())
}

/// Test that malformed client properties stop the script from parsing
#[test]
fn test_nested_property_objects_are_rejected() {
    let script = json!([
        {
            "type": "new-window",
            "descriptor": { "wid": 1, "x": 0, "y": 0, "w": 10, "h": 10,
                            "props": { "nested": { "a": 1 } } }
        }
    ]);
    assert!(serde_json::from_value::<Vec<ProtocolEvent>>(script).is_err());
}

/// Test that events for windows never opened surface a typed error
#[test]
fn test_unknown_window_error() {
    let script = json!([{ "type": "close", "wid": 3 }]);
    let err = replay(RemoteWindowConfig::default(), script).unwrap_err();
    assert_eq!(
        err.downcast_ref::<SurfaceError>(),
        Some(&SurfaceError::UnknownWindow(WindowId(3)))
    );
}

/// Test that an invalid config file is refused
#[test]
fn test_invalid_config_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[overlay]\nz_index = 0\n")?;
    assert!(RemoteWindowConfig::load(&path).is_err());
    Ok(())
}

/// Test that a window and an overlay sharing an id are addressed separately
#[test]
fn test_shared_window_and_overlay_id() -> Result<()> {
    let script = json!([
        { "type": "new-window", "descriptor": { "wid": 1, "x": 100, "y": 50, "w": 640, "h": 480 } },
        { "type": "new-window", "descriptor": { "wid": 5, "x": 0, "y": 0, "w": 320, "h": 240 } },
        { "type": "new-overlay", "parent": 1, "wid": 5, "x": 110, "y": 60, "w": 30, "h": 20 },
        { "type": "pointer", "target": { "overlay": 5 }, "event": { "kind": "move", "x": 3.0, "y": 3.0 } },
        { "type": "pointer", "target": { "window": 5 }, "event": { "kind": "move", "x": 3.0, "y": 40.0 } }
    ]);
    let calls = replay(RemoteWindowConfig::default(), script)?;

    assert_eq!(calls.len(), 2);
    assert_eq!((calls[0].wid, calls[0].y), (WindowId(5), 3.0));
    assert_eq!((calls[1].wid, calls[1].y), (WindowId(5), 8.0));
    Ok(())
}
