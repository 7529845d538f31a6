//! Shapes this core receives from the protocol layer
//!
//! These are decoded records, not wire bytes. The remote-display client owns
//! the wire format; it hands us window descriptors, overlay requests and
//! pointer traffic in the forms below.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::input::PointerEvent;

mod properties;

pub use properties::{ClientProperties, PropertyValue};

/// Value the server uses to mark a display-state field as set
pub const STATE_SET: i64 = 1;

/// Server-assigned id of a window or an overlay.
///
/// Overlay ids come from a different namespace than window ids, but the
/// remote client addresses input to both the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for WindowId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Metadata of the local application that owns the windows
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppMetadata {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl AppMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: None,
        }
    }
}

/// Display-state metadata sent with a new window.
///
/// The state fields are kept as raw JSON because the server sends loosely
/// typed values; only the sentinel `1` means "set".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowMeta {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub minimized: Option<Value>,
    #[serde(default)]
    pub maximized: Option<Value>,
    #[serde(default)]
    pub fullscreen: Option<Value>,
}

/// Server record describing a window at creation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowDescriptor {
    pub wid: WindowId,
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
    #[serde(default)]
    pub props: ClientProperties,
    #[serde(default)]
    pub meta: WindowMeta,
}

impl WindowDescriptor {
    pub fn new(wid: impl Into<WindowId>, x: i32, y: i32, w: u32, h: u32) -> Self {
        Self {
            wid: wid.into(),
            x,
            y,
            w,
            h,
            props: ClientProperties::default(),
            meta: WindowMeta::default(),
        }
    }
}

/// Display-state flags derived once at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayFlags {
    pub minimized: bool,
    pub maximized: bool,
    pub fullscreen: bool,
}

impl DisplayFlags {
    pub fn from_meta(meta: &WindowMeta) -> Self {
        Self {
            minimized: is_state_set(meta.minimized.as_ref()),
            maximized: is_state_set(meta.maximized.as_ref()),
            fullscreen: is_state_set(meta.fullscreen.as_ref()),
        }
    }
}

/// True iff the field is present and numerically equal to [`STATE_SET`].
/// Booleans, strings and any other number count as unset.
pub fn is_state_set(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => i == STATE_SET,
            None => n.as_f64() == Some(STATE_SET as f64),
        },
        _ => false,
    }
}

/// Surface a pointer event was delivered on.
///
/// Window and overlay ids come from separate namespaces, so the kind of
/// target is always spelled out: `{"window": 1}` or `{"overlay": 7}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointerTarget {
    Window(WindowId),
    Overlay(WindowId),
}

impl PointerTarget {
    pub fn id(&self) -> WindowId {
        match self {
            PointerTarget::Window(id) | PointerTarget::Overlay(id) => *id,
        }
    }
}

/// Events routed by [`crate::session::SurfaceSession`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ProtocolEvent {
    NewWindow {
        descriptor: WindowDescriptor,
    },
    Move {
        wid: WindowId,
        x: i32,
        y: i32,
    },
    Resize {
        wid: WindowId,
        w: u32,
        h: u32,
    },
    NewOverlay {
        parent: WindowId,
        wid: WindowId,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        #[serde(default)]
        props: ClientProperties,
    },
    RemoveOverlay {
        wid: WindowId,
    },
    Pointer {
        target: PointerTarget,
        event: PointerEvent,
    },
    Close {
        wid: WindowId,
    },
}

#[cfg(test)]
mod tests;
