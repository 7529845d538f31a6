//! Pointer input forwarding
//!
//! Every drawing surface a window owns is bound to a window id. Pointer
//! events delivered by the host on that surface are translated into
//! protocol-local coordinates and handed to the remote-display client,
//! addressed to the bound id. Overlays are bound with their own id so the
//! remote side can route input to the right widget.

use std::collections::HashMap;
use std::rc::Rc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::coords::{self, SurfaceKind};
use crate::host::SurfaceId;
use crate::protocol::WindowId;

/// Event classes bound on every surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointerEventKind {
    Move,
    Press,
    Release,
    /// Delta-style wheel event
    Wheel,
    /// Legacy wheel event
    MouseWheel,
    /// Legacy line-based scroll event
    LegacyScroll,
}

pub const BOUND_EVENTS: [PointerEventKind; 6] = [
    PointerEventKind::Move,
    PointerEventKind::Press,
    PointerEventKind::Release,
    PointerEventKind::Wheel,
    PointerEventKind::MouseWheel,
    PointerEventKind::LegacyScroll,
];

impl PointerEventKind {
    pub fn is_press(&self) -> bool {
        matches!(self, PointerEventKind::Press)
    }

    pub fn is_wheel(&self) -> bool {
        matches!(
            self,
            PointerEventKind::Wheel | PointerEventKind::MouseWheel | PointerEventKind::LegacyScroll
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u8),
}

/// Scroll amount carried by wheel-class events
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", rename_all = "kebab-case")]
pub enum ScrollDelta {
    Pixels { dx: f64, dy: f64 },
    Lines { dx: f64, dy: f64 },
}

/// A pointer event in the coordinates of the surface it was delivered on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub button: Option<MouseButton>,
    #[serde(default)]
    pub delta: Option<ScrollDelta>,
    #[serde(default)]
    pub modifiers: Vec<String>,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            x,
            y,
            button: None,
            delta: None,
            modifiers: Vec::new(),
        }
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = Some(button);
        self
    }

    pub fn with_delta(mut self, delta: ScrollDelta) -> Self {
        self.delta = Some(delta);
        self
    }

    fn relocated(&self, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..self.clone()
        }
    }
}

/// The remote-display client, as far as input is concerned.
///
/// # Coordinate contract
///
/// `event` arrives already translated into protocol-local coordinates by
/// [`coords::local_input`]: the chrome height is subtracted from `y` on a
/// primary surface, overlay coordinates are passed through. Implementations
/// must not subtract `top_margin` again.
///
/// `top_margin` is the chrome height measured for the surface's window
/// (at bind time, or per event under [`TopMarginPolicy::PerEvent`]). It is
/// reported for every surface, overlays included, for clients that need to
/// map back to host coordinates.
#[cfg_attr(test, mockall::automock)]
pub trait RemoteClient {
    fn process_mouse(
        &self,
        wid: WindowId,
        event: &PointerEvent,
        pressed: bool,
        wheel: bool,
        top_margin: u32,
    );
}

/// When the chrome height used for translation is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopMarginPolicy {
    /// Captured once when the surface is bound. Drifts if the chrome height
    /// changes later.
    #[default]
    Bind,
    /// Re-measured from the host for every event
    PerEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputBinding {
    pub wid: WindowId,
    pub kind: SurfaceKind,
    pub top_margin: u32,
}

pub struct InputForwarder {
    client: Rc<dyn RemoteClient>,
    policy: TopMarginPolicy,
    bindings: HashMap<SurfaceId, InputBinding>,
}

impl InputForwarder {
    pub fn new(client: Rc<dyn RemoteClient>, policy: TopMarginPolicy) -> Self {
        Self {
            client,
            policy,
            bindings: HashMap::new(),
        }
    }

    pub fn policy(&self) -> TopMarginPolicy {
        self.policy
    }

    /// Bind all pointer event classes on `surface` to `wid`
    pub fn bind(&mut self, surface: SurfaceId, wid: WindowId, kind: SurfaceKind, top_margin: u32) {
        debug!(
            "Binding {} pointer events on surface {:?} to window {} (margin {})",
            BOUND_EVENTS.len(),
            surface,
            wid,
            top_margin
        );
        self.bindings.insert(
            surface,
            InputBinding {
                wid,
                kind,
                top_margin,
            },
        );
    }

    pub fn unbind(&mut self, surface: SurfaceId) -> Option<InputBinding> {
        self.bindings.remove(&surface)
    }

    pub fn binding(&self, surface: SurfaceId) -> Option<&InputBinding> {
        self.bindings.get(&surface)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    /// Forward one event. Returns false if nothing is bound on `surface`,
    /// e.g. an event still queued for a surface that was removed.
    pub fn dispatch(&self, surface: SurfaceId, event: &PointerEvent, current_margin: u32) -> bool {
        let Some(binding) = self.bindings.get(&surface) else {
            debug!("Dropping {:?} on unbound surface {:?}", event.kind, surface);
            return false;
        };

        let margin = match self.policy {
            TopMarginPolicy::Bind => binding.top_margin,
            TopMarginPolicy::PerEvent => current_margin,
        };
        let local = coords::local_input(binding.kind, event.x, event.y, margin);

        self.client.process_mouse(
            binding.wid,
            &event.relocated(local.x, local.y),
            event.kind.is_press(),
            event.kind.is_wheel(),
            margin,
        );
        true
    }
}
