//! Overlay registry
//!
//! Overlays are transient sub-surfaces (menus, tooltips) the server creates
//! and destroys independently of their parent window. Each one owns a layer
//! and a drawing surface stacked above the parent's primary surface.

use std::collections::HashMap;
use std::fmt;

use crate::coords::{Point, Size};
use crate::host::DrawingSurface;
use crate::layer::LayerSurface;
use crate::protocol::WindowId;

pub struct OverlaySurface {
    pub id: WindowId,
    /// Position in protocol/root space as requested by the server
    pub absolute: Point,
    /// Position inside the parent window, frozen at creation
    pub offset: Point,
    pub size: Size,
    pub layer: Box<dyn LayerSurface>,
    pub surface: DrawingSurface,
}

impl fmt::Debug for OverlaySurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlaySurface")
            .field("id", &self.id)
            .field("absolute", &self.absolute)
            .field("offset", &self.offset)
            .field("size", &self.size)
            .field("surface", &self.surface.id)
            .finish_non_exhaustive()
    }
}

/// Overlay id -> overlay, for one parent window.
///
/// Only overlays whose drawing surface was created are ever inserted.
#[derive(Debug, Default)]
pub struct OverlayRegistry {
    overlays: HashMap<WindowId, OverlaySurface>,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an overlay, returning whatever was registered under its id
    pub fn insert(&mut self, overlay: OverlaySurface) -> Option<OverlaySurface> {
        self.overlays.insert(overlay.id, overlay)
    }

    pub fn remove(&mut self, id: WindowId) -> Option<OverlaySurface> {
        self.overlays.remove(&id)
    }

    pub fn get(&self, id: WindowId) -> Option<&OverlaySurface> {
        self.overlays.get(&id)
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.overlays.contains_key(&id)
    }

    pub fn ids(&self) -> Vec<WindowId> {
        let mut ids: Vec<_> = self.overlays.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = OverlaySurface> + '_ {
        self.overlays.drain().map(|(_, overlay)| overlay)
    }
}
