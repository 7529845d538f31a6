//! Host window-manager seam
//!
//! The host owns window chrome, focus, on-screen placement and the root
//! container. A [`crate::window::WindowSurface`] holds one handle and
//! delegates the generic window lifecycle to it instead of inheriting it.

use anyhow::Result;

use crate::coords::{Geometry, Point, Size};
use crate::protocol::{DisplayFlags, WindowId};

/// Options the host receives when a window is configured
#[derive(Debug, Clone, PartialEq)]
pub struct HostWindowOptions {
    pub icon: Option<String>,
    pub title: String,
    pub flags: DisplayFlags,
    pub width: u32,
    pub height: u32,
    /// Server-reported position. Hosts may ignore it and apply their own
    /// placement policy.
    pub position: Point,
}

/// Opaque handle to the root container the host mounts the window into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RootContainer(pub u64);

/// Host-assigned id of a drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub u32);

/// Stacking role of a drawing surface inside the root container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceRole {
    /// The window's main surface, in normal flow below the chrome
    Primary,
    /// Absolutely positioned above the primary surface
    Overlay { z_index: i32 },
}

impl SurfaceRole {
    pub fn z_index(&self) -> i32 {
        match self {
            SurfaceRole::Primary => 0,
            SurfaceRole::Overlay { z_index } => *z_index,
        }
    }
}

/// What the host should create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSpec {
    /// Window or overlay the surface belongs to
    pub tag: WindowId,
    pub role: SurfaceRole,
    /// Position relative to the root container
    pub offset: Point,
    pub size: Size,
}

impl SurfaceSpec {
    pub fn primary(tag: WindowId, size: Size) -> Self {
        Self {
            tag,
            role: SurfaceRole::Primary,
            offset: Point::ORIGIN,
            size,
        }
    }

    pub fn overlay(tag: WindowId, offset: Point, size: Size, z_index: i32) -> Self {
        Self {
            tag,
            role: SurfaceRole::Overlay { z_index },
            offset,
            size,
        }
    }
}

/// A surface the host created and appended to the root container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawingSurface {
    pub id: SurfaceId,
    pub spec: SurfaceSpec,
}

impl DrawingSurface {
    pub fn geometry(&self) -> Geometry {
        Geometry::from_parts(self.spec.offset, self.spec.size)
    }
}

/// Capabilities the controller needs from the host's generic window
pub trait HostWindowHandle {
    /// Apply constructor-time options (title, icon, flags, size)
    fn configure(&mut self, class_name: &str, options: &HostWindowOptions);

    /// Build the generic chrome and return the root container
    fn init(&mut self) -> Result<RootContainer>;

    /// Create a drawing surface and append it to the root container
    fn create_surface(&mut self, spec: SurfaceSpec) -> Result<DrawingSurface>;

    /// Remove a surface from the root container. Unknown ids are ignored.
    fn detach_surface(&mut self, id: SurfaceId);

    fn position(&self) -> Point;

    fn set_position(&mut self, position: Point);

    fn dimension(&self) -> Size;

    fn set_dimension(&mut self, size: Size);

    /// Current height of the chrome above the primary surface
    fn top_margin(&self) -> u32;

    /// Tear down the chrome, reclaiming the root and every child surface
    fn destroy(&mut self) -> Result<()>;
}
