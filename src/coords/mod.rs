//! Geometry value types and coordinate translation
//!
//! Three coordinate spaces meet in this crate:
//! - protocol/root space, where the remote server places windows and overlays
//! - window-local space, relative to the window origin (overlay placement)
//! - surface-local space, where the host delivers pointer events
//!
//! Everything here is pure. Nothing is clamped: negative or out-of-bounds
//! values pass straight through and the remote client validates them.

use serde::{Deserialize, Serialize};

/// A position in integer pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A width/height pair in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Window or surface geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Which kind of drawing surface an input event arrived on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// The window's own surface, which sits below the host chrome
    Primary,
    /// An overlay surface, already offset by its placement
    Overlay,
}

/// Pointer coordinates after translation, plus the margin that was removed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalPosition {
    pub x: f64,
    pub y: f64,
    pub applied_margin: u32,
}

/// Offset of an overlay inside its parent window.
///
/// Both arguments live in protocol/root space. Callers freeze the result at
/// overlay creation; later window moves do not re-parent the overlay.
pub fn overlay_offset(absolute: Point, window_origin: Point) -> Point {
    Point::new(
        absolute.x.saturating_sub(window_origin.x),
        absolute.y.saturating_sub(window_origin.y),
    )
}

/// Translate surface-local pointer coordinates into protocol-local ones.
///
/// The primary surface has the host chrome (title bar) above it, so the
/// chrome's height is removed from `y`. Overlays get raw coordinates.
pub fn local_input(kind: SurfaceKind, x: f64, y: f64, top_margin: u32) -> LocalPosition {
    match kind {
        SurfaceKind::Primary => LocalPosition {
            x,
            y: y - f64::from(top_margin),
            applied_margin: top_margin,
        },
        SurfaceKind::Overlay => LocalPosition {
            x,
            y,
            applied_margin: 0,
        },
    }
}
