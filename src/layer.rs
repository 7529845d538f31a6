//! Layer surface seam
//!
//! A layer decodes one window's (or overlay's) pixel stream and draws it
//! onto a drawing surface. This core never looks inside; it only drives the
//! lifecycle below.

use anyhow::Result;

use crate::coords::Geometry;
use crate::host::DrawingSurface;
use crate::protocol::{ClientProperties, WindowId};

#[cfg_attr(test, mockall::automock)]
pub trait LayerSurface {
    /// Attach to a drawing surface
    fn init(&mut self, surface: &DrawingSurface, geometry: Geometry) -> Result<()>;

    /// Re-apply geometry to the drawing state
    fn update_canvases(&mut self, geometry: Geometry) -> Result<()>;

    fn client_properties(&self) -> ClientProperties;

    fn destroy(&mut self) -> Result<()>;
}

/// Builds the primary layer for a window
pub trait LayerFactory {
    fn create(&self, wid: WindowId, props: &ClientProperties) -> Box<dyn LayerSurface>;
}

impl<F> LayerFactory for F
where
    F: Fn(WindowId, &ClientProperties) -> Box<dyn LayerSurface>,
{
    fn create(&self, wid: WindowId, props: &ClientProperties) -> Box<dyn LayerSurface> {
        self(wid, props)
    }
}
