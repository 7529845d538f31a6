//! Window surface controller
//!
//! A [`WindowSurface`] represents one remote application window locally:
//! - it owns the primary layer and the drawing surface it paints into
//! - it owns the overlays the server attaches to the window
//! - it binds pointer input on every surface it creates
//! - it delegates the generic window lifecycle (chrome, placement, root
//!   container) to a [`HostWindowHandle`]

use std::rc::Rc;

use anyhow::Result;
use log::{debug, info, warn};

use crate::config::RemoteWindowConfig;
use crate::coords::{self, Geometry, Point, Size, SurfaceKind};
use crate::error::SurfaceError;
use crate::host::{DrawingSurface, HostWindowHandle, HostWindowOptions, RootContainer, SurfaceId, SurfaceSpec};
use crate::input::{InputForwarder, PointerEvent, RemoteClient};
use crate::layer::{LayerFactory, LayerSurface};
use crate::overlay::{OverlayRegistry, OverlaySurface};
use crate::protocol::{AppMetadata, ClientProperties, DisplayFlags, WindowDescriptor, WindowId};

pub struct WindowSurface<H: HostWindowHandle> {
    wid: WindowId,
    title: String,
    icon: Option<String>,
    flags: DisplayFlags,
    position: Point,

    host: H,
    layer: Box<dyn LayerSurface>,
    /// Primary drawing surface, present once `init` has run
    canvas: Option<DrawingSurface>,
    overlays: OverlayRegistry,
    input: InputForwarder,
    overlay_z_index: i32,
}

impl<H: HostWindowHandle> WindowSurface<H> {
    /// Build a window from the server's descriptor.
    ///
    /// The primary layer is created here but not attached to anything until
    /// [`WindowSurface::init`].
    pub fn new(
        mut host: H,
        client: Rc<dyn RemoteClient>,
        layers: &dyn LayerFactory,
        config: &RemoteWindowConfig,
        metadata: &AppMetadata,
        descriptor: &WindowDescriptor,
    ) -> Self {
        let title = descriptor
            .meta
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| metadata.name.clone());
        let flags = DisplayFlags::from_meta(&descriptor.meta);
        let position = Point::new(descriptor.x, descriptor.y);

        host.configure(
            &config.window.class_name,
            &HostWindowOptions {
                icon: metadata.icon.clone(),
                title: title.clone(),
                flags,
                width: descriptor.w,
                height: descriptor.h,
                position,
            },
        );

        let layer = layers.create(descriptor.wid, &descriptor.props);
        debug!(
            "Created window {} '{}' at ({}, {}) {}x{} {:?}",
            descriptor.wid, title, descriptor.x, descriptor.y, descriptor.w, descriptor.h, flags
        );

        Self {
            wid: descriptor.wid,
            title,
            icon: metadata.icon.clone(),
            flags,
            position,
            host,
            layer,
            canvas: None,
            overlays: OverlayRegistry::new(),
            input: InputForwarder::new(client, config.input.top_margin_policy),
            overlay_z_index: config.overlay.z_index,
        }
    }

    /// Create the primary drawing surface and attach the layer to it.
    /// Returns the root container for the host to finish mounting.
    ///
    /// If the layer fails to attach, the surface is detached again and the
    /// window stays uninitialized, so `init` can be retried.
    pub fn init(&mut self) -> Result<RootContainer> {
        if self.canvas.is_some() {
            return Err(SurfaceError::AlreadyInitialized(self.wid).into());
        }

        let root = self.host.init()?;
        let geometry = self.geometry();
        let surface = self
            .host
            .create_surface(SurfaceSpec::primary(self.wid, geometry.size()))?;

        // The chrome may have settled on a different size than the descriptor's
        let settled = self.geometry();
        let attached = self
            .layer
            .init(&surface, geometry)
            .and_then(|()| self.layer.update_canvases(settled));
        if let Err(e) = attached {
            self.host.detach_surface(surface.id);
            return Err(e);
        }

        self.input
            .bind(surface.id, self.wid, SurfaceKind::Primary, self.host.top_margin());
        self.canvas = Some(surface);

        info!(
            "Initialized window {} on surface {:?} ({:?} top margin)",
            self.wid,
            surface.id,
            self.input.policy()
        );
        Ok(root)
    }

    /// Record a server-side move. The host chrome owns on-screen placement,
    /// so no surface is moved and overlays keep their offsets.
    pub fn move_to(&mut self, x: i32, y: i32) {
        self.position = Point::new(x, y);
        self.host.set_position(self.position);
        debug!("Moved window {} to ({}, {})", self.wid, x, y);
    }

    /// Apply a host-driven resize and let the layer re-apply its geometry
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.host.set_dimension(Size::new(width, height));
        if self.canvas.is_some() {
            let geometry = self.geometry();
            self.layer.update_canvases(geometry)?;
        }
        debug!("Resized window {} to {}x{}", self.wid, width, height);
        Ok(())
    }

    pub fn apply_geometry(&mut self, geometry: Geometry) -> Result<()> {
        self.move_to(geometry.x, geometry.y);
        self.resize(geometry.width, geometry.height)
    }

    /// Current geometry as tracked by the host
    pub fn geometry(&self) -> Geometry {
        Geometry::from_parts(self.host.position(), self.host.dimension())
    }

    pub fn client_properties(&self) -> ClientProperties {
        self.layer.client_properties()
    }

    /// Attach an overlay at an absolute protocol position.
    ///
    /// Overlay requests can race window setup; before `init` this only logs a
    /// warning and leaves everything untouched.
    pub fn add_overlay(
        &mut self,
        overlay_id: WindowId,
        mut layer: Box<dyn LayerSurface>,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> Result<()> {
        if self.canvas.is_none() {
            warn!(
                "No drawing surface for overlay {} on window {}; dropping it",
                overlay_id, self.wid
            );
            return Ok(());
        }

        let absolute = Point::new(x, y);
        let offset = coords::overlay_offset(absolute, self.geometry().origin());
        let size = Size::new(width, height);

        let surface = self.host.create_surface(SurfaceSpec::overlay(
            overlay_id,
            offset,
            size,
            self.overlay_z_index,
        ))?;

        if let Err(e) = layer.init(&surface, Geometry::new(0, 0, width, height)) {
            self.host.detach_surface(surface.id);
            return Err(e);
        }

        self.input.bind(
            surface.id,
            overlay_id,
            SurfaceKind::Overlay,
            self.host.top_margin(),
        );

        let displaced = self.overlays.insert(OverlaySurface {
            id: overlay_id,
            absolute,
            offset,
            size,
            layer,
            surface,
        });

        debug!(
            "Added overlay {} to window {} at offset ({}, {}) {}x{}",
            overlay_id, self.wid, offset.x, offset.y, width, height
        );

        match displaced {
            Some(old) => {
                debug!("Overlay {} replaced an existing one", overlay_id);
                self.teardown_overlay(old)
            }
            None => Ok(()),
        }
    }

    /// Remove an overlay, destroying its layer and detaching its surface.
    /// Unknown ids are ignored; the server may send late or repeated removals.
    pub fn remove_overlay(&mut self, overlay_id: WindowId) -> Result<()> {
        match self.overlays.remove(overlay_id) {
            Some(overlay) => {
                debug!("Removing overlay {} from window {}", overlay_id, self.wid);
                self.teardown_overlay(overlay)
            }
            None => Ok(()),
        }
    }

    fn teardown_overlay(&mut self, mut overlay: OverlaySurface) -> Result<()> {
        self.input.unbind(overlay.surface.id);
        let destroyed = overlay.layer.destroy();
        self.host.detach_surface(overlay.surface.id);
        destroyed
    }

    /// Forward a pointer event the host delivered on one of our surfaces.
    /// Returns false when the surface is not (or no longer) bound.
    pub fn dispatch_pointer(&self, surface: SurfaceId, event: &PointerEvent) -> bool {
        self.input.dispatch(surface, event, self.host.top_margin())
    }

    pub fn primary_surface_id(&self) -> Option<SurfaceId> {
        self.canvas.map(|c| c.id)
    }

    /// Drawing surface of an overlay. Overlay ids are their own namespace,
    /// so an overlay may share its id with this or any other window.
    pub fn overlay_surface(&self, overlay_id: WindowId) -> Option<SurfaceId> {
        self.overlays.get(overlay_id).map(|o| o.surface.id)
    }

    /// Tear the window down: primary layer first, then live overlays, then
    /// the host chrome (which reclaims every child surface).
    pub fn destroy(mut self) -> Result<()> {
        self.layer.destroy()?;

        for mut overlay in self.overlays.drain() {
            if let Err(e) = overlay.layer.destroy() {
                warn!(
                    "Failed to destroy overlay {} of window {}: {:#}",
                    overlay.id, self.wid, e
                );
            }
        }
        self.input.clear();

        self.host.destroy()?;
        info!("Destroyed window {}", self.wid);
        Ok(())
    }

    pub fn wid(&self) -> WindowId {
        self.wid
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn flags(&self) -> DisplayFlags {
        self.flags
    }

    /// Last position applied through construction or `move_to`
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn is_initialized(&self) -> bool {
        self.canvas.is_some()
    }

    pub fn primary_surface(&self) -> Option<&DrawingSurface> {
        self.canvas.as_ref()
    }

    pub fn overlay(&self, id: WindowId) -> Option<&OverlaySurface> {
        self.overlays.get(id)
    }

    pub fn overlay_ids(&self) -> Vec<WindowId> {
        self.overlays.ids()
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    pub fn input(&self) -> &InputForwarder {
        &self.input
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}
