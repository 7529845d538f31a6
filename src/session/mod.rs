//! Multi-window session
//!
//! Routes protocol-layer events to the [`WindowSurface`] they address and
//! keeps track of which window each overlay belongs to, so removals and
//! pointer traffic for an overlay id reach the right parent.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use anyhow::Result;
use log::{debug, info, warn};

use crate::config::RemoteWindowConfig;
use crate::error::SurfaceError;
use crate::host::HostWindowHandle;
use crate::input::RemoteClient;
use crate::layer::LayerFactory;
use crate::protocol::{AppMetadata, PointerTarget, ProtocolEvent, WindowDescriptor, WindowId};
use crate::window::WindowSurface;

/// Opens a host window for each new remote window
pub trait HostProvider {
    type Host: HostWindowHandle;

    fn open(&mut self, wid: WindowId) -> Self::Host;
}

pub struct SurfaceSession<P: HostProvider> {
    provider: P,
    client: Rc<dyn RemoteClient>,
    layers: Box<dyn LayerFactory>,
    config: RemoteWindowConfig,
    metadata: AppMetadata,
    windows: BTreeMap<WindowId, WindowSurface<P::Host>>,
    /// overlay id -> parent window id
    overlay_parents: HashMap<WindowId, WindowId>,
}

impl<P: HostProvider> SurfaceSession<P> {
    pub fn new(
        provider: P,
        client: Rc<dyn RemoteClient>,
        layers: Box<dyn LayerFactory>,
        config: RemoteWindowConfig,
        metadata: AppMetadata,
    ) -> Self {
        Self {
            provider,
            client,
            layers,
            config,
            metadata,
            windows: BTreeMap::new(),
            overlay_parents: HashMap::new(),
        }
    }

    pub fn handle(&mut self, event: ProtocolEvent) -> Result<()> {
        match event {
            ProtocolEvent::NewWindow { descriptor } => self.open_window(&descriptor),
            ProtocolEvent::Move { wid, x, y } => {
                self.window_mut(wid)?.move_to(x, y);
                Ok(())
            }
            ProtocolEvent::Resize { wid, w, h } => self.window_mut(wid)?.resize(w, h),
            ProtocolEvent::NewOverlay {
                parent,
                wid,
                x,
                y,
                w,
                h,
                props,
            } => {
                if !self.windows.contains_key(&parent) {
                    warn!("Overlay {} names unknown parent window {}", wid, parent);
                    return Ok(());
                }
                // An id moving to a new parent leaves the old one first
                if let Some(previous) = self.overlay_parents.get(&wid).copied() {
                    if previous != parent {
                        self.overlay_parents.remove(&wid);
                        if let Some(old_window) = self.windows.get_mut(&previous) {
                            old_window.remove_overlay(wid)?;
                        }
                    }
                }
                let layer = self.layers.create(wid, &props);
                let window = self.window_mut(parent)?;
                window.add_overlay(wid, layer, x, y, w, h)?;
                if window.overlay(wid).is_some() {
                    self.overlay_parents.insert(wid, parent);
                }
                Ok(())
            }
            ProtocolEvent::RemoveOverlay { wid } => match self.overlay_parents.remove(&wid) {
                Some(parent) => match self.windows.get_mut(&parent) {
                    Some(window) => window.remove_overlay(wid),
                    None => Ok(()),
                },
                None => Ok(()),
            },
            ProtocolEvent::Pointer { target, event } => {
                let routed = match target {
                    PointerTarget::Window(wid) => self
                        .windows
                        .get(&wid)
                        .and_then(|window| window.primary_surface_id().map(|s| (window, s))),
                    PointerTarget::Overlay(wid) => self
                        .overlay_parents
                        .get(&wid)
                        .and_then(|parent| self.windows.get(parent))
                        .and_then(|window| window.overlay_surface(wid).map(|s| (window, s))),
                };
                match routed {
                    Some((window, surface)) => {
                        window.dispatch_pointer(surface, &event);
                    }
                    None => debug!("Ignoring {:?} for unknown target {:?}", event.kind, target),
                }
                Ok(())
            }
            ProtocolEvent::Close { wid } => self.close_window(wid),
        }
    }

    fn open_window(&mut self, descriptor: &WindowDescriptor) -> Result<()> {
        if self.windows.contains_key(&descriptor.wid) {
            return Err(SurfaceError::DuplicateWindow(descriptor.wid).into());
        }
        let host = self.provider.open(descriptor.wid);
        let mut window = WindowSurface::new(
            host,
            Rc::clone(&self.client),
            self.layers.as_ref(),
            &self.config,
            &self.metadata,
            descriptor,
        );
        if let Err(e) = window.init() {
            // Release the host chrome; the window never became routable
            if let Err(teardown) = window.destroy() {
                warn!("Failed to tear down window {}: {:#}", descriptor.wid, teardown);
            }
            return Err(e);
        }
        self.windows.insert(descriptor.wid, window);
        Ok(())
    }

    fn close_window(&mut self, wid: WindowId) -> Result<()> {
        let window = self
            .windows
            .remove(&wid)
            .ok_or(SurfaceError::UnknownWindow(wid))?;
        self.overlay_parents.retain(|_, parent| *parent != wid);
        window.destroy()
    }

    fn window_mut(&mut self, wid: WindowId) -> Result<&mut WindowSurface<P::Host>> {
        self.windows
            .get_mut(&wid)
            .ok_or_else(|| SurfaceError::UnknownWindow(wid).into())
    }

    pub fn window(&self, wid: WindowId) -> Option<&WindowSurface<P::Host>> {
        self.windows.get(&wid)
    }

    pub fn window_ids(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }

    pub fn overlay_parent(&self, overlay: WindowId) -> Option<WindowId> {
        self.overlay_parents.get(&overlay).copied()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Destroy every window. The first failure is returned after all
    /// windows have been attempted.
    pub fn shutdown(mut self) -> Result<()> {
        info!("Shutting down session with {} window(s)", self.windows.len());
        self.overlay_parents.clear();
        let mut first_error = None;
        for (wid, window) in std::mem::take(&mut self.windows) {
            if let Err(e) = window.destroy() {
                warn!("Failed to destroy window {}: {:#}", wid, e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
