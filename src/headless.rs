//! Headless collaborators
//!
//! In-memory implementations of the host, layer and remote-client seams.
//! The replay tool runs on them, and tests use them to observe what the
//! controller did. All handles are cheap `Rc` clones sharing one state, so a
//! caller can keep a handle after moving another into a window.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use anyhow::{bail, Result};
use log::debug;
use serde::Serialize;

use crate::coords::{Geometry, Point, Size};
use crate::host::{DrawingSurface, HostWindowHandle, HostWindowOptions, RootContainer, SurfaceId, SurfaceSpec};
use crate::input::{MouseButton, PointerEvent, PointerEventKind, RemoteClient};
use crate::layer::{LayerFactory, LayerSurface};
use crate::protocol::{ClientProperties, WindowId};
use crate::session::HostProvider;

#[derive(Debug, Default)]
struct HostState {
    class_name: Option<String>,
    options: Option<HostWindowOptions>,
    root_id: u64,
    initialized: bool,
    destroyed: bool,
    position: Point,
    dimension: Size,
    top_margin: u32,
    next_surface: u32,
    surfaces: BTreeMap<SurfaceId, DrawingSurface>,
    detached: Vec<SurfaceId>,
}

/// Host window that keeps its surface tree in memory
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    state: Rc<RefCell<HostState>>,
}

impl HeadlessHost {
    pub fn new(top_margin: u32) -> Self {
        let host = Self::default();
        host.state.borrow_mut().top_margin = top_margin;
        host
    }

    pub fn with_root_id(self, root_id: u64) -> Self {
        self.state.borrow_mut().root_id = root_id;
        self
    }

    /// Simulate the chrome changing height (e.g. a toolbar appearing)
    pub fn set_top_margin(&self, top_margin: u32) {
        self.state.borrow_mut().top_margin = top_margin;
    }

    pub fn class_name(&self) -> Option<String> {
        self.state.borrow().class_name.clone()
    }

    pub fn options(&self) -> Option<HostWindowOptions> {
        self.state.borrow().options.clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.state.borrow().initialized
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.borrow().destroyed
    }

    /// Surfaces currently attached to the root, in creation order
    pub fn surfaces(&self) -> Vec<DrawingSurface> {
        self.state.borrow().surfaces.values().copied().collect()
    }

    pub fn surface(&self, id: SurfaceId) -> Option<DrawingSurface> {
        self.state.borrow().surfaces.get(&id).copied()
    }

    pub fn detached(&self) -> Vec<SurfaceId> {
        self.state.borrow().detached.clone()
    }
}

impl HostWindowHandle for HeadlessHost {
    fn configure(&mut self, class_name: &str, options: &HostWindowOptions) {
        let mut state = self.state.borrow_mut();
        state.class_name = Some(class_name.to_string());
        state.position = options.position;
        state.dimension = Size::new(options.width, options.height);
        state.options = Some(options.clone());
    }

    fn init(&mut self) -> Result<RootContainer> {
        let mut state = self.state.borrow_mut();
        if state.destroyed {
            bail!("host window {} was already destroyed", state.root_id);
        }
        state.initialized = true;
        Ok(RootContainer(state.root_id))
    }

    fn create_surface(&mut self, spec: SurfaceSpec) -> Result<DrawingSurface> {
        let mut state = self.state.borrow_mut();
        if !state.initialized || state.destroyed {
            bail!("no root container to append surface for {}", spec.tag);
        }
        state.next_surface += 1;
        let surface = DrawingSurface {
            id: SurfaceId(state.next_surface),
            spec,
        };
        state.surfaces.insert(surface.id, surface);
        Ok(surface)
    }

    fn detach_surface(&mut self, id: SurfaceId) {
        let mut state = self.state.borrow_mut();
        if state.surfaces.remove(&id).is_some() {
            state.detached.push(id);
        }
    }

    fn position(&self) -> Point {
        self.state.borrow().position
    }

    fn set_position(&mut self, position: Point) {
        self.state.borrow_mut().position = position;
    }

    fn dimension(&self) -> Size {
        self.state.borrow().dimension
    }

    fn set_dimension(&mut self, size: Size) {
        self.state.borrow_mut().dimension = size;
    }

    fn top_margin(&self) -> u32 {
        self.state.borrow().top_margin
    }

    fn destroy(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.destroyed = true;
        state.surfaces.clear();
        Ok(())
    }
}

/// Opens one [`HeadlessHost`] per window and remembers it
#[derive(Debug, Default)]
pub struct HeadlessProvider {
    top_margin: u32,
    hosts: HashMap<WindowId, HeadlessHost>,
}

impl HeadlessProvider {
    pub fn new(top_margin: u32) -> Self {
        Self {
            top_margin,
            hosts: HashMap::new(),
        }
    }

    pub fn host(&self, wid: WindowId) -> Option<HeadlessHost> {
        self.hosts.get(&wid).cloned()
    }
}

impl HostProvider for HeadlessProvider {
    type Host = HeadlessHost;

    fn open(&mut self, wid: WindowId) -> HeadlessHost {
        let host = HeadlessHost::new(self.top_margin).with_root_id(wid.0);
        self.hosts.insert(wid, host.clone());
        host
    }
}

/// Calls a [`RecordingLayer`] received
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerCalls {
    pub inits: Vec<(SurfaceId, Geometry)>,
    pub updates: Vec<Geometry>,
    pub destroys: u32,
}

/// Layer that draws nothing and records its lifecycle
#[derive(Debug)]
pub struct RecordingLayer {
    wid: WindowId,
    props: ClientProperties,
    fail_init: bool,
    calls: Rc<RefCell<LayerCalls>>,
}

impl RecordingLayer {
    pub fn new(wid: WindowId, props: ClientProperties) -> Self {
        Self {
            wid,
            props,
            fail_init: false,
            calls: Rc::default(),
        }
    }

    /// Make `init` fail, as a renderer that cannot attach would
    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub fn probe(&self) -> LayerProbe {
        LayerProbe {
            wid: self.wid,
            calls: Rc::clone(&self.calls),
        }
    }
}

impl LayerSurface for RecordingLayer {
    fn init(&mut self, surface: &DrawingSurface, geometry: Geometry) -> Result<()> {
        if self.fail_init {
            bail!("layer {} failed to attach to surface {:?}", self.wid, surface.id);
        }
        debug!("Layer {} attached to surface {:?}", self.wid, surface.id);
        self.calls.borrow_mut().inits.push((surface.id, geometry));
        Ok(())
    }

    fn update_canvases(&mut self, geometry: Geometry) -> Result<()> {
        self.calls.borrow_mut().updates.push(geometry);
        Ok(())
    }

    fn client_properties(&self) -> ClientProperties {
        self.props.clone()
    }

    fn destroy(&mut self) -> Result<()> {
        self.calls.borrow_mut().destroys += 1;
        Ok(())
    }
}

/// Read side of a [`RecordingLayer`]
#[derive(Debug, Clone)]
pub struct LayerProbe {
    wid: WindowId,
    calls: Rc<RefCell<LayerCalls>>,
}

impl LayerProbe {
    pub fn wid(&self) -> WindowId {
        self.wid
    }

    pub fn calls(&self) -> LayerCalls {
        self.calls.borrow().clone()
    }

    pub fn init_count(&self) -> usize {
        self.calls.borrow().inits.len()
    }

    pub fn destroy_count(&self) -> u32 {
        self.calls.borrow().destroys
    }
}

/// Factory handing out [`RecordingLayer`]s and keeping their probes
#[derive(Debug, Clone, Default)]
pub struct RecordingLayerFactory {
    probes: Rc<RefCell<Vec<LayerProbe>>>,
}

impl RecordingLayerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent layer created for `wid`
    pub fn probe(&self, wid: WindowId) -> Option<LayerProbe> {
        self.probes.borrow().iter().rev().find(|p| p.wid == wid).cloned()
    }

    pub fn created(&self) -> usize {
        self.probes.borrow().len()
    }
}

impl LayerFactory for RecordingLayerFactory {
    fn create(&self, wid: WindowId, props: &ClientProperties) -> Box<dyn LayerSurface> {
        let layer = RecordingLayer::new(wid, props.clone());
        self.probes.borrow_mut().push(layer.probe());
        Box::new(layer)
    }
}

/// One forwarded `process_mouse` call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MouseCall {
    pub wid: WindowId,
    pub kind: PointerEventKind,
    pub x: f64,
    pub y: f64,
    pub button: Option<MouseButton>,
    pub pressed: bool,
    pub wheel: bool,
    pub top_margin: u32,
}

/// Remote client that records every forwarded pointer call
#[derive(Debug, Default)]
pub struct RecordingClient {
    calls: RefCell<Vec<MouseCall>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<MouseCall> {
        self.calls.borrow().clone()
    }

    pub fn last(&self) -> Option<MouseCall> {
        self.calls.borrow().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.borrow().is_empty()
    }
}

impl RemoteClient for RecordingClient {
    fn process_mouse(
        &self,
        wid: WindowId,
        event: &PointerEvent,
        pressed: bool,
        wheel: bool,
        top_margin: u32,
    ) {
        self.calls.borrow_mut().push(MouseCall {
            wid,
            kind: event.kind,
            x: event.x,
            y: event.y,
            button: event.button,
            pressed,
            wheel,
            top_margin,
        });
    }
}
