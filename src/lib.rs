//! # Remote Window Surface Library
//!
//! Client-side window and overlay compositing for a remote-desktop session.
//! Every remote application window gets a local window with one primary
//! drawing surface; the server may attach popup overlays on top of it, and
//! pointer input on any of those surfaces is forwarded back to the server in
//! protocol coordinates.
//!
//! ## Architecture
//!
//! - `protocol`: Window descriptors, client properties and protocol events
//! - `coords`: Overlay placement and input translation arithmetic
//! - `host`: Seam to the desktop's generic window implementation
//! - `layer`: Seam to the renderer that paints a surface
//! - `input`: Pointer event types and forwarding to the remote client
//! - `overlay`: Live overlays of one window
//! - `window`: The per-window surface controller
//! - `session`: Routes protocol events across windows
//! - `headless`: In-memory host, layer and client implementations
//! - `config`: Configuration parsing and management
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::rc::Rc;
//! use remote_window::headless::{HeadlessProvider, RecordingClient, RecordingLayerFactory};
//! use remote_window::protocol::{AppMetadata, ProtocolEvent, WindowDescriptor};
//! use remote_window::{RemoteWindowConfig, SurfaceSession};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = RemoteWindowConfig::default();
//!     let mut session = SurfaceSession::new(
//!         HeadlessProvider::new(config.headless.top_margin),
//!         Rc::new(RecordingClient::new()),
//!         Box::new(RecordingLayerFactory::new()),
//!         config,
//!         AppMetadata::new("Remote Desktop"),
//!     );
//!     session.handle(ProtocolEvent::NewWindow {
//!         descriptor: WindowDescriptor::new(1u64, 100, 50, 640, 480),
//!     })?;
//!     session.shutdown()
//! }
//! ```

pub mod config;
pub mod coords;
pub mod error;
pub mod headless;
pub mod host;
pub mod input;
pub mod layer;
pub mod logging;
pub mod overlay;
pub mod protocol;
pub mod session;
pub mod window;

// Re-export main types for easy access
pub use config::RemoteWindowConfig;
pub use error::SurfaceError;
pub use host::HostWindowHandle;
pub use input::{InputForwarder, RemoteClient};
pub use layer::{LayerFactory, LayerSurface};
pub use session::SurfaceSession;
pub use window::WindowSurface;

// Re-export common error types
pub use anyhow::{Context, Error, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
