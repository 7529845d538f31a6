//! Typed errors raised by the surface core
//!
//! Public operations return `anyhow::Result`; these variants are wrapped
//! inside so callers can `downcast_ref::<SurfaceError>()` when they care.

use thiserror::Error;

use crate::protocol::WindowId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    #[error("window {0} is already initialized")]
    AlreadyInitialized(WindowId),

    #[error("window {0} already exists")]
    DuplicateWindow(WindowId),

    #[error("window {0} not found")]
    UnknownWindow(WindowId),

    #[error("invalid client property `{key}`: {reason}")]
    InvalidProperty { key: String, reason: String },
}
