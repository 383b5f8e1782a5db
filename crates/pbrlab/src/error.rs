//! Error types.
//!
//! Each boundary of the crate has its own error enum so callers can tell a
//! missing texture apart from a GPU that refused to hand out a device. The
//! demo binaries only ever see [`DemoError`], log it and exit with status 1.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while reading an image or mesh from disk.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {}: {message}", path.display())]
    ImageDecode { path: PathBuf, message: String },

    #[error("failed to parse OBJ {}: {message}", path.display())]
    ObjParse { path: PathBuf, message: String },

    #[error("failed to import glTF {}: {message}", path.display())]
    GltfImport { path: PathBuf, message: String },

    #[error("{} does not contain a usable triangle mesh", path.display())]
    EmptyMesh { path: PathBuf },

    #[error("unsupported model format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },
}

/// Failure while bringing up the window or the GPU.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("surface creation: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("GPU device request failed: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// Failure while loading a [`DemoConfig`](crate::config::DemoConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A surface-of-revolution profile that cannot be tessellated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("profile control points coincide; the surface would be degenerate")]
    CoincidentControlPoints,

    #[error("profile resolution must be at least 1 along both axes")]
    ZeroResolution,
}

/// Failure while swapping GPU state at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("shader rejected by validation: {message}")]
    Shader { message: String },
}

/// Top-level error returned by [`app::run`](crate::app::run).
#[derive(Debug, Error)]
pub enum DemoError {
    #[error(transparent)]
    Init(#[from] InitError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Profile(#[from] ProfileError),
}
