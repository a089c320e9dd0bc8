//! Error type shared by settings loading and renderer setup

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlinkoError {
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable graphics adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

pub type Result<T> = std::result::Result<T, PlinkoError>;
