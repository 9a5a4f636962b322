//! Error types for Nexus.
//!
//! Every recoverable failure in the simulation core degrades a feature rather
//! than halting the frame loop. These types exist so the host can log *why* a
//! feature was degraded, and so bootstrap failures (window, GPU) can end the
//! process with a useful message.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write a config file.
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Config file is not valid JSON for [`crate::config::NexusConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is outside the range the engine can work with.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors raised by the audio collaborator.
///
/// All of these are recovered by switching [`crate::audio::AudioFeedback`]
/// into silent mode.
#[derive(Debug, Error)]
pub enum AudioError {
    /// No audio output device could be opened.
    #[error("no audio output device available: {0}")]
    NoDevice(String),
    /// The output stream failed after it was opened.
    #[error("audio stream failed: {0}")]
    Stream(String),
    /// Audio was disabled in configuration.
    #[error("audio disabled by configuration")]
    Disabled,
}

/// Errors raised by a gesture source.
///
/// All of these are recovered by falling back to pointer input.
#[derive(Debug, Error)]
pub enum GestureError {
    /// The user (or platform) refused access to the camera.
    #[error("gesture source permission denied")]
    PermissionDenied,
    /// The source could not be initialised or stopped delivering frames.
    #[error("gesture source unavailable: {0}")]
    Unavailable(String),
    /// A landmark frame did not contain the expected points.
    #[error("malformed landmark frame: expected {expected} landmarks, got {got}")]
    MalformedFrame { expected: usize, got: usize },
    /// Failed to read a recorded gesture file.
    #[error("failed to read gesture recording {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Recorded gesture file is not valid JSON.
    #[error("failed to parse gesture recording: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; ensure your system supports Vulkan/Metal/DX12/GL")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reports no usable texture format.
    #[error("GPU surface has no supported formats")]
    NoSurfaceFormat,
}

/// Errors that can occur when running the windowed application.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to create event loop.
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_message_names_field() {
        let err = ConfigError::Invalid {
            field: "simulation.fps_limit",
            reason: "must be positive".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("simulation.fps_limit"));
        assert!(msg.contains("must be positive"));
    }

    #[test]
    fn test_malformed_frame_message() {
        let err = GestureError::MalformedFrame { expected: 21, got: 3 };
        assert_eq!(
            err.to_string(),
            "malformed landmark frame: expected 21 landmarks, got 3"
        );
    }

    #[test]
    fn test_config_error_wraps_into_app_error() {
        let err: AppError = ConfigError::Invalid {
            field: "window.width",
            reason: "zero".into(),
        }
        .into();
        assert!(matches!(err, AppError::Config(_)));
    }
}
