//! Error Types
//!
//! This module defines the error types used throughout the viewer core.
//!
//! # Overview
//!
//! The viewer has no I/O of its own, so the taxonomy is narrow:
//! - Malformed readings (reported by [`Reading::validate`], skipped during reconciliation)
//! - Configuration errors (bad JSON, out-of-range values)
//! - Unknown preset names coming from the surrounding dashboard
//!
//! Runtime degradations such as picking against an empty viewport or a
//! repeated `dispose()` are handled locally and never produce an error.
//!
//! [`Reading::validate`]: crate::viewer::reading::Reading::validate

use thiserror::Error;

/// The main error type for the viewer core.
#[derive(Error, Debug)]
pub enum ViewerError {
    // ========================================================================
    // Input Errors
    // ========================================================================
    /// A reading failed validation and cannot be displayed.
    #[error("Malformed reading for sensor '{sensor_id}': {reason}")]
    MalformedReading {
        /// Identity of the offending sensor (may be empty)
        sensor_id: String,
        /// What was wrong with it
        reason: &'static str,
    },

    // ========================================================================
    // Preset Errors
    // ========================================================================
    /// The requested lighting preset does not exist.
    #[error("Unknown lighting preset: {0}")]
    UnknownLightingPreset(String),

    /// The requested view preset does not exist.
    #[error("Unknown view preset: {0}")]
    UnknownViewPreset(String),

    /// The requested color mode does not exist.
    #[error("Unknown color mode: {0}")]
    UnknownColorMode(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A configuration value is out of its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ========================================================================
    // Platform Errors
    // ========================================================================
    /// Event loop error (winit).
    #[cfg(feature = "winit")]
    #[error("Event loop error: {0}")]
    EventLoopError(#[from] winit::error::EventLoopError),
}

/// Alias for `Result<T, ViewerError>`.
pub type Result<T> = std::result::Result<T, ViewerError>;
