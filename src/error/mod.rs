//! # Error Module
//!
//! Error types for the frame curator.
//!
//! ## Design Principles
//! - **Fatal vs per-file** - configuration, scanning, comparison and
//!   filesystem errors stop a run; decode and filename errors only affect
//!   one file and never surface through [`CurateError`]
//! - **Include context** - paths, values, what went wrong
//! - **Recovery hints** - suggest how to fix when possible

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum CurateError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Comparison error: {0}")]
    Compare(#[from] CompareError),

    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),
}

/// Invalid options, detected before any file is processed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid threshold: {value} (must be in [0, 1])")]
    ThresholdOutOfRange { value: f64 },

    #[error("Invalid minimum difference area: {value} (must be in [0, 1])")]
    MinDiffAreaOutOfRange { value: f64 },

    #[error("Blur radius must be a positive odd number, got {radius}")]
    EvenBlurRadius { radius: u32 },

    #[error("Border mask {side} is {value}% (must be in [0, 100))")]
    MaskPercentOutOfRange { side: &'static str, value: u32 },

    #[error("Border mask {first} + {second} covers the whole {axis}")]
    MaskOverlap {
        axis: &'static str,
        first: u32,
        second: u32,
    },

    #[error(
        "Border mask leaves an empty region on a {width}x{height} frame \
         (x {x_min}..{x_max}, y {y_min}..{y_max})"
    )]
    EmptyCropRegion {
        width: u32,
        height: u32,
        x_min: u32,
        x_max: u32,
        y_min: u32,
        y_max: u32,
    },

    #[error("Resize target must be non-zero, got {height}x{width} (HxW)")]
    InvalidResize { height: u32, width: u32 },

    #[error("File extension must not be empty")]
    EmptyExtension,
}

/// Errors that occur while listing candidate files
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the change scorer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompareError {
    #[error(
        "Cannot compare a {left_width}x{left_height} frame with a \
         {right_width}x{right_height} frame. Use --resize-to to normalize sizes."
    )]
    DimensionMismatch {
        left_width: u32,
        left_height: u32,
        right_width: u32,
        right_height: u32,
    },
}

/// Move and mkdir failures
#[derive(Error, Debug)]
pub enum FilesystemError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single image could not be decoded
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to open image file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

/// A filename that does not follow the `<prefix><id>[-<millis>]` convention
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameNameError {
    #[error("No camera id in file name {stem:?}")]
    MissingCameraId { stem: String },

    #[error("Timestamp {value:?} in {stem:?} is not epoch milliseconds")]
    InvalidTimestamp { stem: String, value: String },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, CurateError>;
