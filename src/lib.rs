//! # Frame Curator
//!
//! Curation tools for collections of camera still frames.
//!
//! ## Tools
//! - **dedup** - sweeps a directory for near-duplicate frames using
//!   pixel-difference change detection, and moves them to a quarantine
//!   folder (never deletes)
//! - **split** - moves frames into `camera_<id>` folders, normalizing the
//!   embedded timestamps in their names
//!
//! ## Architecture
//! - `core` - The curation engine
//! - `events` - Progress reporting over channels
//! - `error` - Error types

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{CurateError, Result};

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the library
///
/// Honours `RUST_LOG`; otherwise logs at `default_level`. Output goes to
/// stderr so machine-readable results on stdout stay clean.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
