//! # Core Module
//!
//! The UI-agnostic curation engine.
//!
//! ## Modules
//! - `config` - Options for preprocessing and the sweep
//! - `scanner` - Lists candidate frames in a directory
//! - `preprocess` - Decodes, resizes, masks and blurs frames
//! - `scorer` - Measures the change between two frames
//! - `sweep` - Removes near-duplicate frames
//! - `split` - Sorts frames into per-camera folders
//! - `relocate` - Moves files

pub mod config;
pub mod preprocess;
pub mod relocate;
pub mod scanner;
pub mod scorer;
pub mod split;
pub mod sweep;

// Re-export commonly used types
pub use config::{BorderMask, DedupConfig, FrameSize, PreprocessConfig};
pub use preprocess::{PreprocessOutcome, PreprocessedImage, Preprocessor, RejectReason};
pub use scorer::{ChangeScore, ChangeScorer, DifferenceRegion};
pub use split::{SplitConfig, SplitReport};
pub use sweep::{DedupReport, DedupSweep, QuarantineReason, SweepReport};
