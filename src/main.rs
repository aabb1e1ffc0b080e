//! # frame-curate CLI
//!
//! Command-line interface for the frame curator.
//!
//! ## Usage
//! ```bash
//! frame-curate dedup ./frames --th 0.03 --blur-radius 5
//! frame-curate split ./frames --dry-run --output json
//! ```

mod cli;

use frame_curator::Result;

fn main() -> Result<()> {
    cli::run()
}
