//! # Events Module
//!
//! Progress reporting for whatever UI drives the library.
//!
//! ## Design
//! The core library emits events through channels and never prints. The
//! CLI subscribes on a separate thread and renders a progress bar.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Sweep(SweepEvent::Quarantined { path, .. }) = event {
//!             println!("moved {}", path.display());
//!         }
//!     }
//! });
//!
//! sweep.run_with_events(paths, &mut quarantine, &sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
