//! # Cadence
//!
//! An adaptive text-release scheduler for Agentic CLIs.
//!
//! Cadence decouples the *arrival rate* of streamed text (LLM tokens landing
//! in bursts) from its *display rate*, smoothing bursty input into paced
//! typewriter output. Under buffer pressure it accelerates: shorter delays,
//! wider releases, so the display catches up instead of lagging unboundedly
//! behind the stream.
//!
//! ## Core Concepts
//!
//! - **Pending buffer**: text received but not yet shown
//! - **Release cycle**: a timer-driven transfer of buffered text to the
//!   displayed output, one token (or a capped run of characters) at a time
//! - **Acceleration**: delay and release quantity are re-derived from buffer
//!   pressure at every cycle, so bursts shape the very next release
//! - **Actor model**: an optional worker thread owns the scheduler and
//!   publishes snapshots over a channel
//!
//! ## Example
//!
//! ```rust,ignore
//! use cadence::{ReleaseScheduler, SchedulerActor, SchedulerConfig};
//!
//! let actor = SchedulerActor::spawn(ReleaseScheduler::new(SchedulerConfig::default()));
//!
//! // Feed the latest full source text as it grows.
//! actor.update("Hello ");
//! actor.update("Hello world");
//!
//! // Observe paced snapshots until the display converges.
//! for snapshot in actor.snapshots().iter() {
//!     println!("{}", snapshot.displayed_text);
//!     if snapshot.is_complete {
//!         break;
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod scheduler;

// Re-exports for convenience
pub use actor::{SchedulerActor, SchedulerCommand};
pub use scheduler::{tokenize, ReleaseScheduler, SchedulerConfig, Snapshot, Tokens};
