//! Adaptive release scheduling: the core typewriter state machine.
//!
//! This module is pure and clock-parameterized: nothing here sleeps or
//! spawns. The [`ReleaseScheduler`] ingests growing source prefixes, arms a
//! single release deadline, and moves text from its pending buffer to the
//! committed output each time the caller reports that the deadline passed.
//! Wrap it in [`SchedulerActor`](crate::actor::SchedulerActor) for a
//! thread-backed reactive value, or drive it from your own event loop.

mod config;
mod release;
mod tokenizer;

pub use config::SchedulerConfig;
pub use release::{ReleaseScheduler, Snapshot};
pub use tokenizer::{tokenize, Tokens};
