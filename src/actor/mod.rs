//! Actor layer: a message-passing wrapper around the release scheduler.
//!
//! The scheduler thread owns all mutable state; callers talk to it over
//! crossbeam channels and observe published snapshots:
//!
//! ```text
//! ┌──────────────┐  SchedulerCommand   ┌──────────────────┐
//! │  Transport / │ ──────────────────▶ │ Scheduler Thread │
//! │  Application │                     │ (ReleaseScheduler│
//! │              │ ◀────────────────── │  + timed wait)   │
//! └──────────────┘      Snapshot       └──────────────────┘
//! ```
//!
//! One logical timer is ever outstanding: the thread waits on the command
//! channel with a timeout derived from the armed deadline, so any command
//! arriving mid-countdown is applied before the deadline can fire, and the
//! wait is re-derived from whatever state the command left behind.

mod messages;
mod scheduler;

pub use messages::SchedulerCommand;
pub use scheduler::SchedulerActor;
