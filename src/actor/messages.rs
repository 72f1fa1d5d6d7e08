//! Message types for scheduler communication.
//!
//! These define the protocol between the application and the scheduler
//! thread.

/// Commands sent to the scheduler thread.
#[derive(Debug, Clone)]
pub enum SchedulerCommand {
    /// The latest full source text.
    ///
    /// Successive values are expected to be prefix-extensions of each
    /// other; anything else resets the stream.
    Source(String),

    /// Toggle pacing on or off.
    ///
    /// Disabling commits all pending text synchronously.
    SetEnabled(bool),

    /// Stop the scheduler thread.
    Shutdown,
}
