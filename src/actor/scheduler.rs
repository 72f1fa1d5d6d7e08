//! Scheduler Actor: dedicated thread that paces text releases.
//!
//! The actor owns a [`ReleaseScheduler`] and realizes its armed deadline as
//! a cancellable timed wait on the command channel. A command arriving
//! during a countdown wakes the thread, mutates state synchronously, and
//! the wait is then re-derived from the (possibly re-armed or disarmed)
//! deadline, so a firing can never observe stale state. Dropping the
//! actor tears the timer down with the thread.

use super::messages::SchedulerCommand;
use crate::scheduler::{ReleaseScheduler, Snapshot};
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Handle to a scheduler thread.
///
/// Created with [`SchedulerActor::spawn`]. Feed source updates with
/// [`update`](Self::update) and observe paced state on
/// [`snapshots`](Self::snapshots).
pub struct SchedulerActor {
    /// Handle to the scheduler thread.
    handle: Option<JoinHandle<()>>,
    /// Sender for commands.
    command_tx: Sender<SchedulerCommand>,
    /// Receiver for published snapshots.
    snapshot_rx: Receiver<Snapshot>,
}

impl SchedulerActor {
    /// Spawn a scheduler actor around an existing release scheduler.
    ///
    /// The scheduler's current state is published immediately; a new
    /// [`Snapshot`] follows every subsequent state change.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the scheduler thread.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn(scheduler: ReleaseScheduler) -> Self {
        // Commands are bounded; snapshots are unbounded so a slow observer
        // can never lose the final convergence state.
        let (command_tx, command_rx) = bounded(64);
        let (snapshot_tx, snapshot_rx) = unbounded();

        let handle = thread::Builder::new()
            .name("cadence-scheduler".to_string())
            .spawn(move || {
                Self::run_loop(&command_rx, &snapshot_tx, scheduler);
            })
            .expect("Failed to spawn scheduler thread");

        Self {
            handle: Some(handle),
            command_tx,
            snapshot_rx,
        }
    }

    /// Send the latest full source text.
    pub fn update(&self, source: impl Into<String>) {
        let _ = self
            .command_tx
            .send(SchedulerCommand::Source(source.into()));
    }

    /// Toggle pacing on or off.
    pub fn set_enabled(&self, enabled: bool) {
        let _ = self.command_tx.send(SchedulerCommand::SetEnabled(enabled));
    }

    /// Get a reference to the snapshot receiver.
    ///
    /// Use this with `select!` for event-driven loops:
    ///
    /// ```ignore
    /// loop {
    ///     select! {
    ///         recv(transport.receiver()) -> chunk => actor.update(chunk?),
    ///         recv(actor.snapshots()) -> snapshot => redraw(snapshot?),
    ///     }
    /// }
    /// ```
    #[inline]
    pub const fn snapshots(&self) -> &Receiver<Snapshot> {
        &self.snapshot_rx
    }

    /// Get a clonable sender for the command channel.
    ///
    /// Handy when a producer thread should feed the scheduler directly.
    pub const fn commands(&self) -> &Sender<SchedulerCommand> {
        &self.command_tx
    }

    /// Signal the scheduler to shut down without blocking.
    pub fn shutdown(&self) {
        let _ = self.command_tx.try_send(SchedulerCommand::Shutdown);
    }

    /// Stop the scheduler thread and wait for it to finish.
    pub fn join(mut self) {
        let _ = self.command_tx.send(SchedulerCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main scheduler loop.
    ///
    /// Waits on the command channel with a timeout derived from the armed
    /// deadline; commands and firings are therefore strictly sequenced on
    /// this thread.
    fn run_loop(
        command_rx: &Receiver<SchedulerCommand>,
        snapshot_tx: &Sender<Snapshot>,
        mut scheduler: ReleaseScheduler,
    ) {
        let _ = snapshot_tx.send(scheduler.snapshot());

        loop {
            let command = match scheduler.next_deadline() {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        if scheduler.poll(now) {
                            let _ = snapshot_tx.send(scheduler.snapshot());
                        }
                        continue;
                    }
                    match command_rx.recv_timeout(deadline - now) {
                        Ok(command) => command,
                        Err(RecvTimeoutError::Timeout) => {
                            if scheduler.poll(Instant::now()) {
                                let _ = snapshot_tx.send(scheduler.snapshot());
                            }
                            continue;
                        }
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match command_rx.recv() {
                    Ok(command) => command,
                    Err(_) => break,
                },
            };

            match command {
                SchedulerCommand::Source(text) => {
                    scheduler.update_source(&text, Instant::now());
                    let _ = snapshot_tx.send(scheduler.snapshot());
                }
                SchedulerCommand::SetEnabled(enabled) => {
                    scheduler.set_enabled(enabled);
                    let _ = snapshot_tx.send(scheduler.snapshot());
                }
                SchedulerCommand::Shutdown => break,
            }
        }

        tracing::debug!("scheduler thread stopped");
    }
}

impl Drop for SchedulerActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::SchedulerConfig;
    use std::time::Duration;

    fn fast_config() -> SchedulerConfig {
        SchedulerConfig {
            delay: Duration::from_millis(5),
            min_buffer_size: 1,
            ..SchedulerConfig::default()
        }
    }

    /// Drain snapshots until the displayed text matches `expected` and the
    /// scheduler reports completion.
    fn wait_for_text(actor: &SchedulerActor, expected: &str, timeout: Duration) -> Snapshot {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline
                .checked_duration_since(Instant::now())
                .expect("scheduler did not converge in time");
            let snapshot = actor
                .snapshots()
                .recv_timeout(remaining)
                .expect("snapshot channel closed");
            if snapshot.is_complete && snapshot.displayed_text == expected {
                return snapshot;
            }
        }
    }

    #[test]
    fn test_actor_converges() {
        let actor = SchedulerActor::spawn(ReleaseScheduler::new(fast_config()));
        let text = "Hello world, streamed in small paced pieces.";

        actor.update(text);
        let snapshot = wait_for_text(&actor, text, Duration::from_secs(5));
        assert_eq!(snapshot.buffer_size, 0);
        assert!(snapshot.release_rate > 0.0);

        actor.join();
    }

    #[test]
    fn test_actor_publishes_intermediate_states() {
        let actor = SchedulerActor::spawn(ReleaseScheduler::new(fast_config()));
        let text = "one two three four five six seven eight";

        actor.update(text);

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut seen = Vec::new();
        loop {
            let remaining = deadline
                .checked_duration_since(Instant::now())
                .expect("scheduler did not converge in time");
            let snapshot = actor
                .snapshots()
                .recv_timeout(remaining)
                .expect("snapshot channel closed");
            seen.push(snapshot.clone());
            if snapshot.is_complete && snapshot.displayed_text == text {
                break;
            }
        }

        // Every published state is a monotonically growing prefix of the
        // source, and convergence takes several releases.
        assert!(seen.len() > 2);
        let mut last_len = 0;
        for snapshot in &seen {
            assert!(text.starts_with(&snapshot.displayed_text));
            assert!(snapshot.displayed_text.len() >= last_len);
            last_len = snapshot.displayed_text.len();
        }

        actor.join();
    }

    #[test]
    fn test_disabled_actor_is_transparent() {
        let config = SchedulerConfig {
            enabled: false,
            ..SchedulerConfig::default()
        };
        let actor = SchedulerActor::spawn(ReleaseScheduler::new(config));

        actor.update("Hello world");
        let snapshot = wait_for_text(&actor, "Hello world", Duration::from_secs(1));
        assert!(snapshot.is_complete);

        actor.join();
    }

    #[test]
    fn test_disable_mid_stream_flushes() {
        let actor = SchedulerActor::spawn(ReleaseScheduler::new(SchedulerConfig {
            delay: Duration::from_secs(60),
            min_buffer_size: 1,
            ..SchedulerConfig::default()
        }));

        // With a 60s delay nothing would be released for a long while;
        // disabling must flush synchronously instead.
        actor.update("Hello world");
        actor.set_enabled(false);
        let snapshot = wait_for_text(&actor, "Hello world", Duration::from_secs(1));
        assert_eq!(snapshot.buffer_size, 0);

        actor.join();
    }

    #[test]
    fn test_divergent_update_resets_via_actor() {
        let actor = SchedulerActor::spawn(ReleaseScheduler::new(fast_config()));

        actor.update("Hello world");
        wait_for_text(&actor, "Hello world", Duration::from_secs(5));

        // Not a prefix-extension: the stream restarts from empty.
        actor.update("Different message");
        let deadline = Instant::now() + Duration::from_secs(1);
        loop {
            let remaining = deadline
                .checked_duration_since(Instant::now())
                .expect("reset snapshot not observed");
            let snapshot = actor
                .snapshots()
                .recv_timeout(remaining)
                .expect("snapshot channel closed");
            if snapshot.displayed_text.is_empty() {
                break;
            }
        }

        actor.update("Different message again");
        wait_for_text(&actor, "Different message again", Duration::from_secs(5));

        actor.join();
    }

    #[test]
    fn test_actor_shutdown() {
        let actor = SchedulerActor::spawn(ReleaseScheduler::new(fast_config()));
        actor.update("some text");
        actor.join();
    }
}
