//! Release engine: the adaptive typewriter state machine.
//!
//! [`ReleaseScheduler`] owns three pieces of state: the committed output
//! (text already released for display), the pending buffer (text received
//! but not yet released), and at most one armed release deadline. Source
//! updates are diffed against the last observed value; the delta lands in
//! the pending buffer, and timer-driven release cycles move it to the
//! committed output one token (or a capped run of characters) at a time.
//!
//! Under buffer pressure the scheduler accelerates: delays shrink toward a
//! configured floor and accelerated cycles move several tokens at once, so
//! the display catches up instead of lagging unboundedly behind a bursty
//! stream.
//!
//! The engine is deterministic: every time-dependent operation takes an
//! explicit [`Instant`], and the caller (typically
//! [`SchedulerActor`](crate::actor::SchedulerActor)) realizes the armed
//! deadline with whatever wait primitive it has. This keeps the release
//! algorithm testable without sleeping.

use super::config::SchedulerConfig;
use super::tokenizer::tokenize;
use std::time::{Duration, Instant};
use unicode_segmentation::UnicodeSegmentation;

/// Pending characters per extra token drained in an accelerated release.
///
/// Not derived from `acceleration_threshold`; see DESIGN.md.
const ACCEL_PRESSURE_PER_WORD: usize = 50;

/// Floor for the elapsed time in the release-rate calculation, so the rate
/// stays finite when two releases land on the same instant.
const MIN_RATE_INTERVAL: Duration = Duration::from_millis(1);

/// Published scheduler state.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Text released for display so far.
    pub displayed_text: String,
    /// Whether the displayed text has caught up with the source.
    pub is_complete: bool,
    /// Pending characters not yet released.
    pub buffer_size: usize,
    /// Characters per second moved by the most recent release.
    pub release_rate: f64,
}

/// A scheduled release: when to fire and how many tokens it may move.
#[derive(Debug, Clone, Copy)]
struct ArmedRelease {
    /// Deadline for the transfer.
    fire_at: Instant,
    /// Whole tokens to move in word-boundary mode.
    word_budget: usize,
}

/// Adaptive text-release scheduler for one logical stream.
///
/// Feed each full source value (a monotonically growing prefix, or a
/// replacement that triggers a reset) through [`update_source`], then drive
/// the armed deadline with [`next_deadline`] and [`poll`]:
///
/// ```
/// use cadence::{ReleaseScheduler, SchedulerConfig};
/// use std::time::Instant;
///
/// let mut scheduler = ReleaseScheduler::new(SchedulerConfig::default());
/// scheduler.update_source("Hello world", Instant::now());
///
/// while let Some(deadline) = scheduler.next_deadline() {
///     // A real driver waits until `deadline`; tests just jump there.
///     scheduler.poll(deadline);
/// }
/// assert_eq!(scheduler.displayed_text(), "Hello world");
/// assert!(scheduler.is_complete());
/// ```
///
/// [`update_source`]: Self::update_source
/// [`next_deadline`]: Self::next_deadline
/// [`poll`]: Self::poll
#[derive(Debug)]
pub struct ReleaseScheduler {
    /// Configuration.
    config: SchedulerConfig,
    /// Last observed source value.
    source: String,
    /// Text already released for display.
    committed: String,
    /// Text received but not yet released.
    pending: String,
    /// The single outstanding release, if any.
    armed: Option<ArmedRelease>,
    /// When the previous release fired (scheduler creation before that).
    last_release: Instant,
    /// Characters per second moved by the most recent release.
    release_rate: f64,
}

impl ReleaseScheduler {
    /// Create a scheduler with an empty source.
    pub fn new(config: SchedulerConfig) -> Self {
        Self::with_source(config, "")
    }

    /// Create a scheduler whose initial source is shown immediately.
    ///
    /// The seed text counts as already committed; pacing applies only to
    /// subsequent growth.
    pub fn with_source(config: SchedulerConfig, source: &str) -> Self {
        Self {
            config,
            source: source.to_owned(),
            committed: source.to_owned(),
            pending: String::new(),
            armed: None,
            last_release: Instant::now(),
            release_rate: 0.0,
        }
    }

    /// Get the configuration.
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Text released for display so far.
    pub fn displayed_text(&self) -> &str {
        &self.committed
    }

    /// Whether the displayed text has caught up with the source.
    ///
    /// Always true while the scheduler is disabled.
    pub fn is_complete(&self) -> bool {
        !self.config.enabled || self.committed == self.source
    }

    /// Pending characters not yet released (buffer pressure).
    pub fn buffer_size(&self) -> usize {
        self.pending.chars().count()
    }

    /// Characters per second moved by the most recent release.
    pub const fn release_rate(&self) -> f64 {
        self.release_rate
    }

    /// Whether no release is currently scheduled.
    pub const fn is_idle(&self) -> bool {
        self.armed.is_none()
    }

    /// Deadline of the armed release, if one is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.armed.map(|armed| armed.fire_at)
    }

    /// Capture the current state for observers.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            displayed_text: self.committed.clone(),
            is_complete: self.is_complete(),
            buffer_size: self.buffer_size(),
            release_rate: self.release_rate,
        }
    }

    /// Ingest the latest full source value.
    ///
    /// An unchanged value is a no-op. A prefix-extension appends its delta
    /// to the pending buffer and (re)arms the release deadline once the
    /// buffer reaches `min_buffer_size`. A value that shrank or diverged
    /// from the last observed one resets the scheduler: the deadline is
    /// disarmed, all state is cleared, and accumulation resumes from empty
    /// on the next update.
    pub fn update_source(&mut self, source: &str, now: Instant) {
        if !self.config.enabled {
            self.mirror_source(source);
            return;
        }
        if source == self.source {
            return;
        }

        if source.len() < self.source.len() || !source.starts_with(self.source.as_str()) {
            tracing::debug!(
                observed = source.len(),
                committed = self.committed.len(),
                "source diverged, resetting"
            );
            self.reset();
            return;
        }

        let delta = &source[self.source.len()..];
        self.pending.push_str(delta);
        self.source.push_str(delta);

        if self.buffer_size() >= self.config.min_buffer_size {
            self.arm(now);
        }
    }

    /// Toggle pacing on or off.
    ///
    /// Disabling commits all pending text synchronously and disarms the
    /// deadline, so `displayed_text` equals the source with no animation
    /// left in flight. Re-enabling resumes pacing for subsequent growth.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.config.enabled == enabled {
            return;
        }
        self.config.enabled = enabled;
        if !enabled {
            self.armed = None;
            self.pending.clear();
            self.committed.clone_from(&self.source);
        }
    }

    /// Fire the armed release if `now` has reached its deadline.
    ///
    /// Returns `true` when text moved from the pending buffer to the
    /// displayed output. Idle schedulers and deadlines still in the future
    /// return `false`.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.armed {
            Some(armed) if now >= armed.fire_at => self.fire(armed, now),
            _ => false,
        }
    }

    /// Clear all stream state and disarm the deadline.
    fn reset(&mut self) {
        self.armed = None;
        self.pending.clear();
        self.committed.clear();
        self.source.clear();
        self.release_rate = 0.0;
    }

    /// Track a disabled scheduler: committed output mirrors the source.
    fn mirror_source(&mut self, source: &str) {
        self.armed = None;
        self.pending.clear();
        if self.source != source {
            self.source.clear();
            self.source.push_str(source);
        }
        self.committed.clone_from(&self.source);
    }

    /// Schedule the next release, replacing any outstanding one.
    ///
    /// Delay and budget are derived from the buffer pressure at arm time,
    /// so bursts that arrived during a previous countdown shape the very
    /// next cycle.
    fn arm(&mut self, now: Instant) {
        let pressure = self.buffer_size();
        let accelerate = pressure >= self.config.acceleration_threshold;

        let delay = if accelerate {
            (self.config.delay / 4).max(self.config.min_acceleration_delay)
        } else {
            self.config.delay
        };
        let word_budget = if accelerate {
            self.config
                .max_words_per_acceleration
                .min(pressure.div_ceil(ACCEL_PRESSURE_PER_WORD))
        } else {
            1
        };

        self.armed = Some(ArmedRelease {
            fire_at: now + delay,
            word_budget,
        });
    }

    /// Move the armed quantity from the pending buffer to the committed
    /// output, then re-arm if text remains.
    #[allow(clippy::cast_precision_loss)]
    fn fire(&mut self, armed: ArmedRelease, now: Instant) -> bool {
        self.armed = None;

        // A reset may have drained the buffer while the deadline counted
        // down; firing on an empty buffer publishes nothing.
        if self.pending.is_empty() {
            return false;
        }

        let released = if self.config.use_word_boundaries {
            self.take_tokens(armed.word_budget)
        } else {
            self.take_chars(self.config.max_chars_per_release)
        };

        let moved = !released.is_empty();
        if moved {
            let elapsed = now
                .saturating_duration_since(self.last_release)
                .max(MIN_RATE_INTERVAL);
            self.release_rate = released.chars().count() as f64 / elapsed.as_secs_f64();
            self.last_release = now;
            self.committed.push_str(&released);
            tracing::trace!(
                bytes = released.len(),
                rate = self.release_rate,
                "released"
            );
        }

        if !self.pending.is_empty() {
            self.arm(now);
        }
        moved
    }

    /// Slice up to `budget` whole tokens off the front of the pending
    /// buffer.
    fn take_tokens(&mut self, budget: usize) -> String {
        let cut = tokenize(&self.pending)
            .take(budget)
            .map(str::len)
            .sum();
        self.split_front(cut)
    }

    /// Slice up to `max_chars` code points off the front of the pending
    /// buffer, never splitting an extended grapheme cluster.
    fn take_chars(&mut self, max_chars: usize) -> String {
        let cut = self
            .pending
            .char_indices()
            .nth(max_chars)
            .map_or(self.pending.len(), |(index, _)| index);
        let cut = cluster_floor(&self.pending, cut);
        self.split_front(cut)
    }

    /// Remove and return the first `cut` bytes of the pending buffer.
    fn split_front(&mut self, cut: usize) -> String {
        let rest = self.pending.split_off(cut);
        std::mem::replace(&mut self.pending, rest)
    }
}

/// Round `cut` down to an extended-grapheme-cluster boundary, taking at
/// least one whole cluster so a release always makes progress.
fn cluster_floor(text: &str, cut: usize) -> usize {
    if cut >= text.len() {
        return text.len();
    }
    let mut floor = 0;
    for (start, cluster) in text.grapheme_indices(true) {
        let end = start + cluster.len();
        if end > cut {
            return if floor == 0 { end } else { floor };
        }
        floor = end;
    }
    text.len()
}
