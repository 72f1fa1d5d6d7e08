//! Configuration for the release scheduler.

use std::time::Duration;

/// Tuning knobs for the adaptive release scheduler.
///
/// All values are assumed positive; the scheduler performs no validation
/// beyond the progress floors documented on [`ReleaseScheduler`].
///
/// [`ReleaseScheduler`]: super::ReleaseScheduler
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Whether pacing is active. When `false`, source text is committed
    /// immediately and `is_complete` is always true.
    pub enabled: bool,
    /// Base delay between releases.
    pub delay: Duration,
    /// Minimum pending characters before the first release is scheduled.
    pub min_buffer_size: usize,
    /// Maximum characters moved per release in character mode.
    pub max_chars_per_release: usize,
    /// Release whole tokens (word plus trailing whitespace) instead of
    /// raw characters.
    pub use_word_boundaries: bool,
    /// Pending length that triggers accelerated draining.
    pub acceleration_threshold: usize,
    /// Maximum tokens released per accelerated cycle.
    pub max_words_per_acceleration: usize,
    /// Floor for the delay while accelerating.
    pub min_acceleration_delay: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay: Duration::from_millis(40),
            min_buffer_size: 10,
            max_chars_per_release: 50,
            use_word_boundaries: true,
            acceleration_threshold: 100,
            max_words_per_acceleration: 5,
            min_acceleration_delay: Duration::from_millis(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();
        assert!(config.enabled);
        assert_eq!(config.delay, Duration::from_millis(40));
        assert_eq!(config.min_buffer_size, 10);
        assert_eq!(config.max_chars_per_release, 50);
        assert!(config.use_word_boundaries);
        assert_eq!(config.acceleration_threshold, 100);
        assert_eq!(config.max_words_per_acceleration, 5);
        assert_eq!(config.min_acceleration_delay, Duration::from_millis(10));
    }
}
