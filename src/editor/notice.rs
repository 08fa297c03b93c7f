use std::time::{Duration, Instant};

use super::error::EditError;

/// Default window in which an identical warning is not repeated
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(1500);

/// Transient user-visible warning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

/// Debounces warnings so a repeated rejection (e.g. while dragging) shows
/// up once per cooldown window
#[derive(Debug, Clone)]
pub struct Notifier {
    cooldown: Duration,
    last: Option<(String, Instant)>,
    pending: Vec<Notice>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl Notifier {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last: None,
            pending: Vec::new(),
        }
    }

    /// Queue a warning for `err` unless the same one was shown within the
    /// cooldown. Returns true if it was queued.
    pub fn warn(&mut self, err: &EditError, now: Instant) -> bool {
        let message = err.to_string();

        if let Some((last_message, at)) = &self.last
            && *last_message == message
            && now.saturating_duration_since(*at) < self.cooldown
        {
            tracing::debug!("Suppressed repeated warning: {}", message);
            return false;
        }

        tracing::warn!("{}", message);
        self.last = Some((message.clone(), now));
        self.pending.push(Notice { message });
        true
    }

    /// Take the warnings queued since the last call
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_suppressed_within_cooldown() {
        let mut notifier = Notifier::new(Duration::from_millis(1000));
        let start = Instant::now();

        assert!(notifier.warn(&EditError::ContainmentViolation, start));
        assert!(!notifier.warn(
            &EditError::ContainmentViolation,
            start + Duration::from_millis(500)
        ));
        assert_eq!(notifier.drain().len(), 1);
        assert!(notifier.drain().is_empty());
    }

    #[test]
    fn test_duplicate_shown_after_cooldown() {
        let mut notifier = Notifier::new(Duration::from_millis(1000));
        let start = Instant::now();

        assert!(notifier.warn(&EditError::ContainmentViolation, start));
        assert!(notifier.warn(
            &EditError::ContainmentViolation,
            start + Duration::from_millis(1500)
        ));
        assert_eq!(notifier.drain().len(), 2);
    }

    #[test]
    fn test_different_warnings_not_suppressed() {
        let mut notifier = Notifier::default();
        let now = Instant::now();

        assert!(notifier.warn(&EditError::ContainmentViolation, now));
        assert!(notifier.warn(&EditError::MinimumVertexViolation { min: 3 }, now));
        assert!(notifier.warn(&EditError::ContainmentViolation, now));

        let notices = notifier.drain();
        assert_eq!(notices.len(), 3);
        assert_eq!(
            notices[1].message,
            "Outer ring must keep at least 3 points"
        );
    }
}
