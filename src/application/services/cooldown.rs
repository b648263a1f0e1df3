//! Global cooldown gate shared by every dispatch

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// One rate limit for the whole bot. `can_use` and `mark_used` each lock the
/// gate briefly; callers own the check-then-act sequence.
#[derive(Debug)]
pub struct GlobalCooldown {
    last_used: Mutex<Option<Instant>>,
    duration: Duration,
}

impl GlobalCooldown {
    pub fn new(duration: Duration) -> Self {
        Self {
            last_used: Mutex::new(None),
            duration,
        }
    }

    /// True when the gate was never used or the window has elapsed
    pub fn can_use(&self) -> bool {
        match *self.lock() {
            None => true,
            Some(last) => last.elapsed() >= self.duration,
        }
    }

    /// Arms the gate from now
    pub fn mark_used(&self) {
        let now = Instant::now();
        let mut last_used = self.lock();
        // Instant is monotonic, but a racing caller may have stored a later one
        if last_used.map_or(true, |last| now > last) {
            *last_used = Some(now);
        }
    }

    /// Time left until the gate opens again
    pub fn remaining(&self) -> Duration {
        match *self.lock() {
            None => Duration::ZERO,
            Some(last) => self.duration.saturating_sub(last.elapsed()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Instant>> {
        // The guarded value is a plain timestamp, still valid after a panic
        self.last_used.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_ready_before_first_use() {
        let cooldown = GlobalCooldown::new(Duration::from_secs(60));
        assert!(cooldown.can_use());
        assert_eq!(cooldown.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_cooling_after_use() {
        let cooldown = GlobalCooldown::new(Duration::from_secs(60));
        cooldown.mark_used();
        assert!(!cooldown.can_use());
        assert!(cooldown.remaining() > Duration::from_secs(59));
    }

    #[test]
    fn test_zero_duration_is_always_ready() {
        let cooldown = GlobalCooldown::new(Duration::ZERO);
        cooldown.mark_used();
        assert!(cooldown.can_use());
    }

    #[test]
    fn test_ready_again_after_window() {
        let cooldown = GlobalCooldown::new(Duration::from_millis(20));
        cooldown.mark_used();
        assert!(!cooldown.can_use());
        std::thread::sleep(Duration::from_millis(30));
        assert!(cooldown.can_use());
    }

    #[test]
    fn test_can_use_does_not_arm() {
        let cooldown = GlobalCooldown::new(Duration::from_secs(60));
        for _ in 0..10 {
            assert!(cooldown.can_use());
        }
    }

    #[test]
    fn test_shared_between_threads() {
        let cooldown = Arc::new(GlobalCooldown::new(Duration::from_secs(60)));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cooldown = Arc::clone(&cooldown);
                std::thread::spawn(move || cooldown.mark_used())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(!cooldown.can_use());
    }
}
