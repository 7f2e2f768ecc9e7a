//! Per-session decision timer.
//!
//! The supervisor owns exactly one sleep. Re-arming moves its deadline in
//! place, so there is never a second, stale timer left behind. It is polled
//! from the session task itself: once `cancel` returns, a later call to
//! [`TimeoutSupervisor::expired`] cannot complete.

use std::future;
use std::pin::Pin;
use std::time::Duration;

use branchtale_content::domain::catalog::GameInfo;
use tokio::time::{Instant, Sleep};

/// Timeout used when no game is bound.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Deadline offset used when the configured duration overflows the clock.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Single, re-armable decision timer.
#[derive(Debug)]
pub struct TimeoutSupervisor {
    duration: Duration,
    sleep: Pin<Box<Sleep>>,
    armed: bool,
}

impl TimeoutSupervisor {
    /// Creates a disarmed timer with the given duration.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            sleep: Box::pin(tokio::time::sleep(duration)),
            armed: false,
        }
    }

    /// Creates a disarmed timer using the game's configured timeout, or
    /// [`DEFAULT_TIMEOUT`] if no game is bound.
    #[must_use]
    pub fn for_game(info: Option<&GameInfo>) -> Self {
        Self::new(info.map_or(DEFAULT_TIMEOUT, GameInfo::timeout))
    }

    /// The configured duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether the timer is counting down.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Starts counting down from the full duration, discarding any previous
    /// deadline.
    pub fn arm(&mut self) {
        let now = Instant::now();
        let deadline = now
            .checked_add(self.duration)
            .unwrap_or_else(|| now + FAR_FUTURE);
        self.sleep.as_mut().reset(deadline);
        self.armed = true;
    }

    /// Cancels and restarts the countdown.
    pub fn reset(&mut self) {
        self.arm();
    }

    /// Stops the countdown. Safe to call repeatedly or after expiry.
    pub fn cancel(&mut self) {
        self.armed = false;
    }

    /// Completes once the armed deadline passes, then disarms. Pending
    /// forever while disarmed. Cancel-safe: dropping the future before it
    /// completes leaves the deadline in place.
    pub async fn expired(&mut self) {
        if !self.armed {
            future::pending::<()>().await;
        }
        self.sleep.as_mut().await;
        self.armed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use branchtale_test_support::{PIGS_GAME_ID, sample_catalog};

    async fn fires_within(timer: &mut TimeoutSupervisor, window: Duration) -> bool {
        tokio::time::timeout(window, timer.expired()).await.is_ok()
    }

    #[tokio::test(start_paused = true)]
    async fn test_armed_timer_fires_after_duration() {
        // Arrange
        let mut timer = TimeoutSupervisor::new(Duration::from_secs(30));
        timer.arm();

        // Act / Assert
        assert!(!fires_within(&mut timer, Duration::from_secs(29)).await);
        assert!(fires_within(&mut timer, Duration::from_secs(2)).await);
        assert!(!timer.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fired_timer_does_not_fire_twice() {
        let mut timer = TimeoutSupervisor::new(Duration::from_secs(5));
        timer.arm();
        timer.expired().await;

        assert!(!fires_within(&mut timer, Duration::from_secs(60)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_pushes_deadline_back() {
        // Arrange
        let mut timer = TimeoutSupervisor::new(Duration::from_secs(10));
        timer.arm();
        tokio::time::advance(Duration::from_secs(8)).await;

        // Act
        timer.reset();

        // Assert
        assert!(!fires_within(&mut timer, Duration::from_secs(9)).await);
        assert!(fires_within(&mut timer, Duration::from_secs(2)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_timer_never_fires() {
        let mut timer = TimeoutSupervisor::new(Duration::from_secs(1));
        timer.arm();

        timer.cancel();
        timer.cancel();

        assert!(!fires_within(&mut timer, Duration::from_secs(60)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_fire_is_harmless() {
        let mut timer = TimeoutSupervisor::new(Duration::from_secs(1));
        timer.arm();
        timer.expired().await;

        timer.cancel();

        assert!(!timer.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarmed_timer_is_pending() {
        let mut timer = TimeoutSupervisor::new(Duration::from_millis(1));

        assert!(!fires_within(&mut timer, Duration::from_secs(60)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_duration_arms_without_overflow() {
        // Arrange
        let mut timer = TimeoutSupervisor::new(Duration::from_secs(u64::MAX));

        // Act
        timer.arm();
        timer.reset();

        // Assert
        assert!(timer.is_armed());
        assert!(!fires_within(&mut timer, Duration::from_secs(86_400)).await);
    }

    #[tokio::test]
    async fn test_for_game_uses_catalog_timeout_or_default() {
        let catalog = sample_catalog();
        let fork = catalog.get("fork").unwrap();

        assert_eq!(
            TimeoutSupervisor::for_game(Some(fork)).duration(),
            Duration::from_secs(10)
        );
        assert_eq!(
            TimeoutSupervisor::for_game(catalog.get(PIGS_GAME_ID)).duration(),
            Duration::from_secs(30)
        );
        assert_eq!(TimeoutSupervisor::for_game(None).duration(), DEFAULT_TIMEOUT);
    }
}
