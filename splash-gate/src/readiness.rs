//! Minimum-display readiness flag.
//!
//! Independent of the animation's own length: the splash stays up for at
//! least `min_display`, after which the flag reads `true` for good.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Read side of the readiness flag.
#[derive(Debug, Clone)]
pub struct ReadinessFlag {
    rx: watch::Receiver<bool>,
}

impl ReadinessFlag {
    /// A flag that is already set.
    pub fn ready() -> Self {
        let (_tx, rx) = watch::channel(true);
        Self { rx }
    }

    /// An unset flag plus the handle that sets it.
    pub fn pending() -> (ReadinessHandle, Self) {
        let (tx, rx) = watch::channel(false);
        (ReadinessHandle { tx }, Self { rx })
    }

    /// Current value. Never suspends.
    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the flag is set.
    ///
    /// Returns `false` if the provider went away without ever setting it.
    pub async fn wait_ready(&self) -> bool {
        let mut rx = self.rx.clone();
        let ready = rx.wait_for(|ready| *ready).await.is_ok();
        ready
    }
}

/// Write side of the readiness flag.
#[derive(Debug)]
pub struct ReadinessHandle {
    tx: watch::Sender<bool>,
}

impl ReadinessHandle {
    /// Set the flag. Setting it again is a no-op.
    pub fn mark_ready(&self) {
        self.tx.send_if_modified(|ready| !std::mem::replace(ready, true));
    }
}

/// Timer that sets a readiness flag after the minimum display time.
///
/// Dropping the timer cancels it.
#[derive(Debug)]
pub struct ReadinessTimer {
    flag: ReadinessFlag,
    task: JoinHandle<()>,
}

impl ReadinessTimer {
    /// Start the timer on the current runtime.
    pub fn start(min_display: Duration) -> Self {
        let (handle, flag) = ReadinessFlag::pending();

        let task = tokio::spawn(async move {
            tokio::time::sleep(min_display).await;
            debug!(
                min_display_ms = min_display.as_millis() as u64,
                "Splash minimum display elapsed"
            );
            handle.mark_ready();
            // Keep the sender alive so late readers never see a closed channel
            std::future::pending::<()>().await;
        });

        Self { flag, task }
    }

    /// The flag this timer sets.
    pub fn flag(&self) -> ReadinessFlag {
        self.flag.clone()
    }
}

impl Drop for ReadinessTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_flag() {
        assert!(ReadinessFlag::ready().is_ready());
    }

    #[tokio::test]
    async fn test_pending_then_marked() {
        let (handle, flag) = ReadinessFlag::pending();
        assert!(!flag.is_ready());

        handle.mark_ready();
        handle.mark_ready();

        assert!(flag.is_ready());
        assert!(flag.wait_ready().await);
    }

    #[test]
    fn test_wait_ready_wakes_on_mark() {
        let (handle, flag) = ReadinessFlag::pending();
        let mut waiting = tokio_test::task::spawn(flag.wait_ready());

        tokio_test::assert_pending!(waiting.poll());
        handle.mark_ready();

        assert!(waiting.is_woken());
        assert!(tokio_test::assert_ready!(waiting.poll()));
    }

    #[tokio::test]
    async fn test_dropped_handle_never_ready() {
        let (handle, flag) = ReadinessFlag::pending();
        drop(handle);
        assert!(!flag.wait_ready().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_sets_flag_after_min_display() {
        let timer = ReadinessTimer::start(Duration::from_millis(1000));
        let flag = timer.flag();

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert!(!flag.is_ready());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(flag.is_ready());
    }
}
