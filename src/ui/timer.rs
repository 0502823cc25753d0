use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::ui::reducer::UiEvent;

/// Boundary executor for `Command::ScheduleBannerExpiry`.
///
/// At most one timer is armed at a time: arming replaces (aborts) the
/// previous one, and dropping the struct aborts whatever is left, so an
/// expiry can never fire after teardown. The generation check in the reducer
/// covers the remaining window where an already-fired event is still queued.
#[derive(Debug, Default)]
pub struct BannerTimer {
    handle: Option<JoinHandle<()>>,
}

impl BannerTimer {
    pub fn arm(&mut self, generation: u64, after: Duration, events: UnboundedSender<UiEvent>) {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = events.send(UiEvent::BannerExpired { generation });
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for BannerTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;
    use tokio::time::sleep;

    use super::*;

    #[tokio::test]
    async fn fires_once_with_its_generation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = BannerTimer::default();

        timer.arm(7, Duration::from_millis(10), tx);

        assert_eq!(
            rx.recv().await,
            Some(UiEvent::BannerExpired { generation: 7 })
        );
        sleep(Duration::from_millis(30)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn rearming_cancels_the_previous_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = BannerTimer::default();

        timer.arm(1, Duration::from_millis(20), tx.clone());
        timer.arm(2, Duration::from_millis(10), tx);

        assert_eq!(
            rx.recv().await,
            Some(UiEvent::BannerExpired { generation: 2 })
        );
        // The superseded timer never fires.
        sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn teardown_aborts_the_pending_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = BannerTimer::default();

        timer.arm(1, Duration::from_millis(10), tx);
        drop(timer);

        sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }
}
