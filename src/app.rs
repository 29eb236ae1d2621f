//! Application-level readiness.
//!
//! The app owns the module barrier. When the last module reports in, the
//! loading overlay starts fading and `AppEvent::Ready` is broadcast.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::events::{AppEvent, EventBus};
use crate::overlay::LoadingOverlay;
use crate::readiness::ReadinessBarrier;

pub struct App {
    barrier: Arc<ReadinessBarrier>,
    overlay: Option<LoadingOverlay>,
}

impl App {
    /// Must be called from within a tokio runtime when an overlay is given.
    pub fn new<S: AsRef<str>>(
        modules: &[S],
        events: EventBus,
        overlay: Option<LoadingOverlay>,
        overlay_fade: Duration,
    ) -> Self {
        let on_ready = {
            let overlay = overlay.clone();
            move || {
                if let Some(overlay) = overlay {
                    overlay.dismiss(overlay_fade);
                }
                info!("Application ready");
                events.emit(AppEvent::Ready);
            }
        };

        let names = modules.iter().map(|m| m.as_ref().to_string());
        Self {
            barrier: Arc::new(ReadinessBarrier::new(names, on_ready)),
            overlay,
        }
    }

    pub fn barrier(&self) -> Arc<ReadinessBarrier> {
        self.barrier.clone()
    }

    pub fn overlay(&self) -> Option<&LoadingOverlay> {
        self.overlay.as_ref()
    }

    pub fn mark_ready(&self, module: &str) {
        self.barrier.mark_ready(module);
    }

    pub fn is_ready(&self) -> bool {
        self.barrier.is_all_ready()
    }

    pub fn pending(&self) -> Vec<String> {
        self.barrier.pending()
    }

    pub async fn wait_ready(&self) {
        self.barrier.wait().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::OverlayState;

    #[tokio::test]
    async fn test_ready_dismisses_overlay_and_broadcasts() {
        let events = EventBus::new();
        let mut rx = events.subscribe();
        let overlay = LoadingOverlay::new();
        let app = App::new(
            &["router", "countdown"],
            events,
            Some(overlay.clone()),
            Duration::from_millis(10),
        );

        app.mark_ready("router");
        assert!(!app.is_ready());
        assert_eq!(overlay.state(), OverlayState::Visible);

        app.mark_ready("countdown");
        assert!(app.is_ready());
        assert_eq!(rx.recv().await.unwrap(), AppEvent::Ready);
        assert_ne!(overlay.state(), OverlayState::Visible);

        overlay.removed().await;
        assert_eq!(overlay.state(), OverlayState::Removed);

        // The latch holds: no second Ready event.
        app.mark_ready("router");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_ready_without_overlay() {
        let events = EventBus::new();
        let mut rx = events.subscribe();
        let app = App::new(&["router"], events, None, Duration::from_millis(500));

        app.mark_ready("router");
        app.wait_ready().await;
        assert_eq!(rx.recv().await.unwrap(), AppEvent::Ready);
        assert!(app.overlay().is_none());
    }
}
