//! Loading overlay shown until the app reports ready.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Visible,
    Fading,
    Removed,
}

/// Splash overlay. Cloning shares the same underlying state.
#[derive(Clone)]
pub struct LoadingOverlay {
    state: Arc<watch::Sender<OverlayState>>,
}

impl LoadingOverlay {
    pub fn new() -> Self {
        let (state, _) = watch::channel(OverlayState::Visible);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> OverlayState {
        *self.state.borrow()
    }

    /// Start fading; the overlay is removed once `fade` has elapsed.
    ///
    /// Must be called from within a tokio runtime. Calling it on an overlay
    /// that is already fading or removed does nothing.
    pub fn dismiss(&self, fade: Duration) {
        let started = self.state.send_if_modified(|state| {
            if *state == OverlayState::Visible {
                *state = OverlayState::Fading;
                true
            } else {
                false
            }
        });
        if !started {
            return;
        }

        debug!("Fading loading overlay over {:?}", fade);
        let state = self.state.clone();
        tokio::spawn(async move {
            tokio::time::sleep(fade).await;
            state.send_replace(OverlayState::Removed);
            debug!("Loading overlay removed");
        });
    }

    /// Wait until the overlay has been removed.
    pub async fn removed(&self) {
        let mut rx = self.state.subscribe();
        let _ = rx.wait_for(|s| *s == OverlayState::Removed).await;
    }
}

impl Default for LoadingOverlay {
    fn default() -> Self {
        Self::new()
    }
}
