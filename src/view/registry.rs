use std::collections::HashMap;
use std::sync::RwLock;

use futures_util::future::BoxFuture;
use tokio::sync::Notify;
use tracing::{debug, warn};

use super::ViewHandle;

/// Where the registrar looks views up by name.
pub trait ViewSource: Send + Sync {
    fn resolve(&self, name: &str) -> Option<ViewHandle>;

    /// Resolves when a new view may have become available. Sources that never
    /// announce anything leave the registrar to its retry delay.
    fn announced(&self) -> BoxFuture<'_, ()> {
        Box::pin(std::future::pending())
    }
}

/// Explicit registry that view modules announce themselves into.
#[derive(Default)]
pub struct ViewRegistry {
    views: RwLock<HashMap<String, ViewHandle>>,
    notify: Notify,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `view` resolvable under `name`, replacing any earlier view.
    pub fn announce(&self, name: impl Into<String>, view: ViewHandle) {
        let name = name.into();
        let previous = self
            .views
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.clone(), view);
        if previous.is_some() {
            warn!("View '{}' announced twice; keeping the latest", name);
        } else {
            debug!("View '{}' announced", name);
        }
        self.notify.notify_one();
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.views.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ViewSource for ViewRegistry {
    fn resolve(&self, name: &str) -> Option<ViewHandle> {
        self.views
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }

    fn announced(&self) -> BoxFuture<'_, ()> {
        Box::pin(self.notify.notified())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{ExecutionContext, StaticTemplates};
    use crate::view::PageView;
    use std::sync::Arc;
    use std::time::Duration;

    fn view(name: &str) -> ViewHandle {
        Arc::new(PageView::new(
            name,
            Vec::new(),
            Arc::new(StaticTemplates::new()),
            ExecutionContext::Served,
        ))
    }

    #[test]
    fn test_announce_and_resolve() {
        let registry = ViewRegistry::new();
        assert!(registry.resolve("HomeView").is_none());

        registry.announce("HomeView", view("home"));
        assert_eq!(registry.resolve("HomeView").unwrap().name(), "home");
        assert_eq!(registry.len(), 1);

        registry.announce("HomeView", view("home-v2"));
        assert_eq!(registry.resolve("HomeView").unwrap().name(), "home-v2");
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_announce_wakes_waiter() {
        let registry = Arc::new(ViewRegistry::new());

        let announcer = registry.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            announcer.announce("NewsView", view("news"));
        });

        tokio::time::timeout(Duration::from_secs(2), registry.announced())
            .await
            .expect("announcement should wake the waiter");
    }
}
