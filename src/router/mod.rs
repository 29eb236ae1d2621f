//! Hash-based router.
//!
//! Routes map a symbolic name to a view handle. Navigation takes a location
//! hash such as `#/news`, unloads the current view and loads the target one.

mod registrar;
mod table;

use tracing::{debug, info, warn};

use crate::events::{AppEvent, EventBus};
use crate::view::ViewHandle;

pub use registrar::{Registrar, RetryPolicy, RouteBinding};
pub use table::RouteTable;

/// Extract the route name from a location hash.
///
/// `#/news`, `#news` and `#/news?tab=1` all name `news`. Returns `None` for an
/// empty hash.
pub fn parse_hash(hash: &str) -> Option<&str> {
    let trimmed = hash.trim();
    let trimmed = trimmed.strip_prefix('#').unwrap_or(trimmed);
    let trimmed = trimmed.trim_start_matches('/');
    let route = trimmed
        .split(|c| c == '?' || c == '/')
        .next()
        .unwrap_or_default();
    if route.is_empty() {
        None
    } else {
        Some(route)
    }
}

pub struct Router {
    table: RouteTable,
    default_route: String,
    initial_hash: String,
    current: Option<String>,
    initialized: bool,
    events: EventBus,
}

impl Router {
    pub fn new(
        default_route: impl Into<String>,
        initial_hash: impl Into<String>,
        events: EventBus,
    ) -> Self {
        Self {
            table: RouteTable::new(),
            default_route: default_route.into(),
            initial_hash: initial_hash.into(),
            current: None,
            initialized: false,
            events,
        }
    }

    pub fn register_route(&mut self, name: impl Into<String>, view: ViewHandle) {
        let name = name.into();
        if self.table.register(name.clone(), view) {
            debug!("Route '{}' re-registered", name);
        } else {
            debug!("Route '{}' registered", name);
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    #[allow(dead_code)]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn current_route(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current_view(&self) -> Option<ViewHandle> {
        self.current.as_deref().and_then(|name| self.table.get(name))
    }

    /// Dispatch the initial navigation. Only the first call has any effect.
    pub async fn init(&mut self) -> Option<String> {
        if self.initialized {
            warn!("Router already initialized");
            return self.current.clone();
        }
        self.initialized = true;
        info!("Router initialized with {} route(s)", self.table.len());

        let hash = self.initial_hash.clone();
        self.navigate(&hash).await
    }

    /// Navigate to the route named by `hash`.
    ///
    /// Unknown or empty hashes fall back to the default route. Returns the
    /// route that ended up active, or `None` when neither is registered.
    pub async fn navigate(&mut self, hash: &str) -> Option<String> {
        let requested = parse_hash(hash)
            .unwrap_or(self.default_route.as_str())
            .to_string();

        let (route, view) = match self.table.get(&requested) {
            Some(view) => (requested, view),
            None => {
                warn!(
                    "No route '{}', falling back to '{}'",
                    requested, self.default_route
                );
                match self.table.get(&self.default_route) {
                    Some(view) => (self.default_route.clone(), view),
                    None => {
                        warn!("Default route '{}' is not registered", self.default_route);
                        return None;
                    }
                }
            }
        };

        if let Some(previous) = self.current_view() {
            if self.current.as_deref() != Some(route.as_str()) {
                previous.unload().await;
            }
        }

        view.load().await;
        self.current = Some(route.clone());
        self.events.emit(AppEvent::RouteChanged {
            route: route.clone(),
        });
        Some(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{ExecutionContext, StaticTemplates};
    use crate::view::{PageView, View, ViewState};
    use std::sync::Arc;

    fn page(name: &str) -> Arc<PageView> {
        Arc::new(PageView::new(
            name,
            vec![format!("{}.html", name)],
            Arc::new(
                StaticTemplates::new()
                    .with("home.html", "<home/>")
                    .with("news.html", "<news/>"),
            ),
            ExecutionContext::Served,
        ))
    }

    #[test]
    fn test_parse_hash() {
        assert_eq!(parse_hash("#/news"), Some("news"));
        assert_eq!(parse_hash("#news"), Some("news"));
        assert_eq!(parse_hash("#/news?tab=1"), Some("news"));
        assert_eq!(parse_hash("#/news/latest"), Some("news"));
        assert_eq!(parse_hash("news"), Some("news"));
        assert_eq!(parse_hash(""), None);
        assert_eq!(parse_hash("#"), None);
        assert_eq!(parse_hash("#/"), None);
    }

    #[tokio::test]
    async fn test_init_dispatches_initial_hash_once() {
        let events = EventBus::new();
        let mut rx = events.subscribe();
        let mut router = Router::new("home", "#/news", events);
        let home = page("home");
        let news = page("news");
        router.register_route("home", home.clone());
        router.register_route("news", news.clone());

        assert_eq!(router.init().await.as_deref(), Some("news"));
        assert!(router.is_initialized());
        assert_eq!(news.state(), ViewState::Loaded);
        assert_eq!(home.state(), ViewState::Unloaded);
        assert_eq!(
            rx.recv().await.unwrap(),
            AppEvent::RouteChanged {
                route: "news".to_string()
            }
        );

        router.init().await;
        assert_eq!(news.shows(), 1);
    }

    #[tokio::test]
    async fn test_unknown_route_falls_back_to_default() {
        let mut router = Router::new("home", "", EventBus::new());
        router.register_route("home", page("home"));

        assert_eq!(router.navigate("#/nowhere").await.as_deref(), Some("home"));
        assert_eq!(router.current_route(), Some("home"));
    }

    #[tokio::test]
    async fn test_missing_default_route_stays_put() {
        let mut router = Router::new("home", "", EventBus::new());
        router.register_route("news", page("news"));

        assert_eq!(router.navigate("#/news").await.as_deref(), Some("news"));
        assert_eq!(router.navigate("#/markets").await, None);
        assert_eq!(router.current_route(), Some("news"));
    }

    #[tokio::test]
    async fn test_navigating_back_reuses_content() {
        let mut router = Router::new("home", "", EventBus::new());
        let home = page("home");
        router.register_route("home", home.clone());
        router.register_route("news", page("news"));

        router.navigate("#/home").await;
        router.navigate("#/news").await;
        router.navigate("#/home").await;

        assert_eq!(home.materializations(), 1);
        assert_eq!(home.shows(), 2);
        assert_eq!(home.container().html(), "<home/>");
    }
}
