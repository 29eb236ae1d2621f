//! Startup sequence.
//!
//! 1. Build the app and its readiness barrier
//! 2. Spawn feature modules; each marks itself ready when set up
//! 3. Pause briefly, then register routes (retrying until views show up)
//! 4. Dispatch the initial navigation
//!
//! A registration failure is not fatal: whatever routes did register stay
//! navigable and the shell keeps running.

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::app::App;
use crate::config::DashConfig;
use crate::error::RegistrationError;
use crate::events::{AppEvent, EventBus};
use crate::modules::{spawn_modules, FeatureModule};
use crate::overlay::LoadingOverlay;
use crate::router::{Registrar, Router};
use crate::view::{ViewHandle, ViewRegistry};

pub const ROUTER_MODULE: &str = "router";
pub const INITIAL_VIEW_MODULE: &str = "initial-view";

/// Running shell produced by [`Bootstrap::start`].
pub struct Dashboard {
    pub app: App,
    pub router: Router,
    /// Attempt on which registration completed, or why it gave up.
    pub registration: Result<u32, RegistrationError>,
}

pub struct Bootstrap {
    config: DashConfig,
    registry: Arc<ViewRegistry>,
    modules: Vec<Arc<dyn FeatureModule>>,
    direct_routes: Vec<(String, ViewHandle)>,
    overlay: Option<LoadingOverlay>,
    initial_hash: String,
    events: EventBus,
}

impl Bootstrap {
    pub fn new(config: DashConfig, registry: Arc<ViewRegistry>) -> Self {
        Self {
            config,
            registry,
            modules: Vec::new(),
            direct_routes: Vec::new(),
            overlay: None,
            initial_hash: String::new(),
            events: EventBus::new(),
        }
    }

    pub fn with_module(mut self, module: Arc<dyn FeatureModule>) -> Self {
        self.modules.push(module);
        self
    }

    /// Register a route up front. The registrar skips routes that are already
    /// present, so these never wait on the registry.
    pub fn with_route(mut self, route: impl Into<String>, view: ViewHandle) -> Self {
        self.direct_routes.push((route.into(), view));
        self
    }

    pub fn with_overlay(mut self, overlay: LoadingOverlay) -> Self {
        self.overlay = Some(overlay);
        self
    }

    pub fn with_initial_hash(mut self, hash: impl Into<String>) -> Self {
        self.initial_hash = hash.into();
        self
    }

    /// Use an existing event bus, e.g. one the caller already subscribed to.
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub async fn start(self) -> Dashboard {
        let Bootstrap {
            config,
            registry,
            modules,
            direct_routes,
            overlay,
            initial_hash,
            events,
        } = self;

        let app = App::new(
            &config.modules,
            events.clone(),
            overlay,
            config.overlay_fade(),
        );

        // Modules run detached; they report through the barrier.
        drop(spawn_modules(modules, app.barrier()));

        sleep(config.bootstrap_delay()).await;

        let mut router = Router::new(config.default_route.clone(), initial_hash, events.clone());
        for (route, view) in direct_routes {
            router.register_route(route, view);
        }

        let registrar = Registrar::new(config.routes.clone(), config.retry);
        let registration = registrar.run(&*registry, &mut router).await;

        match &registration {
            Ok(_) => app.mark_ready(ROUTER_MODULE),
            Err(RegistrationError::Exhausted { missing, .. }) => {
                warn!(
                    "Continuing with {} of {} route(s)",
                    router.table().len(),
                    config.routes.len()
                );
                events.emit(AppEvent::RegistrationAbandoned {
                    missing: missing.clone(),
                });
                router.init().await;
            }
        }

        if let Some(route) = router.current_route() {
            info!("Initial view: {}", route);
            app.mark_ready(INITIAL_VIEW_MODULE);
        }

        Dashboard {
            app,
            router,
            registration,
        }
    }
}
