//! Binds route names to views that may not exist yet.
//!
//! Views announce themselves independently of the router, so the first
//! attempt can find only some of them. The registrar registers whatever it
//! can, waits, and tries again until every binding resolves or the retry
//! budget runs out.
//!
//! Attempts are spaced by a fixed delay. An announcement during the delay
//! triggers an extra re-check that does not count against the budget.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info};

use super::Router;
use crate::error::RegistrationError;
use crate::view::ViewSource;

/// One route and the name of the view that serves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteBinding {
    pub route: String,
    pub view: String,
}

impl RouteBinding {
    pub fn new(route: impl Into<String>, view: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            view: view.into(),
        }
    }
}

/// How long and how often to keep trying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl RetryPolicy {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay_ms: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Complete,
    Partial { missing: Vec<String> },
}

pub struct Registrar {
    bindings: Vec<RouteBinding>,
    policy: RetryPolicy,
}

impl Registrar {
    pub fn new(bindings: Vec<RouteBinding>, policy: RetryPolicy) -> Self {
        Self { bindings, policy }
    }

    /// One pass over the bindings. Routes already in the table are left alone.
    pub fn attempt(&self, source: &dyn ViewSource, router: &mut Router) -> AttemptOutcome {
        let mut missing = Vec::new();

        for binding in &self.bindings {
            if router.table().contains(&binding.route) {
                continue;
            }
            match source.resolve(&binding.view) {
                Some(view) => router.register_route(binding.route.clone(), view),
                None => missing.push(binding.view.clone()),
            }
        }

        if missing.is_empty() {
            AttemptOutcome::Complete
        } else {
            AttemptOutcome::Partial { missing }
        }
    }

    /// Retry until every binding is registered, then initialize the router.
    ///
    /// Returns the attempt that succeeded. On exhaustion the error is logged
    /// and returned; routes registered so far stay in the table.
    pub async fn run(
        &self,
        source: &dyn ViewSource,
        router: &mut Router,
    ) -> Result<u32, RegistrationError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut missing = Vec::new();

        for attempt in 1..=max_attempts {
            match self.attempt(source, router) {
                AttemptOutcome::Complete => {
                    return Ok(self.finish(router, attempt, max_attempts).await);
                }
                AttemptOutcome::Partial { missing: now_missing } => {
                    debug!(
                        "Views not available yet: {} (attempt {}/{})",
                        now_missing.join(", "),
                        attempt,
                        max_attempts
                    );
                    missing = now_missing;
                }
            }

            if attempt < max_attempts {
                let deadline = Instant::now() + self.policy.delay();
                loop {
                    tokio::select! {
                        _ = sleep_until(deadline) => break,
                        _ = source.announced() => match self.attempt(source, router) {
                            AttemptOutcome::Complete => {
                                debug!("Announced view completed the route set");
                                return Ok(self.finish(router, attempt, max_attempts).await);
                            }
                            AttemptOutcome::Partial { missing: now_missing } => {
                                missing = now_missing;
                            }
                        },
                    }
                }
            }
        }

        let err = RegistrationError::Exhausted {
            attempts: max_attempts,
            missing,
        };
        error!("{}", err);
        Err(err)
    }

    async fn finish(&self, router: &mut Router, attempt: u32, max_attempts: u32) -> u32 {
        info!(
            "All {} route(s) registered (attempt {}/{})",
            self.bindings.len(),
            attempt,
            max_attempts
        );
        router.init().await;
        attempt
    }
}
