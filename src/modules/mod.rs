//! Feature modules that report into the readiness barrier.

mod countdown;

use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::readiness::ReadinessBarrier;

pub use countdown::CountdownModule;

pub trait FeatureModule: Send + Sync {
    fn name(&self) -> &str;

    fn setup(&self) -> BoxFuture<'_, anyhow::Result<()>>;
}

/// Run every module's setup concurrently.
///
/// A module that finishes setup is marked ready. One that fails is logged and
/// never marked, so the barrier will not complete without it.
pub fn spawn_modules(
    modules: Vec<Arc<dyn FeatureModule>>,
    barrier: Arc<ReadinessBarrier>,
) -> Vec<JoinHandle<()>> {
    modules
        .into_iter()
        .map(|module| {
            let barrier = barrier.clone();
            tokio::spawn(async move {
                debug!("Setting up module '{}'", module.name());
                match module.setup().await {
                    Ok(()) => barrier.mark_ready(module.name()),
                    Err(e) => error!("Module '{}' failed to set up: {:#}", module.name(), e),
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::join_all;

    struct Fixed {
        name: &'static str,
        ok: bool,
    }

    impl FeatureModule for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn setup(&self) -> BoxFuture<'_, anyhow::Result<()>> {
            Box::pin(async move {
                if self.ok {
                    Ok(())
                } else {
                    anyhow::bail!("feed unavailable")
                }
            })
        }
    }

    #[tokio::test]
    async fn test_successful_modules_mark_ready() {
        let barrier = Arc::new(ReadinessBarrier::without_callback(["news", "visits"]));
        let modules: Vec<Arc<dyn FeatureModule>> = vec![
            Arc::new(Fixed { name: "news", ok: true }),
            Arc::new(Fixed { name: "visits", ok: true }),
        ];

        join_all(spawn_modules(modules, barrier.clone())).await;
        assert!(barrier.is_all_ready());
    }

    #[tokio::test]
    async fn test_failed_module_stays_pending() {
        let barrier = Arc::new(ReadinessBarrier::without_callback(["news", "visits"]));
        let modules: Vec<Arc<dyn FeatureModule>> = vec![
            Arc::new(Fixed { name: "news", ok: true }),
            Arc::new(Fixed { name: "visits", ok: false }),
        ];

        join_all(spawn_modules(modules, barrier.clone())).await;
        assert!(!barrier.is_all_ready());
        assert_eq!(barrier.pending(), vec!["visits".to_string()]);
    }
}
