use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::future::{join_all, BoxFuture};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{Container, View, ViewState};
use crate::error::MaterializeError;
use crate::template::{ExecutionContext, TemplateSource};

/// A view whose content is a fixed list of template fragments.
///
/// State lives in a watch channel so that a `load` arriving while another is
/// in flight waits for it instead of materializing a second time.
pub struct PageView {
    name: String,
    fragments: Vec<String>,
    container: Container,
    templates: Arc<dyn TemplateSource>,
    context: ExecutionContext,
    state: watch::Sender<ViewState>,
    materializations: AtomicUsize,
    shows: AtomicUsize,
}

impl PageView {
    pub fn new(
        name: impl Into<String>,
        fragments: Vec<String>,
        templates: Arc<dyn TemplateSource>,
        context: ExecutionContext,
    ) -> Self {
        let (state, _) = watch::channel(ViewState::Unloaded);
        Self {
            name: name.into(),
            fragments,
            container: Container::new(),
            templates,
            context,
            state,
            materializations: AtomicUsize::new(0),
            shows: AtomicUsize::new(0),
        }
    }

    /// Use an existing container, e.g. one that was pre-rendered.
    #[allow(dead_code)]
    pub fn with_container(mut self, container: Container) -> Self {
        self.container = container;
        self
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    /// How many times materialization actually started.
    pub fn materializations(&self) -> usize {
        self.materializations.load(Ordering::SeqCst)
    }

    /// How many loads completed, including no-op repeats.
    pub fn shows(&self) -> usize {
        self.shows.load(Ordering::SeqCst)
    }

    fn claim_load(&self) -> bool {
        self.state.send_if_modified(|state| {
            if *state == ViewState::Unloaded {
                *state = ViewState::Loading;
                true
            } else {
                false
            }
        })
    }

    async fn wait_until_settled(&self) {
        let mut rx = self.state.subscribe();
        let _ = rx.wait_for(|state| *state != ViewState::Loading).await;
    }

    fn show(&self) {
        self.shows.fetch_add(1, Ordering::SeqCst);
        debug!("View '{}' shown, scrolled to top", self.name);
    }

    async fn materialize(&self) -> Result<(), MaterializeError> {
        self.materializations.fetch_add(1, Ordering::SeqCst);
        debug!(
            "Materializing view '{}' from {} ({} fragments)",
            self.name,
            self.templates.describe(),
            self.fragments.len()
        );

        let results = join_all(self.fragments.iter().map(|f| self.templates.fetch(f))).await;

        let mut failed = Vec::new();
        for (fragment, result) in self.fragments.iter().zip(results) {
            match result {
                Ok(body) => self.container.inject(body),
                Err(e) => {
                    warn!("View '{}': {}", self.name, e);
                    failed.push(fragment.clone());
                }
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(MaterializeError::Partial {
                view: self.name.clone(),
                loaded: self.fragments.len() - failed.len(),
                total: self.fragments.len(),
                failed,
            })
        }
    }

    async fn load_view(&self) {
        loop {
            if self.claim_load() {
                break;
            }
            let current = *self.state.borrow();
            if current == ViewState::Loaded {
                self.show();
                return;
            }
            // Another load is in flight, or a reload reset us in between.
            self.wait_until_settled().await;
        }

        if !self.context.can_fetch() {
            debug!("View '{}': cannot fetch in a local-file context, skipping", self.name);
        } else if !self.container.is_empty() {
            debug!("View '{}': container already has content, skipping", self.name);
        } else if let Err(e) = self.materialize().await {
            warn!("{}", e);
        } else {
            info!("View '{}' materialized", self.name);
        }

        self.state.send_replace(ViewState::Loaded);
        self.show();
    }

    /// Reset to `Unloaded` and clear the container in one step, unless a
    /// load is in flight. The clear runs under the state lock so it cannot
    /// interleave with a claim.
    fn try_reset(&self) -> bool {
        let mut reset = false;
        self.state.send_if_modified(|state| match *state {
            ViewState::Loading => false,
            ViewState::Loaded => {
                self.container.clear();
                *state = ViewState::Unloaded;
                reset = true;
                true
            }
            ViewState::Unloaded => {
                self.container.clear();
                reset = true;
                false
            }
        });
        reset
    }

    async fn reload_view(&self) {
        while !self.try_reset() {
            self.wait_until_settled().await;
        }
        debug!("Reloading view '{}'", self.name);
        self.load_view().await;
    }
}

impl View for PageView {
    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> ViewState {
        *self.state.borrow()
    }

    fn content(&self) -> String {
        self.container.html()
    }

    fn load(&self) -> BoxFuture<'_, ()> {
        Box::pin(self.load_view())
    }

    fn unload(&self) -> BoxFuture<'_, ()> {
        // Content is kept so navigating back does not refetch.
        Box::pin(async {})
    }

    fn reload(&self) -> BoxFuture<'_, ()> {
        Box::pin(self.reload_view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TemplateError;
    use crate::template::StaticTemplates;
    use std::time::Duration;

    fn fragments(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn home_templates() -> Arc<dyn TemplateSource> {
        Arc::new(
            StaticTemplates::new()
                .with("header.html", "<header/>")
                .with("hero.html", "<section/>"),
        )
    }

    fn home_view(context: ExecutionContext) -> PageView {
        PageView::new(
            "home",
            fragments(&["header.html", "hero.html"]),
            home_templates(),
            context,
        )
    }

    /// Delays every fetch so that concurrent loads overlap.
    struct SlowTemplates;

    impl TemplateSource for SlowTemplates {
        fn describe(&self) -> String {
            "slow".to_string()
        }

        fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<String, TemplateError>> {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(30)).await;
                Ok(format!("<{}/>", name))
            })
        }
    }

    #[tokio::test]
    async fn test_load_twice_materializes_once() {
        let view = home_view(ExecutionContext::Served);
        assert_eq!(view.state(), ViewState::Unloaded);

        view.load().await;
        view.load().await;

        assert_eq!(view.state(), ViewState::Loaded);
        assert_eq!(view.materializations(), 1);
        assert_eq!(view.shows(), 2);
        assert_eq!(view.container().html(), "<header/>\n<section/>");
    }

    #[tokio::test]
    async fn test_reload_materializes_again() {
        let view = home_view(ExecutionContext::Served);
        view.load().await;
        assert_eq!(view.materializations(), 1);

        view.reload().await;
        assert_eq!(view.materializations(), 2);
        assert_eq!(view.state(), ViewState::Loaded);
        // Cleared before refetching, so fragments are not duplicated.
        assert_eq!(view.container().len(), 2);
    }

    #[tokio::test]
    async fn test_unload_keeps_content() {
        let view = home_view(ExecutionContext::Served);
        view.load().await;
        let before = view.container().html();

        view.unload().await;
        assert_eq!(view.container().html(), before);
        assert_eq!(view.state(), ViewState::Loaded);
    }

    #[tokio::test]
    async fn test_partial_materialization_still_loads() {
        let view = PageView::new(
            "home",
            fragments(&["header.html", "missing.html", "hero.html"]),
            home_templates(),
            ExecutionContext::Served,
        );
        view.load().await;

        assert_eq!(view.state(), ViewState::Loaded);
        assert_eq!(view.container().html(), "<header/>\n<section/>");

        // Usable as-is; a second load does not retry the missing fragment.
        view.load().await;
        assert_eq!(view.materializations(), 1);
    }

    #[tokio::test]
    async fn test_local_file_context_skips_materialization() {
        let view = home_view(ExecutionContext::LocalFile);
        view.load().await;

        assert_eq!(view.state(), ViewState::Loaded);
        assert_eq!(view.materializations(), 0);
        assert!(view.container().is_empty());
    }

    #[tokio::test]
    async fn test_existing_content_skips_materialization() {
        let container = Container::new();
        container.inject("<prerendered/>".to_string());
        let view = home_view(ExecutionContext::Served).with_container(container);

        view.load().await;
        assert_eq!(view.materializations(), 0);
        assert_eq!(view.container().html(), "<prerendered/>");
    }

    #[tokio::test]
    async fn test_concurrent_loads_materialize_once() {
        let view = Arc::new(PageView::new(
            "news",
            fragments(&["list.html"]),
            Arc::new(SlowTemplates),
            ExecutionContext::Served,
        ));

        let a = view.clone();
        let b = view.clone();
        let (_, _) = tokio::join!(
            tokio::spawn(async move { a.load().await }),
            tokio::spawn(async move { b.load().await }),
        );

        assert_eq!(view.state(), ViewState::Loaded);
        assert_eq!(view.materializations(), 1);
        assert_eq!(view.container().len(), 1);
        assert_eq!(view.shows(), 2);
    }

    fn slow_view(name: &str) -> Arc<PageView> {
        Arc::new(PageView::new(
            name,
            fragments(&["list.html"]),
            Arc::new(SlowTemplates),
            ExecutionContext::Served,
        ))
    }

    #[tokio::test]
    async fn test_reload_during_load_refetches_once_settled() {
        let view = slow_view("news");

        let loader = view.clone();
        let first = tokio::spawn(async move { loader.load().await });
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(view.state(), ViewState::Loading);

        view.reload().await;
        first.await.unwrap();

        assert_eq!(view.state(), ViewState::Loaded);
        assert_eq!(view.materializations(), 2);
        assert_eq!(view.container().html(), "<list.html/>");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_reloads_never_duplicate_fragments() {
        let view = slow_view("markets");
        view.load().await;

        for round in 0..5 {
            let before = view.materializations();
            let a = view.clone();
            let b = view.clone();
            let (ra, rb) = tokio::join!(
                tokio::spawn(async move { a.reload().await }),
                tokio::spawn(async move { b.reload().await }),
            );
            ra.unwrap();
            rb.unwrap();

            assert_eq!(view.state(), ViewState::Loaded, "round {}", round);
            assert_eq!(view.container().len(), 1, "round {}", round);
            let added = view.materializations() - before;
            assert!((1..=2).contains(&added), "round {}: {} materializations", round, added);
        }
    }
}
