//! The dashboard's built-in pages.

use std::sync::Arc;

use crate::template::{ExecutionContext, TemplateSource};
use crate::view::{PageView, ViewRegistry};

/// A page: the name it is announced under and the fragments it is built from.
#[derive(Debug, Clone, Copy)]
pub struct PageSpec {
    pub view: &'static str,
    pub title: &'static str,
    pub fragments: &'static [&'static str],
}

pub const PAGES: &[PageSpec] = &[
    PageSpec {
        view: "HomeView",
        title: "home",
        fragments: &["header.html", "home/hero.html", "home/highlights.html", "footer.html"],
    },
    PageSpec {
        view: "CountdownView",
        title: "countdown",
        fragments: &["header.html", "countdown/clock.html", "footer.html"],
    },
    PageSpec {
        view: "NewsView",
        title: "news",
        fragments: &["header.html", "news/list.html", "footer.html"],
    },
    PageSpec {
        view: "MarketsView",
        title: "markets",
        fragments: &["header.html", "markets/odds.html", "footer.html"],
    },
    PageSpec {
        view: "VisitsView",
        title: "visits",
        fragments: &["header.html", "visits/counter.html", "footer.html"],
    },
    PageSpec {
        view: "AboutView",
        title: "about",
        fragments: &["header.html", "about/body.html", "footer.html"],
    },
];

impl PageSpec {
    pub fn build(&self, templates: Arc<dyn TemplateSource>, context: ExecutionContext) -> PageView {
        PageView::new(
            self.title,
            self.fragments.iter().map(|f| f.to_string()).collect(),
            templates,
            context,
        )
    }

    pub fn announce(
        &self,
        registry: &ViewRegistry,
        templates: Arc<dyn TemplateSource>,
        context: ExecutionContext,
    ) -> Arc<PageView> {
        let page = Arc::new(self.build(templates, context));
        registry.announce(self.view, page.clone());
        page
    }
}
