use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::bootstrap::{Bootstrap, Dashboard};
use crate::cli::{resolve_template_location, TemplateLocation};
use crate::config::DashConfig;
use crate::modules::CountdownModule;
use crate::overlay::LoadingOverlay;
use crate::pages::PAGES;
use crate::template::{
    builtin_templates, DirTemplates, ExecutionContext, HttpTemplates, TemplateSource,
};
use crate::view::ViewRegistry;

pub struct RunOptions {
    pub route: String,
    pub navigate: Vec<String>,
    pub templates: Option<String>,
    pub local: bool,
    pub no_overlay: bool,
    pub stagger_ms: u64,
    pub reload: bool,
    pub show_html: bool,
}

fn template_source(config: &DashConfig, arg: Option<&str>) -> Result<Arc<dyn TemplateSource>> {
    let source: Arc<dyn TemplateSource> = match resolve_template_location(arg)? {
        TemplateLocation::Builtin => Arc::new(builtin_templates()),
        TemplateLocation::Dir(dir) => Arc::new(DirTemplates::new(dir)),
        TemplateLocation::Http(url) => {
            Arc::new(HttpTemplates::new(url, config.template_timeout()))
        }
    };
    debug!("Templates: {}", source.describe());
    Ok(source)
}

/// Announce every page, optionally one at a time with a pause in between.
fn announce_pages(
    registry: Arc<ViewRegistry>,
    templates: Arc<dyn TemplateSource>,
    context: ExecutionContext,
    stagger: Duration,
) {
    if stagger.is_zero() {
        for page in PAGES {
            page.announce(&registry, templates.clone(), context);
        }
        return;
    }

    tokio::spawn(async move {
        for page in PAGES {
            tokio::time::sleep(stagger).await;
            page.announce(&registry, templates.clone(), context);
        }
    });
}

pub async fn run_dashboard(config: DashConfig, opts: RunOptions) -> Result<()> {
    let templates = template_source(&config, opts.templates.as_deref())?;
    let context = if opts.local {
        ExecutionContext::LocalFile
    } else {
        ExecutionContext::Served
    };

    let registry = Arc::new(ViewRegistry::new());
    announce_pages(
        registry.clone(),
        templates,
        context,
        Duration::from_millis(opts.stagger_ms),
    );

    let countdown = Arc::new(CountdownModule::new(config.countdown_target));
    let ready_timeout = config.ready_timeout();

    let mut bootstrap = Bootstrap::new(config, registry)
        .with_module(countdown.clone())
        .with_initial_hash(opts.route.clone());
    if !opts.no_overlay {
        bootstrap = bootstrap.with_overlay(LoadingOverlay::new());
    }

    let mut dashboard = bootstrap.start().await;

    for hash in &opts.navigate {
        if dashboard.router.navigate(hash).await.is_none() {
            warn!("Navigation to {:?} went nowhere", hash);
        }
    }

    if opts.reload {
        let view = dashboard
            .router
            .current_view()
            .context("No active view to reload")?;
        view.reload().await;
    }

    if tokio::time::timeout(ready_timeout, dashboard.app.wait_ready())
        .await
        .is_err()
    {
        warn!(
            "Still waiting on module(s) after {:?}: {}",
            ready_timeout,
            dashboard.app.pending().join(", ")
        );
    }

    if let Some(overlay) = dashboard.app.overlay() {
        if dashboard.app.is_ready() {
            overlay.removed().await;
        }
    }

    print_report(&dashboard, &countdown, opts.show_html);
    Ok(())
}

fn print_report(dashboard: &Dashboard, countdown: &CountdownModule, show_html: bool) {
    match &dashboard.registration {
        Ok(attempt) => println!(
            "✅ {} route(s) registered (attempt {})",
            dashboard.router.table().len(),
            attempt
        ),
        Err(e) => {
            println!("⚠️  {}", e);
            println!(
                "   Continuing with {} route(s)",
                dashboard.router.table().len()
            );
        }
    }

    println!("\nRoutes:");
    for name in dashboard.router.table().names() {
        let marker = if dashboard.router.current_route() == Some(name.as_str()) {
            "*"
        } else {
            " "
        };
        if let Some(view) = dashboard.router.table().get(name) {
            println!("  {} {:<10} {:?}", marker, name, view.state());
        }
    }

    if dashboard.app.is_ready() {
        println!("\n✅ Application ready");
    } else {
        println!(
            "\n❌ Not ready; waiting on: {}",
            dashboard.app.pending().join(", ")
        );
    }

    if let Some(overlay) = dashboard.app.overlay() {
        println!("   Overlay: {:?}", overlay.state());
    }

    match (countdown.target(), countdown.latest()) {
        (Some(target), Some(remaining)) => {
            println!("   Countdown to {}: {}", target.to_rfc3339(), remaining)
        }
        (Some(target), None) => println!("   Countdown to {}: pending", target.to_rfc3339()),
        (None, _) => println!("   Countdown: no target configured"),
    }

    if show_html {
        match dashboard.router.current_view() {
            Some(view) => {
                println!("\n--- {} ---", view.name());
                println!("{}", view.content());
            }
            None => println!("\n(no active view)"),
        }
    }
}
