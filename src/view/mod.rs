//! Views and their load lifecycle.
//!
//! A view is loaded every time the router navigates to it. The first load
//! materializes its content; later loads reuse what is already there.
//! `unload` keeps the content so repeat navigation stays cheap.

mod container;
mod page;
mod registry;

use std::sync::Arc;

use futures_util::future::BoxFuture;

pub use container::Container;
pub use page::PageView;
pub use registry::{ViewRegistry, ViewSource};

/// Lifecycle of a single view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Unloaded,
    Loading,
    Loaded,
}

/// Capability set the router relies on.
pub trait View: Send + Sync {
    fn name(&self) -> &str;

    fn state(&self) -> ViewState;

    /// Rendered content currently held by the view.
    fn content(&self) -> String;

    /// Load the view. Safe to call repeatedly.
    fn load(&self) -> BoxFuture<'_, ()>;

    fn unload(&self) -> BoxFuture<'_, ()>;

    /// Drop materialized content and load again from scratch.
    fn reload(&self) -> BoxFuture<'_, ()>;
}

pub type ViewHandle = Arc<dyn View>;
