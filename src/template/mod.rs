//! Template fragment sources.
//!
//! Views materialize their content from named fragments. A fragment can come
//! from the built-in set compiled into the binary, a directory on disk, or an
//! HTTP base URL.

mod builtin;
mod dir;
mod http;

use std::collections::HashMap;

use futures_util::future::BoxFuture;

use crate::error::TemplateError;

pub use builtin::builtin_templates;
pub use dir::DirTemplates;
pub use http::HttpTemplates;

/// Where the shell is running from.
///
/// A shell opened straight from local files cannot fetch fragments, so views
/// skip materialization entirely in that context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionContext {
    #[default]
    Served,
    LocalFile,
}

impl ExecutionContext {
    pub fn can_fetch(self) -> bool {
        matches!(self, ExecutionContext::Served)
    }
}

/// Anything that can hand out template fragments by name.
pub trait TemplateSource: Send + Sync {
    /// Short human-readable description, used in logs.
    fn describe(&self) -> String;

    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<String, TemplateError>>;
}

/// In-memory fragments.
#[derive(Debug, Clone, Default)]
pub struct StaticTemplates {
    fragments: HashMap<String, String>,
}

impl StaticTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, body: impl Into<String>) -> Self {
        self.insert(name, body);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, body: impl Into<String>) {
        self.fragments.insert(name.into(), body.into());
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

impl TemplateSource for StaticTemplates {
    fn describe(&self) -> String {
        format!("built-in ({} fragments)", self.fragments.len())
    }

    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<String, TemplateError>> {
        let result = self
            .fragments
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound(name.to_string()));
        Box::pin(async move { result })
    }
}
