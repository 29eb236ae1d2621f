use std::collections::HashMap;

use crate::view::ViewHandle;

/// Route name to view handle, at most one handle per name.
#[derive(Default)]
pub struct RouteTable {
    routes: HashMap<String, ViewHandle>,
    order: Vec<String>,
    registrations: usize,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. Returns `true` when an existing handle was replaced.
    pub fn register(&mut self, name: String, view: ViewHandle) -> bool {
        self.registrations += 1;
        if self.routes.insert(name.clone(), view).is_some() {
            true
        } else {
            self.order.push(name);
            false
        }
    }

    pub fn get(&self, name: &str) -> Option<ViewHandle> {
        self.routes.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    /// Route names in first-registration order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Total `register` calls, replacements included.
    #[allow(dead_code)]
    pub fn registrations(&self) -> usize {
        self.registrations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{ExecutionContext, StaticTemplates};
    use crate::view::PageView;
    use std::sync::Arc;

    fn view(name: &str) -> ViewHandle {
        Arc::new(PageView::new(
            name,
            Vec::new(),
            Arc::new(StaticTemplates::new()),
            ExecutionContext::Served,
        ))
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut table = RouteTable::new();
        assert!(!table.register("home".to_string(), view("home")));
        assert!(!table.register("news".to_string(), view("news")));
        assert!(table.register("home".to_string(), view("home-v2")));

        assert_eq!(table.len(), 2);
        assert_eq!(table.names(), ["home".to_string(), "news".to_string()]);
        assert_eq!(table.get("home").unwrap().name(), "home-v2");
        assert_eq!(table.registrations(), 3);
    }
}
