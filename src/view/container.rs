use std::sync::{Arc, RwLock};

/// Content area a view materializes its fragments into.
///
/// Cloning shares the underlying content.
#[derive(Debug, Clone, Default)]
pub struct Container {
    fragments: Arc<RwLock<Vec<String>>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn inject(&self, fragment: String) {
        self.write().push(fragment);
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    /// Rendered content, fragments joined in injection order.
    pub fn html(&self) -> String {
        self.read().join("\n")
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<String>> {
        self.fragments.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<String>> {
        self.fragments.write().unwrap_or_else(|e| e.into_inner())
    }
}
