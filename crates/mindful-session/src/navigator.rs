use mindful_core::types::Page;

/// Tracks which page is active.
///
/// Every page is reachable from every other page; navigation never fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigator {
    current: Page,
}

impl Navigator {
    /// A navigator starting on [`Page::Home`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Page {
        self.current
    }

    pub fn navigate(&mut self, target: Page) {
        tracing::debug!("Page: {} -> {}", self.current, target);
        self.current = target;
    }
}
