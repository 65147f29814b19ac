use std::collections::BTreeMap;

use super::{Region, Surface, compose_screen};

/// In-memory surface keeping the latest fragment of every region.
///
/// Paints are staged until [`Surface::flush`] so that readers only observe
/// whole transactions.
#[derive(Debug, Default, Clone)]
pub struct MemorySurface {
    staged: BTreeMap<Region, String>,
    visible: BTreeMap<Region, String>,
    flushes: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest flushed content of `region`
    pub fn get(&self, region: Region) -> Option<&str> {
        self.visible.get(&region).map(String::as_str)
    }

    /// Number of completed flushes
    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Paints not yet made visible
    pub fn has_pending(&self) -> bool {
        !self.staged.is_empty()
    }

    pub fn regions(&self) -> &BTreeMap<Region, String> {
        &self.visible
    }

    /// The full dashboard screen as a terminal would show it
    pub fn screen(&self) -> String {
        compose_screen(&self.visible)
    }
}

impl Surface for MemorySurface {
    fn paint(&mut self, region: Region, content: String) {
        self.staged.insert(region, content);
    }

    fn flush(&mut self) {
        self.visible.append(&mut self.staged);
        self.flushes += 1;
    }
}
