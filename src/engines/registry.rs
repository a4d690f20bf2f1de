//! Engine registry for the configured search backends

use super::traits::Engine;
use std::sync::Arc;

/// Registry of configured backends, kept in display order
pub struct EngineRegistry {
    /// Engines in registration order
    engines: Vec<Arc<dyn Engine>>,
}

impl EngineRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            engines: Vec::new(),
        }
    }

    /// Register an engine; a second engine with the same name replaces the first
    pub fn register(&mut self, engine: Arc<dyn Engine>) {
        let name = engine.name().to_string();
        if let Some(existing) = self.engines.iter_mut().find(|e| e.name() == name) {
            *existing = engine;
        } else {
            self.engines.push(engine);
        }
    }

    /// Get an engine by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Engine>> {
        self.engines.iter().find(|e| e.name() == name)
    }

    /// All engines in display order
    pub fn engines(&self) -> &[Arc<dyn Engine>] {
        &self.engines
    }

    /// Engines to query: all of them, or only those named in `restrict`
    pub fn select(&self, restrict: &[String]) -> Vec<Arc<dyn Engine>> {
        self.engines
            .iter()
            .filter(|e| restrict.is_empty() || restrict.iter().any(|r| r == e.name()))
            .cloned()
            .collect()
    }

    /// Get all engine names
    pub fn names(&self) -> Vec<&str> {
        self.engines.iter().map(|e| e.name()).collect()
    }

    /// Check if an engine exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Get number of registered engines
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::new()
    }
}
