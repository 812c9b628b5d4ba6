use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};

use super::backend::DetectorBackend;

/// Name-keyed registry of detector backends.
///
/// Backends live behind a `Mutex` because `DetectorBackend::detect`
/// takes `&mut self` while the registry hands out shared handles.
pub struct BackendRegistry {
    backends: HashMap<String, Arc<Mutex<dyn DetectorBackend>>>,
    default_name: Option<String>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            backends: HashMap::new(),
            default_name: None,
        }
    }

    /// Register a backend under its own name. The first one registered
    /// becomes the default.
    pub fn register<B: DetectorBackend + 'static>(&mut self, backend: B) {
        let name = backend.name().to_string();
        if self.default_name.is_none() {
            self.default_name = Some(name.clone());
        }
        self.backends.insert(name, Arc::new(Mutex::new(backend)));
    }

    /// Resolve a backend by name, or the default when no name is given.
    /// Unknown names report the registered alternatives.
    pub fn resolve(&self, name: Option<&str>) -> Result<Arc<Mutex<dyn DetectorBackend>>> {
        let name = name
            .or(self.default_name.as_deref())
            .ok_or_else(|| anyhow!("no detector backends registered"))?;
        self.backends.get(name).cloned().ok_or_else(|| {
            let mut known = self.list();
            known.sort();
            anyhow!(
                "backend '{}' not registered (available: {})",
                name,
                known.join(", ")
            )
        })
    }

    /// Names of all registered backends, in no particular order.
    pub fn list(&self) -> Vec<String> {
        self.backends.keys().cloned().collect()
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::StubBackend;

    #[test]
    fn resolves_by_name_and_falls_back_to_the_default() {
        let mut registry = BackendRegistry::new();
        assert!(registry.resolve(None).is_err());

        registry.register(StubBackend::new());
        assert!(registry.resolve(None).is_ok());
        assert!(registry.resolve(Some("stub")).is_ok());
        assert_eq!(registry.list(), vec!["stub".to_string()]);

        let Err(err) = registry.resolve(Some("yolo")) else {
            panic!("unknown backend name must not resolve");
        };
        assert!(err.to_string().contains("available: stub"));
    }
}
