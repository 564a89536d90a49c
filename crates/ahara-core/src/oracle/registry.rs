//! Oracle registry: named oracles looked up by configured model type.

use std::collections::HashMap;
use std::sync::Arc;

use super::trait_def::Oracle;

/// Registered [`Oracle`] implementations, keyed by [`Oracle::name`].
#[derive(Default)]
pub struct OracleRegistry {
    oracles: HashMap<String, Arc<dyn Oracle>>,
}

impl OracleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an oracle under its own name, returning any oracle it replaced.
    pub fn register(&mut self, oracle: impl Oracle + 'static) -> Option<Arc<dyn Oracle>> {
        self.register_shared(Arc::new(oracle))
    }

    /// Register an already shared oracle, returning any oracle it replaced.
    pub fn register_shared(&mut self, oracle: Arc<dyn Oracle>) -> Option<Arc<dyn Oracle>> {
        let name = oracle.name().to_string();
        self.oracles.insert(name, oracle)
    }

    /// Look up an oracle by model type.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Oracle>> {
        self.oracles.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.oracles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered oracles.
    pub fn len(&self) -> usize {
        self.oracles.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.oracles.is_empty()
    }
}

impl std::fmt::Debug for OracleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleRegistry")
            .field("oracles", &self.list())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{GenerationParams, OracleError};
    use async_trait::async_trait;

    struct Named(&'static str);

    #[async_trait]
    impl Oracle for Named {
        fn name(&self) -> &str {
            self.0
        }

        async fn generate(&self, _: &str, _: &GenerationParams) -> Result<String, OracleError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = OracleRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.register(Named("t5")).is_none());
        assert!(registry.register(Named("bart")).is_none());

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.list(), vec!["bart", "t5"]);
        assert_eq!(registry.get("t5").map(|o| o.name().to_string()), Some("t5".into()));
        assert!(registry.get("gpt").is_none());
    }

    #[test]
    fn register_replaces_same_name() {
        let mut registry = OracleRegistry::new();
        registry.register(Named("t5"));
        let old = registry.register(Named("t5"));
        assert!(old.is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn debug_lists_names() {
        let mut registry = OracleRegistry::new();
        registry.register(Named("t5"));
        assert_eq!(format!("{registry:?}"), r#"OracleRegistry { oracles: ["t5"] }"#);
    }
}
