//! Tool registry - holds the capabilities an agent may dispatch to
//!
//! Lookup is by exact name. Registration order is kept so the manifest shown
//! to the backend reads the same on every run.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{ReagentError, Result};
use crate::tools::builtin::{Calculator, Weather};
use crate::tools::tool::Tool;

/// Registry of available tools
#[derive(Default)]
pub struct ToolRegistry {
    /// Tools in registration order
    tools: Vec<Arc<dyn Tool>>,
    /// Position of each tool in `tools`, indexed by name
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in Calculator and Weather tools
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        // Fresh registry, so neither name can collide.
        let _ = registry.register(Arc::new(Calculator));
        let _ = registry.register(Arc::new(Weather));
        registry
    }

    /// Register a tool; names must be unique
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(ReagentError::DuplicateCapability(name));
        }

        self.index.insert(name.clone(), self.tools.len());
        self.tools.push(tool);
        tracing::debug!("Registered tool: {}", name);
        Ok(())
    }

    /// Get a tool by exact name
    pub fn get(&self, name: &str) -> Result<Arc<dyn Tool>> {
        self.index
            .get(name)
            .map(|&i| Arc::clone(&self.tools[i]))
            .ok_or_else(|| ReagentError::UnknownCapability(name.to_string()))
    }

    /// Check if a tool exists
    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// `name: description` lines in registration order
    pub fn manifest(&self) -> Vec<String> {
        self.tools
            .iter()
            .map(|tool| format!("{}: {}", tool.name(), tool.description()))
            .collect()
    }

    /// Tool names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::tool::ToolError;
    use async_trait::async_trait;

    struct Named(&'static str);

    #[async_trait]
    impl Tool for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "test tool"
        }

        async fn run(&self, input: &str) -> std::result::Result<String, ToolError> {
            Ok(input.to_string())
        }
    }

    #[test]
    fn test_manifest_keeps_registration_order() {
        let mut registry = ToolRegistry::new();
        for name in ["zeta", "alpha", "Mid"] {
            registry.register(Arc::new(Named(name))).unwrap();
        }

        let first = registry.manifest();
        assert_eq!(
            first,
            vec!["zeta: test tool", "alpha: test tool", "Mid: test tool"]
        );
        assert_eq!(registry.manifest(), first);
        assert_eq!(registry.names(), vec!["zeta", "alpha", "Mid"]);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Named("echo"))).unwrap();

        let err = registry.register(Arc::new(Named("echo"))).unwrap_err();
        assert!(matches!(err, ReagentError::DuplicateCapability(ref n) if n == "echo"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_is_exact_and_case_sensitive() {
        let registry = ToolRegistry::with_defaults();
        assert!(registry.get("Calculator").is_ok());
        assert!(matches!(
            registry.get("calculator"),
            Err(ReagentError::UnknownCapability(_))
        ));
        assert!(!registry.has("Weather "));
    }

    #[test]
    fn test_defaults_manifest() {
        let registry = ToolRegistry::with_defaults();
        assert_eq!(registry.names(), vec!["Calculator", "Weather"]);
        assert!(registry.manifest()[1].starts_with("Weather: Get current weather"));
    }
}
