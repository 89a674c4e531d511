//! Tool registry for managing available tools

use std::collections::HashMap;

use crate::error::ToolError;
use crate::tools::{Tool, ToolDispatcher};
use serde::{Deserialize, Serialize};

/// Name and description of a registered tool, for presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescription {
    pub name: String,
    pub description: String,
}

/// Factory trait for creating tools
pub trait ToolFactory: Send + Sync {
    /// Create a new instance of the tool
    fn create(&self) -> Box<dyn Tool>;

    /// Get the name of the tool this factory creates
    fn tool_name(&self) -> &str;

    /// Get the description of the tool this factory creates
    fn tool_description(&self) -> &str;
}

/// Registry for managing tool creation and registration.
///
/// Factories are kept in registration order; `describe` reflects that order
/// and is stable between calls.
pub struct ToolRegistry {
    factories: Vec<Box<dyn ToolFactory>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool factory; names must be unique
    pub fn register_factory(&mut self, factory: Box<dyn ToolFactory>) -> Result<(), ToolError> {
        let name = factory.tool_name().to_string();
        if self.index.contains_key(&name) {
            return Err(ToolError::DuplicateName { name });
        }
        self.index.insert(name, self.factories.len());
        self.factories.push(factory);
        Ok(())
    }

    /// Create a tool by name
    pub fn create_tool(&self, name: &str) -> Option<Box<dyn Tool>> {
        self.index
            .get(name)
            .map(|&i| self.factories[i].create())
    }

    /// List all available tool names in registration order
    pub fn list_tools(&self) -> Vec<&str> {
        self.factories
            .iter()
            .map(|factory| factory.tool_name())
            .collect()
    }

    /// Describe every registered tool, in registration order
    pub fn describe(&self) -> Vec<ToolDescription> {
        self.factories
            .iter()
            .map(|factory| ToolDescription {
                name: factory.tool_name().to_string(),
                description: factory.tool_description().to_string(),
            })
            .collect()
    }

    /// Create a tool dispatcher with the specified tools.
    ///
    /// Requesting a name the registry does not know is a setup error, not
    /// something to discover at request time.
    pub fn create_dispatcher(&self, tool_names: &[String]) -> Result<ToolDispatcher, ToolError> {
        let mut dispatcher = ToolDispatcher::new();

        for name in tool_names {
            let tool = self
                .create_tool(name)
                .ok_or_else(|| ToolError::NotFound { name: name.clone() })?;
            dispatcher.register_tool(tool)?;
        }

        Ok(dispatcher)
    }

    /// Create a tool dispatcher with all registered tools
    pub fn create_dispatcher_with_all(&self) -> Result<ToolDispatcher, ToolError> {
        let mut dispatcher = ToolDispatcher::new();

        for factory in &self.factories {
            dispatcher.register_tool(factory.create())?;
        }

        Ok(dispatcher)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        let mut registry = Self::new();

        // Registration order is the order tools are presented to the model
        for factory in [
            Box::new(crate::tools::builtin::SearchToolFactory) as Box<dyn ToolFactory>,
            Box::new(crate::tools::builtin::WeatherToolFactory),
            Box::new(crate::tools::builtin::HubStatsToolFactory),
            Box::new(crate::tools::builtin::NewsToolFactory),
        ] {
            registry
                .register_factory(factory)
                .expect("built-in tool names are unique");
        }

        registry
    }
}

/// Macro to help implement tool factories
#[macro_export]
macro_rules! impl_tool_factory {
    ($factory:ident, $tool:ident, $name:expr, $description:expr) => {
        pub struct $factory;

        impl $crate::tools::ToolFactory for $factory {
            fn create(&self) -> Box<dyn $crate::tools::Tool> {
                Box::new($tool::new())
            }

            fn tool_name(&self) -> &str {
                $name
            }

            fn tool_description(&self) -> &str {
                $description
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED_TOOLS: &[&str] = &[
        "web_search",
        "get_weather_info",
        "get_hub_stats",
        "get_latest_news",
    ];

    #[test]
    fn default_registry_has_all_tools_in_order() {
        let registry = ToolRegistry::default();
        assert_eq!(registry.list_tools(), EXPECTED_TOOLS);
    }

    #[test]
    fn describe_is_idempotent_and_ordered() {
        let registry = ToolRegistry::default();

        let first = registry.describe();
        let second = registry.describe();

        assert_eq!(first, second);
        let names: Vec<&str> = first.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, EXPECTED_TOOLS);
        assert!(first.iter().all(|d| !d.description.is_empty()));
    }

    #[test]
    fn duplicate_factory_registration_fails() {
        let mut registry = ToolRegistry::default();
        let result =
            registry.register_factory(Box::new(crate::tools::builtin::WeatherToolFactory));
        assert!(matches!(result, Err(ToolError::DuplicateName { .. })));
    }

    #[test]
    fn tool_creation_round_trips_names_and_schemas() {
        let registry = ToolRegistry::default();

        for tool_name in registry.list_tools() {
            let tool = registry.create_tool(tool_name).unwrap();
            assert_eq!(tool.name(), tool_name);
            assert!(!tool.description().is_empty());

            let schema = tool.parameters_schema();
            assert_eq!(schema["type"], "object");
            assert!(schema["properties"][tool.argument_name()].is_object());
        }
    }

    #[test]
    fn dispatcher_creation_rejects_unknown_names() {
        let registry = ToolRegistry::default();
        let result = registry.create_dispatcher(&["imaginary_tool".to_string()]);
        assert!(matches!(result, Err(ToolError::NotFound { .. })));
    }

    #[test]
    fn dispatcher_creation_with_subset_keeps_request_order() {
        let registry = ToolRegistry::default();
        let dispatcher = registry
            .create_dispatcher(&["get_latest_news".to_string(), "web_search".to_string()])
            .unwrap();
        assert_eq!(dispatcher.list_tools(), vec!["get_latest_news", "web_search"]);
    }
}
