//! Operator registry for building expressions from configuration.

use crate::config::{Parameters, PipelineConfig};
use crate::core::error::{ConfigError, ConfigResult, OpchainResult};
use crate::core::operator::Operator;
use crate::expression::Expression;
use indexmap::IndexMap;
use std::sync::Arc;

/// Factory function for creating configured operator instances.
pub type OperatorFactory =
    Arc<dyn Fn(&Parameters) -> ConfigResult<Box<dyn Operator>> + Send + Sync>;

/// Descriptive information about a registered operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorMetadata {
    /// Unique id used in pipeline configs (e.g., "box_blur").
    pub id: String,
    /// One-line description.
    pub description: String,
    /// Accepted parameters as `(name, description)`.
    pub parameters: Vec<(String, String)>,
}

impl OperatorMetadata {
    /// Create a new metadata builder.
    pub fn builder(id: impl Into<String>) -> OperatorMetadataBuilder {
        OperatorMetadataBuilder {
            metadata: OperatorMetadata {
                id: id.into(),
                description: String::new(),
                parameters: Vec::new(),
            },
        }
    }
}

/// Builder for [`OperatorMetadata`].
#[derive(Debug, Clone)]
pub struct OperatorMetadataBuilder {
    metadata: OperatorMetadata,
}

impl OperatorMetadataBuilder {
    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = description.into();
        self
    }

    /// Document an accepted parameter.
    pub fn parameter(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.metadata
            .parameters
            .push((name.into(), description.into()));
        self
    }

    /// Build the metadata.
    pub fn build(self) -> OperatorMetadata {
        self.metadata
    }
}

/// Registry entry containing metadata and factory.
#[derive(Clone)]
pub struct RegistryEntry {
    /// Factory function to create instances.
    pub factory: OperatorFactory,
    /// Operator metadata.
    pub metadata: OperatorMetadata,
}

/// Registry of operator factories, keyed by id in registration order.
pub struct OperatorRegistry {
    operators: IndexMap<String, RegistryEntry>,
}

impl OperatorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            operators: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with built-in operators.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::filters::builtin::register_all(&mut registry);
        registry
    }

    /// Register an operator factory. An existing id is replaced.
    pub fn register<F>(&mut self, metadata: OperatorMetadata, factory: F)
    where
        F: Fn(&Parameters) -> ConfigResult<Box<dyn Operator>> + Send + Sync + 'static,
    {
        let id = metadata.id.clone();
        let entry = RegistryEntry {
            factory: Arc::new(factory),
            metadata,
        };
        if self.operators.insert(id.clone(), entry).is_some() {
            log::warn!("Operator '{}' registered twice; keeping the newer factory", id);
        }
    }

    /// Create a configured operator by id.
    pub fn create(&self, id: &str, params: &Parameters) -> ConfigResult<Box<dyn Operator>> {
        let entry = self
            .operators
            .get(id)
            .ok_or_else(|| ConfigError::UnknownOperator(id.to_string()))?;
        (entry.factory)(params)
    }

    /// Get metadata for an operator without creating an instance.
    pub fn get_metadata(&self, id: &str) -> Option<&OperatorMetadata> {
        self.operators.get(id).map(|e| &e.metadata)
    }

    /// Check if an operator is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.operators.contains_key(id)
    }

    /// Get all registered operator ids.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.operators.keys().map(|s| s.as_str())
    }

    /// Iterate over all entries' metadata.
    pub fn metadata(&self) -> impl Iterator<Item = &OperatorMetadata> {
        self.operators.values().map(|e| &e.metadata)
    }

    /// Get the total number of registered operators.
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Build an expression from a pipeline config.
    ///
    /// The first listed step is applied first.
    pub fn build(&self, config: &PipelineConfig) -> OpchainResult<Expression> {
        let mut steps = config.steps.iter();
        let first = steps.next().ok_or(ConfigError::EmptyPipeline)?;

        let mut expression = Expression::from_node(self.create(&first.operator, &first.params)?);
        for step in steps {
            expression.push_back(self.create(&step.operator, &step.params)?);
        }

        log::debug!(
            "Built pipeline '{}' with {} operators",
            config.name.as_deref().unwrap_or("unnamed"),
            expression.len()
        );
        Ok(expression)
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
