use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::{debug, info};

use super::calculator::{Calculator, DefinitionError};
use super::forms::standard_definitions;
use super::schema::CalculatorDefinition;
use crate::config::RegistryConfig;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("no calculator registered under '{name}'")]
    NotFound { name: String },
    #[error("calculator '{name}' is registered more than once")]
    Duplicate { name: String },
    #[error("calculator '{name}' is invalid: {source}")]
    Definition {
        name: String,
        #[source]
        source: DefinitionError,
    },
    #[error("failed to read calculator definitions: {0}")]
    Io(#[from] std::io::Error),
    #[error("calculator definitions are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read-only set of calculators, looked up by name.
#[derive(Debug, Clone, Default)]
pub struct CalculatorRegistry {
    calculators: Vec<Calculator>,
    index: HashMap<String, usize>,
}

impl CalculatorRegistry {
    /// Validate and register definitions, keeping their order.
    pub fn new(
        definitions: impl IntoIterator<Item = CalculatorDefinition>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::default();

        for definition in definitions {
            let name = definition.name.clone();
            if registry.index.contains_key(&name) {
                return Err(RegistryError::Duplicate { name });
            }

            let calculator = Calculator::new(definition).map_err(|source| {
                RegistryError::Definition {
                    name: name.clone(),
                    source,
                }
            })?;

            debug!(calculator = %name, "registered calculator");
            registry.index.insert(name, registry.calculators.len());
            registry.calculators.push(calculator);
        }

        Ok(registry)
    }

    /// Built-in calculators only.
    pub fn standard() -> Result<Self, RegistryError> {
        Self::new(standard_definitions())
    }

    /// Built-in calculators followed by any configured extras.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let mut definitions = standard_definitions();
        if let Some(path) = &config.calculators_path {
            let extra = Self::definitions_from_path(path)?;
            info!(path = %path.display(), count = extra.len(), "loaded calculator definitions");
            definitions.extend(extra);
        }

        let registry = Self::new(definitions)?;
        info!(calculators = registry.len(), "calculator registry ready");
        Ok(registry)
    }

    /// Parse a JSON array of calculator definitions.
    pub fn definitions_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<CalculatorDefinition>, RegistryError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn definitions_from_path(
        path: impl AsRef<Path>,
    ) -> Result<Vec<CalculatorDefinition>, RegistryError> {
        let file = File::open(path.as_ref())?;
        Self::definitions_from_reader(BufReader::new(file))
    }

    pub fn get(&self, name: &str) -> Result<&Calculator, RegistryError> {
        self.index
            .get(name)
            .map(|&position| &self.calculators[position])
            .ok_or_else(|| RegistryError::NotFound {
                name: name.to_string(),
            })
    }

    /// Calculators in registration order.
    pub fn list(&self) -> &[Calculator] {
        &self.calculators
    }

    pub fn definitions(&self) -> Vec<&CalculatorDefinition> {
        self.calculators
            .iter()
            .map(Calculator::definition)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.calculators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calculators.is_empty()
    }
}
