use std::collections::{BTreeMap, HashMap};

use super::answers::AnswerSet;
use super::expression::{Expr, ExpressionError};
use super::schema::{CalculatorDefinition, InputField};
use super::visibility::{is_visible, StepVisibility};

/// Problems that make a calculator definition unusable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DefinitionError {
    #[error("calculator name is empty")]
    EmptyName,
    #[error("input key '{key}' is declared more than once")]
    DuplicateField { key: String },
    #[error("name mapper references unknown input '{key}'")]
    UnknownNameMapperKey { key: String },
    #[error("symbol '{symbol}' is mapped from both '{first}' and '{second}'")]
    DuplicateSymbol {
        symbol: String,
        first: String,
        second: String,
    },
    #[error("value mapper references unknown input '{key}'")]
    UnknownValueMapperKey { key: String },
    #[error("value mapper entry '{key}' targets a numeric input")]
    ValueMapperOnNumericField { key: String },
    #[error("input '{field}' has a conditional on unknown input '{key}'")]
    UnknownConditionalKey { field: String, key: String },
    #[error("expression does not parse: {source}")]
    InvalidExpression {
        #[from]
        source: ExpressionError,
    },
    #[error("expression uses symbol '{symbol}' that no input maps to")]
    UnboundSymbol { symbol: String },
}

/// A validated calculator with its formula parsed once.
#[derive(Debug, Clone)]
pub struct Calculator {
    definition: CalculatorDefinition,
    expression: Expr,
    fields: HashMap<String, (usize, usize)>,
}

impl Calculator {
    pub fn new(definition: CalculatorDefinition) -> Result<Self, DefinitionError> {
        if definition.name.trim().is_empty() {
            return Err(DefinitionError::EmptyName);
        }

        let mut fields = HashMap::new();
        for (step_index, step) in definition.steps.iter().enumerate() {
            for (input_index, input) in step.inputs.iter().enumerate() {
                if fields
                    .insert(input.key.clone(), (step_index, input_index))
                    .is_some()
                {
                    return Err(DefinitionError::DuplicateField {
                        key: input.key.clone(),
                    });
                }
            }
        }

        let mut owners: BTreeMap<&str, &str> = BTreeMap::new();
        for (key, symbol) in definition.name_mapper.iter() {
            if !fields.contains_key(key) {
                return Err(DefinitionError::UnknownNameMapperKey { key: key.clone() });
            }
            if let Some(first) = owners.insert(symbol.as_str(), key.as_str()) {
                return Err(DefinitionError::DuplicateSymbol {
                    symbol: symbol.clone(),
                    first: first.to_string(),
                    second: key.clone(),
                });
            }
        }

        for key in definition.value_mapper.keys() {
            let Some(&(step, input)) = fields.get(key) else {
                return Err(DefinitionError::UnknownValueMapperKey { key: key.clone() });
            };
            if !definition.steps[step].inputs[input].kind.is_categorical() {
                return Err(DefinitionError::ValueMapperOnNumericField { key: key.clone() });
            }
        }

        for field in definition.fields() {
            if let Some(conditional) = field
                .conditionals()
                .find(|conditional| !fields.contains_key(conditional.key()))
            {
                return Err(DefinitionError::UnknownConditionalKey {
                    field: field.key.clone(),
                    key: conditional.key().to_string(),
                });
            }
        }

        let expression = Expr::parse(&definition.expression)?;
        if let Some(symbol) = expression
            .symbols()
            .into_iter()
            .find(|symbol| !owners.contains_key(symbol))
        {
            return Err(DefinitionError::UnboundSymbol {
                symbol: symbol.to_string(),
            });
        }

        Ok(Self {
            definition,
            expression,
            fields,
        })
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn definition(&self) -> &CalculatorDefinition {
        &self.definition
    }

    pub fn expression(&self) -> &Expr {
        &self.expression
    }

    pub fn field(&self, key: &str) -> Option<&InputField> {
        let &(step, input) = self.fields.get(key)?;
        Some(&self.definition.steps[step].inputs[input])
    }

    /// Unknown keys are never visible.
    pub fn is_visible(&self, key: &str, answers: &AnswerSet) -> bool {
        self.field(key)
            .map(|field| is_visible(field, answers))
            .unwrap_or(false)
    }

    /// Visible input keys for every step, in declaration order.
    pub fn visible_inputs(&self, answers: &AnswerSet) -> Vec<StepVisibility> {
        self.definition
            .steps
            .iter()
            .map(|step| StepVisibility {
                title: step.title.clone(),
                visible: step
                    .inputs
                    .iter()
                    .filter(|input| is_visible(input, answers))
                    .map(|input| input.key.clone())
                    .collect(),
            })
            .collect()
    }
}
