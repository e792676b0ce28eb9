use serde::Serialize;

use super::answers::{AnswerSet, AnswerValue};
use super::calculator::Calculator;
use super::expression::{ArithmeticError, Bindings};
use super::ordered::OrderedMap;

/// Per-submission failures while scoring an answer set.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("answer '{value}' for '{field}' has no coefficient")]
    UnmappedValue { field: String, value: String },
    #[error("answer '{value}' for '{field}' is not a number")]
    TypeConversion { field: String, value: String },
    #[error("expression uses symbol '{symbol}' with no binding")]
    UnboundSymbol { symbol: String },
    #[error("division by zero while evaluating the expression")]
    DivisionByZero,
    #[error("expression '{expression}' produced a non-finite result")]
    NonFinite { expression: String },
}

impl EvaluationError {
    pub fn kind(&self) -> &'static str {
        match self {
            EvaluationError::UnmappedValue { .. } => "UnmappedValueError",
            EvaluationError::TypeConversion { .. } => "TypeConversionError",
            EvaluationError::UnboundSymbol { .. } => "UnboundSymbolError",
            EvaluationError::DivisionByZero => "DivisionByZeroError",
            EvaluationError::NonFinite { .. } => "NonFiniteResultError",
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            EvaluationError::UnmappedValue { field, .. }
            | EvaluationError::TypeConversion { field, .. } => Some(field.as_str()),
            EvaluationError::UnboundSymbol { .. }
            | EvaluationError::DivisionByZero
            | EvaluationError::NonFinite { .. } => None,
        }
    }
}

impl From<ArithmeticError> for EvaluationError {
    fn from(error: ArithmeticError) -> Self {
        match error {
            ArithmeticError::UnboundSymbol(symbol) => EvaluationError::UnboundSymbol { symbol },
            ArithmeticError::DivisionByZero => EvaluationError::DivisionByZero,
        }
    }
}

/// Score for one answer set along with the symbol values that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub calculator: String,
    pub result: f64,
    pub bindings: Bindings,
}

impl Calculator {
    /// Bind every mapped symbol. Unanswered or hidden inputs bind to zero.
    pub fn bind(&self, answers: &AnswerSet) -> Result<Bindings, EvaluationError> {
        let definition = self.definition();
        let mut bindings = Bindings::new();

        for (key, symbol) in definition.name_mapper.iter() {
            let value = match answers.get(key) {
                Some(answer) if self.is_visible(key, answers) => {
                    resolve(key, answer, definition.value_mapper.get(key))?
                }
                _ => 0.0,
            };
            bindings.insert(symbol.clone(), value);
        }

        Ok(bindings)
    }

    pub fn evaluate(&self, answers: &AnswerSet) -> Result<Evaluation, EvaluationError> {
        let bindings = self.bind(answers)?;
        let result = self.expression().evaluate(&bindings)?;
        if !result.is_finite() {
            return Err(EvaluationError::NonFinite {
                expression: self.definition().expression.clone(),
            });
        }

        Ok(Evaluation {
            calculator: self.name().to_string(),
            result,
            bindings,
        })
    }
}

fn resolve(
    key: &str,
    answer: &AnswerValue,
    coefficients: Option<&OrderedMap<f64>>,
) -> Result<f64, EvaluationError> {
    let Some(coefficients) = coefficients else {
        return answer
            .as_number()
            .ok_or_else(|| EvaluationError::TypeConversion {
                field: key.to_string(),
                value: answer.describe(),
            });
    };

    let lookup = |value: &str| {
        coefficients
            .get(value)
            .copied()
            .ok_or_else(|| EvaluationError::UnmappedValue {
                field: key.to_string(),
                value: value.to_string(),
            })
    };

    match answer {
        AnswerValue::Exact(value) => Ok(*value),
        AnswerValue::Choice(value) => lookup(value.as_str()),
        AnswerValue::Choices(values) => values.iter().try_fold(0.0, |total, value| {
            lookup(value.as_str()).map(|coefficient| total + coefficient)
        }),
        AnswerValue::Flag(flag) => lookup(flag.to_string().as_str()),
        AnswerValue::Number(value) => lookup(value.to_string().as_str()),
    }
}
