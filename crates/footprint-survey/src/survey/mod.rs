//! Survey schema registry and footprint scoring.
//!
//! Calculators bundle form steps with a name mapper, a value mapper and an arithmetic
//! formula. The registry validates every definition up front, so a request can only
//! fail for reasons tied to its own answers.

pub mod answers;
pub mod calculator;
pub mod evaluation;
pub mod expression;
pub mod forms;
pub mod ordered;
pub mod registry;
pub mod review;
pub mod router;
pub mod schema;
pub mod service;
pub mod visibility;

#[cfg(test)]
mod tests;

pub use answers::{AnswerSet, AnswerValue};
pub use calculator::{Calculator, DefinitionError};
pub use evaluation::{Evaluation, EvaluationError};
pub use expression::{ArithmeticError, Bindings, Expr, ExpressionError};
pub use forms::{standard_definitions, FOOD_CALCULATOR, HOUSEHOLD_CALCULATOR};
pub use ordered::OrderedMap;
pub use registry::{CalculatorRegistry, RegistryError};
pub use review::{AnswerIssue, IssueKind};
pub use router::survey_router;
pub use schema::{
    CalculatorDefinition, ConditionValue, Conditional, FallbackType, FormStep, InputField,
    InputType, NoneFallback, OptionalMarker, SelectOption,
};
pub use service::{
    SubmissionFailure, SubmissionRequest, SubmissionResult, SurveyService, SurveyServiceError,
};
pub use visibility::{is_visible, StepVisibility};
