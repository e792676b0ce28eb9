use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::answers::AnswerSet;
use super::calculator::Calculator;
use super::evaluation::{Evaluation, EvaluationError};
use super::registry::CalculatorRegistry;
use super::review::AnswerIssue;
use super::schema::CalculatorDefinition;
use super::visibility::StepVisibility;

/// Payload accepted at the form submission boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    pub calculator_name: String,
    #[serde(default)]
    pub answers: AnswerSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub result: f64,
}

/// Structured failure returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionFailure {
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurveyServiceError {
    #[error("no calculator registered under '{name}'")]
    NotFound { name: String },
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

impl SurveyServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            SurveyServiceError::NotFound { .. } => "NotFoundError",
            SurveyServiceError::Evaluation(error) => error.kind(),
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            SurveyServiceError::NotFound { .. } => None,
            SurveyServiceError::Evaluation(error) => error.field(),
        }
    }

    pub fn failure(&self) -> SubmissionFailure {
        SubmissionFailure {
            kind: self.kind(),
            field: self.field().map(str::to_string),
            message: self.to_string(),
        }
    }
}

/// Facade over the registry used by the HTTP router and the CLI.
#[derive(Debug, Clone)]
pub struct SurveyService {
    registry: Arc<CalculatorRegistry>,
}

impl SurveyService {
    pub fn new(registry: Arc<CalculatorRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CalculatorRegistry {
        &self.registry
    }

    /// Schema export, in registration order.
    pub fn definitions(&self) -> Vec<&CalculatorDefinition> {
        self.registry.definitions()
    }

    pub fn calculator(&self, name: &str) -> Result<&Calculator, SurveyServiceError> {
        self.registry
            .get(name)
            .map_err(|_| SurveyServiceError::NotFound {
                name: name.to_string(),
            })
    }

    pub fn visibility(
        &self,
        name: &str,
        answers: &AnswerSet,
    ) -> Result<Vec<StepVisibility>, SurveyServiceError> {
        Ok(self.calculator(name)?.visible_inputs(answers))
    }

    pub fn review(
        &self,
        name: &str,
        answers: &AnswerSet,
    ) -> Result<Vec<AnswerIssue>, SurveyServiceError> {
        Ok(self.calculator(name)?.review(answers))
    }

    pub fn evaluate(
        &self,
        name: &str,
        answers: &AnswerSet,
    ) -> Result<Evaluation, SurveyServiceError> {
        let calculator = self.calculator(name)?;
        Ok(calculator.evaluate(answers)?)
    }

    /// Score a submission; failures are logged and returned, never retried.
    pub fn submit(
        &self,
        request: &SubmissionRequest,
    ) -> Result<SubmissionResult, SurveyServiceError> {
        match self.evaluate(&request.calculator_name, &request.answers) {
            Ok(evaluation) => {
                info!(
                    calculator = %request.calculator_name,
                    answers = request.answers.len(),
                    result = evaluation.result,
                    "submission scored"
                );
                Ok(SubmissionResult {
                    result: evaluation.result,
                })
            }
            Err(error) => {
                warn!(
                    calculator = %request.calculator_name,
                    kind = error.kind(),
                    field = error.field(),
                    "submission rejected: {error}"
                );
                Err(error)
            }
        }
    }
}
