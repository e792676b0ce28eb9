use serde::Serialize;

use super::answers::{AnswerSet, AnswerValue};
use super::calculator::Calculator;
use super::schema::{FallbackType, InputField, InputType};
use super::visibility::is_visible;

/// Advisory problem found in an answer before submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerIssue {
    pub field: String,
    #[serde(flatten)]
    pub problem: IssueKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum IssueKind {
    UnknownField,
    OutOfRange {
        value: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    UnknownOption { value: String },
    MultipleNotAllowed,
    UnexpectedFallback,
    WrongShape { expected: &'static str },
}

impl Calculator {
    /// Check visible answers against declared bounds and options.
    ///
    /// Hidden answers are ignored, matching how they are scored.
    pub fn review(&self, answers: &AnswerSet) -> Vec<AnswerIssue> {
        let mut issues = Vec::new();

        for (key, answer) in answers.iter() {
            let Some(field) = self.field(key) else {
                issues.push(AnswerIssue {
                    field: key.to_string(),
                    problem: IssueKind::UnknownField,
                });
                continue;
            };

            if !is_visible(field, answers) {
                continue;
            }

            issues.extend(
                check(field, answer)
                    .into_iter()
                    .map(|problem| AnswerIssue {
                        field: key.to_string(),
                        problem,
                    }),
            );
        }

        issues
    }
}

fn check(field: &InputField, answer: &AnswerValue) -> Vec<IssueKind> {
    match (field.kind, answer) {
        (_, AnswerValue::Exact(value)) => match &field.none_fallback {
            Some(fallback) if fallback.kind == FallbackType::Number => {
                check_range(field, *value).into_iter().collect()
            }
            _ => vec![IssueKind::UnexpectedFallback],
        },
        (InputType::Number, AnswerValue::Number(value)) => {
            check_range(field, *value).into_iter().collect()
        }
        (InputType::Number, _) => vec![IssueKind::WrongShape { expected: "number" }],
        (InputType::Checkbox, AnswerValue::Flag(_)) => Vec::new(),
        (InputType::Checkbox, _) => vec![IssueKind::WrongShape {
            expected: "boolean",
        }],
        (InputType::Select, AnswerValue::Choice(value)) => unknown_option(field, value)
            .into_iter()
            .collect(),
        (InputType::Select, AnswerValue::Choices(values)) => {
            let mut problems = Vec::new();
            if !field.multiple_options {
                problems.push(IssueKind::MultipleNotAllowed);
            }
            problems.extend(values.iter().filter_map(|value| unknown_option(field, value)));
            problems
        }
        (InputType::Select, AnswerValue::Flag(_))
            if field
                .none_fallback
                .as_ref()
                .is_some_and(|fallback| fallback.kind == FallbackType::Checkbox) =>
        {
            Vec::new()
        }
        (InputType::Select, _) => vec![IssueKind::WrongShape {
            expected: "option value",
        }],
    }
}

fn check_range(field: &InputField, value: f64) -> Option<IssueKind> {
    let below = field.min.map(|min| value < min).unwrap_or(false);
    let above = field.max.map(|max| value > max).unwrap_or(false);
    (below || above).then_some(IssueKind::OutOfRange {
        value,
        min: field.min,
        max: field.max,
    })
}

fn unknown_option(field: &InputField, value: &str) -> Option<IssueKind> {
    (!field.options.is_empty() && !field.has_option(value)).then(|| IssueKind::UnknownOption {
        value: value.to_string(),
    })
}
