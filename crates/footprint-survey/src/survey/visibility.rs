use serde::Serialize;

use super::answers::{AnswerSet, AnswerValue};
use super::schema::{ConditionValue, Conditional, InputField};

impl Conditional {
    /// A missing or differently shaped answer never satisfies a conditional.
    pub fn is_satisfied(&self, answers: &AnswerSet) -> bool {
        let Some(answer) = answers.get(self.key()) else {
            return false;
        };

        match self {
            Conditional::Eq { value, .. } => equals(answer, value),
            Conditional::Contains { value, .. } => match answer {
                AnswerValue::Choices(selected) => selected.contains(&value.as_text()),
                _ => false,
            },
        }
    }
}

fn equals(answer: &AnswerValue, value: &ConditionValue) -> bool {
    match (answer, value) {
        (AnswerValue::Number(answer) | AnswerValue::Exact(answer), ConditionValue::Number(value)) => {
            answer == value
        }
        (AnswerValue::Choice(answer), ConditionValue::Text(value)) => answer == value,
        (AnswerValue::Flag(flag), ConditionValue::Text(value)) => value == &flag.to_string(),
        _ => false,
    }
}

/// Whether `field` should be presented given the answers collected so far.
///
/// Recomputed on every call: later answers may flip an earlier field.
pub fn is_visible(field: &InputField, answers: &AnswerSet) -> bool {
    if field
        .skip_when
        .iter()
        .any(|conditional| conditional.is_satisfied(answers))
    {
        return false;
    }

    field.show_when.is_empty()
        || field
            .show_when
            .iter()
            .any(|conditional| conditional.is_satisfied(answers))
}

/// Inputs of one step that are currently presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepVisibility {
    pub title: String,
    pub visible: Vec<String>,
}

impl StepVisibility {
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}
