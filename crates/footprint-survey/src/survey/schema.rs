use serde::{Deserialize, Serialize};

use super::ordered::OrderedMap;

/// Widget kind declared for an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Checkbox,
    Number,
    Select,
}

impl InputType {
    /// Categorical inputs are the only ones a value mapper may translate.
    pub fn is_categorical(self) -> bool {
        matches!(self, InputType::Checkbox | InputType::Select)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Lets the respondent explicitly skip an input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionalMarker {
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackType {
    Checkbox,
    Number,
}

/// Free-entry escape hatch shown when none of the listed options fit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoneFallback {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FallbackType,
}

/// Literal compared against a collected answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Number(f64),
    Text(String),
}

impl ConditionValue {
    pub fn as_text(&self) -> String {
        match self {
            ConditionValue::Number(value) => value.to_string(),
            ConditionValue::Text(value) => value.clone(),
        }
    }
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for ConditionValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Predicate over another field's answer, used by `skipWhen`/`showWhen`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ConditionalRecord", into = "ConditionalRecord")]
pub enum Conditional {
    Eq { key: String, value: ConditionValue },
    Contains { key: String, value: ConditionValue },
}

impl Conditional {
    pub fn eq(key: impl Into<String>, value: impl Into<ConditionValue>) -> Self {
        Self::Eq {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn contains(key: impl Into<String>, value: impl Into<ConditionValue>) -> Self {
        Self::Contains {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Conditional::Eq { key, .. } | Conditional::Contains { key, .. } => key,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ConditionExpression {
    Eq,
    Contain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConditionalRecord {
    key: String,
    condition_expression: ConditionExpression,
    value: ConditionValue,
}

impl From<ConditionalRecord> for Conditional {
    fn from(record: ConditionalRecord) -> Self {
        match record.condition_expression {
            ConditionExpression::Eq => Conditional::Eq {
                key: record.key,
                value: record.value,
            },
            ConditionExpression::Contain => Conditional::Contains {
                key: record.key,
                value: record.value,
            },
        }
    }
}

impl From<Conditional> for ConditionalRecord {
    fn from(conditional: Conditional) -> Self {
        let (key, condition_expression, value) = match conditional {
            Conditional::Eq { key, value } => (key, ConditionExpression::Eq, value),
            Conditional::Contains { key, value } => (key, ConditionExpression::Contain, value),
        };
        Self {
            key,
            condition_expression,
            value,
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One question of a form step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputField {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: InputType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub multiple_options: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<OptionalMarker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub none_fallback: Option<NoneFallback>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skip_when: Vec<Conditional>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub show_when: Vec<Conditional>,
}

impl InputField {
    fn new(key: &str, kind: InputType, label: &str) -> Self {
        Self {
            key: key.to_string(),
            kind,
            label: label.to_string(),
            description: None,
            min: None,
            max: None,
            options: Vec::new(),
            multiple_options: false,
            optional: None,
            none_fallback: None,
            skip_when: Vec::new(),
            show_when: Vec::new(),
        }
    }

    pub fn number(key: &str, label: &str) -> Self {
        Self::new(key, InputType::Number, label)
    }

    pub fn checkbox(key: &str, label: &str) -> Self {
        Self::new(key, InputType::Checkbox, label)
    }

    pub fn select(key: &str, label: &str, options: Vec<SelectOption>) -> Self {
        let mut field = Self::new(key, InputType::Select, label);
        field.options = options;
        field
    }

    pub fn described(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple_options = true;
        self
    }

    pub fn optional(mut self, label: &str) -> Self {
        self.optional = Some(OptionalMarker {
            label: label.to_string(),
        });
        self
    }

    pub fn none_fallback(mut self, label: &str, kind: FallbackType) -> Self {
        self.none_fallback = Some(NoneFallback {
            label: label.to_string(),
            kind,
        });
        self
    }

    pub fn skip_when(mut self, conditional: Conditional) -> Self {
        self.skip_when.push(conditional);
        self
    }

    pub fn show_when(mut self, conditional: Conditional) -> Self {
        self.show_when.push(conditional);
        self
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|option| option.value == value)
    }

    pub(crate) fn conditionals(&self) -> impl Iterator<Item = &Conditional> {
        self.skip_when.iter().chain(self.show_when.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormStep {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub inputs: Vec<InputField>,
}

impl FormStep {
    pub fn new(title: &str, inputs: Vec<InputField>) -> Self {
        Self {
            title: title.to_string(),
            description: None,
            inputs,
        }
    }

    pub fn described(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Declarative calculator: form steps plus the formula scoring them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorDefinition {
    pub name: String,
    pub expression: String,
    pub name_mapper: OrderedMap<String>,
    #[serde(default)]
    pub value_mapper: OrderedMap<OrderedMap<f64>>,
    pub steps: Vec<FormStep>,
}

impl CalculatorDefinition {
    pub fn fields(&self) -> impl Iterator<Item = &InputField> {
        self.steps.iter().flat_map(|step| step.inputs.iter())
    }
}
