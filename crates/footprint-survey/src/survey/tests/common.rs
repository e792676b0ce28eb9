use std::sync::Arc;

use axum::body::to_bytes;
use axum::response::Response;
use serde_json::Value;

use crate::survey::answers::{AnswerSet, AnswerValue};
use crate::survey::calculator::Calculator;
use crate::survey::forms::{food_definition, household_definition};
use crate::survey::ordered::OrderedMap;
use crate::survey::registry::CalculatorRegistry;
use crate::survey::schema::{CalculatorDefinition, FormStep, InputField, SelectOption};
use crate::survey::service::SurveyService;

pub(super) fn household() -> Calculator {
    Calculator::new(household_definition()).expect("household form is valid")
}

pub(super) fn food() -> Calculator {
    Calculator::new(food_definition()).expect("food form is valid")
}

pub(super) fn service() -> Arc<SurveyService> {
    let registry = CalculatorRegistry::standard().expect("standard registry builds");
    Arc::new(SurveyService::new(Arc::new(registry)))
}

/// Answers from the documented household walkthrough.
pub(super) fn household_answers() -> AnswerSet {
    AnswerSet::new()
        .with("peopleNumber", 2.0)
        .with("gasType", "glp")
        .with("gasValue", "pouco")
        .with("transportType", AnswerValue::choices(["car"]))
        .with("fuelGasolineValue", 100.0)
        .with("fuelEthanolValue", 0.0)
        .with("fuelDieselValue", 0.0)
        .with("fuelCNGValue", 0.0)
}

/// Minimal definition that tests can bend into broken shapes.
pub(super) fn tiny_definition() -> CalculatorDefinition {
    let mut name_mapper = OrderedMap::new();
    name_mapper.insert("amount".to_string(), "A".to_string());
    name_mapper.insert("weight".to_string(), "W".to_string());

    let mut weights = OrderedMap::new();
    weights.insert("light".to_string(), 0.5);
    weights.insert("heavy".to_string(), 2.0);
    let mut value_mapper = OrderedMap::new();
    value_mapper.insert("weight".to_string(), weights);

    CalculatorDefinition {
        name: "tiny".to_string(),
        expression: "A * W".to_string(),
        name_mapper,
        value_mapper,
        steps: vec![FormStep::new(
            "Only",
            vec![
                InputField::number("amount", "Amount").min(0.0).max(100.0),
                InputField::select(
                    "weight",
                    "Weight",
                    vec![
                        SelectOption::new("light", "Light"),
                        SelectOption::new("heavy", "Heavy"),
                    ],
                ),
            ],
        )],
    }
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is json")
}
