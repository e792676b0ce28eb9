use super::common::*;
use crate::survey::calculator::{Calculator, DefinitionError};
use crate::survey::expression::ExpressionError;
use crate::survey::forms::standard_definitions;
use crate::survey::schema::{Conditional, InputField};

#[test]
fn built_in_name_mappers_reference_declared_inputs() {
    for definition in standard_definitions() {
        let keys: Vec<&str> = definition.fields().map(|field| field.key.as_str()).collect();
        for key in definition.name_mapper.keys() {
            assert!(
                keys.contains(&key.as_str()),
                "{} maps undeclared input {key}",
                definition.name
            );
        }
    }
}

#[test]
fn built_in_expressions_only_use_mapped_symbols() {
    for definition in standard_definitions() {
        let name = definition.name.clone();
        let mapped: Vec<String> = definition.name_mapper.values().cloned().collect();
        let calculator = Calculator::new(definition).expect("built-in form is valid");
        for symbol in calculator.expression().symbols() {
            assert!(
                mapped.iter().any(|candidate| candidate == symbol),
                "{name} uses unmapped symbol {symbol}"
            );
        }
    }
}

#[test]
fn rejects_name_mapper_key_without_input() {
    let mut definition = tiny_definition();
    definition
        .name_mapper
        .insert("missing".to_string(), "M".to_string());

    assert_eq!(
        Calculator::new(definition).err(),
        Some(DefinitionError::UnknownNameMapperKey {
            key: "missing".to_string()
        })
    );
}

#[test]
fn rejects_expression_symbol_without_mapping() {
    let mut definition = tiny_definition();
    definition.expression = "A * W + Z".to_string();

    assert_eq!(
        Calculator::new(definition).err(),
        Some(DefinitionError::UnboundSymbol {
            symbol: "Z".to_string()
        })
    );
}

#[test]
fn rejects_unparseable_expression() {
    let mut definition = tiny_definition();
    definition.expression = "A * (W".to_string();

    assert!(matches!(
        Calculator::new(definition),
        Err(DefinitionError::InvalidExpression {
            source: ExpressionError::UnexpectedEnd { .. }
        })
    ));
}

#[test]
fn rejects_value_mapper_on_numeric_input() {
    let mut definition = tiny_definition();
    definition
        .value_mapper
        .insert("amount".to_string(), Default::default());

    assert_eq!(
        Calculator::new(definition).err(),
        Some(DefinitionError::ValueMapperOnNumericField {
            key: "amount".to_string()
        })
    );
}

#[test]
fn rejects_value_mapper_for_unknown_input() {
    let mut definition = tiny_definition();
    definition
        .value_mapper
        .insert("ghost".to_string(), Default::default());

    assert_eq!(
        Calculator::new(definition).err(),
        Some(DefinitionError::UnknownValueMapperKey {
            key: "ghost".to_string()
        })
    );
}

#[test]
fn rejects_conditional_on_unknown_input() {
    let mut definition = tiny_definition();
    let input = definition.steps[0].inputs.remove(0);
    definition.steps[0]
        .inputs
        .insert(0, input.show_when(Conditional::eq("ghost", "yes")));

    assert_eq!(
        Calculator::new(definition).err(),
        Some(DefinitionError::UnknownConditionalKey {
            field: "amount".to_string(),
            key: "ghost".to_string(),
        })
    );
}

#[test]
fn rejects_duplicate_input_keys() {
    let mut definition = tiny_definition();
    definition.steps[0]
        .inputs
        .push(InputField::number("amount", "Amount again"));

    assert_eq!(
        Calculator::new(definition).err(),
        Some(DefinitionError::DuplicateField {
            key: "amount".to_string()
        })
    );
}

#[test]
fn rejects_two_inputs_sharing_a_symbol() {
    let mut definition = tiny_definition();
    definition
        .name_mapper
        .insert("weight".to_string(), "A".to_string());

    assert!(matches!(
        Calculator::new(definition),
        Err(DefinitionError::DuplicateSymbol { symbol, .. }) if symbol == "A"
    ));
}

#[test]
fn rejects_blank_name() {
    let mut definition = tiny_definition();
    definition.name = "  ".to_string();

    assert_eq!(
        Calculator::new(definition).err(),
        Some(DefinitionError::EmptyName)
    );
}

#[test]
fn constant_expressions_need_no_mapping() {
    let mut definition = tiny_definition();
    definition.name_mapper.clear();
    definition.value_mapper.clear();
    definition.expression = "12 / 4".to_string();

    let calculator = Calculator::new(definition).expect("constant formula is valid");
    let evaluation = calculator
        .evaluate(&Default::default())
        .expect("constant evaluates");
    assert_close(evaluation.result, 3.0);
}

#[test]
fn visible_inputs_follow_household_answers() {
    let calculator = household();
    let answers = household_answers();

    let steps = calculator.visible_inputs(&answers);
    assert_eq!(steps.len(), calculator.definition().steps.len());

    let transport = steps
        .iter()
        .find(|step| step.title == "Transporte individual")
        .expect("transport step present");
    assert_eq!(
        transport.visible,
        vec![
            "transportType",
            "fuelGasolineValue",
            "fuelEthanolValue",
            "fuelDieselValue",
            "fuelCNGValue",
        ]
    );

    let walking = answers.with(
        "transportType",
        crate::survey::answers::AnswerValue::choices(["walk"]),
    );
    let steps = calculator.visible_inputs(&walking);
    let transport = steps
        .iter()
        .find(|step| step.title == "Transporte individual")
        .expect("transport step present");
    assert_eq!(transport.visible, vec!["transportType"]);
}

#[test]
fn rejects_runaway_operator_chain() {
    let mut definition = tiny_definition();
    definition.expression = vec!["A"; 200_000].join(" + ");

    assert_eq!(
        Calculator::new(definition).err(),
        Some(DefinitionError::InvalidExpression {
            source: ExpressionError::TooDeep
        })
    );
}
