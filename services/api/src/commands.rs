use crate::infra::{read_answers, survey_service};
use clap::Args;
use footprint_survey::config::AppConfig;
use footprint_survey::error::AppError;
use footprint_survey::survey::{Calculator, Evaluation};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ShowArgs {
    /// Calculator name (e.g. form1)
    pub(crate) calculator: String,
}

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Calculator name (e.g. form1)
    pub(crate) calculator: String,
    /// JSON file mapping input keys to answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Print every symbol binding alongside the result
    #[arg(long)]
    pub(crate) bindings: bool,
}

pub(crate) fn run_list() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = survey_service(&config.registry)?;

    println!("Registered calculators");
    for calculator in service.registry().list() {
        println!("  {}", describe(calculator));
    }
    Ok(())
}

pub(crate) fn run_show(args: ShowArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = survey_service(&config.registry)?;
    let calculator = service.calculator(&args.calculator)?;

    println!("{}", serde_json::to_string_pretty(calculator.definition())?);
    Ok(())
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        calculator,
        answers,
        bindings,
    } = args;

    let config = AppConfig::load()?;
    let service = survey_service(&config.registry)?;
    let answers = read_answers(&answers)?;

    let evaluation = service.evaluate(&calculator, &answers)?;
    render_evaluation(&evaluation, bindings);
    Ok(())
}

fn describe(calculator: &Calculator) -> String {
    let definition = calculator.definition();
    let inputs = definition.fields().count();
    format!(
        "{:<8} {} step(s), {} input(s), {} symbol(s): {}",
        definition.name,
        definition.steps.len(),
        inputs,
        definition.name_mapper.len(),
        definition.expression
    )
}

fn render_evaluation(evaluation: &Evaluation, show_bindings: bool) {
    println!("Calculator: {}", evaluation.calculator);
    println!("Result: {}", evaluation.result);
    if show_bindings {
        println!("Bindings:");
        for (symbol, value) in &evaluation.bindings {
            println!("  {symbol:<6} = {value}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use footprint_survey::survey::CalculatorRegistry;

    #[test]
    fn describe_summarizes_the_household_form() {
        let registry = CalculatorRegistry::standard().expect("standard registry builds");
        let calculator = registry.get("form1").expect("form1 registered");

        let line = describe(calculator);
        assert!(line.starts_with("form1"));
        assert!(line.contains("9 step(s)"));
        assert!(line.contains("8 symbol(s)"));
    }
}
