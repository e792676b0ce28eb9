use super::ordered::OrderedMap;

use super::schema::{
    CalculatorDefinition, Conditional, FallbackType, FormStep, InputField, SelectOption,
};

pub const HOUSEHOLD_CALCULATOR: &str = "form1";
pub const FOOD_CALCULATOR: &str = "form2";

/// Calculators shipped with the service, in registration order.
pub fn standard_definitions() -> Vec<CalculatorDefinition> {
    vec![household_definition(), food_definition()]
}

fn options(pairs: &[(&str, &str)]) -> Vec<SelectOption> {
    pairs
        .iter()
        .map(|(value, label)| SelectOption::new(*value, *label))
        .collect()
}

fn symbols(pairs: &[(&str, &str)]) -> OrderedMap<String> {
    pairs
        .iter()
        .map(|(key, symbol)| (key.to_string(), symbol.to_string()))
        .collect()
}

fn coefficients(pairs: &[(&str, f64)]) -> OrderedMap<f64> {
    pairs
        .iter()
        .map(|(value, coefficient)| (value.to_string(), *coefficient))
        .collect()
}

fn people_number() -> InputField {
    InputField::number(
        "peopleNumber",
        "Há quantas pessoas (incluindo você) morando em sua residência?",
    )
    .min(1.0)
    .max(10.0)
}

fn daily_calories() -> InputField {
    InputField::select(
        "dailyCaloriesValue",
        "Em média, quanto você come por dia?",
        options(&[
            ("pouco", "Eu como pouco (~1051 kcal)"),
            ("moderadamente", "Moderadamente (~1577 kcal)"),
            ("bastante", "Bastante (~2365 kcal)"),
            ("muito", "Muito!!! (~3154 kcal)"),
        ]),
    )
    .none_fallback("Sabe quantas calorias (kcal)?", FallbackType::Number)
}

fn food_habits() -> InputField {
    InputField::select(
        "foodHabitsType",
        "Como você classificaria sua dieta?",
        options(&[
            ("highly-meat", "Alto consumo de carnes"),
            ("some-meat", "Consumo de carnes mediano"),
            ("few-meat", "Flexitariana (carne no máx 3x por semana)"),
            ("fish-veg", "Pesco-vegetariana"),
            ("egg-veg", "Ovo-lacto-vegetariana"),
            ("veg", "Vegetariana estrita/vegana"),
        ]),
    )
}

fn fuel_input(key: &str, label: &str) -> InputField {
    InputField::number(key, label)
        .min(0.0)
        .show_when(Conditional::contains("transportType", "car"))
}

/// Household footprint: housing, gas and individual transport.
pub fn household_definition() -> CalculatorDefinition {
    let steps = vec![
        FormStep::new("Moradia", vec![people_number()]),
        FormStep::new(
            "Gás",
            vec![
                InputField::select(
                    "gasType",
                    "Na sua residência, utiliza-se botijão (GLP) ou Gás encanado?",
                    options(&[
                        ("glp", "Botijão (GLP)"),
                        ("encanado", "Gás encanado"),
                        ("semgas", "Nenhum"),
                    ]),
                ),
                InputField::select(
                    "gasValue",
                    "Em média, quanto você gasta com gás por mês?",
                    options(&[
                        ("nada", "Nada (R$0,00)"),
                        ("muito_pouco", "Muito pouco (R$ 21,00)"),
                        ("pouco", "Pouco (R$ 35,00)"),
                        ("moderadamente", "Moderadamente (R$ 63,00)"),
                        ("bastante", "Bastante (R$ 137,00)"),
                    ]),
                )
                .skip_when(Conditional::eq("gasType", "semgas"))
                .none_fallback("Sabe o valor exato?", FallbackType::Number),
            ],
        ),
        FormStep::new(
            "Transporte individual",
            vec![
                InputField::select(
                    "transportType",
                    "Quais meios de transporte você costuma utilizar no seu dia a dia?",
                    options(&[
                        ("car", "Carro"),
                        ("bike", "Bicicleta"),
                        ("motorcycle", "Motocicleta"),
                        ("walk", "Ando a pé"),
                    ]),
                )
                .multiple(),
                fuel_input(
                    "fuelGasolineValue",
                    "Em média, quanto você gasta com gasolina por mês?",
                ),
                fuel_input(
                    "fuelEthanolValue",
                    "Em média, quanto você gasta com etanol por mês?",
                ),
                fuel_input(
                    "fuelDieselValue",
                    "Em média, quanto você gasta com diesel por mês?",
                ),
                fuel_input("fuelCNGValue", "Em média, quanto você gasta com GNV por mês?"),
            ],
        ),
        FormStep::new(
            "Transporte público",
            vec![InputField::select(
                "publicTransportType",
                "Quais meios de transporte público você utiliza?",
                options(&[("subway", "Metrô/Trem"), ("bus", "Ônibus")]),
            )
            .multiple()
            .optional("Não utilizo transporte público ou nenhuma das opções acima")],
        ),
        FormStep::new(
            "Transporte Aéreo",
            vec![
                InputField::number(
                    "shortFlightTransportValue",
                    "Quantos vôos de até três horas você realizou no ano de 2022?",
                )
                .min(0.0),
                InputField::number(
                    "longFlightTransportValue",
                    "Quantos vôos com mais de três horas você realizou no ano de 2022?",
                )
                .min(0.0),
            ],
        ),
        FormStep::new("Hábitos alimentares", vec![daily_calories()]),
        FormStep::new("Hábitos alimentares", vec![food_habits()]),
        FormStep::new(
            "Hábitos de consumo",
            vec![
                InputField::number(
                    "clothConsumption1",
                    "Ternos, jaquetas, vestidos, casacos e camisas",
                )
                .min(0.0),
                InputField::number(
                    "clothConsumption2",
                    "Meias, luvas, roupas de banho, roupas íntimas, pijamas, lenços, gravatas e cachecóis",
                )
                .min(0.0),
                InputField::number(
                    "clothConsumption3",
                    "Camisetas, calças, shorts, saias e roupas de treino",
                )
                .min(0.0),
            ],
        )
        .described("Quantas peças de roupa você comprou em 2022, em cada uma das categorias abaixo?"),
        FormStep::new(
            "Hábitos de consumo",
            vec![
                InputField::number("eletronicConsumption1", "Tablets, homedots e echodots")
                    .min(0.0),
                InputField::number("eletronicConsumption2", "Notebooks").min(0.0),
                InputField::number(
                    "eletronicConsumption3",
                    "Computadores desktop, monitores e TV´s",
                )
                .min(0.0),
            ],
        )
        .described(
            "Quantos gadgets/eletrônicos você comprou em 2022, em cada uma das categorias abaixo?",
        ),
    ];

    let mut value_mapper = OrderedMap::new();
    value_mapper.insert(
        "gasType".to_string(),
        coefficients(&[("glp", 1.2), ("encanado", 1.5), ("semgas", 0.0)]),
    );
    value_mapper.insert(
        "gasValue".to_string(),
        coefficients(&[
            ("nada", 0.0),
            ("muito_pouco", 21.0),
            ("pouco", 35.0),
            ("moderadamente", 63.0),
            ("bastante", 137.0),
        ]),
    );
    value_mapper.insert(
        "transportType".to_string(),
        coefficients(&[("car", 1.8), ("bike", 1.7)]),
    );

    CalculatorDefinition {
        name: HOUSEHOLD_CALCULATOR.to_string(),
        expression: "(P * 5) + (GV * GF) + ((F_G + F_E + F_D + F_CNG) * FF)".to_string(),
        name_mapper: symbols(&[
            ("peopleNumber", "P"),
            ("gasValue", "GV"),
            ("gasType", "GF"),
            ("fuelGasolineValue", "F_G"),
            ("fuelEthanolValue", "F_E"),
            ("fuelDieselValue", "F_D"),
            ("fuelCNGValue", "F_CNG"),
            ("transportType", "FF"),
        ]),
        value_mapper,
        steps,
    }
}

/// Food footprint: household size, daily intake and diet.
pub fn food_definition() -> CalculatorDefinition {
    let steps = vec![
        FormStep::new("Moradia", vec![people_number()]),
        FormStep::new("Hábitos alimentares", vec![daily_calories(), food_habits()]),
    ];

    let mut value_mapper = OrderedMap::new();
    value_mapper.insert(
        "dailyCaloriesValue".to_string(),
        coefficients(&[
            ("pouco", 1051.0),
            ("moderadamente", 1577.0),
            ("bastante", 2365.0),
            ("muito", 3154.0),
        ]),
    );
    value_mapper.insert(
        "foodHabitsType".to_string(),
        coefficients(&[
            ("highly-meat", 3.3),
            ("some-meat", 2.5),
            ("few-meat", 1.9),
            ("fish-veg", 1.7),
            ("egg-veg", 1.4),
            ("veg", 1.1),
        ]),
    );

    CalculatorDefinition {
        name: FOOD_CALCULATOR.to_string(),
        expression: "P * (C / 100) * (H * 1.5)".to_string(),
        name_mapper: symbols(&[
            ("peopleNumber", "P"),
            ("dailyCaloriesValue", "C"),
            ("foodHabitsType", "H"),
        ]),
        value_mapper,
        steps,
    }
}
