//! Integration tests for the survey scoring workflow.
//!
//! Scenarios go through the public registry, service facade and HTTP router so the
//! schema export, visibility rules and formula evaluation are validated together.

mod common {
    use std::sync::Arc;

    use footprint_survey::survey::{
        AnswerSet, AnswerValue, CalculatorRegistry, SurveyService,
    };

    pub(super) fn service() -> Arc<SurveyService> {
        let registry = CalculatorRegistry::standard().expect("standard registry builds");
        Arc::new(SurveyService::new(Arc::new(registry)))
    }

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

    pub(super) fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }
}

mod scoring {
    use super::common::*;
    use footprint_survey::survey::{
        AnswerSet, AnswerValue, SubmissionRequest, SurveyServiceError,
    };

    #[test]
    fn respondent_walks_the_household_form() {
        let service = service();
        let mut answers = AnswerSet::new();

        let steps = service.visibility("form1", &answers).expect("form1 exists");
        assert!(steps[2].visible.iter().all(|key| key == "transportType"));

        answers.insert("peopleNumber", 2.0);
        answers.insert("gasType", "glp");
        answers.insert("gasValue", "pouco");
        answers.insert("transportType", AnswerValue::choices(["car"]));

        let steps = service.visibility("form1", &answers).expect("form1 exists");
        assert_eq!(steps[2].visible.len(), 5);

        answers.insert("fuelGasolineValue", 100.0);
        assert!(service.review("form1", &answers).expect("form1 exists").is_empty());

        let result = service
            .submit(&SubmissionRequest {
                calculator_name: "form1".to_string(),
                answers,
            })
            .expect("submission scores");
        assert_close(result.result, 232.0);
    }

    #[test]
    fn switching_to_no_gas_drops_the_gas_term() {
        let service = service();
        let answers = household_answers().with("gasType", "semgas");

        let evaluation = service.evaluate("form1", &answers).expect("evaluates");
        assert_eq!(evaluation.bindings["GV"], 0.0);
        assert_close(evaluation.result, 190.0);
    }

    #[test]
    fn food_form_with_no_answers_scores_zero() {
        let result = service()
            .submit(&SubmissionRequest {
                calculator_name: "form2".to_string(),
                answers: AnswerSet::new(),
            })
            .expect("empty answers score");
        assert_eq!(result.result, 0.0);
    }

    #[test]
    fn unknown_calculator_is_not_found() {
        let error = service()
            .submit(&SubmissionRequest {
                calculator_name: "carbon".to_string(),
                answers: household_answers(),
            })
            .expect_err("calculator missing");

        assert!(matches!(error, SurveyServiceError::NotFound { .. }));
        let failure = error.failure();
        assert_eq!(failure.kind, "NotFoundError");
        assert_eq!(failure.field, None);
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use footprint_survey::survey::survey_router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn post(uri: &str, body: Value) -> (StatusCode, Value) {
        let response = survey_router(service())
            .oneshot(
                Request::post(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn submission_endpoint_scores_multi_select_transport() {
        let (status, body) = post(
            "/api/v1/submissions",
            json!({
                "calculatorName": "form1",
                "answers": {
                    "peopleNumber": 2,
                    "gasType": "glp",
                    "gasValue": "pouco",
                    "transportType": ["car", "bike"],
                    "fuelGasolineValue": 100
                }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_close(body["result"].as_f64().unwrap(), 402.0);
    }

    #[tokio::test]
    async fn submission_endpoint_rejects_non_numeric_fuel() {
        let (status, body) = post(
            "/api/v1/submissions",
            json!({
                "calculatorName": "form1",
                "answers": {
                    "transportType": ["car"],
                    "fuelGasolineValue": "cem"
                }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["kind"], "TypeConversionError");
        assert_eq!(body["field"], "fuelGasolineValue");
    }

    #[tokio::test]
    async fn visibility_endpoint_hides_gas_spend_without_gas() {
        let (status, body) = post(
            "/api/v1/calculators/form1/visibility",
            json!({"answers": {"gasType": "semgas"}}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["steps"][1]["visible"], json!(["gasType"]));
    }
}
