use footprint_survey::config::RegistryConfig;
use footprint_survey::error::AppError;
use footprint_survey::survey::{AnswerSet, CalculatorRegistry, SurveyService};
use metrics_exporter_prometheus::PrometheusHandle;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Build the process-wide registry once and wrap it in the service facade.
pub(crate) fn survey_service(config: &RegistryConfig) -> Result<Arc<SurveyService>, AppError> {
    let registry = CalculatorRegistry::from_config(config)?;
    Ok(Arc::new(SurveyService::new(Arc::new(registry))))
}

pub(crate) fn read_answers(path: &Path) -> Result<AnswerSet, AppError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
