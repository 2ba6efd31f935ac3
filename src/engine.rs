use crate::{
    config::Config,
    encoding::FeatureEncoder,
    error::PredictError,
    model::{Classifier, DecisionTreeClassifier},
    predictor::Predictor,
    report::Reporter,
    schema,
    types::{parse_input, PredictionResult},
};
use std::io::Write;
use tracing::info;

/// Runs one questionnaire through encoding, model loading and prediction.
///
/// Progress goes to `reporter` as it happens; the result line is left to the
/// caller so nothing is written on failure.
pub fn run<W: Write>(
    input: Option<&str>,
    config: &Config,
    reporter: &mut Reporter<W>,
) -> Result<PredictionResult, PredictError> {
    reporter.progress("Prediction script started")?;

    let raw = parse_input(input)?;
    let row = FeatureEncoder::encode(&raw)?;

    reporter.progress(format!("Features ready: {}", serde_json::to_string(&row)?))?;

    let model_path = config.model_path()?;
    reporter.progress(format!("Loading model from: {}", model_path.display()))?;
    let model = DecisionTreeClassifier::load_from_file(&model_path)?;

    let order = schema::reconcile(model.feature_names(), model.n_features())?;
    let predictor = Predictor::new(&model, order, config.top_k);

    reporter.progress("Running prediction...")?;
    let result = predictor.predict(&row);
    reporter.progress(&result.prediction)?;

    info!(prediction = %result.prediction, ranked = result.top3.len(), "Prediction complete");
    Ok(result)
}
