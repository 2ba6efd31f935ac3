use crate::model::Classifier;
use crate::schema::ColumnOrder;
use crate::types::{FeatureRow, PredictionResult};
use tracing::debug;

pub const DEFAULT_TOP_K: usize = 3;
const PROBABILITY_DECIMALS: i32 = 4;

pub struct Predictor<'a, C: Classifier> {
    model: &'a C,
    order: ColumnOrder,
    top_k: usize,
}

impl<'a, C: Classifier> Predictor<'a, C> {
    pub fn new(model: &'a C, order: ColumnOrder, top_k: usize) -> Self {
        Self {
            model,
            order,
            top_k,
        }
    }

    pub fn predict(&self, row: &FeatureRow) -> PredictionResult {
        let x = self.order.apply(row);
        let prediction = self.model.predict(&x).to_string();
        let proba = self.model.predict_proba(&x);
        debug!(?proba, "Class probabilities");

        PredictionResult {
            prediction,
            top3: top_k(self.model.classes(), &proba, self.top_k),
        }
    }
}

/// Highest-probability classes, best first. Equal probabilities keep the
/// model's class order.
pub fn top_k(classes: &[String], proba: &[f64], k: usize) -> Vec<(String, f64)> {
    let mut ranked: Vec<usize> = (0..proba.len().min(classes.len())).collect();
    ranked.sort_by(|&a, &b| proba[b].total_cmp(&proba[a]));

    ranked
        .into_iter()
        .take(k)
        .map(|i| (classes[i].clone(), round_probability(proba[i])))
        .collect()
}

/// Rounds to 4 decimals, exact halves to the even digit.
pub fn round_probability(p: f64) -> f64 {
    let scale = 10f64.powi(PROBABILITY_DECIMALS);
    (p * scale).round_ties_even() / scale
}
