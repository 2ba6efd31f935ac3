use crate::error::{model_error, PredictError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

const TREE_LEAF: i64 = -1;

/// Read-only view of a fitted classifier.
pub trait Classifier {
    /// Class labels in the model's native order.
    fn classes(&self) -> &[String];

    /// Column names the model was fitted on, when it recorded them.
    fn feature_names(&self) -> Option<&[String]>;

    fn n_features(&self) -> usize;

    /// One probability per entry of [`Classifier::classes`].
    fn predict_proba(&self, x: &[f64]) -> Vec<f64>;

    fn predict(&self, x: &[f64]) -> &str {
        let proba = self.predict_proba(x);
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        &self.classes()[best]
    }
}

/// Node arrays of a fitted CART tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeArrays {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeClassifier {
    #[serde(default)]
    pub version: Option<String>,
    pub classes: Vec<String>,
    pub n_features_in: usize,
    #[serde(default)]
    pub feature_names_in: Option<Vec<String>>,
    pub tree: TreeArrays,
}

impl DecisionTreeClassifier {
    pub fn load_from_file(path: &Path) -> Result<Self, PredictError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| model_error(format!("cannot read {}: {}", path.display(), e)))?;
        let model: DecisionTreeClassifier = serde_json::from_str(&content)
            .map_err(|e| model_error(format!("cannot parse {}: {}", path.display(), e)))?;
        model.validate()?;

        info!(
            path = %path.display(),
            version = model.version.as_deref().unwrap_or("unversioned"),
            classes = model.classes.len(),
            nodes = model.n_nodes(),
            "Loaded decision tree"
        );
        Ok(model)
    }

    pub fn n_nodes(&self) -> usize {
        self.tree.children_left.len()
    }

    fn is_leaf(&self, node: usize) -> bool {
        self.tree.children_left[node] == TREE_LEAF
    }

    /// Rejects artifacts that could index out of bounds or loop during traversal.
    pub fn validate(&self) -> Result<(), PredictError> {
        let t = &self.tree;
        let n = t.children_left.len();

        if self.classes.is_empty() {
            return Err(model_error("model has no classes"));
        }
        if n == 0 {
            return Err(model_error("tree has no nodes"));
        }
        let lengths = [
            t.children_right.len(),
            t.feature.len(),
            t.threshold.len(),
            t.value.len(),
        ];
        if lengths.iter().any(|&len| len != n) {
            return Err(model_error(format!(
                "tree arrays disagree in length: {} nodes vs {:?}",
                n, lengths
            )));
        }
        if let Some(names) = &self.feature_names_in {
            if names.len() != self.n_features_in {
                return Err(model_error(format!(
                    "feature_names_in has {} entries, n_features_in is {}",
                    names.len(),
                    self.n_features_in
                )));
            }
        }

        for node in 0..n {
            if t.value[node].len() != self.classes.len() {
                return Err(model_error(format!(
                    "node {} has {} class weights, expected {}",
                    node,
                    t.value[node].len(),
                    self.classes.len()
                )));
            }
            if self.is_leaf(node) {
                continue;
            }

            for child in [t.children_left[node], t.children_right[node]] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(model_error(format!(
                        "node {} has invalid child {}",
                        node, child
                    )));
                }
            }
            let feature = t.feature[node];
            if feature < 0 || feature as usize >= self.n_features_in {
                return Err(model_error(format!(
                    "node {} splits on invalid feature {}",
                    node, feature
                )));
            }
        }

        Ok(())
    }

    fn leaf_for(&self, x: &[f64]) -> usize {
        let t = &self.tree;
        let mut node = 0;
        while !self.is_leaf(node) {
            // splits were learned on single-precision inputs
            let value = x[t.feature[node] as usize] as f32 as f64;
            node = if value <= t.threshold[node] {
                t.children_left[node] as usize
            } else {
                t.children_right[node] as usize
            };
        }
        debug!(leaf = node, "Reached leaf");
        node
    }
}

impl Classifier for DecisionTreeClassifier {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names_in.as_deref()
    }

    fn n_features(&self) -> usize {
        self.n_features_in
    }

    fn predict_proba(&self, x: &[f64]) -> Vec<f64> {
        let weights = &self.tree.value[self.leaf_for(x)];
        let total: f64 = weights.iter().sum();
        if total > 0.0 {
            weights.iter().map(|w| w / total).collect()
        } else {
            vec![0.0; weights.len()]
        }
    }
}
