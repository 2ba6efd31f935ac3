use crate::error::PredictError;
use crate::types::FeatureRow;
use std::collections::HashSet;
use tracing::debug;

pub const FEATURE_COUNT: usize = 14;

/// Column order the encoder produces.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Gender",
    "Minat_Teknologi",
    "Minat_Seni",
    "Minat_Bisnis",
    "Minat_Hukum",
    "Minat_Kesehatan",
    "Minat_Sains",
    "Problem_Solving",
    "Kreativitas",
    "Kepemimpinan",
    "Kerja_Tim",
    "Total_Minat",
    "Total_Softskill",
    "nilai akhir SMA/SMK",
];

/// Maps model column positions onto canonical row positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOrder {
    source_index: Vec<usize>,
}

impl ColumnOrder {
    pub fn canonical() -> Self {
        Self {
            source_index: (0..FEATURE_COUNT).collect(),
        }
    }

    pub fn is_canonical(&self) -> bool {
        self.source_index.iter().enumerate().all(|(i, &j)| i == j)
    }

    pub fn apply(&self, row: &FeatureRow) -> Vec<f64> {
        let values = row.to_vector();
        self.source_index.iter().map(|&j| values[j]).collect()
    }
}

/// Compares the model's self-reported columns with the encoder's.
///
/// When names are reported the two sets must be identical; only the order may
/// differ. Without names, only the column count can be checked.
pub fn reconcile(
    expected_names: Option<&[String]>,
    n_features_in: usize,
) -> Result<ColumnOrder, PredictError> {
    let Some(names) = expected_names else {
        if n_features_in != FEATURE_COUNT {
            return Err(PredictError::FeatureCount {
                expected: n_features_in,
                actual: FEATURE_COUNT,
            });
        }
        debug!("Model reports no feature names, using canonical order");
        return Ok(ColumnOrder::canonical());
    };

    let mut seen = HashSet::new();
    let mut unexpected = Vec::new();
    let mut source_index = Vec::with_capacity(names.len());

    for name in names {
        if !seen.insert(name.as_str()) {
            unexpected.push(format!("{} (duplicate)", name));
            continue;
        }
        match FEATURE_NAMES.iter().position(|f| f == name) {
            Some(j) => source_index.push(j),
            None => unexpected.push(name.clone()),
        }
    }

    let missing: Vec<String> = FEATURE_NAMES
        .iter()
        .filter(|f| !seen.contains(**f))
        .map(|f| f.to_string())
        .collect();

    if !missing.is_empty() || !unexpected.is_empty() {
        return Err(PredictError::SchemaMismatch {
            missing,
            unexpected,
        });
    }

    let order = ColumnOrder { source_index };
    if !order.is_canonical() {
        debug!(?names, "Reordering feature row to model column order");
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> FeatureRow {
        FeatureRow {
            gender: 1,
            minat_teknologi: 1,
            minat_seni: 0,
            minat_bisnis: 0,
            minat_hukum: 0,
            minat_kesehatan: 0,
            minat_sains: 1,
            problem_solving: 4,
            kreativitas: 3,
            kepemimpinan: 2,
            kerja_tim: 4,
            total_minat: 2,
            total_softskill: 13,
            nilai_akhir: 85.5,
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_canonical_names_keep_order() {
        let order = reconcile(Some(&names(&FEATURE_NAMES)), FEATURE_COUNT).unwrap();
        assert!(order.is_canonical());
        assert_eq!(order.apply(&row()), row().to_vector().to_vec());
    }

    #[test]
    fn test_permuted_names_reorder_row() {
        let mut permuted = FEATURE_NAMES;
        permuted.reverse();
        let order = reconcile(Some(&names(&permuted)), FEATURE_COUNT).unwrap();
        assert!(!order.is_canonical());

        let values = order.apply(&row());
        assert_eq!(values[0], 85.5);
        assert_eq!(values[1], 13.0);
        assert_eq!(values[13], 1.0);
    }

    #[test]
    fn test_missing_and_unexpected_names_are_fatal() {
        let mut list = names(&FEATURE_NAMES);
        list[11] = "Usia".to_string();
        let err = reconcile(Some(&list), FEATURE_COUNT).unwrap_err();
        match err {
            PredictError::SchemaMismatch { missing, unexpected } => {
                assert_eq!(missing, vec!["Total_Minat".to_string()]);
                assert_eq!(unexpected, vec!["Usia".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_older_schema_without_grade_is_fatal() {
        let list = names(&FEATURE_NAMES[..13]);
        let err = reconcile(Some(&list), 13).unwrap_err();
        match err {
            PredictError::SchemaMismatch { missing, unexpected } => {
                assert_eq!(missing, vec!["nilai akhir SMA/SMK".to_string()]);
                assert!(unexpected.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_name_is_fatal() {
        let mut list = names(&FEATURE_NAMES);
        list.push("Gender".to_string());
        let err = reconcile(Some(&list), 15).unwrap_err();
        assert!(matches!(err, PredictError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_unnamed_model_checks_count() {
        assert!(reconcile(None, FEATURE_COUNT).unwrap().is_canonical());
        let err = reconcile(None, 11).unwrap_err();
        assert!(matches!(
            err,
            PredictError::FeatureCount { expected: 11, actual: 14 }
        ));
    }
}
