use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Missing required field(s): {}", .0.join(", "))]
    MissingField(Vec<String>),

    #[error("Unrecognized value {value} for field '{field}' (expected one of: {})", .expected.join(", "))]
    UnrecognizedCategory {
        field: String,
        value: String,
        expected: Vec<&'static str>,
    },

    #[error("Field '{field}' is not numeric: {value}")]
    TypeCoercion { field: String, value: String },

    #[error("Field '{field}' out of range: {value} (expected {min}-{max})")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Model load error: {0}")]
    ModelLoad(String),

    #[error("Schema mismatch: missing [{}], unexpected [{}]", .missing.join(", "), .unexpected.join(", "))]
    SchemaMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("Schema mismatch: model expects {expected} features, row has {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Helper function for creating model load errors
pub fn model_error(msg: impl Into<String>) -> PredictError {
    PredictError::ModelLoad(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_lists_every_key() {
        let err = PredictError::MissingField(vec!["Gender".into(), "Kerja_Tim".into()]);
        assert_eq!(err.to_string(), "Missing required field(s): Gender, Kerja_Tim");
    }

    #[test]
    fn test_unrecognized_category_message() {
        let err = PredictError::UnrecognizedCategory {
            field: "Gender".into(),
            value: "\"Other\"".into(),
            expected: vec!["Laki-laki", "Perempuan"],
        };
        let msg = err.to_string();
        assert!(msg.contains("Gender"));
        assert!(msg.contains("\"Other\""));
        assert!(msg.contains("Laki-laki, Perempuan"));
    }

    #[test]
    fn test_schema_mismatch_message() {
        let err = PredictError::SchemaMismatch {
            missing: vec!["Total_Minat".into()],
            unexpected: vec!["Usia".into()],
        };
        assert_eq!(
            err.to_string(),
            "Schema mismatch: missing [Total_Minat], unexpected [Usia]"
        );
    }
}
