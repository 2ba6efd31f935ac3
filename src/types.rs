use crate::error::PredictError;
use crate::schema::FEATURE_COUNT;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One questionnaire answer set, keyed by field name.
pub type RawInput = Map<String, Value>;

pub const GENDER: &str = "Gender";
pub const INTEREST_FIELDS: [&str; 6] = [
    "Minat_Teknologi",
    "Minat_Seni",
    "Minat_Bisnis",
    "Minat_Hukum",
    "Minat_Kesehatan",
    "Minat_Sains",
];
pub const SOFT_SKILL_FIELDS: [&str; 4] = [
    "Problem_Solving",
    "Kreativitas",
    "Kepemimpinan",
    "Kerja_Tim",
];
pub const GRADE: &str = "nilai akhir SMA/SMK";

/// Every key the questionnaire must carry, in encoding order.
pub fn required_fields() -> impl Iterator<Item = &'static str> {
    std::iter::once(GENDER)
        .chain(INTEREST_FIELDS)
        .chain(SOFT_SKILL_FIELDS)
        .chain(std::iter::once(GRADE))
}

pub fn parse_input(arg: Option<&str>) -> Result<RawInput, PredictError> {
    let arg = arg.ok_or_else(|| {
        PredictError::Decode("expected one argument holding a JSON object".to_string())
    })?;

    match serde_json::from_str::<Value>(arg) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(PredictError::Decode(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(PredictError::Decode(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// The encoded questionnaire, laid out in the order the classifier was trained on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    #[serde(rename = "Gender")]
    pub gender: u8,
    #[serde(rename = "Minat_Teknologi")]
    pub minat_teknologi: u8,
    #[serde(rename = "Minat_Seni")]
    pub minat_seni: u8,
    #[serde(rename = "Minat_Bisnis")]
    pub minat_bisnis: u8,
    #[serde(rename = "Minat_Hukum")]
    pub minat_hukum: u8,
    #[serde(rename = "Minat_Kesehatan")]
    pub minat_kesehatan: u8,
    #[serde(rename = "Minat_Sains")]
    pub minat_sains: u8,
    #[serde(rename = "Problem_Solving")]
    pub problem_solving: u8,
    #[serde(rename = "Kreativitas")]
    pub kreativitas: u8,
    #[serde(rename = "Kepemimpinan")]
    pub kepemimpinan: u8,
    #[serde(rename = "Kerja_Tim")]
    pub kerja_tim: u8,
    #[serde(rename = "Total_Minat")]
    pub total_minat: u8,
    #[serde(rename = "Total_Softskill")]
    pub total_softskill: u8,
    #[serde(rename = "nilai akhir SMA/SMK")]
    pub nilai_akhir: f64,
}

impl FeatureRow {
    /// Values in canonical column order (see [`crate::schema::FEATURE_NAMES`]).
    pub fn to_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            self.gender as f64,
            self.minat_teknologi as f64,
            self.minat_seni as f64,
            self.minat_bisnis as f64,
            self.minat_hukum as f64,
            self.minat_kesehatan as f64,
            self.minat_sains as f64,
            self.problem_solving as f64,
            self.kreativitas as f64,
            self.kepemimpinan as f64,
            self.kerja_tim as f64,
            self.total_minat as f64,
            self.total_softskill as f64,
            self.nilai_akhir,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: String,
    pub top3: Vec<(String, f64)>,
}
