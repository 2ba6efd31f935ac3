use crate::error::PredictError;
use crate::types::{
    required_fields, FeatureRow, RawInput, GENDER, GRADE, INTEREST_FIELDS, SOFT_SKILL_FIELDS,
};
use serde_json::Value;
use tracing::debug;

/// Fixed label-to-code mapping the classifier was trained with.
#[derive(Debug)]
pub struct EncodingTable {
    entries: &'static [(&'static str, u8)],
}

impl EncodingTable {
    pub fn lookup(&self, label: &str) -> Option<u8> {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, code)| *code)
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(l, _)| *l).collect()
    }

    fn encode(&self, raw: &RawInput, field: &str) -> Result<u8, PredictError> {
        let value = raw
            .get(field)
            .ok_or_else(|| PredictError::MissingField(vec![field.to_string()]))?;

        value
            .as_str()
            .and_then(|label| self.lookup(label))
            .ok_or_else(|| PredictError::UnrecognizedCategory {
                field: field.to_string(),
                value: value.to_string(),
                expected: self.labels(),
            })
    }
}

pub const GENDER_TABLE: EncodingTable = EncodingTable {
    entries: &[("Laki-laki", 0), ("Perempuan", 1)],
};

pub const YES_NO_TABLE: EncodingTable = EncodingTable {
    entries: &[("Ya", 1), ("Tidak", 0)],
};

pub const LEVEL_TABLE: EncodingTable = EncodingTable {
    entries: &[
        ("Sangat Rendah", 1),
        ("Rendah", 2),
        ("Sedang", 3),
        ("Tinggi", 4),
        ("Sangat Tinggi", 5),
    ],
};

pub const GRADE_MIN: f64 = 0.0;
pub const GRADE_MAX: f64 = 100.0;

pub struct FeatureEncoder;

impl FeatureEncoder {
    pub fn encode(raw: &RawInput) -> Result<FeatureRow, PredictError> {
        Self::check_required(raw)?;

        let gender = GENDER_TABLE.encode(raw, GENDER)?;

        let mut interests = [0u8; INTEREST_FIELDS.len()];
        for (slot, field) in interests.iter_mut().zip(INTEREST_FIELDS) {
            *slot = YES_NO_TABLE.encode(raw, field)?;
        }

        let mut skills = [0u8; SOFT_SKILL_FIELDS.len()];
        for (slot, field) in skills.iter_mut().zip(SOFT_SKILL_FIELDS) {
            *slot = LEVEL_TABLE.encode(raw, field)?;
        }

        let nilai_akhir = Self::coerce_grade(raw)?;

        // 0..=6 and 4..=20, always fits
        let total_minat = interests.iter().sum();
        let total_softskill = skills.iter().sum();

        let [minat_teknologi, minat_seni, minat_bisnis, minat_hukum, minat_kesehatan, minat_sains] =
            interests;
        let [problem_solving, kreativitas, kepemimpinan, kerja_tim] = skills;

        let row = FeatureRow {
            gender,
            minat_teknologi,
            minat_seni,
            minat_bisnis,
            minat_hukum,
            minat_kesehatan,
            minat_sains,
            problem_solving,
            kreativitas,
            kepemimpinan,
            kerja_tim,
            total_minat,
            total_softskill,
            nilai_akhir,
        };
        debug!(?row, "Encoded feature row");
        Ok(row)
    }

    fn check_required(raw: &RawInput) -> Result<(), PredictError> {
        let missing: Vec<String> = required_fields()
            .filter(|field| !raw.contains_key(*field))
            .map(String::from)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(PredictError::MissingField(missing))
        }
    }

    fn coerce_grade(raw: &RawInput) -> Result<f64, PredictError> {
        let value = raw
            .get(GRADE)
            .ok_or_else(|| PredictError::MissingField(vec![GRADE.to_string()]))?;

        let coerced = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        let grade = coerced.ok_or_else(|| PredictError::TypeCoercion {
            field: GRADE.to_string(),
            value: value.to_string(),
        })?;

        if !grade.is_finite() || !(GRADE_MIN..=GRADE_MAX).contains(&grade) {
            return Err(PredictError::OutOfRange {
                field: GRADE.to_string(),
                value: grade,
                min: GRADE_MIN,
                max: GRADE_MAX,
            });
        }

        Ok(grade)
    }
}
