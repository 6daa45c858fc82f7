// ============================================================
// Layer 3 — Prediction Domain Type
// ============================================================
// Turns the model's scalar output (the probability of the
// positive class) into the label and confidence the API
// returns.
//
// The decision is strictly greater-than: a score of exactly
// 0.5 is NEGATIVE. Confidence is the raw positive-class
// probability, passed through unchanged.

use serde::{Deserialize, Serialize};

/// Scores above this value are POSITIVE.
pub const DECISION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Positive,
    Negative,
}

impl Label {
    pub fn from_score(score: f64) -> Self {
        if score > DECISION_THRESHOLD {
            Label::Positive
        } else {
            Label::Negative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Positive => "POSITIVE",
            Label::Negative => "NEGATIVE",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What `predict` returns for one review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label:      Label,
    pub confidence: f64,
}

impl PredictionResult {
    pub fn from_score(score: f64) -> Self {
        Self { label: Label::from_score(score), confidence: score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_score_is_positive() {
        let p = PredictionResult::from_score(0.85);
        assert_eq!(p.label, Label::Positive);
        assert_eq!(p.confidence, 0.85);
    }

    #[test]
    fn test_low_score_is_negative_and_confidence_is_raw() {
        let p = PredictionResult::from_score(0.15);
        assert_eq!(p.label, Label::Negative);
        assert_eq!(p.confidence, 0.15);
    }

    #[test]
    fn test_threshold_boundary() {
        assert_eq!(Label::from_score(0.5), Label::Negative);
        assert_eq!(Label::from_score(0.500_000_01), Label::Positive);
        assert_eq!(Label::from_score(0.499_999_99), Label::Negative);
    }

    #[test]
    fn test_label_serialises_uppercase() {
        let json = serde_json::to_string(&PredictionResult::from_score(0.9)).unwrap();
        assert_eq!(json, r#"{"label":"POSITIVE","confidence":0.9}"#);
    }
}
