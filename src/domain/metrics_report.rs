// ============================================================
// Layer 3 — Metrics Report
// ============================================================
// The evaluation summary written once per training run and
// served by GET /metrics.
//
// JSON layout (the shape the metrics blob is stored in):
//
//   {
//     "global_score": { "loss", "accuracy", "precision", "recall" },
//     "classification_report": {
//       "0":            { precision, recall, f1-score, support },
//       "1":            { ... },
//       "accuracy":     0.91,
//       "macro avg":    { ... },
//       "weighted avg": { ... }
//     }
//   }
//
// Precision and recall in global_score are for the positive
// class (label 1). A ratio with an empty denominator is 0.0.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub global_score:          GlobalScore,
    pub classification_report: ClassificationReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalScore {
    pub loss:      f64,
    pub accuracy:  f64,
    pub precision: f64,
    pub recall:    f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall:    f64,
    #[serde(rename = "f1-score")]
    pub f1_score:  f64,
    pub support:   usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    #[serde(rename = "0")]
    pub negative:     ClassMetrics,
    #[serde(rename = "1")]
    pub positive:     ClassMetrics,
    pub accuracy:     f64,
    #[serde(rename = "macro avg")]
    pub macro_avg:    ClassMetrics,
    #[serde(rename = "weighted avg")]
    pub weighted_avg: ClassMetrics,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 { 0.0 } else { 2.0 * precision * recall / (precision + recall) }
}

impl ClassMetrics {
    /// Metrics for one class given true/predicted labels.
    fn for_class(y_true: &[u8], y_pred: &[u8], class: u8) -> Self {
        let mut tp = 0usize;
        let mut fp = 0usize;
        let mut fn_ = 0usize;
        for (&t, &p) in y_true.iter().zip(y_pred) {
            match (t == class, p == class) {
                (true,  true)  => tp  += 1,
                (false, true)  => fp  += 1,
                (true,  false) => fn_ += 1,
                (false, false) => {}
            }
        }
        let precision = ratio(tp, tp + fp);
        let recall    = ratio(tp, tp + fn_);
        Self { precision, recall, f1_score: f1(precision, recall), support: tp + fn_ }
    }
}

impl ClassificationReport {
    /// Build the per-class report from binary labels.
    /// `y_true` and `y_pred` must have the same length.
    pub fn from_labels(y_true: &[u8], y_pred: &[u8]) -> Self {
        debug_assert_eq!(y_true.len(), y_pred.len());
        let negative = ClassMetrics::for_class(y_true, y_pred, 0);
        let positive = ClassMetrics::for_class(y_true, y_pred, 1);

        let total   = y_true.len();
        let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();

        let macro_avg = ClassMetrics {
            precision: (negative.precision + positive.precision) / 2.0,
            recall:    (negative.recall    + positive.recall)    / 2.0,
            f1_score:  (negative.f1_score  + positive.f1_score)  / 2.0,
            support:   total,
        };

        let weight = |neg: f64, pos: f64| {
            if total == 0 {
                0.0
            } else {
                (neg * negative.support as f64 + pos * positive.support as f64) / total as f64
            }
        };
        let weighted_avg = ClassMetrics {
            precision: weight(negative.precision, positive.precision),
            recall:    weight(negative.recall,    positive.recall),
            f1_score:  weight(negative.f1_score,  positive.f1_score),
            support:   total,
        };

        Self {
            negative,
            positive,
            accuracy: ratio(correct, total),
            macro_avg,
            weighted_avg,
        }
    }
}

impl MetricsReport {
    /// Assemble the report from the mean test loss and the
    /// thresholded predictions.
    pub fn new(loss: f64, y_true: &[u8], y_pred: &[u8]) -> Self {
        let classification_report = ClassificationReport::from_labels(y_true, y_pred);
        let global_score = GlobalScore {
            loss,
            accuracy:  classification_report.accuracy,
            precision: classification_report.positive.precision,
            recall:    classification_report.positive.recall,
        };
        Self { global_score, classification_report }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_predictions() {
        let y = [0, 1, 1, 0];
        let report = MetricsReport::new(0.1, &y, &y);
        assert_eq!(report.global_score.accuracy, 1.0);
        assert_eq!(report.global_score.precision, 1.0);
        assert_eq!(report.classification_report.positive.support, 2);
        assert_eq!(report.classification_report.macro_avg.f1_score, 1.0);
    }

    #[test]
    fn test_mixed_predictions() {
        // tp=1 fp=1 fn=1 tn=1 for the positive class
        let y_true = [1, 1, 0, 0];
        let y_pred = [1, 0, 1, 0];
        let report = ClassificationReport::from_labels(&y_true, &y_pred);
        assert_eq!(report.positive.precision, 0.5);
        assert_eq!(report.positive.recall, 0.5);
        assert_eq!(report.negative.f1_score, 0.5);
        assert_eq!(report.accuracy, 0.5);
        assert_eq!(report.weighted_avg.support, 4);
    }

    #[test]
    fn test_no_positive_predictions_gives_zero_precision() {
        let report = ClassificationReport::from_labels(&[1, 0], &[0, 0]);
        assert_eq!(report.positive.precision, 0.0);
        assert_eq!(report.positive.f1_score, 0.0);
    }

    #[test]
    fn test_json_keys_match_stored_layout() {
        let report = MetricsReport::new(0.3, &[1, 0], &[1, 0]);
        let v = serde_json::to_value(&report).unwrap();
        assert!(v["global_score"]["loss"].is_number());
        assert!(v["classification_report"]["1"]["f1-score"].is_number());
        assert!(v["classification_report"]["macro avg"]["support"].is_number());
    }
}
