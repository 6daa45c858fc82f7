// ============================================================
// Layer 3 — Review Domain Types
// ============================================================
// A review as it arrives from the raw corpus, and a review
// once it has been cleaned and is ready for training.
//
// Labels follow the corpus convention: 1 = positive,
// 0 = negative.

use serde::{Deserialize, Serialize};

/// A review exactly as stored in the raw corpus.
/// The title is optional because some sources only ship a body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReview {
    #[serde(default)]
    pub title:   Option<String>,
    pub content: String,
    pub label:   u8,
}

impl RawReview {
    /// Title and body joined by one space, the text the
    /// normaliser sees. No title means the body alone.
    pub fn full_text(&self) -> String {
        match &self.title {
            Some(title) => format!("{} {}", title, self.content),
            None        => self.content.clone(),
        }
    }
}

/// A cleaned review with its binary label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledReview {
    pub content: String,
    pub label:   u8,
}

impl LabeledReview {
    pub fn new(content: impl Into<String>, label: u8) -> Self {
        Self { content: content.into(), label }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_text_joins_title_and_body() {
        let r = RawReview { title: Some("Great".into()), content: "works well".into(), label: 1 };
        assert_eq!(r.full_text(), "Great works well");
    }

    #[test]
    fn test_full_text_without_title() {
        let r = RawReview { title: None, content: "works well".into(), label: 1 };
        assert_eq!(r.full_text(), "works well");
    }

    #[test]
    fn test_missing_title_deserialises() {
        let r: RawReview = serde_json::from_str(r#"{"content":"meh","label":0}"#).unwrap();
        assert_eq!(r.title, None);
        assert_eq!(r.label, 0);
    }
}
