// ============================================================
// Layer 4 — Text Normalizer
// ============================================================
// Turns a raw review into the cleaned form both the training
// corpus and live requests are encoded from.
//
// Steps (applied in order):
//   1. Lowercase the whole text
//   2. Replace every run of characters that are neither letters,
//      digits nor whitespace with a single space
//   3. Split on whitespace
//   4. Lemmatise each token (lemmatizer.rs)
//   5. Drop English stopwords, keeping the negation "not"
//   6. Join the survivors with single spaces
//
// The output contains only letters, digits and single spaces,
// and every token is already its own lemma. Running the
// normaliser on its own output therefore returns it unchanged.
//
// Training and serving must call this same function. A review
// cleaned differently at serving time would be encoded into ids
// the model never saw.
//
// Reference: Rust Book §8 (Strings in Rust)
//            Rust Book §13 (Iterators)
//            regex crate documentation (Unicode classes)

use regex::Regex;
use std::sync::LazyLock;

use crate::data::lemmatizer::lemma;
use crate::data::lexicon::is_stopword;

/// Letters, digits and whitespace survive, everything else is
/// punctuation. The underscore counts as punctuation.
static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\p{Alphabetic}\p{N}\s]+").expect("punctuation pattern is valid")
});

pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Clean one review. Total: any input, including "", gives a
    /// (possibly empty) string.
    pub fn normalize(&self, text: &str) -> String {
        // ── Step 1: Lowercase ─────────────────────────────────────────────────
        let lowered = text.to_lowercase();

        // ── Step 2: Punctuation → space ───────────────────────────────────────
        let spaced = PUNCTUATION.replace_all(&lowered, " ");

        // ── Steps 3-6: Tokenise, lemmatise, filter, join ──────────────────────
        spaced
            .split_whitespace()
            .map(lemma)
            .filter(|token| !is_stopword(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn clean(text: &str) -> String {
        Normalizer::new().normalize(text)
    }

    #[test]
    fn test_drops_stopwords() {
        assert_eq!(clean("this is a very common sentence"), "common sentence");
    }

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        assert_eq!(clean("Hello World! This is a test."), "hello world test");
        assert_eq!(clean("!!!Wow??? @Amazon"), "wow amazon");
    }

    #[test]
    fn test_keeps_negation() {
        assert_eq!(clean("This is not a good example"), "not good example");
    }

    #[test]
    fn test_lemmatises_tokens() {
        assert_eq!(clean("Dogs are running faster"), "dog run faster");
    }

    #[test]
    fn test_numbers_are_split_on_the_dot() {
        assert_eq!(clean("Version 2.0 is better than version 1"), "version 2 0 good version 1");
    }

    #[test]
    fn test_mixed_punctuation_and_case() {
        assert_eq!(clean("Well... THIS, is a—strange!!! sentence???"), "well strange sentence");
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("   \t\n "), "");
        assert_eq!(clean("?!..."), "");
    }

    #[test]
    fn test_only_stopwords_gives_empty() {
        assert_eq!(clean("the and of it"), "");
    }

    #[test]
    fn test_underscore_is_punctuation() {
        assert_eq!(clean("snake_case"), "snake case");
    }

    #[test]
    fn test_idempotent() {
        for text in [
            "This is NOT a Test!",
            "Dogs are running faster",
            "Batteries died after 2 weeks; worst purchase EVER...",
            "Version 2.0 is better than version 1",
            "Très bien, the café was lovely",
            "walkededededededededed around",
        ] {
            let once = clean(text);
            assert_eq!(clean(&once), once, "not idempotent for {text:?}");
        }
    }

    #[test]
    fn test_output_is_single_spaced() {
        let out = clean("  loads   of\tspace \n here ");
        assert!(!out.contains("  "));
        assert_eq!(out, out.trim());
    }
}
