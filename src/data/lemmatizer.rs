// ============================================================
// Layer 4 — Rule-Based Lemmatizer
// ============================================================
// Reduces one lowercase word to its dictionary form.
//
// Two passes per word:
//   1. tag()       — guess a coarse part of speech from the
//                    lexicon tables, then from the word ending
//   2. lemmatize() — apply the rules for that part of speech
//
// Tagging looks at the word alone, never at its neighbours,
// so the same word always gets the same lemma.
//
// lemma() repeats lemmatize() until the word stops changing.
// A word that comes out of lemma() is a fixed point, which is
// what makes normalisation idempotent.
//
// Words containing anything other than ASCII letters (digits,
// accented letters, CJK) pass through untouched.
//
// Reference: Porter, "An algorithm for suffix stripping" (1980)
//            Rust Book §6 (Enums and Pattern Matching)

use crate::data::lexicon::{
    ADJECTIVE_MAP, ADJECTIVE_SET, ADJECTIVE_SUFFIXES, ADVERB_SET, INVARIANT_SET,
    LY_EXCEPTIONS, NOUN_MAP, NOUN_SET, STOPWORD_SET, VERB_MAP,
};

/// Stem endings that take back a silent "e" after -ed / -ing
/// is removed: rated → rate, enabled → enable, forced → force.
const E_RESTORING_ENDINGS: &[&str] = &["bl", "iz", "v", "nc", "rc", "dg", "rg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosTag {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

// ─── Tagging ──────────────────────────────────────────────────────────────────

/// Guess the part of speech of a lowercase word.
pub fn tag(word: &str) -> PosTag {
    if VERB_MAP.contains_key(word) {
        return PosTag::Verb;
    }
    if ADJECTIVE_MAP.contains_key(word) || ADJECTIVE_SET.contains(word) {
        return PosTag::Adjective;
    }
    if ADVERB_SET.contains(word) {
        return PosTag::Adverb;
    }
    if NOUN_MAP.contains_key(word) || NOUN_SET.contains(word) || INVARIANT_SET.contains(word) {
        return PosTag::Noun;
    }

    let len = word.len();
    if word.ends_with("ly") && len >= 5 && !LY_EXCEPTIONS.contains(word) {
        PosTag::Adverb
    } else if word.ends_with("ing") && len > 5 {
        PosTag::Verb
    } else if word.ends_with("ed") && len > 4 {
        PosTag::Verb
    } else if ADJECTIVE_SUFFIXES.iter().any(|s| word.ends_with(s)) {
        PosTag::Adjective
    } else {
        PosTag::Noun
    }
}

// ─── Lemmatizing ──────────────────────────────────────────────────────────────

/// One round of lemmatisation for a word with a known tag.
pub fn lemmatize(word: &str, pos: PosTag) -> String {
    if let Some(base) = VERB_MAP.get(word) {
        return (*base).to_string();
    }
    if STOPWORD_SET.contains(word)
        || INVARIANT_SET.contains(word)
        || !word.bytes().all(|b| b.is_ascii_lowercase())
    {
        return word.to_string();
    }

    match pos {
        PosTag::Noun      => lemmatize_noun(word),
        PosTag::Verb      => lemmatize_verb(word),
        PosTag::Adjective => ADJECTIVE_MAP
            .get(word)
            .map(|base| (*base).to_string())
            .unwrap_or_else(|| word.to_string()),
        PosTag::Adverb    => word.to_string(),
    }
}

/// Tag and lemmatise until the word is a fixed point.
///
/// Every rule either shortens the word or maps it to a table
/// value that is already a lemma, so a word settles within
/// len + 1 rounds however many suffixes are stacked on it.
pub fn lemma(word: &str) -> String {
    let mut current = word.to_string();
    for _ in 0..=word.len() {
        let next = lemmatize(&current, tag(&current));
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn lemmatize_noun(word: &str) -> String {
    if let Some(base) = NOUN_MAP.get(word) {
        return (*base).to_string();
    }
    let len = word.len();
    if len < 4 || ["ss", "us", "is"].iter().any(|s| word.ends_with(s)) {
        return word.to_string();
    }

    if word.ends_with("ies") && len > 4 {
        format!("{}y", &word[..len - 3])
    } else if ["sses", "shes", "ches", "xes", "zzes"].iter().any(|s| word.ends_with(s)) {
        word[..len - 2].to_string()
    } else if let Some(stem) = word.strip_suffix('s') {
        stem.to_string()
    } else {
        word.to_string()
    }
}

fn lemmatize_verb(word: &str) -> String {
    let len = word.len();

    if word.ends_with("ied") && len > 4 {
        return format!("{}y", &word[..len - 3]);
    }
    if word.ends_with("eed") {
        // agreed → agree, but need / feed / seed stay
        return if len > 5 { word[..len - 1].to_string() } else { word.to_string() };
    }

    let stem = if word.ends_with("ed") && len > 4 {
        &word[..len - 2]
    } else if word.ends_with("ing") && len > 5 {
        &word[..len - 3]
    } else {
        return word.to_string();
    };

    if !has_vowel(stem) {
        return word.to_string();
    }
    restore_stem(stem)
}

/// Undo spelling changes made when the suffix was attached.
fn restore_stem(stem: &str) -> String {
    let b   = stem.as_bytes();
    let len = b.len();

    // ── Doubled consonant: stopped → stop (but fall, miss, buzz) ──────────────
    if len >= 2 && b[len - 1] == b[len - 2] && is_consonant(b, len - 1)
        && !matches!(b[len - 1], b'l' | b's' | b'z')
    {
        return stem[..len - 1].to_string();
    }

    // ── Silent e ──────────────────────────────────────────────────────────────
    if E_RESTORING_ENDINGS.iter().any(|e| stem.ends_with(e)) {
        return format!("{stem}e");
    }
    // rated → rate, but treated / heated keep their stem
    if stem.ends_with("at") && len >= 3 && is_consonant(b, len - 3) {
        return format!("{stem}e");
    }
    // noticed → notice, released → release, amazed → amaze, managed → manage
    if len >= 2
        && matches!(b[len - 1], b'c' | b's' | b'z' | b'g')
        && !is_consonant(b, len - 2)
    {
        return format!("{stem}e");
    }
    // hoped → hope, taped → tape
    if measure(b) == 1 && ends_cvc(b) {
        return format!("{stem}e");
    }

    stem.to_string()
}

// ─── Porter helpers ───────────────────────────────────────────────────────────

/// 'y' counts as a consonant at the start of a word or after a vowel.
fn is_consonant(b: &[u8], i: usize) -> bool {
    match b[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(b, i - 1),
        _    => true,
    }
}

fn has_vowel(stem: &str) -> bool {
    let b = stem.as_bytes();
    (0..b.len()).any(|i| !is_consonant(b, i))
}

/// Number of vowel→consonant transitions ([C](VC)^m[V]).
fn measure(b: &[u8]) -> usize {
    let mut m          = 0;
    let mut prev_vowel = false;
    for i in 0..b.len() {
        let vowel = !is_consonant(b, i);
        if prev_vowel && !vowel {
            m += 1;
        }
        prev_vowel = vowel;
    }
    m
}

/// Ends consonant-vowel-consonant, last consonant not w, x or y.
fn ends_cvc(b: &[u8]) -> bool {
    let n = b.len();
    n >= 3
        && is_consonant(b, n - 3)
        && !is_consonant(b, n - 2)
        && is_consonant(b, n - 1)
        && !matches!(b[n - 1], b'w' | b'x' | b'y')
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::lexicon::{ADJECTIVE_FORMS, NOUN_FORMS, VERB_FORMS};

    #[test]
    fn test_table_values_are_fixed_points() {
        for (_, base) in VERB_FORMS.iter().chain(NOUN_FORMS).chain(ADJECTIVE_FORMS) {
            assert_eq!(lemma(base), *base, "{base} is not its own lemma");
        }
    }

    #[test]
    fn test_plural_nouns() {
        assert_eq!(lemma("dogs"), "dog");
        assert_eq!(lemma("batteries"), "battery");
        assert_eq!(lemma("boxes"), "box");
        assert_eq!(lemma("glasses"), "glass");
        assert_eq!(lemma("children"), "child");
    }

    #[test]
    fn test_nouns_that_look_plural_are_kept() {
        assert_eq!(lemma("news"), "news");
        assert_eq!(lemma("happiness"), "happiness");
        assert_eq!(lemma("status"), "status");
    }

    #[test]
    fn test_verb_inflections() {
        assert_eq!(lemma("running"), "run");
        assert_eq!(lemma("stopped"), "stop");
        assert_eq!(lemma("hoped"), "hope");
        assert_eq!(lemma("worked"), "work");
        assert_eq!(lemma("tried"), "try");
        assert_eq!(lemma("falling"), "fall");
        assert_eq!(lemma("went"), "go");
        assert_eq!(lemma("are"), "be");
    }

    #[test]
    fn test_comparatives() {
        assert_eq!(lemma("better"), "good");
        assert_eq!(lemma("cheapest"), "cheap");
    }

    #[test]
    fn test_listed_words_keep_their_tag() {
        assert_eq!(tag("faster"), PosTag::Adverb);
        assert_eq!(lemma("faster"), "faster");
        assert_eq!(tag("morning"), PosTag::Noun);
        assert_eq!(lemma("morning"), "morning");
        assert_eq!(lemma("disappointed"), "disappointed");
    }

    #[test]
    fn test_non_ascii_and_digits_untouched() {
        assert_eq!(lemma("2"), "2");
        assert_eq!(lemma("cafés"), "cafés");
    }

    #[test]
    fn test_lemma_is_stable() {
        for word in ["running", "batteries", "hoped", "released", "wolves"] {
            let once = lemma(word);
            assert_eq!(lemma(&once), once);
        }
    }

    #[test]
    fn test_stacked_suffixes_reach_a_fixed_point() {
        let word = format!("walk{}", "ed".repeat(12));
        assert_eq!(lemma(&word), "walk");
        assert_eq!(lemma("walkededededededededed"), "walk");
    }
}
