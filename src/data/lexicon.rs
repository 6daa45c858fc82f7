// ============================================================
// Layer 4 — English Lexicon
// ============================================================
// Read-only word lists used by the normaliser:
//
//   STOPWORDS           — the standard English stopword list
//   VERB_FORMS          — irregular inflection → base verb
//   NOUN_FORMS          — irregular plural → singular
//   ADJECTIVE_FORMS     — comparative/superlative → base
//   INVARIANT_WORDS     — words that look inflected but are not
//   KNOWN_ADJECTIVES    — POS hints
//   KNOWN_ADVERBS       — POS hints
//   KNOWN_NOUNS         — -ing / -ed words that are nouns
//
// The tables are built into HashMaps/HashSets once per process
// (LazyLock) and never mutated afterwards.
//
// Every value on the right-hand side of a *_FORMS table must be
// its own lemma (checked in lemmatizer.rs).

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// The one stopword that must always survive filtering.
pub const NEGATION: &str = "not";

pub const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
    "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he",
    "him", "his", "himself", "she", "she's", "her", "hers", "herself", "it", "it's",
    "its", "itself", "they", "them", "their", "theirs", "themselves", "what",
    "which", "who", "whom", "this", "that", "that'll", "these", "those", "am", "is",
    "are", "was", "were", "be", "been", "being", "have", "has", "had", "having",
    "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about",
    "against", "between", "into", "through", "during", "before", "after", "above",
    "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some",
    "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very",
    "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn",
    "couldn't", "didn", "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn",
    "hasn't", "haven", "haven't", "isn", "isn't", "ma", "mightn", "mightn't",
    "mustn", "mustn't", "needn", "needn't", "shan", "shan't", "shouldn",
    "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

pub const VERB_FORMS: &[(&str, &str)] = &[
    ("am", "be"), ("is", "be"), ("are", "be"), ("was", "be"), ("were", "be"),
    ("been", "be"), ("being", "be"),
    ("has", "have"), ("had", "have"), ("having", "have"),
    ("does", "do"), ("did", "do"), ("done", "do"), ("doing", "do"),
    ("goes", "go"), ("went", "go"), ("gone", "go"), ("going", "go"),
    ("ran", "run"), ("came", "come"), ("coming", "come"), ("became", "become"),
    ("got", "get"), ("gotten", "get"), ("made", "make"), ("said", "say"),
    ("says", "say"), ("took", "take"), ("taken", "take"), ("gave", "give"),
    ("given", "give"), ("saw", "see"), ("seen", "see"), ("knew", "know"),
    ("known", "know"), ("thought", "think"), ("bought", "buy"), ("brought", "bring"),
    ("felt", "feel"), ("found", "find"), ("told", "tell"), ("left", "leave"),
    ("kept", "keep"), ("began", "begin"), ("begun", "begin"), ("wrote", "write"),
    ("written", "write"), ("broke", "break"), ("broken", "break"), ("chose", "choose"),
    ("chosen", "choose"), ("ate", "eat"), ("eaten", "eat"), ("fell", "fall"),
    ("fallen", "fall"), ("sent", "send"), ("spent", "spend"), ("built", "build"),
    ("paid", "pay"), ("held", "hold"), ("stood", "stand"), ("understood", "understand"),
    ("sold", "sell"), ("lost", "lose"), ("met", "meet"), ("sat", "sit"),
    ("won", "win"), ("wore", "wear"), ("worn", "wear"), ("tore", "tear"),
    ("torn", "tear"), ("threw", "throw"), ("thrown", "throw"), ("grew", "grow"),
    ("grown", "grow"), ("drew", "draw"), ("drawn", "draw"), ("flew", "fly"),
    ("flown", "fly"), ("drove", "drive"), ("driven", "drive"), ("rode", "ride"),
    ("ridden", "ride"), ("spoke", "speak"), ("spoken", "speak"), ("stole", "steal"),
    ("stolen", "steal"), ("forgot", "forget"), ("forgotten", "forget"),
    ("hid", "hide"), ("hidden", "hide"), ("shook", "shake"), ("shaken", "shake"),
    ("woke", "wake"), ("woken", "wake"), ("meant", "mean"), ("heard", "hear"),
    ("taught", "teach"), ("caught", "catch"), ("fought", "fight"), ("sought", "seek"),
    ("slept", "sleep"), ("swept", "sweep"), ("wept", "weep"), ("led", "lead"),
    ("fed", "feed"), ("fled", "flee"), ("bled", "bleed"), ("bred", "breed"),
    ("sped", "speed"), ("lay", "lie"), ("lain", "lie"), ("dying", "die"),
    ("lying", "lie"), ("tying", "tie"), ("sang", "sing"), ("sung", "sing"),
    ("rang", "ring"), ("rung", "ring"), ("drank", "drink"), ("drunk", "drink"),
    ("swam", "swim"), ("swum", "swim"), ("sank", "sink"), ("sunk", "sink"),
    ("shrank", "shrink"), ("shrunk", "shrink"), ("stuck", "stick"), ("struck", "strike"),
    ("hung", "hang"), ("dug", "dig"), ("lit", "light"),
    ("shot", "shoot"), ("bent", "bend"), ("lent", "lend"), ("dealt", "deal"),
    ("knelt", "kneel"), ("slid", "slide"), ("bitten", "bite"),
    ("died", "die"), ("lied", "lie"), ("tied", "tie"), ("eating", "eat"), ("eats", "eat"),
    ("created", "create"), ("creating", "create"), ("caused", "cause"), ("causing", "cause"),
    ("changed", "change"), ("changing", "change"), ("focused", "focus"), ("focusing", "focus"),
    ("biased", "bias"),
    ("used", "use"), ("uses", "use"), ("using", "use"),
    ("added", "add"), ("adding", "add"), ("adds", "add"),
    ("needed", "need"), ("needing", "need"), ("needs", "need"),
];

pub const NOUN_FORMS: &[(&str, &str)] = &[
    ("men", "man"), ("women", "woman"), ("children", "child"), ("feet", "foot"),
    ("teeth", "tooth"), ("geese", "goose"), ("mice", "mouse"), ("lice", "louse"),
    ("oxen", "ox"), ("lives", "life"), ("wives", "wife"), ("knives", "knife"),
    ("leaves", "leaf"), ("halves", "half"), ("shelves", "shelf"), ("wolves", "wolf"),
    ("thieves", "thief"), ("loaves", "loaf"), ("calves", "calf"), ("selves", "self"),
    ("criteria", "criterion"), ("phenomena", "phenomenon"), ("data", "datum"),
    ("indices", "index"), ("matrices", "matrix"), ("analyses", "analysis"),
    ("crises", "crisis"), ("theses", "thesis"), ("potatoes", "potato"),
    ("tomatoes", "tomato"), ("heroes", "hero"), ("echoes", "echo"),
];

pub const ADJECTIVE_FORMS: &[(&str, &str)] = &[
    ("better", "good"), ("best", "good"), ("worse", "bad"), ("worst", "bad"),
    ("bigger", "big"), ("biggest", "big"), ("smaller", "small"), ("smallest", "small"),
    ("larger", "large"), ("largest", "large"), ("cheaper", "cheap"), ("cheapest", "cheap"),
    ("easier", "easy"), ("easiest", "easy"), ("happier", "happy"), ("happiest", "happy"),
    ("greater", "great"), ("greatest", "great"), ("higher", "high"), ("highest", "high"),
    ("lower", "low"), ("lowest", "low"), ("longer", "long"), ("longest", "long"),
    ("newer", "new"), ("newest", "new"), ("older", "old"), ("oldest", "old"),
    ("nicer", "nice"), ("nicest", "nice"), ("stronger", "strong"), ("strongest", "strong"),
    ("weaker", "weak"), ("weakest", "weak"), ("cleaner", "clean"), ("cleanest", "clean"),
    ("louder", "loud"), ("loudest", "loud"), ("softer", "soft"), ("softest", "soft"),
    ("simpler", "simple"), ("simplest", "simple"), ("prettier", "pretty"),
    ("prettiest", "pretty"), ("funnier", "funny"), ("funniest", "funny"),
    ("heavier", "heavy"), ("heaviest", "heavy"), ("lighter", "light"),
    ("lightest", "light"), ("farther", "far"), ("farthest", "far"),
];

pub const INVARIANT_WORDS: &[&str] = &[
    "news", "series", "species", "bias", "gas", "lens", "chaos", "alias", "atlas",
    "canvas", "christmas", "physics", "mathematics", "economics", "politics",
    "electronics", "jeans", "pants", "scissors", "thanks", "yes", "unless",
    "always", "perhaps", "whereas", "sometimes", "nevertheless", "across", "plus",
    "minus", "bonus", "virus", "status", "campus", "census", "focus", "basis",
    "analysis", "crisis", "thesis", "axis", "tennis", "iris", "clothes", "ethics",
    "kudos", "diabetes", "measles",
];

pub const KNOWN_ADJECTIVES: &[&str] = &[
    "good", "bad", "great", "nice", "easy", "happy", "cheap", "big", "small", "new",
    "old", "high", "low", "long", "short", "poor", "rich", "terrible", "awful",
    "excellent", "amazing", "awesome", "horrible", "wonderful", "perfect", "strange",
    "useless", "useful", "beautiful", "ugly", "expensive", "broken",
    "boring", "interesting", "disappointed", "disappointing", "satisfied", "worth",
    "fine", "best", "worst", "better", "worse", "sure", "able", "real", "fake",
    "original", "fast", "slow", "sturdy", "flimsy", "large", "little", "free",
];

pub const KNOWN_ADVERBS: &[&str] = &[
    "faster", "harder", "sooner", "later", "earlier", "often", "always", "never",
    "well", "also", "even", "still", "really", "almost", "already", "quite",
    "rather", "perhaps", "maybe", "soon", "ever", "away", "back", "together", "yet",
    "instead", "anyway", "else", "however", "otherwise", "therefore", "indeed",
    "somewhat", "sometimes", "definitely", "absolutely", "highly", "pretty",
];

pub const KNOWN_NOUNS: &[&str] = &[
    "thing", "nothing", "something", "anything", "everything", "morning", "evening",
    "ceiling", "wedding", "pudding", "string", "spring", "king", "ring", "wing",
    "sibling", "darling", "during", "building", "clothing", "packaging", "shipping",
    "setting", "painting", "feeling", "meeting", "beginning", "ending", "rating",
    "bed", "red", "seed", "need", "speed", "feed", "weed", "breed", "greed", "sled",
    "shed", "hundred", "kindred", "sacred", "naked", "wicked", "wretched",
];

/// Adjective-forming suffixes used when a word is not listed.
pub const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "ive", "able", "ible", "less", "ish", "ical"];

/// Words ending in -ly that are not adverbs.
pub const LY_NON_ADVERBS: &[&str] = &[
    "family", "supply", "reply", "apply", "july", "italy", "ugly", "holy", "jelly",
    "belly", "bully", "rally", "ally", "early", "lovely", "friendly", "lonely",
    "silly", "likely", "only", "fly", "assembly", "anomaly", "monopoly", "butterfly",
];

fn to_set(words: &[&'static str]) -> HashSet<&'static str> {
    words.iter().copied().collect()
}

fn to_map(pairs: &[(&'static str, &'static str)]) -> HashMap<&'static str, &'static str> {
    pairs.iter().copied().collect()
}

pub static STOPWORD_SET:    LazyLock<HashSet<&'static str>> = LazyLock::new(|| to_set(STOPWORDS));
pub static VERB_MAP:        LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| to_map(VERB_FORMS));
pub static NOUN_MAP:        LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| to_map(NOUN_FORMS));
pub static ADJECTIVE_MAP:   LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| to_map(ADJECTIVE_FORMS));
pub static INVARIANT_SET:   LazyLock<HashSet<&'static str>> = LazyLock::new(|| to_set(INVARIANT_WORDS));
pub static ADJECTIVE_SET:   LazyLock<HashSet<&'static str>> = LazyLock::new(|| to_set(KNOWN_ADJECTIVES));
pub static ADVERB_SET:      LazyLock<HashSet<&'static str>> = LazyLock::new(|| to_set(KNOWN_ADVERBS));
pub static NOUN_SET:        LazyLock<HashSet<&'static str>> = LazyLock::new(|| to_set(KNOWN_NOUNS));
pub static LY_EXCEPTIONS:   LazyLock<HashSet<&'static str>> = LazyLock::new(|| to_set(LY_NON_ADVERBS));

/// True for words removed by stopword filtering. "not" is never removed.
pub fn is_stopword(word: &str) -> bool {
    word != NEGATION && STOPWORD_SET.contains(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negation_is_listed_but_kept() {
        assert!(STOPWORD_SET.contains(NEGATION));
        assert!(!is_stopword("not"));
        assert!(is_stopword("the"));
    }

    #[test]
    fn test_stopword_list_size() {
        assert_eq!(STOPWORD_SET.len(), 179);
    }
}
