// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Builds, encodes with, and (de)serialises the word-level
// vocabulary the model is trained on.
//
// The vocabulary is fitted on the training split only:
//   id 0 = [PAD]
//   id 1 = [UNK]
//   id 2.. = most frequent words, ties broken by first appearance
// capped at `max_ids` ids in total (10,000 for training).
//
// In tokenizers 0.15, train_from_files requires Trainer::Model
// to equal ModelWrapper. We sidestep the trainer entirely: count
// words ourselves, write the HuggingFace tokenizer JSON by hand
// and load it back.
//
// Words missing from the vocabulary encode to [UNK] and are then
// dropped, so a review of only unknown words encodes to nothing
// and pads to all zeros.
//
// Blob layout (one JSON document):
//   {
//     "pair_id":    "...",   ← shared with the model artifact
//     "vocab_size": 9874,
//     "tokenizer":  { ...HuggingFace tokenizer JSON... }
//   }

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokenizers::Tokenizer;

pub const PAD_TOKEN: &str = "[PAD]";
pub const UNK_TOKEN: &str = "[UNK]";
pub const UNK_ID:    u32  = 1;

/// Number of ids reserved for special tokens.
const RESERVED_IDS: usize = 2;

/// Vocabulary size used for training.
pub const MAX_VOCAB_IDS: usize = 10_000;

#[derive(Serialize, Deserialize)]
struct TokenizerEnvelope {
    pair_id:    String,
    vocab_size: usize,
    tokenizer:  serde_json::Value,
}

pub struct VocabTokenizer {
    pair_id:    String,
    vocab_size: usize,
    tokenizer:  Tokenizer,
}

impl VocabTokenizer {
    /// Fit a fresh vocabulary on already-normalised texts.
    pub fn fit(texts: &[String], max_ids: usize, pair_id: impl Into<String>) -> Result<Self> {
        // ── Step 1: Count words, remembering where each first appeared ────────
        let mut freq: HashMap<&str, (usize, usize)> = HashMap::new();
        let mut order = 0usize;
        for text in texts {
            for word in text.split_whitespace() {
                let entry = freq.entry(word).or_insert((0, order));
                entry.0 += 1;
                order   += 1;
            }
        }

        // ── Step 2: Most frequent first, earliest first on ties ───────────────
        let mut words: Vec<(&str, (usize, usize))> = freq.into_iter().collect();
        words.sort_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_b.cmp(count_a).then(first_a.cmp(first_b))
        });
        words.truncate(max_ids.saturating_sub(RESERVED_IDS));

        // ── Step 3: Build vocab JSON ──────────────────────────────────────────
        let mut vocab = serde_json::Map::new();
        vocab.insert(PAD_TOKEN.to_string(), 0.into());
        vocab.insert(UNK_TOKEN.to_string(), UNK_ID.into());
        for (id, (word, _)) in words.iter().enumerate() {
            vocab.insert(word.to_string(), (id + RESERVED_IDS).into());
        }
        let vocab_size = words.len() + RESERVED_IDS;

        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [
                {"id": 0, "content": PAD_TOKEN, "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 1, "content": UNK_TOKEN, "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
            ],
            "normalizer": null,
            "pre_tokenizer": {
                "type": "WhitespaceSplit"
            },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": UNK_TOKEN
            }
        });

        let tokenizer = load_tokenizer_json(&tokenizer_json)?;
        tracing::info!("Tokenizer fitted: {} ids from {} texts", vocab_size, texts.len());

        Ok(Self { pair_id: pair_id.into(), vocab_size, tokenizer })
    }

    pub fn pair_id(&self) -> &str {
        &self.pair_id
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// Encode normalised text, returning the known ids and how
    /// many unknown words were dropped.
    pub fn encode_counting(&self, text: &str) -> Result<(Vec<u32>, usize)> {
        let encoding = self.tokenizer
            .encode(text, false)
            .map_err(|e| anyhow!("Tokenizer encode failed: {e}"))?;

        let all = encoding.get_ids();
        let ids: Vec<u32> = all.iter().copied().filter(|&id| id != UNK_ID).collect();
        let dropped = all.len() - ids.len();
        Ok((ids, dropped))
    }

    /// Encode normalised text, dropping unknown words.
    pub fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let (ids, dropped) = self.encode_counting(text)?;
        if dropped > 0 {
            tracing::debug!("Dropped {} out-of-vocabulary tokens", dropped);
        }
        Ok(ids)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let json = self.tokenizer
            .to_string(false)
            .map_err(|e| anyhow!("Cannot serialise tokenizer: {e}"))?;
        let envelope = TokenizerEnvelope {
            pair_id:    self.pair_id.clone(),
            vocab_size: self.vocab_size,
            tokenizer:  serde_json::from_str(&json)?,
        };
        Ok(serde_json::to_vec(&envelope)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let envelope: TokenizerEnvelope = serde_json::from_slice(bytes)
            .context("Tokenizer blob is not a valid tokenizer envelope")?;
        let tokenizer = load_tokenizer_json(&envelope.tokenizer)?;

        let actual = tokenizer.get_vocab_size(true);
        if actual != envelope.vocab_size {
            anyhow::bail!(
                "Tokenizer blob declares {} ids but holds {}",
                envelope.vocab_size,
                actual
            );
        }

        Ok(Self {
            pair_id:    envelope.pair_id,
            vocab_size: envelope.vocab_size,
            tokenizer,
        })
    }
}

fn load_tokenizer_json(json: &serde_json::Value) -> Result<Tokenizer> {
    let bytes = serde_json::to_vec(json)?;
    Tokenizer::from_bytes(bytes).map_err(|e| anyhow!("Cannot load tokenizer JSON: {e}"))
}
