// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Turns a local raw corpus into the cleaned corpus training
// reads, going through the blob store at every hop:
//
//   Step 1: Ingest     local JSON Lines file → raw corpus key
//   Step 2: Transform  raw blob → normalised {content, label}
//   Step 3: Load       cleaned JSON Lines → cleaned corpus key
//
// The first failure aborts the remaining steps.

use anyhow::{Context, Result};
use std::{path::PathBuf, sync::Arc};

use crate::data::{
    loader::{parse_raw_corpus, read_local_corpus, to_jsonl},
    normalizer::Normalizer,
};
use crate::domain::{review::LabeledReview, traits::BlobStore};
use crate::infra::blob_store::{CLEANED_CORPUS_KEY, RAW_CORPUS_KEY};

pub struct PrepareUseCase {
    store:      Arc<dyn BlobStore>,
    input:      PathBuf,
    normalizer: Normalizer,
}

impl PrepareUseCase {
    pub fn new(store: Arc<dyn BlobStore>, input: impl Into<PathBuf>) -> Self {
        Self { store, input: input.into(), normalizer: Normalizer::new() }
    }

    /// Run all three steps. Returns the number of cleaned reviews.
    pub fn execute(&self) -> Result<usize> {
        // ── Step 1: Ingest ────────────────────────────────────────────────────
        let raw = read_local_corpus(&self.input)?;
        self.store
            .put_blob(RAW_CORPUS_KEY, &raw)
            .context("Cannot upload raw corpus")?;
        tracing::info!("Ingested '{}' into '{}'", self.input.display(), RAW_CORPUS_KEY);

        // ── Step 2: Transform ─────────────────────────────────────────────────
        let raw = self.store
            .get_blob(RAW_CORPUS_KEY)
            .context("Cannot read back raw corpus")?;
        let cleaned: Vec<LabeledReview> = parse_raw_corpus(&raw)?
            .iter()
            .map(|r| LabeledReview::new(self.normalizer.normalize(&r.full_text()), r.label))
            .collect();
        let empty = cleaned.iter().filter(|r| r.content.is_empty()).count();
        if empty > 0 {
            tracing::debug!("{} reviews normalised to empty text", empty);
        }

        // ── Step 3: Load ──────────────────────────────────────────────────────
        self.store
            .put_blob(CLEANED_CORPUS_KEY, &to_jsonl(&cleaned)?)
            .context("Cannot upload cleaned corpus")?;
        tracing::info!("Stored {} cleaned reviews at '{}'", cleaned.len(), CLEANED_CORPUS_KEY);

        Ok(cleaned.len())
    }
}
