// ============================================================
// Layer 6 — Model Artifact Codec
// ============================================================
// Packs a trained SentimentModel into one blob and unpacks it
// again, using Burn's BinBytesRecorder for the weights.
//
// What goes into the blob:
//   1. Header length (u32, little endian)
//   2. Header JSON: pair_id, vocab_size and the model config
//   3. Weight bytes from BinBytesRecorder
//
// Why store the config with the weights?
//   To load the weights we must first rebuild the exact same
//   architecture. The header carries everything needed to do
//   that, so the blob stands on its own.
//
// The pair_id and vocab_size tie this blob to the tokenizer blob
// written in the same training run (see tokenizer_store.rs).
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{anyhow, bail, Context, Result};
use burn::{
    prelude::*,
    record::{BinBytesRecorder, FullPrecisionSettings, Recorder},
};
use serde::{Deserialize, Serialize};

use crate::ml::model::{SentimentModel, SentimentModelConfig};

const LEN_PREFIX: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactHeader {
    pub pair_id:    String,
    pub vocab_size: usize,
    pub model:      SentimentModelConfig,
}

/// Serialise header and weights into one blob.
pub fn encode_model<B: Backend>(
    model:  SentimentModel<B>,
    header: &ArtifactHeader,
) -> Result<Vec<u8>> {
    let header_json = serde_json::to_vec(header).context("Cannot serialise model header")?;
    let header_len  = u32::try_from(header_json.len()).context("Model header too large")?;

    let recorder = BinBytesRecorder::<FullPrecisionSettings>::default();
    let weights  = Recorder::<B>::record(&recorder, model.into_record(), ())
        .map_err(|e| anyhow!("Cannot record model weights: {e:?}"))?;

    let mut out = Vec::with_capacity(LEN_PREFIX + header_json.len() + weights.len());
    out.extend_from_slice(&header_len.to_le_bytes());
    out.extend_from_slice(&header_json);
    out.extend_from_slice(&weights);

    tracing::debug!("Encoded model artifact: {} bytes", out.len());
    Ok(out)
}

/// Read only the header, without touching the weights.
pub fn decode_header(bytes: &[u8]) -> Result<(ArtifactHeader, &[u8])> {
    if bytes.len() < LEN_PREFIX {
        bail!("Model blob is truncated ({} bytes)", bytes.len());
    }
    let mut prefix = [0u8; LEN_PREFIX];
    prefix.copy_from_slice(&bytes[..LEN_PREFIX]);
    let header_len = u32::from_le_bytes(prefix) as usize;

    let body = &bytes[LEN_PREFIX..];
    if body.len() < header_len {
        bail!("Model blob header claims {} bytes, only {} present", header_len, body.len());
    }
    let header: ArtifactHeader = serde_json::from_slice(&body[..header_len])
        .context("Model blob header is not valid JSON")?;

    Ok((header, &body[header_len..]))
}

/// Rebuild the model described by the header and load its weights.
/// Dropout is kept at its configured rate; callers serving
/// predictions use a non-autodiff backend, where dropout is a no-op.
pub fn decode_model<B: Backend>(
    bytes:  &[u8],
    device: &B::Device,
) -> Result<(ArtifactHeader, SentimentModel<B>)> {
    let (header, weights) = decode_header(bytes)?;

    if header.model.vocab_size != header.vocab_size {
        bail!(
            "Model blob header is inconsistent: vocab_size {} vs model config {}",
            header.vocab_size,
            header.model.vocab_size
        );
    }

    let recorder = BinBytesRecorder::<FullPrecisionSettings>::default();
    let record   = Recorder::<B>::load(&recorder, weights.to_vec(), device)
        .map_err(|e| anyhow!("Cannot load model weights: {e:?}"))?;

    let model = header.model.init::<B>(device).load_record(record);
    Ok((header, model))
}
