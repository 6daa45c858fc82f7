// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Reads and writes review corpora in JSON Lines form: one JSON
// object per line, blank lines ignored.
//
//   raw corpus      {"title": "...", "content": "...", "label": 1}
//   cleaned corpus  {"content": "...", "label": 1}
//
// Corpora travel through the blob store as bytes, so parsing
// works on &[u8] and writing returns Vec<u8>. Only the local
// ingest step touches the filesystem.
//
// A malformed line fails the whole parse and names the line
// (1-based), so a broken corpus never trains half a model.
//
// Reference: JSON Lines (https://jsonlines.org)
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{fs, path::Path};

use crate::domain::review::{LabeledReview, RawReview};

/// Read a local corpus file as bytes, checking it parses as a
/// raw corpus before anything is uploaded.
pub fn read_local_corpus(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path)
        .with_context(|| format!("Cannot read corpus '{}'", path.display()))?;

    let reviews = parse_raw_corpus(&bytes)
        .with_context(|| format!("Corpus '{}' is not valid JSON Lines", path.display()))?;

    tracing::info!("Read {} raw reviews from {}", reviews.len(), path.display());
    Ok(bytes)
}

pub fn parse_raw_corpus(bytes: &[u8]) -> Result<Vec<RawReview>> {
    let reviews: Vec<RawReview> = parse_lines(bytes)?;
    check_labels(reviews.iter().map(|r| r.label))?;
    Ok(reviews)
}

pub fn parse_labeled_corpus(bytes: &[u8]) -> Result<Vec<LabeledReview>> {
    let reviews: Vec<LabeledReview> = parse_lines(bytes)?;
    check_labels(reviews.iter().map(|r| r.label))?;
    Ok(reviews)
}

/// Serialise records one per line, each line newline-terminated.
pub fn to_jsonl<T: Serialize>(records: &[T]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for record in records {
        serde_json::to_writer(&mut out, record).context("Cannot serialise corpus record")?;
        out.push(b'\n');
    }
    Ok(out)
}

fn parse_lines<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>> {
    let text = std::str::from_utf8(bytes).context("Corpus is not valid UTF-8")?;

    let mut records = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(line)
            .with_context(|| format!("Malformed corpus record on line {}", i + 1))?;
        records.push(record);
    }
    Ok(records)
}

fn check_labels(labels: impl Iterator<Item = u8>) -> Result<()> {
    for (i, label) in labels.enumerate() {
        if label > 1 {
            bail!("Record {} has label {}, expected 0 or 1", i + 1, label);
        }
    }
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_raw_lines_and_skips_blanks() {
        let bytes = b"{\"title\":\"Nice\",\"content\":\"works\",\"label\":1}\n\n{\"content\":\"broke\",\"label\":0}\n";
        let reviews = parse_raw_corpus(bytes).unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].full_text(), "Nice works");
        assert_eq!(reviews[1].title, None);
    }

    #[test]
    fn test_malformed_line_names_the_line() {
        let bytes = b"{\"content\":\"ok\",\"label\":1}\nnot json\n";
        let err = parse_labeled_corpus(bytes).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn test_rejects_labels_outside_zero_one() {
        let bytes = b"{\"content\":\"ok\",\"label\":2}\n";
        assert!(parse_labeled_corpus(bytes).is_err());
    }

    #[test]
    fn test_written_corpus_reads_back() {
        let reviews = vec![LabeledReview::new("great value", 1), LabeledReview::new("", 0)];
        let bytes   = to_jsonl(&reviews).unwrap();
        assert_eq!(bytes.iter().filter(|&&b| b == b'\n').count(), 2);
        assert_eq!(parse_labeled_corpus(&bytes).unwrap(), reviews);
    }

    #[test]
    fn test_read_local_corpus() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.jsonl");
        fs::write(&path, "{\"title\":\"t\",\"content\":\"c\",\"label\":0}\n").unwrap();
        let bytes = read_local_corpus(&path).unwrap();
        assert_eq!(parse_raw_corpus(&bytes).unwrap().len(), 1);
        assert!(read_local_corpus(&dir.path().join("missing.jsonl")).is_err());
    }
}
