// ============================================================
// Layer 4 — Fixed-Length Sequences
// ============================================================
// The model reads exactly SEQUENCE_LEN ids per review. Shorter
// reviews are padded on the right with PAD_ID, longer ones are
// cut at the right ("post" padding and truncation), so the
// opening words of a review are always kept.

/// Ids per model input row.
pub const SEQUENCE_LEN: usize = 128;

/// Padding id, also reserved as "[PAD]" in the vocabulary.
pub const PAD_ID: u32 = 0;

/// Pad or truncate `ids` to exactly `len` entries.
pub fn pad_post(mut ids: Vec<u32>, len: usize) -> Vec<u32> {
    ids.truncate(len);
    ids.resize(len, PAD_ID);
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_sequence_is_padded_at_the_end() {
        assert_eq!(pad_post(vec![5, 6], 4), vec![5, 6, 0, 0]);
    }

    #[test]
    fn test_long_sequence_keeps_the_head() {
        let ids: Vec<u32> = (1..=200).collect();
        let out = pad_post(ids, SEQUENCE_LEN);
        assert_eq!(out.len(), SEQUENCE_LEN);
        assert_eq!(out[0], 1);
        assert_eq!(out[SEQUENCE_LEN - 1], 128);
    }

    #[test]
    fn test_empty_sequence_is_all_padding() {
        assert_eq!(pad_post(Vec::new(), 3), vec![PAD_ID; 3]);
    }
}
