use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One encoded review: SEQUENCE_LEN padded ids and its label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSample {
    pub input_ids: Vec<u32>,
    pub label:     u8,
}

impl ReviewSample {
    pub fn new(input_ids: Vec<u32>, label: u8) -> Self {
        Self { input_ids, label }
    }
}

#[derive(Clone)]
pub struct ReviewDataset {
    samples: Vec<ReviewSample>,
}

impl ReviewDataset {
    pub fn new(samples: Vec<ReviewSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }
}

impl Dataset<ReviewSample> for ReviewDataset {
    fn get(&self, index: usize) -> Option<ReviewSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
