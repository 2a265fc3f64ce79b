//! Tiny deterministic stand-in for the language model (random weights).
//!
//! Scores are `lm_head · rms_norm(mean(embeddings of input ids))`. Good enough
//! to drive the pipeline end to end in demos, tests and benches.

use super::scorer::NextTokenScorer;
use crate::errors::InferenceError;
use crate::tokenizer::TokenId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default hidden size of the demo scorer.
pub const DEMO_HIDDEN_SIZE: usize = 32;

const RMS_NORM_EPS: f32 = 1e-6;

/// Demo scorer with seeded random embeddings and output projection.
#[derive(Debug, Clone)]
pub struct DemoScorer {
    vocab_size: usize,
    hidden_size: usize,
    /// Token embeddings [vocab_size][hidden_size]
    embeddings: Vec<Vec<f32>>,
    /// Output projection [vocab_size][hidden_size]
    lm_head: Vec<Vec<f32>>,
    norm: Vec<f32>,
}

fn rand_matrix(rng: &mut impl Rng, rows: usize, cols: usize, scale: f32) -> Vec<Vec<f32>> {
    (0..rows)
        .map(|_| (0..cols).map(|_| rng.gen_range(-scale..scale)).collect())
        .collect()
}

impl DemoScorer {
    /// Deterministic demo scorer (for tests and golden outputs).
    pub fn seeded(vocab_size: usize, hidden_size: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let hidden_size = hidden_size.max(1);
        let embeddings = rand_matrix(&mut rng, vocab_size, hidden_size, 0.5);
        let lm_head = rand_matrix(&mut rng, vocab_size, hidden_size, 1.0);
        let norm = (0..hidden_size)
            .map(|_| rng.gen_range(0.9f32..=1.1f32))
            .collect();
        Self {
            vocab_size,
            hidden_size,
            embeddings,
            lm_head,
            norm,
        }
    }

    /// In-place RMS normalization: x = (x / rms) * weight.
    fn apply_rms_norm(&self, hidden: &mut [f32]) {
        let n = hidden.len() as f32;
        let square_sum: f32 = hidden.iter().map(|x| x * x).sum();
        let rms = (square_sum / n + RMS_NORM_EPS).sqrt();
        for (h, w) in hidden.iter_mut().zip(&self.norm) {
            *h = (*h / rms) * w;
        }
    }
}

impl NextTokenScorer for DemoScorer {
    fn score(&self, input_ids: &[TokenId]) -> Result<Vec<f32>, InferenceError> {
        if input_ids.is_empty() {
            return Err(InferenceError::EmptyInput);
        }
        let mut hidden = vec![0.0f32; self.hidden_size];
        for &id in input_ids {
            let row = self
                .embeddings
                .get(id as usize)
                .ok_or(InferenceError::TokenOutOfRange {
                    token: id,
                    vocab_size: self.vocab_size,
                })?;
            for (h, &e) in hidden.iter_mut().zip(row) {
                *h += e;
            }
        }
        let count = input_ids.len() as f32;
        for h in hidden.iter_mut() {
            *h /= count;
        }
        self.apply_rms_norm(&mut hidden);

        Ok(self
            .lm_head
            .iter()
            .map(|row| row.iter().zip(&hidden).map(|(w, h)| w * h).sum())
            .collect())
    }

    fn vocab_size(&self) -> usize {
        self.vocab_size
    }
}
