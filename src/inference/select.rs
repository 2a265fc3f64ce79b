//! Constrained next-token selection: mask, rank, keep the top survivors.
//!
//! Probabilities come from a softmax over the *unmasked* scores, so they stay
//! comparable across different fragment constraints.

use super::constraints::CandidateSet;
use crate::tokenizer::TokenId;
use std::cmp::Ordering;
use std::collections::HashSet;

/// A selected token with its pre-mask probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredToken {
    pub token_id: TokenId,
    pub probability: f32,
}

/// Numerically stable softmax over the full vector.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max_ln = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if !max_ln.is_finite() {
        return vec![0.0; logits.len()];
    }
    let exp: Vec<f32> = logits.iter().map(|&v| (v - max_ln).exp()).collect();
    let sum: f32 = exp.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        return vec![0.0; logits.len()];
    }
    exp.iter().map(|e| e / sum).collect()
}

/// Descending score, then ascending id.
fn rank_order(a: &(TokenId, f32), b: &(TokenId, f32)) -> Ordering {
    b.1.total_cmp(&a.1).then(a.0.cmp(&b.0))
}

/// Up to `top_n` whitelisted tokens ordered by raw score.
///
/// Tokens in `exclude`, ids outside `raw_scores`, and positions whose masked
/// score is `-inf` or NaN are never returned, so the result may be shorter
/// than `top_n`.
pub fn select(
    raw_scores: &[f32],
    whitelist: &CandidateSet,
    exclude: &HashSet<TokenId>,
    top_n: usize,
) -> Vec<ScoredToken> {
    if whitelist.is_empty() || top_n == 0 {
        return Vec::new();
    }

    let probabilities = softmax(raw_scores);
    let mut masked = raw_scores.to_vec();
    whitelist.apply(&mut masked);
    for &id in exclude {
        if let Some(x) = masked.get_mut(id as usize) {
            *x = f32::NEG_INFINITY;
        }
    }

    let mut ranked: Vec<(TokenId, f32)> = whitelist
        .iter()
        .filter_map(|id| masked.get(id as usize).map(|&score| (id, score)))
        .filter(|(_, score)| *score != f32::NEG_INFINITY && !score.is_nan())
        .collect();

    if ranked.len() > top_n {
        ranked.select_nth_unstable_by(top_n - 1, rank_order);
        ranked.truncate(top_n);
    }
    ranked.sort_by(rank_order);

    ranked
        .into_iter()
        .map(|(token_id, _)| ScoredToken {
            token_id,
            probability: probabilities[token_id as usize],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(selected: &[ScoredToken]) -> Vec<TokenId> {
        selected.iter().map(|s| s.token_id).collect()
    }

    #[test]
    fn test_softmax_sum_one() {
        let probs = softmax(&[0.0, 1.0, 2.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn test_softmax_all_neg_inf() {
        assert_eq!(softmax(&[f32::NEG_INFINITY; 3]), vec![0.0; 3]);
    }

    #[test]
    fn test_ranks_whitelist_by_score() {
        let raw = [5.0, 1.0, 3.0, 2.0, 4.0];
        let whitelist = CandidateSet::new([1, 2, 3]);
        let out = select(&raw, &whitelist, &HashSet::new(), 2);
        assert_eq!(ids(&out), vec![2, 3]);
    }

    #[test]
    fn test_probability_is_pre_mask() {
        let raw = [5.0, 1.0, 3.0];
        let probs = softmax(&raw);
        let out = select(&raw, &CandidateSet::new([1, 2]), &HashSet::new(), 5);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].probability, probs[2]);
        assert_eq!(out[1].probability, probs[1]);
        let total: f32 = out.iter().map(|s| s.probability).sum();
        assert!(total < 0.5);
    }

    #[test]
    fn test_never_padded() {
        let raw = [1.0; 10];
        let out = select(&raw, &CandidateSet::new([4, 7]), &HashSet::new(), 5);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_ties_break_by_ascending_id() {
        let raw = [2.0, 2.0, 2.0, 2.0];
        let out = select(&raw, &CandidateSet::new([3, 0, 2]), &HashSet::new(), 3);
        assert_eq!(ids(&out), vec![0, 2, 3]);
    }

    #[test]
    fn test_exclude_and_out_of_range() {
        let raw = [1.0, 2.0, 3.0];
        let exclude: HashSet<TokenId> = [2].into_iter().collect();
        let out = select(&raw, &CandidateSet::new([1, 2, 99]), &exclude, 3);
        assert_eq!(ids(&out), vec![1]);
    }

    #[test]
    fn test_neg_inf_and_nan_raw_scores_dropped() {
        let raw = [f32::NEG_INFINITY, f32::NAN, 0.5];
        let out = select(&raw, &CandidateSet::new([0, 1, 2]), &HashSet::new(), 3);
        assert_eq!(ids(&out), vec![2]);
    }

    #[test]
    fn test_empty_whitelist_or_zero_n() {
        let raw = [1.0, 2.0];
        assert!(select(&raw, &CandidateSet::empty(), &HashSet::new(), 3).is_empty());
        assert!(select(&raw, &CandidateSet::new([0]), &HashSet::new(), 0).is_empty());
    }

    #[test]
    fn test_select_is_pure() {
        let raw: Vec<f32> = (0..50).map(|i| ((i * 7) % 11) as f32).collect();
        let whitelist: CandidateSet = (0..50).step_by(3).collect();
        let a = select(&raw, &whitelist, &HashSet::new(), 6);
        let b = select(&raw, &whitelist, &HashSet::new(), 6);
        assert_eq!(a, b);
        assert_eq!(a.len(), 6);
    }
}
