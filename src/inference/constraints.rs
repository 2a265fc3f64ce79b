//! Allowed-token whitelist for the next position.

use crate::tokenizer::TokenId;
use std::collections::HashSet;

/// Token ids permitted at the next step. Empty means no suggestion is possible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CandidateSet {
    allowed: HashSet<TokenId>,
}

impl CandidateSet {
    pub fn new(allowed: impl IntoIterator<Item = TokenId>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.allowed.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.allowed.iter().copied()
    }

    /// Ids in ascending order.
    pub fn to_sorted_vec(&self) -> Vec<TokenId> {
        let mut ids: Vec<TokenId> = self.iter().collect();
        ids.sort_unstable();
        ids
    }

    /// Mask logits in place: set logits[i] = -inf for i not in the set.
    pub fn apply(&self, logits: &mut [f32]) {
        for (i, x) in logits.iter_mut().enumerate() {
            if !self.allowed.contains(&(i as TokenId)) {
                *x = f32::NEG_INFINITY;
            }
        }
    }
}

impl FromIterator<TokenId> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = TokenId>>(iter: I) -> Self {
        Self::new(iter)
    }
}
