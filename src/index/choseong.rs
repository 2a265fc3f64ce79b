//! Token ids bucketed by the initial consonant of their first character.

use crate::hangul::Choseong;
use crate::tokenizer::TokenId;

#[derive(Debug, Clone)]
pub struct ChoseongIndex {
    buckets: [Vec<TokenId>; Choseong::COUNT],
}

impl ChoseongIndex {
    pub fn new() -> Self {
        Self {
            buckets: std::array::from_fn(|_| Vec::new()),
        }
    }

    /// Append `id` to the bucket of `choseong`, keeping insertion order.
    pub fn push(&mut self, choseong: Choseong, id: TokenId) {
        self.buckets[choseong.index()].push(id);
    }

    pub fn bucket(&self, choseong: Choseong) -> &[TokenId] {
        &self.buckets[choseong.index()]
    }

    /// Total ids across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// `(consonant, bucket size)` for all 19 consonants.
    pub fn bucket_sizes(&self) -> Vec<(Choseong, usize)> {
        Choseong::all().map(|c| (c, self.bucket(c).len())).collect()
    }
}

impl Default for ChoseongIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_order() {
        let mut index = ChoseongIndex::new();
        let m = Choseong::from_symbol('ㅁ').unwrap();
        index.push(m, 103);
        index.push(m, 101);
        index.push(m, 102);
        assert_eq!(index.bucket(m), &[103, 101, 102]);
        assert_eq!(index.len(), 3);
        assert!(index.bucket(Choseong::from_symbol('ㄱ').unwrap()).is_empty());
    }
}
