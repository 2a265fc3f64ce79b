//! Whitelist resolution: which vocabulary tokens may complete a fragment.

use super::constraints::CandidateSet;
use crate::hangul;
use crate::index::VocabularyIndex;
use crate::tokenizer::TokenId;
use std::collections::HashSet;

/// Candidate token ids for `fragment`, minus `exclude`.
///
/// A lone consonant (`"ㅁ"`) selects its choseong bucket. Anything else is a
/// prefix search over the syllable index, skipping the key equal to the
/// fragment itself. Empty fragments and fragments with control characters
/// resolve to the empty set.
pub fn resolve(
    fragment: &str,
    index: &VocabularyIndex,
    exclude: &HashSet<TokenId>,
) -> CandidateSet {
    if fragment.is_empty() || fragment.chars().any(char::is_control) {
        return CandidateSet::empty();
    }

    if let Some(choseong) = hangul::as_lone_choseong(fragment) {
        return index
            .choseong
            .bucket(choseong)
            .iter()
            .copied()
            .filter(|id| !exclude.contains(id))
            .collect();
    }

    index
        .syllable
        .with_prefix(fragment)
        .filter(|(key, _)| *key != fragment)
        .flat_map(|(_, ids)| ids.iter().copied())
        .filter(|id| !exclude.contains(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::VocabEntry;

    fn index(pairs: &[(&str, TokenId)]) -> VocabularyIndex {
        VocabularyIndex::build(pairs.iter().map(|&(t, id)| VocabEntry::new(t, id))).unwrap()
    }

    #[test]
    fn test_syllable_prefix_skips_exact_key() {
        let idx = index(&[("맛집", 101), ("맛있는", 102), ("맛", 103)]);
        let set = resolve("맛", &idx, &HashSet::new());
        assert_eq!(set.to_sorted_vec(), vec![101, 102]);
    }

    #[test]
    fn test_exact_key_drops_every_id_under_it() {
        let idx = index(&[("▁맛", 7), ("맛", 8), ("맛집", 9)]);
        let set = resolve("맛", &idx, &HashSet::new());
        assert_eq!(set.to_sorted_vec(), vec![9]);
    }

    #[test]
    fn test_choseong_bucket_with_exclude() {
        let idx = index(&[("맛집", 101), ("맛있는", 102), ("멋", 103), ("강", 104)]);
        let exclude: HashSet<TokenId> = [103].into_iter().collect();
        let set = resolve("ㅁ", &idx, &exclude);
        assert_eq!(set.to_sorted_vec(), vec![101, 102]);
    }

    #[test]
    fn test_multi_char_fragment_uses_prefix() {
        let idx = index(&[("맛집", 1), ("맛집추천", 2), ("맛있는", 3)]);
        let set = resolve("맛집", &idx, &HashSet::new());
        assert_eq!(set.to_sorted_vec(), vec![2]);
    }

    #[test]
    fn test_consonant_pair_is_prefix_search() {
        let idx = index(&[("ㅁㅁ", 1), ("ㅁㅁㅁ", 2), ("맛", 3)]);
        let set = resolve("ㅁㅁ", &idx, &HashSet::new());
        assert_eq!(set.to_sorted_vec(), vec![2]);
    }

    #[test]
    fn test_empty_and_malformed_fragments() {
        let idx = index(&[("맛집", 1)]);
        assert!(resolve("", &idx, &HashSet::new()).is_empty());
        assert!(resolve("맛\u{7}", &idx, &HashSet::new()).is_empty());
        assert!(resolve("없음", &idx, &HashSet::new()).is_empty());
    }

    #[test]
    fn test_resolve_is_pure() {
        let idx = index(&[("맛집", 101), ("맛있는", 102), ("맛", 103)]);
        let exclude: HashSet<TokenId> = [102].into_iter().collect();
        assert_eq!(resolve("맛", &idx, &exclude), resolve("맛", &idx, &exclude));
    }
}
