//! Hangul initial-consonant (choseong) classification.
//!
//! A precomposed syllable in `U+AC00..=U+D7A3` is laid out as
//! `base + (initial * 21 + medial) * 28 + final`, so the initial index is
//! `(c - base) / (21 * 28)`.

use std::fmt;

/// First precomposed Hangul syllable, '가'.
pub const SYLLABLE_BASE: u32 = 0xAC00;
/// Last precomposed Hangul syllable, '힣'.
pub const SYLLABLE_LAST: u32 = 0xD7A3;
/// Number of medial vowels (jungseong).
pub const MEDIAL_COUNT: u32 = 21;
/// Number of finals (jongseong), including "no final".
pub const FINAL_COUNT: u32 = 28;

/// The 19 initial consonants as compatibility jamo, in syllable-block order.
pub const CHOSEONG_SYMBOLS: [char; 19] = [
    'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ', 'ㅋ',
    'ㅌ', 'ㅍ', 'ㅎ',
];

/// One of the 19 initial consonants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Choseong(u8);

impl Choseong {
    pub const COUNT: usize = CHOSEONG_SYMBOLS.len();

    /// Consonant at `index` in syllable-block order, if `index < 19`.
    pub fn from_index(index: usize) -> Option<Self> {
        (index < Self::COUNT).then_some(Self(index as u8))
    }

    /// The bare consonant `c` itself, if it is one of the 19 symbols.
    pub fn from_symbol(c: char) -> Option<Self> {
        CHOSEONG_SYMBOLS
            .iter()
            .position(|&s| s == c)
            .map(|i| Self(i as u8))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn symbol(self) -> char {
        CHOSEONG_SYMBOLS[self.index()]
    }

    /// All 19 consonants in order.
    pub fn all() -> impl Iterator<Item = Choseong> {
        (0..Self::COUNT as u8).map(Choseong)
    }
}

impl fmt::Display for Choseong {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Whether `c` is a precomposed Hangul syllable.
pub fn is_syllable(c: char) -> bool {
    (SYLLABLE_BASE..=SYLLABLE_LAST).contains(&(c as u32))
}

/// Initial consonant of `c`.
///
/// Syllables decompose to their initial; bare consonant symbols map to
/// themselves; everything else is `None`.
pub fn classify(c: char) -> Option<Choseong> {
    if is_syllable(c) {
        let index = (c as u32 - SYLLABLE_BASE) / (MEDIAL_COUNT * FINAL_COUNT);
        return Choseong::from_index(index as usize);
    }
    Choseong::from_symbol(c)
}

/// Whether `fragment` is exactly one bare consonant symbol, e.g. `"ㅁ"`.
pub fn as_lone_choseong(fragment: &str) -> Option<Choseong> {
    let mut chars = fragment.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Choseong::from_symbol(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_classify_syllables() {
        assert_eq!(classify('가').map(Choseong::symbol), Some('ㄱ'));
        assert_eq!(classify('맛').map(Choseong::symbol), Some('ㅁ'));
        assert_eq!(classify('강').map(Choseong::symbol), Some('ㄱ'));
        assert_eq!(classify('까').map(Choseong::symbol), Some('ㄲ'));
        assert_eq!(classify('힣').map(Choseong::symbol), Some('ㅎ'));
    }

    #[test]
    fn test_classify_bare_consonants() {
        for &s in &CHOSEONG_SYMBOLS {
            assert_eq!(classify(s).map(Choseong::symbol), Some(s));
        }
    }

    #[test]
    fn test_classify_other() {
        for c in ['a', 'Z', '1', ' ', '▁', 'ㅏ', 'ㄳ', '漢', '\n'] {
            assert_eq!(classify(c), None, "{:?}", c);
        }
    }

    #[test]
    fn test_lone_choseong() {
        assert_eq!(as_lone_choseong("ㅁ").map(Choseong::symbol), Some('ㅁ'));
        assert_eq!(as_lone_choseong("ㅁㅁ"), None);
        assert_eq!(as_lone_choseong("맛"), None);
        assert_eq!(as_lone_choseong(""), None);
    }

    #[test]
    fn test_every_syllable_classifies() {
        for cp in SYLLABLE_BASE..=SYLLABLE_LAST {
            let c = char::from_u32(cp).unwrap();
            let expected = ((cp - SYLLABLE_BASE) / (MEDIAL_COUNT * FINAL_COUNT)) as usize;
            assert_eq!(classify(c).map(Choseong::index), Some(expected));
        }
    }

    proptest! {
        #[test]
        fn prop_non_korean_unclassified(c in any::<char>()) {
            prop_assume!(!is_syllable(c) && !CHOSEONG_SYMBOLS.contains(&c));
            prop_assert_eq!(classify(c), None);
        }
    }
}
