//! Split a query into model context and the trailing fragment being completed.

/// `context + fragment == query`; `context` is empty or ends with the
/// boundary whitespace; `fragment` holds no whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentedQuery<'a> {
    pub context: &'a str,
    pub fragment: &'a str,
}

/// Split at the last whitespace character. No trimming or normalization.
pub fn segment(query: &str) -> SegmentedQuery<'_> {
    let split = query
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let (context, fragment) = query.split_at(split);
    SegmentedQuery { context, fragment }
}
