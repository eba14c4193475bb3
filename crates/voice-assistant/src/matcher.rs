//! Fuzzy product-name matching
//!
//! Candidates are ordered by ascending name length before any test runs, so
//! a short, specific name ("Mouse") beats a longer one that merely contains
//! the query ("Wireless Mouse"). The sort is stable: equal-length names keep
//! catalog order.

use crate::catalog::Item;

/// Shortest word considered by the word-overlap pass is three characters.
const MIN_WORD_LEN: usize = 3;

/// Return the best catalog match for a spoken product name.
///
/// Passes, first hit wins: exact (case-insensitive) name, substring in either
/// direction, then any query word of three or more characters found in the
/// name.
pub fn best_match<'a>(query: &str, items: &'a [Item]) -> Option<&'a Item> {
    let query = query.trim().to_lowercase();
    if query.is_empty() || items.is_empty() {
        return None;
    }

    let mut candidates: Vec<(&'a Item, String)> = items
        .iter()
        .map(|item| (item, item.name.to_lowercase()))
        .collect();
    candidates.sort_by_key(|(item, _)| item.name.chars().count());

    exact(&query, &candidates)
        .or_else(|| substring(&query, &candidates))
        .or_else(|| word_overlap(&query, &candidates))
}

fn exact<'a>(query: &str, candidates: &[(&'a Item, String)]) -> Option<&'a Item> {
    candidates
        .iter()
        .find(|(_, name)| name == query)
        .map(|(item, _)| *item)
}

fn substring<'a>(query: &str, candidates: &[(&'a Item, String)]) -> Option<&'a Item> {
    candidates
        .iter()
        .find(|(_, name)| name.contains(query) || query.contains(name.as_str()))
        .map(|(item, _)| *item)
}

fn word_overlap<'a>(query: &str, candidates: &[(&'a Item, String)]) -> Option<&'a Item> {
    let words: Vec<&str> = query
        .split_whitespace()
        .filter(|word| word.chars().count() >= MIN_WORD_LEN)
        .collect();
    if words.is_empty() {
        return None;
    }

    candidates
        .iter()
        .find(|(_, name)| words.iter().any(|word| name.contains(word)))
        .map(|(item, _)| *item)
}
