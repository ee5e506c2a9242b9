//! Candidate scoring and ordering.

use super::normalizer::normalize_text;
use crate::models::{IndexEntry, QueryHit};

/// Levenshtein distance between two strings, counted in chars.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    if s1_chars.is_empty() {
        return s2_chars.len();
    }
    if s2_chars.is_empty() {
        return s1_chars.len();
    }

    let mut previous: Vec<usize> = (0..=s2_chars.len()).collect();
    let mut current = vec![0; s2_chars.len() + 1];

    for (i, c1) in s1_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, c2) in s2_chars.iter().enumerate() {
            let cost = if c1 == c2 { 0 } else { 1 };
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[s2_chars.len()]
}

/// Score candidates against the canonical query and keep the best `limit`.
///
/// Ordering is ascending distance; equal distances keep candidate order.
pub fn rank(candidates: Vec<IndexEntry>, canonical_query: &str, limit: usize) -> Vec<QueryHit> {
    let mut scored: Vec<(usize, IndexEntry)> = candidates
        .into_iter()
        .map(|entry| {
            let distance =
                levenshtein_distance(&normalize_text(&entry.original_text), canonical_query);
            (distance, entry)
        })
        .collect();

    scored.sort_by_key(|(distance, _)| *distance);
    scored.truncate(limit);

    scored
        .into_iter()
        .map(|(distance, entry)| QueryHit::from_entry(entry, distance))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntryType, OwnerId, ReferenceId};

    fn entry(reference: &str, text: &str) -> IndexEntry {
        IndexEntry {
            owner_id: OwnerId::new("u1").unwrap(),
            keyword: "k".to_string(),
            entry_type: EntryType::Unknown,
            reference_id: ReferenceId::new(reference).unwrap(),
            original_text: text.to_string(),
            indexed_at: 0,
        }
    }

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("saturday", "sunday"), 3);
        assert_eq!(levenshtein_distance("", "test"), 4);
        assert_eq!(levenshtein_distance("test", ""), 4);
        assert_eq!(levenshtein_distance("same", "same"), 0);
        assert_eq!(levenshtein_distance("café", "cafe"), 1);
    }

    #[test]
    fn test_rank_orders_by_distance() {
        let candidates = vec![
            entry("far", "Completely unrelated words"),
            entry("exact", "Blue Widgets"),
            entry("near", "Blue Widget Co"),
        ];
        let hits = rank(candidates, "blue widget", 10);
        let refs: Vec<&str> = hits.iter().map(|h| h.reference_id.as_str()).collect();
        assert_eq!(refs, vec!["exact", "near", "far"]);
        assert_eq!(hits[0].distance, 0);
    }

    #[test]
    fn test_rank_ties_keep_arrival_order() {
        let candidates = vec![entry("first", "alpha beta"), entry("second", "beta alpha")];
        let hits = rank(candidates, "alpha beta", 10);
        assert_eq!(hits[0].reference_id.as_str(), "first");
        assert_eq!(hits[1].reference_id.as_str(), "second");
    }

    #[test]
    fn test_rank_truncates() {
        let candidates = (0..25)
            .map(|i| entry(&format!("r{}", i), &format!("note {}", i)))
            .collect();
        assert_eq!(rank(candidates, "note", 10).len(), 10);
    }
}
