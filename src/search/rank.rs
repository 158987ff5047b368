//! Candidate scoring and the ordered candidate set.

use std::collections::HashMap;

use crate::session::Session;

/// Score at and above which a candidate is flagged bilingual.
pub const BILINGUAL_SCORE: u8 = 8;

/// Language markers and their weights, summed independently.
const LANGUAGE_MARKERS: [(&str, u8); 4] = [
    ("英文", 1),
    ("繁体", 2),
    ("简体", 4),
    ("双语", BILINGUAL_SCORE),
];

/// Scores a result box's text by the language/edition markers it mentions.
///
/// English is worth 1, Traditional 2, Simplified 4 and bilingual 8, so any
/// bilingual result outranks every single-script one.
#[must_use]
pub fn language_score(text: &str) -> u8 {
    LANGUAGE_MARKERS
        .iter()
        .filter(|(marker, _)| text.contains(marker))
        .map(|(_, weight)| weight)
        .sum()
}

/// A subtitle offering found by search.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Source-prefixed name, unique within one search.
    pub display_name: String,
    /// Absolute URL of the subtitle detail page.
    pub detail_url: String,
    /// Output of [`language_score`] for the result box.
    pub language_score: u8,
    /// Session the candidate was found with, reused for download.
    pub session: Option<Session>,
}

impl Candidate {
    #[must_use]
    pub fn is_bilingual(&self) -> bool {
        self.language_score >= BILINGUAL_SCORE
    }
}

/// Result of [`CandidateSet::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The candidate was appended.
    Inserted,
    /// A candidate with the same display name is already present; the first one is kept.
    Duplicate,
    /// The set already holds its maximum number of candidates.
    Full,
}

/// Insertion-ordered candidates keyed by display name, capped in size.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    entries: Vec<Candidate>,
    index: HashMap<String, usize>,
    max_len: usize,
}

impl CandidateSet {
    /// Creates an empty set holding at most `max_len` candidates.
    #[must_use]
    pub fn new(max_len: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            max_len,
        }
    }

    /// Appends `candidate` unless the set is full or the name is taken.
    pub fn insert(&mut self, candidate: Candidate) -> InsertOutcome {
        if self.is_full() {
            return InsertOutcome::Full;
        }
        if self.index.contains_key(&candidate.display_name) {
            return InsertOutcome::Duplicate;
        }
        self.index
            .insert(candidate.display_name.clone(), self.entries.len());
        self.entries.push(candidate);
        InsertOutcome::Inserted
    }

    /// Orders candidates best-first.
    ///
    /// When the first-inserted candidate is bilingual the insertion order is
    /// kept as is. Otherwise the whole set is sorted by descending score;
    /// equal scores keep their insertion order.
    pub fn rank(&mut self) {
        let Some(first) = self.entries.first() else {
            return;
        };
        if first.is_bilingual() {
            return;
        }
        self.entries
            .sort_by(|a, b| b.language_score.cmp(&a.language_score));
        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(position, candidate)| (candidate.display_name.clone(), position))
            .collect();
    }

    #[must_use]
    pub fn get(&self, display_name: &str) -> Option<&Candidate> {
        self.index
            .get(display_name)
            .and_then(|&position| self.entries.get(position))
    }

    /// Candidate at a zero-based position.
    #[must_use]
    pub fn get_index(&self, position: usize) -> Option<&Candidate> {
        self.entries.get(position)
    }

    #[must_use]
    pub fn first(&self) -> Option<&Candidate> {
        self.entries.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.max_len
    }

    /// Maximum number of candidates the set accepts.
    #[must_use]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.entries.iter()
    }

    /// Display names in current order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|c| c.display_name.as_str())
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Candidate> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for CandidateSet {
    type Item = Candidate;
    type IntoIter = std::vec::IntoIter<Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, score: u8) -> Candidate {
        Candidate {
            display_name: name.to_string(),
            detail_url: format!("http://subhd.example/a/{name}"),
            language_score: score,
            session: None,
        }
    }

    fn filled(scores: &[(&str, u8)]) -> CandidateSet {
        let mut set = CandidateSet::new(scores.len());
        for (name, score) in scores {
            assert_eq!(set.insert(candidate(name, *score)), InsertOutcome::Inserted);
        }
        set
    }

    #[test]
    fn test_language_score_sums_independent_flags() {
        assert_eq!(language_score("无标记"), 0);
        assert_eq!(language_score("英文"), 1);
        assert_eq!(language_score("繁体"), 2);
        assert_eq!(language_score("简体 英文"), 5);
        assert_eq!(language_score("双语 简体"), 12);
        assert_eq!(language_score("双语 简体 繁体 英文"), 15);
    }

    #[test]
    fn test_language_score_counts_each_marker_once() {
        assert_eq!(language_score("简体 简体 简体"), 4);
    }

    #[test]
    fn test_insert_respects_max_len() {
        let mut set = CandidateSet::new(2);
        assert_eq!(set.insert(candidate("a", 0)), InsertOutcome::Inserted);
        assert_eq!(set.insert(candidate("b", 0)), InsertOutcome::Inserted);
        assert!(set.is_full());
        assert_eq!(set.insert(candidate("c", 15)), InsertOutcome::Full);
        assert_eq!(set.len(), 2);
        assert!(set.get("c").is_none());
    }

    #[test]
    fn test_insert_keeps_first_duplicate() {
        let mut set = CandidateSet::new(5);
        set.insert(candidate("dup", 1));
        assert_eq!(set.insert(candidate("dup", 8)), InsertOutcome::Duplicate);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("dup").map(|c| c.language_score), Some(1));
    }

    #[test]
    fn test_zero_capacity_set_is_full_immediately() {
        let mut set = CandidateSet::new(0);
        assert!(set.is_full());
        assert_eq!(set.insert(candidate("a", 1)), InsertOutcome::Full);
    }

    #[test]
    fn test_rank_sorts_descending_when_first_is_not_bilingual() {
        let mut set = filled(&[("a", 1), ("b", 12), ("c", 4), ("d", 8)]);
        set.rank();
        assert_eq!(set.names().collect::<Vec<_>>(), ["b", "d", "c", "a"]);
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let mut set = filled(&[("a", 4), ("b", 5), ("c", 4), ("d", 5), ("e", 0)]);
        set.rank();
        assert_eq!(set.names().collect::<Vec<_>>(), ["b", "d", "a", "c", "e"]);
    }

    #[test]
    fn test_rank_keeps_order_when_first_is_bilingual() {
        let mut set = filled(&[("a", 8), ("b", 15), ("c", 0), ("d", 12)]);
        set.rank();
        assert_eq!(set.names().collect::<Vec<_>>(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_rank_updates_name_index() {
        let mut set = filled(&[("low", 0), ("high", 4)]);
        set.rank();
        assert_eq!(set.first().map(|c| c.display_name.as_str()), Some("high"));
        assert_eq!(set.get("low").map(|c| c.language_score), Some(0));
        assert_eq!(set.get_index(1).map(|c| c.display_name.as_str()), Some("low"));
    }

    #[test]
    fn test_rank_on_empty_set_is_noop() {
        let mut set = CandidateSet::new(3);
        set.rank();
        assert!(set.is_empty());
    }
}
