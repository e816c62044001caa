use crate::Position;
use std::cmp::Ordering;
use std::fmt;

/// Per-file aggregate for one query line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub path: String,
    pub frequency: usize,
    pub first_occurrence: Position,
}

impl SearchResult {
    pub fn new(path: String, frequency: usize, first_occurrence: Position) -> Self {
        Self { path, frequency, first_occurrence }
    }

    pub fn add_frequency(&mut self, count: usize) {
        self.frequency += count;
    }

    /// Keep the earliest position seen so far.
    pub fn update_first(&mut self, position: Position) {
        self.first_occurrence = self.first_occurrence.min(position);
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\", {}, {}", self.path, self.frequency, self.first_occurrence)
    }
}

/// Ranking used for search output, best result first: higher frequency,
/// then earlier first occurrence, then path compared case-insensitively.
/// Paths equal ignoring case fall back to a byte comparison so sorting
/// is deterministic.
pub fn rank(a: &SearchResult, b: &SearchResult) -> Ordering {
    b.frequency
        .cmp(&a.frequency)
        .then_with(|| a.first_occurrence.cmp(&b.first_occurrence))
        .then_with(|| cmp_ignore_case(&a.path, &b.path))
        .then_with(|| a.path.cmp(&b.path))
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(path: &str, frequency: usize, first: Position) -> SearchResult {
        SearchResult::new(path.to_string(), frequency, first)
    }

    #[test]
    fn frequency_dominates() {
        let a = hit("z.txt", 5, 100);
        let b = hit("a.txt", 4, 1);
        assert_eq!(rank(&a, &b), Ordering::Less);
        assert_eq!(rank(&b, &a), Ordering::Greater);
    }

    #[test]
    fn earlier_first_occurrence_breaks_frequency_tie() {
        let a = hit("z.txt", 3, 2);
        let b = hit("a.txt", 3, 7);
        assert_eq!(rank(&a, &b), Ordering::Less);
    }

    #[test]
    fn path_breaks_remaining_tie_ignoring_case() {
        let a = hit("Apple.txt", 3, 2);
        let b = hit("banana.txt", 3, 2);
        assert_eq!(rank(&a, &b), Ordering::Less);
        // byte order would put "B" before "a"
        let c = hit("a.txt", 1, 1);
        let d = hit("B.txt", 1, 1);
        assert_eq!(rank(&c, &d), Ordering::Less);
    }

    #[test]
    fn sort_is_total() {
        let mut hits = vec![hit("b", 1, 1), hit("B", 1, 1), hit("a", 2, 9), hit("c", 1, 0)];
        hits.sort_by(rank);
        let paths: Vec<&str> = hits.iter().map(|h| h.path.as_str()).collect();
        assert_eq!(paths, vec!["a", "c", "B", "b"]);
    }

    #[test]
    fn update_first_keeps_minimum() {
        let mut h = hit("a", 1, 5);
        h.update_first(9);
        assert_eq!(h.first_occurrence, 5);
        h.update_first(2);
        assert_eq!(h.first_occurrence, 2);
        h.add_frequency(4);
        assert_eq!(h.to_string(), "\"a\", 5, 2");
    }
}
