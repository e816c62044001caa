use crate::result::{rank, SearchResult};
use crate::Position;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};
use std::ops::Bound;

type Postings = BTreeMap<String, Vec<Position>>;

/// Summary of a built index, written as JSON next to the dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub words: usize,
    pub files: usize,
    pub occurrences: usize,
    pub created_at: String,
}

/// Word-level inverted index: word -> file -> positions.
///
/// Words are kept in a sorted map so that a prefix query is a range scan
/// starting at the prefix and ending at the first key that no longer
/// starts with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvertedIndex {
    words: BTreeMap<String, Postings>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Record that `word` occurs in `file` at `position`.
    ///
    /// `word` must already be normalized. Positions are appended in call
    /// order; the caller supplies them in increasing order per file.
    pub fn add_occurrence(&mut self, word: &str, file: &str, position: Position) {
        if let Some(files) = self.words.get_mut(word) {
            match files.get_mut(file) {
                Some(positions) => positions.push(position),
                None => { files.insert(file.to_string(), vec![position]); }
            }
            return;
        }
        let mut files = Postings::new();
        files.insert(file.to_string(), vec![position]);
        self.words.insert(word.to_string(), files);
    }

    pub fn has_word(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    pub fn has_file(&self, word: &str, file: &str) -> bool {
        self.words.get(word).is_some_and(|files| files.contains_key(file))
    }

    pub fn positions(&self, word: &str, file: &str) -> Option<&[Position]> {
        self.words.get(word)?.get(file).map(Vec::as_slice)
    }

    /// Indexed words in ascending order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.keys().map(String::as_str)
    }

    pub fn num_words(&self) -> usize { self.words.len() }

    pub fn num_files(&self) -> usize {
        self.words
            .values()
            .flat_map(|files| files.keys())
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn num_occurrences(&self) -> usize {
        self.words
            .values()
            .flat_map(|files| files.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }

    pub fn stats(&self, created_at: impl Into<String>) -> IndexStats {
        IndexStats {
            words: self.num_words(),
            files: self.num_files(),
            occurrences: self.num_occurrences(),
            created_at: created_at.into(),
        }
    }

    /// Absorb a shard built from a disjoint set of files.
    pub fn merge(&mut self, other: InvertedIndex) {
        for (word, files) in other.words {
            let target = self.words.entry(word).or_default();
            for (file, mut positions) in files {
                target.entry(file).or_default().append(&mut positions);
            }
        }
    }

    /// Keys that start with `prefix`, visited in sorted order.
    fn prefixed<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a String, &'a Postings)> + 'a {
        self.words
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(word, _)| word.starts_with(prefix))
    }

    /// Prefix search over every query term, aggregated per file and ranked.
    ///
    /// Each term contributes independently: a file's frequency is the sum of
    /// its occurrence counts over all matching words of all terms, and its
    /// first occurrence is the smallest position seen among them. Empty
    /// terms are ignored.
    pub fn search<S: AsRef<str>>(&self, terms: &[S]) -> Vec<SearchResult> {
        let mut hits: BTreeMap<&str, SearchResult> = BTreeMap::new();
        for term in terms {
            let term = term.as_ref();
            if term.is_empty() { continue; }
            for (_, files) in self.prefixed(term) {
                for (file, positions) in files {
                    let Some(&first) = positions.first() else { continue };
                    let count = positions.len();
                    match hits.get_mut(file.as_str()) {
                        Some(hit) => {
                            hit.add_frequency(count);
                            hit.update_first(first);
                        }
                        None => {
                            hits.insert(file.as_str(), SearchResult::new(file.clone(), count, first));
                        }
                    }
                }
            }
        }
        let mut results: Vec<SearchResult> = hits.into_values().collect();
        results.sort_by(rank);
        results
    }

    /// Write the flat dump: one block per word, one quoted line per file.
    /// Paths are written as-is; a path containing a line break would not
    /// read back, so `discover_files` never yields one.
    pub fn write_index<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (word, files) in &self.words {
            writeln!(out, "{word}")?;
            for (file, positions) in files {
                write!(out, "\"{file}\"")?;
                for p in positions {
                    write!(out, ", {p}")?;
                }
                writeln!(out)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(entries: &[(&str, &str, Position)]) -> InvertedIndex {
        let mut index = InvertedIndex::new();
        for (w, f, p) in entries {
            index.add_occurrence(w, f, *p);
        }
        index
    }

    #[test]
    fn add_creates_word_and_file_entries() {
        let index = index_of(&[("run", "a.txt", 1), ("run", "a.txt", 2), ("runner", "a.txt", 3)]);
        assert!(index.has_word("run"));
        assert!(index.has_file("run", "a.txt"));
        assert!(!index.has_file("run", "b.txt"));
        assert_eq!(index.positions("run", "a.txt"), Some(&[1, 2][..]));
        assert_eq!(index.positions("runner", "a.txt"), Some(&[3][..]));
        assert_eq!(index.num_occurrences(), 3);
        assert_eq!(index.words().collect::<Vec<_>>(), vec!["run", "runner"]);
        assert!(!index.is_empty());
    }

    #[test]
    fn has_file_on_missing_word_is_false() {
        let index = InvertedIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.words().count(), 0);
        assert!(!index.has_word("ghost"));
        assert!(!index.has_file("ghost", "a.txt"));
        assert_eq!(index.positions("ghost", "a.txt"), None);
    }

    #[test]
    fn prefix_scan_stops_at_first_non_matching_key() {
        let index = index_of(&[("car", "a", 1), ("cart", "a", 2), ("cat", "a", 3), ("ca", "a", 4), ("dog", "a", 5)]);
        let matched: Vec<&str> = index.prefixed("car").map(|(w, _)| w.as_str()).collect();
        assert_eq!(matched, vec!["car", "cart"]);
    }

    #[test]
    fn search_aggregates_all_matching_words() {
        let index = index_of(&[("run", "a.txt", 1), ("run", "a.txt", 2), ("runner", "a.txt", 3)]);
        let results = index.search(&["run"]);
        assert_eq!(results, vec![SearchResult::new("a.txt".into(), 3, 1)]);
    }

    #[test]
    fn merge_of_disjoint_shards_matches_single_build() {
        let whole = index_of(&[("x", "a", 1), ("y", "a", 2), ("x", "b", 1)]);
        let mut left = index_of(&[("x", "a", 1), ("y", "a", 2)]);
        left.merge(index_of(&[("x", "b", 1)]));
        assert_eq!(left, whole);
    }

    #[test]
    fn counts_distinct_files() {
        let index = index_of(&[("x", "a", 1), ("y", "a", 2), ("x", "b", 1)]);
        assert_eq!(index.num_words(), 2);
        assert_eq!(index.num_files(), 2);
        let stats = index.stats("now");
        assert_eq!(stats.occurrences, 3);
    }
}
