use crate::error::{Error, Result};
use crate::index::InvertedIndex;
use crate::result::SearchResult;
use crate::tokenizer::query_terms;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Ranked results for each query line, kept in the order lines were read.
#[derive(Debug, Default)]
pub struct PartialSearch {
    entries: Vec<(String, Vec<SearchResult>)>,
    slots: HashMap<String, usize>,
}

impl PartialSearch {
    pub fn new() -> Self { Self::default() }

    /// Run every line of `query_path` against `index`, replacing any
    /// previous report.
    pub fn build_partial_search(&mut self, query_path: &Path, index: &InvertedIndex) -> Result<()> {
        self.clear();
        let text = fs::read_to_string(query_path).map_err(|e| Error::unreadable(query_path, e))?;
        self.search_lines(text.lines(), index);
        tracing::info!(queries = self.len(), path = %query_path.display(), "partial search complete");
        Ok(())
    }

    /// Run each line as one query. A line with no terms, blank included,
    /// is kept with no results.
    pub fn search_lines<'a, I>(&mut self, lines: I, index: &InvertedIndex)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for line in lines {
            let terms = query_terms(line);
            let results = index.search(&terms);
            tracing::debug!(query = line, hits = results.len(), "query");
            self.insert(line, results);
        }
    }

    /// A repeated line keeps its first slot and takes the newest results.
    fn insert(&mut self, line: &str, results: Vec<SearchResult>) {
        match self.slots.get(line) {
            Some(&slot) => self.entries[slot].1 = results,
            None => {
                self.slots.insert(line.to_string(), self.entries.len());
                self.entries.push((line.to_string(), results));
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.slots.clear();
    }

    pub fn results(&self, line: &str) -> Option<&[SearchResult]> {
        self.slots.get(line).map(|&slot| self.entries[slot].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SearchResult])> {
        self.entries.iter().map(|(line, results)| (line.as_str(), results.as_slice()))
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Write each query line followed by its results and a blank line.
    pub fn write_search<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (line, results) in &self.entries {
            writeln!(out, "{line}")?;
            for result in results {
                writeln!(out, "{result}")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> InvertedIndex {
        let mut index = InvertedIndex::new();
        index.add_occurrence("cat", "a.txt", 1);
        index.add_occurrence("cat", "b.txt", 1);
        index.add_occurrence("dog", "b.txt", 2);
        index.add_occurrence("cat", "b.txt", 5);
        index
    }

    #[test]
    fn keeps_line_order_and_verbatim_keys() {
        let mut report = PartialSearch::new();
        report.search_lines(["Dog Cat", "cat", "zebra"], &corpus());
        let lines: Vec<&str> = report.iter().map(|(l, _)| l).collect();
        assert_eq!(lines, vec!["Dog Cat", "cat", "zebra"]);
        assert_eq!(report.results("zebra"), Some(&[][..]));
    }

    #[test]
    fn multi_word_line_merges_per_file() {
        let mut report = PartialSearch::new();
        report.search_lines(["dog cat"], &corpus());
        let results = report.results("dog cat").unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], SearchResult::new("b.txt".into(), 3, 1));
        assert_eq!(results[1], SearchResult::new("a.txt".into(), 1, 1));
    }

    #[test]
    fn lines_without_terms_stay_in_report() {
        let mut report = PartialSearch::new();
        report.search_lines(["cat", "", "   ", "--"], &corpus());
        let lines: Vec<&str> = report.iter().map(|(l, _)| l).collect();
        assert_eq!(lines, vec!["cat", "", "   ", "--"]);
        assert_eq!(report.results(""), Some(&[][..]));
        assert_eq!(report.results("   "), Some(&[][..]));
    }

    #[test]
    fn repeated_line_keeps_first_slot() {
        let mut report = PartialSearch::new();
        report.search_lines(["cat", "dog", "cat"], &corpus());
        assert_eq!(report.len(), 2);
        assert_eq!(report.iter().next().map(|(l, _)| l), Some("cat"));
    }

    #[test]
    fn writes_blank_block_for_no_matches() {
        let mut report = PartialSearch::new();
        report.search_lines(["zebra", "dog"], &corpus());
        let mut out = Vec::new();
        report.write_search(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "zebra\n\ndog\n\"b.txt\", 1, 2\n\n");
    }
}
