use crate::error::{Error, Result};
use crate::index::InvertedIndex;
use crate::tokenizer::tokenize;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use walkdir::WalkDir;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub indexed: usize,
    pub skipped: Vec<PathBuf>,
    pub tokens: usize,
}

/// Recursively collect regular files under `root` whose extension matches
/// `extension` ignoring case. Sorted for reproducible output. Paths with a
/// line break are skipped since the index dump is line oriented.
pub fn discover_files(root: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!(error = %err, "failed to traverse");
                continue;
            }
        };
        if !entry.file_type().is_file() { continue; }
        let p = entry.path();
        if p.to_string_lossy().contains(['\n', '\r']) {
            tracing::warn!(path = ?p, "skipping path containing a line break");
            continue;
        }
        if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
            if ext.eq_ignore_ascii_case(extension) {
                files.push(p.to_path_buf());
            }
        }
    }
    files.sort();
    files
}

/// Tokenize one file and add every word to `index`. The file is read in
/// full first, so a failed read leaves the index untouched.
pub fn index_file(path: &Path, index: &mut InvertedIndex) -> Result<usize> {
    let text = fs::read_to_string(path).map_err(|e| Error::unreadable(path, e))?;
    let name = path.to_string_lossy();
    let tokens = tokenize(&text);
    for (word, position) in &tokens {
        index.add_occurrence(word, &name, *position);
    }
    Ok(tokens.len())
}

/// Build an index from `files`. Unreadable files are logged and skipped.
///
/// With more than one thread each worker fills its own shard from files
/// claimed off a shared cursor; shards are merged once all workers finish.
pub fn build_index(files: &[PathBuf], threads: usize) -> (InvertedIndex, BuildSummary) {
    let threads = threads.clamp(1, files.len().max(1));
    if threads == 1 {
        let mut index = InvertedIndex::new();
        let mut summary = BuildSummary::default();
        for file in files {
            ingest(file, &mut index, &mut summary);
        }
        return (index, summary);
    }

    let cursor = AtomicUsize::new(0);
    let shards = Mutex::new(Vec::with_capacity(threads));
    std::thread::scope(|scope| {
        for _ in 0..threads {
            scope.spawn(|| {
                let mut shard = InvertedIndex::new();
                let mut summary = BuildSummary::default();
                loop {
                    let next = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(file) = files.get(next) else { break };
                    ingest(file, &mut shard, &mut summary);
                }
                shards.lock().push((shard, summary));
            });
        }
    });

    let mut index = InvertedIndex::new();
    let mut summary = BuildSummary::default();
    for (shard, part) in shards.into_inner() {
        index.merge(shard);
        summary.indexed += part.indexed;
        summary.tokens += part.tokens;
        summary.skipped.extend(part.skipped);
    }
    summary.skipped.sort();
    (index, summary)
}

fn ingest(file: &Path, index: &mut InvertedIndex, summary: &mut BuildSummary) {
    match index_file(file, index) {
        Ok(tokens) => {
            tracing::debug!(path = %file.display(), tokens, "parsed file");
            summary.indexed += 1;
            summary.tokens += tokens;
        }
        Err(err) => {
            tracing::warn!(error = %err, "skipping file");
            summary.skipped.push(file.to_path_buf());
        }
    }
}
