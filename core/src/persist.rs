use crate::error::{Error, Result};
use crate::index::{IndexStats, InvertedIndex};
use crate::partial::PartialSearch;
use crate::Position;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::unwritable(path, e))?;
    }
    let f = File::create(path).map_err(|e| Error::unwritable(path, e))?;
    Ok(BufWriter::new(f))
}

pub fn save_index(path: &Path, index: &InvertedIndex) -> Result<()> {
    let mut out = create(path)?;
    index
        .write_index(&mut out)
        .and_then(|_| out.flush())
        .map_err(|e| Error::unwritable(path, e))
}

pub fn save_report(path: &Path, report: &PartialSearch) -> Result<()> {
    let mut out = create(path)?;
    report
        .write_search(&mut out)
        .and_then(|_| out.flush())
        .map_err(|e| Error::unwritable(path, e))
}

pub fn save_stats(path: &Path, stats: &IndexStats) -> Result<()> {
    let mut out = create(path)?;
    serde_json::to_writer_pretty(&mut out, stats)
        .map_err(std::io::Error::from)
        .and_then(|_| out.flush())
        .map_err(|e| Error::unwritable(path, e))
}

pub fn load_index(path: &Path) -> Result<InvertedIndex> {
    let f = File::open(path).map_err(|e| Error::unreadable(path, e))?;
    read_index(BufReader::new(f)).map_err(|e| match e {
        Error::InputUnreadable { source, .. } => Error::unreadable(path, source),
        other => other,
    })
}

/// Parse an index dump produced by [`InvertedIndex::write_index`].
pub fn read_index<R: BufRead>(reader: R) -> Result<InvertedIndex> {
    let mut index = InvertedIndex::new();
    let mut word: Option<String> = None;
    for (n, line) in reader.lines().enumerate() {
        let lineno = n + 1;
        let line = line.map_err(|e| Error::unreadable("<index dump>", e))?;
        if line.is_empty() {
            if word.take().is_none() {
                return Err(Error::malformed(lineno, "blank line outside a word block"));
            }
            continue;
        }
        match &word {
            None => word = Some(line),
            Some(w) => {
                let (file, positions) = parse_postings(&line, lineno)?;
                for p in positions {
                    index.add_occurrence(w, &file, p);
                }
            }
        }
    }
    if word.is_some() {
        tracing::debug!("index dump ended without trailing blank line");
    }
    Ok(index)
}

/// `"path", 1, 2, 3` -> (path, [1, 2, 3])
fn parse_postings(line: &str, lineno: usize) -> Result<(String, Vec<Position>)> {
    let rest = line
        .strip_prefix('"')
        .ok_or_else(|| Error::malformed(lineno, "file entry must start with a quote"))?;
    let close = rest
        .rfind('"')
        .ok_or_else(|| Error::malformed(lineno, "unterminated file path"))?;
    let file = rest[..close].to_string();
    let mut positions = Vec::new();
    for part in rest[close + 1..].split(',').skip(1) {
        let p: Position = part
            .trim()
            .parse()
            .map_err(|_| Error::malformed(lineno, format!("bad position {:?}", part.trim())))?;
        positions.push(p);
    }
    if positions.is_empty() {
        return Err(Error::malformed(lineno, "file entry has no positions"));
    }
    Ok((file, positions))
}
