pub mod error;
pub mod index;
pub mod ingest;
pub mod partial;
pub mod persist;
pub mod result;
pub mod tokenizer;

pub use error::{Error, Result};
pub use index::{IndexStats, InvertedIndex};
pub use ingest::{build_index, discover_files, index_file, BuildSummary};
pub use partial::PartialSearch;
pub use result::{rank, SearchResult};

/// 1-based sequential index of a token within one file.
pub type Position = u32;
