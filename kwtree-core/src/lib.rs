// kwtree - Aho-Corasick Keyword Tree
//!
// This crate provides a keyword tree: a trie of keywords augmented with
// failure links, so that a text is scanned once and the first completed
// keyword occurrence is reported together with its character offset.
//
// ## Lifecycle
//
// ```text
// ┌─────────────────────────────────────────────────┐
// │           Building                              │
// │  add(keyword) grows the trie                    │
// └──────────────┬──────────────────────────────────┘
//                │ finalize()
//                v
// ┌─────────────────────────────────────────────────┐
// │           Finalized                             │
// │  failure links + inherited outputs              │
// │  search(text), dump()                           │
// └─────────────────────────────────────────────────┘
//                ^
//                │ load(value)
// ┌──────────────┴──────────────────────────────────┐
// │  canonical nested value (serde_json::Value)     │
// └─────────────────────────────────────────────────┘
// ```
//
// ## Example
//
// ```
// use kwtree_core::{KeywordMatch, KeywordTree};
//
// let mut tree = KeywordTree::new(true);
// tree.add("malaga").unwrap();
// tree.add("mallorca").unwrap();
// tree.finalize().unwrap();
//
// let found = tree.search("Islands: Mallorca, Malaga").unwrap();
// assert_eq!(found, Some(KeywordMatch { keyword: "mallorca", offset: 9 }));
// ```

mod builder;
mod compiler;
mod scanner;
mod snapshot;
mod state;
mod tree;

#[cfg(test)]
mod perf;

pub use scanner::KeywordMatch;
pub use snapshot::{SnapshotState, TreeSnapshot};
pub use state::{State, StateId, ROOT};
pub use tree::{KeywordTree, Phase};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur in the keyword tree
#[derive(Debug, Error)]
pub enum KwTreeError {
    /// Operation invoked in the wrong lifecycle phase
    #[error("Lifecycle error: {0}")]
    Lifecycle(&'static str),

    /// A snapshot handed to `load` is structurally invalid
    #[error("Corrupt data: {0}")]
    CorruptData(String),

    #[error("Keyword too long: {length} characters (max: {max})")]
    KeywordTooLong { length: usize, max: usize },

    #[error("Too many states: {count} (max: {max})")]
    TooManyStates { count: usize, max: usize },
}

impl KwTreeError {
    pub fn corrupt(message: impl Into<String>) -> Self {
        KwTreeError::CorruptData(message.into())
    }

    pub fn is_lifecycle(&self) -> bool {
        matches!(self, KwTreeError::Lifecycle(_))
    }

    pub fn is_corrupt_data(&self) -> bool {
        matches!(self, KwTreeError::CorruptData(_))
    }
}

/// Result type for keyword tree operations
pub type KwTreeResult<T> = Result<T, KwTreeError>;

/// Configuration for a keyword tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KwTreeConfig {
    /// Fold keywords and text to lower case before matching
    pub case_insensitive: bool,

    /// Maximum keyword length in characters (0 = unlimited)
    pub max_keyword_length: usize,

    /// Maximum number of states including the root (0 = unlimited)
    pub max_states: usize,
}

impl KwTreeConfig {
    pub fn case_insensitive(mut self, enabled: bool) -> Self {
        self.case_insensitive = enabled;
        self
    }
}

impl Default for KwTreeConfig {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            max_keyword_length: 0,
            max_states: 0,
        }
    }
}
