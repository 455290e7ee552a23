//! kwtree Store
//!
//! Persistence adapter for finalized keyword trees plus helpers for
//! reading keyword lists and text blobs from disk.
//!
//! A stored tree is the canonical nested value from
//! [`KeywordTree::dump`](kwtree_core::KeywordTree::dump), written as JSON and
//! gzip-compressed.

mod codec;
mod input;

pub use codec::{decode, encode, open, save};
pub use input::{read_keyword_list, read_text};

use kwtree_core::KwTreeError;
use std::path::PathBuf;
use thiserror::Error;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error on {0}: {1}")]
    File(PathBuf, std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Keyword tree error: {0}")]
    Tree(#[from] KwTreeError),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
