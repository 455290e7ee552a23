// Keyword list and text loading

use crate::{StoreError, StoreResult};
use std::path::Path;
use tracing::debug;

/// Read one keyword per line.
///
/// Surrounding whitespace is trimmed. Blank lines are kept as empty
/// keywords, which `KeywordTree::add` ignores.
pub fn read_keyword_list(path: impl AsRef<Path>) -> StoreResult<Vec<String>> {
    let content = read_text(&path)?;
    let keywords: Vec<String> = content.lines().map(|line| line.trim().to_string()).collect();

    debug!(
        path = %path.as_ref().display(),
        count = keywords.len(),
        "Read keyword list"
    );
    Ok(keywords)
}

/// Read a whole UTF-8 text file
pub fn read_text(path: impl AsRef<Path>) -> StoreResult<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|e| StoreError::File(path.to_path_buf(), e))
}
