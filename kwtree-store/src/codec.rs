// Gzip + JSON codec for keyword tree snapshots

use crate::{StoreError, StoreResult};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use kwtree_core::KeywordTree;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Encode a finalized tree as gzip-compressed JSON
pub fn encode(tree: &KeywordTree) -> StoreResult<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    write_tree(tree, &mut encoder)?;
    Ok(encoder.finish()?)
}

/// Decode bytes produced by [`encode`]
pub fn decode(bytes: &[u8]) -> StoreResult<KeywordTree> {
    read_tree(GzDecoder::new(bytes))
}

/// Write a finalized tree to `path`
pub fn save(tree: &KeywordTree, path: impl AsRef<Path>) -> StoreResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| StoreError::File(path.to_path_buf(), e))?;

    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    write_tree(tree, &mut encoder)?;
    encoder.finish()?.flush()?;

    info!(
        path = %path.display(),
        state_count = tree.state_count(),
        "Keyword tree saved"
    );
    Ok(())
}

/// Read a tree written by [`save`]
pub fn open(path: impl AsRef<Path>) -> StoreResult<KeywordTree> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| StoreError::File(path.to_path_buf(), e))?;

    let tree = read_tree(GzDecoder::new(BufReader::new(file)))?;

    info!(
        path = %path.display(),
        state_count = tree.state_count(),
        "Keyword tree opened"
    );
    Ok(tree)
}

fn write_tree<W: Write>(tree: &KeywordTree, writer: W) -> StoreResult<()> {
    let value = tree.dump()?;
    serde_json::to_writer(writer, &value)?;
    Ok(())
}

fn read_tree<R: Read>(reader: R) -> StoreResult<KeywordTree> {
    let value: Value = serde_json::from_reader(reader)?;
    let tree = KeywordTree::load(&value)?;
    debug!(state_count = tree.state_count(), "Decoded keyword tree");
    Ok(tree)
}
