//! Read/write the bronze JSON file.
//!
//! The bronze file is the raw API payload: a JSON array of card objects,
//! UTF-8 (non-ASCII kept as-is), indented four spaces.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::domain::{RawCard, Stage};
use crate::error::StageError;

/// Write raw cards to `path`, replacing any previous file.
pub fn write_raw_cards(path: &Path, cards: &[RawCard]) -> Result<(), StageError> {
    let file = File::create(path).map_err(|e| StageError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    let mut ser = serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    cards.serialize(&mut ser).map_err(|e| StageError::io(path, e.into()))?;

    writer.flush().map_err(|e| StageError::io(path, e))?;
    Ok(())
}

/// Read raw cards written by [`write_raw_cards`].
pub fn read_raw_cards(path: &Path) -> Result<Vec<RawCard>, StageError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => StageError::MissingInput {
            stage: Stage::Silver,
            path: path.to_path_buf(),
        },
        _ => StageError::io(path, e),
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|e| StageError::InvalidInput {
        path: path.to_path_buf(),
        reason: format!("invalid bronze JSON: {e}"),
    })
}
