//! Read/write the silver CSV file.
//!
//! Header row present, no index column, columns in `RefinedCard::COLUMNS`
//! order.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use crate::domain::{RefinedCard, Stage};
use crate::error::StageError;

/// Write refined cards to `path`, replacing any previous file.
pub fn write_refined_cards(path: &Path, cards: &[RefinedCard]) -> Result<(), StageError> {
    let file = File::create(path).map_err(|e| StageError::io(path, e))?;
    let mut writer = csv::Writer::from_writer(file);

    for card in cards {
        writer
            .serialize(card)
            .map_err(|e| StageError::io(path, csv_io_error(e)))?;
    }
    writer.flush().map_err(|e| StageError::io(path, e))?;
    Ok(())
}

/// Read refined cards back from the silver CSV.
pub fn read_refined_cards(path: &Path) -> Result<Vec<RefinedCard>, StageError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => StageError::MissingInput {
            stage: Stage::Gold,
            path: path.to_path_buf(),
        },
        _ => StageError::io(path, e),
    })?;

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| invalid(path, format!("failed to read CSV headers: {e}")))?
        .clone();
    for column in RefinedCard::COLUMNS {
        if !headers.iter().any(|h| h.trim_start_matches('\u{feff}') == column) {
            return Err(invalid(path, format!("missing column '{column}'")));
        }
    }

    let mut cards = Vec::new();
    for (idx, result) in reader.deserialize::<RefinedCard>().enumerate() {
        // +2: header is line 1, records are 1-based.
        let line = idx + 2;
        let card = result.map_err(|e| invalid(path, format!("line {line}: {e}")))?;
        cards.push(card);
    }
    Ok(cards)
}

fn invalid(path: &Path, reason: String) -> StageError {
    StageError::InvalidInput {
        path: path.to_path_buf(),
        reason,
    }
}

fn csv_io_error(err: csv::Error) -> std::io::Error {
    match err.into_kind() {
        csv::ErrorKind::Io(e) => e,
        other => std::io::Error::other(format!("{other:?}")),
    }
}
