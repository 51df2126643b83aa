//! The bronze → silver → gold stages.
//!
//! Each stage reads its predecessor's artifact from disk, so any stage can be
//! re-run on its own as long as that artifact exists. Stages return a
//! `StageOutcome`; `run_all` runs all three regardless of earlier failures.

use std::fs;
use std::path::Path;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::data::{PageSource, extract_cards};
use crate::domain::{PipelineConfig, PipelineReport, Stage, StageOutcome, StageReport};
use crate::error::{AppError, StageError};
use crate::io::{Warehouse, read_raw_cards, read_refined_cards, write_raw_cards, write_refined_cards};
use crate::report::summarize;
use crate::transform::transform_cards;

/// Bronze: extract cards and persist them verbatim.
pub fn run_bronze(config: &PipelineConfig, source: &dyn PageSource) -> StageOutcome {
    ensure_dir(&config.bronze_dir())?;
    let url = config.first_page_url().map_err(config_error)?;

    let extraction = extract_cards(source, url.as_str(), config.page_delay);
    if extraction.cards.is_empty() {
        return Err(StageError::NoData { stage: Stage::Bronze });
    }
    if extraction.is_partial() {
        warn!(
            cards = extraction.cards.len(),
            pages = extraction.pages,
            "extraction stopped early; keeping partial result"
        );
    }

    let path = config.bronze_file();
    write_raw_cards(&path, &extraction.cards)?;

    Ok(StageReport {
        stage: Stage::Bronze,
        rows: extraction.cards.len(),
        output: path,
        partial: extraction.is_partial(),
        note: extraction.error,
    })
}

/// Silver: refine the bronze file into the silver CSV.
pub fn run_silver(config: &PipelineConfig) -> StageOutcome {
    ensure_dir(&config.silver_dir())?;

    let raw = read_raw_cards(&config.bronze_file())?;
    let refined = transform_cards(&raw).ok_or(StageError::NoData { stage: Stage::Silver })?;

    let path = config.silver_file();
    write_refined_cards(&path, &refined)?;
    Ok(StageReport::complete(Stage::Silver, refined.len(), path))
}

/// Gold: load the dimension table and the aggregated fact table.
pub fn run_gold(config: &PipelineConfig) -> StageOutcome {
    ensure_dir(&config.gold_dir())?;

    let cards = read_refined_cards(&config.silver_file())?;
    let facts = summarize(&cards);

    let path = config.warehouse_file();
    let mut warehouse = Warehouse::open(&path)?;
    let dim_rows = warehouse.replace_dimension(&cards)?;
    let fact_rows = warehouse.replace_fact(&facts)?;

    Ok(StageReport {
        stage: Stage::Gold,
        rows: dim_rows,
        output: path,
        partial: false,
        note: Some(format!("{fact_rows} fact rows")),
    })
}

/// Run a single stage, logging its outcome.
pub fn run_stage(config: &PipelineConfig, stage: Stage, source: &dyn PageSource) -> StageOutcome {
    info!("--- starting {} stage ---", stage.name().to_uppercase());
    let outcome = match stage {
        Stage::Bronze => run_bronze(config, source),
        Stage::Silver => run_silver(config),
        Stage::Gold => run_gold(config),
    };
    log_outcome(stage, &outcome);
    outcome
}

/// Run bronze, silver and gold in order; a failed stage does not stop the next.
pub fn run_all(config: &PipelineConfig, source: &dyn PageSource) -> PipelineReport {
    let started_at = Utc::now();
    let outcomes = Stage::ALL
        .into_iter()
        .map(|stage| (stage, run_stage(config, stage, source)))
        .collect();

    let report = PipelineReport {
        started_at,
        finished_at: Utc::now(),
        outcomes,
    };
    info!(
        succeeded = report.succeeded(),
        elapsed_ms = report.elapsed_ms(),
        "pipeline finished"
    );
    report
}

fn log_outcome(stage: Stage, outcome: &StageOutcome) {
    match outcome {
        Ok(report) if report.partial => warn!(
            stage = %report.stage,
            rows = report.rows,
            output = %report.output.display(),
            reason = report.note.as_deref().unwrap_or(""),
            "stage completed with partial data"
        ),
        Ok(report) => info!(
            stage = %report.stage,
            rows = report.rows,
            output = %report.output.display(),
            note = report.note.as_deref().unwrap_or(""),
            "stage completed"
        ),
        Err(e) => error!(%stage, error = %e, "stage failed"),
    }
}

fn ensure_dir(dir: &Path) -> Result<(), StageError> {
    fs::create_dir_all(dir).map_err(|e| StageError::io(dir, e))
}

fn config_error(err: AppError) -> StageError {
    StageError::Config {
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use serde_json::{Value, json};

    use crate::data::scryfall::tests::ScriptedSource;
    use crate::domain::{RawCard, SummaryRow};
    use crate::io::{DIM_TABLE, FACT_TABLE};

    fn config(dir: &Path) -> PipelineConfig {
        let mut config = PipelineConfig::default().with_data_dir(dir);
        config.search_url = "http://cards.test/cards/search".to_string();
        config.page_delay = Duration::ZERO;
        config
    }

    fn first_url(config: &PipelineConfig) -> String {
        config.first_page_url().unwrap().to_string()
    }

    fn raw(value: Value) -> RawCard {
        serde_json::from_value(value).unwrap()
    }

    fn fixture() -> Vec<RawCard> {
        vec![
            raw(json!({
                "id": "c1",
                "name": "Goblin Shaman",
                "mana_cost": "{1}{R}",
                "cmc": 2.0,
                "type_line": "Creature — Goblin Shaman",
                "oracle_text": "Haste",
                "power": "2",
                "toughness": "1",
                "rarity": "common",
                "set": "mh3",
                "artist": "Someone"
            })),
            raw(json!({
                "id": "l1",
                "name": "Plains",
                "cmc": 0.0,
                "type_line": "Basic Land — Plains",
                "rarity": "common",
                "set": "mh3",
                "artist": "Someone Else"
            })),
        ]
    }

    #[test]
    fn end_to_end_two_cards() {
        crate::logging::init_test();
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let source = ScriptedSource::new().page(&first_url(&config), fixture(), None);

        let report = run_all(&config, &source);
        assert!(report.succeeded(), "{:?}", report.first_error());

        let wh = Warehouse::open(&config.warehouse_file()).unwrap();
        assert_eq!(wh.table_count(DIM_TABLE).unwrap(), 2);
        // (mh3, common, Creature) and (mh3, common, Basic Land)
        assert_eq!(wh.table_count(FACT_TABLE).unwrap(), 2);

        let facts = wh.fact_rows().unwrap();
        assert_eq!(
            facts,
            vec![
                SummaryRow {
                    colecao: "mh3".to_string(),
                    raridade: "common".to_string(),
                    tipo_principal: "Basic Land".to_string(),
                    contagem_cartas: 1,
                    custo_medio_mana: 0.0,
                },
                SummaryRow {
                    colecao: "mh3".to_string(),
                    raridade: "common".to_string(),
                    tipo_principal: "Creature".to_string(),
                    contagem_cartas: 1,
                    custo_medio_mana: 2.0,
                },
            ]
        );

        // Defaults survive the CSV round trip as literal values.
        let conn = rusqlite::Connection::open(config.warehouse_file()).unwrap();
        let (custo_mana, texto, poder, subtipo): (String, String, String, String) = conn
            .query_row(
                "SELECT custo_mana, texto_descricao, poder, subtipo FROM dim_cartas WHERE id = 'l1'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .unwrap();
        assert_eq!(custo_mana, "N/A");
        assert_eq!(texto, "");
        assert_eq!(poder, "N/A");
        assert_eq!(subtipo, "Plains");
    }

    #[test]
    fn bronze_without_cards_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let source = ScriptedSource::new().page(&first_url(&config), Vec::new(), None);

        let err = run_bronze(&config, &source).unwrap_err();

        assert!(matches!(err, StageError::NoData { stage: Stage::Bronze }));
        assert!(config.bronze_dir().is_dir());
        assert!(!config.bronze_file().exists());
    }

    #[test]
    fn bronze_after_request_failure_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let source = ScriptedSource::new().failure(&first_url(&config));

        let err = run_bronze(&config, &source).unwrap_err();
        assert!(matches!(err, StageError::NoData { .. }));
        assert!(!config.bronze_file().exists());
    }

    #[test]
    fn bronze_partial_result_is_written_and_flagged() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let source = ScriptedSource::new()
            .page(&first_url(&config), fixture(), Some("http://cards.test/page2"))
            .failure("http://cards.test/page2");

        let report = run_bronze(&config, &source).unwrap();
        assert!(report.partial);
        assert_eq!(report.rows, 2);
        assert_eq!(read_raw_cards(&config.bronze_file()).unwrap().len(), 2);
    }

    #[test]
    fn silver_without_bronze_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let err = run_silver(&config).unwrap_err();
        assert!(matches!(err, StageError::MissingInput { stage: Stage::Silver, .. }));
        assert!(!config.silver_file().exists());
    }

    #[test]
    fn silver_with_empty_bronze_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        fs::create_dir_all(config.bronze_dir()).unwrap();
        fs::write(config.bronze_file(), "[]").unwrap();

        let err = run_silver(&config).unwrap_err();
        assert!(matches!(err, StageError::NoData { stage: Stage::Silver }));
    }

    #[test]
    fn gold_without_silver_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let err = run_gold(&config).unwrap_err();
        assert!(matches!(err, StageError::MissingInput { stage: Stage::Gold, .. }));
        assert!(!config.warehouse_file().exists());
    }

    #[test]
    fn run_all_keeps_going_after_failures() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let source = ScriptedSource::new().failure(&first_url(&config));

        let report = run_all(&config, &source);

        let stages: Vec<Stage> = report.outcomes.iter().map(|(s, _)| *s).collect();
        assert_eq!(stages, Stage::ALL.to_vec());
        assert!(report.outcomes.iter().all(|(_, o)| o.is_err()));
        assert!(matches!(report.first_error(), Some(StageError::NoData { stage: Stage::Bronze })));
    }

    #[test]
    fn gold_rerun_overwrites_warehouse() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let source = ScriptedSource::new().page(&first_url(&config), fixture(), None);
        run_bronze(&config, &source).unwrap();
        run_silver(&config).unwrap();

        run_gold(&config).unwrap();
        let report = run_gold(&config).unwrap();

        assert_eq!(report.stage, Stage::Gold);
        assert_eq!(report.rows, 2);
        let wh = Warehouse::open(&config.warehouse_file()).unwrap();
        assert_eq!(wh.table_count(DIM_TABLE).unwrap(), 2);
    }
}
