//! Shared domain types.
//!
//! Raw cards stay schemaless so the bronze file is a verbatim copy of what the
//! API returned. Refined cards and summary rows are fixed-schema and serialize
//! straight into the silver CSV and the warehouse tables.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StageError;

/// A card exactly as the search API returned it.
pub type RawCard = serde_json::Map<String, serde_json::Value>;

/// Placeholder written for optional text columns the API left unset.
pub const NOT_AVAILABLE: &str = "N/A";

/// One row of the silver table (and of `dim_cartas`).
///
/// Field order is the column order of the silver CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinedCard {
    pub id: String,
    pub nome: String,
    pub custo_mana: String,
    pub custo_convertido: f64,
    pub texto_descricao: String,
    pub poder: String,
    pub resistencia: String,
    pub raridade: String,
    pub colecao: String,
    pub artista: String,
    pub tipo_principal: String,
    pub subtipo: String,
}

impl RefinedCard {
    /// Column names in silver/warehouse order.
    pub const COLUMNS: [&'static str; 12] = [
        "id",
        "nome",
        "custo_mana",
        "custo_convertido",
        "texto_descricao",
        "poder",
        "resistencia",
        "raridade",
        "colecao",
        "artista",
        "tipo_principal",
        "subtipo",
    ];
}

/// Grouping key of the fact table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SummaryKey {
    pub colecao: String,
    pub raridade: String,
    pub tipo_principal: String,
}

/// One row of `fact_resumo_colecao`.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub colecao: String,
    pub raridade: String,
    pub tipo_principal: String,
    pub contagem_cartas: i64,
    pub custo_medio_mana: f64,
}

/// The three pipeline layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Bronze,
    Silver,
    Gold,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Bronze, Stage::Silver, Stage::Gold];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Bronze => "bronze",
            Stage::Silver => "silver",
            Stage::Gold => "gold",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a successful stage produced.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage: Stage,
    /// Rows written (cards for bronze/silver, dimension rows for gold).
    pub rows: usize,
    pub output: PathBuf,
    /// Set when extraction stopped early but still returned data.
    pub partial: bool,
    pub note: Option<String>,
}

impl StageReport {
    pub fn complete(stage: Stage, rows: usize, output: PathBuf) -> Self {
        Self {
            stage,
            rows,
            output,
            partial: false,
            note: None,
        }
    }
}

pub type StageOutcome = Result<StageReport, StageError>;

/// Outcomes of a full bronze → silver → gold run.
#[derive(Debug)]
pub struct PipelineReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<(Stage, StageOutcome)>,
}

impl PipelineReport {
    /// Error of the earliest stage that failed, if any.
    pub fn first_error(&self) -> Option<&StageError> {
        self.outcomes.iter().find_map(|(_, outcome)| outcome.as_ref().err())
    }

    pub fn succeeded(&self) -> bool {
        self.first_error().is_none()
    }

    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
