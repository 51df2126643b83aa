//! SQLite warehouse loader for the gold layer.
//!
//! Tables are replaced wholesale on every load: drop, create, insert, all in
//! one transaction per table.

use std::path::Path;

use rusqlite::{Connection, params};
use tracing::info;

use crate::domain::{RefinedCard, SummaryRow};
use crate::error::StageError;

pub const DIM_TABLE: &str = "dim_cartas";
pub const FACT_TABLE: &str = "fact_resumo_colecao";

const DIM_DDL: &str = r#"
    CREATE TABLE dim_cartas (
        id TEXT,
        nome TEXT,
        custo_mana TEXT,
        custo_convertido REAL,
        texto_descricao TEXT,
        poder TEXT,
        resistencia TEXT,
        raridade TEXT,
        colecao TEXT,
        artista TEXT,
        tipo_principal TEXT,
        subtipo TEXT
    )
"#;

const FACT_DDL: &str = r#"
    CREATE TABLE fact_resumo_colecao (
        colecao TEXT,
        raridade TEXT,
        tipo_principal TEXT,
        contagem_cartas INTEGER,
        custo_medio_mana REAL
    )
"#;

pub struct Warehouse {
    conn: Connection,
}

impl Warehouse {
    /// Open (or create) the warehouse file.
    pub fn open(path: &Path) -> Result<Self, StageError> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Replace `dim_cartas` with `cards`.
    pub fn replace_dimension(&mut self, cards: &[RefinedCard]) -> Result<usize, StageError> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!("DROP TABLE IF EXISTS {DIM_TABLE};"))?;
        tx.execute_batch(DIM_DDL)?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO dim_cartas (
                    id, nome, custo_mana, custo_convertido, texto_descricao,
                    poder, resistencia, raridade, colecao, artista,
                    tipo_principal, subtipo
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                "#,
            )?;
            for c in cards {
                stmt.execute(params![
                    c.id,
                    c.nome,
                    c.custo_mana,
                    c.custo_convertido,
                    c.texto_descricao,
                    c.poder,
                    c.resistencia,
                    c.raridade,
                    c.colecao,
                    c.artista,
                    c.tipo_principal,
                    c.subtipo,
                ])?;
            }
        }
        tx.commit()?;
        info!(table = DIM_TABLE, rows = cards.len(), "table loaded");
        Ok(cards.len())
    }

    /// Replace `fact_resumo_colecao` with `rows`.
    pub fn replace_fact(&mut self, rows: &[SummaryRow]) -> Result<usize, StageError> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!("DROP TABLE IF EXISTS {FACT_TABLE};"))?;
        tx.execute_batch(FACT_DDL)?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO fact_resumo_colecao (
                    colecao, raridade, tipo_principal, contagem_cartas, custo_medio_mana
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )?;
            for r in rows {
                stmt.execute(params![
                    r.colecao,
                    r.raridade,
                    r.tipo_principal,
                    r.contagem_cartas,
                    r.custo_medio_mana,
                ])?;
            }
        }
        tx.commit()?;
        info!(table = FACT_TABLE, rows = rows.len(), "table loaded");
        Ok(rows.len())
    }

    /// Row count of `table` (one of the warehouse tables).
    pub fn table_count(&self, table: &str) -> Result<i64, StageError> {
        if table != DIM_TABLE && table != FACT_TABLE {
            return Err(StageError::Load {
                reason: format!("unknown table '{table}'"),
            });
        }
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(count)
    }

    /// All fact rows, ordered by key.
    #[cfg(test)]
    pub fn fact_rows(&self) -> Result<Vec<SummaryRow>, StageError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT colecao, raridade, tipo_principal, contagem_cartas, custo_medio_mana
            FROM fact_resumo_colecao
            ORDER BY colecao, raridade, tipo_principal
            "#,
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(SummaryRow {
                    colecao: row.get(0)?,
                    raridade: row.get(1)?,
                    tipo_principal: row.get(2)?,
                    contagem_cartas: row.get(3)?,
                    custo_medio_mana: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fact(tipo: &str, count: i64, avg: f64) -> SummaryRow {
        SummaryRow {
            colecao: "mh3".to_string(),
            raridade: "common".to_string(),
            tipo_principal: tipo.to_string(),
            contagem_cartas: count,
            custo_medio_mana: avg,
        }
    }

    #[test]
    fn reload_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dw.db");

        let mut wh = Warehouse::open(&path).unwrap();
        wh.replace_fact(&[fact("Creature", 2, 3.0), fact("Land", 1, 0.0)]).unwrap();
        assert_eq!(wh.table_count(FACT_TABLE).unwrap(), 2);

        wh.replace_fact(&[fact("Instant", 4, 1.25)]).unwrap();
        assert_eq!(wh.fact_rows().unwrap(), vec![fact("Instant", 4, 1.25)]);
    }

    #[test]
    fn dimension_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dw.db");
        let card = RefinedCard {
            id: "c1".to_string(),
            nome: "Plains".to_string(),
            custo_mana: "N/A".to_string(),
            custo_convertido: 0.0,
            texto_descricao: String::new(),
            poder: "N/A".to_string(),
            resistencia: "N/A".to_string(),
            raridade: "common".to_string(),
            colecao: "mh3".to_string(),
            artista: "Someone".to_string(),
            tipo_principal: "Land".to_string(),
            subtipo: "N/A".to_string(),
        };

        Warehouse::open(&path).unwrap().replace_dimension(&[card]).unwrap();

        let wh = Warehouse::open(&path).unwrap();
        assert_eq!(wh.table_count(DIM_TABLE).unwrap(), 1);
    }

    #[test]
    fn unknown_table_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let wh = Warehouse::open(&dir.path().join("dw.db")).unwrap();
        assert!(wh.table_count("sqlite_master; DROP TABLE x").is_err());
    }
}
