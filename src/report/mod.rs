//! Fact table aggregation.

use std::collections::BTreeMap;

use crate::domain::{RefinedCard, SummaryKey, SummaryRow};

#[derive(Debug, Default)]
struct GroupAcc {
    ids: i64,
    cmc_sum: f64,
    rows: usize,
}

/// Summarize refined cards per (colecao, raridade, tipo_principal).
///
/// Rows with an empty grouping component do not form a group. Output is sorted
/// by key.
pub fn summarize(cards: &[RefinedCard]) -> Vec<SummaryRow> {
    let mut groups: BTreeMap<SummaryKey, GroupAcc> = BTreeMap::new();

    for card in cards {
        if card.colecao.is_empty() || card.raridade.is_empty() || card.tipo_principal.is_empty() {
            continue;
        }
        let key = SummaryKey {
            colecao: card.colecao.clone(),
            raridade: card.raridade.clone(),
            tipo_principal: card.tipo_principal.clone(),
        };
        let acc = groups.entry(key).or_default();
        if !card.id.is_empty() {
            acc.ids += 1;
        }
        acc.cmc_sum += card.custo_convertido;
        acc.rows += 1;
    }

    groups
        .into_iter()
        .map(|(key, acc)| SummaryRow {
            colecao: key.colecao,
            raridade: key.raridade,
            tipo_principal: key.tipo_principal,
            contagem_cartas: acc.ids,
            custo_medio_mana: round2(acc.cmc_sum / acc.rows as f64),
        })
        .collect()
}

// Ties go to the even digit: 1.125 -> 1.12, 1.375 -> 1.38.
fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}
