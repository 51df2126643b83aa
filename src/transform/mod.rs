//! Raw card → refined card projection.
//!
//! This is the silver-layer cleanup: keep a fixed set of source fields, fill
//! defaults, split the type line, rename to the warehouse vocabulary and coerce
//! the converted mana cost to a number. No I/O happens here.

use serde_json::Value;

use crate::domain::{NOT_AVAILABLE, RawCard, RefinedCard};

/// Separator between the primary type and the subtypes in a type line.
pub const TYPE_LINE_SEPARATOR: &str = " — ";

/// Transform raw API cards into silver rows.
///
/// Returns `None` when there is nothing to transform.
pub fn transform_cards(raw: &[RawCard]) -> Option<Vec<RefinedCard>> {
    if raw.is_empty() {
        return None;
    }
    Some(raw.iter().map(refine_card).collect())
}

/// Refine a single raw card.
pub fn refine_card(raw: &RawCard) -> RefinedCard {
    let type_line = text_field(raw, "type_line").unwrap_or_default();
    let (tipo_principal, subtipo) = split_type_line(&type_line);

    RefinedCard {
        id: text_field(raw, "id").unwrap_or_default(),
        nome: text_field(raw, "name").unwrap_or_default(),
        custo_mana: text_field(raw, "mana_cost").unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        custo_convertido: coerce_cmc(raw.get("cmc")),
        texto_descricao: text_field(raw, "oracle_text").unwrap_or_default(),
        poder: text_field(raw, "power").unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        resistencia: text_field(raw, "toughness").unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        raridade: text_field(raw, "rarity").unwrap_or_default(),
        colecao: text_field(raw, "set").unwrap_or_default(),
        artista: text_field(raw, "artist").unwrap_or_default(),
        tipo_principal,
        subtipo,
    }
}

/// Split "Creature — Goblin Shaman" into ("Creature", "Goblin Shaman").
///
/// Only the first separator splits; without one the subtype is `N/A`.
pub fn split_type_line(type_line: &str) -> (String, String) {
    match type_line.split_once(TYPE_LINE_SEPARATOR) {
        Some((primary, sub)) => (primary.to_string(), sub.to_string()),
        None => (type_line.to_string(), NOT_AVAILABLE.to_string()),
    }
}

/// Numeric cmc, with anything unparsable coerced to 0.
pub fn coerce_cmc(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if !v.is_nan() => v,
        _ => 0.0,
    }
}

// Strings pass through; scalars are rendered as JSON text; null and nested
// values count as unset.
fn text_field(raw: &RawCard, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
