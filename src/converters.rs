//! Cell-level normalization for scraped stat tables.
//!
//! PFR cells arrive as strings with assorted decorations: thousands
//! separators, `*`/`+` award markers on player names, `%` suffixes.
//! Every stat family maps source columns through the same small set of
//! converter strategies, so the per-family code is just a declarative
//! column table evaluated by [`map_row`].

use std::collections::HashMap;

/// Trim a raw cell, treating empty strings as absent.
pub fn clean_cell(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Parse an integer cell, tolerating `1,234`, `12*`, `8+` and blanks.
pub fn to_int(raw: &str) -> Option<i64> {
    let s: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | '*' | '+'))
        .collect();
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    // Some PFR integer columns render as "12.0"
    s.parse::<f64>().ok().map(|f| f as i64)
}

/// Parse a decimal cell, tolerating `,`, `*`, `+`, `%` and blanks.
pub fn to_decimal(raw: &str) -> Option<f64> {
    let s: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | '*' | '+' | '%'))
        .collect();
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok()
}

/// Strip PFR player-name suffixes (`*`, `+`) indicating Pro Bowl / All-Pro.
pub fn clean_player_name(raw: &str) -> Option<String> {
    let s: String = raw.chars().filter(|c| !matches!(c, '*' | '+')).collect();
    clean_cell(&s)
}

/// Converter strategy applied to one source column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    Int,
    Decimal,
    Text,
    PlayerName,
}

/// A converted cell, typed according to its [`Converter`].
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Int(Option<i64>),
    Decimal(Option<f64>),
    Text(Option<String>),
}

impl Converter {
    pub fn apply(self, raw: Option<&str>) -> CellValue {
        match self {
            Converter::Int => CellValue::Int(raw.and_then(to_int)),
            Converter::Decimal => CellValue::Decimal(raw.and_then(to_decimal)),
            Converter::Text => CellValue::Text(raw.and_then(clean_cell)),
            Converter::PlayerName => CellValue::Text(raw.and_then(clean_player_name)),
        }
    }
}

/// One entry in a stat family's declarative column table: source column
/// (`data-stat` attribute value), destination field name, converter.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub source: &'static str,
    pub field: &'static str,
    pub converter: Converter,
}

pub const fn col(source: &'static str, field: &'static str, converter: Converter) -> ColumnSpec {
    ColumnSpec {
        source,
        field,
        converter,
    }
}

/// A row after column mapping, keyed by destination field name.
#[derive(Debug, Default)]
pub struct MappedRow {
    values: HashMap<&'static str, CellValue>,
}

impl MappedRow {
    pub fn int(&self, field: &str) -> Option<i64> {
        match self.values.get(field) {
            Some(CellValue::Int(v)) => *v,
            _ => None,
        }
    }

    pub fn decimal(&self, field: &str) -> Option<f64> {
        match self.values.get(field) {
            Some(CellValue::Decimal(v)) => *v,
            _ => None,
        }
    }

    pub fn text(&self, field: &str) -> Option<String> {
        match self.values.get(field) {
            Some(CellValue::Text(v)) => v.clone(),
            _ => None,
        }
    }
}

/// Evaluate a declarative column table against one extracted row.
pub fn map_row(row: &HashMap<String, String>, columns: &[ColumnSpec]) -> MappedRow {
    let mut mapped = MappedRow::default();
    for spec in columns {
        let raw = row.get(spec.source).map(String::as_str);
        mapped
            .values
            .insert(spec.field, spec.converter.apply(raw));
    }
    mapped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_strips_separators_and_markers() {
        assert_eq!(to_int("1,234"), Some(1234));
        assert_eq!(to_int("12*"), Some(12));
        assert_eq!(to_int("8+"), Some(8));
        assert_eq!(to_int("17.0"), Some(17));
        assert_eq!(to_int(""), None);
        assert_eq!(to_int("DNP"), None);
    }

    #[test]
    fn decimal_strips_percent() {
        assert_eq!(to_decimal("66.3%"), Some(66.3));
        assert_eq!(to_decimal("-4.5"), Some(-4.5));
        assert_eq!(to_decimal("  "), None);
    }

    #[test]
    fn player_name_strips_award_markers() {
        assert_eq!(
            clean_player_name("Patrick Mahomes*+"),
            Some("Patrick Mahomes".to_string())
        );
        assert_eq!(clean_player_name("*"), None);
    }

    #[test]
    fn map_row_applies_each_converter() {
        const COLS: &[ColumnSpec] = &[
            col("player", "player_name", Converter::PlayerName),
            col("pass_yds", "yds", Converter::Int),
            col("pass_cmp_perc", "cmp_pct", Converter::Decimal),
        ];
        let mut row = HashMap::new();
        row.insert("player".to_string(), "Josh Allen*".to_string());
        row.insert("pass_yds".to_string(), "4,306".to_string());
        row.insert("pass_cmp_perc".to_string(), "63.3".to_string());

        let mapped = map_row(&row, COLS);
        assert_eq!(mapped.text("player_name"), Some("Josh Allen".to_string()));
        assert_eq!(mapped.int("yds"), Some(4306));
        assert_eq!(mapped.decimal("cmp_pct"), Some(63.3));
    }

    #[test]
    fn map_row_missing_source_yields_none() {
        const COLS: &[ColumnSpec] = &[col("g", "g", Converter::Int)];
        let mapped = map_row(&HashMap::new(), COLS);
        assert_eq!(mapped.int("g"), None);
    }
}
