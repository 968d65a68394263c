//! Table location and row extraction for PFR pages.
//!
//! PFR serves some stat tables inside HTML comments to defeat naive
//! scrapers, so lookup falls back to re-parsing any comment that mentions
//! the table id.

use crate::error::{Result, ScraperError};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

/// One table row keyed by the cells' `data-stat` attribute values.
pub type TableRow = HashMap<String, String>;

/// Locate `<table id="...">` in *html* (checking comment-hidden markup if
/// needed) and extract its rows.
pub fn extract_rows(html: &str, table_id: &str) -> Result<Vec<TableRow>> {
    let selector = Selector::parse(&format!(r#"table[id="{table_id}"]"#))
        .map_err(|_| ScraperError::TableNotFound(table_id.to_string()))?;

    let document = Html::parse_document(html);
    if let Some(table) = document.select(&selector).next() {
        return Ok(rows_from_table(&table));
    }

    for node in document.tree.nodes() {
        if let Node::Comment(comment) = node.value() {
            let text: &str = &comment.comment;
            if !text.contains(table_id) {
                continue;
            }
            let fragment = Html::parse_fragment(text);
            if let Some(table) = fragment.select(&selector).next() {
                return Ok(rows_from_table(&table));
            }
        }
    }

    Err(ScraperError::TableNotFound(table_id.to_string()))
}

/// Try *table_ids* in order and return rows from the first one present.
/// Some team pages changed their table id over the years, so callers pass
/// the current id plus historical fallbacks.
pub fn extract_rows_any(html: &str, table_ids: &[&str]) -> Result<Vec<TableRow>> {
    for table_id in table_ids {
        match extract_rows(html, table_id) {
            Ok(rows) => return Ok(rows),
            Err(ScraperError::TableNotFound(_)) => continue,
            Err(err) => return Err(err),
        }
    }
    Err(ScraperError::TableNotFound(table_ids.join(" | ")))
}

fn rows_from_table(table: &ElementRef) -> Vec<TableRow> {
    let tr_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("th, td").unwrap();

    let mut rows = Vec::new();
    for tr in table.select(&tr_selector) {
        // Mid-table repeated header rows carry class="thead"
        if tr.value().classes().any(|c| c == "thead") {
            continue;
        }

        let mut row = TableRow::new();
        for cell in tr.select(&cell_selector) {
            if let Some(stat) = cell.value().attr("data-stat") {
                let text = cell.text().collect::<String>().trim().to_string();
                row.insert(stat.to_string(), text);
            }
        }

        if row.is_empty() || row.values().all(|v| v.is_empty()) {
            continue;
        }
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    const VISIBLE: &str = r#"
        <html><body>
        <table id="AFC">
          <thead><tr><th data-stat="team">Tm</th><th data-stat="wins">W</th></tr></thead>
          <tbody>
            <tr><th data-stat="team">Buffalo Bills</th><td data-stat="wins">13</td></tr>
            <tr class="thead"><th data-stat="team">Tm</th><td data-stat="wins">W</td></tr>
            <tr><th data-stat="team">Miami Dolphins</th><td data-stat="wins">8</td></tr>
            <tr><th data-stat="team"></th><td data-stat="wins"></td></tr>
          </tbody>
        </table>
        </body></html>
    "#;

    #[test]
    fn extracts_rows_keyed_by_data_stat() {
        let rows = extract_rows(VISIBLE, "AFC").unwrap();
        assert_eq!(rows.len(), 3); // header + two teams; all-empty row dropped
        assert_eq!(rows[1]["team"], "Buffalo Bills");
        assert_eq!(rows[1]["wins"], "13");
    }

    #[test]
    fn finds_table_hidden_in_comment() {
        let html = r#"
            <html><body>
            <div id="all_team_stats">
            <!--
            <table id="team_stats">
              <tbody>
                <tr><td data-stat="team">Kansas City Chiefs</td><td data-stat="points">371</td></tr>
              </tbody>
            </table>
            -->
            </div>
            </body></html>
        "#;
        let rows = extract_rows(html, "team_stats").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["team"], "Kansas City Chiefs");
        assert_eq!(rows[0]["points"], "371");
    }

    #[test]
    fn missing_table_is_an_error() {
        let err = extract_rows(VISIBLE, "NFC").unwrap_err();
        assert!(matches!(err, ScraperError::TableNotFound(id) if id == "NFC"));
    }

    #[test]
    fn fallback_ids_are_tried_in_order() {
        let rows = extract_rows_any(VISIBLE, &["team_kicking", "AFC"]).unwrap();
        assert_eq!(rows[1]["team"], "Buffalo Bills");

        let err = extract_rows_any(VISIBLE, &["team_kicking", "team_stats"]).unwrap_err();
        assert!(matches!(err, ScraperError::TableNotFound(_)));
    }
}
