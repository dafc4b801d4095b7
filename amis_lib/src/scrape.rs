//! HTML table extraction for market listing pages.
//!
//! Every `<tr>` in the document is a candidate row, wherever it sits. Cells
//! are read by fixed position rather than by header name; the listing has no
//! stable header markup to key on.

use amis_api::types::{Column, MarketRecord, MISSING_VALUE};
use scraper::node::Text;
use scraper::{ElementRef, Html, Selector};

use crate::normalize::extract_price;

#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("invalid selector: {0}")]
    Selector(String),
}

/// A parsed listing page.
///
/// Not `Send`: parse, consume and drop it between awaits.
pub struct ParsedPage {
    document: Html,
    row_selector: Selector,
}

impl ParsedPage {
    /// Number of `<tr>` elements on the page, header rows included.
    pub fn row_count(&self) -> usize {
        self.document.select(&self.row_selector).count()
    }

    /// One record per `<tr>`, in document order, built on demand.
    pub fn records(&self) -> impl Iterator<Item = MarketRecord> + '_ {
        self.document.select(&self.row_selector).map(extract_record)
    }
}

/// Parses a listing page. HTML parsing itself never fails.
pub fn parse_page(html: &str) -> Result<ParsedPage, ScrapeError> {
    let row_selector =
        Selector::parse("tr").map_err(|e| ScrapeError::Selector(e.to_string()))?;
    Ok(ParsedPage {
        document: Html::parse_document(html),
        row_selector,
    })
}

/// Builds a record from one table row.
///
/// Positions count every element child of the row, so a `<th>` in a slot
/// occupies it but yields nothing, as `td:nth-child(n)` would.
pub fn extract_record(row: ElementRef<'_>) -> MarketRecord {
    let cells: Vec<ElementRef<'_>> = row.children().filter_map(ElementRef::wrap).collect();
    let text = |column: Column| cell_text(&cells, column.cell_position());

    MarketRecord {
        commodity: text(Column::Commodity),
        classification: text(Column::Classification),
        grade: text(Column::Grade),
        market: text(Column::Market),
        wholesale: Some(extract_price(text(Column::Wholesale).as_deref())),
        retail: Some(extract_price(text(Column::Retail).as_deref())),
        supply_volume: text(Column::SupplyVolume).unwrap_or_else(|| MISSING_VALUE.to_string()),
        county: text(Column::County),
        date: text(Column::Date),
    }
}

// First direct text node of the `<td>` at 1-based `position`.
fn cell_text(cells: &[ElementRef<'_>], position: usize) -> Option<String> {
    let cell = cells.get(position.checked_sub(1)?)?;
    if cell.value().name() != "td" {
        return None;
    }
    cell.children()
        .find_map(|node| node.value().as_text().map(own_text))
}

fn own_text(text: &Text) -> String {
    let s: &str = text;
    s.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &str) -> String {
        format!("<html><body><table>{}</table></body></html>", rows)
    }

    const FULL_ROW: &str = "<tr><td>Dry Maize</td><td>Mixed</td><td>Grade 1</td><td>skip</td>\
        <td>Kibuye</td><td>45.00/Kg</td><td>50.00/Kg</td><td>2000</td><td>Kisumu</td>\
        <td>2024-05-02</td><td>extra</td></tr>";

    #[test]
    fn full_row_maps_fixed_positions() {
        let page = parse_page(&table(FULL_ROW)).unwrap();
        let records: Vec<_> = page.records().collect();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.commodity.as_deref(), Some("Dry Maize"));
        assert_eq!(r.classification.as_deref(), Some("Mixed"));
        assert_eq!(r.grade.as_deref(), Some("Grade 1"));
        assert_eq!(r.market.as_deref(), Some("Kibuye"));
        assert_eq!(r.wholesale.as_deref(), Some("45.00"));
        assert_eq!(r.retail.as_deref(), Some("50.00"));
        assert_eq!(r.supply_volume, "2000");
        assert_eq!(r.county.as_deref(), Some("Kisumu"));
        assert_eq!(r.date.as_deref(), Some("2024-05-02"));
    }

    #[test]
    fn short_row_yields_missing_fields() {
        let page = parse_page(&table("<tr><td>Beans</td><td>Rosecoco</td></tr>")).unwrap();
        let r = page.records().next().unwrap();
        assert_eq!(r.commodity.as_deref(), Some("Beans"));
        assert_eq!(r.classification.as_deref(), Some("Rosecoco"));
        assert_eq!(r.grade, None);
        assert_eq!(r.market, None);
        assert_eq!(r.wholesale.as_deref(), Some("N/A"));
        assert_eq!(r.retail.as_deref(), Some("N/A"));
        assert_eq!(r.supply_volume, "N/A");
        assert_eq!(r.county, None);
        assert_eq!(r.date, None);
    }

    #[test]
    fn empty_supply_cell_defaults_to_placeholder() {
        let row = "<tr><td>Kales</td><td></td><td></td><td></td><td>Wakulima</td>\
            <td>-</td><td>30/Kg</td><td></td><td>Nairobi</td><td>2024-05-01</td></tr>";
        let page = parse_page(&table(row)).unwrap();
        let r = page.records().next().unwrap();
        assert_eq!(r.supply_volume, "N/A");
        assert_eq!(r.classification, None);
        assert_eq!(r.wholesale.as_deref(), Some("N/A"));
        assert_eq!(r.retail.as_deref(), Some("30"));
    }

    #[test]
    fn header_row_has_no_commodity() {
        let html = table("<tr><th>Commodity</th><th>Classification</th></tr>");
        let page = parse_page(&html).unwrap();
        assert_eq!(page.row_count(), 1);
        let r = page.records().next().unwrap();
        assert_eq!(r.commodity, None);
        assert!(!r.has_commodity());
    }

    #[test]
    fn th_occupies_a_position() {
        let html = table("<tr><th>Label</th><td>Mixed</td></tr>");
        let page = parse_page(&html).unwrap();
        let r = page.records().next().unwrap();
        assert_eq!(r.commodity, None);
        assert_eq!(r.classification.as_deref(), Some("Mixed"));
    }

    #[test]
    fn only_direct_text_is_read() {
        let html = table("<tr><td><a href=\"/x\">Linked</a></td><td>plain <b>bold</b></td></tr>");
        let page = parse_page(&html).unwrap();
        let r = page.records().next().unwrap();
        assert_eq!(r.commodity, None);
        assert_eq!(r.classification.as_deref(), Some("plain "));
    }

    #[test]
    fn counts_rows_across_tables() {
        let html = format!(
            "<html><body><table>{}</table><p>x</p><table>{}{}</table></body></html>",
            FULL_ROW, FULL_ROW, "<tr><td></td></tr>"
        );
        let page = parse_page(&html).unwrap();
        assert_eq!(page.row_count(), 3);
        assert_eq!(page.records().count(), 3);
    }

    #[test]
    fn page_without_table_has_no_rows() {
        let page = parse_page("<html><body><p>No results</p></body></html>").unwrap();
        assert_eq!(page.row_count(), 0);
        assert!(page.records().next().is_none());
    }
}
