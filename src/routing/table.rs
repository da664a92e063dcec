//! Table strategy: rules from the first `<table>` in the article

use indexmap::IndexMap;
use scraper::{ElementRef, Html};

/// Extract `first cell → second cell` pairs from the first table
///
/// Returns `None` when the document has no table at all, which is the only
/// case in which the keyword fallback may run. Returns `Some` (possibly empty)
/// as soon as a table exists. Later tables are ignored.
///
/// Rows are every `<tr>` inside the table; cells are a row's direct `<td>`
/// children. Rows with fewer than two cells are skipped, cells beyond the
/// second are ignored.
pub fn extract_first_table(document: &Html) -> Option<IndexMap<String, String>> {
    let table = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "table")?;

    let mut entries = IndexMap::new();
    let rows = table
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "tr");

    for row in rows {
        let mut cells = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|element| element.value().name() == "td");

        if let (Some(first), Some(second)) = (cells.next(), cells.next()) {
            entries.insert(cell_text(first), cell_text(second));
        }
    }

    Some(entries)
}

/// Visible text of a cell with whitespace runs collapsed and ends trimmed
fn cell_text(cell: ElementRef<'_>) -> String {
    let raw: String = cell.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
