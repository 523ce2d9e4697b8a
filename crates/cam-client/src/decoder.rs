//! Response payload decoding
//!
//! The appliance renders results as an HTML table. Each `<tr>` is a row and
//! each `<td>` (or `<th>`) inside it is a cell keyed by its `name` attribute:
//!
//! ```html
//! <table>
//!   <tr><td name="error">false</td><td name="found">true</td></tr>
//!   <tr><td name="mac">00:16:17:18:19:1A</td><td name="type">allow</td></tr>
//! </table>
//! ```
//!
//! Cell text is whitespace-trimmed and has its HTML entities decoded.

use crate::content_type::ContentType;
use crate::error::DecodeError;
use crate::response::Row;
use encoding_rs::Encoding;
use scraper::{ElementRef, Html, Selector};
use std::borrow::Cow;

/// Attribute that names a cell
pub const CELL_NAME_ATTR: &str = "name";

/// Decode a raw body into rows using the charset declared by `content_type`
pub fn decode_payload(body: &[u8], content_type: &ContentType) -> Result<Vec<Row>, DecodeError> {
    let text = decode_text(body, content_type.charset_or_default())?;
    decode_rows(&text)
}

/// Decode bytes in the named charset, rejecting unmappable input
pub fn decode_text<'a>(body: &'a [u8], charset: &str) -> Result<Cow<'a, str>, DecodeError> {
    let encoding = Encoding::for_label(charset.trim().as_bytes())
        .ok_or_else(|| DecodeError::UnsupportedCharset(charset.to_string()))?;
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| DecodeError::Malformed(charset.to_string()))
}

/// Extract the table rows from already-decoded markup
pub fn decode_rows(markup: &str) -> Result<Vec<Row>, DecodeError> {
    if markup.trim().is_empty() {
        return Ok(Vec::new());
    }

    let row_selector = Selector::parse("tr").map_err(|e| DecodeError::Markup(e.to_string()))?;
    let lowered = markup.to_ascii_lowercase();
    let document = if lowered.contains("<table") {
        Html::parse_document(markup)
    } else {
        // The tree builder drops <tr>/<td> outside a table context
        Html::parse_fragment(&format!("<table>{markup}</table>"))
    };

    let rows = document
        .select(&row_selector)
        .enumerate()
        .map(|(index, tr)| decode_row(index, tr))
        .collect::<Result<Vec<_>, _>>()?;

    if rows.is_empty() && has_row_markup(&lowered) {
        return Err(DecodeError::Markup(
            "row markup present but no rows could be read".to_string(),
        ));
    }
    Ok(rows)
}

fn has_row_markup(lowered: &str) -> bool {
    ["<tr>", "<tr ", "<td>", "<td ", "<th>", "<th "]
        .iter()
        .any(|tag| lowered.contains(tag))
}

fn decode_row(index: usize, tr: ElementRef<'_>) -> Result<Row, DecodeError> {
    let mut row = Row::new();
    let cells = tr
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"));

    for (cell_index, cell) in cells.enumerate() {
        let name = cell
            .value()
            .attr(CELL_NAME_ATTR)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(DecodeError::UnnamedCell {
                row: index,
                cell: cell_index,
            })?;
        let value = cell.text().collect::<String>();
        row.insert(name, value.trim());
    }

    Ok(row)
}
