use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(match serde_json::to_value(value)? {
        Value::Array(items) => render_rows(&items),
        // Objects become field/value rows.
        Value::Object(map) => {
            let rows = map
                .iter()
                .map(|(key, value)| vec![key.clone(), cell(value)])
                .collect::<Vec<_>>();
            table::render_table(&["field", "value"], &rows, options())
        }
        scalar => table::render_table(&["value"], &[vec![cell(&scalar)]], options()),
    })
}

fn render_rows(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(none)");
    }

    if !items.iter().all(Value::is_object) {
        let rows = items.iter().map(|item| vec![cell(item)]).collect::<Vec<_>>();
        return table::render_table(&["value"], &rows, options());
    }

    let mut headers = Vec::<&str>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(&key.as_str()) {
                headers.push(key.as_str());
            }
        }
    }

    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(*header).map_or_else(|| String::from("-"), cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    table::render_table(&headers, &rows, options())
}

/// Flatten a JSON value into one table cell. String lists join with commas.
fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::Array(items) if items.iter().all(Value::is_string) => {
            if items.is_empty() {
                return String::from("(none)");
            }
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        }
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}
