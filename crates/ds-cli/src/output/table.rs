#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

const MIN_COLUMN: usize = 4;

/// Render an aligned plain-text table.
///
/// Columns shrink (widest first) until the table fits `max_width`; cells that
/// no longer fit are cut with an ellipsis.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.chars().count())
                .max(MIN_COLUMN)
        })
        .collect();

    shrink_to_fit(&mut widths, headers, options.max_width);

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad(&clip(header, *width), *width))
        .collect::<Vec<_>>()
        .join("  ");
    let divider = "-".repeat(header_line.chars().count());

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header_line.trim_end().to_string());
    lines.push(divider.trim_end().to_string());
    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let cell = row.get(index).map_or("-", String::as_str);
                let clipped = clip(cell, *width);
                let padded = pad(&clipped, *width);
                if options.color {
                    highlight(&clipped, padded)
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

fn shrink_to_fit(widths: &mut [usize], headers: &[&str], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };
    let separators = widths.len().saturating_sub(1) * 2;

    while widths.iter().sum::<usize>() + separators > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(idx, width)| **width > headers[*idx].chars().count().max(MIN_COLUMN))
            .max_by_key(|(_, width)| **width)
            .map(|(idx, _)| idx);
        let Some(idx) = widest else {
            break;
        };
        widths[idx] -= 1;
    }
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    format!("{value}{}", " ".repeat(width.saturating_sub(len)))
}

/// Color well-known status words. Padding is computed before the escape codes
/// are added so alignment is unaffected.
fn highlight(cell: &str, padded: String) -> String {
    let code = match cell.to_ascii_lowercase().as_str() {
        "true" | "found" | "stored" | "configured" | "clean" => "32",
        "unavailable" | "skipped" | "not configured" => "33",
        "false" | "missing" | "failed" | "error" => "31",
        _ => return padded,
    };
    padded.replacen(cell, &format!("\u{1b}[{code}m{cell}\u{1b}[0m"), 1)
}
