//! Markdown table rendering for result views.
use filefinder::Match;
use std::path::Path;

const MAX_COLUMN_WIDTH: usize = 75;
const HEADERS: [&str; 3] = ["file_path", "file_name", "file_content_slice"];

fn cells(record: &Match) -> [&str; 3] {
    [
        &record.file_path,
        &record.file_name,
        &record.file_content_slice,
    ]
}

/// Pads `text` to `width` characters, cutting it to `width - 4` plus "..." when it doesn't fit
pub fn truncate_str(text: &str, width: usize) -> String {
    let length = text.chars().count();
    if length <= width {
        return format!("{:<width$}", text, width = width);
    }
    let kept: String = text.chars().take(width.saturating_sub(4)).collect();
    format!("{:<width$}", format!("{}...", kept), width = width)
}

/// Wraps a path in an OSC 8 hyperlink to itself
pub fn make_clickable_path(path: &str, width: usize) -> String {
    let absolute = Path::new(path);
    format!(
        "\x1b]8;;file://{}\x1b\\{}\x1b]8;;\x1b\\",
        absolute.display(),
        truncate_str(path, width)
    )
}

/// Renders `records` as a markdown table, or an empty string for no records
pub fn records_to_markdown_table(records: &[Match], hyperlinks: bool) -> String {
    if records.is_empty() {
        return String::new();
    }

    let widths: Vec<usize> = HEADERS
        .iter()
        .enumerate()
        .map(|(column, header)| {
            records
                .iter()
                .map(|r| cells(r)[column].chars().count())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or(0)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect();

    let header = HEADERS
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{:<w$}", h, w = w))
        .collect::<Vec<_>>()
        .join(" | ");
    let separator = widths
        .iter()
        .map(|&w| "-".repeat(w))
        .collect::<Vec<_>>()
        .join(" | ");

    let mut lines = vec![format!("| {} |", header), format!("| {} |", separator)];
    for record in records {
        let row = cells(record)
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(column, (value, &w))| {
                if column == 0 && hyperlinks {
                    make_clickable_path(value, w)
                } else {
                    truncate_str(value, w)
                }
            })
            .collect::<Vec<_>>()
            .join(" | ");
        lines.push(format!("| {} |", row));
    }
    lines.join("\n")
}
