use crate::extraction::Table;

/// Reconstruct tables from pdftotext -layout output.
///
/// pdftotext -layout keeps columns apart with runs of spaces. A table is a
/// run of non-blank lines with at least two column segments; a line with a
/// single segment directly below a row continues the cell it sits under,
/// which is how wrapped cells look in layout mode. Blank lines end a table.
pub fn extract_tables(lines: &[String]) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut current: Table = Vec::new();
    // Start column of every cell in the last row, for continuation lines.
    let mut columns: Vec<usize> = Vec::new();

    for line in lines {
        let segments = split_by_whitespace_gaps(line);

        if segments.is_empty() {
            if !current.is_empty() {
                tables.push(std::mem::take(&mut current));
            }
            columns.clear();
            continue;
        }

        if segments.len() >= 2 {
            columns = segments.iter().map(|(col, _)| *col).collect();
            current.push(segments.iter().map(|(_, s)| s.to_string()).collect());
            continue;
        }

        // Single-segment lines outside a table are free text.
        let (col, text) = segments[0];
        if let Some(row) = current.last_mut() {
            let idx = nearest_column(&columns, col);
            if let Some(cell) = row.get_mut(idx) {
                cell.push('\n');
                cell.push_str(text);
            }
        }
    }

    if !current.is_empty() {
        tables.push(current);
    }

    tables
}

/// Index of the cell whose start column is the closest one at or before `col`.
fn nearest_column(columns: &[usize], col: usize) -> usize {
    columns
        .iter()
        .rposition(|&start| start <= col)
        .unwrap_or(0)
}

/// Split a line by gaps of 2+ whitespace characters.
///
/// Returns each segment with its starting character column.
pub fn split_by_whitespace_gaps(line: &str) -> Vec<(usize, &str)> {
    let mut segments = Vec::new();
    let mut start: Option<(usize, usize)> = None;
    let mut last_non_space_end = 0;
    let mut space_count = 0;

    for (col, (i, c)) in line.char_indices().enumerate() {
        if c.is_whitespace() {
            space_count += 1;
            if space_count == 2 {
                if let Some((s_col, s)) = start.take() {
                    segments.push((s_col, &line[s..last_non_space_end]));
                }
            }
        } else {
            if start.is_none() {
                start = Some((col, i));
            }
            space_count = 0;
            last_non_space_end = i + c.len_utf8();
        }
    }

    if let Some((s_col, s)) = start {
        segments.push((s_col, &line[s..last_non_space_end]));
    }

    segments
}
