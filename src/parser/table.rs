use serde::Deserialize;

/// Upper bounds browsers apply to span attributes.
const MAX_COL_SPAN: usize = 1000;
const MAX_ROW_SPAN: usize = 65534;

/// How row-spanning cells are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SpanMode {
    /// Repeat each cell `col_span` times in its own row; `row_span` is ignored.
    /// Matches previously saved output.
    #[default]
    Legacy,
    /// Full grid placement: a cell with `row_span > 1` is carried into the rows below.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
    pub text: String,
    pub row_span: usize,
    pub col_span: usize,
}

impl RawCell {
    pub fn new(text: impl Into<String>, row_span: usize, col_span: usize) -> Self {
        RawCell {
            text: text.into(),
            row_span: row_span.clamp(1, MAX_ROW_SPAN),
            col_span: col_span.clamp(1, MAX_COL_SPAN),
        }
    }
}

/// Parse a `rowspan`/`colspan` attribute. Absent, non-numeric, zero or negative → 1.
pub fn parse_span(attr: Option<&str>) -> usize {
    attr.and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(1)
}

/// Expand raw cells into a dense grid of strings. Rows left with no cells are dropped.
pub fn reconstruct(raw_rows: Vec<Vec<RawCell>>, mode: SpanMode) -> Vec<Vec<String>> {
    match mode {
        SpanMode::Legacy => reconstruct_legacy(raw_rows),
        SpanMode::Strict => reconstruct_strict(raw_rows),
    }
}

fn reconstruct_legacy(raw_rows: Vec<Vec<RawCell>>) -> Vec<Vec<String>> {
    raw_rows
        .into_iter()
        .map(|cells| {
            cells
                .into_iter()
                .flat_map(|c| std::iter::repeat(c.text).take(c.col_span))
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect()
}

/// A cell still occupying its column in `rows_left` more rows.
#[derive(Debug, Clone)]
struct Carried {
    text: String,
    rows_left: usize,
}

fn reconstruct_strict(raw_rows: Vec<Vec<RawCell>>) -> Vec<Vec<String>> {
    let mut carried: Vec<Option<Carried>> = Vec::new();
    let mut grid = Vec::with_capacity(raw_rows.len());

    for cells in raw_rows {
        let mut row: Vec<String> = Vec::new();
        let mut cells = cells.into_iter().peekable();
        let mut col = 0;

        loop {
            if let Some(mut span) = carried.get_mut(col).and_then(Option::take) {
                row.push(span.text.clone());
                span.rows_left -= 1;
                if span.rows_left > 0 {
                    carried[col] = Some(span);
                }
                col += 1;
                continue;
            }

            if let Some(cell) = cells.next() {
                for _ in 0..cell.col_span {
                    if carried.len() <= col {
                        carried.resize(col + 1, None);
                    }
                    // An overlapping cell wins over the span above it.
                    carried[col] = (cell.row_span > 1).then(|| Carried {
                        text: cell.text.clone(),
                        rows_left: cell.row_span - 1,
                    });
                    row.push(cell.text.clone());
                    col += 1;
                }
                continue;
            }

            // Own cells exhausted: pad the gap only if a span still sits further right.
            if carried.iter().skip(col).any(Option::is_some) {
                row.push(String::new());
                col += 1;
                continue;
            }
            break;
        }

        if !row.is_empty() {
            grid.push(row);
        }
    }

    grid
}
