// QueryBench - core/report.rs
//
// Renders a monitor snapshot as an aligned table, either `|`-bordered plain
// text or `;`-delimited "aligned CSV".
//
// Rendering is two-pass: the tree is first flattened into six columns of
// cells (each column tracking its widest cell), then rows are emitted with
// every cell padded to its column width. Cells are never quoted or escaped,
// so a name containing the separator breaks the column structure of CSV
// output.

use crate::core::model::{AggregateNode, NumberStyle, ReportFormat};
use crate::util::constants;

/// Column headers, in output order.
const HEADERS: [&str; 6] = ["Measurement Point", "#", "Average", "Min", "Max", "Total"];

// =============================================================================
// Cells
// =============================================================================

/// One rendered table cell. Every variant reserves one space on each side.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Cell {
    /// Header text, centered; odd leftover space goes to the left.
    Centered(String),
    /// Point name, left-aligned after `2 * level` spaces of indentation.
    Nested { level: usize, text: String },
    /// Numeric value, right-aligned.
    RightAligned(String),
}

impl Cell {
    /// Width this cell needs, including its two padding spaces.
    fn width(&self) -> usize {
        match self {
            Cell::Centered(text) | Cell::RightAligned(text) => text_width(text) + 2,
            Cell::Nested { level, text } => 2 * level + text_width(text) + 2,
        }
    }

    /// Append the cell padded to exactly `column_width` characters.
    fn write_to(&self, out: &mut String, column_width: usize) {
        match self {
            Cell::Centered(text) => {
                let remaining = column_width - text_width(text);
                let left = remaining - remaining / 2;
                let right = remaining / 2;
                pad(out, left);
                out.push_str(text);
                pad(out, right);
            }
            Cell::Nested { level, text } => {
                let indent = 2 * level;
                out.push(' ');
                pad(out, indent);
                out.push_str(text);
                pad(out, column_width - indent - text_width(text) - 1);
            }
            Cell::RightAligned(text) => {
                pad(out, column_width - text_width(text) - 1);
                out.push_str(text);
                out.push(' ');
            }
        }
    }
}

fn text_width(text: &str) -> usize {
    text.chars().count()
}

fn pad(out: &mut String, n: usize) {
    out.extend(std::iter::repeat(' ').take(n));
}

// =============================================================================
// Column model
// =============================================================================

/// One column: its cells (header first) and the widest cell seen.
#[derive(Debug, Clone)]
struct Column {
    cells: Vec<Cell>,
    width: usize,
}

impl Column {
    fn new(header: &str) -> Self {
        let mut column = Self {
            cells: Vec::new(),
            width: 0,
        };
        column.push(Cell::Centered(header.to_string()));
        column
    }

    fn push(&mut self, cell: Cell) {
        self.width = self.width.max(cell.width());
        self.cells.push(cell);
    }
}

/// The flattened table for one render call.
#[derive(Debug, Clone)]
struct Table {
    columns: [Column; 6],
}

impl Table {
    fn build(root: &AggregateNode, style: &NumberStyle) -> Self {
        let mut table = Self {
            columns: HEADERS.map(Column::new),
        };
        for child in root.children.values() {
            table.add_subtree(0, child, style);
        }
        table
    }

    /// Pre-order: the node's row, then its children one level deeper.
    fn add_subtree(&mut self, level: usize, node: &AggregateNode, style: &NumberStyle) {
        self.add_row(level, node, style);
        for child in node.children.values() {
            self.add_subtree(level + 1, child, style);
        }
    }

    fn add_row(&mut self, level: usize, node: &AggregateNode, style: &NumberStyle) {
        let [name, count, average, min, max, total] = &mut self.columns;
        name.push(Cell::Nested {
            level,
            text: node.name.clone(),
        });
        count.push(Cell::RightAligned(node.count.to_string()));
        average.push(Cell::RightAligned(style.format_millis(node.average)));
        min.push(Cell::RightAligned(style.format_millis(node.min)));
        max.push(Cell::RightAligned(style.format_millis(node.max)));
        total.push(Cell::RightAligned(style.format_millis(node.total)));
    }

    fn row_count(&self) -> usize {
        self.columns[0].cells.len()
    }

    fn write(&self, format: ReportFormat) -> String {
        let separator = format.separator();
        let mut out = String::new();
        for row in 0..self.row_count() {
            if format == ReportFormat::Plain {
                out.push(separator);
            }
            for (i, column) in self.columns.iter().enumerate() {
                if i > 0 {
                    out.push(separator);
                }
                column.cells[row].write_to(&mut out, column.width);
            }
            if format == ReportFormat::Plain {
                out.push(separator);
            }
            out.push_str(constants::LINE_ENDING);
        }
        out
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Render a snapshot's descendants as a table.
///
/// The root itself is not a row; its children start at nesting level 0.
/// Siblings appear in name order. An empty tree yields the header row only.
pub fn render(root: &AggregateNode, format: ReportFormat, style: &NumberStyle) -> String {
    let table = Table::build(root, style);
    tracing::debug!(
        rows = table.row_count() - 1,
        format = %format,
        "Report rendered"
    );
    table.write(format)
}

/// Like [`render`], but returns the fixed "no monitor" message when there is
/// no snapshot at all.
pub fn render_snapshot(
    snapshot: Option<&AggregateNode>,
    format: ReportFormat,
    style: &NumberStyle,
) -> String {
    match snapshot {
        Some(root) => render(root, format, style),
        None => constants::NO_MONITOR_MESSAGE.to_string(),
    }
}

/// Write one summary line per top-level point, for log output.
pub fn summary_line(root: &AggregateNode, style: &NumberStyle) -> String {
    let mut line = String::new();
    for (i, node) in root.children.values().enumerate() {
        if i > 0 {
            line.push_str(", ");
        }
        line.push_str(&format!(
            "{}: {} statement(s) in {} ms",
            node.name,
            node.children.values().map(|c| c.count).sum::<u64>(),
            style.format_millis(node.total)
        ));
    }
    line
}
