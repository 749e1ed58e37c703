//! Reconstruction of an HTML table subtree into a rectangular cell grid.
//!
//! Row and column spans are honored by walking an occupancy grid; a span
//! layout that does not tile a rectangle is a structural error surfaced to
//! the caller rather than silently mis-placed.

use crate::extract::error::{ExtractError, Result};
use crate::extract::fonts::FontResolver;
use crate::extract::style;
use crate::extract::text;
use crate::extract::units::px_to_emu;
use crate::models::geometry::ShapeFrame;
use crate::models::node::RenderedNode;
use crate::models::shape::{TableCellRecord, TableRecord, TextRun};

/// Reconstructs a `table` node into a rectangular grid. `path` identifies
/// the table in error messages (e.g. `slide-3/table[0]`).
pub fn reconstruct(
    node: &RenderedNode,
    path: &str,
    fonts: &FontResolver,
    dpi: f64,
) -> Result<TableRecord> {
    let row_nodes = collect_rows(node);
    if row_nodes.is_empty() {
        return Err(ExtractError::EmptyTable { path: path.to_string() });
    }

    let rows = row_nodes.len();
    let mut occupancy: Vec<Vec<bool>> = vec![Vec::new(); rows];
    let mut cells = Vec::new();

    for (r, row) in row_nodes.iter().enumerate() {
        let mut col = 0usize;
        for cell in row.children.iter().filter(|c| is_cell(c)) {
            // Skip grid positions claimed by a rowspan from an earlier row.
            while occupancy[r].get(col).copied().unwrap_or(false) {
                col += 1;
            }
            let column_span = span_attr(cell, "colspan");
            let row_span = span_attr(cell, "rowspan").min(rows - r);
            for occ_row in occupancy.iter_mut().take(r + row_span).skip(r) {
                if occ_row.len() < col + column_span {
                    occ_row.resize(col + column_span, false);
                }
                for slot in &mut occ_row[col..col + column_span] {
                    *slot = true;
                }
            }
            cells.push(build_cell(cell, r, col, row_span, column_span, fonts, dpi));
            col += column_span;
        }
    }

    let columns = occupancy.iter().map(Vec::len).max().unwrap_or(0);
    for (r, occ_row) in occupancy.iter().enumerate() {
        let found = occ_row.iter().filter(|&&o| o).count();
        if found != columns {
            return Err(ExtractError::MalformedTable {
                path: path.to_string(),
                rows,
                columns,
                row: r,
                found,
            });
        }
    }

    Ok(TableRecord { rows, columns, cells })
}

fn is_cell(node: &RenderedNode) -> bool {
    node.tag == "td" || node.tag == "th"
}

/// Rows appear either directly under the table or inside
/// `thead`/`tbody`/`tfoot` sections.
fn collect_rows(table: &RenderedNode) -> Vec<&RenderedNode> {
    let mut rows = Vec::new();
    for child in &table.children {
        match child.tag.as_str() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => {
                rows.extend(child.children.iter().filter(|c| c.tag == "tr"));
            }
            _ => {}
        }
    }
    rows
}

/// Reads a span attribute, treating missing, zero, and garbage values as 1
/// the way browsers do.
fn span_attr(cell: &RenderedNode, name: &str) -> usize {
    cell.attr(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n >= 1)
        .unwrap_or(1)
}

fn build_cell(
    cell: &RenderedNode,
    row: usize,
    column: usize,
    row_span: usize,
    column_span: usize,
    fonts: &FontResolver,
    dpi: f64,
) -> TableCellRecord {
    let record = style::resolve(cell);
    let runs: Vec<TextRun> = text::segment(cell, fonts)
        .into_iter()
        .flat_map(|p| p.runs)
        .collect();
    TableCellRecord {
        row,
        column,
        row_span,
        column_span,
        frame: ShapeFrame {
            x: px_to_emu(cell.bounds.x, dpi),
            y: px_to_emu(cell.bounds.y, dpi),
            width: px_to_emu(cell.bounds.width, dpi),
            height: px_to_emu(cell.bounds.height, dpi),
        },
        fill: record.fill,
        borders: record.borders,
        alignment: record.alignment,
        header: cell.tag == "th",
        runs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::geometry::DEFAULT_DPI;

    fn text_node(text: &str) -> RenderedNode {
        RenderedNode {
            tag: "#text".into(),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    fn cell(tag: &str, text: &str, spans: &[(&str, &str)]) -> RenderedNode {
        let mut c = RenderedNode { tag: tag.into(), ..Default::default() };
        for (k, v) in spans {
            c.attrs.insert((*k).into(), (*v).into());
        }
        c.children.push(text_node(text));
        c
    }

    fn row(cells: Vec<RenderedNode>) -> RenderedNode {
        RenderedNode { tag: "tr".into(), children: cells, ..Default::default() }
    }

    fn table(rows: Vec<RenderedNode>) -> RenderedNode {
        RenderedNode { tag: "table".into(), children: rows, ..Default::default() }
    }

    fn reconstruct_test(node: &RenderedNode) -> Result<TableRecord> {
        reconstruct(node, "test/table[0]", &FontResolver::new(), DEFAULT_DPI)
    }

    #[test]
    fn uniform_rows_form_a_clean_grid() {
        let t = table(vec![
            row(vec![cell("th", "A", &[]), cell("th", "B", &[]), cell("th", "C", &[])]),
            row(vec![cell("td", "1", &[]), cell("td", "2", &[]), cell("td", "3", &[])]),
            row(vec![cell("td", "4", &[]), cell("td", "5", &[]), cell("td", "6", &[])]),
        ]);
        let grid = reconstruct_test(&t).unwrap();
        assert_eq!((grid.rows, grid.columns), (3, 3));
        assert_eq!(grid.cells.len(), 9);
        assert!(grid.cells[0].header);
        assert!(!grid.cells[3].header);
        assert_eq!(grid.cells[4].runs[0].text, "2");
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let t = table(vec![
            row(vec![cell("td", "a", &[]), cell("td", "b", &[]), cell("td", "c", &[])]),
            row(vec![cell("td", "d", &[]), cell("td", "e", &[])]),
            row(vec![cell("td", "f", &[]), cell("td", "g", &[]), cell("td", "h", &[])]),
        ]);
        match reconstruct_test(&t) {
            Err(ExtractError::MalformedTable { row, found, columns, .. }) => {
                assert_eq!((row, found, columns), (1, 2, 3));
            }
            other => panic!("expected MalformedTable, got {other:?}"),
        }
    }

    #[test]
    fn spans_tile_the_grid() {
        // +---+---+---+
        // | a     | b |
        // +---+---+   |
        // | c | d |   |
        // +---+---+---+
        let t = table(vec![
            row(vec![
                cell("td", "a", &[("colspan", "2")]),
                cell("td", "b", &[("rowspan", "2")]),
            ]),
            row(vec![cell("td", "c", &[]), cell("td", "d", &[])]),
        ]);
        let grid = reconstruct_test(&t).unwrap();
        assert_eq!((grid.rows, grid.columns), (2, 3));
        assert_eq!(grid.cells.len(), 4);
        let b = &grid.cells[1];
        assert_eq!((b.row, b.column, b.row_span, b.column_span), (0, 2, 2, 1));
        let c = &grid.cells[2];
        assert_eq!((c.row, c.column), (1, 0));
    }

    #[test]
    fn rows_inside_sections_are_found() {
        let thead = RenderedNode {
            tag: "thead".into(),
            children: vec![row(vec![cell("th", "H", &[])])],
            ..Default::default()
        };
        let tbody = RenderedNode {
            tag: "tbody".into(),
            children: vec![row(vec![cell("td", "x", &[])])],
            ..Default::default()
        };
        let t = table(vec![thead, tbody]);
        let grid = reconstruct_test(&t).unwrap();
        assert_eq!((grid.rows, grid.columns), (2, 1));
    }

    #[test]
    fn empty_tables_are_an_error() {
        let t = table(vec![]);
        assert!(matches!(
            reconstruct_test(&t),
            Err(ExtractError::EmptyTable { .. })
        ));
    }

    #[test]
    fn oversized_rowspans_are_clipped_to_the_grid() {
        let t = table(vec![
            row(vec![cell("td", "a", &[("rowspan", "99")]), cell("td", "b", &[])]),
            row(vec![cell("td", "c", &[])]),
        ]);
        let grid = reconstruct_test(&t).unwrap();
        assert_eq!((grid.rows, grid.columns), (2, 2));
        assert_eq!(grid.cells[0].row_span, 2);
    }
}
