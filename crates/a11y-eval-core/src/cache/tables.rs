//! Tables sub-cache: cell grid, spans and header resolution.
//!
//! Rows are gathered per row group (`thead`, `tbody`, `tfoot`, or a run of
//! `tr` directly under the table). Each cell is placed at the first free
//! grid slot of its row and occupies `rowspan × colspan` slots; `rowspan=0`
//! extends to the end of the row group and all spans are clamped to it.

use super::{DomCache, DomElement, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const MAX_COLSPAN: usize = 1000;
const MAX_ROWSPAN: usize = 65534;

/// How a table is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableType {
    /// Visual layout only.
    Layout,
    /// Simple data table.
    Data,
    /// Data table with spanning headers or explicit `headers` references.
    Complex,
}

impl TableType {
    /// Returns `true` for data and complex tables.
    #[must_use]
    pub fn is_data(self) -> bool {
        matches!(self, Self::Data | Self::Complex)
    }
}

/// One cell placed in the grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCell {
    /// The `td`/`th` element.
    pub node: NodeId,
    /// First row (0-based).
    pub row: usize,
    /// First column (0-based).
    pub column: usize,
    /// Rows covered after clamping.
    pub row_span: usize,
    /// Columns covered after clamping.
    pub col_span: usize,
    /// `true` for `th` or an explicit header role.
    pub is_header: bool,
    /// Lower-case `scope` attribute of a header.
    pub scope: Option<String>,
    /// Ids listed in the `headers` attribute.
    pub headers_attr: Vec<String>,
    /// Resolved header cells, each listed once.
    pub headers: Vec<NodeId>,
}

/// One table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableElement {
    /// Cache-scoped id.
    pub cache_id: usize,
    /// The table element.
    pub node: NodeId,
    /// Usage classification.
    pub table_type: TableType,
    /// Number of rows.
    pub max_row: usize,
    /// Number of columns.
    pub max_column: usize,
    /// Cells in source order.
    pub cells: Vec<TableCell>,
    /// `grid[row][column]` is an index into `cells`.
    pub grid: Vec<Vec<Option<usize>>>,
    /// The `caption` element.
    pub caption: Option<NodeId>,
    /// Enclosing table.
    pub parent_table: Option<NodeId>,
    /// Number of enclosing tables.
    pub nesting_depth: usize,
}

impl TableElement {
    /// Returns the cell covering a grid position.
    #[must_use]
    pub fn cell_at(&self, row: usize, column: usize) -> Option<&TableCell> {
        let index = (*self.grid.get(row)?.get(column)?)?;
        self.cells.get(index)
    }

    /// Returns the cell record of `node`.
    #[must_use]
    pub fn cell(&self, node: NodeId) -> Option<&TableCell> {
        self.cells.iter().find(|c| c.node == node)
    }

    /// Cells in row-major grid order; a merged cell is yielded once, at the
    /// first slot it covers.
    #[must_use]
    pub fn unique_cells(&self) -> Vec<&TableCell> {
        let mut processed = HashSet::new();
        let mut out = Vec::new();
        for row in &self.grid {
            for index in row.iter().flatten() {
                if processed.insert(*index) {
                    if let Some(cell) = self.cells.get(*index) {
                        out.push(cell);
                    }
                }
            }
        }
        out
    }

    /// Cells that are not headers.
    pub fn data_cells(&self) -> impl Iterator<Item = &TableCell> {
        self.cells.iter().filter(|c| !c.is_header)
    }
}

/// All tables of the page.
#[derive(Debug, Default)]
pub struct TablesCache {
    tables: Vec<TableElement>,
}

fn parse_span(value: Option<&str>) -> Option<usize> {
    value.and_then(|v| v.trim().parse::<usize>().ok())
}

fn is_header_cell(e: &DomElement) -> bool {
    if e.has_explicit_role {
        return matches!(e.role.as_deref(), Some("columnheader" | "rowheader"));
    }
    e.tag_name == "th"
}

/// Row groups of a table, not descending into nested tables.
fn row_groups(cache: &DomCache, table: NodeId) -> Vec<Vec<NodeId>> {
    let mut groups: Vec<Vec<NodeId>> = Vec::new();
    let mut loose: Vec<NodeId> = Vec::new();
    for child in cache.child_elements(table) {
        match child.tag_name.as_str() {
            "tr" => loose.push(child.id),
            "thead" | "tbody" | "tfoot" => {
                if !loose.is_empty() {
                    groups.push(std::mem::take(&mut loose));
                }
                groups.push(
                    cache
                        .child_elements(child.id)
                        .filter(|r| r.tag_name == "tr")
                        .map(|r| r.id)
                        .collect(),
                );
            }
            _ => {}
        }
    }
    if !loose.is_empty() {
        groups.push(loose);
    }
    groups
}

fn place_cells(cache: &DomCache, table: NodeId) -> (Vec<TableCell>, Vec<Vec<Option<usize>>>) {
    let mut cells: Vec<TableCell> = Vec::new();
    let mut grid: Vec<Vec<Option<usize>>> = Vec::new();
    let mut row_offset = 0;

    for group in row_groups(cache, table) {
        let group_rows = group.len();
        grid.resize_with(row_offset + group_rows, Vec::new);

        for (r, tr) in group.iter().enumerate() {
            let row = row_offset + r;
            let remaining = group_rows - r;
            let mut column = 0;
            for e in cache
                .child_elements(*tr)
                .filter(|c| matches!(c.tag_name.as_str(), "td" | "th"))
            {
                while grid[row].get(column).copied().flatten().is_some() {
                    column += 1;
                }
                let col_span = parse_span(e.attribute("colspan"))
                    .filter(|s| *s > 0)
                    .unwrap_or(1)
                    .min(MAX_COLSPAN);
                let row_span = match parse_span(e.attribute("rowspan")) {
                    Some(0) => remaining,
                    Some(s) => s.min(MAX_ROWSPAN),
                    None => 1,
                }
                .clamp(1, remaining);

                let index = cells.len();
                for slot_row in &mut grid[row..row + row_span] {
                    if slot_row.len() < column + col_span {
                        slot_row.resize(column + col_span, None);
                    }
                    for slot in &mut slot_row[column..column + col_span] {
                        *slot = Some(index);
                    }
                }

                cells.push(TableCell {
                    node: e.id,
                    row,
                    column,
                    row_span,
                    col_span,
                    is_header: is_header_cell(e),
                    scope: e
                        .attribute("scope")
                        .map(|s| s.trim().to_ascii_lowercase())
                        .filter(|s| !s.is_empty()),
                    headers_attr: e
                        .attribute("headers")
                        .map(|h| h.split_whitespace().map(String::from).collect())
                        .unwrap_or_default(),
                    headers: Vec::new(),
                });
                column += col_span;
            }
        }
        row_offset += group_rows;
    }
    (cells, grid)
}

/// Resolves the header cells of the cell at `index`.
///
/// Explicit `headers` ids win; otherwise column headers above the cell and
/// row headers to its left are collected. Each header is listed once even
/// when it spans several of the scanned slots.
fn resolve_headers(
    cache: &DomCache,
    cells: &[TableCell],
    grid: &[Vec<Option<usize>>],
    index: usize,
) -> Vec<NodeId> {
    let cell = &cells[index];
    let mut processed: HashSet<NodeId> = HashSet::new();
    let mut headers = Vec::new();

    if !cell.headers_attr.is_empty() {
        for id in &cell.headers_attr {
            if let Some(e) = cache.element_by_id(id) {
                if e.id != cell.node && processed.insert(e.id) {
                    headers.push(e.id);
                }
            }
        }
        return headers;
    }

    let slot = |row: usize, column: usize| -> Option<&TableCell> {
        let i = (*grid.get(row)?.get(column)?)?;
        (i != index).then(|| cells.get(i)).flatten()
    };

    for row in (0..cell.row).rev() {
        if let Some(h) = slot(row, cell.column) {
            if h.is_header && h.scope.as_deref() != Some("row") && processed.insert(h.node) {
                headers.push(h.node);
            }
        }
    }
    for column in (0..cell.column).rev() {
        if let Some(h) = slot(cell.row, column) {
            if h.is_header && h.scope.as_deref() != Some("col") && processed.insert(h.node) {
                headers.push(h.node);
            }
        }
    }
    headers
}

fn classify(cache: &DomCache, table: &DomElement, cells: &[TableCell]) -> TableType {
    if table.has_explicit_role && matches!(table.role.as_deref(), Some("presentation" | "none")) {
        return TableType::Layout;
    }

    let has_headers = cells.iter().any(|c| c.is_header);
    let uses_headers_attr = cells.iter().any(|c| !c.headers_attr.is_empty());
    let has_structure = cache
        .child_elements(table.id)
        .any(|c| matches!(c.tag_name.as_str(), "caption" | "thead"))
        || table
            .attribute("summary")
            .is_some_and(|s| !s.trim().is_empty());
    let explicit_data = table.has_explicit_role
        && matches!(table.role.as_deref(), Some("table" | "grid" | "treegrid"));

    if !(has_headers || uses_headers_attr || has_structure || explicit_data) {
        return TableType::Layout;
    }

    let spanning_header = cells
        .iter()
        .any(|c| c.is_header && (c.row_span > 1 || c.col_span > 1));
    if uses_headers_attr || spanning_header {
        TableType::Complex
    } else {
        TableType::Data
    }
}

impl TablesCache {
    /// Collects tables from the DOM cache.
    #[must_use]
    pub fn build(cache: &DomCache) -> Self {
        let mut tables = Vec::new();
        for e in cache.elements().filter(|e| e.tag_name == "table") {
            let (mut cells, grid) = place_cells(cache, e.id);
            let resolved: Vec<Vec<NodeId>> = (0..cells.len())
                .map(|i| {
                    if cells[i].is_header {
                        Vec::new()
                    } else {
                        resolve_headers(cache, &cells, &grid, i)
                    }
                })
                .collect();
            for (cell, headers) in cells.iter_mut().zip(resolved) {
                cell.headers = headers;
            }

            let parent_table = cache
                .ancestors(e.id)
                .find(|a| a.tag_name == "table")
                .map(|a| a.id);
            let nesting_depth = cache
                .ancestors(e.id)
                .filter(|a| a.tag_name == "table")
                .count();
            let caption = cache
                .child_elements(e.id)
                .find(|c| c.tag_name == "caption")
                .map(|c| c.id);

            tables.push(TableElement {
                cache_id: tables.len(),
                node: e.id,
                table_type: classify(cache, e, &cells),
                max_row: grid.len(),
                max_column: grid.iter().map(Vec::len).max().unwrap_or(0),
                cells,
                grid,
                caption,
                parent_table,
                nesting_depth,
            });
        }
        tracing::debug!("Tables cache: {} table(s)", tables.len());
        Self { tables }
    }

    /// Tables in document order.
    #[must_use]
    pub fn tables(&self) -> &[TableElement] {
        &self.tables
    }

    /// Data and complex tables.
    pub fn data_tables(&self) -> impl Iterator<Item = &TableElement> {
        self.tables.iter().filter(|t| t.table_type.is_data())
    }

    /// Returns the table record of `node`.
    #[must_use]
    pub fn table(&self, node: NodeId) -> Option<&TableElement> {
        self.tables.iter().find(|t| t.node == node)
    }
}
