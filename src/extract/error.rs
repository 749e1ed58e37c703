use thiserror::Error;

/// Errors that can occur while mapping a rendered node tree to shapes.
///
/// Everything recoverable (unparseable colors, missing fonts) degrades in
/// place and never surfaces here; only structural problems do.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Row/column spans produce a non-rectangular grid. Carries enough
    /// context for the caller to decide between aborting and degrading the
    /// table to a stack of plain text boxes.
    #[error(
        "malformed table at {path}: spans do not form a rectangular {rows}x{columns} grid \
         (row {row} covers {found} of {columns} columns)"
    )]
    MalformedTable {
        /// Node path of the offending table, e.g. `table > tr[1]`.
        path: String,
        rows: usize,
        columns: usize,
        /// 0-based index of the first inconsistent row.
        row: usize,
        /// Number of grid columns that row actually covers.
        found: usize,
    },

    /// A table element with no row content at all.
    #[error("table at {path} contains no rows")]
    EmptyTable { path: String },
}

/// A specialized Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
