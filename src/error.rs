use std::path::PathBuf;

use crate::sheet::CellRef;

#[derive(thiserror::Error, Debug)]
pub enum LayoutError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("workbook not found: {}", .0.display())]
    WorkbookNotFound(PathBuf),

    #[error("sheet {sheet:?} not found (available: {})", .available.join(", "))]
    SheetNotFound { sheet: String, available: Vec<String> },

    #[error("sheet {sheet:?}, cell {cell}: expected a number, found {found}")]
    MalformedData {
        sheet: String,
        cell: CellRef,
        found: String,
    },

    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("failed to read csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = LayoutError> = std::result::Result<T, E>;
