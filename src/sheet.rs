//! Read-only access to the cells of one worksheet.
//!
//! Cells are addressed 1-indexed, the way spreadsheet users name them
//! (`A1` is column 1, row 1).

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::error::{LayoutError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellRef {
    pub column: u32,
    pub row: u32,
}

impl CellRef {
    pub fn new(column: u32, row: u32) -> Self {
        CellRef { column, row }
    }
}

/// A1 notation: column letters followed by the row number.
impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut letters = Vec::new();
        let mut n = self.column;
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push(b'A' + rem as u8);
            n = (n - 1) / 26;
        }
        letters.reverse();
        let letters = String::from_utf8_lossy(&letters);
        write!(f, "{}{}", letters, self.row)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "number {}", n),
            CellValue::Text(s) => write!(f, "text {:?}", s),
            CellValue::Empty => write!(f, "an empty cell"),
        }
    }
}

pub trait CellSource {
    /// Sheet name, used in diagnostics.
    fn name(&self) -> &str;

    fn cell(&self, cell: CellRef) -> CellValue;
}

/// Reads `cell` as a number. Anything else is reported with the cell address.
pub fn read_number<S: CellSource + ?Sized>(source: &S, cell: CellRef) -> Result<f64> {
    match source.cell(cell) {
        CellValue::Number(n) => Ok(n),
        other => Err(LayoutError::MalformedData {
            sheet: source.name().to_string(),
            cell,
            found: other.to_string(),
        }),
    }
}

/// One sheet of a workbook, loaded into memory.
///
/// The workbook file is closed once the sheet has been read.
pub struct XlsxSheet {
    name: String,
    range: Range<Data>,
}

impl XlsxSheet {
    pub fn open(path: &Path, sheet: &str) -> Result<Self> {
        if !path.is_file() {
            return Err(LayoutError::WorkbookNotFound(path.to_path_buf()));
        }

        let mut workbook = open_workbook_auto(path)?;
        let available = workbook.sheet_names();
        if !available.iter().any(|name| name == sheet) {
            return Err(LayoutError::SheetNotFound {
                sheet: sheet.to_string(),
                available,
            });
        }

        let range = workbook.worksheet_range(sheet)?;
        log::debug!(
            "loaded sheet {:?} from {} ({:?} to {:?})",
            sheet,
            path.display(),
            range.start(),
            range.end()
        );
        Ok(XlsxSheet {
            name: sheet.to_string(),
            range,
        })
    }
}

impl CellSource for XlsxSheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn cell(&self, cell: CellRef) -> CellValue {
        if cell.row == 0 || cell.column == 0 {
            return CellValue::Empty;
        }
        match self.range.get_value((cell.row - 1, cell.column - 1)) {
            None | Some(Data::Empty) => CellValue::Empty,
            Some(Data::Int(i)) => CellValue::Number(*i as f64),
            Some(Data::Float(f)) => CellValue::Number(*f),
            Some(Data::String(s)) => CellValue::Text(s.clone()),
            Some(other) => CellValue::Text(other.to_string()),
        }
    }
}

/// Sparse in-memory sheet. Used for CSV exports and for building fixtures.
#[derive(Debug, Clone, Default)]
pub struct GridSheet {
    name: String,
    cells: BTreeMap<CellRef, CellValue>,
}

impl GridSheet {
    pub fn new(name: impl Into<String>) -> Self {
        GridSheet {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, cell: CellRef, value: CellValue) {
        if value == CellValue::Empty {
            self.cells.remove(&cell);
        } else {
            self.cells.insert(cell, value);
        }
    }

    pub fn set_number(&mut self, column: u32, row: u32, value: f64) {
        self.set(CellRef::new(column, row), CellValue::Number(value));
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Parses a headerless CSV export: the first field of the first line is A1.
    pub fn from_csv_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut sheet = GridSheet::new(name);
        for (row_idx, record) in rdr.records().enumerate() {
            let record = record?;
            for (col_idx, field) in record.iter().enumerate() {
                let cell = CellRef::new(col_idx as u32 + 1, row_idx as u32 + 1);
                sheet.set(cell, parse_field(field));
            }
        }
        Ok(sheet)
    }

    /// Loads a CSV export of the sheet called `name`.
    pub fn from_csv_path(path: &Path, name: impl Into<String>) -> Result<Self> {
        if !path.is_file() {
            return Err(LayoutError::WorkbookNotFound(path.to_path_buf()));
        }
        let file = std::fs::File::open(path)?;
        let sheet = Self::from_csv_reader(name, file)?;
        log::debug!("loaded {} cells from {}", sheet.len(), path.display());
        Ok(sheet)
    }
}

fn parse_field(field: &str) -> CellValue {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(field.to_string()),
    }
}

impl CellSource for GridSheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn cell(&self, cell: CellRef) -> CellValue {
        self.cells.get(&cell).cloned().unwrap_or(CellValue::Empty)
    }
}
