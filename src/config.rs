use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Largest strip the LED server can address.
pub const MAX_STRIP_LENGTH: usize = 4096;
/// Last column and row of an xlsx worksheet.
pub const MAX_COLUMN: u32 = 16_384;
pub const MAX_ROW: u32 = 1_048_576;
/// Upper bound on the points a single layout may hold.
pub const MAX_LAYOUT_LEN: usize = 1 << 20;

/// Where the spreadsheet keeps each pair of strips, and how the strips are
/// finished off for the LED server. Defaults describe the 20 strip rig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetLayoutConfig {
    pub sheet_name: String,
    pub pair_count: usize,
    pub rows_per_strip: usize,
    /// First row holding LED coordinates (1-indexed).
    pub first_row: u32,
    /// Column shared by both strips of every pair for the LED height.
    pub height_column: u32,
    /// x column of strip A of the first pair. Strip A's y follows it,
    /// then strip B's x and y.
    pub first_pair_column: u32,
    pub pair_column_stride: u32,
    /// Cell values are divided by this.
    pub scale: f64,
    /// Heart LEDs hung off the end of each strip.
    pub heart_count: usize,
    /// How far below the strip's last LED the hearts sit.
    pub heart_drop: f64,
    /// The server assumes this many pixels per strip.
    pub strip_length: usize,
}

impl Default for SheetLayoutConfig {
    fn default() -> Self {
        SheetLayoutConfig {
            sheet_name: "20Ex".to_string(),
            pair_count: 10,
            rows_per_strip: 54,
            first_row: 5,
            height_column: 2,
            first_pair_column: 3,
            pair_column_stride: 4,
            scale: 100.0,
            heart_count: 14,
            heart_drop: 0.1,
            strip_length: 100,
        }
    }
}

impl SheetLayoutConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: SheetLayoutConfig = serde_json::from_str(&text)?;
        log::debug!("loaded layout config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Number of points emitted for the whole sheet, if it fits in a `usize`.
    pub fn layout_len(&self) -> Option<usize> {
        self.pair_count.checked_mul(2)?.checked_mul(self.strip_length)
    }

    /// Column holding strip B's y for the last pair.
    pub fn last_column(&self) -> Option<u32> {
        let pairs = u32::try_from(self.pair_count.checked_sub(1)?).ok()?;
        self.pair_column_stride
            .checked_mul(pairs)?
            .checked_add(self.first_pair_column)?
            .checked_add(3)
    }

    /// Row holding the last LED of every strip.
    pub fn last_row(&self) -> Option<u32> {
        let rows = u32::try_from(self.rows_per_strip.checked_sub(1)?).ok()?;
        self.first_row.checked_add(rows)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(LayoutError::InvalidArgument(msg)) };

        if self.sheet_name.is_empty() {
            return invalid("sheet name must not be empty".to_string());
        }
        if self.pair_count == 0 {
            return invalid("pair count must be at least 1".to_string());
        }
        if self.rows_per_strip == 0 {
            return invalid("rows per strip must be at least 1".to_string());
        }
        if self.first_row == 0 || self.height_column == 0 || self.first_pair_column == 0 {
            return invalid("rows and columns are 1-indexed".to_string());
        }
        if !(self.scale.is_finite() && self.scale != 0.0) {
            return invalid(format!("scale must be a non-zero number, got {}", self.scale));
        }
        if !self.heart_drop.is_finite() {
            return invalid(format!("heart drop must be finite, got {}", self.heart_drop));
        }
        if self.strip_length > MAX_STRIP_LENGTH {
            return invalid(format!(
                "strip length {} exceeds the limit of {}",
                self.strip_length, MAX_STRIP_LENGTH
            ));
        }
        match self.layout_len() {
            Some(len) if len <= MAX_LAYOUT_LEN => {}
            _ => {
                return invalid(format!(
                    "{} pairs of {} leds exceed the limit of {} leds",
                    self.pair_count, self.strip_length, MAX_LAYOUT_LEN
                ))
            }
        }
        match self.last_column() {
            Some(col) if col <= MAX_COLUMN && self.height_column <= MAX_COLUMN => {}
            _ => return invalid("pair columns run past the last sheet column".to_string()),
        }
        match self.last_row() {
            Some(row) if row <= MAX_ROW => {}
            _ => return invalid("strip rows run past the last sheet row".to_string()),
        }
        let filled = self.rows_per_strip.checked_add(self.heart_count);
        if filled.map_or(true, |filled| filled > self.strip_length) {
            return invalid(format!(
                "{} rows plus {} hearts do not fit a strip of {} leds",
                self.rows_per_strip, self.heart_count, self.strip_length
            ));
        }
        Ok(())
    }
}
