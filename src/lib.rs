//! Generators for the LED position files read by the LED server.
//!
//! Two sources are supported: poles arranged on a hemisphere
//! ([`generate_cone_layout`]) and the hearts installation spreadsheet
//! ([`generate_sheet_layout`]). Both produce a [`Layout`], written out with
//! [`write_layout`].

pub mod cone;
pub mod config;
pub mod error;
pub mod led_coords;
pub mod output;
pub mod sheet;
pub mod sheet_layout;

pub use cone::{generate_cone_layout, ConeParams};
pub use config::SheetLayoutConfig;
pub use error::{LayoutError, Result};
pub use led_coords::{Layout, LedRecord, Point3D};
pub use output::{to_json, write_layout};
pub use sheet::{read_number, CellRef, CellSource, CellValue, GridSheet, XlsxSheet};
pub use sheet_layout::{finish_strip, generate_sheet_layout, read_pair};
