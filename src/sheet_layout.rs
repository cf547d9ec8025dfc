use std::cmp::Ordering;

use crate::config::SheetLayoutConfig;
use crate::error::{LayoutError, Result};
use crate::led_coords::{Layout, LedRecord, Point3D};
use crate::sheet::{read_number, CellRef, CellSource};

/// Builds the full layout from a sheet: every pair contributes strip A then
/// strip B, each finished with [`finish_strip`].
pub fn generate_sheet_layout<S: CellSource + ?Sized>(
    sheet: &S,
    config: &SheetLayoutConfig,
) -> Result<Layout> {
    config.validate()?;

    let mut layout = Layout::with_capacity(config.layout_len().unwrap_or_default());
    for pair in 0..config.pair_count {
        let (strip_a, strip_b) = read_pair(sheet, config, pair)?;
        for strip in [strip_a, strip_b] {
            let strip = finish_strip(strip, config)?;
            layout.extend(strip.into_iter().map(LedRecord::from));
        }
    }

    log::info!(
        "extracted {} leds from {} pairs of sheet {:?}",
        layout.len(),
        config.pair_count,
        sheet.name()
    );
    Ok(layout)
}

/// Reads the raw points of both strips of `pair`, in row order.
pub fn read_pair<S: CellSource + ?Sized>(
    sheet: &S,
    config: &SheetLayoutConfig,
    pair: usize,
) -> Result<(Vec<Point3D>, Vec<Point3D>)> {
    config.validate()?;
    if pair >= config.pair_count {
        return Err(LayoutError::InvalidArgument(format!(
            "pair {} out of range, the sheet has {} pairs",
            pair, config.pair_count
        )));
    }
    // validate() keeps every column and row below the sheet limits
    let col = config.first_pair_column + config.pair_column_stride * pair as u32;
    let number = |column: u32, row: u32| -> Result<f64> {
        Ok(read_number(sheet, CellRef::new(column, row))? / config.scale)
    };

    let mut strip_a = Vec::with_capacity(config.strip_length);
    let mut strip_b = Vec::with_capacity(config.strip_length);
    for index in 0..config.rows_per_strip {
        let row = config.first_row + index as u32;
        let z = number(config.height_column, row)?;
        strip_a.push(Point3D::new(number(col, row)?, number(col + 1, row)?, z));
        strip_b.push(Point3D::new(number(col + 2, row)?, number(col + 3, row)?, z));
    }

    log::debug!(
        "pair {}: read rows {}..{} from columns {}..{}",
        pair,
        config.first_row,
        config.first_row as usize + config.rows_per_strip,
        CellRef::new(col, config.first_row),
        CellRef::new(col + 3, config.first_row)
    );
    Ok((strip_a, strip_b))
}

/// Hangs the heart LEDs below the last point, pads with the origin up to the
/// strip length and orders the strip from highest to lowest.
///
/// The sort is stable, so LEDs at equal height keep their row order. A strip
/// that does not fit `strip_length` once the hearts are added is an error.
pub fn finish_strip(mut strip: Vec<Point3D>, config: &SheetLayoutConfig) -> Result<Vec<Point3D>> {
    let hearts = if strip.is_empty() { 0 } else { config.heart_count };
    match strip.len().checked_add(hearts) {
        Some(len) if len <= config.strip_length => {}
        _ => {
            return Err(LayoutError::InvalidArgument(format!(
                "{} leds plus {} hearts do not fit a strip of {} leds",
                strip.len(),
                hearts,
                config.strip_length
            )))
        }
    }

    if let Some(last) = strip.last().copied() {
        let heart = last.lowered(config.heart_drop);
        strip.extend(std::iter::repeat(heart).take(config.heart_count));
    }
    if strip.len() < config.strip_length {
        strip.resize(config.strip_length, Point3D::ORIGIN);
    }
    strip.sort_by(|a, b| b.z.partial_cmp(&a.z).unwrap_or(Ordering::Equal));
    Ok(strip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::{CellValue, GridSheet};

    /// A sheet where every coordinate cell holds `pair * 1000 + column`
    /// and the height column counts rows.
    fn synthetic_sheet(config: &SheetLayoutConfig) -> GridSheet {
        let mut sheet = GridSheet::new(config.sheet_name.clone());
        for index in 0..config.rows_per_strip as u32 {
            let row = config.first_row + index;
            sheet.set_number(config.height_column, row, index as f64);
            for pair in 0..config.pair_count as u32 {
                let col = config.first_pair_column + config.pair_column_stride * pair;
                for c in col..col + 4 {
                    sheet.set_number(c, row, (pair * 1000 + c) as f64);
                }
            }
        }
        sheet
    }

    fn is_descending(strip: &[LedRecord]) -> bool {
        strip.windows(2).all(|w| w[0].point.z >= w[1].point.z)
    }

    #[test]
    fn default_rig_yields_2000_points() {
        let config = SheetLayoutConfig::default();
        let layout = generate_sheet_layout(&synthetic_sheet(&config), &config).unwrap();
        assert_eq!(layout.len(), 2000);
    }

    #[test]
    fn every_strip_is_sorted_by_height() {
        let config = SheetLayoutConfig::default();
        let layout = generate_sheet_layout(&synthetic_sheet(&config), &config).unwrap();
        for strip in layout.chunks(config.strip_length) {
            assert!(is_descending(strip));
        }
    }

    #[test]
    fn strips_are_pair_major_a_before_b() {
        let config = SheetLayoutConfig::default();
        let layout = generate_sheet_layout(&synthetic_sheet(&config), &config).unwrap();
        let strips: Vec<_> = layout.chunks(config.strip_length).collect();
        assert_eq!(strips.len(), 20);
        for pair in 0..10u32 {
            let col = 3 + 4 * pair;
            let base = (pair * 1000) as f64;
            // highest led comes from the last row
            let a = strips[2 * pair as usize][0].point;
            let b = strips[2 * pair as usize + 1][0].point;
            assert_eq!((a.x, a.y), ((base + col as f64) / 100.0, (base + col as f64 + 1.0) / 100.0));
            assert_eq!((b.x, b.y), ((base + col as f64 + 2.0) / 100.0, (base + col as f64 + 3.0) / 100.0));
            assert_eq!(a.z, 53.0 / 100.0);
            assert_eq!(b.z, a.z);
        }
    }

    #[test]
    fn rising_strip_scenario() {
        let config = SheetLayoutConfig {
            pair_count: 1,
            ..Default::default()
        };
        let mut sheet = GridSheet::new("20Ex");
        for index in 0..54u32 {
            let row = 5 + index;
            sheet.set_number(2, row, index as f64);
            sheet.set_number(3, row, 100.0);
            sheet.set_number(4, row, 200.0);
            sheet.set_number(5, row, 0.0);
            sheet.set_number(6, row, 0.0);
        }

        let layout = generate_sheet_layout(&sheet, &config).unwrap();
        assert_eq!(layout.len(), 200);
        let strip_a: Vec<Point3D> = layout[..100].iter().map(|r| r.point).collect();

        let heart = Point3D::new(1.0, 2.0, 0.53).lowered(0.1);
        // 0.53 down to 0.44
        for (i, p) in strip_a[..10].iter().enumerate() {
            assert_eq!(p.z, (53 - i) as f64 / 100.0);
            assert_eq!((p.x, p.y), (1.0, 2.0));
        }
        // the 14 hearts land next to the row at 0.43
        let around_hearts = &strip_a[10..25];
        assert_eq!(around_hearts.iter().filter(|p| **p == heart).count(), 14);
        assert!(around_hearts.contains(&Point3D::new(1.0, 2.0, 0.43)));
        // remaining rows 0.42 .. 0.00
        for (i, p) in strip_a[25..68].iter().enumerate() {
            assert_eq!(p.z, (42 - i) as f64 / 100.0);
            assert_eq!((p.x, p.y), (1.0, 2.0));
        }
        // row 0 sits at z = 0 and keeps its place ahead of the padding
        assert_eq!(strip_a[67], Point3D::new(1.0, 2.0, 0.0));
        for p in &strip_a[68..] {
            assert_eq!(*p, Point3D::ORIGIN);
        }
    }

    #[test]
    fn hearts_follow_the_last_row_not_the_highest() {
        let config = SheetLayoutConfig {
            rows_per_strip: 3,
            heart_count: 2,
            strip_length: 6,
            ..Default::default()
        };
        let strip = vec![
            Point3D::new(1.0, 1.0, 0.9),
            Point3D::new(2.0, 2.0, 0.5),
            Point3D::new(3.0, 3.0, 0.2),
        ];
        let finished = finish_strip(strip, &config).unwrap();
        let hearts = Point3D::new(3.0, 3.0, 0.2).lowered(0.1);
        assert_eq!(
            finished,
            vec![
                Point3D::new(1.0, 1.0, 0.9),
                Point3D::new(2.0, 2.0, 0.5),
                Point3D::new(3.0, 3.0, 0.2),
                hearts,
                hearts,
                Point3D::ORIGIN,
            ]
        );
    }

    #[test]
    fn points_below_ground_sort_after_padding() {
        let config = SheetLayoutConfig {
            rows_per_strip: 2,
            heart_count: 1,
            strip_length: 5,
            ..Default::default()
        };
        let strip = vec![Point3D::new(1.0, 0.0, 0.3), Point3D::new(2.0, 0.0, 0.05)];
        let finished = finish_strip(strip, &config).unwrap();
        assert_eq!(finished.len(), 5);
        assert_eq!(finished[1], Point3D::new(2.0, 0.0, 0.05));
        assert_eq!(finished[2], Point3D::ORIGIN);
        assert_eq!(finished[3], Point3D::ORIGIN);
        assert!((finished[4].z - (-0.05)).abs() < 1e-12);
    }

    #[test]
    fn stable_for_equal_heights() {
        let config = SheetLayoutConfig {
            rows_per_strip: 3,
            heart_count: 0,
            strip_length: 3,
            ..Default::default()
        };
        let strip = vec![
            Point3D::new(1.0, 0.0, 0.5),
            Point3D::new(2.0, 0.0, 0.5),
            Point3D::new(3.0, 0.0, 0.5),
        ];
        assert_eq!(finish_strip(strip.clone(), &config).unwrap(), strip);
    }

    #[test]
    fn rerun_is_identical() {
        let config = SheetLayoutConfig::default();
        let sheet = synthetic_sheet(&config);
        let first = generate_sheet_layout(&sheet, &config).unwrap();
        let second = generate_sheet_layout(&sheet, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_cell_stops_extraction() {
        let config = SheetLayoutConfig::default();
        let mut sheet = synthetic_sheet(&config);
        // pair 3, strip B y column, 10th row
        let cell = CellRef::new(3 + 4 * 3 + 3, 5 + 9);
        sheet.set(cell, CellValue::Text("#REF!".into()));

        let err = generate_sheet_layout(&sheet, &config).unwrap_err();
        match err {
            LayoutError::MalformedData { cell: bad, .. } => assert_eq!(bad, cell),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn missing_height_is_reported() {
        let config = SheetLayoutConfig::default();
        let mut sheet = synthetic_sheet(&config);
        sheet.set(CellRef::new(2, 58), CellValue::Empty);
        let err = generate_sheet_layout(&sheet, &config).unwrap_err();
        assert!(err.to_string().contains("B58"), "{}", err);
    }

    #[test]
    fn invalid_config_is_rejected_before_reading() {
        let config = SheetLayoutConfig {
            heart_count: 60,
            ..Default::default()
        };
        let sheet = GridSheet::new("20Ex");
        assert!(matches!(
            generate_sheet_layout(&sheet, &config),
            Err(LayoutError::InvalidArgument(_))
        ));
    }

    #[test]
    fn overlong_strip_is_an_error_not_a_longer_strip() {
        let config = SheetLayoutConfig {
            heart_count: 2,
            strip_length: 4,
            ..Default::default()
        };
        let strip = vec![Point3D::new(1.0, 0.0, 0.5); 3];
        assert!(matches!(
            finish_strip(strip, &config),
            Err(LayoutError::InvalidArgument(_))
        ));

        let exact = vec![Point3D::new(1.0, 0.0, 0.5); 2];
        assert_eq!(finish_strip(exact, &config).unwrap().len(), 4);
    }

    #[test]
    fn pair_outside_the_rig_is_rejected() {
        let config = SheetLayoutConfig::default();
        let sheet = synthetic_sheet(&config);
        assert!(matches!(
            read_pair(&sheet, &config, 10),
            Err(LayoutError::InvalidArgument(_))
        ));
        assert!(read_pair(&sheet, &config, 9).is_ok());
    }

    #[test]
    fn oversized_config_fails_before_reading() {
        let config: SheetLayoutConfig =
            serde_json::from_str(r#"{"strip_length": 18446744073709551615}"#).unwrap();
        let sheet = GridSheet::new("20Ex");
        assert!(matches!(
            generate_sheet_layout(&sheet, &config),
            Err(LayoutError::InvalidArgument(_))
        ));
        assert!(matches!(
            read_pair(&sheet, &config, 0),
            Err(LayoutError::InvalidArgument(_))
        ));
    }
}
