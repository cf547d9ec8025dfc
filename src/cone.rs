use std::f64::consts::{FRAC_PI_2, TAU};

use crate::config::MAX_LAYOUT_LEN;
use crate::error::{LayoutError, Result};
use crate::led_coords::{Layout, LedRecord, Point3D};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeParams {
    pub radius: f64,
    pub leds_per_pole: usize,
    pub pole_count: usize,
}

impl Default for ConeParams {
    fn default() -> Self {
        ConeParams {
            radius: 5.0,
            leds_per_pole: 150,
            pole_count: 20,
        }
    }
}

impl ConeParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(LayoutError::InvalidArgument(format!(
                "radius must be a positive number, got {}",
                self.radius
            )));
        }
        if self.leds_per_pole == 0 {
            return Err(LayoutError::InvalidArgument(
                "leds per pole must be at least 1".to_string(),
            ));
        }
        if self.pole_count == 0 {
            return Err(LayoutError::InvalidArgument(
                "pole count must be at least 1".to_string(),
            ));
        }
        match self.pole_count.checked_mul(self.leds_per_pole) {
            Some(len) if len <= MAX_LAYOUT_LEN => Ok(()),
            _ => Err(LayoutError::InvalidArgument(format!(
                "{} poles of {} leds exceed the limit of {} leds",
                self.pole_count, self.leds_per_pole, MAX_LAYOUT_LEN
            ))),
        }
    }

    /// Position of LED `led` on pole `pole`.
    ///
    /// The polar angle runs from the apex (led 0) towards the equator, which
    /// is never reached; poles are spread evenly in azimuth.
    pub fn point(&self, pole: usize, led: usize) -> Point3D {
        let polar = FRAC_PI_2 * led as f64 / self.leds_per_pole as f64;
        let azimuth = TAU * pole as f64 / self.pole_count as f64;
        let r = self.radius;
        Point3D::new(
            r * polar.sin() * azimuth.cos(),
            r * polar.sin() * azimuth.sin(),
            r * polar.cos(),
        )
    }
}

/// Lays out every LED of every pole on the hemisphere of `params.radius`,
/// pole-major: all LEDs of pole 0 first, then pole 1, and so on.
pub fn generate_cone_layout(params: &ConeParams) -> Result<Layout> {
    params.validate()?;

    let mut layout = Layout::with_capacity(params.pole_count * params.leds_per_pole);
    for pole in 0..params.pole_count {
        for led in 0..params.leds_per_pole {
            layout.push(LedRecord::from(params.point(pole, led)));
        }
    }

    log::info!(
        "generated {} leds on {} poles (radius {})",
        layout.len(),
        params.pole_count,
        params.radius
    );
    Ok(layout)
}
