use serde::{Deserialize, Serialize};

/// A position in the installation's physical unit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub const ORIGIN: Point3D = Point3D {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Point3D { x, y, z }
    }

    /// Distance from the origin.
    pub fn norm(&self) -> f64 {
        (self.x.powi(2) + self.y.powi(2) + self.z.powi(2)).sqrt()
    }

    /// Same x/y, height shifted by `dz`.
    pub fn lowered(&self, dz: f64) -> Self {
        Point3D {
            z: self.z - dz,
            ..*self
        }
    }
}

impl From<[f64; 3]> for Point3D {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Point3D { x, y, z }
    }
}

impl From<Point3D> for [f64; 3] {
    fn from(p: Point3D) -> Self {
        [p.x, p.y, p.z]
    }
}

/// One addressable LED as the server expects it: `{"point": [x, y, z]}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedRecord {
    pub point: Point3D,
}

impl From<Point3D> for LedRecord {
    fn from(point: Point3D) -> Self {
        LedRecord { point }
    }
}

/// LEDs in address order. The server indexes this positionally.
pub type Layout = Vec<LedRecord>;
