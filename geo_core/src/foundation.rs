//! # Foundation Definition
//!
//! Foundation shape, embedment, loads, and material grades.
//!
//! ## Shapes
//!
//! The shape is a closed tagged variant; everything that depends on shape
//! (plan area, B/L, 2:1 spread area, shape factors) is a method on
//! [`FoundationShape`], so a new shape is one new variant rather than new
//! branches scattered across modules.
//!
//! | Shape      | Dimensions          | Plan area         |
//! |------------|---------------------|-------------------|
//! | Isolated   | width × length      | B·L               |
//! | Strip      | width (per metre)   | B·1 m             |
//! | Raft       | width × length      | B·L               |
//! | Circular   | diameter            | π·D²/4            |
//!
//! ## Example
//!
//! ```rust
//! use geo_core::foundation::{FoundationShape, FoundationSpec};
//!
//! let spec = FoundationSpec::new(FoundationShape::Raft { width: 10.0, length: 10.0 }, 2.0, 16_000.0);
//! assert_eq!(spec.shape.plan_area(), 100.0);
//! assert_eq!(spec.applied_pressure(), 160.0);
//! assert_eq!(spec.target_fos, 3.0);
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// L/B ratio at and beyond which a rectangle behaves like a strip
pub const ELONGATED_ASPECT_RATIO: f64 = 10.0;

/// Default target factor of safety for allowable bearing pressure
pub const DEFAULT_TARGET_FOS: f64 = 3.0;

/// Default square column size (m)
pub const DEFAULT_COLUMN_SIZE: f64 = 0.4;

/// Foundation plan shape with its dimensions (m).
///
/// ## JSON Example
///
/// ```json
/// { "type": "Isolated", "width": 2.0, "length": 3.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FoundationShape {
    /// Isolated pad footing under a single column
    Isolated { width: f64, length: f64 },
    /// Continuous strip footing; loads are per metre run
    Strip { width: f64 },
    /// Raft (mat) foundation
    Raft { width: f64, length: f64 },
    /// Circular pad
    Circular { diameter: f64 },
}

impl FoundationShape {
    /// Least plan dimension B (m)
    pub fn width(&self) -> f64 {
        match *self {
            FoundationShape::Isolated { width, length } | FoundationShape::Raft { width, length } => {
                width.min(length)
            }
            FoundationShape::Strip { width } => width,
            FoundationShape::Circular { diameter } => diameter,
        }
    }

    /// Greatest plan dimension L (m); a strip reports its 1 m design run
    pub fn length(&self) -> f64 {
        match *self {
            FoundationShape::Isolated { width, length } | FoundationShape::Raft { width, length } => {
                width.max(length)
            }
            FoundationShape::Strip { .. } => 1.0,
            FoundationShape::Circular { diameter } => diameter,
        }
    }

    /// Plan area (m²); per metre run for a strip
    pub fn plan_area(&self) -> f64 {
        match *self {
            FoundationShape::Isolated { width, length } | FoundationShape::Raft { width, length } => width * length,
            FoundationShape::Strip { width } => width,
            FoundationShape::Circular { diameter } => PI * diameter.powi(2) / 4.0,
        }
    }

    /// B/L in [0, 1]; zero for a strip, one for a circle
    pub fn width_ratio(&self) -> f64 {
        match self {
            FoundationShape::Strip { .. } => 0.0,
            FoundationShape::Circular { .. } => 1.0,
            _ => self.width() / self.length(),
        }
    }

    /// Strips and long rectangles use the plane-strain influence depth
    pub fn is_elongated(&self) -> bool {
        match self {
            FoundationShape::Strip { .. } => true,
            FoundationShape::Circular { .. } => false,
            _ => self.length() / self.width() >= ELONGATED_ASPECT_RATIO,
        }
    }

    /// Loaded area at depth `z` below the base under a 2:1 spread (m²)
    pub fn spread_area(&self, z: f64) -> f64 {
        let z = z.max(0.0);
        match *self {
            FoundationShape::Isolated { width, length } | FoundationShape::Raft { width, length } => {
                (width + z) * (length + z)
            }
            FoundationShape::Strip { width } => width + z,
            FoundationShape::Circular { diameter } => PI * (diameter + z).powi(2) / 4.0,
        }
    }

    /// Bearing capacity shape factors (sc, sq, sγ)
    pub fn shape_factors(&self, nq: f64, nc: f64, phi_rad: f64) -> (f64, f64, f64) {
        match self {
            FoundationShape::Strip { .. } => (1.0, 1.0, 1.0),
            FoundationShape::Circular { .. } => (1.0 + nq / nc, 1.0 + phi_rad.tan(), 0.6),
            FoundationShape::Isolated { .. } | FoundationShape::Raft { .. } => {
                let r = self.width_ratio();
                (
                    1.0 + r * nq / nc,
                    1.0 + r * phi_rad.tan(),
                    (1.0 - 0.4 * r).max(0.6),
                )
            }
        }
    }

    /// Edge pressure coefficient for eccentric load: 6 for rectangles, 8 for circles
    pub fn eccentricity_coefficient(&self) -> f64 {
        match self {
            FoundationShape::Circular { .. } => 8.0,
            _ => 6.0,
        }
    }

    /// Get shape name
    pub fn name(&self) -> &'static str {
        match self {
            FoundationShape::Isolated { .. } => "Isolated",
            FoundationShape::Strip { .. } => "Strip",
            FoundationShape::Raft { .. } => "Raft",
            FoundationShape::Circular { .. } => "Circular",
        }
    }

    fn validate(&self) -> CalcResult<()> {
        let dims: Vec<(&str, f64)> = match *self {
            FoundationShape::Isolated { width, length } | FoundationShape::Raft { width, length } => {
                vec![("width", width), ("length", length)]
            }
            FoundationShape::Strip { width } => vec![("width", width)],
            FoundationShape::Circular { diameter } => vec![("diameter", diameter)],
        };
        for (field, value) in dims {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::invalid_geometry(
                    field,
                    value.to_string(),
                    "Plan dimensions must be positive",
                ));
            }
        }
        Ok(())
    }
}

/// Concrete strength grade (characteristic cylinder strength)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ConcreteGrade {
    C20,
    #[default]
    C25,
    C30,
    C35,
    C40,
    C45,
    C50,
}

impl ConcreteGrade {
    /// All grades for UI selection
    pub const ALL: [ConcreteGrade; 7] = [
        ConcreteGrade::C20,
        ConcreteGrade::C25,
        ConcreteGrade::C30,
        ConcreteGrade::C35,
        ConcreteGrade::C40,
        ConcreteGrade::C45,
        ConcreteGrade::C50,
    ];

    /// Specified compressive strength fc' (MPa)
    pub fn fc_mpa(&self) -> f64 {
        match self {
            ConcreteGrade::C20 => 20.0,
            ConcreteGrade::C25 => 25.0,
            ConcreteGrade::C30 => 30.0,
            ConcreteGrade::C35 => 35.0,
            ConcreteGrade::C40 => 40.0,
            ConcreteGrade::C45 => 45.0,
            ConcreteGrade::C50 => 50.0,
        }
    }
}

/// Reinforcing steel grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SteelGrade {
    /// fy = 280 MPa
    Grade40,
    /// fy = 420 MPa
    #[default]
    Grade60,
    /// fy = 520 MPa
    Grade75,
}

impl SteelGrade {
    /// Yield strength fy (MPa)
    pub fn fy_mpa(&self) -> f64 {
        match self {
            SteelGrade::Grade40 => 280.0,
            SteelGrade::Grade60 => 420.0,
            SteelGrade::Grade75 => 520.0,
        }
    }
}

fn default_target_fos() -> f64 {
    DEFAULT_TARGET_FOS
}

fn default_column_size() -> f64 {
    DEFAULT_COLUMN_SIZE
}

/// Complete foundation definition.
///
/// ## JSON Example
///
/// ```json
/// {
///   "shape": { "type": "Raft", "width": 10.0, "length": 10.0 },
///   "depth": 2.0,
///   "load": 16000.0,
///   "concrete_grade": "C30",
///   "steel_grade": "Grade60",
///   "groundwater_depth": 2.0,
///   "target_fos": 3.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundationSpec {
    /// Plan shape and dimensions
    pub shape: FoundationShape,

    /// Embedment depth of the base below ground surface (m)
    pub depth: f64,

    /// Applied vertical service load (kN; kN/m for a strip)
    pub load: f64,

    /// Applied overturning moment (kN·m)
    #[serde(default)]
    pub moment: Option<f64>,

    /// Square column size for punching shear (m)
    #[serde(default = "default_column_size")]
    pub column_size: f64,

    /// Concrete strength grade
    #[serde(default)]
    pub concrete_grade: ConcreteGrade,

    /// Reinforcement grade
    #[serde(default)]
    pub steel_grade: SteelGrade,

    /// Groundwater depth below surface (m); `None` means no water table
    #[serde(default)]
    pub groundwater_depth: Option<f64>,

    /// Ground slope angle (degrees)
    #[serde(default)]
    pub slope_angle: Option<f64>,

    /// Target factor of safety for allowable bearing pressure
    #[serde(default = "default_target_fos")]
    pub target_fos: f64,
}

impl FoundationSpec {
    /// Create a spec with default grades, no water table and no slope
    pub fn new(shape: FoundationShape, depth: f64, load: f64) -> Self {
        FoundationSpec {
            shape,
            depth,
            load,
            moment: None,
            column_size: DEFAULT_COLUMN_SIZE,
            concrete_grade: ConcreteGrade::default(),
            steel_grade: SteelGrade::default(),
            groundwater_depth: None,
            slope_angle: None,
            target_fos: DEFAULT_TARGET_FOS,
        }
    }

    /// Applied contact pressure q = P/A (kPa)
    pub fn applied_pressure(&self) -> f64 {
        self.load / self.shape.plan_area()
    }

    /// Slope angle when the ground is actually inclined
    pub fn active_slope_angle(&self) -> Option<f64> {
        self.slope_angle.filter(|beta| *beta > 0.0)
    }

    /// Validate geometry and loads against the profile depth.
    pub fn validate(&self, profile_depth: f64) -> CalcResult<()> {
        self.shape.validate()?;
        if !self.depth.is_finite() || self.depth < 0.0 {
            return Err(CalcError::invalid_geometry(
                "depth",
                self.depth.to_string(),
                "Embedment depth must be zero or positive",
            ));
        }
        if self.depth >= profile_depth {
            return Err(CalcError::invalid_geometry(
                "depth",
                self.depth.to_string(),
                format!("Embedment must be above the profile bottom at {:.2} m", profile_depth),
            ));
        }
        if !self.load.is_finite() || self.load <= 0.0 {
            return Err(CalcError::invalid_input(
                "load",
                self.load.to_string(),
                "Applied load must be positive",
            ));
        }
        if let Some(moment) = self.moment {
            if !moment.is_finite() {
                return Err(CalcError::invalid_input("moment", moment.to_string(), "Moment must be finite"));
            }
        }
        if !self.column_size.is_finite() || self.column_size <= 0.0 {
            return Err(CalcError::invalid_geometry(
                "column_size",
                self.column_size.to_string(),
                "Column size must be positive",
            ));
        }
        if self.column_size > self.shape.width() {
            return Err(CalcError::invalid_geometry(
                "column_size",
                self.column_size.to_string(),
                "Column cannot be wider than the foundation",
            ));
        }
        if let Some(dw) = self.groundwater_depth {
            if !dw.is_finite() || dw < 0.0 {
                return Err(CalcError::invalid_input(
                    "groundwater_depth",
                    dw.to_string(),
                    "Groundwater depth must be zero or positive",
                ));
            }
        }
        if let Some(beta) = self.slope_angle {
            if !beta.is_finite() || !(0.0..90.0).contains(&beta) {
                return Err(CalcError::invalid_input(
                    "slope_angle",
                    beta.to_string(),
                    "Slope angle must lie in [0, 90) degrees",
                ));
            }
        }
        if !self.target_fos.is_finite() || self.target_fos <= 0.0 {
            return Err(CalcError::invalid_input(
                "target_fos",
                self.target_fos.to_string(),
                "Target factor of safety must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circular_shape_factors() {
        let circle = FoundationShape::Circular { diameter: 3.0 };
        let phi = 30f64.to_radians();
        let (sc, sq, sg) = circle.shape_factors(18.4, 30.14, phi);
        assert!((sc - (1.0 + 18.4 / 30.14)).abs() < 1e-12);
        assert!((sq - (1.0 + phi.tan())).abs() < 1e-12);
        assert_eq!(sg, 0.6);
        assert_eq!(circle.eccentricity_coefficient(), 8.0);
        assert_eq!(FoundationShape::Strip { width: 1.0 }.eccentricity_coefficient(), 6.0);
    }

    #[test]
    fn test_plan_areas() {
        assert_eq!(FoundationShape::Isolated { width: 2.0, length: 3.0 }.plan_area(), 6.0);
        assert_eq!(FoundationShape::Strip { width: 1.5 }.plan_area(), 1.5);
        let circle = FoundationShape::Circular { diameter: 2.0 };
        assert!((circle.plan_area() - PI).abs() < 1e-12);
    }

    #[test]
    fn test_width_is_least_dimension() {
        let shape = FoundationShape::Isolated { width: 4.0, length: 2.5 };
        assert_eq!(shape.width(), 2.5);
        assert_eq!(shape.length(), 4.0);
        assert!((shape.width_ratio() - 0.625).abs() < 1e-12);
    }

    #[test]
    fn test_elongation() {
        assert!(FoundationShape::Strip { width: 1.0 }.is_elongated());
        assert!(FoundationShape::Isolated { width: 1.0, length: 12.0 }.is_elongated());
        assert!(!FoundationShape::Raft { width: 10.0, length: 10.0 }.is_elongated());
        assert!(!FoundationShape::Circular { diameter: 3.0 }.is_elongated());
    }

    #[test]
    fn test_spread_area_grows_with_depth() {
        let shape = FoundationShape::Raft { width: 10.0, length: 10.0 };
        assert_eq!(shape.spread_area(0.0), 100.0);
        assert_eq!(shape.spread_area(5.0), 225.0);
        assert_eq!(FoundationShape::Strip { width: 2.0 }.spread_area(2.0), 4.0);
    }

    #[test]
    fn test_strip_shape_factors_are_unity() {
        let (sc, sq, sg) = FoundationShape::Strip { width: 1.0 }.shape_factors(18.4, 30.1, 0.5);
        assert_eq!((sc, sq, sg), (1.0, 1.0, 1.0));
    }

    #[test]
    fn test_square_shape_factors() {
        let phi = 30f64.to_radians();
        let (sc, sq, sg) = FoundationShape::Isolated { width: 2.0, length: 2.0 }.shape_factors(18.4, 30.14, phi);
        assert!((sc - (1.0 + 18.4 / 30.14)).abs() < 1e-9);
        assert!((sq - (1.0 + phi.tan())).abs() < 1e-9);
        assert!((sg - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_bad_geometry() {
        let spec = FoundationSpec::new(FoundationShape::Isolated { width: 0.0, length: 2.0 }, 1.0, 500.0);
        assert!(spec.validate(10.0).is_err());

        let spec = FoundationSpec::new(FoundationShape::Circular { diameter: 2.0 }, 12.0, 500.0);
        let err = spec.validate(10.0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_GEOMETRY");

        let mut spec = FoundationSpec::new(FoundationShape::Strip { width: 1.2 }, 1.0, 200.0);
        assert!(spec.validate(10.0).is_ok());
        spec.slope_angle = Some(95.0);
        assert!(spec.validate(10.0).is_err());
    }

    #[test]
    fn test_active_slope_angle() {
        let mut spec = FoundationSpec::new(FoundationShape::Strip { width: 1.2 }, 1.0, 200.0);
        assert!(spec.active_slope_angle().is_none());
        spec.slope_angle = Some(0.0);
        assert!(spec.active_slope_angle().is_none());
        spec.slope_angle = Some(20.0);
        assert_eq!(spec.active_slope_angle(), Some(20.0));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "shape": { "type": "Raft", "width": 10.0, "length": 10.0 },
            "depth": 2.0,
            "load": 16000.0,
            "groundwater_depth": 2.0
        }"#;
        let spec: FoundationSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.target_fos, 3.0);
        assert_eq!(spec.concrete_grade, ConcreteGrade::C25);
        assert_eq!(spec.steel_grade.fy_mpa(), 420.0);
        assert_eq!(spec.column_size, DEFAULT_COLUMN_SIZE);
    }
}
