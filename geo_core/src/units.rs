//! # Unit Types
//!
//! Type-safe wrappers for the SI units used in foundation engineering.
//! These provide compile-time safety against unit confusion while remaining
//! lightweight (just f64 wrappers).
//!
//! ## SI Units
//!
//! geo_core works in the units found on geotechnical reports:
//! - Length: metres (m) for geometry, millimetres (mm) for settlement and bars
//! - Stress: kilopascals (kPa), megapascals (MPa) for moduli and concrete
//! - Angles: degrees at the API boundary, radians inside trig functions
//!
//! ## Example
//!
//! ```rust
//! use geo_core::units::{Meters, Millimeters, MegaPascals, KiloPascals};
//!
//! let settlement = Meters(0.0254);
//! let mm: Millimeters = settlement.into();
//! assert!((mm.0 - 25.4).abs() < 1e-9);
//!
//! let modulus: KiloPascals = MegaPascals(20.0).into();
//! assert_eq!(modulus.0, 20_000.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Unit weight of water (kN/m³)
pub const GAMMA_WATER: f64 = 9.81;

// ============================================================================
// Length Units
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

// ============================================================================
// Stress Units
// ============================================================================

/// Stress in kilopascals (kPa = kN/m²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloPascals(pub f64);

/// Stress in megapascals (MPa = N/mm²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MegaPascals(pub f64);

impl From<MegaPascals> for KiloPascals {
    fn from(mpa: MegaPascals) -> Self {
        KiloPascals(mpa.0 * 1000.0)
    }
}

impl From<KiloPascals> for MegaPascals {
    fn from(kpa: KiloPascals) -> Self {
        MegaPascals(kpa.0 / 1000.0)
    }
}

// ============================================================================
// Angles
// ============================================================================

/// Angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f64);

impl Degrees {
    /// Convert to radians for trig functions
    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Millimeters);
impl_arithmetic!(KiloPascals);
impl_arithmetic!(MegaPascals);
impl_arithmetic!(Degrees);

// ============================================================================
// Rounding
// ============================================================================

/// Round a value to a fixed number of decimals.
///
/// Every reported number passes through here so that repeated runs produce
/// byte-identical JSON. Negative zero is normalised to zero.
///
/// ```rust
/// use geo_core::units::round_to;
///
/// assert_eq!(round_to(12.3456, 2), 12.35);
/// assert_eq!(round_to(-0.001, 2), 0.0);
/// ```
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_to_millimeters() {
        let m = Meters(0.125);
        let mm: Millimeters = m.into();
        assert!((mm.0 - 125.0).abs() < 1e-9);
    }

    #[test]
    fn test_mpa_to_kpa() {
        let kpa: KiloPascals = MegaPascals(1.5).into();
        assert_eq!(kpa.0, 1500.0);
        let back: MegaPascals = kpa.into();
        assert_eq!(back.0, 1.5);
    }

    #[test]
    fn test_arithmetic() {
        let a = Meters(10.0);
        let b = Meters(4.0);
        assert_eq!((a + b).0, 14.0);
        assert_eq!((a - b).0, 6.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_degrees_to_radians() {
        assert!((Degrees(180.0).to_radians() - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_to(1.005_1, 2), 1.01);
        assert_eq!(round_to(2.344, 2), 2.34);
        assert_eq!(round_to(3.14159, 3), 3.142);
        assert!(round_to(-0.0001, 2).is_sign_positive());
    }

    #[test]
    fn test_serialization() {
        let kpa = KiloPascals(150.5);
        let json = serde_json::to_string(&kpa).unwrap();
        assert_eq!(json, "150.5");

        let roundtrip: KiloPascals = serde_json::from_str(&json).unwrap();
        assert_eq!(kpa, roundtrip);
    }
}
