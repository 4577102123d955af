//! Soil Parameter Estimation from SPT Blow Count
//!
//! Empirical correlations used whenever a layer has no measured value for a
//! field. Step-wise correlations are ordered threshold tables; smooth ones
//! are explicit per-class functions. All functions are pure and can be
//! tested in isolation.
//!
//! ## Correlations
//!
//! | Parameter          | Sand / Gravel            | Silt               | Clay           |
//! |--------------------|--------------------------|--------------------|----------------|
//! | φ (°)              | 20(22) + √(20N) ≤ 45     | 26 + 0.15N ≤ 34    | 0 (undrained)  |
//! | c (kPa)            | 0                        | 1.5N ≤ 25          | 6.25N          |
//! | E (MPa)            | 0.5N + 7.5 / 1.2N + 7.2  | 0.4N + 2.0         | 0.3N + 1.5     |
//! | Cc                 | -                        | 0.25 − 0.008N      | 0.45 − 0.012N  |
//!
//! Blow counts are clamped at zero before use.

use super::SoilClass;

/// Upper bound on the friction angle of granular soils (degrees)
pub const MAX_FRICTION_ANGLE: f64 = 45.0;

/// Floor on estimated elastic modulus (MPa) so stiffness never reaches zero
pub const MIN_ELASTIC_MODULUS: f64 = 1.0;

/// One row of a threshold table: applies while `N < below`.
#[derive(Debug, Clone, Copy)]
pub struct Threshold {
    pub below: f64,
    pub value: f64,
}

const fn row(below: f64, value: f64) -> Threshold {
    Threshold { below, value }
}

/// Unit weight tables (kN/m³)
const SAND_UNIT_WEIGHT: [Threshold; 4] = [
    row(10.0, 17.0),
    row(30.0, 18.5),
    row(50.0, 19.5),
    row(f64::INFINITY, 20.5),
];
const GRAVEL_UNIT_WEIGHT: [Threshold; 4] = [
    row(10.0, 18.5),
    row(30.0, 19.5),
    row(50.0, 20.5),
    row(f64::INFINITY, 21.5),
];
const SILT_UNIT_WEIGHT: [Threshold; 4] = [
    row(5.0, 16.5),
    row(15.0, 17.5),
    row(30.0, 18.5),
    row(f64::INFINITY, 19.5),
];
const CLAY_UNIT_WEIGHT: [Threshold; 5] = [
    row(4.0, 16.0),
    row(8.0, 17.0),
    row(15.0, 18.0),
    row(30.0, 19.0),
    row(f64::INFINITY, 20.0),
];
const ROCK_UNIT_WEIGHT: [Threshold; 2] = [row(50.0, 22.0), row(f64::INFINITY, 24.0)];

/// Clay consolidation coefficient (m²/year)
const CLAY_CONSOLIDATION: [Threshold; 3] = [row(4.0, 0.5), row(15.0, 1.0), row(f64::INFINITY, 2.0)];

/// Silt consolidation coefficient (m²/year)
const SILT_CONSOLIDATION: f64 = 5.0;

/// Find the first row whose bound exceeds `n`.
pub fn lookup(table: &[Threshold], n: f64) -> f64 {
    table
        .iter()
        .find(|t| n < t.below)
        .or_else(|| table.last())
        .map(|t| t.value)
        .unwrap_or(0.0)
}

fn blows(n: f64) -> f64 {
    n.max(0.0)
}

/// Bulk unit weight γ (kN/m³)
pub fn unit_weight(class: SoilClass, n: f64) -> f64 {
    let n = blows(n);
    match class {
        SoilClass::Sand => lookup(&SAND_UNIT_WEIGHT, n),
        SoilClass::Gravel => lookup(&GRAVEL_UNIT_WEIGHT, n),
        SoilClass::Silt => lookup(&SILT_UNIT_WEIGHT, n),
        SoilClass::Clay => lookup(&CLAY_UNIT_WEIGHT, n),
        SoilClass::Rock => lookup(&ROCK_UNIT_WEIGHT, n),
    }
}

/// Friction angle φ (degrees)
pub fn friction_angle(class: SoilClass, n: f64) -> f64 {
    let n = blows(n);
    match class {
        SoilClass::Sand => (20.0 + (20.0 * n).sqrt()).min(MAX_FRICTION_ANGLE),
        SoilClass::Gravel => (22.0 + (20.0 * n).sqrt()).min(MAX_FRICTION_ANGLE),
        SoilClass::Silt => (26.0 + 0.15 * n).min(34.0),
        SoilClass::Clay => 0.0,
        SoilClass::Rock => 40.0,
    }
}

/// Cohesion c (kPa); undrained shear strength for clay
pub fn cohesion(class: SoilClass, n: f64) -> f64 {
    let n = blows(n);
    match class {
        SoilClass::Clay => 6.25 * n,
        SoilClass::Silt => (1.5 * n).min(25.0),
        SoilClass::Sand | SoilClass::Gravel => 0.0,
        SoilClass::Rock => 100.0,
    }
}

/// Elastic modulus E (MPa)
pub fn elastic_modulus(class: SoilClass, n: f64) -> f64 {
    let n = blows(n);
    let (slope, intercept) = match class {
        SoilClass::Sand => (0.5, 7.5),
        SoilClass::Gravel => (1.2, 7.2),
        SoilClass::Silt => (0.4, 2.0),
        SoilClass::Clay => (0.3, 1.5),
        SoilClass::Rock => (50.0, 2000.0),
    };
    (slope * n + intercept).max(MIN_ELASTIC_MODULUS)
}

/// Poisson ratio ν
pub fn poisson_ratio(class: SoilClass) -> f64 {
    match class {
        SoilClass::Sand | SoilClass::Gravel => 0.30,
        SoilClass::Silt => 0.35,
        SoilClass::Clay => 0.40,
        SoilClass::Rock => 0.20,
    }
}

/// Compression index Cc. Zero for classes that do not consolidate.
pub fn compression_index(class: SoilClass, n: f64) -> f64 {
    let n = blows(n);
    match class {
        SoilClass::Clay => (0.45 - 0.012 * n).clamp(0.10, 0.45),
        SoilClass::Silt => (0.25 - 0.008 * n).clamp(0.05, 0.25),
        _ => 0.0,
    }
}

/// Recompression index Cr ≈ Cc/6
pub fn recompression_index(compression_index: f64) -> f64 {
    compression_index / 6.0
}

/// Coefficient of consolidation Cv (m²/year). Zero for classes that do not consolidate.
pub fn consolidation_coefficient(class: SoilClass, n: f64) -> f64 {
    match class {
        SoilClass::Clay => lookup(&CLAY_CONSOLIDATION, blows(n)),
        SoilClass::Silt => SILT_CONSOLIDATION,
        _ => 0.0,
    }
}

/// Secondary compression index Cα from the Cα/Cc ratio
pub fn secondary_compression_index(class: SoilClass, compression_index: f64) -> f64 {
    match class {
        SoilClass::Clay => 0.04 * compression_index,
        SoilClass::Silt => 0.03 * compression_index,
        _ => 0.0,
    }
}

/// Initial void ratio e0 from Cc = 1.15(e0 − 0.27)
pub fn initial_void_ratio(compression_index: f64) -> f64 {
    compression_index / 1.15 + 0.27
}
