//! # Bearing Capacity
//!
//! General shear failure capacity with Vesic bearing factors, shape and
//! depth corrections, and a groundwater correction on the unit weight below
//! the base.
//!
//! ## Formula
//!
//! ```text
//! q_ult = c·Nc·sc·dc + q·Nq·sq·dq + 0.5·γ'·B·Nγ·sγ·dγ
//!
//! Nq = e^(π·tanφ)·tan²(45° + φ/2)
//! Nc = (Nq − 1)/tanφ          (5.14 when φ = 0)
//! Nγ = 2(Nq + 1)·tanφ         (0 when φ = 0)
//! ```
//!
//! Allowable pressure is `q_ult / target FOS`; the actual FOS compares
//! `q_ult` to the applied contact pressure.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::foundation::FoundationSpec;
use crate::soil::SoilProfile;
use crate::units::{round_to, GAMMA_WATER};

/// Friction angles below this are treated as φ = 0 (degrees)
const PHI_ZERO_TOLERANCE: f64 = 1e-6;

/// Dimensionless bearing capacity factors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BearingFactors {
    pub nc: f64,
    pub nq: f64,
    pub ngamma: f64,
}

/// Vesic bearing capacity factors for a friction angle in degrees.
///
/// ```rust
/// use geo_core::calculations::bearing::bearing_factors;
///
/// let f = bearing_factors(0.0);
/// assert_eq!((f.nc, f.nq, f.ngamma), (5.14, 1.0, 0.0));
///
/// let f = bearing_factors(30.0);
/// assert!((f.nq - 18.40).abs() < 0.01);
/// assert!((f.nc - 30.14).abs() < 0.01);
/// assert!((f.ngamma - 22.40).abs() < 0.01);
/// ```
pub fn bearing_factors(phi_deg: f64) -> BearingFactors {
    if phi_deg.abs() < PHI_ZERO_TOLERANCE {
        return BearingFactors {
            nc: 5.14,
            nq: 1.0,
            ngamma: 0.0,
        };
    }
    let phi = phi_deg.to_radians();
    let tan_phi = phi.tan();
    let nq = (PI * tan_phi).exp() * (PI / 4.0 + phi / 2.0).tan().powi(2);
    let nc = (nq - 1.0) / tan_phi;
    let ngamma = 2.0 * (nq + 1.0) * tan_phi;
    BearingFactors { nc, nq, ngamma }
}

/// Depth factors (dc, dq, dγ) from the embedment ratio D/B.
///
/// Two regimes split at D/B = 1; beyond it the ratio is replaced by
/// `atan(D/B)` in radians.
pub fn depth_factors(depth: f64, width: f64, phi_deg: f64) -> (f64, f64, f64) {
    let ratio = depth / width;
    let k = if ratio <= 1.0 { ratio } else { ratio.atan() };
    let phi = phi_deg.to_radians();
    let dc = 1.0 + 0.4 * k;
    let dq = 1.0 + 2.0 * phi.tan() * (1.0 - phi.sin()).powi(2) * k;
    (dc, dq, 1.0)
}

/// Unit weight below the base after the groundwater correction (kN/m³).
///
/// Full weight when the water table is deeper than one width below the base,
/// submerged weight when it is at or above the base, and a linear blend in
/// between.
pub fn effective_unit_weight_below(gamma: f64, depth: f64, width: f64, groundwater_depth: Option<f64>) -> f64 {
    let submerged = (gamma - GAMMA_WATER).max(0.0);
    match groundwater_depth {
        None => gamma,
        Some(dw) if dw <= depth => submerged,
        Some(dw) if dw < depth + width => submerged + (dw - depth) / width * (gamma - submerged),
        Some(_) => gamma,
    }
}

/// Bearing capacity results. All values rounded to two decimals.
///
/// ## JSON Example
///
/// ```json
/// {
///   "factors": { "nc": 75.31, "nq": 64.2, "ngamma": 109.41 },
///   "ultimate_capacity_kpa": 5234.1,
///   "allowable_capacity_kpa": 1744.7,
///   "applied_pressure_kpa": 160.0,
///   "factor_of_safety": 32.71
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BearingCapacityResult {
    /// Index of the layer at the base level
    pub bearing_layer_index: usize,
    /// Friction angle used (degrees)
    pub friction_angle: f64,
    /// Cohesion used (kPa)
    pub cohesion: f64,
    /// Bulk unit weight of the bearing layer (kN/m³)
    pub unit_weight: f64,
    /// Unit weight below the base after groundwater correction (kN/m³)
    pub effective_unit_weight: f64,
    /// Overburden pressure at base level (kPa)
    pub overburden_kpa: f64,
    /// Bearing capacity factors
    pub factors: BearingFactors,
    /// Shape factors (sc, sq, sγ)
    pub shape_factors: [f64; 3],
    /// Depth factors (dc, dq, dγ)
    pub depth_factors: [f64; 3],
    /// Ultimate bearing capacity q_ult (kPa)
    pub ultimate_capacity_kpa: f64,
    /// Allowable bearing capacity q_ult / target FOS (kPa)
    pub allowable_capacity_kpa: f64,
    /// Applied contact pressure P/A (kPa)
    pub applied_pressure_kpa: f64,
    /// Actual factor of safety q_ult / applied pressure
    pub factor_of_safety: f64,
    /// Target factor of safety used for the allowable capacity
    pub target_fos: f64,
    /// Load eccentricity M/P (m)
    pub eccentricity_m: f64,
    /// Maximum edge pressure under eccentric load (kPa)
    pub max_edge_pressure_kpa: f64,
    /// Minimum edge pressure under eccentric load, clamped at zero (kPa)
    pub min_edge_pressure_kpa: f64,
}

impl BearingCapacityResult {
    /// Actual FOS meets the target
    pub fn passes(&self) -> bool {
        self.factor_of_safety >= self.target_fos
    }

    /// Eccentricity outside the middle third (kern) lifts part of the base
    pub fn has_uplift(&self) -> bool {
        self.min_edge_pressure_kpa <= 0.0 && self.eccentricity_m > 0.0
    }
}

/// Calculate ultimate and allowable bearing capacity.
///
/// # Arguments
///
/// * `profile` - Validated soil profile
/// * `foundation` - Validated foundation definition
/// * `decimals` - Reporting precision
#[instrument(skip_all, fields(shape = foundation.shape.name(), depth = foundation.depth))]
pub fn calculate(profile: &SoilProfile, foundation: &FoundationSpec, decimals: u32) -> BearingCapacityResult {
    let shape = &foundation.shape;
    let d = foundation.depth;
    let b = shape.width();
    let layer = profile.layer_at(d);

    let phi_deg = layer.friction_angle;
    let phi = phi_deg.to_radians();
    let c = layer.cohesion;
    let gamma = layer.unit_weight;

    let factors = bearing_factors(phi_deg);
    let (sc, sq, sg) = shape.shape_factors(factors.nq, factors.nc, phi);
    let (dc, dq, dg) = depth_factors(d, b, phi_deg);

    let gamma_below = effective_unit_weight_below(gamma, d, b, foundation.groundwater_depth);
    let q = profile.average_unit_weight_above(d) * d;

    let q_ult = c * factors.nc * sc * dc + q * factors.nq * sq * dq + 0.5 * gamma_below * b * factors.ngamma * sg * dg;
    let allowable = q_ult / foundation.target_fos;
    let pressure = foundation.applied_pressure();
    let fos = q_ult / pressure;

    let eccentricity = foundation.moment.map(|m| m.abs() / foundation.load).unwrap_or(0.0);
    let spread = shape.eccentricity_coefficient() * eccentricity / b;
    let max_edge = pressure * (1.0 + spread);
    let min_edge = (pressure * (1.0 - spread)).max(0.0);

    debug!(
        phi = phi_deg,
        cohesion = c,
        nq = factors.nq,
        nc = factors.nc,
        ngamma = factors.ngamma,
        q_ult,
        fos,
        "bearing capacity computed"
    );

    let r = |v: f64| round_to(v, decimals);
    BearingCapacityResult {
        bearing_layer_index: layer.index,
        friction_angle: r(phi_deg),
        cohesion: r(c),
        unit_weight: r(gamma),
        effective_unit_weight: r(gamma_below),
        overburden_kpa: r(q),
        factors: BearingFactors {
            nc: r(factors.nc),
            nq: r(factors.nq),
            ngamma: r(factors.ngamma),
        },
        shape_factors: [r(sc), r(sq), r(sg)],
        depth_factors: [r(dc), r(dq), r(dg)],
        ultimate_capacity_kpa: r(q_ult),
        allowable_capacity_kpa: r(allowable),
        applied_pressure_kpa: r(pressure),
        factor_of_safety: r(fos),
        target_fos: foundation.target_fos,
        eccentricity_m: r(eccentricity),
        max_edge_pressure_kpa: r(max_edge),
        min_edge_pressure_kpa: r(min_edge),
    }
}
