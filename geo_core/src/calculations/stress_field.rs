//! # Stress Field
//!
//! Vertical stress below the footing on a regular grid, for contour plots.
//!
//! The centre-line value uses the 2:1 spread, `σc(z) = P / A(z)`, and falls
//! off sideways with a Gaussian-like decay that widens with depth:
//!
//! ```text
//! σ(x, z) = σc(z) · exp(−0.5 · (r / s)²)     r = |x| / (B/2),  s = 1 + z/B
//! ```
//!
//! Also reports a rough elastic displacement and a qualitative plasticity
//! tier from the ratio of applied pressure to shear strength at base level.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::foundation::FoundationSpec;
use crate::settings::StressFieldSettings;
use crate::soil::SoilProfile;
use crate::units::{round_to, KiloPascals, MegaPascals, Meters, Millimeters};

/// One grid node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressPoint {
    /// Depth below the base (m)
    pub depth_m: f64,
    /// Horizontal offset from the centre line (m)
    pub offset_m: f64,
    /// Vertical stress increase (kPa)
    pub stress_kpa: f64,
}

/// Extent of yielding under the applied pressure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlasticityState {
    Elastic,
    LocalizedPlastic,
    ExtensivePlastic,
}

impl PlasticityState {
    /// Tier from the ratio q / τ
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < 1.0 {
            PlasticityState::Elastic
        } else if ratio < 3.0 {
            PlasticityState::LocalizedPlastic
        } else {
            PlasticityState::ExtensivePlastic
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PlasticityState::Elastic => "Elastic",
            PlasticityState::LocalizedPlastic => "Localized plastic zones",
            PlasticityState::ExtensivePlastic => "Extensive plastic yielding",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressFieldResult {
    /// Applied contact pressure (kPa)
    pub applied_pressure_kpa: f64,
    pub rows: usize,
    pub columns: usize,
    /// Grid nodes, row-major from the base downwards
    pub points: Vec<StressPoint>,
    /// Simplified elastic displacement q·B·(1 − ν²)/E (mm)
    pub max_displacement_mm: f64,
    /// Shear strength at base level (kPa)
    pub shear_strength_kpa: f64,
    /// Applied pressure over shear strength
    pub plasticity_ratio: f64,
    pub plasticity: PlasticityState,
    pub plasticity_description: String,
}

impl StressFieldResult {
    /// Nodes on the centre line, shallowest first
    pub fn centerline(&self) -> impl Iterator<Item = &StressPoint> {
        self.points.iter().filter(|p| p.offset_m.abs() < 1e-9)
    }
}

/// Vertical stress at offset `x` and depth `z` below the base.
pub fn stress_at(foundation: &FoundationSpec, x: f64, z: f64) -> f64 {
    let b = foundation.shape.width();
    let centre = foundation.load / foundation.shape.spread_area(z);
    let r = x.abs() / (b / 2.0);
    let s = 1.0 + z / b;
    (centre * (-0.5 * (r / s).powi(2)).exp()).max(0.0)
}

/// Build the stress grid and the displacement/plasticity summary.
#[instrument(skip_all, fields(rows = settings.rows, columns = settings.columns))]
pub fn calculate(
    profile: &SoilProfile,
    foundation: &FoundationSpec,
    settings: &StressFieldSettings,
    decimals: u32,
) -> StressFieldResult {
    let b = foundation.shape.width();
    let q = foundation.applied_pressure();
    let half_span = settings.offset_span * b;
    let depth_span = settings.depth_span * b;
    // A single row or column sits at the base or the centre line
    let row_step = depth_span / settings.rows.saturating_sub(1).max(1) as f64;
    let column_step = if settings.columns > 1 {
        2.0 * half_span / (settings.columns - 1) as f64
    } else {
        0.0
    };
    let first_offset = if settings.columns > 1 { -half_span } else { 0.0 };

    let r = |v: f64| round_to(v, decimals);
    let mut points = Vec::with_capacity(settings.rows * settings.columns);
    for i in 0..settings.rows {
        let z = row_step * i as f64;
        for j in 0..settings.columns {
            let x = first_offset + column_step * j as f64;
            points.push(StressPoint {
                depth_m: r(z),
                offset_m: r(x),
                stress_kpa: r(stress_at(foundation, x, z)),
            });
        }
    }

    let layer = profile.layer_at(foundation.depth);
    let e: KiloPascals = MegaPascals(layer.elastic_modulus).into();
    let displacement: Millimeters = Meters(q * b * (1.0 - layer.poisson_ratio.powi(2)) / e.value()).into();

    let sigma = profile.effective_vertical_stress(foundation.depth, foundation.groundwater_depth);
    let tau = layer.shear_strength(sigma);
    let (ratio, plasticity) = if tau > 0.0 {
        let ratio = q / tau;
        (ratio, PlasticityState::from_ratio(ratio))
    } else {
        debug!("zero shear strength at base level");
        (f64::INFINITY, PlasticityState::ExtensivePlastic)
    };

    debug!(
        displacement_mm = displacement.value(),
        tau,
        ratio,
        ?plasticity,
        "stress field computed"
    );

    StressFieldResult {
        applied_pressure_kpa: r(q),
        rows: settings.rows,
        columns: settings.columns,
        points,
        max_displacement_mm: r(displacement.value()),
        shear_strength_kpa: r(tau),
        // serde_json cannot encode infinity, so report the ratio as zero when τ = 0
        plasticity_ratio: if ratio.is_finite() { r(ratio) } else { 0.0 },
        plasticity,
        plasticity_description: plasticity.description().to_string(),
    }
}
