//! # Slope Stability
//!
//! Infinite-slope check on the surface layer, evaluated only when the ground
//! is inclined. The failure plane sits at the embedment depth (with a small
//! minimum for surface footings).
//!
//! ```text
//! FOS = (c + γ·z·cos²β·tanφ) / (γ·z·sinβ·cosβ)
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::foundation::FoundationSpec;
use crate::settings::SlopeSettings;
use crate::soil::SoilProfile;
use crate::units::{round_to, Degrees};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlopeStatus {
    Stable,
    Unstable,
}

/// Infinite-slope result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlopeStabilityResult {
    /// Ground slope angle β (degrees)
    pub slope_angle: f64,
    /// Depth of the assumed failure plane (m)
    pub failure_depth_m: f64,
    pub factor_of_safety: f64,
    pub status: SlopeStatus,
    /// Explanation for the report
    pub note: String,
}

/// Infinite-slope factor of safety.
pub fn infinite_slope_fos(cohesion: f64, unit_weight: f64, phi_deg: f64, depth: f64, beta_deg: f64) -> f64 {
    let beta = Degrees(beta_deg).to_radians();
    let phi = Degrees(phi_deg).to_radians();
    let normal = unit_weight * depth * beta.cos().powi(2);
    let driving = unit_weight * depth * beta.sin() * beta.cos();
    if driving <= 0.0 {
        return f64::INFINITY;
    }
    (cohesion + normal * phi.tan()) / driving
}

/// Check slope stability; `None` when the ground is level or the angle is unset.
#[instrument(skip_all)]
pub fn calculate(
    profile: &SoilProfile,
    foundation: &FoundationSpec,
    settings: &SlopeSettings,
    decimals: u32,
) -> Option<SlopeStabilityResult> {
    let beta = foundation.active_slope_angle()?;
    let layer = profile.surface_layer();
    let z = foundation.depth.max(settings.min_failure_depth_m);

    let fos = infinite_slope_fos(layer.cohesion, layer.unit_weight, layer.friction_angle, z, beta);
    let (status, note) = if fos >= settings.stable_fos {
        (
            SlopeStatus::Stable,
            format!(
                "Slope of {:.1}° is stable with FOS {:.2} on a failure plane at {:.2} m",
                beta, fos, z
            ),
        )
    } else {
        (
            SlopeStatus::Unstable,
            format!(
                "FOS {:.2} is below {:.1} for a {:.1}° slope; flatten the slope or add retaining support",
                fos, settings.stable_fos, beta
            ),
        )
    };
    debug!(beta, z, fos, ?status, "slope stability computed");

    Some(SlopeStabilityResult {
        slope_angle: round_to(beta, decimals),
        failure_depth_m: round_to(z, decimals),
        factor_of_safety: round_to(fos, decimals),
        status,
        note,
    })
}
