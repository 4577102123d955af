//! Layer Profile Accessor
//!
//! Validates the layered profile once and answers depth queries for the
//! calculation modules: which layer contains a depth, the thickness-weighted
//! unit weight above it, and the effective vertical stress at it.

use tracing::debug;

use super::{ResolvedLayer, SoilLayer};
use crate::errors::{CalcError, CalcResult};
use crate::units::GAMMA_WATER;

/// Depth tolerance for contiguity checks (m)
const DEPTH_TOLERANCE: f64 = 1e-6;

/// A validated, resolved soil profile.
#[derive(Debug, Clone)]
pub struct SoilProfile {
    layers: Vec<ResolvedLayer>,
}

impl SoilProfile {
    /// Validate the input layers and resolve their parameters.
    ///
    /// The layers must start at the ground surface and tile the profile with
    /// no gaps, overlaps or zero-length layers.
    pub fn new(layers: &[SoilLayer]) -> CalcResult<Self> {
        validate_layers(layers)?;
        let layers: Vec<ResolvedLayer> = layers.iter().enumerate().map(|(i, l)| l.resolve(i)).collect();
        debug!(layer_count = layers.len(), "soil profile resolved");
        Ok(SoilProfile { layers })
    }

    /// All resolved layers, top to bottom
    pub fn layers(&self) -> &[ResolvedLayer] {
        &self.layers
    }

    /// Depth of the bottom of the profile (m)
    pub fn total_depth(&self) -> f64 {
        self.layers.last().map(|l| l.depth_to).unwrap_or(0.0)
    }

    /// The layer containing `depth`.
    ///
    /// Depths above the surface resolve to the first layer and depths at or
    /// below the bottom resolve to the last, so influence zones that extend
    /// past the logged profile use the deepest known stratum.
    pub fn layer_at(&self, depth: f64) -> &ResolvedLayer {
        let last = self.layers.len() - 1;
        self.layers
            .iter()
            .find(|l| l.contains(depth))
            .unwrap_or(if depth < 0.0 { &self.layers[0] } else { &self.layers[last] })
    }

    /// Surface layer
    pub fn surface_layer(&self) -> &ResolvedLayer {
        &self.layers[0]
    }

    /// Total vertical stress from all material above `depth` (kPa)
    pub fn overburden_stress(&self, depth: f64) -> f64 {
        if depth <= 0.0 {
            return 0.0;
        }
        let mut stress = 0.0;
        for layer in &self.layers {
            let top = layer.depth_from;
            if top >= depth {
                break;
            }
            let bottom = layer.depth_to.min(depth);
            stress += layer.unit_weight * (bottom - top);
        }
        // Below the logged profile the deepest layer continues
        let bottom = self.total_depth();
        if depth > bottom {
            stress += self.layers[self.layers.len() - 1].unit_weight * (depth - bottom);
        }
        stress
    }

    /// Thickness-weighted average unit weight of everything above `depth` (kN/m³).
    ///
    /// At the surface this is the first layer's unit weight.
    pub fn average_unit_weight_above(&self, depth: f64) -> f64 {
        if depth <= 0.0 {
            return self.layers[0].unit_weight;
        }
        self.overburden_stress(depth) / depth
    }

    /// Hydrostatic pore pressure at `depth` (kPa)
    pub fn pore_pressure(depth: f64, groundwater_depth: Option<f64>) -> f64 {
        match groundwater_depth {
            Some(dw) if depth > dw => GAMMA_WATER * (depth - dw),
            _ => 0.0,
        }
    }

    /// Effective vertical stress σ'v = σv − u at `depth` (kPa)
    pub fn effective_vertical_stress(&self, depth: f64, groundwater_depth: Option<f64>) -> f64 {
        self.overburden_stress(depth) - Self::pore_pressure(depth, groundwater_depth)
    }
}

fn validate_layers(layers: &[SoilLayer]) -> CalcResult<()> {
    if layers.is_empty() {
        return Err(CalcError::invalid_profile(0, "Profile has no layers"));
    }

    for (i, layer) in layers.iter().enumerate() {
        if !layer.depth_from.is_finite() || !layer.depth_to.is_finite() {
            return Err(CalcError::invalid_profile(i, "Layer depths must be finite"));
        }
        if layer.depth_to - layer.depth_from <= DEPTH_TOLERANCE {
            return Err(CalcError::invalid_profile(
                i,
                format!(
                    "Layer from {:.2} m to {:.2} m has no thickness",
                    layer.depth_from, layer.depth_to
                ),
            ));
        }
        if !layer.spt_n.is_finite() || layer.spt_n < 0.0 {
            return Err(CalcError::invalid_profile(
                i,
                format!("Blow count must be non-negative, got {}", layer.spt_n),
            ));
        }
        if i == 0 {
            if layer.depth_from.abs() > DEPTH_TOLERANCE {
                return Err(CalcError::invalid_profile(
                    0,
                    format!("First layer must start at the surface, starts at {:.2} m", layer.depth_from),
                ));
            }
        } else {
            let previous = &layers[i - 1];
            let gap = layer.depth_from - previous.depth_to;
            if gap > DEPTH_TOLERANCE {
                return Err(CalcError::invalid_profile(
                    i,
                    format!("Gap between {:.2} m and {:.2} m", previous.depth_to, layer.depth_from),
                ));
            }
            if gap < -DEPTH_TOLERANCE {
                return Err(CalcError::invalid_profile(
                    i,
                    format!(
                        "Layer starting at {:.2} m overlaps the layer above ending at {:.2} m",
                        layer.depth_from, previous.depth_to
                    ),
                ));
            }
        }
        if layer.use_measured_data {
            validate_measured(i, layer)?;
        }
    }
    Ok(())
}

fn validate_measured(index: usize, layer: &SoilLayer) -> CalcResult<()> {
    let m = &layer.measured;
    let checks: [(&str, Option<f64>, fn(f64) -> bool, &str); 9] = [
        ("unit_weight", m.unit_weight, |v| v > 0.0, "must be positive"),
        ("cohesion", m.cohesion, |v| v >= 0.0, "must be non-negative"),
        ("friction_angle", m.friction_angle, |v| (0.0..60.0).contains(&v), "must lie in [0, 60) degrees"),
        ("elastic_modulus", m.elastic_modulus, |v| v > 0.0, "must be positive"),
        ("poisson_ratio", m.poisson_ratio, |v| (0.0..0.5).contains(&v), "must lie in [0, 0.5)"),
        ("compression_index", m.compression_index, |v| v > 0.0, "must be positive"),
        ("recompression_index", m.recompression_index, |v| v > 0.0, "must be positive"),
        ("consolidation_coefficient", m.consolidation_coefficient, |v| v > 0.0, "must be positive"),
        ("secondary_compression_index", m.secondary_compression_index, |v| v >= 0.0, "must be non-negative"),
    ];
    for (name, value, valid, reason) in checks {
        if let Some(v) = value {
            if !v.is_finite() || !valid(v) {
                return Err(CalcError::invalid_profile(index, format!("Measured {} = {} {}", name, v, reason)));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soil::SoilClass;

    fn two_layer_profile() -> Vec<SoilLayer> {
        vec![
            SoilLayer::new(0.0, 15.0, SoilClass::Sand, 20.0),
            SoilLayer::new(15.0, 22.0, SoilClass::Clay, 8.0),
        ]
    }

    #[test]
    fn test_layer_at() {
        let profile = SoilProfile::new(&two_layer_profile()).unwrap();
        assert_eq!(profile.layer_at(0.0).soil_class, SoilClass::Sand);
        assert_eq!(profile.layer_at(14.99).soil_class, SoilClass::Sand);
        assert_eq!(profile.layer_at(15.0).soil_class, SoilClass::Clay);
        // Past the bottom: deepest layer continues
        assert_eq!(profile.layer_at(40.0).soil_class, SoilClass::Clay);
        assert_eq!(profile.layer_at(-1.0).soil_class, SoilClass::Sand);
        assert_eq!(profile.total_depth(), 22.0);
    }

    #[test]
    fn test_average_unit_weight() {
        let profile = SoilProfile::new(&two_layer_profile()).unwrap();
        // Sand N=20 → 18.5, clay N=8 → 18.0
        assert_eq!(profile.average_unit_weight_above(0.0), 18.5);
        assert!((profile.average_unit_weight_above(10.0) - 18.5).abs() < 1e-9);
        let expected = (18.5 * 15.0 + 18.0 * 5.0) / 20.0;
        assert!((profile.average_unit_weight_above(20.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_effective_stress_below_water() {
        let profile = SoilProfile::new(&two_layer_profile()).unwrap();
        let sigma = profile.effective_vertical_stress(5.0, Some(2.0));
        assert!((sigma - (18.5 * 5.0 - 9.81 * 3.0)).abs() < 1e-9);
        assert_eq!(profile.effective_vertical_stress(5.0, None), 18.5 * 5.0);
    }

    #[test]
    fn test_empty_profile_rejected() {
        let err = SoilProfile::new(&[]).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PROFILE");
    }

    #[test]
    fn test_gap_rejected() {
        let layers = vec![
            SoilLayer::new(0.0, 4.0, SoilClass::Sand, 10.0),
            SoilLayer::new(5.0, 9.0, SoilClass::Clay, 6.0),
        ];
        match SoilProfile::new(&layers) {
            Err(CalcError::InvalidProfile { layer_index, reason }) => {
                assert_eq!(layer_index, 1);
                assert!(reason.contains("Gap"));
            }
            other => panic!("expected profile error, got {:?}", other),
        }
    }

    #[test]
    fn test_overlap_rejected() {
        let layers = vec![
            SoilLayer::new(0.0, 5.0, SoilClass::Sand, 10.0),
            SoilLayer::new(4.0, 9.0, SoilClass::Clay, 6.0),
        ];
        assert!(SoilProfile::new(&layers).is_err());
    }

    #[test]
    fn test_zero_length_rejected() {
        let layers = vec![SoilLayer::new(0.0, 0.0, SoilClass::Sand, 10.0)];
        assert!(SoilProfile::new(&layers).is_err());
    }

    #[test]
    fn test_profile_must_start_at_surface() {
        let layers = vec![SoilLayer::new(1.0, 5.0, SoilClass::Sand, 10.0)];
        assert!(SoilProfile::new(&layers).is_err());
    }

    #[test]
    fn test_bad_measured_value_rejected() {
        let mut layer = SoilLayer::new(0.0, 5.0, SoilClass::Clay, 6.0);
        layer.use_measured_data = true;
        layer.measured.unit_weight = Some(-3.0);
        assert!(SoilProfile::new(&[layer]).is_err());
    }
}
