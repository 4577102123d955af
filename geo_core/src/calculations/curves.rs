//! # Derived Curves
//!
//! Chart series built from the finished bearing and settlement results:
//!
//! - **Load–settlement**: loads from zero to a multiple of q_ult, settlement
//!   scaled linearly with a `1 + (p/q_ult)²` nonlinearity.
//! - **Shear strength vs depth**: Mohr–Coulomb `τ = c + σ'v·tanφ` at every
//!   whole metre of the profile.
//! - **Time–settlement**: average degree of consolidation across the
//!   compressible layers, applied to the total settlement.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::bearing::BearingCapacityResult;
use super::settlement::SettlementResult;
use crate::foundation::FoundationSpec;
use crate::settings::CurveSettings;
use crate::soil::SoilProfile;
use crate::units::round_to;

/// Time factor separating the small- and large-Tv approximations
const TV_SPLIT: f64 = 0.2827;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadSettlementPoint {
    pub pressure_kpa: f64,
    pub settlement_mm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShearStrengthPoint {
    pub depth_m: f64,
    pub shear_strength_kpa: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSettlementPoint {
    pub time_years: f64,
    /// Average degree of consolidation (0..1)
    pub consolidation_degree: f64,
    pub settlement_mm: f64,
}

/// Terzaghi average degree of consolidation for time factor `tv`.
pub fn degree_of_consolidation(tv: f64) -> f64 {
    if tv <= 0.0 {
        0.0
    } else if tv < TV_SPLIT {
        (4.0 * tv / PI).sqrt()
    } else {
        (1.0 - 8.0 / (PI * PI) * (-PI * PI * tv / 4.0).exp()).min(1.0)
    }
}

/// Load–settlement series over `load_steps + 1` points, from zero to `load_range × q_ult`.
#[instrument(skip_all)]
pub fn load_settlement(
    bearing: &BearingCapacityResult,
    settlement: &SettlementResult,
    settings: &CurveSettings,
    decimals: u32,
) -> Vec<LoadSettlementPoint> {
    let q = bearing.applied_pressure_kpa;
    let q_ult = bearing.ultimate_capacity_kpa;
    let max_pressure = settings.load_range * q_ult;
    let n = settings.load_steps;

    (0..=n)
        .map(|i| {
            let p = max_pressure * i as f64 / n as f64;
            let linear = if q > 0.0 { settlement.total_mm * p / q } else { 0.0 };
            let nonlinear = if q_ult > 0.0 { 1.0 + (p / q_ult).powi(2) } else { 1.0 };
            LoadSettlementPoint {
                pressure_kpa: round_to(p, decimals),
                settlement_mm: round_to(linear * nonlinear, decimals),
            }
        })
        .collect()
}

/// Shear strength at every whole metre from the surface to the profile bottom.
#[instrument(skip_all)]
pub fn shear_strength_profile(
    profile: &SoilProfile,
    foundation: &FoundationSpec,
    decimals: u32,
) -> Vec<ShearStrengthPoint> {
    let bottom = profile.total_depth();
    (0..)
        .map(|i| i as f64)
        .take_while(|z| *z <= bottom + 1e-9)
        .map(|z| {
            let sigma = profile.effective_vertical_stress(z, foundation.groundwater_depth);
            ShearStrengthPoint {
                depth_m: round_to(z, decimals),
                shear_strength_kpa: round_to(profile.layer_at(z).shear_strength(sigma), decimals),
            }
        })
        .collect()
}

/// Time–settlement series over `time_steps + 1` points.
///
/// With no compressible layer the settlement is immediate, so the series is
/// flat at the total over one year.
#[instrument(skip_all)]
pub fn time_settlement(settlement: &SettlementResult, settings: &CurveSettings, decimals: u32) -> Vec<TimeSettlementPoint> {
    let n = settings.time_steps;
    let layers = &settlement.consolidation_layers;
    let t90_max = layers.iter().map(|l| l.t90_years).fold(0.0, f64::max);

    if layers.is_empty() || t90_max <= 0.0 {
        return (0..=n)
            .map(|i| TimeSettlementPoint {
                time_years: round_to(i as f64 / n as f64, decimals),
                consolidation_degree: 1.0,
                settlement_mm: settlement.total_mm,
            })
            .collect();
    }

    let t_max = settings.time_range * t90_max;
    (0..=n)
        .map(|i| {
            let t = t_max * i as f64 / n as f64;
            let average = layers
                .iter()
                .map(|l| {
                    if l.drainage_path_m <= 0.0 {
                        return 1.0;
                    }
                    let tv = l.consolidation_coefficient * t / l.drainage_path_m.powi(2);
                    degree_of_consolidation(tv)
                })
                .sum::<f64>()
                / layers.len() as f64;
            TimeSettlementPoint {
                time_years: round_to(t, decimals),
                consolidation_degree: round_to(average, decimals + 2),
                settlement_mm: round_to(settlement.total_mm * average, decimals),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{bearing, settlement};
    use crate::foundation::FoundationShape;
    use crate::settings::SettlementSettings;
    use crate::soil::{SoilClass, SoilLayer};

    fn setup() -> (SoilProfile, FoundationSpec) {
        let profile = SoilProfile::new(&[
            SoilLayer::new(0.0, 4.0, SoilClass::Sand, 15.0),
            SoilLayer::new(4.0, 10.0, SoilClass::Clay, 10.0),
        ])
        .unwrap();
        let mut spec = FoundationSpec::new(FoundationShape::Isolated { width: 2.0, length: 2.0 }, 1.0, 600.0);
        spec.groundwater_depth = Some(3.0);
        (profile, spec)
    }

    #[test]
    fn test_degree_of_consolidation() {
        assert_eq!(degree_of_consolidation(0.0), 0.0);
        // Both branches agree near the split
        let below = degree_of_consolidation(TV_SPLIT - 1e-9);
        let above = degree_of_consolidation(TV_SPLIT);
        assert!((below - above).abs() < 0.01);
        // T90 = 0.848 gives U ≈ 0.9
        assert!((degree_of_consolidation(0.848) - 0.9).abs() < 0.005);
        assert!(degree_of_consolidation(10.0) <= 1.0);
    }

    #[test]
    fn test_load_settlement_curve() {
        let (profile, spec) = setup();
        let b = bearing::calculate(&profile, &spec, 2);
        let s = settlement::calculate(&profile, &spec, &SettlementSettings::default(), 2);
        let curve = load_settlement(&b, &s, &CurveSettings::default(), 2);
        assert_eq!(curve.len(), 11);
        assert_eq!(curve[0].settlement_mm, 0.0);
        assert!((curve[10].pressure_kpa - 1.5 * b.ultimate_capacity_kpa).abs() < 0.01);
        for pair in curve.windows(2) {
            assert!(pair[1].settlement_mm >= pair[0].settlement_mm);
        }
    }

    #[test]
    fn test_load_range_capped_at_ultimate_when_overloaded() {
        let profile = SoilProfile::new(&[SoilLayer::new(0.0, 10.0, SoilClass::Clay, 2.0)]).unwrap();
        let spec = FoundationSpec::new(FoundationShape::Isolated { width: 1.0, length: 1.0 }, 0.5, 500.0);
        let b = bearing::calculate(&profile, &spec, 2);
        assert!(b.applied_pressure_kpa > b.ultimate_capacity_kpa);
        let s = settlement::calculate(&profile, &spec, &SettlementSettings::default(), 2);
        let curve = load_settlement(&b, &s, &CurveSettings::default(), 2);
        assert!((curve[10].pressure_kpa - 1.5 * b.ultimate_capacity_kpa).abs() < 0.01);
        assert!(curve.iter().all(|p| p.pressure_kpa <= 1.5 * b.ultimate_capacity_kpa + 0.01));
    }

    #[test]
    fn test_shear_strength_profile_depths() {
        let (profile, spec) = setup();
        let curve = shear_strength_profile(&profile, &spec, 2);
        assert_eq!(curve.len(), 11);
        assert_eq!(curve[0].depth_m, 0.0);
        assert_eq!(curve[10].depth_m, 10.0);
        // Sand at the surface has no strength; clay carries its cohesion
        assert_eq!(curve[0].shear_strength_kpa, 0.0);
        assert_eq!(curve[5].shear_strength_kpa, 62.5);
    }

    #[test]
    fn test_time_settlement_approaches_total() {
        let (profile, spec) = setup();
        let s = settlement::calculate(&profile, &spec, &SettlementSettings::default(), 2);
        let curve = time_settlement(&s, &CurveSettings::default(), 2);
        assert_eq!(curve.len(), 21);
        assert_eq!(curve[0].settlement_mm, 0.0);
        let last = curve[20];
        assert!(last.consolidation_degree > 0.9);
        assert!(last.settlement_mm <= s.total_mm + 1e-9);
    }

    #[test]
    fn test_time_settlement_flat_without_clay() {
        let profile = SoilProfile::new(&[SoilLayer::new(0.0, 10.0, SoilClass::Sand, 25.0)]).unwrap();
        let spec = FoundationSpec::new(FoundationShape::Strip { width: 1.5 }, 1.0, 250.0);
        let s = settlement::calculate(&profile, &spec, &SettlementSettings::default(), 2);
        let curve = time_settlement(&s, &CurveSettings::default(), 2);
        assert_eq!(curve.len(), 21);
        assert_eq!(curve[20].time_years, 1.0);
        assert!(curve.iter().all(|p| p.settlement_mm == s.total_mm));
    }
}
