//! # Settlement
//!
//! Total settlement as the sum of three parts:
//!
//! - **Elastic** (immediate): strain-influence integration over the zone
//!   below the base, in the manner of Schmertmann.
//! - **Primary consolidation**: logarithmic compression law for every clay
//!   or silt layer at or below the base.
//! - **Secondary compression**: creep over a design life of at least twice
//!   the time to 90% primary consolidation.
//!
//! ## Formulas
//!
//! ```text
//! Se = C1 · Δq · Σ (Iz / E) · Δz          C1 = max(1 − 0.5·σ0/Δq, 0.5)
//! Sc = Cc·H/(1 + e0) · log10((σ0 + Δσ)/σ0)       σ0 = γ · z_mid
//! t90 = T90 · Hdr² / Cv                   T90 = 0.848, Hdr = H/2
//! Ss = Cα · H · log10(t_design / t90)
//! ```
//!
//! Numeric edge cases (non-positive net pressure, zero initial stress at a
//! layer mid-point, zero Cv) contribute zero rather than failing.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::foundation::FoundationSpec;
use crate::settings::SettlementSettings;
use crate::soil::SoilProfile;
use crate::units::{round_to, Meters, MegaPascals, KiloPascals, Millimeters};

const DAYS_PER_YEAR: f64 = 365.0;
const DAYS_PER_MONTH: f64 = 30.0;

/// Settlement acceptance status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementStatus {
    Safe,
    Warning,
    Failure,
}

impl SettlementStatus {
    /// Classify a total settlement (mm) against the configured limits.
    pub fn from_total(total_mm: f64, settings: &SettlementSettings) -> Self {
        if total_mm < settings.safe_limit_mm {
            SettlementStatus::Safe
        } else if total_mm < settings.warning_limit_mm {
            SettlementStatus::Warning
        } else {
            SettlementStatus::Failure
        }
    }
}

impl std::fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SettlementStatus::Safe => "Safe",
            SettlementStatus::Warning => "Warning",
            SettlementStatus::Failure => "Failure",
        };
        write!(f, "{}", s)
    }
}

/// Consolidation contribution of one clay or silt layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidationLayerResult {
    /// Index of the layer in the profile
    pub layer_index: usize,
    /// Compressible thickness below the base (m)
    pub thickness_m: f64,
    /// Depth of the layer mid-point below surface (m)
    pub mid_depth_m: f64,
    /// Initial vertical stress at mid-point, unit weight × mid-depth (kPa)
    pub initial_stress_kpa: f64,
    /// Stress increase at mid-point from the 2:1 spread (kPa)
    pub stress_increase_kpa: f64,
    /// Primary consolidation (mm)
    pub primary_mm: f64,
    /// Secondary compression (mm)
    pub secondary_mm: f64,
    /// Double-drainage path length H/2 (m)
    pub drainage_path_m: f64,
    /// Coefficient of consolidation (m²/year)
    pub consolidation_coefficient: f64,
    /// Time to 90% primary consolidation (years)
    pub t90_years: f64,
}

/// Settlement results.
///
/// ## JSON Example
///
/// ```json
/// {
///   "elastic_mm": 66.87,
///   "primary_consolidation_mm": 46.08,
///   "secondary_consolidation_mm": 15.17,
///   "total_mm": 128.12,
///   "status": "Failure",
///   "consolidation_time": "26.0 years"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementResult {
    /// Immediate (elastic) settlement (mm)
    pub elastic_mm: f64,
    /// Primary consolidation settlement (mm)
    pub primary_consolidation_mm: f64,
    /// Secondary compression settlement (mm)
    pub secondary_consolidation_mm: f64,
    /// Sum of the three parts (mm)
    pub total_mm: f64,
    /// Acceptance status of the total
    pub status: SettlementStatus,
    /// Net pressure at base level used for the elastic part (kPa)
    pub net_pressure_kpa: f64,
    /// Embedment correction C1
    pub depth_correction: f64,
    /// Depth of the strain-influence zone below the base (m)
    pub influence_depth_m: f64,
    /// Worst-case time to 90% primary consolidation (years)
    pub time_to_90_percent_years: f64,
    /// Human-readable consolidation time (days, months or years)
    pub consolidation_time: String,
    /// Per-layer consolidation breakdown
    pub consolidation_layers: Vec<ConsolidationLayerResult>,
}

/// Intermediate elastic settlement values (unrounded)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElasticSettlement {
    pub settlement_mm: f64,
    pub net_pressure: f64,
    pub depth_correction: f64,
    pub influence_depth: f64,
}

/// Strain influence factor at depth `z` below the base.
///
/// Rises linearly from `base` at the base to `peak` at `peak_depth`, then
/// falls linearly to zero at `influence_depth`.
pub fn strain_influence(z: f64, base: f64, peak: f64, peak_depth: f64, influence_depth: f64) -> f64 {
    if z <= 0.0 {
        return base;
    }
    if z >= influence_depth {
        return 0.0;
    }
    if z <= peak_depth {
        base + (peak - base) * z / peak_depth
    } else {
        peak * (influence_depth - z) / (influence_depth - peak_depth)
    }
}

/// Elastic settlement by strain-influence integration.
pub fn elastic_settlement(
    profile: &SoilProfile,
    foundation: &FoundationSpec,
    settings: &SettlementSettings,
) -> ElasticSettlement {
    let shape = &foundation.shape;
    let d = foundation.depth;
    let b = shape.width();
    let (influence_mult, peak_mult) = if shape.is_elongated() {
        (settings.influence_depth_elongated, settings.peak_depth_elongated)
    } else {
        (settings.influence_depth_compact, settings.peak_depth_compact)
    };
    let influence_depth = influence_mult * b;

    let sigma0 = profile.average_unit_weight_above(d) * d;
    let net = foundation.applied_pressure() - sigma0;
    if net <= 0.0 {
        debug!(net, "net pressure non-positive, no elastic settlement");
        return ElasticSettlement {
            settlement_mm: 0.0,
            net_pressure: net,
            depth_correction: 1.0,
            influence_depth,
        };
    }

    let c1 = (1.0 - 0.5 * sigma0 / net).max(settings.min_depth_correction);

    let base = if profile.layer_at(d).soil_class.is_compressible() {
        settings.influence_base_fine
    } else {
        settings.influence_base_granular
    };
    let peak_depth = peak_mult * b;
    let sigma_peak = profile.effective_vertical_stress(d + peak_depth, foundation.groundwater_depth);
    let peak = if sigma_peak > 0.0 {
        0.5 + 0.1 * (net / sigma_peak).sqrt()
    } else {
        0.5
    };

    let n = settings.sublayer_count;
    let dz = influence_depth / n as f64;
    let strain_sum: f64 = (0..n)
        .map(|i| {
            let z = (i as f64 + 0.5) * dz;
            let layer = profile.layer_at(d + z);
            let e_kpa: KiloPascals = MegaPascals(layer.elastic_modulus).into();
            strain_influence(z, base, peak, peak_depth, influence_depth) / e_kpa.value() * dz
        })
        .sum();

    let settlement: Millimeters = Meters(c1 * net * strain_sum).into();
    debug!(net, c1, peak, settlement_mm = settlement.value(), "elastic settlement");

    ElasticSettlement {
        settlement_mm: settlement.value(),
        net_pressure: net,
        depth_correction: c1,
        influence_depth,
    }
}

/// Primary consolidation of one layer in metres, `Cc·H/(1+e0)·log10((σ0+Δσ)/σ0)`.
///
/// Zero when the initial stress is not positive.
pub fn primary_consolidation(cc: f64, e0: f64, thickness: f64, sigma0: f64, delta_sigma: f64) -> f64 {
    if sigma0 <= 0.0 {
        return 0.0;
    }
    (cc * thickness / (1.0 + e0) * ((sigma0 + delta_sigma) / sigma0).log10()).max(0.0)
}

/// Primary and secondary consolidation for each compressible layer at or below the base.
///
/// The initial stress at mid-layer is the layer's unit weight times the mid-depth.
pub fn consolidation_layers(
    profile: &SoilProfile,
    foundation: &FoundationSpec,
    settings: &SettlementSettings,
) -> Vec<ConsolidationLayerResult> {
    let d = foundation.depth;
    let mut results = Vec::new();

    for layer in profile.layers() {
        if !layer.soil_class.is_compressible() || layer.depth_to <= d {
            continue;
        }
        let (Some(cc), Some(e0), Some(cv), Some(c_alpha)) = (
            layer.compression_index,
            layer.initial_void_ratio,
            layer.consolidation_coefficient,
            layer.secondary_compression_index,
        ) else {
            continue;
        };

        let top = layer.depth_from.max(d);
        let thickness = layer.depth_to - top;
        if thickness <= 0.0 {
            continue;
        }
        let mid = (top + layer.depth_to) / 2.0;
        let sigma0 = layer.unit_weight * mid;
        let delta_sigma = foundation.load / foundation.shape.spread_area(mid - d);

        let primary_m = primary_consolidation(cc, e0, thickness, sigma0, delta_sigma);
        if sigma0 <= 0.0 {
            warn!(layer = layer.index, sigma0, "non-positive initial stress, primary consolidation skipped");
        }

        let drainage_path = thickness / 2.0;
        let t90 = if cv > 0.0 {
            settings.time_factor_90 * drainage_path.powi(2) / cv
        } else {
            0.0
        };
        let secondary_m = if t90 > 0.0 {
            let design_life = (settings.design_life_multiplier * t90).max(settings.min_design_life_years);
            c_alpha * thickness * (design_life / t90).log10()
        } else {
            0.0
        };

        let primary: Millimeters = Meters(primary_m.max(0.0)).into();
        let secondary: Millimeters = Meters(secondary_m.max(0.0)).into();
        debug!(
            layer = layer.index,
            thickness,
            sigma0,
            delta_sigma,
            primary_mm = primary.value(),
            secondary_mm = secondary.value(),
            t90,
            "consolidation layer"
        );

        results.push(ConsolidationLayerResult {
            layer_index: layer.index,
            thickness_m: thickness,
            mid_depth_m: mid,
            initial_stress_kpa: sigma0,
            stress_increase_kpa: delta_sigma,
            primary_mm: primary.value(),
            secondary_mm: secondary.value(),
            drainage_path_m: drainage_path,
            consolidation_coefficient: cv,
            t90_years: t90,
        });
    }
    results
}

/// Format a duration in years as days (< 1 month), months (< 1 year) or years.
///
/// ```rust
/// use geo_core::calculations::settlement::format_consolidation_time;
///
/// assert_eq!(format_consolidation_time(0.05), "18 days");
/// assert_eq!(format_consolidation_time(0.5), "6.0 months");
/// assert_eq!(format_consolidation_time(25.97), "26.0 years");
/// ```
pub fn format_consolidation_time(years: f64) -> String {
    let days = years * DAYS_PER_YEAR;
    if days < DAYS_PER_MONTH {
        format!("{:.0} days", days)
    } else if years < 1.0 {
        format!("{:.1} months", years * 12.0)
    } else {
        format!("{:.1} years", years)
    }
}

/// Calculate total settlement.
#[instrument(skip_all, fields(shape = foundation.shape.name()))]
pub fn calculate(
    profile: &SoilProfile,
    foundation: &FoundationSpec,
    settings: &SettlementSettings,
    decimals: u32,
) -> SettlementResult {
    let elastic = elastic_settlement(profile, foundation, settings);
    let layers = consolidation_layers(profile, foundation, settings);

    let primary: f64 = layers.iter().map(|l| l.primary_mm).sum();
    let secondary: f64 = layers.iter().map(|l| l.secondary_mm).sum();
    let total = elastic.settlement_mm + primary + secondary;
    // Classify the reported value so status and total never disagree at a limit
    let status = SettlementStatus::from_total(round_to(total, decimals), settings);

    let t90_max = layers.iter().map(|l| l.t90_years).fold(0.0, f64::max);
    let consolidation_time = if layers.is_empty() {
        "N/A".to_string()
    } else {
        format_consolidation_time(t90_max)
    };

    debug!(total, status = %status, "settlement computed");

    let r = |v: f64| round_to(v, decimals);
    SettlementResult {
        elastic_mm: r(elastic.settlement_mm),
        primary_consolidation_mm: r(primary),
        secondary_consolidation_mm: r(secondary),
        total_mm: r(total),
        status,
        net_pressure_kpa: r(elastic.net_pressure),
        depth_correction: r(elastic.depth_correction),
        influence_depth_m: r(elastic.influence_depth),
        time_to_90_percent_years: r(t90_max),
        consolidation_time,
        consolidation_layers: layers
            .into_iter()
            .map(|l| ConsolidationLayerResult {
                layer_index: l.layer_index,
                thickness_m: r(l.thickness_m),
                mid_depth_m: r(l.mid_depth_m),
                initial_stress_kpa: r(l.initial_stress_kpa),
                stress_increase_kpa: r(l.stress_increase_kpa),
                primary_mm: r(l.primary_mm),
                secondary_mm: r(l.secondary_mm),
                drainage_path_m: r(l.drainage_path_m),
                consolidation_coefficient: round_to(l.consolidation_coefficient, decimals + 2),
                t90_years: r(l.t90_years),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::FoundationShape;
    use crate::soil::{MeasuredProperties, SoilClass, SoilLayer};

    fn sand_over_clay() -> SoilProfile {
        SoilProfile::new(&[
            SoilLayer::new(0.0, 15.0, SoilClass::Sand, 20.0),
            SoilLayer::new(15.0, 22.0, SoilClass::Clay, 8.0).with_measured(MeasuredProperties {
                compression_index: Some(0.18),
                consolidation_coefficient: Some(0.4),
                ..Default::default()
            }),
        ])
        .unwrap()
    }

    fn raft() -> FoundationSpec {
        let mut spec = FoundationSpec::new(FoundationShape::Raft { width: 10.0, length: 10.0 }, 2.0, 16_000.0);
        spec.groundwater_depth = Some(2.0);
        spec
    }

    #[test]
    fn test_status_thresholds() {
        let s = SettlementSettings::default();
        assert_eq!(SettlementStatus::from_total(0.0, &s), SettlementStatus::Safe);
        assert_eq!(SettlementStatus::from_total(24.99, &s), SettlementStatus::Safe);
        assert_eq!(SettlementStatus::from_total(25.0, &s), SettlementStatus::Warning);
        assert_eq!(SettlementStatus::from_total(49.99, &s), SettlementStatus::Warning);
        assert_eq!(SettlementStatus::from_total(50.0, &s), SettlementStatus::Failure);
    }

    #[test]
    fn test_strain_influence_shape() {
        assert_eq!(strain_influence(0.0, 0.1, 0.6, 1.0, 4.0), 0.1);
        assert!((strain_influence(1.0, 0.1, 0.6, 1.0, 4.0) - 0.6).abs() < 1e-12);
        assert!((strain_influence(2.5, 0.1, 0.6, 1.0, 4.0) - 0.3).abs() < 1e-12);
        assert_eq!(strain_influence(4.0, 0.1, 0.6, 1.0, 4.0), 0.0);
    }

    #[test]
    fn test_raft_on_sand_over_clay() {
        let result = calculate(&sand_over_clay(), &raft(), &SettlementSettings::default(), 2);
        assert!(result.elastic_mm > 0.0);
        assert!(result.primary_consolidation_mm > 0.0);
        assert!(result.secondary_consolidation_mm > 0.0);
        assert_eq!(result.consolidation_layers.len(), 1);
        // t90 = 0.848 · 3.5² / 0.4
        assert!((result.time_to_90_percent_years - 25.97).abs() < 0.01);
        assert_eq!(result.consolidation_time, "26.0 years");
        let sum = result.elastic_mm + result.primary_consolidation_mm + result.secondary_consolidation_mm;
        assert!((result.total_mm - sum).abs() < 0.02);
    }

    #[test]
    fn test_secondary_uses_design_life() {
        let result = calculate(&sand_over_clay(), &raft(), &SettlementSettings::default(), 2);
        // t_design = 2·t90 > 30 years, so Ss = Cα·H·log10(2) with Cα = 0.04·0.18
        let expected = 0.04 * 0.18 * 7.0 * 2f64.log10() * 1000.0;
        assert!((result.secondary_consolidation_mm - expected).abs() < 0.01);
    }

    #[test]
    fn test_no_net_pressure_no_elastic_settlement() {
        let profile = sand_over_clay();
        let spec = FoundationSpec::new(FoundationShape::Raft { width: 10.0, length: 10.0 }, 2.0, 1_000.0);
        let elastic = elastic_settlement(&profile, &spec, &SettlementSettings::default());
        assert_eq!(elastic.settlement_mm, 0.0);
        assert!(elastic.net_pressure <= 0.0);
    }

    #[test]
    fn test_depth_correction_floor() {
        // Deep, lightly loaded pad: 1 − 0.5·σ0/net drops below the floor
        let profile = SoilProfile::new(&[SoilLayer::new(0.0, 20.0, SoilClass::Sand, 20.0)]).unwrap();
        let spec = FoundationSpec::new(FoundationShape::Isolated { width: 2.0, length: 2.0 }, 4.0, 400.0);
        let elastic = elastic_settlement(&profile, &spec, &SettlementSettings::default());
        assert!(elastic.net_pressure > 0.0);
        assert!(1.0 - 0.5 * (spec.applied_pressure() - elastic.net_pressure) / elastic.net_pressure < 0.5);
        assert_eq!(elastic.depth_correction, 0.5);
        assert!(elastic.settlement_mm > 0.0);
    }

    #[test]
    fn test_primary_consolidation_skips_non_positive_stress() {
        assert_eq!(primary_consolidation(0.2, 0.9, 3.0, 0.0, 50.0), 0.0);
        assert_eq!(primary_consolidation(0.2, 0.9, 3.0, -5.0, 50.0), 0.0);
        let expected = 0.2 * 3.0 / 1.9 * (150.0f64 / 100.0).log10();
        assert!((primary_consolidation(0.2, 0.9, 3.0, 100.0, 50.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_initial_stress_is_unit_weight_times_mid_depth() {
        let profile = sand_over_clay();
        let layers = consolidation_layers(&profile, &raft(), &SettlementSettings::default());
        assert_eq!(layers.len(), 1);
        let clay = &profile.layers()[1];
        assert_eq!(layers[0].mid_depth_m, 18.5);
        // Groundwater at 2 m does not reduce the initial stress
        assert!((layers[0].initial_stress_kpa - clay.unit_weight * 18.5).abs() < 1e-9);
    }

    #[test]
    fn test_granular_profile_has_no_consolidation() {
        let profile = SoilProfile::new(&[SoilLayer::new(0.0, 20.0, SoilClass::Gravel, 35.0)]).unwrap();
        let spec = FoundationSpec::new(FoundationShape::Isolated { width: 2.0, length: 2.0 }, 1.0, 800.0);
        let result = calculate(&profile, &spec, &SettlementSettings::default(), 2);
        assert_eq!(result.primary_consolidation_mm, 0.0);
        assert_eq!(result.secondary_consolidation_mm, 0.0);
        assert_eq!(result.consolidation_time, "N/A");
        assert!(result.elastic_mm > 0.0);
    }

    #[test]
    fn test_clay_above_base_is_excluded() {
        let profile = SoilProfile::new(&[
            SoilLayer::new(0.0, 1.0, SoilClass::Clay, 6.0),
            SoilLayer::new(1.0, 20.0, SoilClass::Sand, 25.0),
        ])
        .unwrap();
        let spec = FoundationSpec::new(FoundationShape::Isolated { width: 2.0, length: 2.0 }, 1.5, 600.0);
        let layers = consolidation_layers(&profile, &spec, &SettlementSettings::default());
        assert!(layers.is_empty());
    }

    #[test]
    fn test_partially_penetrated_clay_uses_thickness_below_base() {
        let profile = SoilProfile::new(&[SoilLayer::new(0.0, 10.0, SoilClass::Clay, 10.0)]).unwrap();
        let spec = FoundationSpec::new(FoundationShape::Isolated { width: 2.0, length: 2.0 }, 2.0, 600.0);
        let layers = consolidation_layers(&profile, &spec, &SettlementSettings::default());
        assert_eq!(layers.len(), 1);
        assert!((layers[0].thickness_m - 8.0).abs() < 1e-12);
        assert!((layers[0].mid_depth_m - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_consolidation_time_formatting() {
        assert_eq!(format_consolidation_time(10.0 / 365.0), "10 days");
        assert_eq!(format_consolidation_time(0.25), "3.0 months");
        assert_eq!(format_consolidation_time(3.0), "3.0 years");
    }
}
