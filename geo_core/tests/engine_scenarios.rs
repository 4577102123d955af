//! End-to-end engine scenarios.

use geo_core::calculations::{CheckStatus, SettlementStatus, SlopeStatus};
use geo_core::engine::{analyze, calculate, AnalysisInput, AnalysisReport, CalibrationRecord};
use geo_core::foundation::{ConcreteGrade, FoundationShape, FoundationSpec};
use geo_core::narration::fallback_narrative;
use geo_core::settings::EngineSettings;
use geo_core::soil::{MeasuredProperties, SoilClass, SoilLayer};
use geo_core::CalcError;

fn sand_over_clay() -> Vec<SoilLayer> {
    vec![
        SoilLayer::new(0.0, 15.0, SoilClass::Sand, 20.0),
        SoilLayer::new(15.0, 22.0, SoilClass::Clay, 8.0).with_measured(MeasuredProperties {
            compression_index: Some(0.18),
            consolidation_coefficient: Some(0.4),
            ..Default::default()
        }),
    ]
}

fn raft() -> FoundationSpec {
    let mut spec = FoundationSpec::new(FoundationShape::Raft { width: 10.0, length: 10.0 }, 2.0, 16_000.0);
    spec.groundwater_depth = Some(2.0);
    spec.target_fos = 3.0;
    spec
}

fn bar_callout_is_well_formed(s: &str) -> bool {
    let Some(rest) = s.strip_prefix('Ø') else {
        return false;
    };
    let Some((diameter, rest)) = rest.split_once(" @ ") else {
        return false;
    };
    let Some(spacing) = rest.strip_suffix("mm c/c") else {
        return false;
    };
    diameter.parse::<u32>().is_ok() && spacing.parse::<f64>().is_ok()
}

#[test]
fn raft_on_sand_over_clay() {
    let output = calculate(&sand_over_clay(), &raft()).unwrap();

    // Bearing: sand φ = 20 + √400 = 40°
    let bearing = &output.bearing_capacity;
    assert_eq!(bearing.bearing_layer_index, 0);
    assert!((bearing.friction_angle - 40.0).abs() < 1e-9);
    let phi = 40f64.to_radians();
    let nq = (std::f64::consts::PI * phi.tan()).exp() * (std::f64::consts::FRAC_PI_4 + phi / 2.0).tan().powi(2);
    assert!((bearing.factors.nq - nq).abs() < 0.01);
    assert!((bearing.factors.nc - (nq - 1.0) / phi.tan()).abs() < 0.01);
    assert!((bearing.factors.ngamma - 2.0 * (nq + 1.0) * phi.tan()).abs() < 0.01);
    assert!((bearing.applied_pressure_kpa - 160.0).abs() < 1e-9);

    // Settlement: every component present
    let settlement = &output.settlement;
    assert!(settlement.elastic_mm > 0.0);
    assert!(settlement.primary_consolidation_mm > 0.0);
    assert!(settlement.secondary_consolidation_mm > 0.0);

    // Design
    let design = &output.foundation_design;
    assert!(matches!(design.punching_shear_check, CheckStatus::Safe | CheckStatus::Unsafe));
    assert!(bar_callout_is_well_formed(&design.bar_suggestion), "{}", design.bar_suggestion);

    assert!(output.slope_stability.is_none());
    assert_eq!(output.layer_parameters.len(), 2);
    assert_eq!(output.layer_parameters[1].compression_index, Some(0.18));
    assert_eq!(output.load_settlement_curve.len(), 11);
    assert_eq!(output.time_settlement_curve.len(), 21);
    assert_eq!(output.shear_strength_profile.len(), 23);
}

#[test]
fn identical_inputs_give_identical_json() {
    let layers = sand_over_clay();
    let spec = raft();
    let a = serde_json::to_string(&calculate(&layers, &spec).unwrap()).unwrap();
    let b = serde_json::to_string(&calculate(&layers, &spec).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn target_fos_changes_only_allowable() {
    let layers = sand_over_clay();
    let mut spec = raft();
    let base = calculate(&layers, &spec).unwrap().bearing_capacity;
    for target in [1.5, 2.5, 4.0] {
        spec.target_fos = target;
        let result = calculate(&layers, &spec).unwrap().bearing_capacity;
        assert_eq!(result.ultimate_capacity_kpa, base.ultimate_capacity_kpa);
        assert!((result.allowable_capacity_kpa - result.ultimate_capacity_kpa / target).abs() <= 0.01);
    }
}

#[test]
fn cohesive_bearing_factors_independent_of_blow_count() {
    for n in [1.0, 6.0, 14.0, 40.0] {
        let layers = vec![SoilLayer::new(0.0, 12.0, SoilClass::Clay, n)];
        let spec = FoundationSpec::new(FoundationShape::Strip { width: 1.0 }, 1.0, 120.0);
        let factors = calculate(&layers, &spec).unwrap().bearing_capacity.factors;
        assert_eq!(factors.nc, 5.14);
        assert_eq!(factors.nq, 1.0);
        assert_eq!(factors.ngamma, 0.0);
    }
}

#[test]
fn settlement_status_follows_total() {
    let layers = vec![SoilLayer::new(0.0, 20.0, SoilClass::Sand, 15.0)];
    let settings = EngineSettings::default();
    for load in [200.0, 600.0, 1_200.0, 2_400.0, 4_800.0] {
        let spec = FoundationSpec::new(FoundationShape::Isolated { width: 2.0, length: 2.0 }, 1.0, load);
        let s = calculate(&layers, &spec).unwrap().settlement;
        let expected = if s.total_mm < settings.settlement.safe_limit_mm {
            SettlementStatus::Safe
        } else if s.total_mm < settings.settlement.warning_limit_mm {
            SettlementStatus::Warning
        } else {
            SettlementStatus::Failure
        };
        assert_eq!(s.status, expected, "load {} gave {} mm", load, s.total_mm);
    }
}

#[test]
fn punching_check_matches_demand_and_capacity() {
    let layers = sand_over_clay();
    for grade in ConcreteGrade::ALL {
        let mut spec = raft();
        spec.concrete_grade = grade;
        let design = calculate(&layers, &spec).unwrap().foundation_design;
        let covered = design.punching_shear_demand_kn <= design.punching_shear_capacity_kn;
        assert_eq!(design.punching_shear_check == CheckStatus::Safe, covered);
    }
}

#[test]
fn stronger_concrete_never_requires_thicker_slab() {
    let layers = sand_over_clay();
    let thickness = |grade: ConcreteGrade| {
        let mut spec = raft();
        spec.concrete_grade = grade;
        calculate(&layers, &spec).unwrap().foundation_design.thickness_m
    };
    let all: Vec<f64> = ConcreteGrade::ALL.iter().map(|g| thickness(*g)).collect();
    for pair in all.windows(2) {
        assert!(pair[1] <= pair[0]);
    }
}

#[test]
fn slope_module_presence() {
    let layers = vec![SoilLayer::new(0.0, 10.0, SoilClass::Sand, 8.0)];
    let mut spec = FoundationSpec::new(FoundationShape::Isolated { width: 1.5, length: 1.5 }, 1.0, 300.0);

    spec.slope_angle = None;
    assert!(calculate(&layers, &spec).unwrap().slope_stability.is_none());
    spec.slope_angle = Some(0.0);
    assert!(calculate(&layers, &spec).unwrap().slope_stability.is_none());

    spec.slope_angle = Some(38.0);
    let slope = calculate(&layers, &spec).unwrap().slope_stability.unwrap();
    assert!(slope.factor_of_safety < 1.5);
    assert_eq!(slope.status, SlopeStatus::Unstable);
}

#[test]
fn stress_field_centerline_monotone() {
    for shape in [
        FoundationShape::Isolated { width: 2.0, length: 3.0 },
        FoundationShape::Strip { width: 1.2 },
        FoundationShape::Raft { width: 10.0, length: 10.0 },
        FoundationShape::Circular { diameter: 3.0 },
    ] {
        let spec = FoundationSpec::new(shape, 1.0, 1_500.0);
        let output = calculate(&sand_over_clay(), &spec).unwrap();
        let field = &output.stress_field;
        assert!(field.points.iter().all(|p| p.stress_kpa >= 0.0));
        let line: Vec<f64> = field.centerline().map(|p| p.stress_kpa).collect();
        assert_eq!(line.len(), field.rows);
        for pair in line.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
    }
}

#[test]
fn malformed_profiles_are_rejected() {
    let spec = FoundationSpec::new(FoundationShape::Isolated { width: 2.0, length: 2.0 }, 1.0, 500.0);
    let gapped = vec![
        SoilLayer::new(0.0, 5.0, SoilClass::Sand, 10.0),
        SoilLayer::new(6.0, 12.0, SoilClass::Clay, 6.0),
    ];
    assert!(matches!(calculate(&gapped, &spec), Err(CalcError::InvalidProfile { .. })));
    assert!(matches!(calculate(&[], &spec), Err(CalcError::InvalidProfile { .. })));
}

#[test]
fn invalid_geometry_is_rejected() {
    let layers = vec![SoilLayer::new(0.0, 5.0, SoilClass::Sand, 10.0)];
    let too_deep = FoundationSpec::new(FoundationShape::Isolated { width: 2.0, length: 2.0 }, 6.0, 500.0);
    assert!(matches!(calculate(&layers, &too_deep), Err(CalcError::InvalidGeometry { .. })));
    let zero_width = FoundationSpec::new(FoundationShape::Strip { width: 0.0 }, 1.0, 100.0);
    assert!(matches!(calculate(&layers, &zero_width), Err(CalcError::InvalidGeometry { .. })));
}

#[test]
fn calibration_records_are_counted_not_applied() {
    let mut input = AnalysisInput::new(sand_over_clay(), raft());
    let baseline = analyze(&input, &EngineSettings::default()).unwrap();
    input.calibration.push(CalibrationRecord {
        soil_class: SoilClass::Sand,
        spt_n: 20.0,
        friction_angle: Some(33.0),
        cohesion: None,
        elastic_modulus: Some(30.0),
    });
    let calibrated = analyze(&input, &EngineSettings::default()).unwrap();
    assert_eq!(calibrated.calibration_records_received, 1);
    assert_eq!(calibrated.bearing_capacity, baseline.bearing_capacity);
    assert_eq!(calibrated.settlement, baseline.settlement);
}

#[test]
fn narrative_merge_keeps_numbers() {
    let input = AnalysisInput::new(sand_over_clay(), raft());
    let output = analyze(&input, &EngineSettings::default()).unwrap();
    let narrative = fallback_narrative(&output, &input.locale);
    let report = AnalysisReport::new(output.clone(), "en").with_narrative(narrative);
    assert_eq!(report.output, output);
    assert!(report.narrative.is_some());
}
