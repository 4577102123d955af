//! # Analysis Engine
//!
//! Runs every calculation module over one soil profile and one foundation
//! and assembles the rounded [`CalculationOutput`].
//!
//! The engine is a pure function: inputs are borrowed and never mutated, no
//! state outlives a call, and identical inputs produce identical serialized
//! output. Input-shape problems (profile or geometry) abort with a
//! [`CalcError`](crate::errors::CalcError); everything after validation is infallible.
//!
//! ## Example
//!
//! ```rust
//! use geo_core::engine::calculate;
//! use geo_core::foundation::{FoundationShape, FoundationSpec};
//! use geo_core::soil::{SoilClass, SoilLayer};
//!
//! let layers = vec![
//!     SoilLayer::new(0.0, 6.0, SoilClass::Sand, 18.0),
//!     SoilLayer::new(6.0, 15.0, SoilClass::Clay, 10.0),
//! ];
//! let footing = FoundationSpec::new(FoundationShape::Isolated { width: 2.0, length: 2.0 }, 1.2, 900.0);
//!
//! let output = calculate(&layers, &footing).unwrap();
//! assert!(output.bearing_capacity.ultimate_capacity_kpa > 0.0);
//! assert!(output.slope_stability.is_none());
//! ```

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::calculations::{
    bearing, curves, settlement, slope, stress_field, structural, BearingCapacityResult, FoundationDesignResult,
    LoadSettlementPoint, SettlementResult, ShearStrengthPoint, SlopeStabilityResult, StressFieldResult,
    TimeSettlementPoint,
};
use crate::errors::CalcResult;
use crate::foundation::FoundationSpec;
use crate::narration::Narrative;
use crate::settings::EngineSettings;
use crate::soil::{ResolvedLayer, SoilClass, SoilLayer, SoilProfile};

fn default_locale() -> String {
    "en".to_string()
}

/// A field observation offered for future correlation tuning.
///
/// Records are accepted and counted but do not change any formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRecord {
    pub soil_class: SoilClass,
    pub spt_n: f64,
    #[serde(default)]
    pub friction_angle: Option<f64>,
    #[serde(default)]
    pub cohesion: Option<f64>,
    #[serde(default)]
    pub elastic_modulus: Option<f64>,
}

/// Everything the engine needs for one analysis.
///
/// ## JSON Example
///
/// ```json
/// {
///   "layers": [
///     { "depth_from": 0.0, "depth_to": 15.0, "soil_class": "sand", "spt_n": 20 }
///   ],
///   "foundation": {
///     "shape": { "type": "Raft", "width": 10.0, "length": 10.0 },
///     "depth": 2.0,
///     "load": 16000.0
///   },
///   "locale": "en"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInput {
    /// Soil layers, top to bottom
    pub layers: Vec<SoilLayer>,
    /// Foundation definition
    pub foundation: FoundationSpec,
    /// Optional calibration observations
    #[serde(default)]
    pub calibration: Vec<CalibrationRecord>,
    /// Locale tag for the narrative
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl AnalysisInput {
    pub fn new(layers: Vec<SoilLayer>, foundation: FoundationSpec) -> Self {
        AnalysisInput {
            layers,
            foundation,
            calibration: Vec::new(),
            locale: default_locale(),
        }
    }
}

/// Complete numeric output of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationOutput {
    /// Resolved parameters per layer
    pub layer_parameters: Vec<ResolvedLayer>,
    pub bearing_capacity: BearingCapacityResult,
    pub settlement: SettlementResult,
    /// Present only for inclined ground
    pub slope_stability: Option<SlopeStabilityResult>,
    pub foundation_design: FoundationDesignResult,
    pub stress_field: StressFieldResult,
    pub load_settlement_curve: Vec<LoadSettlementPoint>,
    pub shear_strength_profile: Vec<ShearStrengthPoint>,
    pub time_settlement_curve: Vec<TimeSettlementPoint>,
    /// Number of calibration records supplied with the input
    pub calibration_records_received: usize,
}

/// Numeric output plus locale and the optional narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub locale: String,
    pub output: CalculationOutput,
    #[serde(default)]
    pub narrative: Option<Narrative>,
}

impl AnalysisReport {
    pub fn new(output: CalculationOutput, locale: impl Into<String>) -> Self {
        AnalysisReport {
            locale: locale.into(),
            output,
            narrative: None,
        }
    }

    /// Attach a narrative. Numeric output is left untouched.
    pub fn with_narrative(mut self, narrative: Narrative) -> Self {
        self.narrative = Some(narrative);
        self
    }
}

/// Run a full analysis.
///
/// # Errors
///
/// * [`InvalidProfile`](crate::errors::CalcError::InvalidProfile) for empty, gapped or overlapping layers
/// * [`InvalidGeometry`](crate::errors::CalcError::InvalidGeometry) or
///   [`InvalidInput`](crate::errors::CalcError::InvalidInput) for bad
///   foundation data or settings
#[instrument(skip_all, fields(layers = input.layers.len(), shape = input.foundation.shape.name()))]
pub fn analyze(input: &AnalysisInput, settings: &EngineSettings) -> CalcResult<CalculationOutput> {
    let profile = prepare(input, settings)?;

    let foundation = &input.foundation;
    let decimals = settings.rounding_decimals;

    let bearing = bearing::calculate(&profile, foundation, decimals);
    let settlement = settlement::calculate(&profile, foundation, &settings.settlement, decimals);
    let design = structural::calculate(foundation, &settings.structural, decimals);
    let slope = slope::calculate(&profile, foundation, &settings.slope, decimals);
    let stress = stress_field::calculate(&profile, foundation, &settings.stress_field, decimals);

    let load_curve = curves::load_settlement(&bearing, &settlement, &settings.curves, decimals);
    let shear_curve = curves::shear_strength_profile(&profile, foundation, decimals);
    let time_curve = curves::time_settlement(&settlement, &settings.curves, decimals);

    info!(
        fos = bearing.factor_of_safety,
        settlement_mm = settlement.total_mm,
        status = %settlement.status,
        punching = %design.punching_shear_check,
        "analysis complete"
    );

    Ok(CalculationOutput {
        layer_parameters: profile.layers().iter().map(|l| l.rounded(decimals)).collect(),
        bearing_capacity: bearing,
        settlement,
        slope_stability: slope,
        foundation_design: design,
        stress_field: stress,
        load_settlement_curve: load_curve,
        shear_strength_profile: shear_curve,
        time_settlement_curve: time_curve,
        calibration_records_received: input.calibration.len(),
    })
}

/// Analyze with default settings and no calibration records.
pub fn calculate(layers: &[SoilLayer], foundation: &FoundationSpec) -> CalcResult<CalculationOutput> {
    let input = AnalysisInput::new(layers.to_vec(), foundation.clone());
    analyze(&input, &EngineSettings::default())
}

/// Reject settings and inputs without running any module.
pub fn validate(input: &AnalysisInput, settings: &EngineSettings) -> CalcResult<()> {
    prepare(input, settings).map(|_| ())
}

fn prepare(input: &AnalysisInput, settings: &EngineSettings) -> CalcResult<SoilProfile> {
    settings.validate()?;
    let profile = SoilProfile::new(&input.layers)?;
    input.foundation.validate(profile.total_depth())?;
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::FoundationShape;

    fn input() -> AnalysisInput {
        AnalysisInput::new(
            vec![SoilLayer::new(0.0, 10.0, SoilClass::Gravel, 30.0)],
            FoundationSpec::new(FoundationShape::Circular { diameter: 2.5 }, 1.0, 900.0),
        )
    }

    #[test]
    fn test_input_json_defaults() {
        let json = r#"{
            "layers": [{ "depth_from": 0, "depth_to": 10, "soil_class": "gravel", "spt_n": 30 }],
            "foundation": { "shape": { "type": "Circular", "diameter": 2.5 }, "depth": 1.0, "load": 900.0 }
        }"#;
        let parsed: AnalysisInput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, input());
    }

    #[test]
    fn test_invalid_settings_abort() {
        let mut settings = EngineSettings::default();
        settings.stress_field.rows = 1;
        assert!(analyze(&input(), &settings).is_err());
        assert!(validate(&input(), &settings).is_err());
    }

    #[test]
    fn test_custom_grid_resolution() {
        let mut settings = EngineSettings::default();
        settings.stress_field.rows = 5;
        settings.stress_field.columns = 7;
        let output = analyze(&input(), &settings).unwrap();
        assert_eq!(output.stress_field.points.len(), 35);
    }

    #[test]
    fn test_layer_parameters_are_rounded() {
        let output = analyze(&input(), &EngineSettings::default()).unwrap();
        // φ = 22 + √600 = 46.49 → capped at 45
        assert_eq!(output.layer_parameters[0].friction_angle, 45.0);
        assert_eq!(output.calibration_records_received, 0);
    }
}
