//! # Engine Settings
//!
//! Every empirical constant the engine uses lives here rather than inside the
//! formulas. Several of them (strain-influence values, the 2:1 spread, the
//! depth-correction factor) are simplified closed forms, so they are exposed
//! as configuration and can be tuned without touching calculation code.
//!
//! Settings serialize to JSON; missing fields fall back to defaults so a
//! settings file only needs to name what it overrides.
//!
//! ```rust
//! use geo_core::settings::EngineSettings;
//!
//! let json = r#"{ "structural": { "iteration_cap": 50 } }"#;
//! let settings: EngineSettings = serde_json::from_str(json).unwrap();
//! assert_eq!(settings.structural.iteration_cap, 50);
//! assert_eq!(settings.settlement.safe_limit_mm, 25.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Root settings container passed to [`crate::engine::analyze`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Settlement limits and strain-influence constants
    pub settlement: SettlementSettings,

    /// Punching shear solver and reinforcement constants
    pub structural: StructuralSettings,

    /// Infinite-slope constants
    pub slope: SlopeSettings,

    /// Stress field grid resolution
    pub stress_field: StressFieldSettings,

    /// Derived chart series resolution
    pub curves: CurveSettings,

    /// Decimal places for every reported number
    pub rounding_decimals: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            settlement: SettlementSettings::default(),
            structural: StructuralSettings::default(),
            slope: SlopeSettings::default(),
            stress_field: StressFieldSettings::default(),
            curves: CurveSettings::default(),
            rounding_decimals: 2,
        }
    }
}

impl EngineSettings {
    /// Reject settings that would make a module loop forever or divide by zero.
    pub fn validate(&self) -> CalcResult<()> {
        let s = &self.structural;
        if s.depth_step_m <= 0.0 {
            return Err(CalcError::invalid_input(
                "structural.depth_step_m",
                s.depth_step_m.to_string(),
                "Depth step must be positive",
            ));
        }
        if s.initial_depth_m <= 0.0 {
            return Err(CalcError::invalid_input(
                "structural.initial_depth_m",
                s.initial_depth_m.to_string(),
                "Initial effective depth must be positive",
            ));
        }
        if s.bar_spacing_min_mm <= 0.0 || s.bar_spacing_min_mm > s.bar_spacing_max_mm {
            return Err(CalcError::invalid_input(
                "structural.bar_spacing_min_mm",
                s.bar_spacing_min_mm.to_string(),
                "Spacing band must be positive and ordered",
            ));
        }
        if s.spacing_rounding_mm <= 0.0 {
            return Err(CalcError::invalid_input(
                "structural.spacing_rounding_mm",
                s.spacing_rounding_mm.to_string(),
                "Spacing rounding must be positive",
            ));
        }
        if self.settlement.sublayer_count == 0 {
            return Err(CalcError::invalid_input(
                "settlement.sublayer_count",
                "0",
                "At least one sub-layer is required",
            ));
        }
        if self.settlement.safe_limit_mm >= self.settlement.warning_limit_mm {
            return Err(CalcError::invalid_input(
                "settlement.safe_limit_mm",
                self.settlement.safe_limit_mm.to_string(),
                "Safe limit must be below the warning limit",
            ));
        }
        if self.stress_field.rows < 2 || self.stress_field.columns < 2 {
            return Err(CalcError::invalid_input(
                "stress_field",
                format!("{}x{}", self.stress_field.rows, self.stress_field.columns),
                "Grid needs at least two rows and two columns",
            ));
        }
        if self.curves.load_steps == 0 || self.curves.time_steps == 0 {
            return Err(CalcError::invalid_input(
                "curves",
                format!("{}/{}", self.curves.load_steps, self.curves.time_steps),
                "Curve step counts must be positive",
            ));
        }
        Ok(())
    }
}

/// Settlement limits and Schmertmann-style constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementSettings {
    /// Total settlement below this is Safe (mm)
    pub safe_limit_mm: f64,
    /// Total settlement below this is Warning, otherwise Failure (mm)
    pub warning_limit_mm: f64,
    /// Strain-influence base value for sand, gravel and rock
    pub influence_base_granular: f64,
    /// Strain-influence base value for clay and silt
    pub influence_base_fine: f64,
    /// Peak strain-influence depth below the base, as a multiple of B, for compact plans
    pub peak_depth_compact: f64,
    /// Peak strain-influence depth below the base, as a multiple of B, for elongated plans
    pub peak_depth_elongated: f64,
    /// Influence depth as a multiple of B for compact plans
    pub influence_depth_compact: f64,
    /// Influence depth as a multiple of B for elongated plans
    pub influence_depth_elongated: f64,
    /// Number of equal sub-layers in the strain-influence integration
    pub sublayer_count: usize,
    /// Lower bound of the embedment correction C1
    pub min_depth_correction: f64,
    /// Terzaghi time factor for 90% primary consolidation
    pub time_factor_90: f64,
    /// Minimum design life for secondary compression (years)
    pub min_design_life_years: f64,
    /// Design life as a multiple of t90
    pub design_life_multiplier: f64,
}

impl Default for SettlementSettings {
    fn default() -> Self {
        SettlementSettings {
            safe_limit_mm: 25.0,
            warning_limit_mm: 50.0,
            influence_base_granular: 0.1,
            influence_base_fine: 0.2,
            peak_depth_compact: 0.5,
            peak_depth_elongated: 1.0,
            influence_depth_compact: 2.0,
            influence_depth_elongated: 4.0,
            sublayer_count: 10,
            min_depth_correction: 0.5,
            time_factor_90: 0.848,
            min_design_life_years: 30.0,
            design_life_multiplier: 2.0,
        }
    }
}

/// Punching shear and flexural reinforcement constants (ACI 318 style).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuralSettings {
    /// Load factor applied to service loads
    pub load_factor: f64,
    /// Strength reduction factor for shear
    pub shear_phi: f64,
    /// Two-way shear coefficient on √fc' (MPa)
    pub shear_coefficient: f64,
    /// Starting effective depth for the search (m)
    pub initial_depth_m: f64,
    /// Effective depth increment per iteration (m)
    pub depth_step_m: f64,
    /// Maximum number of search iterations
    pub iteration_cap: usize,
    /// Cover plus half bar added to effective depth (m)
    pub cover_allowance_m: f64,
    /// Minimum steel ratio on the gross section
    pub min_steel_ratio: f64,
    /// Lever arm as a fraction of effective depth
    pub lever_arm_ratio: f64,
    /// Strength reduction factor for flexure
    pub flexure_phi: f64,
    /// Smallest practical bar spacing (mm)
    pub bar_spacing_min_mm: f64,
    /// Largest practical bar spacing (mm)
    pub bar_spacing_max_mm: f64,
    /// Spacing is rounded down to a multiple of this (mm)
    pub spacing_rounding_mm: f64,
    /// Bar used when no table entry gives a practical spacing (mm)
    pub fallback_bar_mm: u32,
}

impl Default for StructuralSettings {
    fn default() -> Self {
        StructuralSettings {
            load_factor: 1.5,
            shear_phi: 0.75,
            shear_coefficient: 0.33,
            initial_depth_m: 0.15,
            depth_step_m: 0.025,
            iteration_cap: 200,
            cover_allowance_m: 0.075,
            min_steel_ratio: 0.0018,
            lever_arm_ratio: 0.9,
            flexure_phi: 0.9,
            bar_spacing_min_mm: 100.0,
            bar_spacing_max_mm: 300.0,
            spacing_rounding_mm: 25.0,
            fallback_bar_mm: 16,
        }
    }
}

/// Infinite-slope constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlopeSettings {
    /// Minimum FOS considered stable
    pub stable_fos: f64,
    /// Failure plane depth used when the footing sits at the surface (m)
    pub min_failure_depth_m: f64,
}

impl Default for SlopeSettings {
    fn default() -> Self {
        SlopeSettings {
            stable_fos: 1.5,
            min_failure_depth_m: 0.5,
        }
    }
}

/// Stress field grid resolution and extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressFieldSettings {
    /// Number of depth rows (including the base level)
    pub rows: usize,
    /// Number of offset columns (odd keeps a node on the centre line)
    pub columns: usize,
    /// Half-span of offsets as a multiple of B
    pub offset_span: f64,
    /// Depth span as a multiple of B
    pub depth_span: f64,
}

impl Default for StressFieldSettings {
    fn default() -> Self {
        StressFieldSettings {
            rows: 21,
            columns: 21,
            offset_span: 1.5,
            depth_span: 3.0,
        }
    }
}

/// Chart series resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveSettings {
    /// Load steps between zero and the maximum load
    pub load_steps: usize,
    /// Maximum load as a multiple of ultimate capacity
    pub load_range: f64,
    /// Time steps between zero and the maximum time
    pub time_steps: usize,
    /// Maximum time as a multiple of the worst-case t90
    pub time_range: f64,
}

impl Default for CurveSettings {
    fn default() -> Self {
        CurveSettings {
            load_steps: 10,
            load_range: 1.5,
            time_steps: 20,
            time_range: 1.5,
        }
    }
}
