//! # Foundation Structural Design
//!
//! Sizes the footing slab for two-way (punching) shear around the column and
//! picks bottom reinforcement for the cantilever moment.
//!
//! ## Punching Shear
//!
//! ```text
//! Vu  = 1.5 · (P − q · (c + d)²)
//! φVc = 0.75 · 0.33 · √fc' · 4(c + d) · d     (MN → kN)
//! ```
//!
//! The effective depth is found by a bounded search: start at `d0`, step by
//! a fixed increment, stop at the first `d` with `Vu ≤ φVc` or at the
//! iteration cap. Both limits come from [`StructuralSettings`].
//!
//! ## Flexure
//!
//! Per metre width, cantilever `ℓ = (B − c)/2`:
//!
//! ```text
//! Mu = 1.5 · q · ℓ² / 2
//! As = Mu / (0.9 · fy · 0.9 d)          As,min = 0.0018 · 1000 · h
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::foundation::FoundationSpec;
use crate::settings::StructuralSettings;
use crate::units::{round_to, Meters, Millimeters};

/// Standard bar table: (diameter mm, area mm²)
pub const STANDARD_BARS: [(u32, f64); 6] = [
    (10, 78.5),
    (12, 113.1),
    (16, 201.1),
    (20, 314.2),
    (25, 490.9),
    (32, 804.2),
];

/// Pass/fail outcome of a structural check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckStatus {
    Safe,
    Unsafe,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Safe => write!(f, "Safe"),
            CheckStatus::Unsafe => write!(f, "Unsafe"),
        }
    }
}

/// Outcome of the effective-depth search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthSolution {
    /// Effective depth (m)
    pub depth: f64,
    /// Search steps taken
    pub iterations: usize,
    /// Whether a depth satisfying the shear inequality was found
    pub converged: bool,
}

/// Selected bottom reinforcement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarSelection {
    /// Bar diameter (mm)
    pub diameter_mm: u32,
    /// Centre-to-centre spacing (mm)
    pub spacing_mm: f64,
}

impl BarSelection {
    /// Format as a drawing callout, e.g. `Ø16 @ 200mm c/c`
    pub fn suggestion(&self) -> String {
        format!("Ø{} @ {}mm c/c", self.diameter_mm, self.spacing_mm)
    }
}

/// Structural design results.
///
/// ## JSON Example
///
/// ```json
/// {
///   "effective_depth_m": 1.95,
///   "thickness_m": 2.03,
///   "converged": true,
///   "punching_shear_check": "Safe",
///   "bar_suggestion": "Ø25 @ 100mm c/c"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundationDesignResult {
    /// Effective depth from the shear search (m)
    pub effective_depth_m: f64,
    /// Minimum slab thickness, effective depth plus cover (m)
    pub thickness_m: f64,
    /// Search found a satisfying depth before the cap
    pub converged: bool,
    /// Search steps taken
    pub iterations: usize,
    /// Factored punching shear demand Vu (kN)
    pub punching_shear_demand_kn: f64,
    /// Factored punching shear capacity φVc (kN)
    pub punching_shear_capacity_kn: f64,
    /// Demand covered by capacity at the solved depth
    pub punching_shear_check: CheckStatus,
    /// Cantilever length beyond the column face (m)
    pub cantilever_m: f64,
    /// Factored cantilever moment per metre width (kN·m/m)
    pub design_moment_knm: f64,
    /// Steel area from flexure (mm²/m)
    pub required_steel_mm2: f64,
    /// Minimum code steel area (mm²/m)
    pub minimum_steel_mm2: f64,
    /// Governing steel area (mm²/m)
    pub design_steel_mm2: f64,
    /// Selected bars
    pub bars: BarSelection,
    /// Drawing callout for the selected bars
    pub bar_suggestion: String,
}

/// Factored punching shear demand at effective depth `d` (kN)
pub fn punching_demand(load: f64, pressure: f64, column: f64, d: f64, settings: &StructuralSettings) -> f64 {
    settings.load_factor * (load - pressure * (column + d).powi(2))
}

/// Factored punching shear capacity at effective depth `d` (kN)
pub fn punching_capacity(fc_mpa: f64, column: f64, d: f64, settings: &StructuralSettings) -> f64 {
    let perimeter = 4.0 * (column + d);
    settings.shear_phi * settings.shear_coefficient * fc_mpa.sqrt() * perimeter * d * 1000.0
}

/// Smallest effective depth on the search grid satisfying `satisfied`.
///
/// Returns the cap value with `converged = false` when no grid point works.
pub fn solve_effective_depth(settings: &StructuralSettings, satisfied: impl Fn(f64) -> bool) -> DepthSolution {
    let depth_at = |i: usize| settings.initial_depth_m + settings.depth_step_m * i as f64;
    match (0..=settings.iteration_cap).find(|&i| satisfied(depth_at(i))) {
        Some(i) => DepthSolution {
            depth: depth_at(i),
            iterations: i,
            converged: true,
        },
        None => {
            let depth = depth_at(settings.iteration_cap);
            warn!(depth, cap = settings.iteration_cap, "punching shear search hit iteration cap");
            DepthSolution {
                depth,
                iterations: settings.iteration_cap,
                converged: false,
            }
        }
    }
}

/// Pick the smallest bar giving a practical spacing for `steel_mm2` per metre.
pub fn select_bars(steel_mm2: f64, settings: &StructuralSettings) -> BarSelection {
    let spacing_for = |area: f64| {
        if steel_mm2 <= 0.0 {
            return settings.bar_spacing_max_mm;
        }
        let raw = 1000.0 * area / steel_mm2;
        (raw / settings.spacing_rounding_mm).floor() * settings.spacing_rounding_mm
    };

    let in_band = |s: f64| s >= settings.bar_spacing_min_mm && s <= settings.bar_spacing_max_mm;

    if let Some(&(diameter_mm, area)) = STANDARD_BARS.iter().find(|(_, area)| in_band(spacing_for(*area))) {
        return BarSelection {
            diameter_mm,
            spacing_mm: spacing_for(area),
        };
    }

    let fallback_area = STANDARD_BARS
        .iter()
        .find(|(dia, _)| *dia == settings.fallback_bar_mm)
        .map(|(_, area)| *area)
        .unwrap_or(201.1);
    let spacing = spacing_for(fallback_area).clamp(settings.bar_spacing_min_mm, settings.bar_spacing_max_mm);
    debug!(steel_mm2, spacing, "no standard bar in spacing band, using fallback");
    BarSelection {
        diameter_mm: settings.fallback_bar_mm,
        spacing_mm: spacing,
    }
}

/// Design the footing slab.
#[instrument(skip_all, fields(shape = foundation.shape.name(), grade = ?foundation.concrete_grade))]
pub fn calculate(foundation: &FoundationSpec, settings: &StructuralSettings, decimals: u32) -> FoundationDesignResult {
    let load = foundation.load;
    let pressure = foundation.applied_pressure();
    let column = foundation.column_size;
    let fc = foundation.concrete_grade.fc_mpa();
    let fy = foundation.steel_grade.fy_mpa();

    let solution = solve_effective_depth(settings, |d| {
        punching_demand(load, pressure, column, d, settings) <= punching_capacity(fc, column, d, settings)
    });
    let d = solution.depth;
    let thickness = d + settings.cover_allowance_m;

    let demand = punching_demand(load, pressure, column, d, settings);
    let capacity = punching_capacity(fc, column, d, settings);
    let check = if demand <= capacity {
        CheckStatus::Safe
    } else {
        CheckStatus::Unsafe
    };

    let cantilever = ((foundation.shape.width() - column) / 2.0).max(0.0);
    let moment = settings.load_factor * pressure * cantilever.powi(2) / 2.0;
    let d_mm = Millimeters::from(Meters(d)).value();
    let h_mm = Millimeters::from(Meters(thickness)).value();
    let required = moment * 1e6 / (settings.flexure_phi * fy * settings.lever_arm_ratio * d_mm);
    let minimum = settings.min_steel_ratio * 1000.0 * h_mm;
    let design_steel = required.max(minimum);
    let bars = select_bars(design_steel, settings);

    debug!(
        d,
        iterations = solution.iterations,
        demand,
        capacity,
        moment,
        design_steel,
        "structural design computed"
    );

    let r = |v: f64| round_to(v, decimals);
    FoundationDesignResult {
        effective_depth_m: r(d),
        thickness_m: r(thickness),
        converged: solution.converged,
        iterations: solution.iterations,
        punching_shear_demand_kn: r(demand),
        punching_shear_capacity_kn: r(capacity),
        punching_shear_check: check,
        cantilever_m: r(cantilever),
        design_moment_knm: r(moment),
        required_steel_mm2: r(required),
        minimum_steel_mm2: r(minimum),
        design_steel_mm2: r(design_steel),
        bar_suggestion: bars.suggestion(),
        bars,
    }
}
