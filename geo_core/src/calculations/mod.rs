//! # Foundation Calculations
//!
//! One module per engineering check. Each follows the same pattern:
//!
//! - `*Result` - Calculation results (JSON-serializable, rounded)
//! - `calculate(profile, foundation, settings, decimals) -> *Result` - Pure function
//!
//! Inputs are validated once by [`crate::engine::analyze`] before any module
//! runs, so the modules themselves never fail. Numeric edge cases (zero
//! stress under a log ratio, an exhausted solver) are recovered locally and
//! logged through `tracing`.
//!
//! ## Available Calculations
//!
//! - [`bearing`] - Ultimate and allowable bearing capacity (Terzaghi/Vesic)
//! - [`settlement`] - Elastic, primary and secondary settlement
//! - [`structural`] - Punching shear thickness and bottom reinforcement
//! - [`slope`] - Infinite-slope stability for inclined ground
//! - [`stress_field`] - Stress grid, displacement and plasticity tier
//! - [`curves`] - Load–settlement, shear strength and time–settlement series

pub mod bearing;
pub mod curves;
pub mod settlement;
pub mod slope;
pub mod stress_field;
pub mod structural;

// Re-export commonly used types
pub use bearing::{BearingCapacityResult, BearingFactors};
pub use curves::{LoadSettlementPoint, ShearStrengthPoint, TimeSettlementPoint};
pub use settlement::{ConsolidationLayerResult, SettlementResult, SettlementStatus};
pub use slope::{SlopeStabilityResult, SlopeStatus};
pub use stress_field::{PlasticityState, StressFieldResult, StressPoint};
pub use structural::{BarSelection, CheckStatus, FoundationDesignResult};
