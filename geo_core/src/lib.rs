//! # geo_core - Geotechnical Foundation Calculation Engine
//!
//! `geo_core` is the computational heart of Substrata. Given a layered soil
//! profile and a foundation definition it computes bearing capacity,
//! settlement, slab design, slope stability, a stress field and chart
//! series. All inputs and outputs are JSON-serializable, so results can be
//! stored, diffed or handed to an AI assistant for narration.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: One pure function from input to output
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Deterministic**: Every reported number is rounded; identical inputs
//!   give byte-identical output
//!
//! ## Quick Start
//!
//! ```rust
//! use geo_core::engine::calculate;
//! use geo_core::foundation::{FoundationShape, FoundationSpec};
//! use geo_core::soil::{MeasuredProperties, SoilClass, SoilLayer};
//!
//! let layers = vec![
//!     SoilLayer::new(0.0, 15.0, SoilClass::Sand, 20.0),
//!     SoilLayer::new(15.0, 22.0, SoilClass::Clay, 8.0).with_measured(MeasuredProperties {
//!         compression_index: Some(0.18),
//!         consolidation_coefficient: Some(0.4),
//!         ..Default::default()
//!     }),
//! ];
//! let mut raft = FoundationSpec::new(FoundationShape::Raft { width: 10.0, length: 10.0 }, 2.0, 16_000.0);
//! raft.groundwater_depth = Some(2.0);
//!
//! let output = calculate(&layers, &raft).unwrap();
//! println!("{}", serde_json::to_string_pretty(&output.settlement).unwrap());
//! ```
//!
//! ## Modules
//!
//! - [`soil`] - Soil layers, SPT correlations and the profile accessor
//! - [`foundation`] - Foundation shapes, grades and loads
//! - [`calculations`] - Bearing, settlement, structural, slope, stress field, curves
//! - [`engine`] - Orchestrator and output/report types
//! - [`narration`] - Optional narrative collaborator with timeout and fallback
//! - [`settings`] - Empirical constants as configuration
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - JSON loading and atomic report saves

pub mod calculations;
pub mod engine;
pub mod errors;
pub mod file_io;
pub mod foundation;
pub mod narration;
pub mod settings;
pub mod soil;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use engine::{analyze, AnalysisInput, AnalysisReport, CalculationOutput};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_input, load_settings, save_report};
pub use foundation::{FoundationShape, FoundationSpec};
pub use settings::EngineSettings;
pub use soil::{SoilClass, SoilLayer, SoilProfile};
