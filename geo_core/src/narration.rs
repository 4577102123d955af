//! # Report Narration
//!
//! The numeric [`CalculationOutput`] is complete without any prose. A
//! narrator is an optional collaborator (a language model service, a report
//! writer) that turns the numbers into a narrative, ranked remediation
//! suggestions and a risk level.
//!
//! Narration runs after the numbers are final and is always bounded:
//! [`narrate_with_fallback`] applies a timeout and, on timeout or error,
//! returns the deterministic [`fallback_narrative`]. The result is attached
//! with [`AnalysisReport::with_narrative`](crate::engine::AnalysisReport::with_narrative),
//! which never touches numeric fields.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use geo_core::engine::{analyze, AnalysisInput, AnalysisReport};
//! use geo_core::foundation::{FoundationShape, FoundationSpec};
//! use geo_core::narration::{narrate_with_fallback, NarrationRequest, TemplateNarrator};
//! use geo_core::settings::EngineSettings;
//! use geo_core::soil::{SoilClass, SoilLayer};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let input = AnalysisInput::new(
//!     vec![SoilLayer::new(0.0, 10.0, SoilClass::Sand, 25.0)],
//!     FoundationSpec::new(FoundationShape::Strip { width: 1.2 }, 0.8, 180.0),
//! );
//! let output = analyze(&input, &EngineSettings::default()).unwrap();
//! let request = NarrationRequest::new(&input, output.clone());
//! let narrative = narrate_with_fallback(&TemplateNarrator, &request, Duration::from_secs(5)).await;
//!
//! let report = AnalysisReport::new(output, input.locale.clone()).with_narrative(narrative);
//! assert!(report.narrative.is_some());
//! # });
//! ```

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::{CheckStatus, PlasticityState, SettlementStatus, SlopeStatus};
use crate::engine::{AnalysisInput, CalculationOutput};
use crate::soil::SoilLayer;

/// Qualitative risk level of the design
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

/// Who produced a narrative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NarrativeSource {
    Collaborator,
    Fallback,
}

/// Narrative fields merged into the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    /// Free-text narrative report
    pub report: String,
    /// Remediation suggestions, most severe first
    pub suggestions: Vec<String>,
    pub risk_level: RiskLevel,
    /// Note explaining the slab and reinforcement choice
    pub design_rationale: String,
    pub source: NarrativeSource,
    pub generated_at: DateTime<Utc>,
}

/// Everything a narrator receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrationRequest {
    pub output: CalculationOutput,
    /// The raw input profile
    pub layers: Vec<SoilLayer>,
    pub locale: String,
}

impl NarrationRequest {
    pub fn new(input: &AnalysisInput, output: CalculationOutput) -> Self {
        NarrationRequest {
            output,
            layers: input.layers.clone(),
            locale: input.locale.clone(),
        }
    }
}

/// Narration failures. Always recovered by the fallback narrative.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NarrationError {
    #[error("Narration service unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Narration timed out after {after_ms} ms")]
    Timeout { after_ms: u128 },

    #[error("Narration response invalid: {reason}")]
    InvalidResponse { reason: String },
}

/// An asynchronous report writer.
pub trait Narrator {
    fn narrate(&self, request: &NarrationRequest) -> impl Future<Output = Result<Narrative, NarrationError>> + Send;
}

/// Local narrator that writes the deterministic template.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateNarrator;

impl Narrator for TemplateNarrator {
    fn narrate(&self, request: &NarrationRequest) -> impl Future<Output = Result<Narrative, NarrationError>> + Send {
        let narrative = fallback_narrative(&request.output, &request.locale);
        async move { Ok(narrative) }
    }
}

/// Run `narrator` with a timeout, falling back to the template on any failure.
pub async fn narrate_with_fallback<N: Narrator>(
    narrator: &N,
    request: &NarrationRequest,
    timeout: Duration,
) -> Narrative {
    let error = match tokio::time::timeout(timeout, narrator.narrate(request)).await {
        Ok(Ok(narrative)) => return narrative,
        Ok(Err(e)) => e,
        Err(_) => NarrationError::Timeout {
            after_ms: timeout.as_millis(),
        },
    };
    warn!(error = %error, "narration failed, using fallback narrative");
    fallback_narrative(&request.output, &request.locale)
}

/// Deterministic narrative built from the numeric output.
///
/// Only English templates exist; other locales are tagged through unchanged.
pub fn fallback_narrative(output: &CalculationOutput, locale: &str) -> Narrative {
    if locale != "en" {
        debug!(locale, "no template for locale, writing English");
    }
    let suggestions = ranked_suggestions(output);
    let risk_level = risk_level(output);

    let bearing = &output.bearing_capacity;
    let settlement = &output.settlement;
    let design = &output.foundation_design;

    let mut report = format!(
        "Ultimate bearing capacity is {:.2} kPa against an applied pressure of {:.2} kPa, \
         a factor of safety of {:.2} (target {:.2}). ",
        bearing.ultimate_capacity_kpa,
        bearing.applied_pressure_kpa,
        bearing.factor_of_safety,
        bearing.target_fos
    );
    report.push_str(&format!(
        "Total settlement is {:.2} mm ({}), of which {:.2} mm is elastic and {:.2} mm consolidation. ",
        settlement.total_mm,
        settlement.status,
        settlement.elastic_mm,
        settlement.primary_consolidation_mm + settlement.secondary_consolidation_mm
    ));
    if settlement.consolidation_time != "N/A" {
        report.push_str(&format!(
            "Ninety percent of primary consolidation is expected within {}. ",
            settlement.consolidation_time
        ));
    }
    if let Some(slope) = &output.slope_stability {
        report.push_str(&slope.note);
        report.push_str(". ");
    }
    report.push_str(&format!(
        "Below the base the soil response is {}.",
        output.stress_field.plasticity_description.to_lowercase()
    ));

    let design_rationale = format!(
        "A {:.2} m slab (effective depth {:.2} m) carries punching shear of {:.2} kN against a capacity of {:.2} kN. \
         Bottom steel of {:.2} mm²/m is provided as {}.",
        design.thickness_m,
        design.effective_depth_m,
        design.punching_shear_demand_kn,
        design.punching_shear_capacity_kn,
        design.design_steel_mm2,
        design.bar_suggestion
    );

    Narrative {
        report,
        suggestions,
        risk_level,
        design_rationale,
        source: NarrativeSource::Fallback,
        generated_at: Utc::now(),
    }
}

/// Overall risk from the module statuses.
pub fn risk_level(output: &CalculationOutput) -> RiskLevel {
    let high = !output.bearing_capacity.passes()
        || output.settlement.status == SettlementStatus::Failure
        || output.foundation_design.punching_shear_check == CheckStatus::Unsafe
        || output
            .slope_stability
            .as_ref()
            .is_some_and(|s| s.status == SlopeStatus::Unstable);
    if high {
        return RiskLevel::High;
    }
    let moderate = output.settlement.status == SettlementStatus::Warning
        || output.bearing_capacity.has_uplift()
        || !output.foundation_design.converged
        || output.stress_field.plasticity == PlasticityState::ExtensivePlastic;
    if moderate {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}

fn ranked_suggestions(output: &CalculationOutput) -> Vec<String> {
    let bearing = &output.bearing_capacity;
    let settlement = &output.settlement;
    let design = &output.foundation_design;
    let mut ranked: Vec<(u8, String)> = Vec::new();

    if !bearing.passes() {
        ranked.push((
            3,
            format!(
                "Enlarge the footing or deepen it: factor of safety {:.2} is below the target {:.2}",
                bearing.factor_of_safety, bearing.target_fos
            ),
        ));
    }
    match settlement.status {
        SettlementStatus::Failure => ranked.push((
            3,
            format!(
                "Reduce settlement of {:.2} mm with ground improvement or preloading, or move to piles",
                settlement.total_mm
            ),
        )),
        SettlementStatus::Warning => ranked.push((
            2,
            format!(
                "Check structural tolerance for {:.2} mm of settlement and monitor during construction",
                settlement.total_mm
            ),
        )),
        SettlementStatus::Safe => {}
    }
    if design.punching_shear_check == CheckStatus::Unsafe {
        ranked.push((
            3,
            "Increase slab thickness, concrete grade or column size to resolve punching shear".to_string(),
        ));
    }
    if let Some(slope) = output.slope_stability.as_ref().filter(|s| s.status == SlopeStatus::Unstable) {
        ranked.push((
            3,
            format!(
                "Stabilise the {:.1}° slope before construction (FOS {:.2})",
                slope.slope_angle, slope.factor_of_safety
            ),
        ));
    }
    if bearing.has_uplift() {
        ranked.push((
            2,
            "Widen the base so the load resultant stays within the middle third".to_string(),
        ));
    }
    if !design.converged {
        ranked.push((
            2,
            format!(
                "Slab depth search stopped at {:.2} m without satisfying punching shear",
                design.effective_depth_m
            ),
        ));
    }
    if output.stress_field.plasticity == PlasticityState::ExtensivePlastic {
        ranked.push((1, "Review the bearing stratum; extensive yielding is expected below the base".to_string()));
    }

    if ranked.is_empty() {
        return vec!["No remediation required; proceed to detailed design".to_string()];
    }
    // Stable sort keeps insertion order within a severity
    ranked.sort_by(|a, b| b.0.cmp(&a.0));
    ranked.into_iter().map(|(_, s)| s).collect()
}
