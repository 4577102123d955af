//! # Soil Profile
//!
//! Soil layer definitions, empirical parameter estimation, and the profile
//! accessor the calculation modules share.
//!
//! ## Measured vs. Estimated
//!
//! Each layer carries a blow count and, optionally, lab-measured properties.
//! Resolution is per field: a measured value wins when the layer's
//! `use_measured_data` flag is set and that particular field is present;
//! every other field comes from the [`estimator`] correlations.
//!
//! ## Example
//!
//! ```rust
//! use geo_core::soil::{SoilClass, SoilLayer};
//!
//! let mut clay = SoilLayer::new(0.0, 6.0, SoilClass::Clay, 8.0);
//! clay.use_measured_data = true;
//! clay.measured.compression_index = Some(0.18);
//!
//! let resolved = clay.resolve(0);
//! assert_eq!(resolved.compression_index, Some(0.18));
//! assert_eq!(resolved.cohesion, 50.0); // estimated: 6.25 * N
//! ```

pub mod estimator;
pub mod profile;

pub use profile::SoilProfile;

use serde::{Deserialize, Serialize};

use crate::units::round_to;

/// Soil classification used to pick correlations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilClass {
    Sand,
    Clay,
    Silt,
    Gravel,
    Rock,
}

impl SoilClass {
    /// Fine-grained classes that consolidate under sustained load
    pub fn is_compressible(&self) -> bool {
        matches!(self, SoilClass::Clay | SoilClass::Silt)
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            SoilClass::Sand => "Sand",
            SoilClass::Clay => "Clay",
            SoilClass::Silt => "Silt",
            SoilClass::Gravel => "Gravel",
            SoilClass::Rock => "Rock",
        }
    }
}

impl std::fmt::Display for SoilClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Lab-measured properties. Any subset may be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasuredProperties {
    /// Bulk unit weight (kN/m³)
    pub unit_weight: Option<f64>,
    /// Cohesion or undrained shear strength (kPa)
    pub cohesion: Option<f64>,
    /// Friction angle (degrees)
    pub friction_angle: Option<f64>,
    /// Elastic modulus (MPa)
    pub elastic_modulus: Option<f64>,
    /// Poisson ratio
    pub poisson_ratio: Option<f64>,
    /// Compression index Cc
    pub compression_index: Option<f64>,
    /// Recompression index Cr
    pub recompression_index: Option<f64>,
    /// Coefficient of consolidation Cv (m²/year)
    pub consolidation_coefficient: Option<f64>,
    /// Secondary compression index Cα
    pub secondary_compression_index: Option<f64>,
}

/// One stratum of the soil profile, occupying `[depth_from, depth_to)`.
///
/// ## JSON Example
///
/// ```json
/// {
///   "depth_from": 15.0,
///   "depth_to": 22.0,
///   "soil_class": "clay",
///   "spt_n": 8,
///   "use_measured_data": true,
///   "measured": { "compression_index": 0.18, "consolidation_coefficient": 0.4 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilLayer {
    /// Top of layer below ground surface (m)
    pub depth_from: f64,

    /// Bottom of layer below ground surface (m)
    pub depth_to: f64,

    /// Soil classification
    pub soil_class: SoilClass,

    /// SPT blow count N
    pub spt_n: f64,

    /// Use lab-measured values where present
    #[serde(default)]
    pub use_measured_data: bool,

    /// Lab-measured properties (consulted only when `use_measured_data` is set)
    #[serde(default)]
    pub measured: MeasuredProperties,
}

impl SoilLayer {
    /// Create a layer with no measured data
    pub fn new(depth_from: f64, depth_to: f64, soil_class: SoilClass, spt_n: f64) -> Self {
        SoilLayer {
            depth_from,
            depth_to,
            soil_class,
            spt_n,
            use_measured_data: false,
            measured: MeasuredProperties::default(),
        }
    }

    /// Attach measured properties and enable them
    pub fn with_measured(mut self, measured: MeasuredProperties) -> Self {
        self.measured = measured;
        self.use_measured_data = true;
        self
    }

    /// Layer thickness (m)
    pub fn thickness(&self) -> f64 {
        self.depth_to - self.depth_from
    }

    /// Resolve every engineering parameter for this layer.
    ///
    /// Consolidation parameters are only produced for clay and silt.
    pub fn resolve(&self, index: usize) -> ResolvedLayer {
        let n = self.spt_n;
        let class = self.soil_class;
        let measured = if self.use_measured_data {
            Some(&self.measured)
        } else {
            None
        };
        let mut measured_fields = Vec::new();

        let mut field = |name: &'static str, value: Option<f64>, estimate: &dyn Fn() -> f64| -> f64 {
            if value.is_some() {
                measured_fields.push(name.to_string());
            }
            resolve(value, estimate)
        };

        let unit_weight = field(
            "unit_weight",
            measured.and_then(|m| m.unit_weight),
            &|| estimator::unit_weight(class, n),
        );
        let friction_angle = field(
            "friction_angle",
            measured.and_then(|m| m.friction_angle),
            &|| estimator::friction_angle(class, n),
        );
        let cohesion = field(
            "cohesion",
            measured.and_then(|m| m.cohesion),
            &|| estimator::cohesion(class, n),
        );
        let elastic_modulus = field(
            "elastic_modulus",
            measured.and_then(|m| m.elastic_modulus),
            &|| estimator::elastic_modulus(class, n),
        );
        let poisson_ratio = field(
            "poisson_ratio",
            measured.and_then(|m| m.poisson_ratio),
            &|| estimator::poisson_ratio(class),
        );

        let (compression_index, recompression_index, consolidation_coefficient, secondary_compression_index) =
            if class.is_compressible() {
                let cc = field(
                    "compression_index",
                    measured.and_then(|m| m.compression_index),
                    &|| estimator::compression_index(class, n),
                );
                let cr = field(
                    "recompression_index",
                    measured.and_then(|m| m.recompression_index),
                    &|| estimator::recompression_index(cc),
                );
                let cv = field(
                    "consolidation_coefficient",
                    measured.and_then(|m| m.consolidation_coefficient),
                    &|| estimator::consolidation_coefficient(class, n),
                );
                let c_alpha = field(
                    "secondary_compression_index",
                    measured.and_then(|m| m.secondary_compression_index),
                    &|| estimator::secondary_compression_index(class, cc),
                );
                (Some(cc), Some(cr), Some(cv), Some(c_alpha))
            } else {
                (None, None, None, None)
            };

        let initial_void_ratio = compression_index.map(estimator::initial_void_ratio);

        ResolvedLayer {
            index,
            depth_from: self.depth_from,
            depth_to: self.depth_to,
            soil_class: class,
            spt_n: n,
            unit_weight,
            friction_angle,
            cohesion,
            elastic_modulus,
            poisson_ratio,
            compression_index,
            recompression_index,
            consolidation_coefficient,
            secondary_compression_index,
            initial_void_ratio,
            measured_fields,
        }
    }
}

/// Per-field resolution rule: the measured value if present, else the estimate.
///
/// The estimate is only evaluated when it is needed.
///
/// ```rust
/// use geo_core::soil::resolve;
///
/// assert_eq!(resolve(Some(19.0), || 18.0), 19.0);
/// assert_eq!(resolve(None, || 18.0), 18.0);
/// ```
pub fn resolve(measured: Option<f64>, estimate: impl FnOnce() -> f64) -> f64 {
    measured.unwrap_or_else(estimate)
}

/// Engineering parameters for one layer after measured/estimated resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLayer {
    /// Position in the input profile
    pub index: usize,
    /// Top of layer (m)
    pub depth_from: f64,
    /// Bottom of layer (m)
    pub depth_to: f64,
    /// Soil classification
    pub soil_class: SoilClass,
    /// SPT blow count N
    pub spt_n: f64,
    /// Bulk unit weight γ (kN/m³)
    pub unit_weight: f64,
    /// Friction angle φ (degrees)
    pub friction_angle: f64,
    /// Cohesion c (kPa)
    pub cohesion: f64,
    /// Elastic modulus E (MPa)
    pub elastic_modulus: f64,
    /// Poisson ratio ν
    pub poisson_ratio: f64,
    /// Compression index Cc (clay/silt only)
    pub compression_index: Option<f64>,
    /// Recompression index Cr (clay/silt only)
    pub recompression_index: Option<f64>,
    /// Coefficient of consolidation Cv in m²/year (clay/silt only)
    pub consolidation_coefficient: Option<f64>,
    /// Secondary compression index Cα (clay/silt only)
    pub secondary_compression_index: Option<f64>,
    /// Initial void ratio e0 estimated from Cc (clay/silt only)
    pub initial_void_ratio: Option<f64>,
    /// Names of the fields taken from measured data
    pub measured_fields: Vec<String>,
}

impl ResolvedLayer {
    /// Layer thickness (m)
    pub fn thickness(&self) -> f64 {
        self.depth_to - self.depth_from
    }

    /// Whether `depth` falls inside `[depth_from, depth_to)`
    pub fn contains(&self, depth: f64) -> bool {
        depth >= self.depth_from && depth < self.depth_to
    }

    /// Friction angle in radians
    pub fn friction_angle_rad(&self) -> f64 {
        self.friction_angle.to_radians()
    }

    /// Mohr-Coulomb shear strength τ = c + σ'·tanφ (kPa)
    pub fn shear_strength(&self, effective_stress: f64) -> f64 {
        self.cohesion + effective_stress.max(0.0) * self.friction_angle_rad().tan()
    }

    /// Copy with every reported number rounded for output
    pub fn rounded(&self, decimals: u32) -> ResolvedLayer {
        let r = |v: f64| round_to(v, decimals);
        // Consolidation indices are small; keep two extra places so they stay readable.
        let r_index = |v: Option<f64>| v.map(|x| round_to(x, decimals + 2));
        ResolvedLayer {
            index: self.index,
            depth_from: r(self.depth_from),
            depth_to: r(self.depth_to),
            soil_class: self.soil_class,
            spt_n: r(self.spt_n),
            unit_weight: r(self.unit_weight),
            friction_angle: r(self.friction_angle),
            cohesion: r(self.cohesion),
            elastic_modulus: r(self.elastic_modulus),
            poisson_ratio: r(self.poisson_ratio),
            compression_index: r_index(self.compression_index),
            recompression_index: r_index(self.recompression_index),
            consolidation_coefficient: r_index(self.consolidation_coefficient),
            secondary_compression_index: r_index(self.secondary_compression_index),
            initial_void_ratio: r_index(self.initial_void_ratio),
            measured_fields: self.measured_fields.clone(),
        }
    }
}
