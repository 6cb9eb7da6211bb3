//! wellprofile: Drilling Depth-Profile Models
//!
//! Closed-form drilling models sampled over depth and inclination, with a
//! directional survey loader and two front ends (CLI and HTTP).
//!
//! ## Layout
//!
//! - **Physics Engine**: hole cleaning (two strategies), bottom hole pressure,
//!   effective WOB, unit conversions, bundled by [`ProfileModel`]
//! - **Config**: TOML configuration with two-pass validation
//! - **Survey**: delimited-text and `.xlsx` survey loader
//! - **Report**: text tables and CSV series
//! - **API**: Axum JSON endpoints

pub mod api;
pub mod config;
pub mod physics_engine;
pub mod report;
pub mod survey;
pub mod types;

// Re-export configuration
pub use config::{ConfigError, ProfileConfig};

// Re-export the model entry points
pub use physics_engine::{HoleCleaningModel, HoleCleaningModelKind, ProfileModel};

// Re-export commonly used types
pub use types::{
    DepthUnit, Domain, DrillingParameters, HoleCleaningProfile, ParameterOverrides,
    PressureProfile, ProfileResult, Recommendation, Severity, SuggestedAction, WobProfile,
};

// Re-export the survey loader
pub use survey::{Survey, SurveyError, SurveyStation};
