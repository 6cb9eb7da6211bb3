//! Profile Configuration Module
//!
//! Model constants, domain settings, default drilling parameters and server
//! settings, loaded from a TOML file.
//!
//! ## Loading Order
//!
//! 1. `--config <PATH>` on the command line (errors are fatal)
//! 2. `WELLPROFILE_CONFIG` environment variable (path to TOML file)
//! 3. `profile_config.toml` in the current working directory
//! 4. Built-in defaults
//!
//! ## Usage
//!
//! There is no global instance. Load once and pass the value down:
//!
//! ```ignore
//! let config = ProfileConfig::load();
//! let model = ProfileModel::from_config(&config);
//! let result = model.evaluate(&config.parameters);
//! ```

mod profile_config;
pub mod defaults;
pub mod validation;

pub use profile_config::*;
