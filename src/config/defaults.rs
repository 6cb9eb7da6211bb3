//! System-wide default constants.
//!
//! Centralises values that would otherwise be scattered across the
//! loaders, the validator and the CLI. Grouped by subsystem.

// ============================================================================
// Config Loading
// ============================================================================

/// Environment variable holding the path of the profile config file.
pub const CONFIG_ENV_VAR: &str = "WELLPROFILE_CONFIG";

/// Config file looked up in the current working directory.
pub const LOCAL_CONFIG_FILE: &str = "profile_config.toml";

/// Log output format selector (`json` or anything else for plain text).
pub const LOG_FORMAT_ENV_VAR: &str = "WELLPROFILE_LOG_FORMAT";

// ============================================================================
// Domains
// ============================================================================

/// Samples per domain.
pub const DEFAULT_SAMPLES: usize = 100;

/// Upper bound on samples per domain, so a typo cannot allocate gigabytes.
pub const MAX_SAMPLES: usize = 1_000_000;

/// Upper bound on `samples` in an HTTP request body. An `/evaluate` response
/// carries six series, so this keeps one response to a few megabytes.
pub const MAX_HTTP_SAMPLES: usize = 10_000;

/// Inclination domain start (degrees).
pub const DEFAULT_INCLINATION_START_DEG: f64 = 0.0;

/// Inclination domain end (degrees).
pub const DEFAULT_INCLINATION_END_DEG: f64 = 90.0;

// ============================================================================
// HTTP Server
// ============================================================================

/// Default bind address for `wellprofile serve`.
pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:8080";

/// Maximum accepted request body (bytes).
pub const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Per-request timeout (seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Typical Parameter Ranges
// ============================================================================
//
// Values outside these ranges are accepted but produce a validation
// warning. They bound the usual rig operating envelope.

/// Rotary speed (rpm)
pub const RPM_RANGE: (f64, f64) = (0.0, 300.0);

/// Weight on bit (lbf)
pub const WOB_RANGE_LBF: (f64, f64) = (1_000.0, 60_000.0);

/// Pump rate (gpm)
pub const FLOW_RATE_RANGE_GPM: (f64, f64) = (100.0, 1_000.0);

/// Rate of penetration (m/h)
pub const ROP_RANGE_MH: (f64, f64) = (5.0, 100.0);

/// Mud density (ppg)
pub const MUD_DENSITY_RANGE_PPG: (f64, f64) = (8.0, 16.0);

/// Apparent mud viscosity (cP)
pub const MUD_VISCOSITY_RANGE_CP: (f64, f64) = (10.0, 100.0);

// ============================================================================
// Text Report
// ============================================================================

/// Rows printed in a text profile table.
pub const REPORT_TABLE_ROWS: usize = 11;

/// Survey stations printed in a text preview.
pub const SURVEY_PREVIEW_ROWS: usize = 5;
