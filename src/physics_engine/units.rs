//! Unit conversions used by the profile models.
//!
//! Only the multiplicative factors the models need. Not a unit system.

/// Gallons per minute to cubic feet per second
pub const GPM_TO_FT3_PER_SEC: f64 = 0.002228;

/// Metres per hour to feet per hour
pub const MH_TO_FTHR: f64 = 3.28084;

/// Metres to feet
pub const M_TO_FT: f64 = 3.28084;

/// Convert a pump rate from gpm to ft³/s.
pub fn gpm_to_ft3_per_sec(gpm: f64) -> f64 {
    gpm * GPM_TO_FT3_PER_SEC
}

/// Convert a rate of penetration from m/h to ft/h.
pub fn mh_to_fthr(rop_mh: f64) -> f64 {
    rop_mh * MH_TO_FTHR
}

pub fn metres_to_feet(m: f64) -> f64 {
    m * M_TO_FT
}
