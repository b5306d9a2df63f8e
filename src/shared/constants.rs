/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// REPORT CONSTANTS
// =============================================================================

/// Lowest report priority (minimal)
pub const MIN_PRIORITY: u8 = 1;

/// Highest report priority (critical)
pub const MAX_PRIORITY: u8 = 5;

/// Reports at or above this priority count as urgent
pub const URGENT_PRIORITY: u8 = 4;

/// Prefix of generated report identifiers (CR-YYYY-NNN)
pub const REPORT_ID_PREFIX: &str = "CR";

/// Earth's radius in meters (for Haversine formula)
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
