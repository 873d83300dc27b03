/// Meters per degree of latitude used by the flat-earth projector.
pub const METERS_PER_DEG_LAT: f64 = 111_000.0;

/// Meters per international foot.
pub const METERS_PER_FOOT: f64 = 0.3048;

/// Native resolution of NLCD land-cover rasters (meters).
pub const DEFAULT_STEP_M: f64 = 30.0;

/// Minimum upwind distance, in feet, over which surface roughness D
/// must prevail for exposure D.
pub const MIN_FETCH_D_FT: f64 = 5000.0;

/// Minimum upwind distance, in feet, over which surface roughness B
/// must prevail for exposure B.
pub const MIN_FETCH_B_FT: f64 = 2600.0;

/// Upwind fetch as a multiple of building height.
pub const FETCH_HEIGHT_FACTOR: f64 = 20.0;

/// Tallest building height accepted (feet), a little above the tallest
/// building standing. Caps the fetch at 60 000 ft.
pub const MAX_HEIGHT_FT: f64 = 3000.0;

/// Most samples taken along one bearing. Bounds memory for very fine
/// step sizes.
pub const MAX_STEPS: usize = 100_000;

/// Slack when comparing accumulated fetch lengths against their
/// requirement, absorbing rounding in the foot/meter conversions.
pub const FETCH_TOLERANCE_FT: f64 = 1e-6;

/// Sections of ASCE 7 the classification applies.
pub const REFERENCES: [&str; 2] = [
    "ASCE 7-16 §26.7.2 Surface Roughness Categories",
    "ASCE 7-16 §26.7.3 Exposure Categories",
];
