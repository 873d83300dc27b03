//! NLCD land-cover class to ASCE 7 surface roughness.

use crate::RoughnessCategory::{self, B, D};
use landcover::LandCoverCode;

/// Land-cover codes with a roughness other than the default `C`,
/// sorted by code.
///
/// | code | NLCD class                   | roughness |
/// |------|------------------------------|-----------|
/// | 11   | Open Water                   | D         |
/// | 12   | Perennial Ice/Snow           | D         |
/// | 21   | Developed, Open Space        | B         |
/// | 22   | Developed, Low Intensity     | B         |
/// | 23   | Developed, Medium Intensity  | B         |
/// | 24   | Developed, High Intensity    | B         |
/// | 41   | Deciduous Forest             | B         |
/// | 42   | Evergreen Forest             | B         |
/// | 43   | Mixed Forest                 | B         |
/// | 90   | Woody Wetlands               | B         |
///
/// Every other class (barren, shrub, grassland, cropland, emergent
/// wetland) and every unrecognized code is open terrain.
pub const ROUGHNESS_TABLE: [(LandCoverCode, RoughnessCategory); 10] = [
    (11, D),
    (12, D),
    (21, B),
    (22, B),
    (23, B),
    (24, B),
    (41, B),
    (42, B),
    (43, B),
    (90, B),
];

/// Roughness assumed for codes missing from [`ROUGHNESS_TABLE`] and
/// for unavailable land cover.
pub const DEFAULT_ROUGHNESS: RoughnessCategory = RoughnessCategory::C;

/// Returns the surface roughness for a land-cover code, or the
/// conservative default when the code is unknown or unavailable.
pub fn classify(code: Option<LandCoverCode>) -> RoughnessCategory {
    code.and_then(|code| {
        ROUGHNESS_TABLE
            .binary_search_by_key(&code, |&(code, _)| code)
            .ok()
            .map(|idx| ROUGHNESS_TABLE[idx].1)
    })
    .unwrap_or(DEFAULT_ROUGHNESS)
}
