use crate::{DirectionResult, RoughnessCategory};

/// Returns the governing exposure across all eight directions.
///
/// The worst approach direction governs: any direction with exposure
/// D makes the site D, otherwise any direction with exposure C makes
/// it C, and only a site sheltered in every direction is B.
pub fn select(directions: &[DirectionResult; 8]) -> RoughnessCategory {
    governing(directions.iter().map(|direction| direction.exposure))
}

/// [`select`] over bare categories.
pub(crate) fn governing<I>(exposures: I) -> RoughnessCategory
where
    I: IntoIterator<Item = RoughnessCategory>,
{
    let mut any_c = false;
    for exposure in exposures {
        match exposure {
            RoughnessCategory::D => return RoughnessCategory::D,
            RoughnessCategory::C => any_c = true,
            RoughnessCategory::B => (),
        }
    }
    if any_c {
        RoughnessCategory::C
    } else {
        RoughnessCategory::B
    }
}

#[cfg(test)]
mod tests {
    use super::governing;
    use crate::RoughnessCategory::{self, B, C, D};

    /// Every combination of eight categories.
    fn all_combinations() -> impl Iterator<Item = [RoughnessCategory; 8]> {
        (0..3_u32.pow(8)).map(|mut n| {
            let mut combo = [B; 8];
            for slot in &mut combo {
                *slot = [B, C, D][(n % 3) as usize];
                n /= 3;
            }
            combo
        })
    }

    #[test]
    fn test_precedence_invariant() {
        for combo in all_combinations() {
            let result = governing(combo);
            assert_eq!(result == D, combo.contains(&D), "{combo:?}");
            assert_eq!(result == B, combo.iter().all(|c| *c == B), "{combo:?}");
            if !combo.contains(&D) && combo.contains(&C) {
                assert_eq!(result, C, "{combo:?}");
            }
        }
    }

    #[test]
    fn test_single_exposed_direction_governs() {
        assert_eq!(governing([B, B, B, B, D, B, B, B]), D);
        assert_eq!(governing([B, B, C, B, B, B, B, B]), C);
        assert_eq!(governing([B; 8]), B);
    }
}
