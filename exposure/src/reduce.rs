//! Reduces one direction's samples to a single exposure category.

use crate::{
    classify::DEFAULT_ROUGHNESS,
    constants::{
        FETCH_HEIGHT_FACTOR, FETCH_TOLERANCE_FT, METERS_PER_FOOT, MIN_FETCH_B_FT, MIN_FETCH_D_FT,
    },
    sample::{fetch_distance_ft, DirectionSample},
    RoughnessCategory,
};

/// Strategy for reducing a direction's samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Reducer {
    /// A roughness category governs only if it persists over its
    /// required upwind distance (ASCE 7 §26.7.3).
    #[default]
    Threshold,

    /// The most frequent sample category governs, ties going to the
    /// category seen first. Ignores distances entirely.
    Majority,
}

impl Reducer {
    /// Returns the exposure category for `samples`, which must be
    /// ordered nearest first.
    ///
    /// No samples means no evidence, which yields the default
    /// category.
    pub fn reduce(self, samples: &[DirectionSample], height_ft: f64) -> RoughnessCategory {
        if samples.is_empty() {
            return DEFAULT_ROUGHNESS;
        }
        match self {
            Reducer::Threshold => FetchTally::new(samples, height_ft).category(),
            Reducer::Majority => {
                majority(samples.iter().map(|s| s.roughness)).unwrap_or(DEFAULT_ROUGHNESS)
            }
        }
    }
}

/// Upwind distance, in feet, over which roughness B must prevail.
pub fn required_b_ft(height_ft: f64) -> f64 {
    (FETCH_HEIGHT_FACTOR * height_ft).max(MIN_FETCH_B_FT)
}

/// Upwind distance, in feet, over which roughness D must prevail.
pub fn required_d_ft(height_ft: f64) -> f64 {
    (FETCH_HEIGHT_FACTOR * height_ft).max(MIN_FETCH_D_FT)
}

/// Cumulative upwind length attributed to roughness B and D along one
/// direction.
///
/// Each sample stands for the span between it and the previous sample
/// (or the site). The farthest sample also stands for the partial step
/// left between it and the end of the fetch (at most one more span),
/// so a direction uniformly covered by one class accumulates the full
/// fetch distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchTally {
    pub b_ft: f64,
    pub d_ft: f64,
    pub required_b_ft: f64,
    pub required_d_ft: f64,
}

impl FetchTally {
    pub fn new(samples: &[DirectionSample], height_ft: f64) -> Self {
        let fetch_ft = fetch_distance_ft(height_ft);
        let mut b_ft = 0.0;
        let mut d_ft = 0.0;
        let mut prev_m = 0.0;
        for (idx, sample) in samples.iter().enumerate() {
            let mut span_ft = (sample.distance_m - prev_m).max(0.0) / METERS_PER_FOOT;
            prev_m = sample.distance_m;
            if idx + 1 == samples.len() {
                let tail_ft = fetch_ft - sample.distance_m / METERS_PER_FOOT;
                span_ft += tail_ft.clamp(0.0, span_ft);
            }
            match sample.roughness {
                RoughnessCategory::B => b_ft += span_ft,
                RoughnessCategory::D => d_ft += span_ft,
                RoughnessCategory::C => (),
            }
        }
        Self {
            b_ft,
            d_ft,
            required_b_ft: required_b_ft(height_ft),
            required_d_ft: required_d_ft(height_ft),
        }
    }

    pub fn meets_d(&self) -> bool {
        self.d_ft + FETCH_TOLERANCE_FT >= self.required_d_ft
    }

    pub fn meets_b(&self) -> bool {
        self.b_ft + FETCH_TOLERANCE_FT >= self.required_b_ft
    }

    pub fn category(&self) -> RoughnessCategory {
        if self.meets_d() {
            RoughnessCategory::D
        } else if self.meets_b() {
            RoughnessCategory::B
        } else {
            RoughnessCategory::C
        }
    }
}

/// Returns the most frequent item, ties going to whichever was seen
/// first, or `None` for an empty iterator.
pub fn majority<T, I>(items: I) -> Option<T>
where
    T: Copy + PartialEq,
    I: IntoIterator<Item = T>,
{
    // First-seen order; there are only ever a handful of distinct items.
    let mut counts: Vec<(T, usize)> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|(seen, _)| *seen == item) {
            Some((_, n)) => *n += 1,
            None => counts.push((item, 1)),
        }
    }
    let mut best: Option<(T, usize)> = None;
    for (item, n) in counts {
        if best.map_or(true, |(_, best_n)| n > best_n) {
            best = Some((item, n));
        }
    }
    best.map(|(item, _)| item)
}
