//! Local extrema detection
//!
//! Samples are compared under the total order of [`precedes`]: lower value
//! first, earlier index on equal values. Under this order no two samples are
//! equal, so minima and maxima strictly alternate along the index axis and the
//! list always starts and ends with a minimum.
//!
//! - Interior sample: Minimum if below both neighbours, Maximum if above both.
//! - Boundary sample: Minimum if below its single neighbour. A boundary sample
//!   above its neighbour is never a merge saddle and is not reported.
//! - Flat runs rise from left to right: a flat valley reports its first sample,
//!   a flat top its last.

use std::cmp::Ordering;

use crate::{Extremum, ExtremumKind};

/// Shortest input for which extrema are reported
pub const MIN_DETECTION_LEN: usize = 3;

/// Total sample order: by value, then by index
#[inline]
pub fn sample_order(samples: &[f64], a: usize, b: usize) -> Ordering {
    samples[a].total_cmp(&samples[b]).then(a.cmp(&b))
}

/// True if sample `a` is strictly lower than sample `b` under [`sample_order`]
#[inline]
pub fn precedes(samples: &[f64], a: usize, b: usize) -> bool {
    sample_order(samples, a, b) == Ordering::Less
}

/// Index of the lowest sample, or `None` for empty input
pub fn lowest_sample(samples: &[f64]) -> Option<usize> {
    (0..samples.len()).min_by(|&a, &b| sample_order(samples, a, b))
}

/// Classify the sample at `index`
#[inline]
pub fn classify(samples: &[f64], index: usize) -> Option<ExtremumKind> {
    let len = samples.len();
    if len < MIN_DETECTION_LEN || index >= len {
        return None;
    }

    if index == 0 {
        return precedes(samples, 0, 1).then_some(ExtremumKind::Minimum);
    }
    if index == len - 1 {
        return precedes(samples, index, index - 1).then_some(ExtremumKind::Minimum);
    }

    let below_left = precedes(samples, index, index - 1);
    let below_right = precedes(samples, index, index + 1);
    match (below_left, below_right) {
        (true, true) => Some(ExtremumKind::Minimum),
        (false, false) => Some(ExtremumKind::Maximum),
        _ => None,
    }
}

/// Scan `samples` once and return the extrema ordered by index
pub fn detect(samples: &[f64]) -> Vec<Extremum> {
    if samples.len() < MIN_DETECTION_LEN {
        return Vec::new();
    }

    (0..samples.len())
        .filter_map(|index| {
            classify(samples, index).map(|kind| Extremum {
                index,
                value: samples[index],
                kind,
            })
        })
        .collect()
}
