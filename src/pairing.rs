//! Persistence pairing by region merging
//!
//! Extrema are swept from the lowest sample upwards. Every minimum opens a
//! region. Every maximum is a saddle between the two minima next to it in the
//! extrema list, both of which were already swept: the two regions merge, the
//! deeper minimum keeps representing the union and the shallower one is paired
//! with the maximum. After the sweep a single region is left and its minimum is
//! the global minimum.

use crate::extrema::{precedes, sample_order};
use crate::regions::{RegionArena, RegionId};
use crate::{Extremum, ExtremumKind, GlobalMinimum, PairedExtrema};

/// Output of one pairing sweep
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pairing {
    /// Pairs in persistence order, see [`sort_pairs`]
    pub pairs: Vec<PairedExtrema>,
    pub global_minimum: Option<GlobalMinimum>,
}

/// Pair the `extrema` of `samples`.
///
/// `extrema` must be the index-ordered output of [`crate::extrema::detect`]
/// for the same samples. An empty list pairs nothing and yields no global
/// minimum; callers handle short inputs themselves.
pub fn pair_extrema(samples: &[f64], extrema: &[Extremum]) -> Pairing {
    if extrema.is_empty() {
        return Pairing::default();
    }

    // Sweep order: positions into `extrema`, lowest sample first
    let mut order: Vec<usize> = (0..extrema.len()).collect();
    order.sort_unstable_by(|&a, &b| sample_order(samples, extrema[a].index, extrema[b].index));

    let mut arena = RegionArena::with_capacity(extrema.len().div_ceil(2));
    let mut region_of: Vec<Option<RegionId>> = vec![None; extrema.len()];
    let mut pairs = Vec::with_capacity(extrema.len() / 2);

    for position in order {
        let saddle = extrema[position];
        match saddle.kind {
            ExtremumKind::Minimum => {
                region_of[position] = Some(arena.open(saddle.index));
            }
            ExtremumKind::Maximum => {
                // `detect` never reports a boundary maximum and alternates
                // kinds, so both neighbours are lower minima already swept
                let neighbours = position
                    .checked_sub(1)
                    .and_then(|left| region_of[left])
                    .zip(region_of.get(position + 1).copied().flatten());
                debug_assert!(
                    neighbours.is_some(),
                    "maximum {} without two swept neighbours",
                    saddle.index
                );
                let Some((left, right)) = neighbours else {
                    continue;
                };

                let left_min = arena.representative(left);
                let right_min = arena.representative(right);
                let (survivor, destroyed) = if precedes(samples, left_min, right_min) {
                    (left_min, right_min)
                } else {
                    (right_min, left_min)
                };

                pairs.push(PairedExtrema {
                    min_index: destroyed,
                    max_index: saddle.index,
                    persistence: (saddle.value - samples[destroyed]).abs(),
                });
                let root = arena.union(left, right, survivor);
                region_of[position] = Some(root);
            }
        }
    }

    let global_minimum = region_of
        .iter()
        .flatten()
        .next()
        .map(|&region| arena.representative(region))
        .map(|index| GlobalMinimum {
            index,
            value: samples[index],
        });

    debug_assert_eq!(arena.live_regions(), 1);
    sort_pairs(&mut pairs);

    Pairing {
        pairs,
        global_minimum,
    }
}

/// Most persistent first; equal persistence by ascending minimum index
pub fn sort_pairs(pairs: &mut [PairedExtrema]) {
    pairs.sort_by(|a, b| {
        b.persistence
            .total_cmp(&a.persistence)
            .then(a.min_index.cmp(&b.min_index))
    });
}

/// True if `pairs` is in the order produced by [`sort_pairs`]
pub fn is_sorted(pairs: &[PairedExtrema]) -> bool {
    pairs.windows(2).all(|w| {
        w[0].persistence
            .total_cmp(&w[1].persistence)
            .then(w[1].min_index.cmp(&w[0].min_index))
            .is_ge()
    })
}
