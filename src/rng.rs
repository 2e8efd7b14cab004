//! Seeded sampling helpers shared by both encoders.
//!
//! Each encoder owns exactly one `StdRng` and draws every random bit through
//! it, so that determinism holds under a fixed seed and a fixed encode
//! order (spec.md §5, §9).

use crate::bit_pattern::Bit;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::HashSet;

/// Draw `k` distinct bits uniformly from `pool` without replacement.
///
/// `pool` need not be sorted or deduplicated by the caller's population; it
/// is treated as a plain index space here, since the caller only ever
/// passes already-deduplicated slices.
pub(crate) fn sample_distinct(rng: &mut StdRng, pool: &[Bit], k: usize) -> Vec<Bit> {
    rand::seq::index::sample(rng, pool.len(), k)
        .into_iter()
        .map(|i| pool[i])
        .collect()
}

/// Draw one uniformly chosen bit from `pool \ exclude`, or `None` if that
/// difference is empty.
pub(crate) fn choose_excluding(
    rng: &mut StdRng,
    pool: &[Bit],
    exclude: &HashSet<Bit>,
) -> Option<Bit> {
    let candidates: Vec<Bit> = pool.iter().copied().filter(|b| !exclude.contains(b)).collect();
    if candidates.is_empty() {
        None
    } else {
        let idx = rng.gen_range(0..candidates.len());
        Some(candidates[idx])
    }
}
