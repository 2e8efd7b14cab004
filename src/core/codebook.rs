//! The ordered quantized-level codebook at the heart of `NumericEncoder`.
//!
//! Quantized levels are tracked internally as signed step counts (`tick =
//! round(value / q_step)`) rather than raw `f64` keys, giving the codebook a
//! well-behaved `Eq + Hash + Ord` key free of float-equality pitfalls; the
//! public `NumericEncoder` API still speaks in `f64` (see DESIGN.md).

use crate::bit_pattern::Bit;
use crate::error::{HdcError, Result};
use crate::rng::choose_excluding;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Internal codebook: quantized level (tick) -> ordered codeword, plus the
/// reverse index, plus the rolling extension state described in spec.md §3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct QuantizedCodebook {
    max_nbits: usize,
    q_value: BTreeMap<i64, Vec<Bit>>,
    bits: BTreeMap<Bit, Vec<i64>>,
    lower_tick: Option<i64>,
    upper_tick: Option<i64>,
    lower_bit_index: usize,
    upper_bit_index: usize,
}

impl QuantizedCodebook {
    pub(crate) fn new(max_nbits: usize) -> Self {
        QuantizedCodebook {
            max_nbits,
            q_value: BTreeMap::new(),
            bits: BTreeMap::new(),
            lower_tick: None,
            upper_tick: None,
            lower_bit_index: max_nbits - 1,
            upper_bit_index: 0,
        }
    }

    pub(crate) fn codeword(&self, tick: i64) -> Option<&[Bit]> {
        self.q_value.get(&tick).map(|v| v.as_slice())
    }

    pub(crate) fn levels_for_bit(&self, bit: Bit) -> &[i64] {
        self.bits.get(&bit).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub(crate) fn lower_tick(&self) -> Option<i64> {
        self.lower_tick
    }

    pub(crate) fn upper_tick(&self) -> Option<i64> {
        self.upper_tick
    }

    pub(crate) fn lower_bit_index(&self) -> usize {
        self.lower_bit_index
    }

    pub(crate) fn upper_bit_index(&self) -> usize {
        self.upper_bit_index
    }

    pub(crate) fn known_ticks(&self) -> impl Iterator<Item = &i64> {
        self.q_value.keys()
    }

    /// Whether both `lo` and `hi` already have codewords. The codebook is
    /// always contiguous between `lower_tick` and `upper_tick`, so this
    /// implies every tick in `[lo, hi]` is already covered too.
    pub(crate) fn covers(&self, lo: i64, hi: i64) -> bool {
        self.q_value.contains_key(&lo) && self.q_value.contains_key(&hi)
    }

    fn record_reverse_index(&mut self, tick: i64, codeword: &[Bit]) {
        for &bit in codeword {
            self.bits.entry(bit).or_default().push(tick);
        }
    }

    /// Install a level directly (used by `restore`), rebuilding the reverse
    /// index for it as a side effect.
    pub(crate) fn install_level(&mut self, tick: i64, codeword: Vec<Bit>) {
        self.record_reverse_index(tick, &codeword);
        self.q_value.insert(tick, codeword);
    }

    /// Restore the rolling extension state after bulk-loading levels via
    /// `install_level` (spec.md §4.E: serialization captures `lower_*`/
    /// `upper_*` alongside the forward map).
    pub(crate) fn set_bounds(
        &mut self,
        lower_tick: Option<i64>,
        upper_tick: Option<i64>,
        lower_bit_index: usize,
        upper_bit_index: usize,
    ) {
        self.lower_tick = lower_tick;
        self.upper_tick = upper_tick;
        self.lower_bit_index = lower_bit_index;
        self.upper_bit_index = upper_bit_index;
    }

    /// Ensure the codebook contains every tick in `[tick - window, tick +
    /// window]`, extending upward/downward as needed (spec.md §4.C).
    /// All-or-nothing: on `PopulationExhausted`, no partial mutation is
    /// retained (we only commit after the whole requested range has been
    /// computed).
    pub(crate) fn ensure_range(
        &mut self,
        tick: i64,
        window: i64,
        pool: &[Bit],
        rng: &mut StdRng,
    ) -> Result<()> {
        let lo = tick - window;
        let hi = tick + window;

        if self.covers(lo, hi) {
            return Ok(());
        }

        // Stage new levels in a scratch buffer first so a PopulationExhausted
        // failure midway through never leaves the committed codebook
        // partially extended.
        let mut new_upper: Vec<(i64, Vec<Bit>)> = Vec::new();
        let mut new_lower: Vec<(i64, Vec<Bit>)> = Vec::new();
        let mut upper_bit_index = self.upper_bit_index;
        let mut lower_bit_index = self.lower_bit_index;

        if self.upper_tick.is_none() {
            // Cold start: draw a fresh codeword for `lo`, unmutated, then
            // extend upward through `hi`.
            let start_codeword = crate::rng::sample_distinct(rng, pool, self.max_nbits);
            new_upper.push((lo, start_codeword.clone()));

            let mut prev = start_codeword;
            let mut curr = lo + 1;
            while curr <= hi {
                let mut next = prev.clone();
                let exclude: HashSet<Bit> = next.iter().copied().collect();
                let replacement = choose_excluding(rng, pool, &exclude)
                    .ok_or(HdcError::PopulationExhausted)?;
                next[upper_bit_index] = replacement;
                upper_bit_index = (upper_bit_index + 1) % self.max_nbits;

                new_upper.push((curr, next.clone()));
                prev = next;
                curr += 1;
            }
        } else {
            let upper_tick = self.upper_tick.unwrap();
            let lower_tick = self.lower_tick.unwrap();

            if hi > upper_tick {
                let mut prev = self.q_value[&upper_tick].clone();
                let mut curr = upper_tick + 1;
                while curr <= hi {
                    let mut next = prev.clone();
                    let exclude: HashSet<Bit> = next.iter().copied().collect();
                    let replacement = choose_excluding(rng, pool, &exclude)
                        .ok_or(HdcError::PopulationExhausted)?;
                    next[upper_bit_index] = replacement;
                    upper_bit_index = (upper_bit_index + 1) % self.max_nbits;

                    new_upper.push((curr, next.clone()));
                    prev = next;
                    curr += 1;
                }
            }

            if lo < lower_tick {
                let mut prev = self.q_value[&lower_tick].clone();
                let mut curr = lower_tick - 1;
                while curr >= lo {
                    let mut next = prev.clone();
                    let exclude: HashSet<Bit> = next.iter().copied().collect();
                    let replacement = choose_excluding(rng, pool, &exclude)
                        .ok_or(HdcError::PopulationExhausted)?;
                    next[lower_bit_index] = replacement;
                    lower_bit_index = if lower_bit_index == 0 {
                        self.max_nbits - 1
                    } else {
                        lower_bit_index - 1
                    };

                    new_lower.push((curr, next.clone()));
                    prev = next;
                    curr -= 1;
                }
            }
        }

        // Commit.
        for (t, cw) in &new_upper {
            self.q_value.insert(*t, cw.clone());
            self.record_reverse_index(*t, cw);
            self.upper_tick = Some(self.upper_tick.map_or(*t, |u| u.max(*t)));
        }
        for (t, cw) in &new_lower {
            self.q_value.insert(*t, cw.clone());
            self.record_reverse_index(*t, cw);
            self.lower_tick = Some(self.lower_tick.map_or(*t, |l| l.min(*t)));
        }
        if self.lower_tick.is_none() {
            self.lower_tick = Some(lo);
        }
        if self.upper_tick.is_none() {
            self.upper_tick = Some(hi);
        }
        self.upper_bit_index = upper_bit_index;
        self.lower_bit_index = lower_bit_index;

        Ok(())
    }
}
