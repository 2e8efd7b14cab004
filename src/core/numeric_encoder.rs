//! `NumericEncoder` — the order-preserving incremental codebook: lazily
//! extends a codebook of quantized levels so that numerically close values
//! share a controlled fraction of bits, while distant values share
//! effectively none, under a strict sparsity budget.

use crate::bit_pattern::{Bit, BitPattern};
use crate::core::codebook::QuantizedCodebook;
use crate::error::{HdcError, Result};
use crate::persistence::Persistable;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default quantization step, per spec.md §6.
pub const DEFAULT_Q_STEP: f64 = 1.0;

/// Incrementally extends an ordered codebook of quantized levels with a
/// sliding-window overlap; decodes to a distribution over known levels.
#[derive(Debug)]
pub struct NumericEncoder {
    dimension: usize,
    max_nbits: usize,
    q_step: f64,
    codebook: QuantizedCodebook,
    rng: StdRng,
}

fn quantize_tick(value: f64, q_step: f64) -> i64 {
    (value / q_step).floor() as i64
}

fn tick_to_value(tick: i64, q_step: f64) -> f64 {
    tick as f64 * q_step
}

impl NumericEncoder {
    pub fn new(dimension: usize, sparsity: f64, q_step: f64, seed: u64) -> Result<Self> {
        if dimension == 0 {
            return Err(HdcError::InvalidParameter(
                "dimension must be positive".into(),
            ));
        }
        if !(sparsity > 0.0 && sparsity <= 1.0) {
            return Err(HdcError::InvalidParameter(
                "sparsity must be in (0, 1]".into(),
            ));
        }
        if !(q_step > 0.0) {
            return Err(HdcError::InvalidParameter(
                "q_step must be positive".into(),
            ));
        }
        let max_nbits = ((sparsity * dimension as f64).floor() as usize).max(1);
        Ok(NumericEncoder {
            dimension,
            max_nbits,
            q_step,
            codebook: QuantizedCodebook::new(max_nbits),
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn max_nbits(&self) -> usize {
        self.max_nbits
    }

    pub fn q_step(&self) -> f64 {
        self.q_step
    }

    /// Encode `value`, extending the codebook as needed so that any value
    /// within `q_step * (max_nbits - 1)` of `value` shares at least one bit
    /// with it (spec.md §4.C).
    ///
    /// `population`, like the Python reference, only matters when the
    /// codebook actually needs to grow to cover `value`: re-encoding an
    /// already-known value returns its stored codeword unconditionally, even
    /// if `population` is absent or too small to extend with (spec.md §4.C,
    /// Invariant 5).
    pub fn encode(&mut self, value: f64, population: Option<&BitPattern>) -> Result<BitPattern> {
        let tick = quantize_tick(value, self.q_step);
        let window = (self.max_nbits - 1) as i64;

        if !self.codebook.covers(tick - window, tick + window) {
            let pool: Vec<Bit> = match population {
                Some(p) => p.keys().copied().collect(),
                None => (0..self.dimension as Bit).collect(),
            };
            if pool.len() < self.max_nbits {
                return Err(HdcError::PopulationTooSmall {
                    available: pool.len(),
                    required: self.max_nbits,
                });
            }

            #[cfg(feature = "logging")]
            tracing::trace!(tick, window, "extending numeric codebook");

            self.codebook
                .ensure_range(tick, window, &pool, &mut self.rng)?;
        }

        let codeword = self
            .codebook
            .codeword(tick)
            .expect("covers()/ensure_range guarantee this tick is present");
        Ok(BitPattern::from_bits(codeword.iter().copied()))
    }

    /// Decode a bit pattern to `(best_value, best_weight, distribution)`,
    /// where `distribution` is sorted ascending by quantized value.
    pub fn decode(&self, pattern: &BitPattern) -> (Option<f64>, f64, Vec<(f64, f64)>) {
        let mut weights: BTreeMap<i64, f64> = BTreeMap::new();
        let mut best_tick: Option<i64> = None;
        let mut best_weight = 0.0;

        for (&bit, &w) in pattern.iter() {
            for &tick in self.codebook.levels_for_bit(bit) {
                let entry = weights.entry(tick).or_insert(0.0);
                *entry += w;
                if *entry > best_weight {
                    best_weight = *entry;
                    best_tick = Some(tick);
                }
            }
        }

        let distribution = weights
            .into_iter()
            .map(|(t, w)| (tick_to_value(t, self.q_step), w))
            .collect();

        (best_tick.map(|t| tick_to_value(t, self.q_step)), best_weight, distribution)
    }

    /// Quantized levels known to this encoder, ascending.
    pub fn quantised_values(&self) -> Vec<f64> {
        self.codebook
            .known_ticks()
            .map(|&t| tick_to_value(t, self.q_step))
            .collect()
    }
}

/// Serialized state for `NumericEncoder`, per the persistence port contract
/// (spec.md §4.E).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericEncoderState {
    pub dimension: usize,
    pub max_nbits: usize,
    pub q_step: f64,
    pub lower_q_value: Option<f64>,
    pub upper_q_value: Option<f64>,
    pub lower_bit_index: usize,
    pub upper_bit_index: usize,
    pub q_value: Vec<(f64, Vec<Bit>)>,
}

impl NumericEncoder {
    pub fn serialize(&self) -> NumericEncoderState {
        NumericEncoderState {
            dimension: self.dimension,
            max_nbits: self.max_nbits,
            q_step: self.q_step,
            lower_q_value: self.codebook.lower_tick().map(|t| tick_to_value(t, self.q_step)),
            upper_q_value: self.codebook.upper_tick().map(|t| tick_to_value(t, self.q_step)),
            lower_bit_index: self.codebook.lower_bit_index(),
            upper_bit_index: self.codebook.upper_bit_index(),
            q_value: self
                .codebook
                .known_ticks()
                .map(|&t| {
                    (
                        tick_to_value(t, self.q_step),
                        self.codebook.codeword(t).unwrap().to_vec(),
                    )
                })
                .collect(),
        }
    }

    /// Reconstruct an encoder from previously serialized state, rebuilding
    /// the reverse index purely from the forward map.
    pub fn restore(state: NumericEncoderState, seed: u64) -> Self {
        let mut codebook = QuantizedCodebook::new(state.max_nbits);
        for (value, codeword) in &state.q_value {
            let tick = quantize_tick(*value, state.q_step);
            codebook.install_level(tick, codeword.clone());
        }
        codebook.set_bounds(
            state.lower_q_value.map(|v| quantize_tick(v, state.q_step)),
            state.upper_q_value.map(|v| quantize_tick(v, state.q_step)),
            state.lower_bit_index,
            state.upper_bit_index,
        );

        NumericEncoder {
            dimension: state.dimension,
            max_nbits: state.max_nbits,
            q_step: state.q_step,
            codebook,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Persistable for NumericEncoder {
    type State = NumericEncoderState;

    fn serialize(&self) -> NumericEncoderState {
        NumericEncoder::serialize(self)
    }

    fn restore(state: NumericEncoderState, seed: u64) -> Self {
        NumericEncoder::restore(state, seed)
    }
}
