//! `SymbolEncoder` — assigns each distinct symbol a stable, random k-of-N
//! bit pattern, and decodes a (possibly noisy) pattern back to symbols by
//! weight accumulation.

use crate::bit_pattern::{Bit, BitPattern};
use crate::error::{HdcError, Result};
use crate::persistence::Persistable;
use crate::rng::sample_distinct;
use crate::symbol::Symbol;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Default dimension, per spec.md §6.
pub const DEFAULT_DIMENSION: usize = 2048;
/// Default sparsity, per spec.md §6.
pub const DEFAULT_SPARSITY: f64 = 0.02;
/// Default seed, per spec.md §6.
pub const DEFAULT_SEED: u64 = 123;

/// Assigns each distinct symbol a stable, random `max_nbits`-of-`dimension`
/// bit pattern, and decodes a (possibly noisy) pattern back to a ranked list
/// of symbols by weight accumulation.
#[derive(Debug)]
pub struct SymbolEncoder {
    dimension: usize,
    max_nbits: usize,
    symbols: BTreeMap<Symbol, Vec<Bit>>,
    insertion_order: Vec<Symbol>,
    bits: BTreeMap<Bit, BTreeSet<Symbol>>,
    rng: StdRng,
}

impl SymbolEncoder {
    /// `max_nbits = max(1, floor(sparsity * dimension))`.
    pub fn new(dimension: usize, sparsity: f64, seed: u64) -> Result<Self> {
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
        let max_nbits = ((sparsity * dimension as f64).floor() as usize).max(1);
        Ok(SymbolEncoder {
            dimension,
            max_nbits,
            symbols: BTreeMap::new(),
            insertion_order: Vec::new(),
            bits: BTreeMap::new(),
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn max_nbits(&self) -> usize {
        self.max_nbits
    }

    /// Encode `symbol`. If already known, returns the stored pattern
    /// unchanged; otherwise draws a fresh sample of `max_nbits` distinct bits
    /// from `population` (or `[0, dimension)` by default) and stores it.
    pub fn encode(
        &mut self,
        symbol: impl Into<Symbol>,
        population: Option<&BitPattern>,
    ) -> Result<BitPattern> {
        let symbol = symbol.into();

        if !self.symbols.contains_key(&symbol) {
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
            tracing::debug!(symbol = %symbol, "registering new symbol");

            let chosen = sample_distinct(&mut self.rng, &pool, self.max_nbits);
            for &bit in &chosen {
                self.bits.entry(bit).or_default().insert(symbol.clone());
            }
            self.insertion_order.push(symbol.clone());
            self.symbols.insert(symbol.clone(), chosen);
        }

        let bits = &self.symbols[&symbol];
        Ok(BitPattern::from_bits(bits.iter().copied()))
    }

    /// Decode a bit pattern back to a ranked list of `(symbol, weight)`,
    /// sorted by weight descending, ties broken by first-seen order during
    /// this decode. Bits never observed by this encoder contribute nothing.
    pub fn decode(&self, pattern: &BitPattern) -> Vec<(Symbol, f64)> {
        let mut order: Vec<Symbol> = Vec::new();
        let mut weight: BTreeMap<Symbol, f64> = BTreeMap::new();

        for (bit, w) in pattern.iter() {
            let Some(syms) = self.bits.get(bit) else {
                continue;
            };
            for sym in syms {
                let entry = weight.entry(sym.clone()).or_insert_with(|| {
                    order.push(sym.clone());
                    0.0
                });
                *entry += w;
            }
        }

        let mut result: Vec<(Symbol, f64)> = order
            .into_iter()
            .map(|s| {
                let w = weight[&s];
                (s, w)
            })
            .collect();
        result.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
        result
    }

    /// Symbols known to this encoder, in the order they were first encoded.
    pub fn symbols(&self) -> &[Symbol] {
        &self.insertion_order
    }
}

/// Serialized state for `SymbolEncoder`, per the persistence port contract
/// (spec.md §4.E).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolEncoderState {
    pub dimension: usize,
    pub max_nbits: usize,
    pub symbols: Vec<(Symbol, Vec<Bit>)>,
}

impl SymbolEncoder {
    /// Capture state for an external store. Does not include RNG state;
    /// `restore` re-seeds deterministically instead.
    pub fn serialize(&self) -> SymbolEncoderState {
        SymbolEncoderState {
            dimension: self.dimension,
            max_nbits: self.max_nbits,
            symbols: self
                .insertion_order
                .iter()
                .map(|s| (s.clone(), self.symbols[s].clone()))
                .collect(),
        }
    }

    /// Reconstruct an encoder from previously serialized state, rebuilding
    /// the reverse index purely from the forward map. The PRNG is re-seeded
    /// from `seed` regardless of what generated the original state, mirroring
    /// the Python reference (which calls `random.seed(seed)` unconditionally
    /// whether or not `restore` ran).
    pub fn restore(state: SymbolEncoderState, seed: u64) -> Self {
        let mut symbols = BTreeMap::new();
        let mut bits: BTreeMap<Bit, BTreeSet<Symbol>> = BTreeMap::new();
        let mut insertion_order = Vec::with_capacity(state.symbols.len());

        for (symbol, symbol_bits) in state.symbols {
            for &bit in &symbol_bits {
                bits.entry(bit).or_default().insert(symbol.clone());
            }
            insertion_order.push(symbol.clone());
            symbols.insert(symbol, symbol_bits);
        }

        SymbolEncoder {
            dimension: state.dimension,
            max_nbits: state.max_nbits,
            symbols,
            insertion_order,
            bits,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Persistable for SymbolEncoder {
    type State = SymbolEncoderState;

    fn serialize(&self) -> SymbolEncoderState {
        SymbolEncoder::serialize(self)
    }

    fn restore(state: SymbolEncoderState, seed: u64) -> Self {
        SymbolEncoder::restore(state, seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> SymbolEncoder {
        SymbolEncoder::new(2048, 0.02, 123).unwrap()
    }

    #[test]
    fn encode_is_sparse_and_in_range() {
        let mut enc = encoder();
        let p = enc.encode("hello", None).unwrap();
        assert_eq!(p.len(), 40);
        assert!(p.keys().all(|&b| b < 2048));
    }

    #[test]
    fn encode_is_consistent() {
        let mut enc = encoder();
        let p1 = enc.encode("hello", None).unwrap();
        let p2 = enc.encode("hello", None).unwrap();
        let b1: BTreeSet<_> = p1.keys().collect();
        let b2: BTreeSet<_> = p2.keys().collect();
        assert_eq!(b1, b2);
    }

    #[test]
    fn decode_recovers_top_symbol() {
        let mut enc = encoder();
        let p = enc.encode("hello", None).unwrap();
        let decoded = enc.decode(&p);
        assert_eq!(decoded[0].0, Symbol::from("hello"));
        assert_eq!(decoded[0].1, 40.0);
    }

    #[test]
    fn decode_noisy_pattern_ranks_dominant_symbol_first() {
        let mut enc = encoder();
        let hello = enc.encode("hello", None).unwrap();
        let goodbye = enc.encode("goodbye", None).unwrap();

        let hello_bits: Vec<Bit> = hello.keys().copied().take(30).collect();
        let goodbye_bits: Vec<Bit> = goodbye.keys().copied().take(10).collect();

        let mut noisy = BitPattern::new();
        for b in hello_bits {
            noisy.set(b, 1.0);
        }
        for b in goodbye_bits {
            noisy.set(b, 1.0);
        }

        let decoded = enc.decode(&noisy);
        assert!(decoded.len() >= 2);
        assert_eq!(decoded[0].0, Symbol::from("hello"));
        assert_eq!(decoded[1].0, Symbol::from("goodbye"));
    }

    #[test]
    fn population_too_small_is_rejected() {
        let mut enc = encoder();
        let mut tiny_population = BitPattern::new();
        tiny_population.set(1, 1.0);
        let err = enc.encode("hello", Some(&tiny_population)).unwrap_err();
        assert!(matches!(err, HdcError::PopulationTooSmall { .. }));
    }

    #[test]
    fn restore_round_trips_bits() {
        let mut enc = encoder();
        let before = enc.encode("hello", None).unwrap();
        let state = enc.serialize();
        let restored = SymbolEncoder::restore(state, 123);
        let decoded = restored.decode(&before);
        assert_eq!(decoded[0].0, Symbol::from("hello"));
    }
}
