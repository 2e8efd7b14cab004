//! Weighted sparse bit patterns — the shared currency between encoders and
//! the ESDR memory.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map::Iter;

/// A single bit identifier in `[0, dimension)`, before any field-tagging by
/// `Esdr::bundle`.
pub type Bit = u32;

/// A bit key after bundling: either a raw bit, or a bit tagged with the
/// field/source label it was merged under. Keeping these as distinct variants
/// (rather than collapsing both into `Bit`) means a caller can never
/// accidentally compare a labeled bit against a raw one of the same numeric
/// value.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BitKey {
    Raw(Bit),
    Labeled(String, Bit),
}

impl From<Bit> for BitKey {
    fn from(bit: Bit) -> Self {
        BitKey::Raw(bit)
    }
}

/// A finite mapping from a bit identifier to a non-negative, finite real
/// weight. Bits absent from the mapping are implicitly weight `0.0`.
///
/// Generic over the key type so the same implementation serves both
/// pre-bundle (`Pattern<Bit>`) and post-bundle (`Pattern<BitKey>`)
/// representations without blending them. Backed by a `BTreeMap` rather than
/// a `HashMap` so that iteration (and therefore decode's tie-breaking) is
/// deterministic across runs, not just across identical seeds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pattern<K: Ord + Clone> {
    weights: BTreeMap<K, f64>,
}

/// The pattern produced by `SymbolEncoder`/`NumericEncoder`: keys are raw
/// bits, weights default to `1.0`.
pub type BitPattern = Pattern<Bit>;

impl<K: Ord + Clone> Default for Pattern<K> {
    fn default() -> Self {
        Pattern {
            weights: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone> Pattern<K> {
    /// An empty pattern.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pattern from bits, all at weight `1.0`.
    pub fn from_bits(bits: impl IntoIterator<Item = K>) -> Self {
        let weights = bits.into_iter().map(|b| (b, 1.0)).collect();
        Pattern { weights }
    }

    /// The weight of `key`, or `0.0` if absent.
    pub fn get(&self, key: &K) -> f64 {
        self.weights.get(key).copied().unwrap_or(0.0)
    }

    /// Set the weight of `key`. A weight of exactly `0.0` still leaves the
    /// key present (callers wanting to remove a bit should not rely on this).
    pub fn set(&mut self, key: K, weight: f64) {
        self.weights.insert(key, weight);
    }

    /// Remove a key entirely.
    pub fn remove(&mut self, key: &K) -> Option<f64> {
        self.weights.remove(key)
    }

    /// Number of active (present) keys.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// The keys present in this pattern, in ascending key order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.weights.keys()
    }

    pub fn iter(&self) -> Iter<'_, K, f64> {
        self.weights.iter()
    }

    /// `Σ weights` over all present keys.
    pub fn sum_of_weights(&self) -> f64 {
        self.weights.values().sum()
    }

    /// `Σ_{k ∈ keys(a) ∩ keys(b)} min(a[k], b[k])`.
    pub fn weighted_intersection(&self, other: &Pattern<K>) -> f64 {
        let (small, large) = if self.weights.len() <= other.weights.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .weights
            .iter()
            .filter_map(|(k, &w)| large.weights.get(k).map(|&w2| w.min(w2)))
            .sum()
    }
}

impl<K: Ord + Clone> IntoIterator for Pattern<K> {
    type Item = (K, f64);
    type IntoIter = std::collections::btree_map::IntoIter<K, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.weights.into_iter()
    }
}

impl<K: Ord + Clone> FromIterator<(K, f64)> for Pattern<K> {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        Pattern {
            weights: iter.into_iter().collect(),
        }
    }
}
