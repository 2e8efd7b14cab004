//! `Esdr` — the Extended SDR memory: a weighted high-dimensional bit
//! pattern that composes, compares, and generalizes bit patterns produced by
//! the encoders.

use crate::bit_pattern::{Bit, BitKey, BitPattern, Pattern};
use crate::core::{NumericEncoder, SymbolEncoder};
use crate::error::{HdcError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

impl BitKey {
    /// The underlying raw bit, discarding any existing label. Used when
    /// re-labeling a key that may already be tagged.
    fn raw(&self) -> Bit {
        match self {
            BitKey::Raw(b) => *b,
            BitKey::Labeled(_, b) => *b,
        }
    }
}

/// A scalar or list value within a structured record presented to
/// `Esdr::set_value`, grounded on the Python reference's
/// `SDR_VALUE_TYPE = Dict[str, Union[str, int, float, list, dict]]`
/// (nested dicts are out of scope, matching the reference, which never
/// recurses past one level of `list`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Str(String),
    Int(i64),
    Real(f64),
    List(Vec<Value>),
}

/// A structured record: field name to value.
pub type Record = BTreeMap<String, Value>;

/// Which encoder handled a given field in `Esdr::set_value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Symbol,
    Numeric,
}

/// A generalized memory of a data concept: a randomly distributed, weighted,
/// sparse, high-dimensional bit pattern. Similar concepts share a
/// proportion of bits; dissimilar concepts share few or none.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Esdr {
    bits: Pattern<BitKey>,
    sum_bits: f64,
}

impl Esdr {
    /// An empty memory.
    pub fn new() -> Self {
        Esdr::default()
    }

    /// Deep copy of another `Esdr`.
    pub fn from_esdr(other: &Esdr) -> Self {
        other.clone()
    }

    /// Build from a raw iterable of bits, each weight initialized to `1.0`.
    pub fn from_bits(bits: impl IntoIterator<Item = Bit>) -> Self {
        let pattern = Pattern::from_bits(bits.into_iter().map(BitKey::Raw));
        let sum_bits = pattern.sum_of_weights();
        Esdr {
            bits: pattern,
            sum_bits,
        }
    }

    /// The current bit pattern.
    pub fn bits(&self) -> &Pattern<BitKey> {
        &self.bits
    }

    fn recompute_sum(&mut self) {
        self.sum_bits = self.bits.sum_of_weights();
    }

    /// Merge a raw `BitPattern` (as produced by an encoder) into this
    /// memory, overwriting any colliding bits.
    fn merge_bit_pattern(&mut self, pattern: &BitPattern) {
        for (&bit, &w) in pattern.iter() {
            self.bits.set(BitKey::Raw(bit), w);
        }
        self.recompute_sum();
    }

    /// Weighted overlap of bits with `other`: `Σ min(self[b], other[b])`
    /// over shared bits. O(size of the smaller pattern).
    pub fn overlap(&self, other: &Esdr) -> f64 {
        self.bits.weighted_intersection(&other.bits)
    }

    /// Similarity to `other`: `overlap(other) / sum_bits`, or `0.0` if this
    /// memory is empty. Asymmetric by design: `a.similarity(b)` generally
    /// differs from `b.similarity(a)`.
    pub fn similarity(&self, other: &Esdr) -> f64 {
        if self.sum_bits > 0.0 {
            self.overlap(other) / self.sum_bits
        } else {
            0.0
        }
    }

    /// Online weighted moving average over the union of bits:
    /// `self[b] <- (1 - rate) * self[b] + rate * other[b]` for shared bits,
    /// decayed toward zero for bits only in `self`, and copied in (scaled by
    /// `rate`) for bits only in `other`. At `rate = 0` self is unchanged; at
    /// `rate = 1` self becomes a weight-wise copy of `other`.
    pub fn learn(&mut self, other: &Esdr, rate: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(HdcError::InvalidParameter(
                "learn rate must be in [0, 1]".into(),
            ));
        }
        let inv_rate = 1.0 - rate;

        let mut keys: BTreeSet<BitKey> = self.bits.keys().cloned().collect();
        keys.extend(other.bits.keys().cloned());

        for key in keys {
            let new_weight = self.bits.get(&key) * inv_rate + rate * other.bits.get(&key);
            self.bits.set(key, new_weight);
        }

        self.recompute_sum();
        Ok(())
    }

    /// Merge `other`'s bits into self. If `label` is supplied, the merged
    /// keys are tagged `(label, bit)` so that fields bundled from distinct
    /// sources remain distinguishable; otherwise the raw bit is reused,
    /// which may collide with an existing key. Collisions are resolved by
    /// **overwrite** (spec.md §9 Open Question 4).
    pub fn bundle(&mut self, other: &Esdr, label: Option<&str>) {
        for (key, &w) in other.bits.iter() {
            let merged_key = match label {
                Some(l) => BitKey::Labeled(l.to_string(), key.raw()),
                None => key.clone(),
            };
            self.bits.set(merged_key, w);
        }
        self.recompute_sum();
    }

    /// Compose field-name, symbol, and numeric encoders into a single
    /// pattern for a structured record. Returns, per field, whether it was
    /// encoded as a symbol or as a numeric value.
    pub fn set_value(
        &mut self,
        record: &Record,
        field_encoder: &mut SymbolEncoder,
        symbol_encoder: &mut SymbolEncoder,
        numeric_encoder: &mut NumericEncoder,
    ) -> Result<BTreeMap<String, FieldKind>> {
        let mut fields = BTreeMap::new();

        for (field, value) in record {
            match value {
                Value::List(items) => {
                    for (idx, item) in items.iter().enumerate() {
                        let name = format!("{field}_{idx}");
                        let field_pattern = field_encoder.encode(name.as_str(), None)?;
                        if let Some((pattern, kind)) =
                            encode_scalar(item, &field_pattern, symbol_encoder, numeric_encoder)?
                        {
                            fields.insert(field.clone(), kind);
                            self.merge_bit_pattern(&pattern);
                        }
                    }
                }
                scalar => {
                    let field_pattern = field_encoder.encode(field.as_str(), None)?;
                    if let Some((pattern, kind)) =
                        encode_scalar(scalar, &field_pattern, symbol_encoder, numeric_encoder)?
                    {
                        fields.insert(field.clone(), kind);
                        self.merge_bit_pattern(&pattern);
                    }
                }
            }
        }

        Ok(fields)
    }
}

fn encode_scalar(
    value: &Value,
    field_pattern: &BitPattern,
    symbol_encoder: &mut SymbolEncoder,
    numeric_encoder: &mut NumericEncoder,
) -> Result<Option<(BitPattern, FieldKind)>> {
    match value {
        Value::Str(s) => Ok(Some((
            symbol_encoder.encode(s.as_str(), Some(field_pattern))?,
            FieldKind::Symbol,
        ))),
        Value::Int(n) => Ok(Some((
            numeric_encoder.encode(*n as f64, Some(field_pattern))?,
            FieldKind::Numeric,
        ))),
        Value::Real(x) => Ok(Some((
            numeric_encoder.encode(*x, Some(field_pattern))?,
            FieldKind::Numeric,
        ))),
        Value::List(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_similarity_is_one() {
        let e = Esdr::from_bits([1, 2, 3]);
        assert_eq!(e.similarity(&e), 1.0);
    }

    #[test]
    fn empty_similarity_is_zero() {
        let e = Esdr::new();
        let other = Esdr::from_bits([1, 2, 3]);
        assert_eq!(e.similarity(&other), 0.0);
    }

    #[test]
    fn overlap_is_sum_of_mins() {
        let mut a = Esdr::new();
        a.merge_bit_pattern(&BitPattern::from_bits([1, 2, 3]));
        let mut b = Esdr::new();
        b.merge_bit_pattern(&BitPattern::from_bits([2, 3, 4]));
        assert_eq!(a.overlap(&b), 2.0);
    }

    #[test]
    fn learn_zero_rate_is_identity() {
        let mut a = Esdr::from_bits([1, 2, 3]);
        let before = a.bits().clone();
        let b = Esdr::from_bits([3, 4, 5]);
        a.learn(&b, 0.0).unwrap();
        for key in before.keys() {
            assert_eq!(a.bits().get(key), before.get(key));
        }
    }

    #[test]
    fn learn_full_rate_copies_other() {
        let mut a = Esdr::from_bits([1, 2, 3]);
        let b = Esdr::from_bits([3, 4, 5]);
        a.learn(&b, 1.0).unwrap();
        for key in b.bits().keys() {
            assert_eq!(a.bits().get(key), b.bits().get(key));
        }
        for key in a.bits().keys() {
            if !b.bits().keys().any(|k| k == key) {
                assert_eq!(a.bits().get(key), 0.0);
            }
        }
    }

    #[test]
    fn learn_rejects_out_of_range_rate() {
        let mut a = Esdr::from_bits([1, 2, 3]);
        let b = Esdr::from_bits([4, 5, 6]);
        assert!(a.learn(&b, 1.5).is_err());
    }

    #[test]
    fn bundle_without_label_overwrites_colliding_bits() {
        let mut a = Esdr::from_bits([1, 2]);
        a.bits.set(BitKey::Raw(1), 0.2);
        let b = Esdr::from_bits([1]);
        a.bundle(&b, None);
        assert_eq!(a.bits().get(&BitKey::Raw(1)), 1.0);
    }

    #[test]
    fn bundle_with_label_tags_bits() {
        let mut a = Esdr::new();
        let b = Esdr::from_bits([1, 2]);
        a.bundle(&b, Some("field_a"));
        assert_eq!(a.bits().get(&BitKey::Labeled("field_a".into(), 1)), 1.0);
        assert_eq!(a.bits().get(&BitKey::Raw(1)), 0.0);
    }

    #[test]
    fn set_value_tags_symbol_and_numeric_fields_separately() {
        let mut field_encoder = SymbolEncoder::new(2048, 0.02, 123).unwrap();
        let mut symbol_encoder = SymbolEncoder::new(2048, 0.02, 123).unwrap();
        let mut numeric_encoder = NumericEncoder::new(2048, 0.02, 1.0, 123).unwrap();

        let mut record = Record::new();
        record.insert("name".to_string(), Value::Str("alice".to_string()));
        record.insert("age".to_string(), Value::Int(30));
        record.insert(
            "tags".to_string(),
            Value::List(vec![Value::Str("admin".to_string())]),
        );

        let mut esdr = Esdr::new();
        let fields = esdr
            .set_value(
                &record,
                &mut field_encoder,
                &mut symbol_encoder,
                &mut numeric_encoder,
            )
            .unwrap();

        assert_eq!(fields.get("name"), Some(&FieldKind::Symbol));
        assert_eq!(fields.get("age"), Some(&FieldKind::Numeric));
        assert_eq!(fields.get("tags"), Some(&FieldKind::Symbol));
        assert!(esdr.bits().len() > 0);
    }

    #[test]
    fn same_value_in_different_fields_does_not_collide() {
        let mut field_encoder = SymbolEncoder::new(2048, 0.02, 123).unwrap();
        let mut symbol_encoder = SymbolEncoder::new(2048, 0.02, 123).unwrap();
        let mut numeric_encoder = NumericEncoder::new(2048, 0.02, 1.0, 123).unwrap();

        let mut first = Record::new();
        first.insert("city".to_string(), Value::Str("paris".to_string()));
        let mut second = Record::new();
        second.insert("country".to_string(), Value::Str("paris".to_string()));

        let mut a = Esdr::new();
        a.set_value(
            &first,
            &mut field_encoder,
            &mut symbol_encoder,
            &mut numeric_encoder,
        )
        .unwrap();
        let mut b = Esdr::new();
        b.set_value(
            &second,
            &mut field_encoder,
            &mut symbol_encoder,
            &mut numeric_encoder,
        )
        .unwrap();

        assert_ne!(
            a.bits().keys().collect::<Vec<_>>(),
            b.bits().keys().collect::<Vec<_>>()
        );
    }
}
