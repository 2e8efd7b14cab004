//! hdc-core - Hyperdimensional Computing Encoding Core
//!
//! Sparse distributed representations for symbols and quantized numerics,
//! plus an Extended SDR ("ESDR") memory that composes them into structured
//! record encodings.
//!
//! # Overview
//!
//! - [`SymbolEncoder`] assigns each distinct symbol a stable, random
//!   `k`-of-`N` bit pattern and decodes noisy patterns back to ranked
//!   symbols.
//! - [`NumericEncoder`] maintains an order-preserving codebook of quantized
//!   levels so that numerically close values share a controlled fraction of
//!   bits, and distant values share effectively none.
//! - [`Esdr`] is the weighted memory these encoders write into: it supports
//!   overlap, asymmetric similarity, online learning, and field-tagged
//!   bundling of structured records.
//!
//! # Quick Start
//!
//! ```
//! use hdc::{NumericEncoder, SymbolEncoder, Symbol};
//!
//! let mut symbols = SymbolEncoder::new(2048, 0.02, 123)?;
//! let hello = symbols.encode("hello", None)?;
//! assert_eq!(symbols.decode(&hello)[0].0, Symbol::from("hello"));
//!
//! let mut numbers = NumericEncoder::new(2048, 0.02, 1.0, 123)?;
//! let near = numbers.encode(100.0, None)?;
//! let far = numbers.encode(140.0, None)?;
//! assert!(near.weighted_intersection(&far) <= 2.0);
//! # Ok::<(), hdc::HdcError>(())
//! ```
//!
//! # Modules
//!
//! - [`bit_pattern`]: the weighted sparse pattern shared by encoders and ESDR
//! - [`symbol`]: the heterogeneous symbol key type
//! - [`core`]: `SymbolEncoder` and `NumericEncoder`
//! - [`esdr`]: the `Esdr` memory and structured record types
//! - [`error`]: the crate's error type
//! - `testing` (test/debug builds only): invariant-checking helpers used by
//!   this crate's own tests

pub mod bit_pattern;
pub mod core;
pub mod error;
pub mod esdr;
pub mod persistence;
mod rng;
pub mod symbol;

#[cfg(any(test, debug_assertions))]
pub mod testing;

pub use bit_pattern::{Bit, BitKey, BitPattern, Pattern};
pub use core::{NumericEncoder, NumericEncoderState, SymbolEncoder, SymbolEncoderState};
pub use error::{HdcError, Result};
pub use esdr::{Esdr, FieldKind, Record, Value};
pub use persistence::Persistable;
pub use symbol::Symbol;
