//! Core encoders: `SymbolEncoder`, `NumericEncoder`, and the quantized-level
//! codebook that backs the latter.

pub(crate) mod codebook;
pub mod numeric_encoder;
pub mod symbol_encoder;

pub use numeric_encoder::{NumericEncoder, NumericEncoderState};
pub use symbol_encoder::{SymbolEncoder, SymbolEncoderState};
