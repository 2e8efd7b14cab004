//! Heterogeneous symbol keys accepted by `SymbolEncoder`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A symbol to be encoded: either a string token or an integer, matching the
/// Python reference's `SYMBOL_TYPE = Union[str, int]`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Str(String),
    Int(i64),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Str(s) => write!(f, "{s}"),
            Symbol::Int(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::Str(s.to_string())
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Symbol::Str(s)
    }
}

impl From<i64> for Symbol {
    fn from(n: i64) -> Self {
        Symbol::Int(n)
    }
}

impl From<i32> for Symbol {
    fn from(n: i32) -> Self {
        Symbol::Int(n as i64)
    }
}
