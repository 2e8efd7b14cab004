//! The persistence port (spec.md §4.E/§4.F): a narrow contract encoders
//! satisfy so an external store can save and later reconstruct them, without
//! this crate depending on any particular store or wire format.

/// Capture and restore an encoder's state. `State` is plain data —
/// `serde`-serializable wherever the implementor's is — leaving the actual
/// store (a database row, a file, a key-value entry) to the caller.
///
/// `restore` always re-seeds the PRNG from a caller-supplied seed rather than
/// persisting RNG state, matching the Python reference (`random.seed(seed)`
/// runs unconditionally in `__init__`, independent of whether a prior state
/// was restored).
pub trait Persistable: Sized {
    type State;

    fn serialize(&self) -> Self::State;
    fn restore(state: Self::State, seed: u64) -> Self;
}
