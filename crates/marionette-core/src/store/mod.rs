//! State store implementations.

mod basic;
mod snapshot;

pub use basic::BasicStateStore;
pub use snapshot::StateSnapshot;
