//! Core types for marionette.

mod event;
mod membership;
mod power_levels;

pub use event::*;
pub use membership::*;
pub use power_levels::*;
