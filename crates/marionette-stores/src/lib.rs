//! marionette-stores - Durable state store implementations for marionette.
//!
//! # Backends
//! - **Memory** - [`BasicStateStore`](marionette_core::BasicStateStore), re-exported for convenience
//! - **Flat file** - [`FlatFileStateStore`], in-memory maps mirrored to a JSON snapshot

mod factory;
mod flatfile;

pub use factory::StateStoreFactory;
pub use flatfile::FlatFileStateStore;
pub use marionette_core::BasicStateStore;
