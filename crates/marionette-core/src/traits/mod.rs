//! Core traits for marionette collaborators.

mod remote_client;
mod state_store;

pub use remote_client::*;
pub use state_store::*;
