//! marionette-core - Core library for marionette.
//!
//! This crate provides the intent gateway that lets an application service
//! act as many virtual users, together with the state store it consults to
//! avoid redundant registration, join and typing calls.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use marionette_core::{AppService, AppServiceConfig, BasicStateStore};
//!
//! let config = AppServiceConfig::from_file("appservice.toml")?;
//! let service = AppService::new(&config, Arc::new(BasicStateStore::new()), clients)?;
//!
//! // Registers and joins on first use, then sends.
//! let puppet = service.intent("telegram_1234");
//! puppet.send_text("!room:example.org", "hello").await?;
//! ```

pub mod appservice;
pub mod config;
pub mod error;
pub mod intent;
pub mod store;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use appservice::{AppService, ClientProvider};
pub use config::{AppServiceConfig, StateStoreConfig, StateStoreProvider};
pub use error::{ErrorCode, MarionetteError, MarionetteResult};
pub use intent::{Change, Intent};
pub use store::{BasicStateStore, StateSnapshot};
pub use traits::{RemoteClient, StateStore, NOT_TYPING};
pub use types::{EventType, Member, Membership, PowerLevels, StateEvent};
