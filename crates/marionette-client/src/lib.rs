//! marionette-client - Application service HTTP client for marionette.
//!
//! Implements [`RemoteClient`](marionette_core::RemoteClient) against the
//! Matrix client-server API, authenticating with the application service
//! token and acting as individual users through the `user_id` parameter.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use marionette_client::HttpClientProvider;
//! use marionette_core::AppService;
//! use marionette_stores::StateStoreFactory;
//!
//! let store = StateStoreFactory::create(&config.state_store)?;
//! let clients = Arc::new(HttpClientProvider::from_config(&config)?);
//! let service = AppService::new(&config, store, clients)?;
//! ```

mod client;

pub use client::{HttpClientProvider, HttpRemoteClient};
