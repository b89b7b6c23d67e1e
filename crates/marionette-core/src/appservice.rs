//! Application service wiring: identities, clients and intents.

use std::sync::Arc;

use crate::config::AppServiceConfig;
use crate::error::MarionetteResult;
use crate::intent::Intent;
use crate::traits::{RemoteClient, StateStore};

/// Hands out a client acting as a given user.
pub trait ClientProvider: Send + Sync {
    fn client(&self, user_id: &str) -> Arc<dyn RemoteClient>;
}

/// An application service controlling many users on one homeserver.
///
/// All intents share the service's state store, so a fact learned by one
/// intent (e.g. that the bot joined a room) is visible to all of them.
pub struct AppService {
    domain: String,
    bot_localpart: String,
    store: Arc<dyn StateStore>,
    clients: Arc<dyn ClientProvider>,
}

impl AppService {
    pub fn new(
        config: &AppServiceConfig,
        store: Arc<dyn StateStore>,
        clients: Arc<dyn ClientProvider>,
    ) -> MarionetteResult<Self> {
        config.validate()?;
        Ok(Self {
            domain: config.homeserver_domain.clone(),
            bot_localpart: config.bot_localpart.clone(),
            store,
            clients,
        })
    }

    /// Full user ID for a localpart on this homeserver.
    pub fn user_id(&self, localpart: &str) -> String {
        format!("@{}:{}", localpart, self.domain)
    }

    pub fn bot_user_id(&self) -> String {
        self.user_id(&self.bot_localpart)
    }

    pub fn bot_client(&self) -> Arc<dyn RemoteClient> {
        self.clients.client(&self.bot_user_id())
    }

    pub fn state_store(&self) -> &Arc<dyn StateStore> {
        &self.store
    }

    /// Intent for the user with the given localpart.
    ///
    /// The bot is attached for forbidden-join recovery, except on the bot's
    /// own intent.
    pub fn intent(&self, localpart: &str) -> Intent {
        let user_id = self.user_id(localpart);
        let client = self.clients.client(&user_id);
        let is_bot = user_id == self.bot_user_id();
        let intent = Intent::new(localpart, user_id, client, Arc::clone(&self.store));
        if is_bot {
            intent
        } else {
            intent.with_bot(self.bot_client())
        }
    }

    pub fn bot_intent(&self) -> Intent {
        self.intent(&self.bot_localpart)
    }
}
