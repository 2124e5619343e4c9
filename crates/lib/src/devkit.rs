//! `DevKit` session: the token, webhook client and host capability for one embedded app.
//!
//! Building a `DevKit` is the init step. It replaces the process-wide token slot
//! of a browser global with an explicit object the app passes around.

use crate::channel_message::ChannelMessages;
use crate::config::{self, Config};
use crate::error::{DevKitError, Result};
use crate::height_sync::{self, HeightSyncHandle, SyncMode};
use crate::host::{post_app_message, Host};
use crate::message::{self, Message};
use crate::token::TokenStore;
use crate::webhook::Webhook;
use std::sync::Arc;

/// Builder for [`DevKit`]. A host is required.
#[derive(Default)]
pub struct DevKitBuilder {
    config: Config,
    host: Option<Arc<dyn Host>>,
    token: Option<String>,
    base_url: Option<String>,
    environment_from_location: bool,
}

impl DevKitBuilder {
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn host(mut self, host: Arc<dyn Host>) -> Self {
        self.host = Some(host);
        self
    }

    /// Initial token; otherwise `webhook.token` from config, if any.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Explicit webhook base URL; wins over config.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Pick the environment from the host location (`?dev=true` selects development)
    /// instead of config. An explicit `base_url` still wins.
    pub fn environment_from_location(mut self) -> Self {
        self.environment_from_location = true;
        self
    }

    /// Fails with `UnsupportedEnvironment` when no host was given.
    pub fn build(self) -> Result<DevKit> {
        let host = self.host.ok_or(DevKitError::UnsupportedEnvironment)?;
        let base_url = match self.base_url {
            Some(url) => url,
            None if self.environment_from_location => {
                config::environment_from_query(&host.location_search())
                    .base_url()
                    .to_string()
            }
            None => config::resolve_base_url(&self.config),
        };
        let tokens = Arc::new(TokenStore::new());
        let seed = self.token.or_else(|| {
            self.config
                .webhook
                .token
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        });
        if let Some(t) = seed {
            tokens.set(t);
        }
        let webhook = Webhook::new(base_url)?;
        log::debug!("devkit: webhook base {}", webhook.base_url());
        Ok(DevKit {
            host,
            tokens: tokens.clone(),
            messages: ChannelMessages::new(webhook, tokens),
            config: self.config,
        })
    }
}

/// Embedded-app session.
pub struct DevKit {
    host: Arc<dyn Host>,
    tokens: Arc<TokenStore>,
    messages: ChannelMessages,
    config: Config,
}

impl DevKit {
    pub fn builder() -> DevKitBuilder {
        DevKitBuilder::default()
    }

    /// Store the app token. Last write wins.
    pub fn init(&self, token: impl Into<String>) {
        self.tokens.set(token);
    }

    /// The stored token, or `NotInitialized`.
    pub fn token(&self) -> Result<String> {
        self.tokens.get()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn host(&self) -> &Arc<dyn Host> {
        &self.host
    }

    /// Channel message webhook client sharing this session's token.
    pub fn messages(&self) -> &ChannelMessages {
        &self.messages
    }

    pub fn post_app_message(&self, message: &Message) {
        post_app_message(self.host.as_ref(), message);
    }

    pub fn close_modal(&self) {
        self.post_app_message(&message::close_modal());
    }

    pub fn close_panel(&self) {
        self.post_app_message(&message::close_panel());
    }

    pub fn open_panel(&self, name: &str, url: &str, channel_token: &str) -> Result<()> {
        self.post_app_message(&message::open_panel(name, url, channel_token)?);
        Ok(())
    }

    pub fn open_modal(
        &self,
        name: &str,
        url: &str,
        width: &str,
        height: &str,
        channel_token: &str,
    ) -> Result<()> {
        self.post_app_message(&message::open_modal(name, url, width, height, channel_token)?);
        Ok(())
    }

    pub fn auth_complete(&self) {
        self.post_app_message(&message::auth_complete());
    }

    /// Start height sync with the configured mode, reading the correlation id from the location.
    pub fn start_height_sync(&self) -> Result<HeightSyncHandle> {
        self.start_height_sync_with_mode(self.config.height_sync.mode)
    }

    pub fn start_height_sync_with_mode(&self, mode: SyncMode) -> Result<HeightSyncHandle> {
        let id = height_sync::correlation_id(
            self.host.as_ref(),
            &self.config.height_sync.correlation_param,
        )?;
        self.start_height_sync_with_id(id, mode)
    }

    /// Start height sync with a caller-supplied correlation id.
    pub fn start_height_sync_with_id(
        &self,
        resize_id: impl Into<String>,
        mode: SyncMode,
    ) -> Result<HeightSyncHandle> {
        height_sync::start(
            self.host.clone(),
            resize_id,
            mode,
            self.config.height_sync.interval(),
        )
    }
}
