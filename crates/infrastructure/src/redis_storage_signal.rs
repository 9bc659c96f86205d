//! Cross-process collection change signal over Redis pub/sub.
//!
//! Every process publishes `<origin>|<collection>` after it rewrites a
//! collection and listens on the same channel. Messages from its own origin
//! are dropped; the rest are replayed on the hub's external channel.

use std::pin::pin;
use std::sync::Arc;

use futures_util::StreamExt;
use hearthware_application::{ChangeHub, StorageSignal};
use hearthware_core::{AppError, AppResult};
use hearthware_domain::CollectionKey;
use redis::AsyncCommands;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Redis implementation of the storage signal port.
#[derive(Clone)]
pub struct RedisStorageSignal {
    client: redis::Client,
    channel: String,
    origin: String,
}

impl RedisStorageSignal {
    /// Creates a signal with a fresh origin id for this process.
    #[must_use]
    pub fn new(client: redis::Client, channel: impl Into<String>) -> Self {
        Self {
            client,
            channel: channel.into(),
            origin: Uuid::new_v4().simple().to_string(),
        }
    }

    /// Opens a client for `redis_url` and creates a signal on `channel`.
    ///
    /// Only the URL is checked here; the connection is made by
    /// [`RedisStorageSignal::listen`] and on each publish.
    pub fn open(redis_url: &str, channel: impl Into<String>) -> AppResult<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|error| AppError::Validation(format!("invalid REDIS_URL: {error}")))?;
        Ok(Self::new(client, channel))
    }

    /// Returns this process's origin id.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn encode(&self, key: CollectionKey) -> String {
        format!("{}|{}", self.origin, key.as_str())
    }

    /// Replays one foreign announcement on the hub. Returns whether it did.
    pub fn forward(&self, hub: &ChangeHub, payload: &str) -> bool {
        let Some((origin, key)) = payload.split_once('|') else {
            warn!(payload, "ignoring malformed storage signal");
            return false;
        };
        if origin == self.origin {
            return false;
        }

        match key.parse::<CollectionKey>() {
            Ok(key) => {
                let delivered = hub.emit_external(key);
                debug!(collection = %key, origin, listeners = delivered, "peer rewrote collection");
                true
            }
            Err(error) => {
                warn!(error = %error, "ignoring storage signal for unknown collection");
                false
            }
        }
    }

    /// Subscribes and forwards announcements until the connection drops.
    pub async fn listen(&self, hub: Arc<ChangeHub>) -> AppResult<()> {
        let mut pubsub = self.client.get_async_pubsub().await.map_err(|error| {
            AppError::Internal(format!("failed to open redis pubsub connection: {error}"))
        })?;
        pubsub.subscribe(&self.channel).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to subscribe to '{}': {error}",
                self.channel
            ))
        })?;
        debug!(channel = %self.channel, origin = %self.origin, "listening for peer changes");

        let mut messages = pin!(pubsub.on_message());
        while let Some(message) = messages.next().await {
            match message.get_payload::<String>() {
                Ok(payload) => {
                    self.forward(&hub, &payload);
                }
                Err(error) => warn!(error = %error, "unreadable storage signal payload"),
            }
        }

        Err(AppError::Internal(format!(
            "redis subscription to '{}' ended",
            self.channel
        )))
    }

    /// Runs [`Self::listen`] on the current runtime.
    #[must_use]
    pub fn spawn_listener(&self, hub: Arc<ChangeHub>) -> JoinHandle<()> {
        let signal = self.clone();
        tokio::spawn(async move {
            if let Err(listen_error) = signal.listen(hub).await {
                error!(error = %listen_error, "storage signal listener stopped");
            }
        })
    }
}

async fn publish(client: redis::Client, channel: String, payload: String) -> AppResult<()> {
    let mut connection = client
        .get_multiplexed_async_connection()
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to redis: {error}")))?;

    connection
        .publish::<_, _, ()>(channel, payload)
        .await
        .map_err(|error| AppError::Internal(format!("failed to publish storage signal: {error}")))
}

impl StorageSignal for RedisStorageSignal {
    fn announce(&self, key: CollectionKey) {
        let Ok(runtime) = Handle::try_current() else {
            warn!(collection = %key, "no async runtime; storage signal not published");
            return;
        };

        let client = self.client.clone();
        let channel = self.channel.clone();
        let payload = self.encode(key);
        runtime.spawn(async move {
            if let Err(error) = publish(client, channel, payload).await {
                warn!(error = %error, collection = %key, "peers were not notified of change");
            }
        });
    }
}
