//! The "save" action: forwarding one record to a remote endpoint.
//!
//! Each card owns a [`SaveTrigger`]. Activating it moves the trigger to
//! [`SaveState::Pending`], which disables it until the single request
//! completes. Success disables it for good; failure re-enables it so the user
//! can retry by hand. Nothing retries automatically.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SaveError;
use crate::record::PhotoRecord;

/// Top-level key of the JSON body sent to the save endpoint.
pub const ENVELOPE_KEY: &str = "web_query";

/// `{"web_query": {"data": "<record as JSON text>"}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveEnvelope {
    pub web_query: SavePayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavePayload {
    /// The record serialized as a JSON string, not as a nested object.
    pub data: String,
}

impl SaveEnvelope {
    pub fn for_record(record: &PhotoRecord) -> Self {
        Self::from_data(record.to_json())
    }

    pub fn from_data(data: impl Into<String>) -> Self {
        Self {
            web_query: SavePayload { data: data.into() },
        }
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        serde_json::to_string(self).map_err(|err| SaveError::Encode(err.to_string()))
    }
}

/// Why the last attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveFailure {
    /// The endpoint answered with a non-success status.
    Rejected(u16),
    /// No usable answer.
    Network,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveState {
    #[default]
    Idle,
    Pending,
    Saved,
    Failed(SaveFailure),
}

impl SaveState {
    pub fn label(&self) -> &'static str {
        match self {
            SaveState::Idle => "Save",
            SaveState::Pending => "⏳ Saving...",
            SaveState::Saved => "✅ Saved",
            SaveState::Failed(SaveFailure::Rejected(_)) => "⚠️ Retry",
            SaveState::Failed(SaveFailure::Network) => "❌ Error",
        }
    }

    /// Whether the trigger accepts activation in this state.
    pub fn is_enabled(&self) -> bool {
        matches!(self, SaveState::Idle | SaveState::Failed(_))
    }
}

impl From<&SaveError> for SaveFailure {
    fn from(err: &SaveError) -> Self {
        match err {
            SaveError::Rejected(status) => SaveFailure::Rejected(*status),
            _ => SaveFailure::Network,
        }
    }
}

/// Save control of one card.
#[derive(Debug, Clone)]
pub struct SaveTrigger {
    envelope: SaveEnvelope,
    state: SaveState,
}

impl SaveTrigger {
    pub fn new(record: &PhotoRecord) -> Self {
        Self {
            envelope: SaveEnvelope::for_record(record),
            state: SaveState::Idle,
        }
    }

    pub fn state(&self) -> SaveState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    /// Disable the trigger and hand out the envelope to send, or `None` when
    /// a request is in flight or the record is already saved.
    pub fn begin(&mut self) -> Option<SaveEnvelope> {
        if !self.state.is_enabled() {
            return None;
        }
        self.state = SaveState::Pending;
        Some(self.envelope.clone())
    }

    /// Record the outcome of the request started by [`begin`](Self::begin).
    pub fn finish(&mut self, result: &Result<(), SaveError>) {
        if self.state != SaveState::Pending {
            return;
        }
        self.state = match result {
            Ok(()) => SaveState::Saved,
            Err(err) => {
                tracing::error!(error = %err, "save failed");
                SaveState::Failed(SaveFailure::from(err))
            }
        };
    }
}

/// Delivers envelopes to the save endpoint.
#[async_trait]
pub trait SaveClient: Send + Sync {
    async fn save(&self, envelope: &SaveEnvelope) -> Result<(), SaveError>;
}

/// Activate a trigger: at most one request, no retry.
pub async fn submit(trigger: &mut SaveTrigger, client: &dyn SaveClient) -> SaveState {
    if let Some(envelope) = trigger.begin() {
        let result = client.save(&envelope).await;
        trigger.finish(&result);
    }
    trigger.state()
}

#[cfg(feature = "http")]
pub use http::HttpSaveClient;

#[cfg(feature = "http")]
mod http {
    use async_trait::async_trait;

    use super::{SaveClient, SaveEnvelope};
    use crate::error::SaveError;

    /// POSTs envelopes as JSON to a fixed endpoint.
    #[derive(Debug, Clone)]
    pub struct HttpSaveClient {
        client: reqwest::Client,
        endpoint: String,
    }

    impl HttpSaveClient {
        pub fn new(endpoint: impl Into<String>) -> Self {
            Self::with_client(reqwest::Client::new(), endpoint)
        }

        pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
            Self {
                client,
                endpoint: endpoint.into(),
            }
        }

        pub fn endpoint(&self) -> &str {
            &self.endpoint
        }
    }

    #[async_trait]
    impl SaveClient for HttpSaveClient {
        async fn save(&self, envelope: &SaveEnvelope) -> Result<(), SaveError> {
            if self.endpoint.is_empty() {
                return Err(SaveError::MissingEndpoint);
            }

            let response = self
                .client
                .post(&self.endpoint)
                .json(envelope)
                .send()
                .await
                .map_err(|err| SaveError::Transport(err.to_string()))?;

            let status = response.status();
            if status.is_success() {
                tracing::info!(endpoint = %self.endpoint, "record saved");
                Ok(())
            } else {
                Err(SaveError::Rejected(status.as_u16()))
            }
        }
    }
}
