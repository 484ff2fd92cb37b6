use reqwest::Client;
use tracing::info;

use tripgate_core::reservation::FlightDraft;
use tripgate_store::app_config::SubmissionConfig;

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("submission request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("submission rejected with status {0}")]
    Rejected(reqwest::StatusCode),
}

/// Client for the remote flight-info endpoint.
///
/// Fire-and-forget with respect to the resolver core: it sends the draft it
/// is handed and never touches the reservation slot.
#[derive(Clone)]
pub struct SubmitClient {
    http: Client,
    config: SubmissionConfig,
}

impl SubmitClient {
    pub fn new(config: SubmissionConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub async fn send(&self, draft: &FlightDraft) -> Result<(), SubmitError> {
        let response = self
            .http
            .post(&self.config.url)
            .header("token", &self.config.token)
            .header("sender", &self.config.sender)
            .json(draft)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SubmitError::Rejected(response.status()));
        }

        info!("flight details accepted by remote endpoint");
        Ok(())
    }
}
