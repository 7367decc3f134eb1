//! HTTP client for the detection server's objects endpoint.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::config::PollConfig;
use crate::objects::DetectedObject;

pub struct ObjectsClient {
    endpoint: String,
    client: Client,
}

impl ObjectsClient {
    pub fn new(config: &PollConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: config.endpoint.clone(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the current set of detected objects.
    ///
    /// Any failure (connect error, non-2xx status, non-JSON body) surfaces as
    /// a single `reqwest::Error`; the caller decides whether to log or abort.
    pub async fn fetch(&self) -> Result<Vec<DetectedObject>, reqwest::Error> {
        let objects: Vec<DetectedObject> = self
            .client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("Fetched {} objects from {}", objects.len(), self.endpoint);
        Ok(objects)
    }
}
