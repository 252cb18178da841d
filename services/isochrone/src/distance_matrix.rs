//! Google Distance Matrix client.
//!
//! One HTTP request per grid point, origin and destination sent as
//! `lat,lon`. Response mapping:
//!
//! | top-level status                    | element status | outcome                 |
//! |-------------------------------------|----------------|-------------------------|
//! | `OVER_QUERY_LIMIT`, `REQUEST_DENIED` | -              | fatal                   |
//! | `OK`                                | `OK`           | `duration.value` seconds |
//! | `OK`                                | other          | failed, element status  |
//! | other                               | -              | failed, top-level status |
//!
//! Transport errors and undecodable bodies are fatal.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use grid_processor::{DurationSource, GridProcessorError};
use iso_common::{Coordinate, SampleOutcome};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::credentials::CredentialProvider;

pub const DEFAULT_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";

/// Top-level statuses that end the run.
const FATAL_STATUSES: [&str; 2] = ["OVER_QUERY_LIMIT", "REQUEST_DENIED"];

/// Client settings.
#[derive(Debug, Clone)]
pub struct DistanceMatrixConfig {
    /// Service URL, without query string
    pub endpoint: String,
    /// `driving`, `walking`, `bicycling` or `transit`
    pub travel_mode: String,
    /// HTTP request timeout
    pub request_timeout: Duration,
}

impl Default for DistanceMatrixConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            travel_mode: "driving".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    #[serde(default)]
    duration: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: f64,
}

/// Map a response body to a sample outcome.
pub fn parse_response(body: &str) -> grid_processor::Result<SampleOutcome> {
    let response: MatrixResponse = serde_json::from_str(body)
        .map_err(|e| GridProcessorError::source_fatal(format!("undecodable response: {}", e)))?;

    if FATAL_STATUSES.contains(&response.status.as_str()) {
        let reason = match response.error_message {
            Some(message) => format!("{} ({})", response.status, message),
            None => response.status,
        };
        return Err(GridProcessorError::source_fatal(reason));
    }

    if response.status != "OK" {
        return Ok(SampleOutcome::Failed(response.status));
    }

    let element = response
        .rows
        .first()
        .and_then(|row| row.elements.first())
        .ok_or_else(|| GridProcessorError::source_fatal("OK response without elements"))?;

    if element.status != "OK" {
        return Ok(SampleOutcome::Failed(element.status.clone()));
    }

    let duration = element
        .duration
        .as_ref()
        .ok_or_else(|| GridProcessorError::source_fatal("OK element without duration"))?;

    if !(duration.value.is_finite() && duration.value >= 0.0) {
        return Err(GridProcessorError::source_fatal(format!(
            "invalid duration {}",
            duration.value
        )));
    }

    Ok(SampleOutcome::Duration(duration.value.round() as u64))
}

/// Distance Matrix backed [`DurationSource`].
pub struct DistanceMatrixClient {
    client: Client,
    config: DistanceMatrixConfig,
    api_key: String,
}

impl DistanceMatrixClient {
    /// Build the HTTP client and resolve the API key.
    pub fn new(config: DistanceMatrixConfig, credentials: &dyn CredentialProvider) -> Result<Self> {
        let api_key = credentials
            .api_key()
            .with_context(|| format!("Failed to load API key from {}", credentials.describe()))?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .tcp_nodelay(true)
            .build()
            .context("Failed to create HTTP client")?;

        info!(
            endpoint = %config.endpoint,
            mode = %config.travel_mode,
            "Distance matrix client ready"
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    pub fn config(&self) -> &DistanceMatrixConfig {
        &self.config
    }

    /// Query parameters for one origin/destination pair.
    pub fn query_params(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("key", self.api_key.clone()),
            ("mode", self.config.travel_mode.clone()),
            ("units", "metric".to_string()),
            ("origins", format!("{:.6},{:.6}", origin.lat, origin.lon)),
            (
                "destinations",
                format!("{:.6},{:.6}", destination.lat, destination.lon),
            ),
        ]
    }
}

#[async_trait]
impl DurationSource for DistanceMatrixClient {
    #[instrument(skip(self, origin, destination), fields(destination = %destination))]
    async fn duration(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> grid_processor::Result<SampleOutcome> {
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&self.query_params(origin, destination))
            .send()
            .await
            .map_err(|e| GridProcessorError::source_fatal(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GridProcessorError::source_fatal(format!(
                "HTTP {} from distance matrix service",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GridProcessorError::source_fatal(format!("reading body: {}", e)))?;
        debug!(bytes = body.len(), "Distance matrix response");

        parse_response(&body)
    }
}
