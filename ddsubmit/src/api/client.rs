// ddsubmit - Submit custom metrics to Datadog from Rust!
//
// Copyright 2026 The ddsubmit Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::api::config::Configuration;
use crate::api::model::{ApiErrorResponse, IntakePayloadAccepted, MetricPayload};
use crate::types::{ErrorKind, MetricError, MetricResult};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

const API_KEY_HEADER: &str = "DD-API-KEY";
const JSON: &str = "application/json";

/// HTTP client for the intake API, holding its configuration and connection pool.
///
/// Dropping the client releases its connections, whether or not the last
/// submission succeeded.
#[derive(Debug)]
pub struct ApiClient {
    config: Configuration,
    http: Client,
}

impl ApiClient {
    /// Build the underlying HTTP client from `config`.
    ///
    /// # Failures
    ///
    /// Returns an `HttpError` if the TLS backend can't be initialized.
    pub fn new(config: Configuration) -> MetricResult<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let http = builder.build()?;
        log::debug!("created intake API client for {}", config.site());
        Ok(ApiClient { config, http })
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }
}

impl Drop for ApiClient {
    fn drop(&mut self) {
        log::debug!("releasing intake API client for {}", self.config.site());
    }
}

/// The metrics endpoints of the intake API.
#[derive(Debug, Clone, Copy)]
pub struct MetricsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> MetricsApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        MetricsApi { client }
    }

    /// Submit a payload of series to `/api/v2/series`, returning the intake's
    /// acknowledgement.
    ///
    /// The payload is validated first and exactly one request is made. It is
    /// not retried on failure.
    ///
    /// # Failures
    ///
    /// * `InvalidInput` if there's no API key or the payload is invalid.
    /// * `HttpError` if the request couldn't be completed.
    /// * `ApiError` if the intake answered with a non-success status.
    /// * `SerializationError` if a success response couldn't be decoded.
    pub fn submit_metrics(&self, body: &MetricPayload) -> MetricResult<IntakePayloadAccepted> {
        let config = &self.client.config;
        let api_key = config
            .api_key()
            .ok_or_else(|| MetricError::from((ErrorKind::InvalidInput, "An API key is required to submit metrics")))?;
        let encoded = body.encode()?;
        let url = config.series_url()?;

        log::debug!("submitting {} series ({} bytes) to {}", body.series.len(), encoded.len(), url);

        let response = self
            .client
            .http
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON)
            .body(encoded)
            .send()?;

        let status = response.status();
        let text = response.text()?;

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(IntakePayloadAccepted::default());
            }
            return Ok(serde_json::from_str(&text)?);
        }

        log::warn!("intake API rejected submission with status {}", status);
        let errors = match serde_json::from_str::<ApiErrorResponse>(&text) {
            Ok(parsed) if !parsed.errors.is_empty() => parsed.errors,
            _ if text.trim().is_empty() => Vec::new(),
            _ => vec![text],
        };

        Err(MetricError::from_status(status.as_u16(), errors))
    }
}
