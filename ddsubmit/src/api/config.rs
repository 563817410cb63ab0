// ddsubmit - Submit custom metrics to Datadog from Rust!
//
// Copyright 2026 The ddsubmit Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::types::{ErrorKind, MetricError, MetricResult};
use reqwest::Url;
use std::env;
use std::fmt;
use std::time::Duration;

/// Datadog site used when none is configured.
pub const DEFAULT_SITE: &str = "datadoghq.com";

const ENV_API_KEY: &str = "DD_API_KEY";
const ENV_SITE: &str = "DD_SITE";
const SERIES_PATH: &str = "/api/v2/series";

/// Settings for talking to the metrics intake API.
///
/// `Configuration::new()` has no API key and targets `https://api.datadoghq.com`.
/// Nothing is read from the environment unless `from_env()` is used.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use ddsubmit::api::Configuration;
///
/// let config = Configuration::new()
///     .with_api_key("your_api_key")
///     .with_site("datadoghq.eu")
///     .with_timeout(Duration::from_secs(10));
///
/// assert_eq!("https://api.datadoghq.eu/api/v2/series", config.series_url().unwrap().as_str());
/// ```
#[derive(Clone)]
pub struct Configuration {
    api_key: Option<String>,
    site: String,
    host: Option<Url>,
    timeout: Option<Duration>,
    user_agent: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            api_key: None,
            site: DEFAULT_SITE.to_string(),
            host: None,
            timeout: None,
            user_agent: format!("ddsubmit/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from `DD_API_KEY` and `DD_SITE`, ignoring unset
    /// or empty variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let mut config = Self::default();
        config.api_key = lookup(ENV_API_KEY);
        if let Some(site) = lookup(ENV_SITE) {
            config.site = site;
        }
        config
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Datadog site to submit to, such as `datadoghq.eu` or `us5.datadoghq.com`.
    pub fn with_site<S: Into<String>>(mut self, site: S) -> Self {
        self.site = site.into();
        self
    }

    /// Send requests to this base URL instead of the site's API host.
    ///
    /// # Failures
    ///
    /// Returns an `InvalidInput` error if `host` isn't an absolute URL.
    pub fn with_host(mut self, host: &str) -> MetricResult<Self> {
        let url = Url::parse(host).map_err(|_| MetricError::from((ErrorKind::InvalidInput, "Invalid host URL")))?;
        self.host = Some(url);
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// The host override if set, otherwise `https://api.{site}`.
    pub fn base_url(&self) -> MetricResult<Url> {
        match self.host {
            Some(ref host) => Ok(host.clone()),
            None => Url::parse(&format!("https://api.{}", self.site))
                .map_err(|_| MetricError::from((ErrorKind::InvalidInput, "Invalid Datadog site"))),
        }
    }

    /// Full URL of the series intake endpoint.
    pub fn series_url(&self) -> MetricResult<Url> {
        let base = self.base_url()?;
        let url = format!("{}{}", base.as_str().trim_end_matches('/'), SERIES_PATH);
        Url::parse(&url).map_err(|_| MetricError::from((ErrorKind::InvalidInput, "Invalid host URL")))
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("site", &self.site)
            .field("host", &self.host.as_ref().map(Url::as_str))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
