// ddsubmit - Submit custom metrics to Datadog from Rust!
//
// Copyright 2026 The ddsubmit Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::sinks::get_addr;
use crate::types::{ErrorKind, MetricError, MetricResult};
use crate::{DEFAULT_HOST, DEFAULT_PORT};
use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

const ENV_AGENT_HOST: &str = "DD_AGENT_HOST";
const ENV_DOGSTATSD_PORT: &str = "DD_DOGSTATSD_PORT";

// Environment variables that become constant tags, and the tag key each maps to.
const ENV_TAGS: [(&str, &str); 4] = [
    ("DD_ENV", "env"),
    ("DD_SERVICE", "service"),
    ("DD_VERSION", "version"),
    ("DD_ENTITY_ID", "dd.internal.entity_id"),
];

/// Where a `DogStatsdClient` sends its datagrams and what it adds to each one.
///
/// The default targets an agent on `localhost:8125` with no namespace and no
/// constant tags. Nothing is read from the environment unless `from_env()` is
/// used.
///
/// # Example
///
/// ```
/// use ddsubmit::AgentConfig;
///
/// let config = AgentConfig::default()
///     .with_host("127.0.0.1")
///     .with_namespace("myapp")
///     .with_constant_tag("env:prod");
///
/// assert_eq!(("127.0.0.1", 8125), config.address());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    host: String,
    port: u16,
    socket_path: Option<PathBuf>,
    namespace: String,
    constant_tags: Vec<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            socket_path: None,
            namespace: String::new(),
            constant_tags: Vec::new(),
        }
    }
}

impl AgentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from the standard Datadog environment variables.
    ///
    /// `DD_AGENT_HOST` and `DD_DOGSTATSD_PORT` pick the agent. `DD_ENV`,
    /// `DD_SERVICE`, `DD_VERSION`, and `DD_ENTITY_ID` are added as constant
    /// tags. Unset or empty variables leave the defaults alone.
    ///
    /// # Failures
    ///
    /// Returns an `InvalidInput` error if `DD_DOGSTATSD_PORT` isn't a port number.
    pub fn from_env() -> MetricResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> MetricResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(host) = lookup(ENV_AGENT_HOST) {
            config.host = host;
        }

        if let Some(port) = lookup(ENV_DOGSTATSD_PORT) {
            config.port = port.trim().parse().map_err(|_| {
                MetricError::from((ErrorKind::InvalidInput, "DD_DOGSTATSD_PORT is not a valid port"))
            })?;
        }

        for (name, key) in ENV_TAGS.iter() {
            if let Some(value) = lookup(name) {
                config.constant_tags.push(format!("{}:{}", key, value));
            }
        }

        log::debug!("agent config from environment: {}:{}", config.host, config.port);
        Ok(config)
    }

    pub fn with_host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Send datagrams to the agent's Unix socket instead of host and port.
    pub fn with_socket_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.socket_path = Some(path.into());
        self
    }

    /// Prefix every metric name with `namespace.`
    pub fn with_namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Add a tag (`key:value` or a bare value) to every metric.
    pub fn with_constant_tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.constant_tags.push(tag.into());
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn socket_path(&self) -> Option<&Path> {
        self.socket_path.as_deref()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn constant_tags(&self) -> &[String] {
        &self.constant_tags
    }

    /// Host and port of the agent, suitable for `ToSocketAddrs`.
    pub fn address(&self) -> (&str, u16) {
        (&self.host, self.port)
    }

    /// Resolve the agent's host to the first socket address it yields.
    pub fn resolve(&self) -> MetricResult<SocketAddr> {
        get_addr(self.address())
    }
}

#[cfg(test)]
mod tests {
    use super::AgentConfig;
    use crate::types::ErrorKind;
    use std::collections::HashMap;
    use std::path::Path;

    fn lookup<'a>(vars: &'a HashMap<&str, &str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| vars.get(name).map(|v| v.to_string())
    }

    #[test]
    fn test_agent_config_defaults() {
        let config = AgentConfig::default();

        assert_eq!(("localhost", 8125), config.address());
        assert_eq!(None, config.socket_path());
        assert_eq!("", config.namespace());
        assert!(config.constant_tags().is_empty());
    }

    #[test]
    fn test_agent_config_default_resolves_to_8125() {
        let addr = AgentConfig::default().with_host("127.0.0.1").resolve().unwrap();
        assert_eq!(8125, addr.port());
    }

    #[test]
    fn test_agent_config_builder_methods() {
        let config = AgentConfig::new()
            .with_host("agent.internal")
            .with_port(8135)
            .with_socket_path("/var/run/datadog/dsd.socket")
            .with_namespace("myapp")
            .with_constant_tag("env:prod");

        assert_eq!(("agent.internal", 8135), config.address());
        assert_eq!(Some(Path::new("/var/run/datadog/dsd.socket")), config.socket_path());
        assert_eq!("myapp", config.namespace());
        assert_eq!(&["env:prod".to_string()], config.constant_tags());
    }

    #[test]
    fn test_agent_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("DD_AGENT_HOST", "10.0.0.5"),
            ("DD_DOGSTATSD_PORT", "8135"),
            ("DD_ENV", "prod"),
            ("DD_SERVICE", "webapp"),
            ("DD_VERSION", ""),
            ("DD_ENTITY_ID", "abc-123"),
        ]
        .into_iter()
        .collect();

        let config = AgentConfig::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(("10.0.0.5", 8135), config.address());
        assert_eq!(
            &[
                "env:prod".to_string(),
                "service:webapp".to_string(),
                "dd.internal.entity_id:abc-123".to_string(),
            ],
            config.constant_tags()
        );
    }

    #[test]
    fn test_agent_config_from_lookup_nothing_set() {
        let vars = HashMap::new();
        let config = AgentConfig::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(AgentConfig::default(), config);
    }

    #[test]
    fn test_agent_config_from_lookup_bad_port() {
        let vars: HashMap<&str, &str> = [("DD_DOGSTATSD_PORT", "eighty")].into_iter().collect();
        let err = AgentConfig::from_lookup(lookup(&vars)).unwrap_err();

        assert_eq!(ErrorKind::InvalidInput, err.kind());
    }
}
