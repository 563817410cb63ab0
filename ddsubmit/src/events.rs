// ddsubmit - Submit custom metrics to Datadog from Rust!
//
// Copyright 2026 The ddsubmit Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Events and service checks, the two non-metric DogStatsD datagrams.

use crate::builder::write_tags;
use crate::client::{DogStatsdClient, MetricBackend};
use crate::types::{ErrorKind, Event, MetricError, MetricResult, ServiceCheck};
use std::fmt::{self, Write};

/// Longest event datagram the agent accepts, in bytes.
pub const MAX_EVENT_LENGTH: usize = 8 * 1024;

/// The priority of an event.
#[derive(PartialEq, Eq, Debug, Hash, Clone, Copy)]
pub enum EventPriority {
    Normal,
    Low,
}

impl fmt::Display for EventPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            EventPriority::Normal => "normal".fmt(f),
            EventPriority::Low => "low".fmt(f),
        }
    }
}

/// The alert type of an event. Datadog treats events without one as `info`.
#[derive(PartialEq, Eq, Debug, Hash, Clone, Copy)]
pub enum EventAlertType {
    Error,
    Warning,
    Info,
    Success,
}

impl fmt::Display for EventAlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            EventAlertType::Error => "error".fmt(f),
            EventAlertType::Warning => "warning".fmt(f),
            EventAlertType::Info => "info".fmt(f),
            EventAlertType::Success => "success".fmt(f),
        }
    }
}

/// Status reported by a service check.
#[derive(PartialEq, Eq, Debug, Hash, Clone, Copy)]
pub enum ServiceCheckStatus {
    Ok = 0,
    Warning = 1,
    Critical = 2,
    Unknown = 3,
}

impl fmt::Display for ServiceCheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (*self as u8).fmt(f)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EventFormatter<'a> {
    title: String,
    text: String,
    timestamp: Option<u64>,
    hostname: Option<&'a str>,
    aggregation_key: Option<&'a str>,
    priority: Option<EventPriority>,
    source_type_name: Option<&'a str>,
    alert_type: Option<EventAlertType>,
    tags: Vec<(Option<&'a str>, &'a str)>,
}

impl<'a> EventFormatter<'a> {
    pub(crate) fn new(title: &str, text: &str) -> Self {
        EventFormatter {
            title: title.replace('\n', "\\n"),
            text: text.replace('\n', "\\n"),
            timestamp: None,
            hostname: None,
            aggregation_key: None,
            priority: None,
            source_type_name: None,
            alert_type: None,
            tags: Vec::new(),
        }
    }

    pub(crate) fn format(&self) -> MetricResult<String> {
        let mut out = String::with_capacity(self.title.len() + self.text.len() + 32);
        let _ = write!(
            out,
            "_e{{{},{}}}:{}|{}",
            self.title.len(),
            self.text.len(),
            self.title,
            self.text
        );

        if let Some(ts) = self.timestamp {
            let _ = write!(out, "|d:{}", ts);
        }
        if let Some(hostname) = self.hostname {
            let _ = write!(out, "|h:{}", hostname);
        }
        if let Some(key) = self.aggregation_key {
            let _ = write!(out, "|k:{}", key);
        }
        if let Some(priority) = self.priority {
            let _ = write!(out, "|p:{}", priority);
        }
        if let Some(source) = self.source_type_name {
            let _ = write!(out, "|s:{}", source);
        }
        if let Some(alert) = self.alert_type {
            let _ = write!(out, "|t:{}", alert);
        }
        write_tags(&mut out, &self.tags);

        if out.len() > MAX_EVENT_LENGTH {
            Err(MetricError::from((ErrorKind::InvalidInput, "Event exceeds the maximum length")))
        } else {
            Ok(out)
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ServiceCheckFormatter<'a> {
    name: &'a str,
    status: ServiceCheckStatus,
    timestamp: Option<u64>,
    hostname: Option<&'a str>,
    message: Option<String>,
    tags: Vec<(Option<&'a str>, &'a str)>,
}

impl<'a> ServiceCheckFormatter<'a> {
    pub(crate) fn new(name: &'a str, status: ServiceCheckStatus) -> Self {
        ServiceCheckFormatter {
            name,
            status,
            timestamp: None,
            hostname: None,
            message: None,
            tags: Vec::new(),
        }
    }

    pub(crate) fn format(&self) -> String {
        let mut out = String::with_capacity(self.name.len() + 16);
        let _ = write!(out, "_sc|{}|{}", self.name, self.status);

        if let Some(ts) = self.timestamp {
            let _ = write!(out, "|d:{}", ts);
        }
        if let Some(hostname) = self.hostname {
            let _ = write!(out, "|h:{}", hostname);
        }
        write_tags(&mut out, &self.tags);
        // the message must come last since it may contain '|'
        if let Some(ref message) = self.message {
            let _ = write!(out, "|m:{}", message);
        }

        out
    }
}

/// Builder for adding tags and optional fields to in-progress events.
///
/// Created by `Evented::event_with_tags`. The event is sent via the client
/// when `.send()` or `.try_send()` is invoked. Events are never prefixed with
/// the client's namespace but do carry its constant tags.
///
/// # Example
///
/// ```
/// use ddsubmit::prelude::*;
/// use ddsubmit::{DogStatsdClient, NopMetricSink, Metric, EventPriority, EventAlertType};
///
/// let client = DogStatsdClient::from_sink(NopMetricSink);
/// let res = client.event_with_tags("exception", "something bad!")
///     .with_timestamp(1523292353)
///     .with_hostname("example.com")
///     .with_aggregation_key("aggreg_key")
///     .with_priority(EventPriority::Low)
///     .with_source_type_name("rust")
///     .with_alert_type(EventAlertType::Error)
///     .with_tag("env", "prod")
///     .try_send();
///
/// assert_eq!(
///     "_e{9,14}:exception|something bad!|d:1523292353|h:example.com|k:aggreg_key|p:low|s:rust|t:error|#env:prod",
///     res.unwrap().as_metric_str()
/// );
/// ```
#[must_use = "Did you forget to call .send() after customizing the event?"]
#[derive(Debug)]
pub struct EventBuilder<'m, 'c> {
    formatter: EventFormatter<'m>,
    client: &'c DogStatsdClient,
}

impl<'m, 'c> EventBuilder<'m, 'c> {
    pub(crate) fn new(formatter: EventFormatter<'m>, client: &'c DogStatsdClient) -> Self {
        EventBuilder { formatter, client }
    }

    fn update<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut EventFormatter<'m>),
    {
        f(&mut self.formatter);
        self
    }

    pub fn with_tag(self, key: &'m str, value: &'m str) -> Self {
        self.update(|fmt| fmt.tags.push((Some(key), value)))
    }

    pub fn with_tag_value(self, value: &'m str) -> Self {
        self.update(|fmt| fmt.tags.push((None, value)))
    }

    /// Add several preformatted tags (`key:value` or bare values) to this event.
    pub fn with_tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = &'m S>,
        S: AsRef<str> + ?Sized + 'm,
    {
        self.update(|fmt| fmt.tags.extend(tags.into_iter().map(|t| (None, t.as_ref()))))
    }

    /// Unix timestamp (seconds) of the event. The agent uses the current time
    /// when this isn't set.
    pub fn with_timestamp(self, timestamp: u64) -> Self {
        self.update(|fmt| fmt.timestamp = Some(timestamp))
    }

    pub fn with_hostname(self, hostname: &'m str) -> Self {
        self.update(|fmt| fmt.hostname = Some(hostname))
    }

    /// Group events with the same key together in the event stream.
    pub fn with_aggregation_key(self, key: &'m str) -> Self {
        self.update(|fmt| fmt.aggregation_key = Some(key))
    }

    pub fn with_priority(self, priority: EventPriority) -> Self {
        self.update(|fmt| fmt.priority = Some(priority))
    }

    pub fn with_source_type_name(self, source: &'m str) -> Self {
        self.update(|fmt| fmt.source_type_name = Some(source))
    }

    pub fn with_alert_type(self, alert_type: EventAlertType) -> Self {
        self.update(|fmt| fmt.alert_type = Some(alert_type))
    }

    /// Send the event, returning it or any error encountered.
    pub fn try_send(self) -> MetricResult<Event> {
        let event = Event::from(self.formatter.format()?);
        self.client.send_metric(&event)?;
        Ok(event)
    }

    /// Send the event, passing any error to the client's error handler.
    pub fn send(self) {
        let client = self.client;
        if let Err(e) = self.try_send() {
            client.consume_error(e);
        }
    }
}

/// Builder for adding tags and optional fields to in-progress service checks.
///
/// Created by `ServiceChecked::service_check_with_tags`.
///
/// # Example
///
/// ```
/// use ddsubmit::prelude::*;
/// use ddsubmit::{DogStatsdClient, NopMetricSink, Metric, ServiceCheckStatus};
///
/// let client = DogStatsdClient::from_sink(NopMetricSink);
/// let res = client.service_check_with_tags("myapp.db.connection", ServiceCheckStatus::Critical)
///     .with_hostname("db01")
///     .with_tag("env", "prod")
///     .with_message("connection refused")
///     .try_send();
///
/// assert_eq!(
///     "_sc|myapp.db.connection|2|h:db01|#env:prod|m:connection refused",
///     res.unwrap().as_metric_str()
/// );
/// ```
#[must_use = "Did you forget to call .send() after customizing the service check?"]
#[derive(Debug)]
pub struct ServiceCheckBuilder<'m, 'c> {
    formatter: ServiceCheckFormatter<'m>,
    client: &'c DogStatsdClient,
}

impl<'m, 'c> ServiceCheckBuilder<'m, 'c> {
    pub(crate) fn new(formatter: ServiceCheckFormatter<'m>, client: &'c DogStatsdClient) -> Self {
        ServiceCheckBuilder { formatter, client }
    }

    fn update<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut ServiceCheckFormatter<'m>),
    {
        f(&mut self.formatter);
        self
    }

    pub fn with_tag(self, key: &'m str, value: &'m str) -> Self {
        self.update(|fmt| fmt.tags.push((Some(key), value)))
    }

    pub fn with_tag_value(self, value: &'m str) -> Self {
        self.update(|fmt| fmt.tags.push((None, value)))
    }

    /// Add several preformatted tags (`key:value` or bare values) to this check.
    pub fn with_tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = &'m S>,
        S: AsRef<str> + ?Sized + 'm,
    {
        self.update(|fmt| fmt.tags.extend(tags.into_iter().map(|t| (None, t.as_ref()))))
    }

    pub fn with_timestamp(self, timestamp: u64) -> Self {
        self.update(|fmt| fmt.timestamp = Some(timestamp))
    }

    pub fn with_hostname(self, hostname: &'m str) -> Self {
        self.update(|fmt| fmt.hostname = Some(hostname))
    }

    /// Describe the status. Newlines and `m:` sequences are escaped.
    pub fn with_message(self, message: &str) -> Self {
        let escaped = message.replace('\n', "\\n").replace("m:", "m\\:");
        self.update(|fmt| fmt.message = Some(escaped))
    }

    /// Send the service check, returning it or any error encountered.
    pub fn try_send(self) -> MetricResult<ServiceCheck> {
        let check = ServiceCheck::from(self.formatter.format());
        self.client.send_metric(&check)?;
        Ok(check)
    }

    /// Send the service check, passing any error to the client's error handler.
    pub fn send(self) {
        let client = self.client;
        if let Err(e) = self.try_send() {
            client.consume_error(e);
        }
    }
}

/// Trait for posting events to the Datadog event stream via the agent.
pub trait Evented {
    /// Post an event with the given title and text
    fn event(&self, title: &str, text: &str) -> MetricResult<Event> {
        self.event_with_tags(title, text).try_send()
    }

    /// Post an event and return an `EventBuilder` that can be used to add
    /// tags and optional fields.
    fn event_with_tags<'a>(&'a self, title: &'a str, text: &'a str) -> EventBuilder<'a, 'a>;
}

/// Trait for reporting the status of a service via the agent.
pub trait ServiceChecked {
    /// Report the status of the named check
    fn service_check(&self, name: &str, status: ServiceCheckStatus) -> MetricResult<ServiceCheck> {
        self.service_check_with_tags(name, status).try_send()
    }

    /// Report the status of the named check and return a
    /// `ServiceCheckBuilder` that can be used to add tags and optional fields.
    fn service_check_with_tags<'a>(&'a self, name: &'a str, status: ServiceCheckStatus) -> ServiceCheckBuilder<'a, 'a>;
}

impl Evented for DogStatsdClient {
    fn event_with_tags<'a>(&'a self, title: &'a str, text: &'a str) -> EventBuilder<'a, 'a> {
        let mut formatter = EventFormatter::new(title, text);
        formatter.tags.extend(self.tags().map(|t| (None, t)));
        EventBuilder::new(formatter, self)
    }
}

impl ServiceChecked for DogStatsdClient {
    fn service_check_with_tags<'a>(&'a self, name: &'a str, status: ServiceCheckStatus) -> ServiceCheckBuilder<'a, 'a> {
        let mut formatter = ServiceCheckFormatter::new(name, status);
        formatter.tags.extend(self.tags().map(|t| (None, t)));
        ServiceCheckBuilder::new(formatter, self)
    }
}
