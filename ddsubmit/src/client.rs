// ddsubmit - Submit custom metrics to Datadog from Rust!
//
// Copyright 2026 The ddsubmit Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::builder::{MetricBuilder, MetricFormatter, MetricValue};
use crate::config::AgentConfig;
use crate::events::{Evented, ServiceChecked};
use crate::sealed::Sealed;
use crate::sinks::{get_addr, MetricSink, UdpMetricSink};
use crate::types::{
    Counter, Distribution, ErrorKind, Gauge, Histogram, Metric, MetricError, MetricResult, Set, Timer,
};
use std::fmt;
use std::net::{ToSocketAddrs, UdpSocket};
use std::panic::RefUnwindSafe;
use std::time::Duration;

fn finite(value: f64) -> MetricResult<MetricValue> {
    if value.is_finite() {
        Ok(MetricValue::Float(value))
    } else {
        Err(MetricError::from((ErrorKind::InvalidInput, "Metric values must be finite")))
    }
}

fn duration_millis(duration: Duration) -> MetricResult<MetricValue> {
    u64::try_from(duration.as_millis())
        .map(MetricValue::Unsigned)
        .map_err(|_| MetricError::from((ErrorKind::InvalidInput, "u64 overflow")))
}

/// Conversion trait for valid values for counters
///
/// This trait must be implemented for any types that are used as counter
/// values (currently only `i64`). This trait is internal to how values are
/// formatted as part of metrics but is exposed publicly for documentation
/// purposes.
pub trait ToCounterValue {
    fn try_to_value(self) -> MetricResult<MetricValue>;
}

impl ToCounterValue for i64 {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        Ok(MetricValue::Signed(self))
    }
}

/// Conversion trait for valid values for timers
///
/// Durations are converted to whole milliseconds.
pub trait ToTimerValue {
    fn try_to_value(self) -> MetricResult<MetricValue>;
}

impl ToTimerValue for u64 {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        Ok(MetricValue::Unsigned(self))
    }
}

impl ToTimerValue for f64 {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        finite(self)
    }
}

impl ToTimerValue for Duration {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        duration_millis(self)
    }
}

/// Conversion trait for valid values for gauges
pub trait ToGaugeValue {
    fn try_to_value(self) -> MetricResult<MetricValue>;
}

impl ToGaugeValue for i64 {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        Ok(MetricValue::Signed(self))
    }
}

impl ToGaugeValue for f64 {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        finite(self)
    }
}

/// Conversion trait for valid values for histograms
///
/// Durations are converted to fractional milliseconds.
pub trait ToHistogramValue {
    fn try_to_value(self) -> MetricResult<MetricValue>;
}

impl ToHistogramValue for u64 {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        Ok(MetricValue::Unsigned(self))
    }
}

impl ToHistogramValue for f64 {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        finite(self)
    }
}

impl ToHistogramValue for Duration {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        finite(self.as_nanos() as f64 / 1_000_000.0)
    }
}

/// Conversion trait for valid values for distributions
pub trait ToDistributionValue {
    fn try_to_value(self) -> MetricResult<MetricValue>;
}

impl ToDistributionValue for u64 {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        Ok(MetricValue::Unsigned(self))
    }
}

impl ToDistributionValue for f64 {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        finite(self)
    }
}

/// Conversion trait for valid values for sets
pub trait ToSetValue {
    fn try_to_value(self) -> MetricResult<MetricValue>;
}

impl ToSetValue for i64 {
    fn try_to_value(self) -> MetricResult<MetricValue> {
        Ok(MetricValue::Signed(self))
    }
}

/// Trait for incrementing and decrementing counters.
///
/// Counters are simple values incremented or decremented by a client. The
/// agent aggregates them over its flush interval and submits the result as a
/// `COUNT` or `RATE`. Examples of counter uses include number of logins to a
/// system or requests received.
///
/// The following types are valid for counters:
/// * `i64`
pub trait Counted<T>
where
    T: ToCounterValue,
{
    /// Increment or decrement the counter by the given amount
    fn count(&self, key: &str, count: T) -> MetricResult<Counter> {
        self.count_with_tags(key, count).try_send()
    }

    /// Increment or decrement the counter by the given amount and return
    /// a `MetricBuilder` that can be used to add tags to the metric.
    fn count_with_tags<'a>(&'a self, key: &'a str, count: T) -> MetricBuilder<'a, 'a, Counter>;
}

/// Trait for convenience methods for counters
///
/// This trait specifically implements increment and decrement convenience
/// methods for counters with `i64` types.
pub trait CountedExt: Counted<i64> {
    /// Increment the counter by 1
    fn incr(&self, key: &str) -> MetricResult<Counter> {
        self.incr_with_tags(key).try_send()
    }

    /// Increment the counter by 1 and return a `MetricBuilder` that can
    /// be used to add tags to the metric.
    fn incr_with_tags<'a>(&'a self, key: &'a str) -> MetricBuilder<'a, 'a, Counter> {
        self.count_with_tags(key, 1)
    }

    /// Decrement the counter by 1
    fn decr(&self, key: &str) -> MetricResult<Counter> {
        self.decr_with_tags(key).try_send()
    }

    /// Decrement the counter by 1 and return a `MetricBuilder` that can
    /// be used to add tags to the metric.
    fn decr_with_tags<'a>(&'a self, key: &'a str) -> MetricBuilder<'a, 'a, Counter> {
        self.count_with_tags(key, -1)
    }
}

/// Trait for recording timings in milliseconds.
///
/// The following types are valid for timers:
/// * `u64`
/// * `f64`
/// * `Duration`
pub trait Timed<T>
where
    T: ToTimerValue,
{
    /// Record a timing in milliseconds with the given key
    fn time(&self, key: &str, time: T) -> MetricResult<Timer> {
        self.time_with_tags(key, time).try_send()
    }

    /// Record a timing in milliseconds with the given key and return a
    /// `MetricBuilder` that can be used to add tags to the metric.
    fn time_with_tags<'a>(&'a self, key: &'a str, time: T) -> MetricBuilder<'a, 'a, Timer>;
}

/// Trait for recording gauge values.
///
/// Gauge values are an instantaneous measurement of a value determined
/// by the client. They do not change unless changed by the client. Examples
/// include things like load average or how many connections are active.
///
/// The following types are valid for gauges:
/// * `f64`
/// * `i64`, so gauges may go negative
pub trait Gauged<T>
where
    T: ToGaugeValue,
{
    /// Record a gauge value with the given key
    fn gauge(&self, key: &str, value: T) -> MetricResult<Gauge> {
        self.gauge_with_tags(key, value).try_send()
    }

    /// Record a gauge value with the given key and return a `MetricBuilder`
    /// that can be used to add tags to the metric.
    fn gauge_with_tags<'a>(&'a self, key: &'a str, value: T) -> MetricBuilder<'a, 'a, Gauge>;
}

/// Trait for recording histogram values.
///
/// Histogram values are positive values that can represent anything, whose
/// statistical distribution is calculated by the agent.
///
/// The following types are valid for histograms:
/// * `f64`
/// * `u64`
/// * `Duration`, recorded as fractional milliseconds
pub trait Histogrammed<T>
where
    T: ToHistogramValue,
{
    /// Record a single histogram value with the given key
    fn histogram(&self, key: &str, value: T) -> MetricResult<Histogram> {
        self.histogram_with_tags(key, value).try_send()
    }

    /// Record a single histogram value with the given key and return a
    /// `MetricBuilder` that can be used to add tags to the metric.
    fn histogram_with_tags<'a>(&'a self, key: &'a str, value: T) -> MetricBuilder<'a, 'a, Histogram>;
}

/// Trait for recording distribution values.
///
/// Similar to histograms, but the statistical distribution is computed
/// globally by Datadog rather than per agent.
///
/// The following types are valid for distributions:
/// * `f64`
/// * `u64`
pub trait Distributed<T>
where
    T: ToDistributionValue,
{
    /// Record a single distribution value with the given key
    fn distribution(&self, key: &str, value: T) -> MetricResult<Distribution> {
        self.distribution_with_tags(key, value).try_send()
    }

    /// Record a single distribution value with the given key and return a
    /// `MetricBuilder` that can be used to add tags to the metric.
    fn distribution_with_tags<'a>(&'a self, key: &'a str, value: T) -> MetricBuilder<'a, 'a, Distribution>;
}

/// Trait for recording set values.
///
/// Sets count the number of unique elements in a group. You can use them to,
/// for example, count the unique visitors to your site.
///
/// The following types are valid for sets:
/// * `i64`
pub trait Setted<T>
where
    T: ToSetValue,
{
    /// Record a single set value with the given key
    fn set(&self, key: &str, value: T) -> MetricResult<Set> {
        self.set_with_tags(key, value).try_send()
    }

    /// Record a single set value with the given key and return a
    /// `MetricBuilder` that can be used to add tags to the metric.
    fn set_with_tags<'a>(&'a self, key: &'a str, value: T) -> MetricBuilder<'a, 'a, Set>;
}

/// Trait that encompasses all other traits for sending metrics.
///
/// If you wish to use `DogStatsdClient` with a generic type or place a
/// `DogStatsdClient` instance behind a pointer (such as a `Box`) this will allow
/// you to reference all the implemented methods for recording metrics, while
/// using a single trait. An example of this is shown below.
///
/// ```
/// use std::time::Duration;
/// use ddsubmit::{MetricClient, DogStatsdClient, NopMetricSink, ServiceCheckStatus};
///
/// let client: Box<dyn MetricClient> = Box::new(DogStatsdClient::from_sink(NopMetricSink));
///
/// client.count("some.counter", 1).unwrap();
/// client.incr("some.counter").unwrap();
/// client.time("some.timer", 42).unwrap();
/// client.time("some.timer", Duration::from_millis(42)).unwrap();
/// client.gauge("some.gauge", 75.5).unwrap();
/// client.gauge("some.gauge", 8).unwrap();
/// client.histogram("some.histogram", 4).unwrap();
/// client.histogram("some.histogram", Duration::from_micros(1500)).unwrap();
/// client.distribution("some.distribution", 0.25).unwrap();
/// client.set("some.set", 5).unwrap();
/// client.event("Deploy finished", "Version 42 is live").unwrap();
/// client.service_check("myapp.db.connection", ServiceCheckStatus::Ok).unwrap();
/// ```
pub trait MetricClient:
    Counted<i64>
    + CountedExt
    + Timed<u64>
    + Timed<f64>
    + Timed<Duration>
    + Gauged<f64>
    + Gauged<i64>
    + Histogrammed<f64>
    + Histogrammed<u64>
    + Histogrammed<Duration>
    + Distributed<f64>
    + Distributed<u64>
    + Setted<i64>
    + Evented
    + ServiceChecked
{
}

/// Typically internal client methods for sending metrics and handling errors.
///
/// This trait exposes methods of the client that would normally be internal
/// but may be useful for consumers of the library to extend it in unforeseen
/// ways. It is only exposed in the `ext` module, not the `prelude`.
///
/// NOTE: This is a sealed trait and so it cannot be implemented outside of the
/// library.
///
/// # Example
///
/// ```
/// use ddsubmit::{Metric, MetricResult, DogStatsdClient, NopMetricSink};
/// use ddsubmit::ext::MetricBackend;
///
/// struct RawDatagram {
///     repr: String,
/// }
///
/// impl Metric for RawDatagram {
///     fn as_metric_str(&self) -> &str {
///         &self.repr
///     }
/// }
///
/// let client = DogStatsdClient::from_sink(NopMetricSink);
/// let datagram = RawDatagram { repr: "myapp.queue.depth:3|g".to_string() };
///
/// client.send_metric(&datagram).unwrap();
/// ```
pub trait MetricBackend: Sealed {
    /// Send a fully formed `Metric` implementation via the underlying `MetricSink`
    ///
    /// The metric is expected to be fully formed already, including any
    /// namespace or tags. It is sent verbatim.
    fn send_metric<M>(&self, metric: &M) -> MetricResult<()>
    where
        M: Metric;

    /// Consume a possible error from attempting to send a metric.
    ///
    /// When callers have elected to quietly send metrics via the
    /// `MetricBuilder::send()` method, this method will be invoked if an error
    /// is encountered. By default the error is logged at `warn` level.
    fn consume_error(&self, err: MetricError);
}

/// Builder for creating and customizing `DogStatsdClient` instances.
///
/// Instances of the builder should be created by calling the `::builder()`
/// method on the `DogStatsdClient` struct.
///
/// # Example
///
/// ```
/// use ddsubmit::prelude::*;
/// use ddsubmit::{MetricError, DogStatsdClient, NopMetricSink};
///
/// fn my_error_handler(err: MetricError) {
///     println!("Metric error! {}", err);
/// }
///
/// let client = DogStatsdClient::builder(NopMetricSink)
///     .with_namespace("myapp")
///     .with_error_handler(my_error_handler)
///     .with_constant_tag("env", "prod")
///     .with_constant_tag_value("rust")
///     .build();
///
/// client.count_with_tags("some.counter", 42)
///     .with_tag("region", "us-east-2")
///     .send();
/// ```
pub struct DogStatsdClientBuilder {
    namespace: String,
    sink: Box<dyn MetricSink + Sync + Send + RefUnwindSafe>,
    errors: Box<dyn Fn(MetricError) + Sync + Send + RefUnwindSafe>,
    tags: Vec<String>,
}

impl DogStatsdClientBuilder {
    // Set the required fields and defaults for optional fields
    fn new<T>(sink: T) -> Self
    where
        T: MetricSink + Sync + Send + RefUnwindSafe + 'static,
    {
        DogStatsdClientBuilder {
            sink: Box::new(sink),
            namespace: String::new(),
            errors: Box::new(log_error_handler),
            tags: Vec::new(),
        }
    }

    /// Prefix every metric name with the namespace followed by a `.`
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = Self::formatted_namespace(namespace);
        self
    }

    /// Set an error handler to use for metrics sent via `MetricBuilder::send()`
    ///
    /// The error handler is only invoked when metrics are not able to be sent
    /// correctly. Either due to invalid input, I/O errors encountered when trying
    /// to send them via a `MetricSink`, or some other reason.
    ///
    /// The error handler should consume the error without panicking.
    pub fn with_error_handler<F>(mut self, errors: F) -> Self
    where
        F: Fn(MetricError) + Sync + Send + RefUnwindSafe + 'static,
    {
        self.errors = Box::new(errors);
        self
    }

    /// Add a constant tag with key and value to every metric published by the
    /// built [DogStatsdClient].
    pub fn with_constant_tag<K, V>(mut self, key: K, value: V) -> Self
    where
        K: fmt::Display,
        V: fmt::Display,
    {
        self.tags.push(format!("{}:{}", key, value));
        self
    }

    /// Add a constant tag with only a value (or a preformatted `key:value`)
    /// to every metric published by the built [DogStatsdClient].
    pub fn with_constant_tag_value<K>(mut self, value: K) -> Self
    where
        K: ToString,
    {
        self.tags.push(value.to_string());
        self
    }

    /// Construct a new `DogStatsdClient` instance based on current settings.
    pub fn build(self) -> DogStatsdClient {
        DogStatsdClient::from_builder(self)
    }

    fn formatted_namespace(namespace: &str) -> String {
        let trimmed = namespace.trim_end_matches('.');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("{}.", trimmed)
        }
    }
}

/// Client for a DogStatsD agent that implements various traits to record metrics.
///
/// # Traits
///
/// * `Counted` and `CountedExt` for emitting counters.
/// * `Timed` for emitting timings.
/// * `Gauged` for emitting gauge values.
/// * `Histogrammed` for emitting histogram values.
/// * `Distributed` for emitting distribution values.
/// * `Setted` for emitting set values.
/// * `Evented` for posting events.
/// * `ServiceChecked` for reporting service checks.
/// * `MetricClient` for a combination of all of the above.
///
/// # Delivery
///
/// Every call writes exactly one datagram to the sink immediately, in the
/// caller's thread. Nothing is buffered, retried, or acknowledged: over UDP a
/// datagram sent when no agent is listening is silently lost.
///
/// # Threading
///
/// The client is `Send` and `Sync`. Wrap it in an `Arc` to share it between
/// threads.
///
/// ```no_run
/// use std::sync::Arc;
/// use std::thread;
/// use ddsubmit::prelude::*;
/// use ddsubmit::{AgentConfig, DogStatsdClient};
///
/// let client = Arc::new(DogStatsdClient::from_config(&AgentConfig::default()).unwrap());
/// let worker = client.clone();
///
/// thread::spawn(move || {
///     worker.incr("myapp.jobs.started").ok();
/// }).join().unwrap();
/// ```
pub struct DogStatsdClient {
    namespace: String,
    sink: Box<dyn MetricSink + Sync + Send + RefUnwindSafe>,
    errors: Box<dyn Fn(MetricError) + Sync + Send + RefUnwindSafe>,
    tags: Vec<String>,
}

impl DogStatsdClient {
    /// Create a new client that sends to the agent described by `config`.
    ///
    /// A Unix datagram socket is used when the configuration has a socket path,
    /// otherwise a non-blocking UDP socket bound to an ephemeral local port.
    ///
    /// # Example
    ///
    /// ```
    /// use ddsubmit::{AgentConfig, DogStatsdClient};
    ///
    /// let client = DogStatsdClient::from_config(&AgentConfig::default().with_host("127.0.0.1"));
    /// assert!(client.is_ok());
    /// ```
    ///
    /// # Failures
    ///
    /// This method may fail if the local socket can't be created or the agent's
    /// host can't be resolved.
    pub fn from_config(config: &AgentConfig) -> MetricResult<Self> {
        let builder = match config.socket_path() {
            Some(path) => {
                log::debug!("sending DogStatsD datagrams to {}", path.display());
                Self::unix_builder(path)?
            }
            None => {
                let (host, port) = config.address();
                log::debug!("sending DogStatsD datagrams to {}:{}", host, port);
                Self::builder(Self::udp_sink(config.address())?)
            }
        };

        Ok(config
            .constant_tags()
            .iter()
            .fold(builder.with_namespace(config.namespace()), |b, tag| {
                b.with_constant_tag_value(tag)
            })
            .build())
    }

    /// Create a new client that sends datagrams over UDP to the given address.
    ///
    /// # Example
    ///
    /// ```
    /// use ddsubmit::{DogStatsdClient, DEFAULT_PORT};
    ///
    /// let client = DogStatsdClient::from_udp_host(("127.0.0.1", DEFAULT_PORT));
    /// assert!(client.is_ok());
    /// ```
    pub fn from_udp_host<A>(addr: A) -> MetricResult<Self>
    where
        A: ToSocketAddrs,
    {
        Ok(Self::from_sink(Self::udp_sink(addr)?))
    }

    /// Create a new client instance that will emit datagrams to the given
    /// `MetricSink` implementation, with no namespace or constant tags.
    ///
    /// # Example
    ///
    /// ```
    /// use ddsubmit::{DogStatsdClient, NopMetricSink};
    ///
    /// let client = DogStatsdClient::from_sink(NopMetricSink);
    /// ```
    pub fn from_sink<T>(sink: T) -> Self
    where
        T: MetricSink + Sync + Send + RefUnwindSafe + 'static,
    {
        Self::builder(sink).build()
    }

    /// Create a new builder with the provided metric sink.
    ///
    /// General defaults:
    ///
    /// * No namespace and no constant tags.
    /// * Errors from `MetricBuilder::send()` are logged at `warn` level.
    pub fn builder<T>(sink: T) -> DogStatsdClientBuilder
    where
        T: MetricSink + Sync + Send + RefUnwindSafe + 'static,
    {
        DogStatsdClientBuilder::new(sink)
    }

    /// Flush the underlying metric sink.
    pub fn flush(&self) -> MetricResult<()> {
        Ok(self.sink.flush()?)
    }

    fn udp_sink<A>(addr: A) -> MetricResult<UdpMetricSink>
    where
        A: ToSocketAddrs,
    {
        // The local socket must share the agent's address family.
        let addr = get_addr(addr)?;
        let socket = if addr.is_ipv6() {
            UdpSocket::bind("[::]:0")?
        } else {
            UdpSocket::bind("0.0.0.0:0")?
        };
        socket.set_nonblocking(true)?;
        UdpMetricSink::from(addr, socket)
    }

    #[cfg(unix)]
    fn unix_builder(path: &std::path::Path) -> MetricResult<DogStatsdClientBuilder> {
        let socket = std::os::unix::net::UnixDatagram::unbound()?;
        socket.set_nonblocking(true)?;
        Ok(Self::builder(crate::sinks::UnixMetricSink::from(path, socket)))
    }

    #[cfg(not(unix))]
    fn unix_builder(_path: &std::path::Path) -> MetricResult<DogStatsdClientBuilder> {
        Err(MetricError::from((
            ErrorKind::InvalidInput,
            "Unix socket paths are only supported on Unix platforms",
        )))
    }

    // Create a new DogStatsdClient by consuming the builder
    fn from_builder(builder: DogStatsdClientBuilder) -> Self {
        DogStatsdClient {
            namespace: builder.namespace,
            sink: builder.sink,
            errors: builder.errors,
            tags: builder.tags,
        }
    }

    pub(crate) fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    fn metric_builder<'a, T>(
        &'a self,
        value: MetricResult<MetricValue>,
        formatter: fn(&'a str, &'a str, MetricValue) -> MetricFormatter<'a>,
        key: &'a str,
    ) -> MetricBuilder<'a, 'a, T>
    where
        T: Metric + From<String>,
    {
        match value {
            Ok(v) => MetricBuilder::from_fmt(formatter(&self.namespace, key, v), self).with_constant_tags(self.tags()),
            Err(e) => MetricBuilder::from_error(e, self),
        }
    }
}

impl Sealed for DogStatsdClient {}

impl MetricBackend for DogStatsdClient {
    fn send_metric<M>(&self, metric: &M) -> MetricResult<()>
    where
        M: Metric,
    {
        self.sink.emit(metric.as_metric_str())?;
        Ok(())
    }

    fn consume_error(&self, err: MetricError) {
        (self.errors)(err);
    }
}

impl fmt::Debug for DogStatsdClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DogStatsdClient {{ namespace: {:?}, sink: ..., errors: ..., tags: {:?} }}",
            self.namespace, self.tags,
        )
    }
}

impl<T> Counted<T> for DogStatsdClient
where
    T: ToCounterValue,
{
    fn count_with_tags<'a>(&'a self, key: &'a str, value: T) -> MetricBuilder<'a, 'a, Counter> {
        self.metric_builder(value.try_to_value(), MetricFormatter::counter, key)
    }
}

impl CountedExt for DogStatsdClient {}

impl<T> Timed<T> for DogStatsdClient
where
    T: ToTimerValue,
{
    fn time_with_tags<'a>(&'a self, key: &'a str, time: T) -> MetricBuilder<'a, 'a, Timer> {
        self.metric_builder(time.try_to_value(), MetricFormatter::timer, key)
    }
}

impl<T> Gauged<T> for DogStatsdClient
where
    T: ToGaugeValue,
{
    fn gauge_with_tags<'a>(&'a self, key: &'a str, value: T) -> MetricBuilder<'a, 'a, Gauge> {
        self.metric_builder(value.try_to_value(), MetricFormatter::gauge, key)
    }
}

impl<T> Histogrammed<T> for DogStatsdClient
where
    T: ToHistogramValue,
{
    fn histogram_with_tags<'a>(&'a self, key: &'a str, value: T) -> MetricBuilder<'a, 'a, Histogram> {
        self.metric_builder(value.try_to_value(), MetricFormatter::histogram, key)
    }
}

impl<T> Distributed<T> for DogStatsdClient
where
    T: ToDistributionValue,
{
    fn distribution_with_tags<'a>(&'a self, key: &'a str, value: T) -> MetricBuilder<'a, 'a, Distribution> {
        self.metric_builder(value.try_to_value(), MetricFormatter::distribution, key)
    }
}

impl<T> Setted<T> for DogStatsdClient
where
    T: ToSetValue,
{
    fn set_with_tags<'a>(&'a self, key: &'a str, value: T) -> MetricBuilder<'a, 'a, Set> {
        self.metric_builder(value.try_to_value(), MetricFormatter::set, key)
    }
}

impl MetricClient for DogStatsdClient {}

fn log_error_handler(err: MetricError) {
    log::warn!("failed to send metric: {}", err);
}

#[cfg(test)]
mod tests {
    use super::{
        Counted, CountedExt, DogStatsdClient, Distributed, Gauged, Histogrammed, MetricClient, Setted, Timed,
    };
    use crate::config::AgentConfig;
    use crate::sinks::{NopMetricSink, SpyMetricSink};
    use crate::test::ErrorMetricSink;
    use crate::types::{ErrorKind, Metric};
    use std::panic::RefUnwindSafe;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_dogstatsd_client_no_namespace() {
        let client = DogStatsdClient::from_sink(NopMetricSink);
        let res = client.count("some.method", 1);

        assert_eq!("some.method:1|c", res.unwrap().as_metric_str());
    }

    #[test]
    fn test_dogstatsd_client_namespace_not_doubled() {
        for ns in ["myapp", "myapp."] {
            let client = DogStatsdClient::builder(NopMetricSink).with_namespace(ns).build();
            let res = client.incr("requests");

            assert_eq!("myapp.requests:1|c", res.unwrap().as_metric_str());
        }
    }

    #[test]
    fn test_dogstatsd_client_empty_namespace() {
        let client = DogStatsdClient::builder(NopMetricSink).with_namespace("").build();
        let res = client.gauge("load", 2);

        assert_eq!("load:2|g", res.unwrap().as_metric_str());
    }

    #[test]
    fn test_dogstatsd_client_merging_constant_tags_with_tags() {
        let client = DogStatsdClient::builder(NopMetricSink)
            .with_namespace("prefix")
            .with_constant_tag("hello", "world")
            .with_constant_tag_value("production")
            .build();
        let res = client
            .count_with_tags("some.counter", 3)
            .with_tag("foo", "bar")
            .with_tag_value("fizz")
            .with_tags(["bucket:123"])
            .try_send();

        assert_eq!(
            "prefix.some.counter:3|c|#hello:world,production,foo:bar,fizz,bucket:123",
            res.unwrap().as_metric_str()
        );
    }

    #[test]
    fn test_dogstatsd_client_gauge_with_tags() {
        let client = DogStatsdClient::from_sink(NopMetricSink);
        let res = client
            .gauge_with_tags("myapp.cpu_load", 75.5)
            .with_tags(["env:prod", "host:webserver"])
            .try_send();

        assert_eq!(
            "myapp.cpu_load:75.5|g|#env:prod,host:webserver",
            res.unwrap().as_metric_str()
        );
    }

    #[test]
    fn test_dogstatsd_client_incr_with_tags_default_amount() {
        let client = DogStatsdClient::from_sink(NopMetricSink);
        let res = client
            .incr_with_tags("myapp.request_count")
            .with_tags(["env:prod", "endpoint:/api"])
            .try_send();

        assert_eq!(
            "myapp.request_count:1|c|#env:prod,endpoint:/api",
            res.unwrap().as_metric_str()
        );
    }

    #[test]
    fn test_dogstatsd_client_decr() {
        let client = DogStatsdClient::from_sink(NopMetricSink);
        assert_eq!("some.counter:-1|c", client.decr("some.counter").unwrap().as_metric_str());
    }

    #[test]
    fn test_dogstatsd_client_gauge_signed() {
        let client = DogStatsdClient::from_sink(NopMetricSink);

        assert_eq!("temp:-4|g", client.gauge("temp", -4).unwrap().as_metric_str());
        assert_eq!("temp:4|g", client.gauge("temp", 4).unwrap().as_metric_str());
    }

    #[test]
    fn test_dogstatsd_client_gauge_not_finite() {
        let client = DogStatsdClient::from_sink(NopMetricSink);

        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = client.gauge("some.gauge", value).unwrap_err();
            assert_eq!(ErrorKind::InvalidInput, err.kind());
        }
    }

    #[test]
    fn test_dogstatsd_client_time_duration() {
        let client = DogStatsdClient::from_sink(NopMetricSink);
        let res = client.time("key", Duration::from_millis(157));

        assert_eq!("key:157|ms", res.unwrap().as_metric_str());
    }

    #[test]
    fn test_dogstatsd_client_time_duration_with_overflow() {
        let client = DogStatsdClient::from_sink(NopMetricSink);
        let res = client.time("key", Duration::from_secs(u64::MAX));

        assert_eq!(ErrorKind::InvalidInput, res.unwrap_err().kind());
    }

    #[test]
    fn test_dogstatsd_client_time_float() {
        let client = DogStatsdClient::from_sink(NopMetricSink);
        let res = client.time("key", 12.5);

        assert_eq!("key:12.5|ms", res.unwrap().as_metric_str());
    }

    #[test]
    fn test_dogstatsd_client_histogram_duration_as_millis() {
        let client = DogStatsdClient::from_sink(NopMetricSink);
        let res = client.histogram("key", Duration::from_micros(1500));

        assert_eq!("key:1.5|h", res.unwrap().as_metric_str());
    }

    #[test]
    fn test_dogstatsd_client_histogram_with_tags() {
        let client = DogStatsdClient::from_sink(NopMetricSink);
        let res = client
            .histogram_with_tags("some.histo", 27)
            .with_tag("host", "www03.example.com")
            .with_tag_value("rc1")
            .try_send();

        assert_eq!(
            "some.histo:27|h|#host:www03.example.com,rc1",
            res.unwrap().as_metric_str()
        );
    }

    #[test]
    fn test_dogstatsd_client_distribution() {
        let client = DogStatsdClient::from_sink(NopMetricSink);

        assert_eq!("key:0.25|d", client.distribution("key", 0.25).unwrap().as_metric_str());
        assert_eq!("key:7|d", client.distribution("key", 7u64).unwrap().as_metric_str());
    }

    #[test]
    fn test_dogstatsd_client_set() {
        let client = DogStatsdClient::from_sink(NopMetricSink);

        assert_eq!("users:42|s", client.set("users", 42).unwrap().as_metric_str());
    }

    #[test]
    fn test_dogstatsd_client_send_emits_to_sink() {
        let (rx, sink) = SpyMetricSink::new();
        let client = DogStatsdClient::from_sink(sink);

        client
            .gauge_with_tags("myapp.cpu_load", 75.5)
            .with_tags(["env:prod", "host:webserver"])
            .send();
        client
            .incr_with_tags("myapp.request_count")
            .with_tags(["env:prod", "endpoint:/api"])
            .send();

        let sent: Vec<String> = rx.try_iter().map(|v| String::from_utf8(v).unwrap()).collect();
        assert_eq!(
            vec![
                "myapp.cpu_load:75.5|g|#env:prod,host:webserver".to_string(),
                "myapp.request_count:1|c|#env:prod,endpoint:/api".to_string(),
            ],
            sent
        );
    }

    #[test]
    fn test_dogstatsd_client_invalid_value_reaches_error_handler() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_ref = count.clone();

        let (rx, sink) = SpyMetricSink::new();
        let client = DogStatsdClient::builder(sink)
            .with_error_handler(move |e| {
                assert_eq!(ErrorKind::InvalidInput, e.kind());
                count_ref.fetch_add(1, Ordering::Release);
            })
            .build();

        client.gauge_with_tags("some.gauge", f64::NAN).with_tag("env", "prod").send();

        assert_eq!(1, count.load(Ordering::Acquire));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dogstatsd_client_sink_error_invokes_handler_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_ref = count.clone();

        let sink = ErrorMetricSink::always();
        let attempts = sink.attempts();
        let client = DogStatsdClient::builder(sink)
            .with_error_handler(move |_e| {
                count_ref.fetch_add(1, Ordering::Release);
            })
            .build();

        client.incr_with_tags("some.counter").send();

        assert_eq!(1, count.load(Ordering::Acquire));
        assert_eq!(1, attempts.load(Ordering::Acquire));
    }

    #[test]
    fn test_dogstatsd_client_default_handler_does_not_panic() {
        let client = DogStatsdClient::from_sink(ErrorMetricSink::always());
        client.incr_with_tags("some.counter").send();
    }

    #[test]
    fn test_dogstatsd_client_from_config_applies_namespace_and_tags() {
        let config = AgentConfig::default()
            .with_host("127.0.0.1")
            .with_namespace("myapp")
            .with_constant_tag("env:prod");
        let client = DogStatsdClient::from_config(&config).unwrap();
        let res = client.gauge_with_tags("cpu_load", 1).with_tag("host", "web").try_send();

        assert_eq!("myapp.cpu_load:1|g|#env:prod,host:web", res.unwrap().as_metric_str());
    }

    #[test]
    fn test_dogstatsd_client_as_metric_client() {
        let client: Box<dyn MetricClient + Send + Sync + RefUnwindSafe> =
            Box::new(DogStatsdClient::from_sink(NopMetricSink));

        assert_eq!("some.counter:3|c", client.count("some.counter", 3).unwrap().as_metric_str());
        assert_eq!("some.counter:1|c", client.incr("some.counter").unwrap().as_metric_str());
    }

    #[test]
    fn test_dogstatsd_client_flush() {
        let client = DogStatsdClient::from_sink(NopMetricSink);
        assert!(client.flush().is_ok());
    }
}
