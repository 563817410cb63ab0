// ddsubmit - Submit custom metrics to Datadog from Rust!
//
// Copyright 2026 The ddsubmit Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::builder::sample_rate::SampleRate;
use crate::builder::sampler::{Sampler, Sampling};
use crate::client::{DogStatsdClient, MetricBackend};
use crate::types::{Metric, MetricError, MetricResult};
use std::fmt::{self, Write};
use std::marker::PhantomData;

mod sample_rate;
mod sampler;

/// Type of metric that knows how to display itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MetricType {
    Counter,
    Timer,
    Gauge,
    Histogram,
    Set,
    Distribution,
}

impl MetricType {
    /// The agent only honors client supplied timestamps for gauges and counts.
    fn accepts_timestamp(self) -> bool {
        matches!(self, MetricType::Counter | MetricType::Gauge)
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MetricType::Counter => "c".fmt(f),
            MetricType::Timer => "ms".fmt(f),
            MetricType::Gauge => "g".fmt(f),
            MetricType::Histogram => "h".fmt(f),
            MetricType::Set => "s".fmt(f),
            MetricType::Distribution => "d".fmt(f),
        }
    }
}

/// Holder for primitive metric values that knows how to display itself
///
/// This type is internal to how the various value types accepted for each
/// kind of metric (`ToCounterValue`, `ToGaugeValue`, etc.) are formatted but
/// is exposed for advanced use cases via the `ext` module.
#[derive(Debug, Clone, Copy)]
pub enum MetricValue {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MetricValue::Signed(v) => v.fmt(f),
            MetricValue::Unsigned(v) => v.fmt(f),
            MetricValue::Float(v) => v.fmt(f),
        }
    }
}

const TAG_PREFIX: &str = "|#";

/// Append Datadog style tags (`|#key:value,value`) if there are any.
pub(crate) fn write_tags(out: &mut String, tags: &[(Option<&str>, &str)]) {
    if tags.is_empty() {
        return;
    }

    out.push_str(TAG_PREFIX);
    for (i, &(key, value)) in tags.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if let Some(key) = key {
            out.push_str(key);
            out.push(':');
        }
        out.push_str(value);
    }
}

#[derive(Debug, Clone)]
pub(crate) struct MetricFormatter<'a> {
    prefix: &'a str,
    key: &'a str,
    val: MetricValue,
    type_: MetricType,
    tags: Vec<(Option<&'a str>, &'a str)>,
    sample_rate: Option<SampleRate>,
    timestamp: Option<u64>,
    base_size: usize,
    kv_size: usize,
}

impl<'a> MetricFormatter<'a> {
    const TIMESTAMP_PREFIX: &'static str = "|T";

    pub(crate) fn counter(prefix: &'a str, key: &'a str, val: MetricValue) -> Self {
        Self::from_val(prefix, key, val, MetricType::Counter)
    }

    pub(crate) fn timer(prefix: &'a str, key: &'a str, val: MetricValue) -> Self {
        Self::from_val(prefix, key, val, MetricType::Timer)
    }

    pub(crate) fn gauge(prefix: &'a str, key: &'a str, val: MetricValue) -> Self {
        Self::from_val(prefix, key, val, MetricType::Gauge)
    }

    pub(crate) fn histogram(prefix: &'a str, key: &'a str, val: MetricValue) -> Self {
        Self::from_val(prefix, key, val, MetricType::Histogram)
    }

    pub(crate) fn distribution(prefix: &'a str, key: &'a str, val: MetricValue) -> Self {
        Self::from_val(prefix, key, val, MetricType::Distribution)
    }

    pub(crate) fn set(prefix: &'a str, key: &'a str, val: MetricValue) -> Self {
        Self::from_val(prefix, key, val, MetricType::Set)
    }

    #[rustfmt::skip]
    fn from_val(prefix: &'a str, key: &'a str, val: MetricValue, type_: MetricType) -> Self {
        MetricFormatter {
            prefix,
            key,
            type_,
            val,
            tags: Vec::new(),
            sample_rate: None,
            timestamp: None,
            // running totals of the bytes needed for the tags and the base metric so
            // that the output string can be allocated once.
            kv_size: 0,
            base_size: prefix.len() + key.len() + 1 /* : */ + 10 /* value */ + 1 /* | */ + 2, /* type */
        }
    }

    fn with_tag(&mut self, key: &'a str, value: &'a str) {
        self.tags.push((Some(key), value));
        self.kv_size += key.len() + 1 /* : */ + value.len();
    }

    fn with_tag_value(&mut self, value: &'a str) {
        self.tags.push((None, value));
        self.kv_size += value.len();
    }

    pub(crate) fn with_sample_rate(&mut self, rate: SampleRate) {
        self.sample_rate = Some(rate);
    }

    fn with_timestamp(&mut self, timestamp: u64) {
        self.timestamp = Some(timestamp);
    }

    /// Sample rate to annotate this metric with, if it applies to the metric type
    fn applicable_sample_rate(&self) -> Option<&SampleRate> {
        self.sample_rate
            .as_ref()
            .filter(|rate| rate.is_applicable_to_metric(self.type_))
    }

    /// Decide if this metric should actually be emitted based on its sample rate
    fn is_sampled_in(&self) -> bool {
        match self.applicable_sample_rate() {
            Some(rate) => Sampler::new_with_rate(rate.value()).sample(()).is_some(),
            None => true,
        }
    }

    fn write_base_metric(&self, out: &mut String) {
        let _ = write!(out, "{}{}:{}|{}", self.prefix, self.key, self.val, self.type_);
    }

    fn write_sample_rate(&self, out: &mut String) {
        if let Some(rate) = self.applicable_sample_rate() {
            out.push('|');
            out.push_str(rate.as_str());
        }
    }

    fn write_timestamp(&self, out: &mut String) {
        if let Some(ts) = self.timestamp.filter(|_| self.type_.accepts_timestamp()) {
            out.push_str(Self::TIMESTAMP_PREFIX);
            let _ = write!(out, "{}", ts);
        }
    }

    fn tag_size_hint(&self) -> usize {
        if self.tags.is_empty() {
            return 0;
        }

        // prefix, keys and values, commas
        TAG_PREFIX.len() + self.kv_size + self.tags.len() - 1
    }

    fn extension_size_hint(&self) -> usize {
        let rate = self.applicable_sample_rate().map(|r| r.as_str().len() + 1).unwrap_or(0);
        let ts = self.timestamp.map(|_| Self::TIMESTAMP_PREFIX.len() + 10).unwrap_or(0);
        rate + ts
    }

    pub(crate) fn format(&self) -> String {
        let size_hint = self.base_size + self.tag_size_hint() + self.extension_size_hint();
        let mut metric_string = String::with_capacity(size_hint);
        self.write_base_metric(&mut metric_string);
        self.write_sample_rate(&mut metric_string);
        write_tags(&mut metric_string, &self.tags);
        self.write_timestamp(&mut metric_string);
        metric_string
    }
}

/// Internal state of a `MetricBuilder`
///
/// The builder can either be in the process of formatting a metric to send
/// via a client or it can be simply holding on to an error that it will be
/// dealt with when `.try_send()` or `.send()` is finally invoked.
#[derive(Debug)]
enum BuilderRepr<'m, 'c> {
    Success(MetricFormatter<'m>, &'c DogStatsdClient),
    Error(MetricError, &'c DogStatsdClient),
}

/// Builder for adding tags and DogStatsD extensions to in-progress metrics.
///
/// This builder adds tags (key-value pairs, bare values, or preformatted
/// `key:value` strings), a sample rate, or a timestamp to a metric that was
/// previously constructed by a call to a method on `DogStatsdClient`. The
/// metric is sent via the client when `MetricBuilder::send()` or
/// `MetricBuilder::try_send()` is invoked. Any errors encountered constructing,
/// validating, or sending the metric are returned (or handed to the client's
/// error handler) at that point.
///
/// Tags use the Datadog format: `|#` followed by comma separated tags. Any
/// constant tags configured on the client come first, then the tags added
/// here in the order they were added.
///
/// # Examples
///
/// ## `.try_send()`
///
/// ```
/// use ddsubmit::prelude::*;
/// use ddsubmit::{DogStatsdClient, NopMetricSink, Metric};
///
/// let client = DogStatsdClient::from_sink(NopMetricSink);
/// let res = client.gauge_with_tags("myapp.cpu_load", 75.5)
///    .with_tags(["env:prod", "host:webserver"])
///    .try_send();
///
/// assert_eq!(
///     "myapp.cpu_load:75.5|g|#env:prod,host:webserver",
///     res.unwrap().as_metric_str()
/// );
/// ```
///
/// ## `.send()`
///
/// ```
/// use ddsubmit::prelude::*;
/// use ddsubmit::{DogStatsdClient, NopMetricSink};
///
/// let client = DogStatsdClient::builder(NopMetricSink)
///     .with_error_handler(|e| eprintln!("metric error: {}", e))
///     .build();
///
/// client.incr_with_tags("myapp.request_count")
///    .with_tag("env", "prod")
///    .with_tag("endpoint", "/api")
///    .send();
/// ```
///
/// Nothing is returned from `.send()`, any error is passed to the error handler.
#[must_use = "Did you forget to call .send() after adding tags?"]
#[derive(Debug)]
pub struct MetricBuilder<'m, 'c, T>
where
    T: Metric + From<String>,
{
    repr: BuilderRepr<'m, 'c>,
    type_: PhantomData<T>,
}

impl<'m, 'c, T> MetricBuilder<'m, 'c, T>
where
    T: Metric + From<String>,
{
    pub(crate) fn from_fmt(formatter: MetricFormatter<'m>, client: &'c DogStatsdClient) -> Self {
        MetricBuilder {
            repr: BuilderRepr::Success(formatter, client),
            type_: PhantomData,
        }
    }

    pub(crate) fn from_error(err: MetricError, client: &'c DogStatsdClient) -> Self {
        MetricBuilder {
            repr: BuilderRepr::Error(err, client),
            type_: PhantomData,
        }
    }

    /// Add the client's constant tags, which always precede per-metric tags.
    pub(crate) fn with_constant_tags<I>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = &'m str>,
    {
        if let BuilderRepr::Success(ref mut formatter, _) = self.repr {
            for tag in tags {
                formatter.with_tag_value(tag);
            }
        }
        self
    }

    /// Add a key-value tag to this metric.
    ///
    /// # Example
    ///
    /// ```
    /// use ddsubmit::prelude::*;
    /// use ddsubmit::{DogStatsdClient, NopMetricSink, Metric};
    ///
    /// let client = DogStatsdClient::from_sink(NopMetricSink);
    /// let res = client.count_with_tags("some.key", 1)
    ///    .with_tag("user", "authenticated")
    ///    .try_send();
    ///
    /// assert_eq!("some.key:1|c|#user:authenticated", res.unwrap().as_metric_str());
    /// ```
    pub fn with_tag(mut self, key: &'m str, value: &'m str) -> Self {
        if let BuilderRepr::Success(ref mut formatter, _) = self.repr {
            formatter.with_tag(key, value);
        }
        self
    }

    /// Add a value tag to this metric.
    pub fn with_tag_value(mut self, value: &'m str) -> Self {
        if let BuilderRepr::Success(ref mut formatter, _) = self.repr {
            formatter.with_tag_value(value);
        }
        self
    }

    /// Add several preformatted tags (`key:value` or bare values) to this metric.
    ///
    /// # Example
    ///
    /// ```
    /// use ddsubmit::prelude::*;
    /// use ddsubmit::{DogStatsdClient, NopMetricSink, Metric};
    ///
    /// let tags = vec!["env:prod".to_string(), "endpoint:/api".to_string()];
    /// let client = DogStatsdClient::from_sink(NopMetricSink);
    /// let res = client.incr_with_tags("myapp.request_count")
    ///    .with_tags(&tags)
    ///    .try_send();
    ///
    /// assert_eq!(
    ///     "myapp.request_count:1|c|#env:prod,endpoint:/api",
    ///     res.unwrap().as_metric_str()
    /// );
    /// ```
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = &'m S>,
        S: AsRef<str> + ?Sized + 'm,
    {
        if let BuilderRepr::Success(ref mut formatter, _) = self.repr {
            for tag in tags {
                formatter.with_tag_value(tag.as_ref());
            }
        }
        self
    }

    /// Set the sample rate of this metric.
    ///
    /// The rate must be in `(0.0, 1.0]`. It's written to the datagram (`|@0.5`)
    /// for counters, timers, histograms, and distributions only, so that the
    /// agent can scale the values it receives. With the `sample-rate` feature
    /// enabled the metric is also only emitted with the given probability.
    ///
    /// # Example
    ///
    /// ```
    /// use ddsubmit::prelude::*;
    /// use ddsubmit::{DogStatsdClient, NopMetricSink, Metric};
    ///
    /// let client = DogStatsdClient::from_sink(NopMetricSink);
    /// let res = client.count_with_tags("some.key", 1)
    ///    .with_sampling_rate(0.5)
    ///    .try_send();
    ///
    /// assert_eq!("some.key:1|c|@0.5", res.unwrap().as_metric_str());
    /// ```
    pub fn with_sampling_rate(mut self, rate: f32) -> Self {
        let next = match self.repr {
            BuilderRepr::Success(mut formatter, client) => match SampleRate::try_from(rate) {
                Ok(rate) => {
                    formatter.with_sample_rate(rate);
                    BuilderRepr::Success(formatter, client)
                }
                Err(e) => BuilderRepr::Error(e, client),
            },
            err @ BuilderRepr::Error(..) => err,
        };

        self.repr = next;
        self
    }

    /// Set the Unix timestamp (seconds) the value was observed at.
    ///
    /// The agent only honors timestamps on gauges and counters, so it is not
    /// written for any other metric type.
    ///
    /// # Example
    ///
    /// ```
    /// use ddsubmit::prelude::*;
    /// use ddsubmit::{DogStatsdClient, NopMetricSink, Metric};
    ///
    /// let client = DogStatsdClient::from_sink(NopMetricSink);
    /// let res = client.gauge_with_tags("some.key", 7)
    ///    .with_timestamp(1700000000)
    ///    .try_send();
    ///
    /// assert_eq!("some.key:7|g|T1700000000", res.unwrap().as_metric_str());
    /// ```
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        if let BuilderRepr::Success(ref mut formatter, _) = self.repr {
            formatter.with_timestamp(timestamp);
        }
        self
    }

    /// Send a metric using the client that created this builder.
    ///
    /// The formatted metric is returned even if it was sampled out and not
    /// actually emitted. The builder is consumed, so `.try_send()` can only be
    /// called once per builder.
    pub fn try_send(self) -> MetricResult<T> {
        match self.repr {
            BuilderRepr::Error(err, _) => Err(err),
            BuilderRepr::Success(ref formatter, client) => {
                let metric = T::from(formatter.format());
                if formatter.is_sampled_in() {
                    client.send_metric(&metric)?;
                }
                Ok(metric)
            }
        }
    }

    /// Send a metric using the client that created this builder, discarding
    /// successful results and invoking the client's error handler for errors.
    ///
    /// The default handler logs the error at `warn` level.
    pub fn send(self) {
        match self.repr {
            BuilderRepr::Error(err, client) => client.consume_error(err),
            BuilderRepr::Success(_, client) => {
                if let Err(e) = self.try_send() {
                    client.consume_error(e);
                }
            }
        }
    }
}
