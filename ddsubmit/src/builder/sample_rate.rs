// ddsubmit - Submit custom metrics to Datadog from Rust!
//
// Copyright 2026 The ddsubmit Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use super::MetricType;
use crate::types::{ErrorKind, MetricError};

/// Fraction of occurrences a metric is sent for, in `(0.0, 1.0]`.
///
/// The agent multiplies values it receives by the inverse of the rate. Only
/// counters, histograms, distributions, and timers are scaled by the agent so
/// the rate is never written for other metric types.
#[derive(Debug, Clone)]
pub(crate) struct SampleRate {
    value: f32,
    repr: String,
}

impl SampleRate {
    const MIN_SIZE: usize = 3;

    fn new(value: f32) -> Self {
        let mut repr = format!("@{:.6}", value);
        while repr.len() > Self::MIN_SIZE && repr.ends_with('0') {
            repr.pop();
        }
        if repr.ends_with('.') {
            repr.pop();
        }

        // A rate that renders as one is sent unsampled.
        let value = if repr == "@1" { 1.0 } else { value };
        Self { value, repr }
    }

    pub(crate) fn is_applicable_to_metric(&self, metric_type: MetricType) -> bool {
        match metric_type {
            MetricType::Counter | MetricType::Histogram | MetricType::Distribution | MetricType::Timer => {
                self.value < 1.0
            }
            _ => false,
        }
    }

    pub(crate) fn value(&self) -> f32 {
        self.value
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.repr
    }
}

impl TryFrom<f32> for SampleRate {
    type Error = MetricError;

    fn try_from(rate: f32) -> Result<Self, Self::Error> {
        // rates that would be written as "@0." can't be honored by the agent
        if (0.000_001..=1.0).contains(&rate) {
            Ok(Self::new(rate))
        } else {
            Err(MetricError::from((
                ErrorKind::InvalidInput,
                "Sample rate must be greater than 0.0 and at most 1.0",
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SampleRate;
    use crate::builder::{MetricBuilder, MetricFormatter, MetricValue};
    use crate::client::{Counted, DogStatsdClient};
    use crate::sinks::{NopMetricSink, SpyMetricSink};
    use crate::types::{Counter, ErrorKind};
    use std::sync::Arc;

    fn rate(value: f32) -> SampleRate {
        SampleRate::try_from(value).unwrap()
    }

    #[test]
    fn test_sample_rate_trims_trailing_zeros() {
        assert_eq!("@0.5", rate(0.5).as_str());
        assert_eq!("@0.25", rate(0.25).as_str());
        assert_eq!("@0.018519", rate(1.0 / 54.0).as_str());
    }

    #[test]
    fn test_sample_rate_out_of_range() {
        for value in [0.0, -0.5, 1.01, f32::NAN] {
            let err = SampleRate::try_from(value).unwrap_err();
            assert_eq!(ErrorKind::InvalidInput, err.kind(), "rate: {}", value);
        }
    }

    #[test]
    fn test_metric_formatter_counter_with_sample_rate() {
        let mut fmt = MetricFormatter::counter("prefix.", "some.key", MetricValue::Signed(4));
        fmt.with_sample_rate(rate(0.5));

        assert_eq!("prefix.some.key:4|c|@0.5", &fmt.format())
    }

    #[test]
    fn test_sample_rate_precedes_tags() {
        let mut fmt = MetricFormatter::counter("", "some.key", MetricValue::Signed(4));
        fmt.with_sample_rate(rate(0.1));
        fmt.with_tag_value("env:prod");

        assert_eq!("some.key:4|c|@0.1|#env:prod", &fmt.format())
    }

    #[test]
    fn test_doesnt_write_default_sample_rate() {
        let mut fmt = MetricFormatter::counter("prefix.", "some.key", MetricValue::Signed(4));
        fmt.with_sample_rate(rate(1.0));

        assert_eq!("prefix.some.key:4|c", &fmt.format())
    }

    #[test]
    fn test_rate_rounding_to_one_is_not_written() {
        let near_one = rate(0.999_999_9);
        assert_eq!("@1", near_one.as_str());
        assert_eq!(1.0, near_one.value());

        let mut fmt = MetricFormatter::counter("", "k", MetricValue::Signed(1));
        fmt.with_sample_rate(near_one);

        assert_eq!("k:1|c", &fmt.format())
    }

    #[test]
    fn test_rate_rounding_to_one_sends_every_metric() {
        let (rx, sink) = SpyMetricSink::new();
        let client = DogStatsdClient::from_sink(sink);

        for _ in 0..20 {
            client.count_with_tags("k", 1).with_sampling_rate(0.999_999_9).try_send().unwrap();
        }

        let sent: Vec<_> = rx.try_iter().map(|b| String::from_utf8(b).unwrap()).collect();
        assert_eq!(vec!["k:1|c".to_string(); 20], sent);
    }

    #[test]
    fn test_only_writes_when_applicable_to_metric() {
        let mut counter = MetricFormatter::counter("prefix.", "some.key", MetricValue::Signed(4));
        counter.with_sample_rate(rate(0.5));
        let mut histogram = MetricFormatter::histogram("prefix.", "some.key", MetricValue::Float(3.15));
        histogram.with_sample_rate(rate(0.5));
        let mut timer = MetricFormatter::timer("prefix.", "some.key", MetricValue::Float(3.15));
        timer.with_sample_rate(rate(0.5));
        let mut distribution = MetricFormatter::distribution("prefix.", "some.key", MetricValue::Float(3.15));
        distribution.with_sample_rate(rate(0.5));

        assert_eq!("prefix.some.key:4|c|@0.5", &counter.format());
        assert_eq!("prefix.some.key:3.15|h|@0.5", &histogram.format());
        assert_eq!("prefix.some.key:3.15|ms|@0.5", &timer.format());
        assert_eq!("prefix.some.key:3.15|d|@0.5", &distribution.format());

        let mut set = MetricFormatter::set("prefix.", "some.key", MetricValue::Signed(4));
        set.with_sample_rate(rate(0.5));
        let mut gauge = MetricFormatter::gauge("prefix.", "some.key", MetricValue::Signed(4));
        gauge.with_sample_rate(rate(0.5));

        assert_eq!("prefix.some.key:4|s", &set.format());
        assert_eq!("prefix.some.key:4|g", &gauge.format());
    }

    #[cfg(feature = "sample-rate")]
    #[test]
    fn test_metric_builder_try_send_actually_samples() {
        let rx = {
            let (rx, sink) = SpyMetricSink::new();
            let client = Arc::new(DogStatsdClient::from_sink(sink));

            let _ = (0..10)
                .map(|_| {
                    let local_client = client.clone();

                    std::thread::spawn(move || {
                        for i in 0..10 {
                            let mut fmt = MetricFormatter::counter("", "some.counter", MetricValue::Signed(i));
                            fmt.with_sample_rate(rate(0.5));
                            let builder: MetricBuilder<'_, '_, Counter> = MetricBuilder::from_fmt(fmt, &local_client);

                            builder.try_send().unwrap();
                            std::thread::yield_now();
                        }
                    })
                })
                .map(|t| t.join().unwrap())
                .collect::<Vec<_>>();

            rx
        };

        let sent_metrics: Vec<_> = rx.iter().collect();

        assert!(!sent_metrics.is_empty()); // always happening (probably)
        assert!(sent_metrics.len() < 100); // never happening (probably)
    }

    #[test]
    fn test_try_send_with_sample_rate_success() {
        let client = DogStatsdClient::from_sink(NopMetricSink);
        let res = client.count_with_tags("some.counter", 11).with_sampling_rate(0.5).try_send();

        assert!(res.is_ok(), "expected Ok result from try_send");
    }
}
