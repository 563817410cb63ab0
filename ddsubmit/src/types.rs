// ddsubmit - Submit custom metrics to Datadog from Rust!
//
// Copyright 2026 The ddsubmit Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::builder::{MetricFormatter, MetricValue};
use std::error;
use std::fmt;
use std::io;

/// Trait for metrics to expose the DogStatsD datagram they were sent as.
pub trait Metric {
    fn as_metric_str(&self) -> &str;
}

macro_rules! metric_type {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(PartialEq, Eq, Debug, Hash, Clone)]
        pub struct $name {
            repr: String,
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name { repr: s }
            }
        }

        impl Metric for $name {
            fn as_metric_str(&self) -> &str {
                &self.repr
            }
        }
    };
}

metric_type!(
    /// Counters are simple values incremented or decremented by a client.
    ///
    /// See the `Counted` trait for more information.
    Counter
);

impl Counter {
    pub fn new(prefix: &str, key: &str, count: i64) -> Self {
        MetricFormatter::counter(prefix, key, MetricValue::Signed(count)).format().into()
    }
}

metric_type!(
    /// Timers are a positive number of milliseconds between a start and end point.
    ///
    /// See the `Timed` trait for more information.
    Timer
);

impl Timer {
    pub fn new(prefix: &str, key: &str, time: u64) -> Self {
        MetricFormatter::timer(prefix, key, MetricValue::Unsigned(time)).format().into()
    }

    pub fn new_f64(prefix: &str, key: &str, time: f64) -> Self {
        MetricFormatter::timer(prefix, key, MetricValue::Float(time)).format().into()
    }
}

metric_type!(
    /// Gauges are an instantaneous value determined by the client.
    ///
    /// See the `Gauged` trait for more information.
    Gauge
);

impl Gauge {
    pub fn new(prefix: &str, key: &str, value: i64) -> Self {
        MetricFormatter::gauge(prefix, key, MetricValue::Signed(value)).format().into()
    }

    pub fn new_f64(prefix: &str, key: &str, value: f64) -> Self {
        MetricFormatter::gauge(prefix, key, MetricValue::Float(value)).format().into()
    }
}

metric_type!(
    /// Histograms are values whose distribution is calculated by the agent.
    ///
    /// See the `Histogrammed` trait for more information.
    Histogram
);

impl Histogram {
    pub fn new(prefix: &str, key: &str, value: u64) -> Self {
        MetricFormatter::histogram(prefix, key, MetricValue::Unsigned(value))
            .format()
            .into()
    }

    pub fn new_f64(prefix: &str, key: &str, value: f64) -> Self {
        MetricFormatter::histogram(prefix, key, MetricValue::Float(value)).format().into()
    }
}

metric_type!(
    /// Distributions are like histograms but aggregated globally by Datadog
    /// rather than per agent.
    ///
    /// See the `Distributed` trait for more information.
    Distribution
);

impl Distribution {
    pub fn new(prefix: &str, key: &str, value: u64) -> Self {
        MetricFormatter::distribution(prefix, key, MetricValue::Unsigned(value))
            .format()
            .into()
    }

    pub fn new_f64(prefix: &str, key: &str, value: f64) -> Self {
        MetricFormatter::distribution(prefix, key, MetricValue::Float(value))
            .format()
            .into()
    }
}

metric_type!(
    /// Sets count the number of unique elements in a group.
    ///
    /// See the `Setted` trait for more information.
    Set
);

impl Set {
    pub fn new(prefix: &str, key: &str, value: i64) -> Self {
        MetricFormatter::set(prefix, key, MetricValue::Signed(value)).format().into()
    }
}

metric_type!(
    /// Events are posted to the Datadog event stream by the agent.
    ///
    /// See the `Evented` trait for more information.
    Event
);

metric_type!(
    /// Service checks report the status of a service to Datadog.
    ///
    /// See the `ServiceChecked` trait for more information.
    ServiceCheck
);

/// Potential categories an error from this library falls into.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    /// Metric, payload, or configuration values that could not be used
    InvalidInput,
    /// Failure writing a datagram to a socket
    IoError,
    /// A payload could not be encoded as JSON
    SerializationError,
    /// The HTTP request could not be completed (connection, TLS, timeout, decoding)
    HttpError,
    /// The intake API answered with a non-success status
    ApiError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ErrorKind::InvalidInput => "invalid input".fmt(f),
            ErrorKind::IoError => "I/O error".fmt(f),
            ErrorKind::SerializationError => "serialization error".fmt(f),
            ErrorKind::HttpError => "HTTP error".fmt(f),
            ErrorKind::ApiError => "API error".fmt(f),
        }
    }
}

/// Error generated by this library when submitting metrics
///
/// Errors sending DogStatsD datagrams are surfaced from `.try_send()` or passed
/// to the client's error handler when using `.send()`. Errors from the intake
/// API are always returned to the caller.
#[derive(Debug)]
pub struct MetricError {
    repr: ErrorRepr,
}

#[derive(Debug)]
enum ErrorRepr {
    WithDescription(ErrorKind, &'static str),
    IoError(io::Error),
    JsonError(serde_json::Error),
    HttpError(reqwest::Error),
    ApiError { status: u16, errors: Vec<String> },
}

impl MetricError {
    /// Create an error for a non-success response from the intake API
    pub(crate) fn from_status(status: u16, errors: Vec<String>) -> Self {
        MetricError {
            repr: ErrorRepr::ApiError { status, errors },
        }
    }

    /// Return the kind of the error
    pub fn kind(&self) -> ErrorKind {
        match self.repr {
            ErrorRepr::WithDescription(kind, _) => kind,
            ErrorRepr::IoError(_) => ErrorKind::IoError,
            ErrorRepr::JsonError(_) => ErrorKind::SerializationError,
            ErrorRepr::HttpError(_) => ErrorKind::HttpError,
            ErrorRepr::ApiError { .. } => ErrorKind::ApiError,
        }
    }

    /// HTTP status code returned by the intake API, if this is an API error
    pub fn status(&self) -> Option<u16> {
        match self.repr {
            ErrorRepr::ApiError { status, .. } => Some(status),
            ErrorRepr::HttpError(ref e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Error messages returned by the intake API, empty for other errors
    pub fn api_errors(&self) -> &[String] {
        match self.repr {
            ErrorRepr::ApiError { ref errors, .. } => errors,
            _ => &[],
        }
    }
}

impl fmt::Display for MetricError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repr {
            ErrorRepr::WithDescription(_, desc) => desc.fmt(f),
            ErrorRepr::IoError(ref err) => err.fmt(f),
            ErrorRepr::JsonError(ref err) => err.fmt(f),
            ErrorRepr::HttpError(ref err) => err.fmt(f),
            ErrorRepr::ApiError { status, ref errors } => {
                if errors.is_empty() {
                    write!(f, "intake API returned status {}", status)
                } else {
                    write!(f, "intake API returned status {}: {}", status, errors.join("; "))
                }
            }
        }
    }
}

impl error::Error for MetricError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.repr {
            ErrorRepr::IoError(ref err) => Some(err),
            ErrorRepr::JsonError(ref err) => Some(err),
            ErrorRepr::HttpError(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for MetricError {
    fn from(err: io::Error) -> MetricError {
        MetricError {
            repr: ErrorRepr::IoError(err),
        }
    }
}

impl From<serde_json::Error> for MetricError {
    fn from(err: serde_json::Error) -> MetricError {
        MetricError {
            repr: ErrorRepr::JsonError(err),
        }
    }
}

impl From<reqwest::Error> for MetricError {
    fn from(err: reqwest::Error) -> MetricError {
        MetricError {
            repr: ErrorRepr::HttpError(err),
        }
    }
}

impl From<(ErrorKind, &'static str)> for MetricError {
    fn from((kind, desc): (ErrorKind, &'static str)) -> MetricError {
        MetricError {
            repr: ErrorRepr::WithDescription(kind, desc),
        }
    }
}

pub type MetricResult<T> = Result<T, MetricError>;
