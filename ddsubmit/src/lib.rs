// ddsubmit - Submit custom metrics to Datadog from Rust!
//
// Copyright 2026 The ddsubmit Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Submit custom metrics to Datadog from Rust!
//!
//! `ddsubmit` offers two independent ways of getting metrics into Datadog:
//!
//! * The [intake API](api) where series of timestamped points are submitted
//!   directly to Datadog over HTTPS, authenticated with an API key.
//! * [DogStatsD](https://docs.datadoghq.com/developers/dogstatsd/) where
//!   counters, gauges, timers, histograms, distributions, sets, events, and
//!   service checks are sent as fire-and-forget datagrams to a locally running
//!   agent over UDP (or optionally Unix sockets).
//!
//! ## Install
//!
//! To make use of `ddsubmit` in your project, add it as a dependency in your `Cargo.toml` file.
//!
//! ```toml
//! [dependencies]
//! ddsubmit = "x.y.z"
//! ```
//!
//! ## Usage
//!
//! ### Intake API
//!
//! A single payload of one or more series is submitted with one HTTP request.
//! There is no retrying or buffering: the outcome of the request is returned
//! to the caller.
//!
//! ```rust,no_run
//! use ddsubmit::api::{ApiClient, Configuration, MetricIntakeType, MetricPayload, MetricPoint, MetricSeries, MetricsApi};
//!
//! let config = Configuration::from_env().with_api_key("<DD_API_KEY>");
//! let client = ApiClient::new(config).unwrap();
//!
//! let payload = MetricPayload::new(vec![MetricSeries::new("custom.myapp.requests")
//!     .with_type(MetricIntakeType::Gauge)
//!     .with_point(MetricPoint::now(150.0))
//!     .with_tags(["env:prod", "service:webapp"])]);
//!
//! let accepted = MetricsApi::new(&client).submit_metrics(&payload).unwrap();
//! println!("{}", accepted);
//! ```
//!
//! ### DogStatsD
//!
//! Create a client from an agent configuration and emit metrics. Tags may be
//! added to each metric with the returned `MetricBuilder`.
//!
//! ```rust,no_run
//! use ddsubmit::prelude::*;
//! use ddsubmit::{AgentConfig, DogStatsdClient};
//!
//! let client = DogStatsdClient::from_config(&AgentConfig::default()).unwrap();
//!
//! client.gauge_with_tags("myapp.cpu_load", 75.5)
//!     .with_tag("env", "prod")
//!     .with_tag("host", "webserver")
//!     .send();
//!
//! client.count_with_tags("myapp.request_count", 1)
//!     .with_tag("env", "prod")
//!     .with_tag("endpoint", "/api")
//!     .send();
//! ```
//!
//! ### Custom Error Handling
//!
//! Calling `.send()` on a `MetricBuilder` never returns an error. Instead,
//! errors are passed to the client's error handler, which logs them at `warn`
//! level unless a different handler is configured.
//!
//! ```rust
//! use ddsubmit::prelude::*;
//! use ddsubmit::{DogStatsdClient, MetricError, NopMetricSink};
//!
//! fn my_error_handler(err: MetricError) {
//!     eprintln!("Metric error! {}", err);
//! }
//!
//! let client = DogStatsdClient::builder(NopMetricSink)
//!     .with_namespace("myapp")
//!     .with_constant_tag("env", "prod")
//!     .with_error_handler(my_error_handler)
//!     .build();
//!
//! client.incr_with_tags("some.counter").with_tag("endpoint", "/api").send();
//! ```
//!
//! ### Custom Metric Sinks
//!
//! Datagrams are written by an implementation of the `MetricSink` trait.
//! `UdpMetricSink` and `UnixMetricSink` cover the usual agent setups,
//! `SpyMetricSink` captures datagrams for tests, and `NopMetricSink` discards
//! them.
//!
//! ```rust
//! use std::io;
//! use ddsubmit::prelude::*;
//! use ddsubmit::{DogStatsdClient, MetricSink};
//!
//! pub struct StdoutMetricSink;
//!
//! impl MetricSink for StdoutMetricSink {
//!     fn emit(&self, metric: &str) -> io::Result<usize> {
//!         println!("{}", metric);
//!         Ok(metric.len())
//!     }
//! }
//!
//! let client = DogStatsdClient::from_sink(StdoutMetricSink);
//! client.gauge("some.gauge", 7).unwrap();
//! ```

#![forbid(unsafe_code)]

/// Port a DogStatsD agent listens on unless configured otherwise
pub const DEFAULT_PORT: u16 = 8125;

/// Host a DogStatsD agent is reached at unless configured otherwise
pub const DEFAULT_HOST: &str = "localhost";

pub use self::builder::MetricBuilder;

pub use self::client::{
    Counted, CountedExt, Distributed, DogStatsdClient, DogStatsdClientBuilder, Gauged, Histogrammed, MetricClient,
    Setted, Timed,
};

pub use self::config::AgentConfig;

pub use self::events::{
    EventAlertType, EventBuilder, EventPriority, Evented, ServiceCheckBuilder, ServiceCheckStatus, ServiceChecked,
    MAX_EVENT_LENGTH,
};

pub use self::sinks::{MetricSink, NopMetricSink, SinkStats, SpyMetricSink, UdpMetricSink};

pub use self::types::{
    Counter, Distribution, ErrorKind, Event, Gauge, Histogram, Metric, MetricError, MetricResult, ServiceCheck, Set,
    Timer,
};

pub mod api;
mod builder;
mod client;
mod config;
mod events;
pub mod ext;
pub mod prelude;
mod sinks;
mod types;


#[cfg(unix)]
pub use crate::sinks::UnixMetricSink;

mod sealed {
    pub trait Sealed {}
}
