// ddsubmit - Submit custom metrics to Datadog from Rust!
//
// Copyright 2026 The ddsubmit Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Client for Datadog's metrics intake HTTP API (`POST /api/v2/series`).
//!
//! Unlike DogStatsD, submissions are synchronous and authenticated with an API
//! key: each call to `MetricsApi::submit_metrics` makes exactly one request and
//! returns the intake's acknowledgement or an error.
//!
//! ```no_run
//! use ddsubmit::api::{
//!     ApiClient, Configuration, MetricIntakeType, MetricPayload, MetricPoint, MetricSeries, MetricsApi,
//! };
//!
//! let config = Configuration::new().with_api_key("your_api_key");
//! let payload = MetricPayload::new(vec![MetricSeries::new("custom.myapp.requests")
//!     .with_type(MetricIntakeType::Gauge)
//!     .with_point(MetricPoint::now(150.0))
//!     .with_tags(["env:prod", "service:webapp"])]);
//!
//! let client = ApiClient::new(config).unwrap();
//! let accepted = MetricsApi::new(&client).submit_metrics(&payload).unwrap();
//! println!("{}", accepted);
//! ```

mod client;
mod config;
mod model;

pub use self::client::{ApiClient, MetricsApi};
pub use self::config::{Configuration, DEFAULT_SITE};
pub use self::model::{
    ApiErrorResponse, IntakePayloadAccepted, MetricIntakeType, MetricPayload, MetricPoint, MetricResource,
    MetricSeries, MAX_PAYLOAD_SIZE,
};
