// ddsubmit - Submit custom metrics to Datadog from Rust!
//
// Copyright 2026 The ddsubmit Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Export commonly used parts of ddsubmit for easy glob imports
//!
//! # Example
//!
//! ```
//! use ddsubmit::prelude::*;
//! use ddsubmit::{DogStatsdClient, NopMetricSink, ServiceCheckStatus};
//!
//! let client = DogStatsdClient::from_sink(NopMetricSink);
//!
//! client.count("some.counter", 1).unwrap();
//! client.time("some.timer", 23).unwrap();
//! client.gauge("some.gauge", 45.5).unwrap();
//! client.histogram("some.histogram", 89).unwrap();
//! client.distribution("some.distribution", 67).unwrap();
//! client.set("some.set", 123).unwrap();
//! client.event("Deploy", "Version 1.2.3 is live").unwrap();
//! client.service_check("app.can_connect", ServiceCheckStatus::Ok).unwrap();
//! ```

pub use crate::client::{Counted, CountedExt, Distributed, Gauged, Histogrammed, MetricClient, Setted, Timed};
pub use crate::events::{Evented, ServiceChecked};
