// ddsubmit - Submit custom metrics to Datadog from Rust!
//
// Copyright 2026 The ddsubmit Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Advanced extension points for `DogStatsdClient` implementations.
//!
//! The types exposed here are the conversions each metric trait accepts and
//! the value representation written into datagrams. Most users only need the
//! `prelude`.

pub use crate::builder::MetricValue;
pub use crate::client::{
    MetricBackend, ToCounterValue, ToDistributionValue, ToGaugeValue, ToHistogramValue, ToSetValue, ToTimerValue,
};
