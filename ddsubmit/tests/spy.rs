// ddsubmit - Submit custom metrics to Datadog from Rust!
//
// Copyright 2026 The ddsubmit Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use ddsubmit::prelude::*;
use ddsubmit::{DogStatsdClient, ServiceCheckStatus, SpyMetricSink};
use std::str;

mod utils;
use utils::{run_arc_threaded_test, METRICS_PER_ITERATION};

const NUM_THREADS: u64 = 10;
const NUM_ITERATIONS: u64 = 1_000;

fn received(rx: &crossbeam_channel::Receiver<Vec<u8>>) -> Vec<String> {
    rx.try_iter()
        .map(|bytes| str::from_utf8(&bytes).unwrap().to_owned())
        .collect()
}

#[test]
fn test_dogstatsd_client_spy_sink_single_threaded() {
    let (rx, sink) = SpyMetricSink::new();
    let client = DogStatsdClient::builder(sink).with_namespace("ddsubmit").build();
    run_arc_threaded_test(client, 1, 1);

    let datagrams = received(&rx);
    assert_eq!(METRICS_PER_ITERATION as usize, datagrams.len());
    assert!(datagrams.iter().all(|d| d.starts_with("ddsubmit.some.")));
}

#[ignore]
#[test]
fn test_dogstatsd_client_spy_sink_many_threaded() {
    let (rx, sink) = SpyMetricSink::new();
    let client = DogStatsdClient::from_sink(sink);
    run_arc_threaded_test(client, NUM_THREADS, NUM_ITERATIONS);

    assert_eq!(
        (NUM_THREADS * NUM_ITERATIONS * METRICS_PER_ITERATION) as usize,
        rx.try_iter().count()
    );
}

#[test]
fn test_dogstatsd_client_constant_tags_precede_metric_tags() {
    let (rx, sink) = SpyMetricSink::new();
    let client = DogStatsdClient::builder(sink)
        .with_namespace("myapp.")
        .with_constant_tag("env", "prod")
        .build();

    client
        .gauge_with_tags("cpu_load", 75.5)
        .with_tag("host", "webserver")
        .send();
    client.incr_with_tags("request_count").with_tag_value("canary").send();

    assert_eq!(
        vec![
            "myapp.cpu_load:75.5|g|#env:prod,host:webserver".to_string(),
            "myapp.request_count:1|c|#env:prod,canary".to_string(),
        ],
        received(&rx)
    );
}

#[test]
fn test_dogstatsd_client_events_and_service_checks_skip_namespace() {
    let (rx, sink) = SpyMetricSink::new();
    let client = DogStatsdClient::builder(sink)
        .with_namespace("myapp")
        .with_constant_tag("env", "prod")
        .build();

    client.event("Deploy", "done").unwrap();
    client.service_check("app.db", ServiceCheckStatus::Ok).unwrap();

    assert_eq!(
        vec![
            "_e{6,4}:Deploy|done|#env:prod".to_string(),
            "_sc|app.db|0|#env:prod".to_string(),
        ],
        received(&rx)
    );
}

#[test]
fn test_dogstatsd_client_invalid_metric_is_not_emitted() {
    let (rx, sink) = SpyMetricSink::new();
    let client = DogStatsdClient::from_sink(sink);

    assert!(client.gauge("some.gauge", f64::NAN).is_err());
    assert!(received(&rx).is_empty());
}
