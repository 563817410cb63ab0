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
use ddsubmit::DogStatsdClient;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Number of datagrams each iteration of `run_arc_threaded_test` emits
pub const METRICS_PER_ITERATION: u64 = 8;

pub fn run_arc_threaded_test(client: DogStatsdClient, num_threads: u64, iterations: u64) {
    let shared_client = Arc::new(client);

    let threads: Vec<_> = (0..num_threads)
        .map(|_| {
            let local_client = Arc::clone(&shared_client);

            thread::spawn(move || {
                for i in 0..iterations {
                    local_client.count("some.counter", i as i64).unwrap();
                    local_client.time("some.timer", i).unwrap();
                    local_client.gauge("some.gauge", i as i64).unwrap();
                    local_client.gauge("some.gauge", i as f64).unwrap();
                    local_client.histogram("some.histogram", i).unwrap();
                    local_client.distribution("some.distribution", i).unwrap();
                    local_client.set("some.set", i as i64).unwrap();
                    local_client.incr("some.counter").unwrap();
                    thread::sleep(Duration::from_millis(1));
                }
            })
        })
        .collect();

    for t in threads {
        t.join().unwrap();
    }
}
