// ddsubmit - Submit custom metrics to Datadog from Rust!
//
// Copyright 2026 The ddsubmit Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// This example sends a gauge and a counter increment to a DogStatsD agent
// over UDP. Datagrams are fire-and-forget: nothing waits for the agent and
// errors are only logged by the client's default error handler.

use ddsubmit::prelude::*;
use ddsubmit::{AgentConfig, DogStatsdClient, MetricResult};

fn send_metrics(config: &AgentConfig) -> MetricResult<()> {
    let statsd = DogStatsdClient::from_config(config)?;

    statsd
        .gauge_with_tags("myapp.cpu_load", 75.5)
        .with_tags(["env:prod", "host:webserver"])
        .send();

    statsd
        .incr_with_tags("myapp.request_count")
        .with_tags(["env:prod", "endpoint:/api"])
        .send();

    Ok(())
}

fn main() -> MetricResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // By default the agent listens on port 8125. A custom port can be given
    // explicitly like this:
    //
    //     let config = AgentConfig::default().with_port(8135);
    let config = AgentConfig::default();

    send_metrics(&config)?;
    println!("Metrics sent via DogStatsD!");
    Ok(())
}
