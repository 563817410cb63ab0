// ddsubmit - Submit custom metrics to Datadog from Rust!
//
// Copyright 2026 The ddsubmit Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Point in time snapshot of the datagrams a sink has written or dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SinkStats {
    pub bytes_sent: u64,
    pub packets_sent: u64,
    pub bytes_dropped: u64,
    pub packets_dropped: u64,
}

/// Shared counters updated by socket based sinks after each write.
#[derive(Debug, Clone, Default)]
pub(crate) struct SocketStats {
    bytes_sent: Arc<AtomicU64>,
    packets_sent: Arc<AtomicU64>,
    bytes_dropped: Arc<AtomicU64>,
    packets_dropped: Arc<AtomicU64>,
}

impl SocketStats {
    pub(crate) fn update(&self, res: io::Result<usize>, len: usize) -> io::Result<usize> {
        match res {
            Ok(written) => {
                self.bytes_sent.fetch_add(written as u64, Ordering::Relaxed);
                self.packets_sent.fetch_add(1, Ordering::Relaxed);
                Ok(written)
            }
            Err(e) => {
                self.bytes_dropped.fetch_add(len as u64, Ordering::Relaxed);
                self.packets_dropped.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }
}

impl From<&SocketStats> for SinkStats {
    fn from(stats: &SocketStats) -> Self {
        SinkStats {
            bytes_sent: stats.bytes_sent.load(Ordering::Relaxed),
            packets_sent: stats.packets_sent.load(Ordering::Relaxed),
            bytes_dropped: stats.bytes_dropped.load(Ordering::Relaxed),
            packets_dropped: stats.packets_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Trait for transports that deliver DogStatsD datagrams to an agent.
///
/// Each call to `.emit()` is handed exactly one complete datagram without a
/// trailing newline, for example:
///
/// * Count: `myapp.request_count:1|c|#env:prod,endpoint:/api`
/// * Gauge: `myapp.cpu_load:75.5|g|#env:prod,host:webserver`
/// * Timer: `myapp.db.query:22|ms`
/// * Histogram: `myapp.response.size:1024|h`
/// * Distribution: `myapp.latency:0.25|d`
/// * Set: `myapp.users.unique:42|s`
/// * Event: `_e{5,4}:title|text`
/// * Service check: `_sc|myapp.db|0`
///
/// Sinks write datagrams as they receive them. Nothing in this crate buffers
/// or retries, a datagram that can't be written is reported to the caller.
pub trait MetricSink {
    /// Send the DogStatsD datagram using this sink and return the number of
    /// bytes written or an I/O error.
    fn emit(&self, metric: &str) -> io::Result<usize>;

    /// Flush any datagrams held by the sink. A no-op for every sink in this
    /// crate, which all write immediately.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }

    /// Return I/O telemetry like bytes and packets sent or dropped.
    ///
    /// Sinks that don't write to a socket return all zeros.
    fn stats(&self) -> SinkStats {
        SinkStats::default()
    }
}

/// Implementation of a `MetricSink` that discards all metrics.
///
/// Useful for disabling DogStatsD reporting or in tests that only care about
/// the formatted metric returned by `.try_send()`.
#[derive(Debug, Clone)]
pub struct NopMetricSink;

impl MetricSink for NopMetricSink {
    fn emit(&self, _metric: &str) -> io::Result<usize> {
        Ok(0)
    }
}
