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
use std::os::unix::net::UnixDatagram;
use std::path::{Path, PathBuf};

use crate::sinks::core::{MetricSink, SinkStats, SocketStats};

/// Implementation of a `MetricSink` that emits datagrams to a DogStatsD
/// agent over a Unix datagram socket.
///
/// Each datagram is sent when the `.emit()` method is called, in the thread
/// of the caller. Unlike UDP, writes fail if nothing is bound to the path.
#[derive(Debug)]
pub struct UnixMetricSink {
    socket: UnixDatagram,
    path: PathBuf,
    stats: SocketStats,
}

impl UnixMetricSink {
    /// Construct a new `UnixMetricSink` instance.
    ///
    /// The path should be the agent's DogStatsD socket, typically
    /// `/var/run/datadog/dsd.socket`. The socket should be unbound with any
    /// desired configuration already applied (blocking vs non-blocking,
    /// timeouts, etc.).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::os::unix::net::UnixDatagram;
    /// use ddsubmit::UnixMetricSink;
    ///
    /// let socket = UnixDatagram::unbound().unwrap();
    /// let sink = UnixMetricSink::from("/var/run/datadog/dsd.socket", socket);
    /// ```
    pub fn from<P>(path: P, socket: UnixDatagram) -> UnixMetricSink
    where
        P: AsRef<Path>,
    {
        UnixMetricSink {
            path: path.as_ref().to_path_buf(),
            socket,
            stats: SocketStats::default(),
        }
    }
}

impl MetricSink for UnixMetricSink {
    fn emit(&self, metric: &str) -> io::Result<usize> {
        log::trace!("sending datagram to {}: {}", self.path.display(), metric);
        self.stats
            .update(self.socket.send_to(metric.as_bytes(), &self.path), metric.len())
    }

    fn stats(&self) -> SinkStats {
        (&self.stats).into()
    }
}
