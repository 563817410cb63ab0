// ddsubmit - Submit custom metrics to Datadog from Rust!
//
// Copyright 2026 The ddsubmit Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::types::{ErrorKind, MetricError, MetricResult};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Largest uncompressed payload the intake accepts, in bytes.
pub const MAX_PAYLOAD_SIZE: usize = 512_000;

/// Kind of a submitted series, sent as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricIntakeType {
    Unspecified = 0,
    Count = 1,
    Rate = 2,
    Gauge = 3,
}

impl Serialize for MetricIntakeType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i32(*self as i32)
    }
}

impl<'de> Deserialize<'de> for MetricIntakeType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match i32::deserialize(deserializer)? {
            0 => Ok(MetricIntakeType::Unspecified),
            1 => Ok(MetricIntakeType::Count),
            2 => Ok(MetricIntakeType::Rate),
            3 => Ok(MetricIntakeType::Gauge),
            other => Err(de::Error::custom(format!("unknown metric intake type {}", other))),
        }
    }
}

/// A single timestamped value of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    /// Seconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    pub value: f64,
}

impl MetricPoint {
    pub fn new(timestamp: i64, value: f64) -> Self {
        MetricPoint {
            timestamp: Some(timestamp),
            value,
        }
    }

    /// A point stamped with the current time.
    pub fn now(value: f64) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();
        Self::new(now, value)
    }

    /// A point without a timestamp; the intake uses the time it was received.
    pub fn untimed(value: f64) -> Self {
        MetricPoint { timestamp: None, value }
    }
}

/// A resource (host, container, etc.) a series is associated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricResource {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl MetricResource {
    pub fn new<N: Into<String>, K: Into<String>>(name: N, kind: K) -> Self {
        MetricResource {
            name: name.into(),
            kind: kind.into(),
        }
    }
}

/// One named metric stream and its points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub metric: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MetricIntakeType>,
    pub points: Vec<MetricPoint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<MetricResource>,
}

impl MetricSeries {
    pub fn new<S: Into<String>>(metric: S) -> Self {
        MetricSeries {
            metric: metric.into(),
            kind: None,
            points: Vec::new(),
            tags: Vec::new(),
            interval: None,
            unit: None,
            source_type_name: None,
            resources: Vec::new(),
        }
    }

    pub fn with_type(mut self, kind: MetricIntakeType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_point(mut self, point: MetricPoint) -> Self {
        self.points.push(point);
        self
    }

    pub fn with_points<I>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = MetricPoint>,
    {
        self.points.extend(points);
        self
    }

    pub fn with_tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Interval in seconds covered by each point of a `Count` or `Rate` series.
    pub fn with_interval(mut self, interval: i64) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn with_unit<S: Into<String>>(mut self, unit: S) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_source_type_name<S: Into<String>>(mut self, source: S) -> Self {
        self.source_type_name = Some(source.into());
        self
    }

    pub fn with_resource(mut self, resource: MetricResource) -> Self {
        self.resources.push(resource);
        self
    }
}

/// Body of a series submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPayload {
    pub series: Vec<MetricSeries>,
}

impl MetricPayload {
    pub fn new(series: Vec<MetricSeries>) -> Self {
        MetricPayload { series }
    }

    /// Check the payload is something the intake will accept without sending it.
    ///
    /// # Failures
    ///
    /// Returns an `InvalidInput` error if there are no series, a series has no
    /// name or no points, a value isn't finite, or the payload is larger than
    /// `MAX_PAYLOAD_SIZE`.
    pub fn validate(&self) -> MetricResult<()> {
        self.encode().map(|_| ())
    }

    /// Validate and serialize the payload for the request body.
    pub(crate) fn encode(&self) -> MetricResult<Vec<u8>> {
        if self.series.is_empty() {
            return Err(MetricError::from((ErrorKind::InvalidInput, "Payload must contain at least one series")));
        }

        for series in &self.series {
            if series.metric.is_empty() {
                return Err(MetricError::from((ErrorKind::InvalidInput, "Series metric name must not be empty")));
            }
            if series.points.is_empty() {
                return Err(MetricError::from((ErrorKind::InvalidInput, "Series must contain at least one point")));
            }
            if series.points.iter().any(|p| !p.value.is_finite()) {
                return Err(MetricError::from((ErrorKind::InvalidInput, "Point values must be finite")));
            }
        }

        let body = serde_json::to_vec(self)?;
        if body.len() > MAX_PAYLOAD_SIZE {
            return Err(MetricError::from((ErrorKind::InvalidInput, "Payload exceeds the maximum size")));
        }

        Ok(body)
    }
}

/// Acknowledgement returned by the intake when a payload is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakePayloadAccepted {
    #[serde(default)]
    pub errors: Vec<String>,
}

impl fmt::Display for IntakePayloadAccepted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Body of a non-success response from the intake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::{
        IntakePayloadAccepted, MetricIntakeType, MetricPayload, MetricPoint, MetricResource, MetricSeries,
        MAX_PAYLOAD_SIZE,
    };
    use crate::types::ErrorKind;
    use serde_json::json;

    fn requests_series() -> MetricSeries {
        MetricSeries::new("custom.myapp.requests")
            .with_type(MetricIntakeType::Gauge)
            .with_point(MetricPoint::new(1_700_000_000, 150.0))
            .with_tags(["env:prod", "service:webapp"])
    }

    #[test]
    fn test_series_serializes_to_intake_shape() {
        let payload = MetricPayload::new(vec![requests_series()]);

        assert_eq!(
            json!({
                "series": [{
                    "metric": "custom.myapp.requests",
                    "type": 3,
                    "points": [{"timestamp": 1_700_000_000, "value": 150.0}],
                    "tags": ["env:prod", "service:webapp"],
                }]
            }),
            serde_json::to_value(&payload).unwrap()
        );
    }

    #[test]
    fn test_series_optional_fields() {
        let series = MetricSeries::new("custom.myapp.bytes")
            .with_type(MetricIntakeType::Count)
            .with_points([MetricPoint::untimed(1.0), MetricPoint::untimed(2.0)])
            .with_tag("env:prod")
            .with_interval(10)
            .with_unit("byte")
            .with_source_type_name("rust")
            .with_resource(MetricResource::new("web01", "host"));

        assert_eq!(
            json!({
                "metric": "custom.myapp.bytes",
                "type": 1,
                "points": [{"value": 1.0}, {"value": 2.0}],
                "tags": ["env:prod"],
                "interval": 10,
                "unit": "byte",
                "source_type_name": "rust",
                "resources": [{"name": "web01", "type": "host"}],
            }),
            serde_json::to_value(&series).unwrap()
        );
    }

    #[test]
    fn test_intake_type_codes() {
        assert_eq!(json!(0), serde_json::to_value(MetricIntakeType::Unspecified).unwrap());
        assert_eq!(json!(2), serde_json::to_value(MetricIntakeType::Rate).unwrap());
        assert_eq!(MetricIntakeType::Gauge, serde_json::from_value(json!(3)).unwrap());
        assert!(serde_json::from_value::<MetricIntakeType>(json!(7)).is_err());
    }

    #[test]
    fn test_point_now_is_timestamped() {
        let point = MetricPoint::now(150.0);

        assert!(point.timestamp.unwrap() > 1_600_000_000);
        assert_eq!(150.0, point.value);
    }

    #[test]
    fn test_validate_ok() {
        assert!(MetricPayload::new(vec![requests_series()]).validate().is_ok());
    }

    #[test]
    fn test_validate_no_series() {
        let err = MetricPayload::new(Vec::new()).validate().unwrap_err();
        assert_eq!(ErrorKind::InvalidInput, err.kind());
    }

    #[test]
    fn test_validate_empty_name() {
        let series = MetricSeries::new("").with_point(MetricPoint::untimed(1.0));
        let err = MetricPayload::new(vec![series]).validate().unwrap_err();
        assert_eq!(ErrorKind::InvalidInput, err.kind());
    }

    #[test]
    fn test_validate_no_points() {
        let err = MetricPayload::new(vec![MetricSeries::new("custom.empty")]).validate().unwrap_err();
        assert_eq!(ErrorKind::InvalidInput, err.kind());
    }

    #[test]
    fn test_validate_non_finite_value() {
        let series = MetricSeries::new("custom.nan").with_point(MetricPoint::untimed(f64::NAN));
        let err = MetricPayload::new(vec![series]).validate().unwrap_err();
        assert_eq!(ErrorKind::InvalidInput, err.kind());
    }

    #[test]
    fn test_validate_too_large() {
        let series = MetricSeries::new("custom.big")
            .with_points((0..MAX_PAYLOAD_SIZE / 8).map(|i| MetricPoint::new(i as i64, 1.0)));
        let err = MetricPayload::new(vec![series]).validate().unwrap_err();
        assert_eq!(ErrorKind::InvalidInput, err.kind());
    }

    #[test]
    fn test_accepted_display_and_default_errors() {
        let accepted: IntakePayloadAccepted = serde_json::from_str("{}").unwrap();

        assert!(accepted.errors.is_empty());
        assert_eq!(r#"{"errors":[]}"#, accepted.to_string());
    }
}
