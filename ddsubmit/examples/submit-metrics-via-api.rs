// ddsubmit - Submit custom metrics to Datadog from Rust!
//
// Copyright 2026 The ddsubmit Authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// This example submits a single gauge series straight to the Datadog intake
// API over HTTPS. The acknowledgement from the intake is printed as-is and
// any failure is returned from `main` without being retried.

use ddsubmit::api::{
    ApiClient, Configuration, IntakePayloadAccepted, MetricIntakeType, MetricPayload, MetricPoint, MetricSeries,
    MetricsApi,
};
use ddsubmit::MetricResult;
use std::time::{SystemTime, UNIX_EPOCH};

fn requests_payload(timestamp: i64) -> MetricPayload {
    MetricPayload::new(vec![MetricSeries::new("custom.myapp.requests")
        .with_type(MetricIntakeType::Gauge)
        .with_point(MetricPoint::new(timestamp, 150.0))
        .with_tags(["env:prod", "service:webapp"])])
}

fn submit(configuration: Configuration, timestamp: i64) -> MetricResult<IntakePayloadAccepted> {
    // The client and its connections are released at the end of this scope
    // whether or not the submission succeeds.
    let api_client = ApiClient::new(configuration)?;
    let api_instance = MetricsApi::new(&api_client);
    api_instance.submit_metrics(&requests_payload(timestamp))
}

fn main() -> MetricResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Add your API key here
    let configuration = Configuration::new().with_api_key("your_api_key");
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default();

    let response = submit(configuration, timestamp)?;
    println!("{}", response);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::submit;
    use ddsubmit::api::Configuration;
    use ddsubmit::ErrorKind;
    use mockito::{mock, Matcher};
    use serde_json::json;

    const TIMESTAMP: i64 = 1_700_000_000;

    fn expected_body() -> serde_json::Value {
        json!({
            "series": [{
                "metric": "custom.myapp.requests",
                "type": 3,
                "points": [{"timestamp": TIMESTAMP, "value": 150.0}],
                "tags": ["env:prod", "service:webapp"]
            }]
        })
    }

    fn mock_config() -> Configuration {
        Configuration::new()
            .with_api_key("your_api_key")
            .with_host(&mockito::server_url())
            .unwrap()
    }

    #[test]
    fn test_submits_requests_series_once() {
        let intake = mock("POST", "/api/v2/series")
            .match_header("dd-api-key", "your_api_key")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(expected_body()))
            .with_status(202)
            .with_header("content-type", "application/json")
            .with_body(r#"{"errors":[]}"#)
            .expect(1)
            .create();

        let accepted = submit(mock_config(), TIMESTAMP).unwrap();

        assert!(accepted.errors.is_empty());
        assert_eq!(r#"{"errors":[]}"#, accepted.to_string());
        intake.assert();
    }

    #[test]
    fn test_rejected_submission_is_not_retried() {
        let intake = mock("POST", "/api/v2/series")
            .with_status(403)
            .with_header("content-type", "application/json")
            .with_body(r#"{"errors":["Forbidden"]}"#)
            .expect(1)
            .create();

        let err = submit(mock_config(), TIMESTAMP).unwrap_err();

        assert_eq!(ErrorKind::ApiError, err.kind());
        assert_eq!(Some(403), err.status());
        assert_eq!(&["Forbidden".to_string()], err.api_errors());
        intake.assert();
    }
}
