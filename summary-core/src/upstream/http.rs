use super::types::ErrorPayload;
use super::{Endpoint, UpstreamError, UpstreamOutcome};
use crate::error::Result;
use crate::security::is_dot_segment;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Shared HTTP transport for all upstream clients.
///
/// One GET per call, no body, no retry. The client-wide timeout covers
/// connecting, sending and reading the body.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
    timeout: Duration,
}

impl HttpUpstream {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        url: Url,
    ) -> UpstreamOutcome<T> {
        crate::log_upstream!(debug, endpoint.as_str(), url = %url, "Sending request");

        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return UpstreamOutcome::Fatal(self.transport_error(&url, e)),
        };

        let status = response.status().as_u16();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return UpstreamOutcome::Fatal(self.transport_error(&url, e)),
        };

        crate::log_upstream!(debug, endpoint.as_str(), status, bytes = body.len(), "Received response");
        classify(url.as_str(), status, &body)
    }

    fn transport_error(&self, url: &Url, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }
        } else {
            UpstreamError::Transport {
                url: url.to_string(),
                source: err,
            }
        }
    }
}

/// Map a raw response onto an outcome.
///
/// Only 200 counts as success. Any other status must carry a JSON object
/// with an `error` field to be degraded; everything else is fatal.
pub fn classify<T: DeserializeOwned>(url: &str, status: u16, body: &[u8]) -> UpstreamOutcome<T> {
    if status == 200 {
        return match serde_json::from_slice::<T>(body) {
            Ok(payload) => UpstreamOutcome::Ok(payload),
            Err(e) => UpstreamOutcome::Fatal(UpstreamError::MalformedResponse {
                url: url.to_string(),
                reason: e.to_string(),
            }),
        };
    }

    match serde_json::from_slice::<ErrorPayload>(body) {
        Ok(error) => UpstreamOutcome::Degraded(error.message()),
        Err(_) => UpstreamOutcome::Fatal(UpstreamError::UnexpectedStatus {
            url: url.to_string(),
            status,
        }),
    }
}

/// Append path segments to a base URL, percent-encoding each segment.
///
/// Dot segments are refused: the URL parser would drop them and the request
/// would reach a different resource.
pub(crate) fn endpoint_url(base: &Url, segments: &[&str]) -> std::result::Result<Url, UpstreamError> {
    if let Some(segment) = segments.iter().find(|s| is_dot_segment(s)) {
        return Err(UpstreamError::InvalidSegment {
            base: base.to_string(),
            segment: segment.to_string(),
        });
    }

    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| UpstreamError::InvalidUrl {
            base: base.to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
