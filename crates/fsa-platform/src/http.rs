//! HTTP responses as save sources.

use futures::StreamExt;

use fsa_core::{Headers, HostError, ResponseSource};

/// Wraps a `reqwest` response: its headers feed type inference and its body
/// is piped chunk by chunk.
pub fn response_source(response: reqwest::Response) -> ResponseSource {
    let headers: Headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let body = response
        .bytes_stream()
        .map(|chunk| chunk.map_err(|e| HostError::Other(anyhow::Error::new(e))))
        .boxed();

    ResponseSource::new(headers, Some(body))
}

/// GETs `url` and returns the response as a save source. Non-success
/// statuses are errors.
pub async fn fetch_response_source(
    client: &reqwest::Client,
    url: &str,
) -> Result<ResponseSource, HostError> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| HostError::Other(anyhow::Error::new(e).context(format!("GET {url}"))))?;
    Ok(response_source(response))
}
