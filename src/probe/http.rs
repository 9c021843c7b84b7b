//! HTTP probe implementation.

use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::Client;

use super::ProbeError;

/// Status and payload size of a completed 2xx response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_code: u16,
    pub size_bytes: u64,
}

/// Prefix bare addresses with `http://`.
pub fn normalize_url(address: &str) -> String {
    if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else {
        format!("http://{}", address)
    }
}

/// Build the client shared by all probes of a run.
///
/// Redirects are not followed and idle connections are not kept, so every
/// probe pays for its own connection.
pub fn build_client(timeout: Duration) -> Result<Client, ProbeError> {
    Client::builder()
        .timeout(timeout)
        .redirect(Policy::none())
        .pool_max_idle_per_host(0)
        .build()
        .map_err(|e| ProbeError::Config(e.to_string()))
}

/// Run an HTTP GET against the given URL and read the full body.
pub async fn run_http_probe(client: &Client, url: &str, timeout: Duration) -> Result<HttpResponse, ProbeError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_error(e, timeout))?;

    // The reason is the standard phrase for the code, not the server's own text
    let status = response.status();
    if !status.is_success() {
        return Err(ProbeError::HttpStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        });
    }

    // Read the full body to measure complete transfer time
    let body = response
        .bytes()
        .await
        .map_err(|e| classify_error(e, timeout))?;

    Ok(HttpResponse {
        status_code: status.as_u16(),
        size_bytes: body.len() as u64,
    })
}

fn classify_error(e: reqwest::Error, timeout: Duration) -> ProbeError {
    if e.is_timeout() {
        ProbeError::Timeout(timeout)
    } else {
        ProbeError::Network(error_chain(&e))
    }
}

/// Flatten an error and its sources, e.g. "error sending request: connection refused".
fn error_chain(e: &dyn std::error::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
