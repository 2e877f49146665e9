//! Shared HTTP plumbing for backend adapters.

use polysearch_core::{AppConfig, BackendError, Error};
use reqwest::{Client, StatusCode};

/// Build the [`reqwest::Client`] shared by every network-backed adapter.
///
/// Timeouts and the User-Agent come from [`AppConfig`]; redirects are
/// limited to 5.
pub fn build_client(config: &AppConfig) -> Result<Client, Error> {
    Client::builder()
        .user_agent(&config.user_agent)
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .redirect(reqwest::redirect::Policy::limited(5))
        .use_rustls_tls()
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
        .map_err(|e| Error::Internal(format!("failed to build HTTP client: {e}")))
}

/// GET `url` and return the body as text. Anything but 200 is a failure.
pub async fn fetch_text(client: &Client, url: &str, accept: &str) -> Result<String, BackendError> {
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, accept)
        .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .send()
        .await
        .map_err(request_error)?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(BackendError::Status(status.as_u16()));
    }

    response.text().await.map_err(request_error)
}

fn request_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Http(format!("request timed out: {e}"))
    } else if e.is_decode() {
        BackendError::Parse(e.to_string())
    } else {
        BackendError::Http(e.to_string())
    }
}

/// Form-encode a value for use inside a URL (spaces become `+`, reserved characters are escaped).
pub fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Substitute the encoded `value` for `placeholder` in a URL template.
pub fn fill(template: &str, placeholder: &str, value: &str) -> String {
    template.replace(placeholder, &encode(value))
}
