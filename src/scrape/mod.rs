use reqwest::StatusCode;
use std::{error::Error, time::Duration};

use crate::errors::IngestError;

/// A desktop browser identity. The watch page serves different (and sometimes
/// duration-less) markup to unknown clients.
pub const USER_AGENT_DEFAULT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// How much of an error body ends up in logs and error messages.
const BODY_SNIPPET_LEN: usize = 500;

pub fn get_error(error: &reqwest::Error) -> String {
    match error.source() {
        Some(e) => match e.source() {
            Some(e) => e.to_string(),
            None => e.to_string(),
        },
        None => error.to_string(),
    }
}

pub fn build_client(
    user_agent: &str,
    timeout: Duration,
) -> Result<reqwest::blocking::Client, IngestError> {
    reqwest::blocking::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .pool_idle_timeout(Duration::from_secs(10))
        .build()
        .map_err(|err| IngestError::Config(format!("cannot build http client: {}", get_error(&err))))
}

/// ASCII-only, length-capped view of a response body for diagnostics.
pub fn body_snippet(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii())
        .take(BODY_SNIPPET_LEN)
        .collect()
}

/// Failures worth retrying: rate limiting and server side errors.
pub fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}

/// GET a page and return its body as text.
///
/// Connection errors, timeouts and transient statuses map to [`IngestError::Transient`],
/// any other non-2xx status to [`IngestError::Remote`].
pub fn fetch_page(client: &reqwest::blocking::Client, url: &str) -> Result<String, IngestError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|err| IngestError::InvalidUrl(format!("{url}: {err}")))?;
    let iden = format!("{}{}", parsed.host_str().unwrap_or_default(), parsed.path());

    log::debug!("{iden}: requesting");

    let resp = client.get(parsed).send().map_err(|err| {
        log::warn!("{iden}: {err}: {:?}", get_error(&err));
        IngestError::Transient(format!("{iden}: {}", get_error(&err)))
    })?;

    let status = resp.status();

    if !status.is_success() {
        log::debug!("{iden}: {status}");
        let body = body_snippet(&resp.text().unwrap_or_default());
        if is_transient_status(status) {
            return Err(IngestError::Transient(format!("{iden}: http {status}")));
        }
        return Err(IngestError::Remote {
            status: status.as_u16(),
            body,
        });
    }

    // we might get OK and still fail to read the body
    let bytes = resp
        .bytes()
        .map_err(|err| IngestError::Transient(format!("{iden}: {}", get_error(&err))))?;

    Ok(String::from_utf8_lossy(&bytes).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_snippet_strips_non_ascii_and_caps_length() {
        assert_eq!(body_snippet("ok ção!"), "ok o!");
        assert_eq!(body_snippet(&"x".repeat(2000)).len(), BODY_SNIPPET_LEN);
    }

    #[test]
    fn test_transient_statuses() {
        assert!(is_transient_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_transient_status(StatusCode::BAD_GATEWAY));
        assert!(!is_transient_status(StatusCode::NOT_FOUND));
        assert!(!is_transient_status(StatusCode::FORBIDDEN));
    }
}
