//! Blocking HTTP implementations of the collaborator traits.

pub mod catalog_source;
pub mod github;
pub mod notify;

use crate::error::{Result, WorkshopError};
use crate::project_identity;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};

pub(crate) fn http_client() -> Result<Client> {
    Client::builder()
        .user_agent(project_identity::user_agent())
        .build()
        .map_err(|e| WorkshopError::RemoteFetchError(e.to_string()))
}

pub(crate) fn send(request: RequestBuilder, url: &str) -> Result<Response> {
    request
        .send()
        .map_err(|e| WorkshopError::RemoteFetchError(format!("Network error for {}: {}", url, e)))
}

pub(crate) fn ensure_success(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(WorkshopError::RemoteFetchError(format!(
        "HTTP {} for {}",
        status, url
    )))
}

pub(crate) fn is_not_found(response: &Response) -> bool {
    response.status() == StatusCode::NOT_FOUND
}

/// Host part of `url`, for reachability checks and messages.
pub(crate) fn host_of(url: &reqwest::Url) -> Result<String> {
    url.host_str()
        .map(str::to_string)
        .ok_or_else(|| WorkshopError::ConfigError(format!("URL has no host: {}", url)))
}

pub(crate) fn parse_url(raw: &str) -> Result<reqwest::Url> {
    reqwest::Url::parse(raw)
        .map_err(|e| WorkshopError::ConfigError(format!("Invalid URL '{}': {}", raw, e)))
}
