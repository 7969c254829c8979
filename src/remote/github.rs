use crate::error::{Result, WorkshopError};
use crate::remote::{ensure_success, http_client, is_not_found, parse_url, send};
use crate::traits::{GitHubApi, TagRef};
use reqwest::blocking::{Client, RequestBuilder};

/// GitHub REST API client for tag refs and zipball archives.
pub struct GitHubClient {
    client: Client,
    api_base: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(api_base: &str, token: Option<String>) -> Result<Self> {
        parse_url(api_base)?;
        Ok(Self {
            client: http_client()?,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    fn tags_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{}/{}/git/refs/tags", self.api_base, owner, repo)
    }

    fn archive_url(&self, owner: &str, repo: &str, reference: &str) -> String {
        format!("{}/repos/{}/{}/zipball/{}", self.api_base, owner, repo, reference)
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json");
        match &self.token {
            Some(token) => request.header("Authorization", format!("token {}", token)),
            None => request,
        }
    }
}

impl GitHubApi for GitHubClient {
    fn tags(&self, owner: &str, repo: &str) -> Result<Vec<TagRef>> {
        let url = self.tags_url(owner, repo);
        let response = send(self.get(&url), &url)?;

        // GitHub answers 404 for a repository without any tag refs.
        if is_not_found(&response) {
            return Ok(Vec::new());
        }

        let body = ensure_success(response, &url)?
            .text()
            .map_err(|e| WorkshopError::RemoteFetchError(e.to_string()))?;
        parse_tag_refs(&body)
    }

    fn archive(&self, owner: &str, repo: &str, reference: &str) -> Result<Vec<u8>> {
        let url = self.archive_url(owner, repo, reference);
        let response = ensure_success(send(self.get(&url), &url)?, &url)?;
        let bytes = response
            .bytes()
            .map_err(|e| WorkshopError::RemoteFetchError(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// The refs endpoint returns a single object instead of an array when only
/// one ref matches.
pub(crate) fn parse_tag_refs(body: &str) -> Result<Vec<TagRef>> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let refs = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    };
    Ok(refs)
}
