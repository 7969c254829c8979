use crate::error::{Result, WorkshopError};
use crate::remote::{ensure_success, host_of, http_client, parse_url, send};
use crate::traits::CatalogSource;
use reqwest::Url;
use reqwest::blocking::Client;
use std::net::ToSocketAddrs;

/// Catalog document served over HTTP(S).
pub struct HttpCatalogSource {
    client: Client,
    url: Url,
    host: String,
}

impl HttpCatalogSource {
    pub fn new(url: &str) -> Result<Self> {
        let url = parse_url(url)?;
        let host = host_of(&url)?;
        Ok(Self {
            client: http_client()?,
            url,
            host,
        })
    }
}

impl CatalogSource for HttpCatalogSource {
    fn host(&self) -> String {
        self.host.clone()
    }

    fn is_reachable(&self) -> bool {
        let port = self.url.port_or_known_default().unwrap_or(443);
        (self.host.as_str(), port)
            .to_socket_addrs()
            .map(|mut addrs| addrs.next().is_some())
            .unwrap_or(false)
    }

    fn fetch(&self) -> Result<String> {
        let url = self.url.as_str();
        let response = ensure_success(send(self.client.get(url), url)?, url)?;
        response
            .text()
            .map_err(|e| WorkshopError::RemoteFetchError(e.to_string()))
    }
}
