use crate::error::Result;
use crate::remote::{ensure_success, http_client, parse_url, send};
use crate::traits::InstallNotifier;
use reqwest::blocking::Client;
use serde::Serialize;

#[derive(Serialize)]
struct InstallEvent<'a> {
    code: &'a str,
    version: &'a str,
}

/// Posts install events to the catalog host. Disabled via the `notify` setting.
pub struct HttpInstallNotifier {
    client: Client,
    url: String,
    enabled: bool,
}

impl HttpInstallNotifier {
    pub fn new(url: &str, enabled: bool) -> Result<Self> {
        parse_url(url)?;
        Ok(Self {
            client: http_client()?,
            url: url.to_string(),
            enabled,
        })
    }
}

impl InstallNotifier for HttpInstallNotifier {
    fn notify(&self, code: &str, version: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let request = self
            .client
            .post(&self.url)
            .json(&InstallEvent { code, version });
        ensure_success(send(request, &self.url)?, &self.url)?;
        Ok(())
    }
}
