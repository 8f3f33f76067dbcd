use crate::config::{CatalogConfig, Config, HintConfig};
use crate::errors::IngestError;
use crate::scrape;

use super::{
    backend::CatalogBackend,
    hint::parse_hint,
    types::{ChannelDescriptor, EdgeChannels, NewChannelItem},
};

const API_KEY_HEADER: &str = "X-API-KEY";

/// HTTP client of the central catalog.
///
/// One client per call class so each gets its own timeout.
pub struct CatalogRemote {
    remote_addr: String,
    api_key: Option<String>,
    listing_path: String,
    create_path: String,
    hint: HintConfig,
    listing_client: reqwest::blocking::Client,
    write_client: reqwest::blocking::Client,
}

impl CatalogRemote {
    pub fn new(config: &Config) -> Result<CatalogRemote, IngestError> {
        let CatalogConfig {
            base_url,
            api_key,
            listing_path,
            create_path,
            hint,
        } = &config.catalog;

        let remote_addr = base_url.strip_suffix('/').unwrap_or(base_url).to_string();

        Ok(CatalogRemote {
            remote_addr,
            api_key: api_key.clone(),
            listing_path: listing_path.clone(),
            create_path: create_path.clone(),
            hint: hint.clone(),
            listing_client: scrape::build_client(&config.user_agent, config.listing_timeout())?,
            write_client: scrape::build_client(&config.user_agent, config.write_timeout())?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.remote_addr, path)
    }

    fn get(&self, path: &str) -> reqwest::blocking::RequestBuilder {
        let url = self.url(path);
        log::debug!("GET {url}");

        let req = self.listing_client.get(&url);
        match &self.api_key {
            Some(key) => req.header(API_KEY_HEADER, key),
            None => req,
        }
    }

    fn post(&self, path: &str) -> reqwest::blocking::RequestBuilder {
        let url = self.url(path);
        log::info!("POST {url}");

        let req = self.write_client.post(&url);
        match &self.api_key {
            Some(key) => req.header(API_KEY_HEADER, key),
            None => req,
        }
    }

    pub fn hint_page_path(&self, channel_id: &str) -> String {
        self.hint.page_path.replace("{channel_id}", channel_id)
    }
}

fn handle_status(response: reqwest::blocking::Response) -> Result<String, IngestError> {
    let status = response.status();
    let text = response.text()?;

    if !status.is_success() {
        return Err(IngestError::Remote {
            status: status.as_u16(),
            body: scrape::body_snippet(&text),
        });
    }

    Ok(text)
}

impl CatalogBackend for CatalogRemote {
    fn list_channels(&self) -> Result<Vec<ChannelDescriptor>, IngestError> {
        let resp = self.get(&self.listing_path).send()?;
        let text = handle_status(resp)?;

        let payload = serde_json::from_str::<EdgeChannels>(&text).map_err(|err| {
            log::error!("{err}. tried to parse: {:?}", scrape::body_snippet(&text));
            err
        })?;

        Ok(payload.flatten())
    }

    fn create_item(&self, item: &NewChannelItem) -> Result<(), IngestError> {
        let resp = self.post(&self.create_path).form(&item.form_fields()).send()?;

        let status = resp.status();
        let text = resp.text().unwrap_or_default();
        log::info!("Response: {} {}", status.as_u16(), scrape::body_snippet(&text));

        if !status.is_success() {
            return Err(IngestError::Remote {
                status: status.as_u16(),
                body: scrape::body_snippet(&text),
            });
        }

        Ok(())
    }

    fn lookup_hint(&self, channel_id: &str) -> Result<Option<String>, IngestError> {
        if !self.hint.enabled {
            return Ok(None);
        }

        let resp = self.get(&self.hint_page_path(channel_id)).send()?;
        let html = handle_status(resp)?;

        Ok(parse_hint(&html, &self.hint.selector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(base_url: &str) -> CatalogRemote {
        let mut config = Config::default();
        config.catalog.base_url = base_url.to_string();
        CatalogRemote::new(&config).unwrap()
    }

    #[test]
    fn test_trailing_slash_is_stripped() {
        let remote = remote("http://central:8000/");
        assert_eq!(
            remote.url("/api/edge/channels"),
            "http://central:8000/api/edge/channels"
        );
    }

    #[test]
    fn test_hint_page_path_substitutes_channel() {
        let remote = remote("http://central");
        assert_eq!(remote.hint_page_path("42"), "/admin/channels/42");
    }

    #[test]
    fn test_disabled_hint_never_hits_network() {
        let mut config = Config::default();
        // unroutable on purpose, a request would fail
        config.catalog.base_url = "http://127.0.0.1:9".to_string();
        config.catalog.hint.enabled = false;
        let remote = CatalogRemote::new(&config).unwrap();
        assert_eq!(remote.lookup_hint("1").unwrap(), None);
    }
}
