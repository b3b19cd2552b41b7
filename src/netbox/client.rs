use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::NetboxSettings;
use crate::error::{AgentError, Result};
use crate::netbox::{Collection, DcimApi, Query, Record};

#[derive(Debug, Deserialize)]
struct Page {
    results: Vec<Record>,
    next: Option<String>,
}

/// Blocking REST client for the NetBox API.
pub struct NetboxClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl NetboxClient {
    pub fn new(settings: &NetboxSettings) -> Result<Self> {
        let http = Client::builder()
            .danger_accept_invalid_certs(!settings.ssl_verify)
            .build()?;

        Ok(NetboxClient {
            http,
            base_url: settings.url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
        })
    }

    fn collection_url(&self, collection: Collection) -> String {
        format!("{}/api/{}/", self.base_url, collection.path())
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header("Accept", "application/json");
        match &self.token {
            Some(token) => builder.header("Authorization", format!("Token {}", token)),
            None => builder,
        }
    }

    fn send(builder: RequestBuilder) -> Result<Response> {
        let response = builder.send()?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text()?;
            Err(AgentError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }
}

impl DcimApi for NetboxClient {
    fn filter(&self, collection: Collection, query: &Query) -> Result<Vec<Record>> {
        debug!("GET {} ?{}", collection, query);
        let first = self
            .request(Method::GET, &self.collection_url(collection))
            .query(query.pairs());
        let mut page: Page = Self::send(first)?.json()?;
        let mut records = std::mem::take(&mut page.results);

        // `next` already carries the filter parameters.
        while let Some(next) = page.next.take() {
            page = Self::send(self.request(Method::GET, &next))?.json()?;
            records.append(&mut page.results);
        }

        Ok(records)
    }

    fn create(&self, collection: Collection, fields: Value) -> Result<Record> {
        debug!("POST {} {}", collection, fields);
        let builder = self
            .request(Method::POST, &self.collection_url(collection))
            .json(&fields);
        Ok(Self::send(builder)?.json()?)
    }

    fn save(&self, collection: Collection, record: &mut Record) -> Result<()> {
        let changes = record.changes();
        if changes.is_empty() {
            return Ok(());
        }

        let url = format!("{}{}/", self.collection_url(collection), record.id);
        debug!("PATCH {} {:?}", url, changes);
        Self::send(self.request(Method::PATCH, &url).json(&changes))?;
        record.mark_saved();
        Ok(())
    }
}
