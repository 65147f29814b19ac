//! `reqwest`-backed implementation of [`DashboardApi`].

use reqwest::Client;
use reqwest::header;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::{DeskwatchError, Result};
use crate::types::{
    AgentList, DeskList, EventList, Health, Overview, TicketDetail, TicketList, TicketRef,
};

use super::{
    AGENTS_PATH, DESKS_PATH, DashboardApi, EVENTS_PATH, HEALTH_PATH, OVERVIEW_PATH, TICKETS_PATH,
    TicketQuery,
};

/// HTTP client for the dashboard backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base: Url,
}

impl HttpClient {
    /// Create a client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            base: config.base_url()?,
        })
    }

    /// Create a client against `base` with a caller-supplied `reqwest::Client`
    pub fn with_client(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve an endpoint under the base URL. Each segment is percent-encoded,
    /// so a ticket reference can never escape its path segment.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                DeskwatchError::Config(format!("base URL '{}' cannot be a base", self.base))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn endpoint_for(&self, path: &str) -> Result<Url> {
        self.endpoint(path.split('/').filter(|s| !s.is_empty()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let path = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        tracing::debug!(%path, "GET");

        let response = self
            .client
            .get(url)
            .header(header::CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeskwatchError::Status {
                status: status.as_u16(),
                path,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

impl DashboardApi for HttpClient {
    async fn overview(&self) -> Result<Overview> {
        self.get_json(self.endpoint_for(OVERVIEW_PATH)?).await
    }

    async fn tickets(&self, query: &TicketQuery) -> Result<TicketList> {
        let mut url = self.endpoint_for(TICKETS_PATH)?;
        url.query_pairs_mut().extend_pairs(query.to_pairs());
        self.get_json(url).await
    }

    async fn desk_summary(&self) -> Result<DeskList> {
        self.get_json(self.endpoint_for(DESKS_PATH)?).await
    }

    async fn agent_load(&self) -> Result<AgentList> {
        self.get_json(self.endpoint_for(AGENTS_PATH)?).await
    }

    async fn recent_events(&self, limit: u32) -> Result<EventList> {
        let mut url = self.endpoint_for(EVENTS_PATH)?;
        url.query_pairs_mut().append_pair("limit", &limit.to_string());
        self.get_json(url).await
    }

    async fn ticket_detail(&self, ticket_ref: &TicketRef) -> Result<TicketDetail> {
        let url = self.endpoint(
            TICKETS_PATH
                .split('/')
                .filter(|s| !s.is_empty())
                .chain(std::iter::once(ticket_ref.as_str())),
        )?;
        self.get_json(url).await
    }

    async fn health(&self) -> Result<Health> {
        self.get_json(self.endpoint_for(HEALTH_PATH)?).await
    }
}
