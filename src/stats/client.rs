//! HTTP client for the HAProxy stats page.
//!
//! # Responsibilities
//! - Build the CSV export URL from the configured stats location
//! - Authenticate with HTTP basic auth
//! - Bound every fetch with the acquisition timeout
//! - Turn the page into counters or availability tallies

use std::collections::{BTreeMap, BTreeSet};

use url::Url;

use crate::config::StatsConfig;
use crate::resilience::timeouts::with_acquisition_timeout;
use crate::stats::csv::{parse_stats, StatsPage};
use crate::stats::types::{
    sum_counters, tally_listeners, BackendAvailability, ResponseCounters, StatsError, StatsResult,
};
use crate::stats::StatsSource;

const CSV_SUFFIX: &str = ";csv;norefresh";

/// Build the CSV export URL for a stats location such as `127.0.0.1/haproxy/stats`.
pub fn stats_url(base_url_path: &str) -> StatsResult<Url> {
    let base = base_url_path.trim().trim_end_matches('/');
    if base.is_empty() {
        return Err(StatsError::Acquisition("stats base URL is empty".to_string()));
    }

    let with_scheme = if base.contains("://") {
        base.to_string()
    } else {
        format!("http://{}", base)
    };

    Url::parse(&format!("{}/{}", with_scheme, CSV_SUFFIX)).map_err(|e| {
        StatsError::Acquisition(format!("Invalid stats URL '{}': {}", base_url_path, e))
    })
}

/// Stats source backed by the HAProxy stats HTTP endpoint.
#[derive(Clone)]
pub struct HttpStatsSource {
    client: reqwest::Client,
    url: Url,
    username: Option<String>,
    password: Option<String>,
    timeout_secs: u64,
}

impl HttpStatsSource {
    /// Create a new stats source from configuration.
    pub fn new(config: &StatsConfig) -> StatsResult<Self> {
        let url = stats_url(&config.base_url_path)?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("haproxy-checks/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StatsError::Acquisition(e.to_string()))?;

        tracing::debug!(
            url = %url,
            timeout_secs = config.timeout_secs,
            "Stats source initialized"
        );

        Ok(Self {
            client,
            url,
            username: config.username.clone(),
            password: config.password.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    async fn fetch_page(&self) -> StatsResult<StatsPage> {
        with_acquisition_timeout(self.timeout_secs, async {
            let mut request = self.client.get(self.url.clone());
            if let Some(username) = &self.username {
                request = request.basic_auth(username, self.password.as_deref());
            }

            let response = request
                .send()
                .await
                .map_err(|e| StatsError::Acquisition(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(StatsError::Acquisition(format!(
                    "stats endpoint {} returned status {}",
                    self.url, status
                )));
            }

            let body = response
                .text()
                .await
                .map_err(|e| StatsError::Acquisition(e.to_string()))?;

            parse_stats(&body)
        })
        .await
    }
}

impl StatsSource for HttpStatsSource {
    async fn fetch_response_counters(&self, prefix: &str) -> StatsResult<ResponseCounters> {
        let page = self.fetch_page().await?;
        let counters = sum_counters(page.backend_counters(), prefix)?;
        tracing::debug!(
            backend = prefix,
            total = counters.total(),
            hrsp_5xx = counters.hrsp_5xx,
            "Sampled response counters"
        );
        Ok(counters)
    }

    async fn fetch_listener_statuses(
        &self,
        filter: Option<&BTreeSet<String>>,
    ) -> StatsResult<BTreeMap<String, BackendAvailability>> {
        let page = self.fetch_page().await?;
        Ok(tally_listeners(page.listeners, filter))
    }
}

impl std::fmt::Debug for HttpStatsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpStatsSource")
            .field("url", &self.url.as_str())
            .field("username", &self.username)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
