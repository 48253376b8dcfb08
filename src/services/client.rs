//! HTTP client for the backend report API
//!
//! One request per call, no retries: a failed fetch is terminal for that
//! cycle and the next poll or command is the retry.

use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::types::{
    decode_report, ChargebackSummary, ChargeviewError, CostTrends, Dimension, ExecutiveSummary,
    Result,
};

const CHARGEBACK_PATH: &str = "/api/chargeback/summary";
const EXECUTIVE_PATH: &str = "/api/executive/summary";
const TRENDS_PATH: &str = "/api/cost/trends";

/// Filter selection for the chargeback page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargebackFilter {
    pub period_days: u32,
    pub team: Option<String>,
}

impl Default for ChargebackFilter {
    fn default() -> Self {
        Self {
            period_days: 30,
            team: None,
        }
    }
}

/// Async client for the report endpoints
#[derive(Debug, Clone)]
pub struct ReportClient {
    http: reqwest::Client,
    api_root: String,
}

impl ReportClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ChargeviewError::Http(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            http,
            api_root: config.api_root().to_string(),
        })
    }

    /// Fetch the chargeback summary for a period, optionally for one team
    pub async fn chargeback_summary(&self, filter: &ChargebackFilter) -> Result<ChargebackSummary> {
        let mut query = vec![("period_days", filter.period_days.to_string())];
        if let Some(team) = &filter.team {
            query.push(("team", team.clone()));
        }
        self.get(CHARGEBACK_PATH, &query).await
    }

    pub async fn executive_summary(&self) -> Result<ExecutiveSummary> {
        self.get(EXECUTIVE_PATH, &[]).await
    }

    /// Fetch daily cost records for the last `days`, grouped by `dimension`
    pub async fn cost_trends(&self, days: u32, dimension: Dimension) -> Result<CostTrends> {
        let query = [
            ("days", days.to_string()),
            ("group_by", dimension.as_str().to_string()),
        ];
        self.get(TRENDS_PATH, &query).await
    }

    async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.api_root, path);
        log::debug!("GET {} {:?}", url, query);

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ChargeviewError::Http(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChargeviewError::Http(format!("{} returned status {}", url, status)));
        }

        let mut body = response
            .bytes()
            .await
            .map_err(|e| ChargeviewError::Http(format!("reading {} failed: {}", url, e)))?
            .to_vec();

        decode_report(&mut body)
    }
}
