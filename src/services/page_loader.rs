//! Fetch-and-shape for one dashboard page
//!
//! A `PageRequest` captures the page and its filter selection; `load` fetches
//! the matching report and runs it through the aggregator.

use serde::Serialize;
use std::time::Duration;

use crate::config::Config;
use crate::services::client::{ChargebackFilter, ReportClient};
use crate::services::Aggregator;
use crate::types::{ChargebackView, Dimension, ExecutiveView, Result, TrendView};

#[derive(Debug, Clone, PartialEq)]
pub enum PageRequest {
    Chargeback {
        filter: ChargebackFilter,
        top_n: usize,
    },
    Executive {
        top_n: usize,
    },
    Trends {
        days: u32,
        dimension: Dimension,
        top_n: usize,
    },
}

/// Display-ready result for one page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "lowercase")]
pub enum PageView {
    Chargeback(ChargebackView),
    Executive(ExecutiveView),
    Trends(TrendView),
}

impl PageRequest {
    pub fn name(&self) -> &'static str {
        match self {
            PageRequest::Chargeback { .. } => "chargeback summary",
            PageRequest::Executive { .. } => "executive summary",
            PageRequest::Trends { .. } => "cost trends",
        }
    }

    /// How often `watch` refreshes this page
    pub fn poll_interval(&self, config: &Config) -> Duration {
        match self {
            PageRequest::Trends { .. } => config.trend_poll_interval(),
            _ => config.poll_interval(),
        }
    }

    pub async fn load(&self, client: &ReportClient) -> Result<PageView> {
        match self {
            PageRequest::Chargeback { filter, top_n } => {
                let summary = client.chargeback_summary(filter).await?;
                Ok(PageView::Chargeback(Aggregator::chargeback_view(&summary, *top_n)))
            }
            PageRequest::Executive { top_n } => {
                let summary = client.executive_summary().await?;
                Ok(PageView::Executive(Aggregator::executive_view(&summary, *top_n)))
            }
            PageRequest::Trends {
                days,
                dimension,
                top_n,
            } => {
                let trends = client.cost_trends(*days, *dimension).await?;
                Ok(PageView::Trends(Aggregator::trend_view(&trends, *dimension, *top_n)))
            }
        }
    }
}
