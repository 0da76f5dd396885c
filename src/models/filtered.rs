use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CrawlStatus, FilterStatus};

/// A row of `filtered_news`, marking a crawled article as accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilteredNews {
    pub filtered_news_id: i64,
    pub news_id: i64,
    pub crawled_news_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row of the `v_filtered_news_full` view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullFilteredNews {
    pub filtered_news_id: i64,
    pub news_id: i64,
    pub title: String,
    pub url: String,
    pub pub_date: DateTime<Utc>,
    pub text: Option<String>,
}

/// Acceptance row whose crawled content belongs to a different article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MismatchedFilteredNews {
    pub filtered_news_id: i64,
    pub news_id: i64,
    pub crawled_news_id: i64,
    pub crawled_news_owner: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineStats {
    pub crawl_status: BTreeMap<String, i64>,
    pub filter_status: BTreeMap<String, i64>,
    pub accepted: i64,
}

impl PipelineStats {
    pub fn crawl_count(&self, status: CrawlStatus) -> i64 {
        self.crawl_status.get(status.as_str()).copied().unwrap_or(0)
    }

    pub fn filter_count(&self, status: FilterStatus) -> i64 {
        self.filter_status.get(status.as_str()).copied().unwrap_or(0)
    }
}
