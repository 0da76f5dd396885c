use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FilterStatus;

pub const FILTER_REASON_MAX_CHARS: usize = 100;

/// A row of `crawled_news`: the fetched body of exactly one article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawledContent {
    pub crawled_news_id: i64,
    pub news_id: i64,
    pub text: Option<String>,
    pub crawled_at: DateTime<Utc>,
    pub crawler_version: Option<String>,
    pub response_time_ms: Option<i64>,
    pub filter_status: FilterStatus,
    pub filter_version: Option<String>,
    pub filtered_at: Option<DateTime<Utc>>,
    pub filter_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCrawledContent {
    pub news_id: i64,
    pub text: Option<String>,
    pub crawled_at: DateTime<Utc>,
    pub crawler_version: String,
    pub response_time_ms: i64,
}

/// Verdict of the content filter for one crawled row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    Passed,
    FilteredOut { reason: String },
}

impl FilterOutcome {
    pub fn status(&self) -> FilterStatus {
        match self {
            FilterOutcome::Passed => FilterStatus::Passed,
            FilterOutcome::FilteredOut { .. } => FilterStatus::FilteredOut,
        }
    }

    /// Reason code as stored, clipped to the column bound.
    pub fn reason(&self) -> Option<String> {
        match self {
            FilterOutcome::Passed => None,
            FilterOutcome::FilteredOut { reason } => {
                Some(reason.chars().take(FILTER_REASON_MAX_CHARS).collect())
            }
        }
    }
}
