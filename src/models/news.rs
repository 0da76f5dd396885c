use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CrawlStatus;

pub const TITLE_MAX_CHARS: usize = 500;
pub const URL_MAX_CHARS: usize = 1000;
pub const KEYWORD_MAX_CHARS: usize = 200;
pub const VERSION_MAX_CHARS: usize = 50;

/// A row of `naver_news`: one article surfaced by the search API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub news_id: i64,
    pub title: String,
    pub pub_date: DateTime<Utc>,
    pub url: String,
    pub search_keyword: Option<String>,
    pub api_request_date: DateTime<Utc>,
    pub crawl_status: CrawlStatus,
    pub crawl_attempt_count: i64,
    pub url_filter_version: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNewsArticle {
    pub title: String,
    pub pub_date: DateTime<Utc>,
    pub url: String,
    pub search_keyword: Option<String>,
    pub api_request_date: DateTime<Utc>,
}
