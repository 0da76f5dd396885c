use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{NewNewsArticle, KEYWORD_MAX_CHARS, TITLE_MAX_CHARS, URL_MAX_CHARS};

const NAVER_NEWS_API_URL: &str = "https://openapi.naver.com/v1/search/news.json";

/// Largest page the search API hands out.
pub const MAX_DISPLAY: usize = 100;

static TAG_RE: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, Deserialize)]
pub struct NaverItem {
    pub title: String,
    pub link: String,
    #[serde(rename = "pubDate")]
    pub pub_date: String,
}

#[derive(Debug, Deserialize)]
struct NaverSearchResponse {
    #[serde(default)]
    items: Vec<NaverItem>,
}

/// Anything that can page through news search results.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// One page of results sorted by date; `start` is 1-based.
    async fn search(&self, query: &str, display: usize, start: usize) -> Result<Vec<NaverItem>>;
}

pub struct NaverClient {
    client: Client,
    client_id: String,
    client_secret: String,
    api_url: String,
}

impl NaverClient {
    pub fn new(client_id: String, client_secret: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("newsdesk/1.0")
            .build()?;

        Ok(Self {
            client,
            client_id,
            client_secret,
            api_url: NAVER_NEWS_API_URL.to_string(),
        })
    }
}

#[async_trait]
impl NewsSource for NaverClient {
    async fn search(&self, query: &str, display: usize, start: usize) -> Result<Vec<NaverItem>> {
        let display = display.clamp(1, MAX_DISPLAY).to_string();
        let start = start.to_string();

        let response = self
            .client
            .get(&self.api_url)
            .header("X-Naver-Client-Id", &self.client_id)
            .header("X-Naver-Client-Secret", &self.client_secret)
            .query(&[
                ("query", query),
                ("display", display.as_str()),
                ("start", start.as_str()),
                ("sort", "date"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::NaverApi(format!("HTTP {}: {}", status, error_text)));
        }

        let body: NaverSearchResponse = response.json().await?;
        Ok(body.items)
    }
}

/// Turns a search hit into an insertable row, or `None` if it can't be stored.
pub fn parse_item(
    item: &NaverItem,
    search_keyword: &str,
    requested_at: DateTime<Utc>,
) -> Option<NewNewsArticle> {
    let pub_date = match DateTime::parse_from_rfc2822(item.pub_date.trim()) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(e) => {
            tracing::warn!("Unparsable pubDate '{}' for {}: {}", item.pub_date, item.link, e);
            return None;
        }
    };

    if item.link.chars().count() > URL_MAX_CHARS {
        tracing::warn!("URL too long, skipping: {}...", truncate(&item.link, 80));
        return None;
    }

    Some(NewNewsArticle {
        title: truncate(&clean_title(&item.title), TITLE_MAX_CHARS),
        pub_date,
        url: item.link.clone(),
        search_keyword: Some(truncate(search_keyword, KEYWORD_MAX_CHARS)),
        api_request_date: requested_at,
    })
}

/// Drops the `<b>` highlighting and decodes the entities the API escapes.
fn clean_title(raw: &str) -> String {
    let re = TAG_RE.get_or_init(|| Regex::new(r"<.*?>").expect("tag pattern is valid"));
    re.replace_all(raw, "")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn item(title: &str, link: &str, pub_date: &str) -> NaverItem {
        NaverItem {
            title: title.to_string(),
            link: link.to_string(),
            pub_date: pub_date.to_string(),
        }
    }

    #[test]
    fn deserializes_api_payload() {
        let json = r#"{
            "lastBuildDate": "Mon, 03 Mar 2025 10:00:00 +0900",
            "total": 2,
            "start": 1,
            "display": 1,
            "items": [{
                "title": "<b>속보</b> 제목",
                "originallink": "https://press.example/1",
                "link": "https://n.news.naver.com/mnews/article/001/1",
                "description": "요약",
                "pubDate": "Mon, 03 Mar 2025 09:59:00 +0900"
            }]
        }"#;
        let body: NaverSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.items.len(), 1);
        assert_eq!(body.items[0].link, "https://n.news.naver.com/mnews/article/001/1");
        assert_eq!(body.items[0].pub_date, "Mon, 03 Mar 2025 09:59:00 +0900");
    }

    #[test]
    fn parse_item_cleans_title_and_converts_date() {
        let now = Utc::now();
        let parsed = parse_item(
            &item(
                "<b>정부</b>, &quot;예산&quot; 발표 &amp; 설명",
                "https://n.news.naver.com/a/1",
                "Mon, 03 Mar 2025 09:00:00 +0900",
            ),
            "다",
            now,
        )
        .unwrap();

        assert_eq!(parsed.title, "정부, \"예산\" 발표 & 설명");
        assert_eq!(parsed.pub_date, Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap());
        assert_eq!(parsed.url, "https://n.news.naver.com/a/1");
        assert_eq!(parsed.search_keyword.as_deref(), Some("다"));
        assert_eq!(parsed.api_request_date, now);
    }

    #[test]
    fn parse_item_skips_bad_dates_and_long_urls() {
        let now = Utc::now();
        assert!(parse_item(&item("t", "https://a.example", "yesterday"), "q", now).is_none());

        let long = format!("https://a.example/{}", "x".repeat(1000));
        assert!(parse_item(&item("t", &long, "Mon, 03 Mar 2025 09:00:00 +0900"), "q", now).is_none());
    }

    #[test]
    fn parse_item_clips_long_titles() {
        let title = "가".repeat(600);
        let parsed = parse_item(
            &item(&title, "https://a.example", "Mon, 03 Mar 2025 09:00:00 +0900"),
            "q",
            Utc::now(),
        )
        .unwrap();
        assert_eq!(parsed.title.chars().count(), TITLE_MAX_CHARS);
    }
}
