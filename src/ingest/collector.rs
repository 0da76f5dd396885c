use std::collections::HashSet;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

use crate::db::Repository;
use crate::error::Result;

use super::naver::{parse_item, NewsSource, MAX_DISPLAY};

/// The search API refuses `start` values past this.
const MAX_START: usize = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollectReport {
    pub fetched: usize,
    pub inserted: usize,
    pub pages: usize,
}

/// Pages through search results and stores unseen article URLs.
pub struct NewsCollector<S> {
    source: S,
    request_interval: Duration,
    recent_window: chrono::Duration,
}

impl<S: NewsSource> NewsCollector<S> {
    pub fn new(source: S, request_interval: Duration, recent_window_days: i64) -> Self {
        Self {
            source,
            request_interval,
            recent_window: chrono::Duration::days(recent_window_days),
        }
    }

    pub async fn collect(
        &self,
        repository: &Repository,
        query: &str,
        total: usize,
    ) -> Result<CollectReport> {
        tracing::info!("Collecting up to {} articles for '{}'", total, query);

        let existing = repository
            .recent_urls(Utc::now() - self.recent_window)
            .await?;
        let mut seen: HashSet<String> = HashSet::new();
        let mut report = CollectReport::default();
        let mut start = 1;

        while report.fetched < total {
            // API rate limit
            tokio::time::sleep(self.request_interval).await;

            let display = MAX_DISPLAY.min(total - report.fetched);
            let items = match self.source.search(query, display, start).await {
                Ok(items) => items,
                Err(e) => {
                    tracing::error!("Search request failed: {}", e);
                    break;
                }
            };

            if items.is_empty() {
                tracing::info!("No more results");
                break;
            }
            report.pages += 1;

            let requested_at = Utc::now();
            let batch: Vec<_> = items
                .iter()
                .filter(|item| !existing.contains(&item.link) && seen.insert(item.link.clone()))
                .filter_map(|item| parse_item(item, query, requested_at))
                .collect();

            let inserted = repository.insert_news_batch(batch).await?;
            report.inserted += inserted;
            report.fetched += items.len();
            tracing::info!(
                "Progress: {} fetched, {} inserted this page, {} inserted total",
                report.fetched,
                inserted,
                report.inserted
            );

            if inserted == 0 {
                tracing::info!("Page added nothing new, stopping");
                break;
            }

            start += display;
            if start > MAX_START {
                tracing::info!("Reached API paging limit ({})", MAX_START);
                break;
            }
        }

        tracing::info!(
            "Collection finished: {} fetched, {} inserted",
            report.fetched,
            report.inserted
        );
        Ok(report)
    }
}
