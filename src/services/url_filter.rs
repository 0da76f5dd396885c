use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;
use url::Url;

use crate::db::Repository;
use crate::error::Result;

const DEFAULT_FILTER_VERSION: &str = "v1.00";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UrlFilterReport {
    pub rejected: usize,
    pub passed: usize,
}

/// Domain blocklist applied to article URLs before they are queued for crawling.
#[derive(Debug, Clone)]
pub struct UrlFilter {
    version: String,
    domains: HashSet<String>,
}

impl UrlFilter {
    pub fn new<I, S>(version: impl Into<String>, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains = domains
            .into_iter()
            .map(|d| normalize_domain(d.as_ref()))
            .filter(|d| !d.is_empty())
            .collect();
        Self {
            version: version.into(),
            domains,
        }
    }

    /// Loads one domain per line. The version comes from a `_v<version>.txt`
    /// file name suffix.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let filter = Self::new(version_from_path(path), content.lines());
        tracing::info!(
            "Loaded {} filter domains (version {})",
            filter.domains.len(),
            filter.version
        );
        Ok(filter)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// True when the URL host and a listed domain contain one another.
    /// A URL without a host matches every listed domain, so it is filtered
    /// whenever the list is non-empty.
    pub fn is_filtered(&self, url: &str) -> bool {
        let host = match Url::parse(url).ok().and_then(|u| u.host_str().map(normalize_domain)) {
            Some(host) if !host.is_empty() => host,
            _ => return !self.domains.is_empty(),
        };
        self.domains
            .iter()
            .any(|d| host.contains(d.as_str()) || d.contains(host.as_str()))
    }
}

fn normalize_domain(domain: &str) -> String {
    domain.trim().to_lowercase().replace("www.", "")
}

fn version_from_path(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.rsplit_once("_v"))
        .map(|(_, rest)| rest.trim_end_matches(".txt"))
        .filter(|v| !v.is_empty())
        .map(|v| format!("v{}", v))
        .unwrap_or_else(|| DEFAULT_FILTER_VERSION.to_string())
}

/// Classifies every `pending` article and moves it to `url_filtered` or `to_crawl`.
pub async fn run_url_filter(repository: &Repository, filter: &UrlFilter) -> Result<UrlFilterReport> {
    let pending = repository.news_pending_url_filter().await?;
    if pending.is_empty() {
        tracing::info!("No pending articles to filter");
        return Ok(UrlFilterReport::default());
    }
    tracing::info!("Filtering {} pending URLs", pending.len());

    let (rejected_ids, passed_ids): (Vec<_>, Vec<_>) = pending
        .into_iter()
        .partition(|(_, url)| filter.is_filtered(url));

    let (rejected, passed) = repository
        .apply_url_filter(
            filter.version(),
            rejected_ids.into_iter().map(|(id, _)| id).collect(),
            passed_ids.into_iter().map(|(id, _)| id).collect(),
        )
        .await?;

    tracing::info!("URL filter done: {} rejected, {} passed", rejected, passed);
    Ok(UrlFilterReport { rejected, passed })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::Utc;

    use super::*;
    use crate::models::{CrawlStatus, NewNewsArticle};

    #[test]
    fn version_comes_from_file_name() {
        assert_eq!(version_from_path(Path::new("filter_domain_list_v1.00.txt")), "v1.00");
        assert_eq!(version_from_path(Path::new("/etc/lists/blocked_v2.3.txt")), "v2.3");
        assert_eq!(version_from_path(Path::new("blocked.txt")), "v1.00");
    }

    #[test]
    fn matches_domains_in_both_directions() {
        let filter = UrlFilter::new("v1", ["www.spam.example", "ads.example.com", ""]);
        assert_eq!(filter.len(), 2);

        assert!(filter.is_filtered("https://www.spam.example/article/1"));
        assert!(filter.is_filtered("https://m.spam.example/a"));
        // host contained in a listed domain
        assert!(filter.is_filtered("https://example.com/a"));
        assert!(!filter.is_filtered("https://n.news.naver.com/mnews/article/1"));
    }

    #[test]
    fn hostless_urls_are_filtered_only_by_a_non_empty_list() {
        let filter = UrlFilter::new("v1", ["spam.example"]);
        assert!(filter.is_filtered("not a url"));
        assert!(filter.is_filtered("mailto:someone"));

        let empty = UrlFilter::new("v1", Vec::<String>::new());
        assert!(!empty.is_filtered("not a url"));
    }

    #[test]
    fn loads_domains_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filter_domain_list_v1.02.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "www.blocked.example\n\n  other.example  ").unwrap();

        let filter = UrlFilter::from_file(&path).unwrap();
        assert_eq!(filter.version(), "v1.02");
        assert_eq!(filter.len(), 2);
        assert!(filter.is_filtered("http://blocked.example/x"));
    }

    #[tokio::test]
    async fn run_moves_pending_articles() {
        let repo = Repository::open_in_memory().await.unwrap();
        for url in ["https://spam.example/1", "https://news.example/2", "https://news.example/3"] {
            repo.insert_news(NewNewsArticle {
                title: "t".to_string(),
                pub_date: Utc::now(),
                url: url.to_string(),
                search_keyword: None,
                api_request_date: Utc::now(),
            })
            .await
            .unwrap();
        }
        let filter = UrlFilter::new("v9", ["spam.example"]);

        let report = run_url_filter(&repo, &filter).await.unwrap();
        assert_eq!(report, UrlFilterReport { rejected: 1, passed: 2 });

        let spam = repo.find_news_by_url("https://spam.example/1").await.unwrap().unwrap();
        assert_eq!(spam.crawl_status, CrawlStatus::UrlFiltered);
        assert_eq!(spam.url_filter_version.as_deref(), Some("v9"));
        let news = repo.find_news_by_url("https://news.example/2").await.unwrap().unwrap();
        assert_eq!(news.crawl_status, CrawlStatus::ToCrawl);

        // nothing left to classify
        assert_eq!(run_url_filter(&repo, &filter).await.unwrap(), UrlFilterReport::default());
    }
}
