use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{ffi, params, OptionalExtension, Row, TransactionBehavior};
use tokio_rusqlite::Connection;

use crate::error::{AppError, Result};
use crate::models::{
    CrawlStatus, CrawledContent, FilterOutcome, FilterStatus, FilteredNews, FullFilteredNews,
    MismatchedFilteredNews, NewCrawledContent, NewNewsArticle, NewsArticle, PipelineStats,
};

use super::schema::SCHEMA;

const NEWS_COLUMNS: &str = "news_id, title, pub_date, url, search_keyword, api_request_date, \
     crawl_status, crawl_attempt_count, url_filter_version, created_at, updated_at";

const CRAWLED_COLUMNS: &str = "crawled_news_id, news_id, text, crawled_at, crawler_version, \
     response_time_ms, filter_status, filter_version, filtered_at, filter_reason, created_at, updated_at";

const FILTERED_COLUMNS: &str = "filtered_news_id, news_id, crawled_news_id, created_at, updated_at";

/// Result of promoting a crawled row into `filtered_news`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    Accepted { filtered_news_id: i64 },
    NotPassed(FilterStatus),
    Missing,
}

pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;
        Self::init(conn).await
    }

    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.busy_timeout(std::time::Duration::from_secs(5))?;
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    // News operations

    /// Inserts one article. A URL that is already stored is a uniqueness violation.
    pub async fn insert_news(&self, news: NewNewsArticle) -> Result<i64> {
        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO naver_news (title, pub_date, url, search_keyword, api_request_date)
                       VALUES (?1, ?2, ?3, ?4, ?5)"#,
                    params![
                        news.title,
                        format_timestamp(&news.pub_date),
                        news.url,
                        news.search_keyword,
                        format_timestamp(&news.api_request_date),
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        Ok(id)
    }

    /// Inserts a batch in one transaction, ignoring URLs that already exist.
    /// Rows rejected by a constraint are logged and skipped.
    pub async fn insert_news_batch(&self, items: Vec<NewNewsArticle>) -> Result<usize> {
        if items.is_empty() {
            return Ok(0);
        }

        let inserted = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let mut inserted = 0;
                {
                    let mut stmt = tx.prepare(
                        r#"INSERT INTO naver_news (title, pub_date, url, search_keyword, api_request_date)
                           VALUES (?1, ?2, ?3, ?4, ?5)
                           ON CONFLICT(url) DO NOTHING"#,
                    )?;
                    for item in &items {
                        let result = stmt.execute(params![
                            item.title,
                            format_timestamp(&item.pub_date),
                            item.url,
                            item.search_keyword,
                            format_timestamp(&item.api_request_date),
                        ]);
                        match result {
                            Ok(n) => inserted += n,
                            Err(e) => tracing::warn!("Skipping {}: {}", item.url, e),
                        }
                    }
                }
                tx.commit()?;
                Ok(inserted)
            })
            .await?;
        Ok(inserted)
    }

    pub async fn get_news(&self, news_id: i64) -> Result<Option<NewsArticle>> {
        let news = self
            .conn
            .call(move |conn| {
                let news = conn
                    .query_row(
                        &format!("SELECT {NEWS_COLUMNS} FROM naver_news WHERE news_id = ?1"),
                        params![news_id],
                        news_from_row,
                    )
                    .optional()?;
                Ok(news)
            })
            .await?;
        Ok(news)
    }

    pub async fn find_news_by_url(&self, url: &str) -> Result<Option<NewsArticle>> {
        let url = url.to_string();
        let news = self
            .conn
            .call(move |conn| {
                let news = conn
                    .query_row(
                        &format!("SELECT {NEWS_COLUMNS} FROM naver_news WHERE url = ?1"),
                        params![url],
                        news_from_row,
                    )
                    .optional()?;
                Ok(news)
            })
            .await?;
        Ok(news)
    }

    /// URLs whose search API request happened after `since`.
    pub async fn recent_urls(&self, since: DateTime<Utc>) -> Result<HashSet<String>> {
        let since = format_timestamp(&since);
        let urls = self
            .conn
            .call(move |conn| {
                let mut stmt =
                    conn.prepare("SELECT url FROM naver_news WHERE api_request_date > ?1")?;
                let urls = stmt
                    .query_map(params![since], |row| row.get::<_, String>(0))?
                    .collect::<std::result::Result<HashSet<_>, _>>()?;
                Ok(urls)
            })
            .await?;
        Ok(urls)
    }

    /// Deletes an article together with its crawled and accepted rows.
    pub async fn delete_news(&self, news_id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .call(move |conn| {
                let n = conn.execute("DELETE FROM naver_news WHERE news_id = ?1", params![news_id])?;
                Ok(n > 0)
            })
            .await?;
        Ok(deleted)
    }

    /// `(news_id, url)` of every article still waiting for the URL filter,
    /// newest first.
    pub async fn news_pending_url_filter(&self) -> Result<Vec<(i64, String)>> {
        let rows = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT news_id, url FROM naver_news WHERE crawl_status = 'pending' ORDER BY news_id DESC",
                )?;
                let rows = stmt
                    .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;
        Ok(rows)
    }

    // Crawl status transitions

    /// Moves `pending` rows to `url_filtered` or `to_crawl` and stamps the
    /// filter version. Rows no longer `pending` are left alone.
    /// Returns `(rejected, passed)` counts of rows actually moved.
    pub async fn apply_url_filter(
        &self,
        filter_version: &str,
        rejected_ids: Vec<i64>,
        passed_ids: Vec<i64>,
    ) -> Result<(usize, usize)> {
        let version = filter_version.to_string();
        let counts = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                let mut rejected = 0;
                let mut passed = 0;
                {
                    let mut stmt = tx.prepare(
                        r#"UPDATE naver_news
                           SET crawl_status = ?1, url_filter_version = ?2
                           WHERE news_id = ?3 AND crawl_status = 'pending'"#,
                    )?;
                    for id in &rejected_ids {
                        rejected += stmt.execute(params![CrawlStatus::UrlFiltered, version, id])?;
                    }
                    for id in &passed_ids {
                        passed += stmt.execute(params![CrawlStatus::ToCrawl, version, id])?;
                    }
                }
                tx.commit()?;
                Ok((rejected, passed))
            })
            .await?;
        Ok(counts)
    }

    /// Claims up to `limit` articles for crawling, newest publication first.
    /// Claimed rows move `to_crawl -> crawling` and their attempt count grows by one;
    /// a row claimed by another worker in the meantime is never returned twice.
    pub async fn claim_for_crawl(&self, limit: usize) -> Result<Vec<NewsArticle>> {
        let limit = limit as i64;
        let mut claimed = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                let ids = {
                    let mut stmt = tx.prepare(
                        r#"UPDATE naver_news
                           SET crawl_status = 'crawling',
                               crawl_attempt_count = crawl_attempt_count + 1
                           WHERE crawl_status = 'to_crawl'
                             AND news_id IN (
                                 SELECT news_id FROM naver_news
                                 WHERE crawl_status = 'to_crawl'
                                 ORDER BY pub_date DESC, news_id DESC
                                 LIMIT ?1
                             )
                           RETURNING news_id"#,
                    )?;
                    let ids = stmt
                        .query_map(params![limit], |row| row.get::<_, i64>(0))?
                        .collect::<std::result::Result<Vec<_>, _>>()?;
                    ids
                };
                let mut claimed = Vec::with_capacity(ids.len());
                {
                    let mut stmt = tx.prepare(&format!(
                        "SELECT {NEWS_COLUMNS} FROM naver_news WHERE news_id = ?1"
                    ))?;
                    for id in ids {
                        claimed.push(stmt.query_row(params![id], news_from_row)?);
                    }
                }
                tx.commit()?;
                Ok(claimed)
            })
            .await?;

        claimed.sort_by(|a, b| {
            b.pub_date
                .cmp(&a.pub_date)
                .then_with(|| b.news_id.cmp(&a.news_id))
        });
        tracing::debug!("Claimed {} articles for crawling", claimed.len());
        Ok(claimed)
    }

    /// Compare-and-swap on `crawl_status`. Entering `crawling` counts as an attempt.
    /// Returns `false` when the row is missing or no longer in `from`.
    pub async fn transition_crawl_status(
        &self,
        news_id: i64,
        from: CrawlStatus,
        to: CrawlStatus,
    ) -> Result<bool> {
        if !from.can_transition_to(to) {
            return Err(AppError::InvalidTransition { from, to });
        }

        let moved = self
            .conn
            .call(move |conn| {
                let increment = i64::from(to == CrawlStatus::Crawling);
                let n = conn.execute(
                    r#"UPDATE naver_news
                       SET crawl_status = ?1,
                           crawl_attempt_count = crawl_attempt_count + ?2
                       WHERE news_id = ?3 AND crawl_status = ?4"#,
                    params![to, increment, news_id, from],
                )?;
                Ok(n > 0)
            })
            .await?;
        Ok(moved)
    }

    /// Stores the crawled body and marks the article `crawl_success` atomically.
    /// An existing body for the article is kept and still counts as success.
    /// Returns `None` without writing anything if the article is not `crawling`.
    pub async fn record_crawl_success(&self, content: NewCrawledContent) -> Result<Option<i64>> {
        let crawled_id = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                let status: Option<CrawlStatus> = tx
                    .query_row(
                        "SELECT crawl_status FROM naver_news WHERE news_id = ?1",
                        params![content.news_id],
                        |row| row.get(0),
                    )
                    .optional()?;
                if status != Some(CrawlStatus::Crawling) {
                    return Ok(None);
                }

                let inserted = tx.execute(
                    r#"INSERT INTO crawled_news (news_id, text, crawled_at, crawler_version, response_time_ms)
                       VALUES (?1, ?2, ?3, ?4, ?5)"#,
                    params![
                        content.news_id,
                        content.text,
                        format_timestamp(&content.crawled_at),
                        content.crawler_version,
                        content.response_time_ms,
                    ],
                );
                let crawled_id = match inserted {
                    Ok(_) => tx.last_insert_rowid(),
                    Err(e) if is_unique_violation(&e) => {
                        tracing::warn!("Article {} was already crawled", content.news_id);
                        tx.query_row(
                            "SELECT crawled_news_id FROM crawled_news WHERE news_id = ?1",
                            params![content.news_id],
                            |row| row.get(0),
                        )?
                    }
                    Err(e) => return Err(e.into()),
                };

                tx.execute(
                    "UPDATE naver_news SET crawl_status = 'crawl_success' WHERE news_id = ?1",
                    params![content.news_id],
                )?;
                tx.commit()?;
                Ok(Some(crawled_id))
            })
            .await?;
        Ok(crawled_id)
    }

    /// `crawling -> crawl_failed`.
    pub async fn record_crawl_failure(&self, news_id: i64) -> Result<bool> {
        self.transition_crawl_status(news_id, CrawlStatus::Crawling, CrawlStatus::CrawlFailed)
            .await
    }

    /// Hands a claimed article back to the queue without an outcome.
    pub async fn release_claim(&self, news_id: i64) -> Result<bool> {
        self.transition_crawl_status(news_id, CrawlStatus::Crawling, CrawlStatus::ToCrawl)
            .await
    }

    /// Marks queued articles that used up their attempts as `crawl_skipped`.
    pub async fn skip_exhausted(&self, max_attempts: u32) -> Result<usize> {
        let skipped = self
            .conn
            .call(move |conn| {
                let n = conn.execute(
                    r#"UPDATE naver_news SET crawl_status = 'crawl_skipped'
                       WHERE crawl_status = 'to_crawl' AND crawl_attempt_count >= ?1"#,
                    params![max_attempts],
                )?;
                Ok(n)
            })
            .await?;
        Ok(skipped)
    }

    // Crawled content operations

    pub async fn insert_crawled(&self, content: NewCrawledContent) -> Result<i64> {
        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO crawled_news (news_id, text, crawled_at, crawler_version, response_time_ms)
                       VALUES (?1, ?2, ?3, ?4, ?5)"#,
                    params![
                        content.news_id,
                        content.text,
                        format_timestamp(&content.crawled_at),
                        content.crawler_version,
                        content.response_time_ms,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        Ok(id)
    }

    pub async fn get_crawled(&self, crawled_news_id: i64) -> Result<Option<CrawledContent>> {
        let crawled = self
            .conn
            .call(move |conn| {
                let crawled = conn
                    .query_row(
                        &format!(
                            "SELECT {CRAWLED_COLUMNS} FROM crawled_news WHERE crawled_news_id = ?1"
                        ),
                        params![crawled_news_id],
                        crawled_from_row,
                    )
                    .optional()?;
                Ok(crawled)
            })
            .await?;
        Ok(crawled)
    }

    pub async fn get_crawled_for_news(&self, news_id: i64) -> Result<Option<CrawledContent>> {
        let crawled = self
            .conn
            .call(move |conn| {
                let crawled = conn
                    .query_row(
                        &format!("SELECT {CRAWLED_COLUMNS} FROM crawled_news WHERE news_id = ?1"),
                        params![news_id],
                        crawled_from_row,
                    )
                    .optional()?;
                Ok(crawled)
            })
            .await?;
        Ok(crawled)
    }

    /// Claims up to `limit` crawled rows for the content filter, oldest first
    /// (`pending -> processing`).
    pub async fn claim_for_content_filter(&self, limit: usize) -> Result<Vec<CrawledContent>> {
        let limit = limit as i64;
        let mut claimed = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                let ids = {
                    let mut stmt = tx.prepare(
                        r#"UPDATE crawled_news SET filter_status = 'processing'
                           WHERE filter_status = 'pending'
                             AND crawled_news_id IN (
                                 SELECT crawled_news_id FROM crawled_news
                                 WHERE filter_status = 'pending'
                                 ORDER BY crawled_at, crawled_news_id
                                 LIMIT ?1
                             )
                           RETURNING crawled_news_id"#,
                    )?;
                    let ids = stmt
                        .query_map(params![limit], |row| row.get::<_, i64>(0))?
                        .collect::<std::result::Result<Vec<_>, _>>()?;
                    ids
                };
                let mut claimed = Vec::with_capacity(ids.len());
                {
                    let mut stmt = tx.prepare(&format!(
                        "SELECT {CRAWLED_COLUMNS} FROM crawled_news WHERE crawled_news_id = ?1"
                    ))?;
                    for id in ids {
                        claimed.push(stmt.query_row(params![id], crawled_from_row)?);
                    }
                }
                tx.commit()?;
                Ok(claimed)
            })
            .await?;

        claimed.sort_by_key(|c| (c.crawled_at, c.crawled_news_id));
        Ok(claimed)
    }

    /// Writes the content filter verdict for a `processing` row.
    /// Returns `false` if the row is missing or not `processing`.
    pub async fn record_filter_outcome(
        &self,
        crawled_news_id: i64,
        filter_version: &str,
        outcome: FilterOutcome,
    ) -> Result<bool> {
        let version = filter_version.to_string();
        let updated = self
            .conn
            .call(move |conn| {
                let n = conn.execute(
                    r#"UPDATE crawled_news
                       SET filter_status = ?1,
                           filter_version = ?2,
                           filtered_at = ?3,
                           filter_reason = ?4
                       WHERE crawled_news_id = ?5 AND filter_status = 'processing'"#,
                    params![
                        outcome.status(),
                        version,
                        format_timestamp(&Utc::now()),
                        outcome.reason(),
                        crawled_news_id,
                    ],
                )?;
                Ok(n > 0)
            })
            .await?;
        Ok(updated)
    }

    // Accepted news operations

    /// Inserts an acceptance row as given. Nothing checks that the crawled row
    /// belongs to `news_id`; see [`Repository::mismatched_filtered_news`].
    pub async fn insert_filtered_news(&self, news_id: i64, crawled_news_id: i64) -> Result<i64> {
        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO filtered_news (news_id, crawled_news_id) VALUES (?1, ?2)",
                    params![news_id, crawled_news_id],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        Ok(id)
    }

    /// Promotes a `passed` crawled row, taking `news_id` from the row itself.
    /// Accepting the same article twice returns the existing acceptance.
    pub async fn accept_crawled(&self, crawled_news_id: i64) -> Result<Acceptance> {
        let acceptance = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                let found: Option<(i64, FilterStatus)> = tx
                    .query_row(
                        "SELECT news_id, filter_status FROM crawled_news WHERE crawled_news_id = ?1",
                        params![crawled_news_id],
                        |row| Ok((row.get(0)?, row.get(1)?)),
                    )
                    .optional()?;
                let news_id = match found {
                    None => return Ok(Acceptance::Missing),
                    Some((_, status)) if status != FilterStatus::Passed => {
                        return Ok(Acceptance::NotPassed(status))
                    }
                    Some((news_id, _)) => news_id,
                };

                tx.execute(
                    r#"INSERT INTO filtered_news (news_id, crawled_news_id) VALUES (?1, ?2)
                       ON CONFLICT(news_id) DO NOTHING"#,
                    params![news_id, crawled_news_id],
                )?;
                let filtered_news_id: i64 = tx.query_row(
                    "SELECT filtered_news_id FROM filtered_news WHERE news_id = ?1",
                    params![news_id],
                    |row| row.get(0),
                )?;
                tx.commit()?;
                Ok(Acceptance::Accepted { filtered_news_id })
            })
            .await?;
        Ok(acceptance)
    }

    pub async fn get_filtered_news(&self, filtered_news_id: i64) -> Result<Option<FilteredNews>> {
        let filtered = self
            .conn
            .call(move |conn| {
                let filtered = conn
                    .query_row(
                        &format!(
                            "SELECT {FILTERED_COLUMNS} FROM filtered_news WHERE filtered_news_id = ?1"
                        ),
                        params![filtered_news_id],
                        filtered_from_row,
                    )
                    .optional()?;
                Ok(filtered)
            })
            .await?;
        Ok(filtered)
    }

    /// Acceptance rows pointing at crawled content of a different article.
    pub async fn mismatched_filtered_news(&self) -> Result<Vec<MismatchedFilteredNews>> {
        let rows = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT f.filtered_news_id, f.news_id, f.crawled_news_id, c.news_id
                       FROM filtered_news f
                       JOIN crawled_news c ON f.crawled_news_id = c.crawled_news_id
                       WHERE c.news_id <> f.news_id
                       ORDER BY f.filtered_news_id"#,
                )?;
                let rows = stmt
                    .query_map([], |row| {
                        Ok(MismatchedFilteredNews {
                            filtered_news_id: row.get(0)?,
                            news_id: row.get(1)?,
                            crawled_news_id: row.get(2)?,
                            crawled_news_owner: row.get(3)?,
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;
        Ok(rows)
    }

    /// Reads `v_filtered_news_full`, newest publication first.
    pub async fn list_full_filtered(&self, limit: Option<usize>) -> Result<Vec<FullFilteredNews>> {
        // SQLite treats a negative LIMIT as unbounded
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT filtered_news_id, news_id, title, url, pub_date, text
                       FROM v_filtered_news_full
                       ORDER BY pub_date DESC, filtered_news_id DESC
                       LIMIT ?1"#,
                )?;
                let rows = stmt
                    .query_map(params![limit], |row| {
                        Ok(FullFilteredNews {
                            filtered_news_id: row.get(0)?,
                            news_id: row.get(1)?,
                            title: row.get(2)?,
                            url: row.get(3)?,
                            pub_date: timestamp_at(row, 4)?,
                            text: row.get(5)?,
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;
        Ok(rows)
    }

    pub async fn stats(&self) -> Result<PipelineStats> {
        let stats = self
            .conn
            .call(|conn| {
                let mut stats = PipelineStats::default();

                let mut stmt = conn
                    .prepare("SELECT crawl_status, COUNT(*) FROM naver_news GROUP BY crawl_status")?;
                for row in stmt.query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
                })? {
                    let (status, count) = row?;
                    stats.crawl_status.insert(status, count);
                }

                let mut stmt = conn.prepare(
                    "SELECT filter_status, COUNT(*) FROM crawled_news GROUP BY filter_status",
                )?;
                for row in stmt.query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
                })? {
                    let (status, count) = row?;
                    stats.filter_status.insert(status, count);
                }

                stats.accepted =
                    conn.query_row("SELECT COUNT(*) FROM filtered_news", [], |row| row.get(0))?;
                Ok(stats)
            })
            .await?;
        Ok(stats)
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Millisecond UTC text, the same shape SQLite writes for column defaults.
pub(crate) fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

pub(crate) fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC3339 first (e.g., "2026-01-11T12:34:56.789Z")
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Try SQLite datetime format (e.g., "2026-01-11 12:34:56")
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    None
}

fn timestamp_at(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_datetime(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("invalid timestamp '{raw}'").into(),
        )
    })
}

fn opt_timestamp_at(row: &Row, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(_) => timestamp_at(row, idx).map(Some),
        None => Ok(None),
    }
}

fn news_from_row(row: &Row) -> rusqlite::Result<NewsArticle> {
    Ok(NewsArticle {
        news_id: row.get(0)?,
        title: row.get(1)?,
        pub_date: timestamp_at(row, 2)?,
        url: row.get(3)?,
        search_keyword: row.get(4)?,
        api_request_date: timestamp_at(row, 5)?,
        crawl_status: row.get(6)?,
        crawl_attempt_count: row.get(7)?,
        url_filter_version: row.get(8)?,
        created_at: timestamp_at(row, 9)?,
        updated_at: timestamp_at(row, 10)?,
    })
}

fn crawled_from_row(row: &Row) -> rusqlite::Result<CrawledContent> {
    Ok(CrawledContent {
        crawled_news_id: row.get(0)?,
        news_id: row.get(1)?,
        text: row.get(2)?,
        crawled_at: timestamp_at(row, 3)?,
        crawler_version: row.get(4)?,
        response_time_ms: row.get(5)?,
        filter_status: row.get(6)?,
        filter_version: row.get(7)?,
        filtered_at: opt_timestamp_at(row, 8)?,
        filter_reason: row.get(9)?,
        created_at: timestamp_at(row, 10)?,
        updated_at: timestamp_at(row, 11)?,
    })
}

fn filtered_from_row(row: &Row) -> rusqlite::Result<FilteredNews> {
    Ok(FilteredNews {
        filtered_news_id: row.get(0)?,
        news_id: row.get(1)?,
        crawled_news_id: row.get(2)?,
        created_at: timestamp_at(row, 3)?,
        updated_at: timestamp_at(row, 4)?,
    })
}
