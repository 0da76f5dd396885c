/// Full DDL for the pipeline store. Every statement is idempotent, so it runs on
/// each open.
pub const SCHEMA: &str = r#"
-- discovered articles and their crawl progress
CREATE TABLE IF NOT EXISTS naver_news (
    news_id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL CHECK (length(title) <= 500),
    pub_date TEXT NOT NULL,
    url TEXT NOT NULL UNIQUE CHECK (length(url) <= 1000),
    search_keyword TEXT CHECK (length(search_keyword) <= 200),
    api_request_date TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    crawl_status TEXT NOT NULL DEFAULT 'pending' CHECK (crawl_status IN (
        'pending', 'url_filtered', 'to_crawl', 'crawling',
        'crawl_success', 'crawl_failed', 'crawl_skipped'
    )),
    crawl_attempt_count INTEGER NOT NULL DEFAULT 0 CHECK (crawl_attempt_count >= 0),
    url_filter_version TEXT CHECK (length(url_filter_version) <= 50),
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_naver_news_pub_date ON naver_news(pub_date);
CREATE INDEX IF NOT EXISTS idx_naver_news_crawl_status ON naver_news(crawl_status);

-- fetched article bodies, one per article
CREATE TABLE IF NOT EXISTS crawled_news (
    crawled_news_id INTEGER PRIMARY KEY AUTOINCREMENT,
    news_id INTEGER NOT NULL UNIQUE REFERENCES naver_news(news_id) ON DELETE CASCADE,
    text TEXT,
    crawled_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    crawler_version TEXT CHECK (length(crawler_version) <= 50),
    response_time_ms INTEGER,
    filter_status TEXT NOT NULL DEFAULT 'pending' CHECK (filter_status IN (
        'pending', 'processing', 'passed', 'filtered_out'
    )),
    filter_version TEXT CHECK (length(filter_version) <= 50),
    filtered_at TEXT,
    filter_reason TEXT CHECK (length(filter_reason) <= 100),
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_crawled_news_filter_status ON crawled_news(filter_status);
CREATE INDEX IF NOT EXISTS idx_crawled_news_crawled_at ON crawled_news(crawled_at);
CREATE INDEX IF NOT EXISTS idx_crawled_news_news_id ON crawled_news(news_id);

-- accepted articles
-- crawled_news_id is not checked against news_id here
CREATE TABLE IF NOT EXISTS filtered_news (
    filtered_news_id INTEGER PRIMARY KEY AUTOINCREMENT,
    news_id INTEGER NOT NULL UNIQUE REFERENCES naver_news(news_id) ON DELETE CASCADE,
    crawled_news_id INTEGER NOT NULL REFERENCES crawled_news(crawled_news_id) ON DELETE CASCADE,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

-- updated_at refresh
CREATE TRIGGER IF NOT EXISTS trg_naver_news_updated_at AFTER UPDATE ON naver_news
FOR EACH ROW BEGIN
    UPDATE naver_news SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
    WHERE news_id = NEW.news_id;
END;

CREATE TRIGGER IF NOT EXISTS trg_crawled_news_updated_at AFTER UPDATE ON crawled_news
FOR EACH ROW BEGIN
    UPDATE crawled_news SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
    WHERE crawled_news_id = NEW.crawled_news_id;
END;

CREATE TRIGGER IF NOT EXISTS trg_filtered_news_updated_at AFTER UPDATE ON filtered_news
FOR EACH ROW BEGIN
    UPDATE filtered_news SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
    WHERE filtered_news_id = NEW.filtered_news_id;
END;

CREATE TRIGGER IF NOT EXISTS trg_naver_news_attempts_monotonic
BEFORE UPDATE OF crawl_attempt_count ON naver_news
FOR EACH ROW WHEN NEW.crawl_attempt_count < OLD.crawl_attempt_count BEGIN
    SELECT RAISE(ABORT, 'crawl_attempt_count cannot decrease');
END;

-- created_at is written once
CREATE TRIGGER IF NOT EXISTS trg_naver_news_created_at_fixed
BEFORE UPDATE OF created_at ON naver_news
FOR EACH ROW WHEN NEW.created_at IS NOT OLD.created_at BEGIN
    SELECT RAISE(ABORT, 'created_at is immutable');
END;

CREATE TRIGGER IF NOT EXISTS trg_crawled_news_created_at_fixed
BEFORE UPDATE OF created_at ON crawled_news
FOR EACH ROW WHEN NEW.created_at IS NOT OLD.created_at BEGIN
    SELECT RAISE(ABORT, 'created_at is immutable');
END;

CREATE TRIGGER IF NOT EXISTS trg_filtered_news_created_at_fixed
BEFORE UPDATE OF created_at ON filtered_news
FOR EACH ROW WHEN NEW.created_at IS NOT OLD.created_at BEGIN
    SELECT RAISE(ABORT, 'created_at is immutable');
END;

CREATE VIEW IF NOT EXISTS v_filtered_news_full AS
SELECT
    f.filtered_news_id,
    n.news_id,
    n.title,
    n.url,
    n.pub_date,
    c.text
FROM filtered_news f
JOIN naver_news n ON f.news_id = n.news_id
JOIN crawled_news c ON f.crawled_news_id = c.crawled_news_id;
"#;
