mod crawled;
mod filtered;
mod news;
mod status;

pub use crawled::{CrawledContent, FilterOutcome, NewCrawledContent, FILTER_REASON_MAX_CHARS};
pub use filtered::{FilteredNews, FullFilteredNews, MismatchedFilteredNews, PipelineStats};
pub use news::{
    NewNewsArticle, NewsArticle, KEYWORD_MAX_CHARS, TITLE_MAX_CHARS, URL_MAX_CHARS,
    VERSION_MAX_CHARS,
};
pub use status::{CrawlStatus, FilterStatus, UnknownStatus};
