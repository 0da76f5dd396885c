mod url_filter;

pub use url_filter::{run_url_filter, UrlFilter, UrlFilterReport};
