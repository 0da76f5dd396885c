use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// Where a discovered article sits in the crawl pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlStatus {
    #[default]
    Pending,
    UrlFiltered,
    ToCrawl,
    Crawling,
    CrawlSuccess,
    CrawlFailed,
    CrawlSkipped,
}

impl CrawlStatus {
    pub const ALL: [CrawlStatus; 7] = [
        CrawlStatus::Pending,
        CrawlStatus::UrlFiltered,
        CrawlStatus::ToCrawl,
        CrawlStatus::Crawling,
        CrawlStatus::CrawlSuccess,
        CrawlStatus::CrawlFailed,
        CrawlStatus::CrawlSkipped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CrawlStatus::Pending => "pending",
            CrawlStatus::UrlFiltered => "url_filtered",
            CrawlStatus::ToCrawl => "to_crawl",
            CrawlStatus::Crawling => "crawling",
            CrawlStatus::CrawlSuccess => "crawl_success",
            CrawlStatus::CrawlFailed => "crawl_failed",
            CrawlStatus::CrawlSkipped => "crawl_skipped",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CrawlStatus::UrlFiltered
                | CrawlStatus::CrawlSuccess
                | CrawlStatus::CrawlFailed
                | CrawlStatus::CrawlSkipped
        )
    }

    pub fn can_transition_to(&self, next: CrawlStatus) -> bool {
        use CrawlStatus::*;
        matches!(
            (self, next),
            (Pending, UrlFiltered)
                | (Pending, ToCrawl)
                | (ToCrawl, Crawling)
                | (ToCrawl, CrawlSkipped)
                | (Crawling, ToCrawl)
                | (Crawling, CrawlSuccess)
                | (Crawling, CrawlFailed)
                | (Crawling, CrawlSkipped)
        )
    }
}

/// Progress of the post-crawl content filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterStatus {
    #[default]
    Pending,
    Processing,
    Passed,
    FilteredOut,
}

impl FilterStatus {
    pub const ALL: [FilterStatus; 4] = [
        FilterStatus::Pending,
        FilterStatus::Processing,
        FilterStatus::Passed,
        FilterStatus::FilteredOut,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterStatus::Pending => "pending",
            FilterStatus::Processing => "processing",
            FilterStatus::Passed => "passed",
            FilterStatus::FilteredOut => "filtered_out",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, FilterStatus::Passed | FilterStatus::FilteredOut)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown status value '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

// Both enums share the same text mapping boilerplate.
macro_rules! text_enum {
    ($ty:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownStatus;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|status| status.as_str() == s)
                    .ok_or_else(|| UnknownStatus(s.to_string()))
            }
        }

        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let s = value.as_str()?;
                s.parse().map_err(|e| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

text_enum!(CrawlStatus);
text_enum!(FilterStatus);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crawl_status_round_trips_through_text() {
        for status in CrawlStatus::ALL {
            assert_eq!(status.as_str().parse::<CrawlStatus>().unwrap(), status);
        }
        assert!("done".parse::<CrawlStatus>().is_err());
    }

    #[test]
    fn filter_status_rejects_unknown_text() {
        assert_eq!("filtered_out".parse::<FilterStatus>().unwrap(), FilterStatus::FilteredOut);
        assert!("PASSED".parse::<FilterStatus>().is_err());
    }

    #[test]
    fn crawl_transitions_follow_pipeline_order() {
        use CrawlStatus::*;
        assert!(Pending.can_transition_to(ToCrawl));
        assert!(Pending.can_transition_to(UrlFiltered));
        assert!(ToCrawl.can_transition_to(Crawling));
        assert!(Crawling.can_transition_to(CrawlFailed));
        assert!(Crawling.can_transition_to(ToCrawl));

        assert!(!Pending.can_transition_to(Crawling));
        assert!(!UrlFiltered.can_transition_to(ToCrawl));
        assert!(!CrawlSuccess.can_transition_to(Crawling));
        assert!(!Crawling.can_transition_to(Crawling));
    }

    #[test]
    fn terminal_states_have_no_outgoing_edges() {
        for from in CrawlStatus::ALL.iter().filter(|s| s.is_terminal()) {
            for to in CrawlStatus::ALL {
                assert!(!from.can_transition_to(to), "{from} -> {to}");
            }
        }
    }
}
