mod collector;
mod naver;

pub use collector::{CollectReport, NewsCollector};
pub use naver::{parse_item, NaverClient, NaverItem, NewsSource};
