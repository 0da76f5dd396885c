//! System of record for a news crawling pipeline: discovered Naver articles,
//! their crawled bodies, content-filter verdicts and the accepted output set.

pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod models;
pub mod services;
