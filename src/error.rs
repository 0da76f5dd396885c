use rusqlite::ffi;
use thiserror::Error;

use crate::models::CrawlStatus;

/// Which table constraint rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    PrimaryKey,
    ForeignKey,
    Check,
    NotNull,
    Trigger,
    Other,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Constraint violation ({kind:?}): {message}")]
    Constraint {
        kind: ConstraintKind,
        message: String,
    },

    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Naver API error: {0}")]
    NaverApi(String),

    #[error("Invalid crawl status transition: {from} -> {to}")]
    InvalidTransition { from: CrawlStatus, to: CrawlStatus },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            AppError::Constraint { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self.constraint_kind(),
            Some(ConstraintKind::Unique | ConstraintKind::PrimaryKey)
        )
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, message)
                if code.code == ffi::ErrorCode::ConstraintViolation =>
            {
                let kind = match code.extended_code {
                    ffi::SQLITE_CONSTRAINT_UNIQUE => ConstraintKind::Unique,
                    ffi::SQLITE_CONSTRAINT_PRIMARYKEY => ConstraintKind::PrimaryKey,
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => ConstraintKind::ForeignKey,
                    ffi::SQLITE_CONSTRAINT_CHECK => ConstraintKind::Check,
                    ffi::SQLITE_CONSTRAINT_NOTNULL => ConstraintKind::NotNull,
                    ffi::SQLITE_CONSTRAINT_TRIGGER => ConstraintKind::Trigger,
                    _ => ConstraintKind::Other,
                };
                AppError::Constraint {
                    kind,
                    message: message.clone().unwrap_or_else(|| code.to_string()),
                }
            }
            _ => AppError::Database(err),
        }
    }
}

impl From<tokio_rusqlite::Error> for AppError {
    fn from(err: tokio_rusqlite::Error) -> Self {
        match err {
            tokio_rusqlite::Error::Rusqlite(e) => e.into(),
            other => AppError::Connection(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
