use std::fmt::{self, Display};

use potion::Error;

pub struct QueryError {
    info: String,
}

impl QueryError {
    pub fn new(info: String) -> Self {
        Self { info }
    }
}

impl From<sqlx::Error> for QueryError {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::RowNotFound => Self::new(String::from("RowNotFound")),
            sqlx::Error::PoolTimedOut => Self::new(String::from("Pool timed out")),
            sqlx::Error::PoolClosed => Self::new(String::from("Pool closed")),
            sqlx::Error::ColumnDecode { index, source } => {
                Self::new(format!("Column decode {index} ({source})"))
            }
            e => Self::new(format!("{e}")),
        }
    }
}

impl Into<Error> for QueryError {
    fn into(self) -> Error {
        log::error!("> Query failed: {}", self.info);
        Error {
            code: 500,
            info: Some(self.info),
            redirect: None,
        }
    }
}

pub struct CacheError {
    info: String,
}

impl From<redis::RedisError> for CacheError {
    fn from(value: redis::RedisError) -> Self {
        Self {
            info: format!("{:?} - {:?}", value.code(), value.detail()),
        }
    }
}

impl CacheError {
    pub fn new(info: String) -> Self {
        Self { info }
    }
}

impl Into<Error> for CacheError {
    fn into(self) -> Error {
        Error {
            code: 500,
            info: Some(self.info),
            redirect: None,
        }
    }
}

/// Request parameters that could not be interpreted.
#[derive(Debug, PartialEq)]
pub struct TypeError {
    info: String,
}

impl TypeError {
    pub fn new(info: &str) -> Self {
        Self {
            info: info.to_string(),
        }
    }
}

impl Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.info)
    }
}

impl std::error::Error for TypeError {}

pub fn not_found(info: &str) -> Error {
    Error {
        code: 404,
        info: Some(info.to_string()),
        redirect: None,
    }
}

/// A record returned by the filter service that can't become a [`crate::schema::Recipe`].
#[derive(Debug, Clone, PartialEq)]
pub enum IngestError {
    InvalidJson(String),
    NotAnArray,
    MissingField { index: usize, field: &'static str },
    InvalidField { index: usize, field: &'static str, reason: String },
}

impl Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::InvalidJson(info) => write!(f, "Response was not JSON: {info}"),
            IngestError::NotAnArray => write!(f, "Response was not a list of recipes"),
            IngestError::MissingField { index, field } => {
                write!(f, "Recipe #{index} is missing '{field}'")
            }
            IngestError::InvalidField {
                index,
                field,
                reason,
            } => write!(f, "Recipe #{index} has an invalid '{field}': {reason}"),
        }
    }
}

impl std::error::Error for IngestError {}

/// Failures of the recommendation flow's collaborators, as seen by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The query succeeded but nothing matched. Nothing to show, nothing to retry.
    NoRecipesMatched,
    Malformed(IngestError),
    Status(u16),
    Transport(String),
}

impl FetchError {
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::NoRecipesMatched)
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::NoRecipesMatched => write!(f, "No recipes matched the filter"),
            FetchError::Malformed(e) => write!(f, "Malformed response: {e}"),
            FetchError::Status(code) => write!(f, "Filter service responded with {code}"),
            FetchError::Transport(info) => write!(f, "Request failed: {info}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Malformed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IngestError> for FetchError {
    fn from(value: IngestError) -> Self {
        FetchError::Malformed(value)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(value: reqwest::Error) -> Self {
        match value.status() {
            Some(status) => FetchError::Status(status.as_u16()),
            None => FetchError::Transport(format!("{value}")),
        }
    }
}

/// Returned by deck mutators when there is nothing pending. Benign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyDeck;

impl Display for EmptyDeck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No more recipes")
    }
}

impl std::error::Error for EmptyDeck {}
