use crate::api::CatalogError;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

#[derive(Serialize, Deserialize, Default, Clone, PartialEq, Debug)]
pub enum Status {
    #[default]
    Ok,

    Internal(String),
    InvalidArgument(String),
    NotFound(String),
    AlreadyExists(String),
    FailedPrecondition(String),
    Catalog(CatalogError),
}

impl Status {
    pub fn new(msg: &str, err: impl Error) -> Self {
        Status::Internal(format!("{msg}: '{err}'"))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Status::Internal(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Status::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Status::NotFound(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Status::AlreadyExists(msg.into())
    }

    pub fn failed_precondition(msg: impl Into<String>) -> Self {
        Status::FailedPrecondition(msg.into())
    }

    /// Returns the HTTP status code a web layer should answer with for this
    /// outcome.
    pub fn http_code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::InvalidArgument(_) | Status::FailedPrecondition(_) => 400,
            Status::NotFound(_) => 404,
            Status::AlreadyExists(_) => 409,
            Status::Internal(_) | Status::Catalog(_) => 500,
        }
    }
}

impl From<std::io::Error> for Status {
    fn from(err: std::io::Error) -> Self {
        Self::new("IO error", err)
    }
}

impl From<serde_json::Error> for Status {
    fn from(err: serde_json::Error) -> Self {
        Self::new("serde error", err)
    }
}

impl From<reqwest::Error> for Status {
    fn from(err: reqwest::Error) -> Self {
        Self::Catalog(CatalogError::from(err))
    }
}

impl From<CatalogError> for Status {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

impl Error for Status {}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => write!(f, "Ok"),
            Status::Internal(msg) => write!(f, "Internal error: {msg}"),
            Status::InvalidArgument(msg) => write!(f, "Invalid argument error: {msg}"),
            Status::NotFound(msg) => write!(f, "Not found error: {msg}"),
            Status::AlreadyExists(msg) => write!(f, "Already exists error: {msg}"),
            Status::FailedPrecondition(msg) => write!(f, "Failed precondition: {msg}"),
            Status::Catalog(err) => write!(f, "{err}"),
        }
    }
}
