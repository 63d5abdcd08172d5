use petstore_core::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Boundary-level failure, mapped one-to-one onto a response status.
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    NotFound(&'static str),
    MethodNotAllowed(String),
    Repo(RepoError),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::MethodNotAllowed(_) => 405,
            Self::Repo(RepoError::InvalidData(_)) => 400,
            Self::Repo(_) => 500,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "{message}"),
            Self::NotFound(what) => write!(f, "{what} not found"),
            Self::MethodNotAllowed(method) => write!(f, "method {method} not allowed"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}
