use std::error::Error as StdError;
use std::io;

use thiserror::Error;

/// Type of general docker error response
#[derive(Debug, serde::Deserialize, Error)]
#[error("{message}")]
pub struct DockerError {
    pub message: String,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(io::Error),
    #[error("hyper error: {0}")]
    Hyper(hyper::Error),
    #[error("connection refused")]
    ConnectionRefused(Box<dyn StdError + Send + Sync>),
    #[error("connection reset")]
    ConnectionReset(Box<dyn StdError + Send + Sync>),
    #[error("json error")]
    Json(#[from] serde_json::Error),
    #[error("docker error: {0}")]
    Docker(#[from] DockerError),
    #[error("http error")]
    Http(#[from] http::Error),
    #[error("invalid uri: {}", var)]
    InvalidUri {
        var: String,
        source: http::uri::InvalidUri,
    },
    #[error("unsupported scheme: {}", host)]
    UnsupportedScheme { host: String },
    #[error("template error")]
    Template(#[from] tera::Error),
}

impl Error {
    /// The docker daemon could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Error::ConnectionRefused(_) | Error::ConnectionReset(_) => true,
            Error::Hyper(err) => err.is_connect(),
            Error::Io(err) => matches!(
                err.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
            ),
            _ => false,
        }
    }
}

impl From<hyper::Error> for Error {
    fn from(err: hyper::Error) -> Self {
        if err.is_connect() {
            return match err
                .source()
                .and_then(|e| e.downcast_ref::<io::Error>())
                .map(|e| e.kind())
            {
                Some(io::ErrorKind::ConnectionRefused) => Error::ConnectionRefused(Box::new(err)),
                Some(io::ErrorKind::ConnectionReset) => Error::ConnectionReset(Box::new(err)),
                _ => Error::Hyper(err),
            };
        }
        Error::Hyper(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => Error::ConnectionRefused(Box::new(err)),
            io::ErrorKind::ConnectionReset => Error::ConnectionReset(Box::new(err)),
            _ => Error::Io(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
