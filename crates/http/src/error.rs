use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("invalid compression level: {level}, expect -1 or 0..=9")]
    InvalidLevel { level: i32 },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("response writer has been closed")]
    Closed,

    #[error("connection has been hijacked")]
    Hijacked,

    #[error("{capability} is not supported by the underlying response")]
    Unsupported { capability: &'static str },
}

impl ResponseError {
    pub fn invalid_level(level: i32) -> Self {
        Self::InvalidLevel { level }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    pub fn unsupported(capability: &'static str) -> Self {
        Self::Unsupported { capability }
    }
}
