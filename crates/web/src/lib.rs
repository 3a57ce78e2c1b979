//! Gzip compression for micro http responses
//!
//! [`GzipResponse`] decorates a response writer: body bytes pass through a gzip
//! stream before they reach the server, every other part of the writer (status,
//! headers, flushing, closing, close notification, hijacking) behaves exactly
//! like the plain [`Response`](micro_resp::Response).
//!
//! Deciding *whether* to compress, i.e. looking at `Accept-Encoding`, the content
//! type or the body size, and setting `Content-Encoding` accordingly is up to the
//! framework. This crate only does the compressing.
//!
//! # Example
//!
//! ```
//! use flate2::read::GzDecoder;
//! use micro_gzip::decorator::{Decorator, GzipDecorator};
//! use micro_resp::ResponseWriter;
//! use micro_resp::recorder::ResponseRecorder;
//! use std::io::Read;
//!
//! let decorator = GzipDecorator::new(6)?;
//!
//! let mut response = decorator.decorate(ResponseRecorder::new());
//! response.headers_mut().insert(http::header::CONTENT_ENCODING, "gzip".parse()?);
//! response.write(b"hello ")?;
//! response.write(b"world")?;
//! response.close()?;
//! assert_eq!(response.bytes_written(), 11);
//!
//! let mut body = String::new();
//! GzDecoder::new(response.get_ref().body()).read_to_string(&mut body)?;
//! assert_eq!(body, "hello world");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Errors
//!
//! Write errors, from the codec or from the server's sink, are returned to the
//! caller. Errors while flushing or while finishing the gzip stream on close are
//! logged at debug level and dropped, so tearing down a response always completes.

mod encoding;
mod level;

pub mod decorator;

pub use encoding::GzipResponse;
pub use level::DEFAULT_COMPRESSION;
pub use level::GzipLevel;
