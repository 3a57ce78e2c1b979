//! Response writer abstractions for the micro http framework
//!
//! A server hands the framework a raw, per-request sink ([`RawResponse`]). The
//! framework wraps it into a [`ResponseWriter`], the capability set handlers
//! program against: status, headers, body writes, flushing, closing, close
//! notification and connection hijacking.
//!
//! [`Response`] is the plain implementation. Decorators, e.g. a compressing
//! writer, hold a [`Response`] and change what happens at the byte-write
//! boundary while forwarding everything else.
//!
//! # Example
//!
//! ```
//! use http::StatusCode;
//! use micro_resp::recorder::ResponseRecorder;
//! use micro_resp::{Response, ResponseWriter};
//!
//! let mut response = Response::wrap(ResponseRecorder::new());
//! response.write_header(StatusCode::ACCEPTED);
//! response.write(b"<p>queued</p>").unwrap();
//! response.close().unwrap();
//!
//! let recorder = response.into_inner();
//! assert_eq!(recorder.status(), Some(StatusCode::ACCEPTED));
//! assert_eq!(recorder.headers()[http::header::CONTENT_TYPE], "text/html; charset=utf-8");
//! assert_eq!(recorder.body(), b"<p>queued</p>");
//! ```
//!
//! # Lifecycle
//!
//! A writer is created per request and used by one task only. It starts open,
//! `close` finishes it, a successful `hijack` hands the connection over to the
//! caller. Writes are rejected in both terminal states.

mod error;
mod response;
mod writer;

pub mod raw;
pub mod recorder;
pub mod sniff;

pub use error::ResponseError;
pub use raw::RawResponse;
pub use response::Response;
pub use writer::ResponseWriter;

mod utils;
pub(crate) use utils::ensure;
