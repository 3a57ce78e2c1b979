//! The server side of a response: the sink that finally puts bytes on the wire.
//!
//! [`RawResponse`] is what an HTTP server hands to the framework for every request.
//! Only header access, status commit and body writes are mandatory. Flushing,
//! closing, close notification and hijacking are optional capabilities, a sink
//! which doesn't support one of them simply keeps the default implementation.

use crate::ResponseError;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use std::fmt;
use std::io;
use tokio::sync::watch;

/// Receives `true` once the client connection has gone away.
pub type CloseNotify = watch::Receiver<bool>;

/// A raw network connection taken over by [`RawResponse::hijack`].
pub trait Connection: io::Read + io::Write + Send + fmt::Debug {}

impl<T> Connection for T where T: io::Read + io::Write + Send + fmt::Debug {}

/// The result of a successful hijack.
///
/// `buffered` holds the bytes the server had already read from the connection
/// but not consumed yet, the caller must process them before reading from `conn`.
#[derive(Debug)]
pub struct Hijacked {
    pub conn: Box<dyn Connection>,
    pub buffered: Bytes,
}

impl Hijacked {
    pub fn new<C: Connection + 'static>(conn: C, buffered: Bytes) -> Self {
        Self { conn: Box::new(conn), buffered }
    }

    pub fn into_parts(self) -> (Box<dyn Connection>, Bytes) {
        (self.conn, self.buffered)
    }
}

pub trait RawResponse {
    fn headers(&self) -> &HeaderMap;

    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Commits the status line, called at most once per response.
    fn write_status(&mut self, status: StatusCode);

    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    fn write_all(&mut self, mut buf: &[u8]) -> io::Result<()> {
        while !buf.is_empty() {
            match self.write(buf) {
                Ok(0) => {
                    return Err(io::Error::new(io::ErrorKind::WriteZero, "failed to write whole response buffer"));
                }
                Ok(n) => buf = &buf[n..],
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn close_notify(&mut self) -> Result<CloseNotify, ResponseError> {
        Err(ResponseError::unsupported("close notify"))
    }

    fn hijack(&mut self) -> Result<Hijacked, ResponseError> {
        Err(ResponseError::unsupported("hijack"))
    }
}

impl<R: RawResponse + ?Sized> RawResponse for Box<R> {
    fn headers(&self) -> &HeaderMap {
        (**self).headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        (**self).headers_mut()
    }

    fn write_status(&mut self, status: StatusCode) {
        (**self).write_status(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        (**self).write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }

    fn close_notify(&mut self) -> Result<CloseNotify, ResponseError> {
        (**self).close_notify()
    }

    fn hijack(&mut self) -> Result<Hijacked, ResponseError> {
        (**self).hijack()
    }
}
