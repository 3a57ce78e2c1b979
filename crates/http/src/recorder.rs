//! An in-memory [`RawResponse`] which records everything written to it.
//!
//! Useful in tests and benchmarks: inspect the committed status, headers and
//! body after a handler ran, trigger close notification, hand out a fake
//! connection on hijack or make the sink fail after a number of bytes.

use crate::ResponseError;
use crate::raw::{CloseNotify, Connection, Hijacked, RawResponse};
use bytes::{Bytes, BytesMut};
use http::{HeaderMap, StatusCode};
use std::io;
use tokio::sync::watch;

#[derive(Debug)]
pub struct ResponseRecorder {
    headers: HeaderMap,
    status: Option<StatusCode>,
    status_writes: usize,
    body: BytesMut,
    flush_count: usize,
    close_count: usize,
    closed_sender: watch::Sender<bool>,
    hijack: Option<Hijacked>,
    write_budget: Option<usize>,
}

impl ResponseRecorder {
    pub fn new() -> Self {
        let (closed_sender, _) = watch::channel(false);
        Self {
            headers: HeaderMap::new(),
            status: None,
            status_writes: 0,
            body: BytesMut::with_capacity(4096),
            flush_count: 0,
            close_count: 0,
            closed_sender,
            hijack: None,
            write_budget: None,
        }
    }

    /// Makes the recorder hand out `conn` on the first hijack.
    #[must_use]
    pub fn with_hijack<C: Connection + 'static>(mut self, conn: C, buffered: Bytes) -> Self {
        self.hijack = Some(Hijacked::new(conn, buffered));
        self
    }

    /// Accepts `limit` body bytes in total, further writes fail with `BrokenPipe`.
    #[must_use]
    pub fn fail_writes_after(mut self, limit: usize) -> Self {
        self.write_budget = Some(limit);
        self
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn status_writes(&self) -> usize {
        self.status_writes
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Takes the body bytes recorded so far.
    pub fn take_body(&mut self) -> Bytes {
        self.body.split().freeze()
    }

    pub fn flush_count(&self) -> usize {
        self.flush_count
    }

    pub fn close_count(&self) -> usize {
        self.close_count
    }

    /// Signals every close notify receiver that the client went away.
    pub fn notify_closed(&self) {
        self.closed_sender.send_replace(true);
    }
}

impl Default for ResponseRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl RawResponse for ResponseRecorder {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_status(&mut self, status: StatusCode) {
        self.status = Some(status);
        self.status_writes += 1;
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = match self.write_budget.as_mut() {
            Some(0) => return Err(io::Error::new(io::ErrorKind::BrokenPipe, "recorder write limit reached")),
            Some(budget) => {
                let n = buf.len().min(*budget);
                *budget -= n;
                n
            }
            None => buf.len(),
        };

        self.body.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_count += 1;
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.close_count += 1;
        Ok(())
    }

    fn close_notify(&mut self) -> Result<CloseNotify, ResponseError> {
        Ok(self.closed_sender.subscribe())
    }

    fn hijack(&mut self) -> Result<Hijacked, ResponseError> {
        self.hijack.take().ok_or(ResponseError::unsupported("hijack"))
    }
}
