//! The plain response writer every request starts with.
//!
//! [`Response`] wraps the server's [`RawResponse`] and adds what the sink
//! doesn't track by itself: the committed status, the amount of body bytes
//! handed in, `Content-Type` detection and the open/closed/hijacked lifecycle.
//! Decorators such as a compressing writer are built on top of it through
//! [`Response::prepare_body`], [`Response::write_raw`] and
//! [`Response::add_bytes_written`].

use crate::raw::{CloseNotify, Hijacked, RawResponse};
use crate::sniff::detect_content_type;
use crate::{ResponseError, ResponseWriter, ensure};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, StatusCode};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    Closed,
    Hijacked,
}

#[derive(Debug)]
pub struct Response<R> {
    raw: R,
    status: Option<StatusCode>,
    bytes_written: u64,
    state: State,
}

impl<R: RawResponse> Response<R> {
    pub fn wrap(raw: R) -> Self {
        Self { raw, status: None, bytes_written: 0, state: State::Open }
    }

    pub fn into_inner(self) -> R {
        self.raw
    }

    pub fn is_closed(&self) -> bool {
        self.state == State::Closed
    }

    pub fn is_hijacked(&self) -> bool {
        self.state == State::Hijacked
    }

    fn ensure_open(&self) -> Result<(), ResponseError> {
        ensure!(self.state != State::Closed, ResponseError::Closed);
        ensure!(self.state != State::Hijacked, ResponseError::Hijacked);
        Ok(())
    }

    /// Runs the bookkeeping that precedes a body write: sniffs `Content-Type`
    /// from `buf` when none is set and commits `200 OK` when no status is.
    ///
    /// `buf` must be the uncompressed body, decorators call this before encoding.
    pub fn prepare_body(&mut self, buf: &[u8]) -> Result<(), ResponseError> {
        self.ensure_open()?;
        self.set_content_type_if_not_set(buf);
        self.write_header(StatusCode::OK);
        Ok(())
    }

    /// Writes already encoded bytes straight to the sink, they are not counted
    /// by [`ResponseWriter::bytes_written`].
    pub fn write_raw(&mut self, buf: &[u8]) -> Result<(), ResponseError> {
        self.ensure_open()?;
        if buf.is_empty() {
            return Ok(());
        }

        self.raw.write_all(buf).map_err(ResponseError::io)
    }

    pub fn add_bytes_written(&mut self, n: usize) {
        self.bytes_written += n as u64;
    }

    fn set_content_type_if_not_set(&mut self, buf: &[u8]) {
        if self.raw.headers().contains_key(CONTENT_TYPE) {
            return;
        }

        let content_type = detect_content_type(buf);
        trace!(content_type, "detected response content type");
        self.raw.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
}

impl<R: RawResponse> ResponseWriter for Response<R> {
    type Raw = R;

    fn status(&self) -> Option<StatusCode> {
        self.status
    }

    fn write_header(&mut self, status: StatusCode) {
        if self.status.is_some() || self.state != State::Open {
            return;
        }

        self.status = Some(status);
        self.raw.write_status(status);
    }

    fn headers(&self) -> &HeaderMap {
        self.raw.headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.raw.headers_mut()
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, ResponseError> {
        self.prepare_body(buf)?;
        self.write_raw(buf)?;
        self.add_bytes_written(buf.len());
        Ok(buf.len())
    }

    fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    fn flush(&mut self) {
        if self.state != State::Open {
            return;
        }

        if let Err(e) = self.raw.flush() {
            debug!(cause = %e, "failed to flush response, ignored");
        }
    }

    fn close(&mut self) -> Result<(), ResponseError> {
        if self.state != State::Open {
            return Ok(());
        }

        self.state = State::Closed;
        self.raw.close().map_err(ResponseError::io)
    }

    fn get_ref(&self) -> &R {
        &self.raw
    }

    fn get_mut(&mut self) -> &mut R {
        &mut self.raw
    }

    fn close_notify(&mut self) -> Result<CloseNotify, ResponseError> {
        self.raw.close_notify()
    }

    fn hijack(&mut self) -> Result<Hijacked, ResponseError> {
        self.ensure_open()?;
        let hijacked = self.raw.hijack()?;
        self.state = State::Hijacked;
        Ok(hijacked)
    }
}

// writers are handed to other threads together with their sink
#[allow(dead_code)]
const _: () = {
    fn assert_writer<W: ResponseWriter + Send + std::fmt::Debug>() {}

    fn assert_response<R: RawResponse + Send + std::fmt::Debug>() {
        assert_writer::<Response<R>>();
    }
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::ResponseRecorder;
    use std::io::{Cursor, Read};

    fn assert_writer<W: ResponseWriter + Send + std::fmt::Debug>() {}

    #[test]
    fn test_conformance() {
        assert_writer::<Response<ResponseRecorder>>();
        assert_writer::<Response<Box<ResponseRecorder>>>();
    }

    #[test]
    fn test_status_is_unset_before_write() {
        let response = Response::wrap(ResponseRecorder::new());
        assert_eq!(response.status(), None);
        assert_eq!(response.bytes_written(), 0);
    }

    #[test]
    fn test_first_write_commits_ok() {
        let mut response = Response::wrap(ResponseRecorder::new());

        assert_eq!(response.write(b"hello").unwrap(), 5);
        assert_eq!(response.write(b" world").unwrap(), 6);

        assert_eq!(response.status(), Some(StatusCode::OK));
        assert_eq!(response.bytes_written(), 11);
        assert_eq!(response.get_ref().status(), Some(StatusCode::OK));
        assert_eq!(response.get_ref().body(), b"hello world");
    }

    #[test]
    fn test_status_is_written_once() {
        let mut response = Response::wrap(ResponseRecorder::new());

        response.write_header(StatusCode::CREATED);
        response.write_header(StatusCode::NOT_FOUND);
        response.write(b"created").unwrap();

        assert_eq!(response.status(), Some(StatusCode::CREATED));
        assert_eq!(response.get_ref().status(), Some(StatusCode::CREATED));
        assert_eq!(response.get_ref().status_writes(), 1);
    }

    #[test]
    fn test_content_type_is_sniffed_once() {
        let mut response = Response::wrap(ResponseRecorder::new());

        response.write(b"<html><body>").unwrap();
        response.write(b"\x00\x01").unwrap();

        assert_eq!(response.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
    }

    #[test]
    fn test_content_type_is_kept_when_set() {
        let mut response = Response::wrap(ResponseRecorder::new());
        response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        response.write(b"<html>").unwrap();

        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_write_raw_is_not_counted() {
        let mut response = Response::wrap(ResponseRecorder::new());

        response.prepare_body(b"abc").unwrap();
        response.write_raw(b"xyz").unwrap();
        response.add_bytes_written(3);

        assert_eq!(response.bytes_written(), 3);
        assert_eq!(response.get_ref().body(), b"xyz");
    }

    #[test]
    fn test_write_error_is_propagated() {
        let mut response = Response::wrap(ResponseRecorder::new().fail_writes_after(4));

        let result = response.write(b"too long");

        assert!(matches!(result, Err(ResponseError::Io { .. })));
        assert_eq!(response.bytes_written(), 0);
        assert_eq!(response.get_ref().body(), b"too ");
    }

    #[test]
    fn test_close_is_forwarded_once() {
        let mut response = Response::wrap(ResponseRecorder::new());
        response.write(b"bye").unwrap();

        response.close().unwrap();
        response.close().unwrap();

        assert!(response.is_closed());
        assert_eq!(response.get_ref().close_count(), 1);
        assert!(matches!(response.write(b"again"), Err(ResponseError::Closed)));
    }

    #[test]
    fn test_flush_is_forwarded_while_open() {
        let mut response = Response::wrap(ResponseRecorder::new());

        response.flush();
        response.close().unwrap();
        response.flush();

        assert_eq!(response.get_ref().flush_count(), 1);
    }

    #[test]
    fn test_close_notify_is_forwarded() {
        let mut response = Response::wrap(ResponseRecorder::new());
        let notify = response.close_notify().unwrap();
        assert!(!*notify.borrow());

        response.get_ref().notify_closed();
        assert!(*notify.borrow());
    }

    #[test]
    fn test_hijack_unsupported() {
        let mut response = Response::wrap(ResponseRecorder::new());

        let result = response.hijack();

        assert!(matches!(result, Err(ResponseError::Unsupported { capability: "hijack" })));
        assert!(!response.is_hijacked());
        assert_eq!(response.write(b"still usable").unwrap(), 12);
    }

    #[test]
    fn test_hijack_takes_over_connection() {
        let conn = Cursor::new(b"next request".to_vec());
        let recorder = ResponseRecorder::new().with_hijack(conn, bytes::Bytes::from_static(b"GET"));
        let mut response = Response::wrap(recorder);

        let (mut conn, buffered) = response.hijack().unwrap().into_parts();
        let mut read = String::new();
        conn.read_to_string(&mut read).unwrap();

        assert_eq!(buffered.as_ref(), b"GET");
        assert_eq!(read, "next request");
        assert!(response.is_hijacked());
        assert!(matches!(response.write(b"x"), Err(ResponseError::Hijacked)));
        assert!(matches!(response.hijack(), Err(ResponseError::Hijacked)));
        response.close().unwrap();
        assert_eq!(response.get_ref().close_count(), 0);
    }
}
