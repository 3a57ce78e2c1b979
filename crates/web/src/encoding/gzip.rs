use crate::encoding::Writer;
use crate::level::GzipLevel;
use flate2::write::GzEncoder;
use http::{HeaderMap, StatusCode};
use micro_resp::raw::{CloseNotify, Hijacked};
use micro_resp::{RawResponse, Response, ResponseError, ResponseWriter};
use std::fmt;
use std::io::Write;
use tracing::{debug, trace};

/// A [`ResponseWriter`] which gzip-compresses the body before it reaches the
/// underlying response.
///
/// Everything except body writes is forwarded to the wrapped [`Response`]:
/// status, headers, close notification and hijacking behave exactly as on a
/// plain response. [`bytes_written`](ResponseWriter::bytes_written) counts the
/// uncompressed bytes handed in.
///
/// [`close`](ResponseWriter::close) must be called once the handler is done,
/// it writes the end of the gzip stream. Dropping the writer without closing it
/// leaves a truncated body.
///
/// Setting `Content-Encoding` and dropping `Content-Length` is left to the
/// caller deciding to compress.
///
/// # Example
///
/// ```
/// use flate2::read::GzDecoder;
/// use micro_gzip::GzipResponse;
/// use micro_resp::ResponseWriter;
/// use micro_resp::recorder::ResponseRecorder;
/// use std::io::Read;
///
/// let mut response = GzipResponse::wrap(ResponseRecorder::new(), 6).unwrap();
/// response.write(b"hello world").unwrap();
/// response.close().unwrap();
///
/// let recorder = response.into_inner();
/// let mut body = String::new();
/// GzDecoder::new(recorder.body()).read_to_string(&mut body).unwrap();
/// assert_eq!(body, "hello world");
/// ```
pub struct GzipResponse<R> {
    response: Response<R>,
    encoder: Option<GzEncoder<Writer>>,
    level: GzipLevel,
    // nothing goes to the sink until the first body write
    body_started: bool,
}

impl<R: RawResponse> GzipResponse<R> {
    /// Wraps `raw` compressing at `level`, `-1` for the default level.
    ///
    /// Fails with [`ResponseError::InvalidLevel`] outside of `-1..=9`.
    pub fn wrap(raw: R, level: i32) -> Result<Self, ResponseError> {
        Ok(Self::with_level(raw, GzipLevel::new(level)?))
    }

    /// Same as [`wrap`](Self::wrap) with an already validated level.
    pub fn with_level(raw: R, level: GzipLevel) -> Self {
        Self::from_response(Response::wrap(raw), level)
    }

    /// Compresses the rest of the body of an existing response. Its committed
    /// status, headers and byte count carry over, bytes it already wrote stay
    /// uncompressed in front of the gzip stream.
    pub fn from_response(response: Response<R>, level: GzipLevel) -> Self {
        let encoder = GzEncoder::new(Writer::new(), level.compression());
        Self { response, encoder: Some(encoder), level, body_started: false }
    }

    /// The compression level the stream was created with.
    pub fn level(&self) -> GzipLevel {
        self.level
    }

    /// Returns the raw sink, without finishing the gzip stream.
    pub fn into_inner(self) -> R {
        self.response.into_inner()
    }

    /// Moves whatever the encoder produced so far to the underlying response.
    fn forward(&mut self) -> Result<(), ResponseError> {
        let Some(encoder) = self.encoder.as_mut() else {
            return Ok(());
        };

        let bytes = encoder.get_mut().take();
        self.response.write_raw(&bytes)
    }

    /// Finishes the gzip stream, errors are logged and dropped.
    fn finish_quietly(&mut self) {
        let Some(encoder) = self.encoder.take() else {
            return;
        };

        if !self.body_started {
            return;
        }

        match encoder.finish() {
            Ok(mut writer) => {
                if let Err(e) = self.response.write_raw(&writer.take()) {
                    debug!(cause = %e, "failed to write gzip trailer, ignored");
                }
            }
            Err(e) => {
                debug!(cause = %e, "failed to finish gzip stream, ignored");
            }
        }
    }
}

impl<R: RawResponse> ResponseWriter for GzipResponse<R> {
    type Raw = R;

    fn status(&self) -> Option<StatusCode> {
        self.response.status()
    }

    fn write_header(&mut self, status: StatusCode) {
        self.response.write_header(status);
    }

    fn headers(&self) -> &HeaderMap {
        self.response.headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.response.headers_mut()
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, ResponseError> {
        self.response.prepare_body(buf)?;

        let encoder = self.encoder.as_mut().ok_or(ResponseError::Closed)?;
        if let Err(e) = encoder.write_all(buf) {
            trace!(cause = %e, "error encoding gzip response body");
            return Err(e.into());
        }

        self.body_started = true;
        self.response.add_bytes_written(buf.len());
        self.forward()?;
        Ok(buf.len())
    }

    fn bytes_written(&self) -> u64 {
        self.response.bytes_written()
    }

    fn flush(&mut self) {
        if self.body_started
            && let Some(encoder) = self.encoder.as_mut()
        {
            match encoder.flush() {
                Ok(()) => {
                    if let Err(e) = self.forward() {
                        debug!(cause = %e, "failed to write flushed gzip data, ignored");
                    }
                }
                Err(e) => {
                    debug!(cause = %e, "failed to flush gzip stream, ignored");
                }
            }
        }

        self.response.flush();
    }

    fn close(&mut self) -> Result<(), ResponseError> {
        self.finish_quietly();
        self.response.close()
    }

    fn get_ref(&self) -> &R {
        self.response.get_ref()
    }

    fn get_mut(&mut self) -> &mut R {
        self.response.get_mut()
    }

    fn close_notify(&mut self) -> Result<CloseNotify, ResponseError> {
        self.response.close_notify()
    }

    fn hijack(&mut self) -> Result<Hijacked, ResponseError> {
        let hijacked = self.response.hijack()?;
        // the connection belongs to the caller now, there is nothing left to finish
        self.encoder = None;
        Ok(hijacked)
    }
}

impl<R: fmt::Debug> fmt::Debug for GzipResponse<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GzipResponse")
            .field("response", &self.response)
            .field("level", &self.level)
            .field("open", &self.encoder.is_some())
            .field("body_started", &self.body_started)
            .finish()
    }
}

#[allow(dead_code)]
const _: () = {
    fn assert_writer<W: ResponseWriter + Send + fmt::Debug>() {}

    fn assert_gzip_response<R: RawResponse + Send + fmt::Debug>() {
        assert_writer::<GzipResponse<R>>();
    }
};
