use crate::ResponseError;
use crate::raw::{CloseNotify, Hijacked, RawResponse};
use http::{HeaderMap, StatusCode};

/// The capability set a handler sees when producing a response.
///
/// Implemented by the plain [`Response`](crate::Response) and by decorators
/// layered on top of it, so the framework can hand out either one without the
/// handler noticing.
pub trait ResponseWriter {
    /// The sink this writer finally writes to.
    type Raw: RawResponse;

    /// The committed status, `None` if nothing was committed yet.
    fn status(&self) -> Option<StatusCode>;

    /// Commits the status code. Only the first call takes effect.
    fn write_header(&mut self, status: StatusCode);

    fn headers(&self) -> &HeaderMap;

    /// Headers may only be changed before the first body byte or status is committed.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Writes body bytes, committing `200 OK` first when no status was written.
    ///
    /// Returns how many of the given bytes were accepted.
    fn write(&mut self, buf: &[u8]) -> Result<usize, ResponseError>;

    /// Body bytes accepted so far, as the handler handed them in.
    fn bytes_written(&self) -> u64;

    /// Pushes buffered data towards the client. Failures are not reported.
    fn flush(&mut self);

    fn close(&mut self) -> Result<(), ResponseError>;

    fn get_ref(&self) -> &Self::Raw;

    /// Escape hatch to the underlying sink, writing to it bypasses every layer.
    fn get_mut(&mut self) -> &mut Self::Raw;

    fn close_notify(&mut self) -> Result<CloseNotify, ResponseError>;

    /// Takes over the underlying connection. The writer must not be used for
    /// this request afterwards.
    fn hijack(&mut self) -> Result<Hijacked, ResponseError>;
}
