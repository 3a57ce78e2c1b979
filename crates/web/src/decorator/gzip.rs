use crate::decorator::Decorator;
use crate::encoding::GzipResponse;
use crate::level::GzipLevel;
use micro_resp::{RawResponse, ResponseError};

/// Wraps every response into a [`GzipResponse`].
///
/// The level is validated once when the decorator is built, decorating a
/// response can't fail afterwards.
#[derive(Default, Clone, Copy, Debug)]
pub struct GzipDecorator {
    level: GzipLevel,
}

impl GzipDecorator {
    pub fn new(level: i32) -> Result<Self, ResponseError> {
        Ok(Self::with_level(GzipLevel::new(level)?))
    }

    pub fn with_level(level: GzipLevel) -> Self {
        Self { level }
    }

    pub fn level(&self) -> GzipLevel {
        self.level
    }
}

impl<R: RawResponse> Decorator<R> for GzipDecorator {
    type Out = GzipResponse<R>;

    fn decorate(&self, raw: R) -> Self::Out {
        GzipResponse::with_level(raw, self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorator::IdentityDecorator;
    use flate2::read::GzDecoder;
    use micro_resp::ResponseWriter;
    use micro_resp::recorder::ResponseRecorder;
    use std::io::Read;

    fn render<D, W>(decorator: &D, body: &[u8]) -> ResponseRecorder
    where
        D: Decorator<ResponseRecorder, Out = W>,
        W: ResponseWriter<Raw = ResponseRecorder>,
    {
        let mut writer = decorator.decorate(ResponseRecorder::new());
        writer.write(body).unwrap();
        writer.close().unwrap();

        let mut recorder = ResponseRecorder::new();
        std::mem::swap(&mut recorder, writer.get_mut());
        recorder
    }

    #[test]
    fn test_identity_writes_plain_body() {
        let recorder = render(&IdentityDecorator, b"plain text");
        assert_eq!(recorder.body(), b"plain text");
    }

    #[test]
    fn test_gzip_writes_compressed_body() {
        let decorator = GzipDecorator::new(9).unwrap();
        assert_eq!(decorator.level(), GzipLevel::BEST);

        let recorder = render(&decorator, b"compressed text");

        let mut body = String::new();
        GzDecoder::new(recorder.body()).read_to_string(&mut body).unwrap();
        assert_eq!(body, "compressed text");
    }

    #[test]
    fn test_gzip_rejects_invalid_level() {
        assert!(matches!(GzipDecorator::new(-5), Err(ResponseError::InvalidLevel { level: -5 })));
    }

    #[test]
    fn test_default_level() {
        assert_eq!(GzipDecorator::default().level().value(), 6);
    }
}
