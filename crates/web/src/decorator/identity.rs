use crate::decorator::Decorator;
use micro_resp::{RawResponse, Response};

/// Hands out the plain response, the body is written as is.
#[derive(Default, Clone, Copy, Debug)]
pub struct IdentityDecorator;

impl<R: RawResponse> Decorator<R> for IdentityDecorator {
    type Out = Response<R>;

    #[inline]
    fn decorate(&self, raw: R) -> Self::Out {
        Response::wrap(raw)
    }
}
