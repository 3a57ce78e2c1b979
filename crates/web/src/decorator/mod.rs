//! Turning the server's raw response into the writer a handler gets.
//!
//! The framework picks a [`Decorator`] once, e.g. from its configuration, and
//! applies it to the raw response of every request:
//!
//! - [`IdentityDecorator`]: a plain [`Response`](micro_resp::Response)
//! - [`GzipDecorator`]: a [`GzipResponse`](crate::GzipResponse) at a fixed level

mod gzip;
mod identity;

pub use gzip::GzipDecorator;
pub use identity::IdentityDecorator;

pub trait Decorator<In> {
    type Out;

    fn decorate(&self, raw: In) -> Self::Out;
}
