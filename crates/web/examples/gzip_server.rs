//! A tiny blocking HTTP/1.1 server showing how a framework plugs the writers in.
//!
//! ```shell
//! cargo run --example gzip_server
//! curl -v --compressed http://127.0.0.1:8080/
//! ```

use http::header::{ACCEPT_ENCODING, CONTENT_ENCODING, VARY};
use http::{HeaderMap, HeaderValue, StatusCode};
use micro_gzip::decorator::{Decorator, GzipDecorator, IdentityDecorator};
use micro_resp::raw::Hijacked;
use micro_resp::{RawResponse, ResponseError, ResponseWriter};
use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// The server side sink, writes the head on status commit and closes the
/// connection to delimit the body.
#[derive(Debug)]
struct TcpResponse {
    stream: TcpStream,
    headers: HeaderMap,
    head_written: bool,
}

impl TcpResponse {
    fn new(stream: TcpStream) -> Self {
        Self { stream, headers: HeaderMap::new(), head_written: false }
    }

    fn write_head(&mut self, status: StatusCode) -> io::Result<()> {
        self.head_written = true;

        let mut head = format!("HTTP/1.1 {status}\r\nconnection: close\r\n");
        for (name, value) in &self.headers {
            head.push_str(&format!("{name}: {}\r\n", value.to_str().unwrap_or_default()));
        }
        head.push_str("\r\n");
        self.stream.write_all(head.as_bytes())
    }
}

impl RawResponse for TcpResponse {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_status(&mut self, status: StatusCode) {
        if let Err(e) = self.write_head(status) {
            warn!(cause = %e, "failed to write response head");
        }
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        if !self.head_written {
            self.write_head(StatusCode::OK)?;
        }
        self.stream.flush()?;
        self.stream.shutdown(std::net::Shutdown::Write)
    }

    fn hijack(&mut self) -> Result<Hijacked, ResponseError> {
        let conn = self.stream.try_clone()?;
        Ok(Hijacked::new(conn, bytes::Bytes::new()))
    }
}

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let gzip = match GzipDecorator::new(6) {
        Ok(gzip) => gzip,
        Err(e) => {
            error!(cause = %e, "invalid gzip config");
            return;
        }
    };

    info!(port = 8080, "start listening");
    let listener = match TcpListener::bind("127.0.0.1:8080") {
        Ok(listener) => listener,
        Err(e) => {
            error!(cause = %e, "bind server error");
            return;
        }
    };

    for stream in listener.incoming() {
        let stream = match stream {
            Ok(stream) => stream,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };

        if let Err(e) = handle(stream, &gzip) {
            error!(cause = %e, "failed to handle request");
        }
    }
}

fn handle(stream: TcpStream, gzip: &GzipDecorator) -> Result<(), ResponseError> {
    let request_headers = read_request_headers(&stream)?;
    let raw = TcpResponse::new(stream);

    let accepts_gzip = request_headers
        .get(ACCEPT_ENCODING)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("gzip"));

    if accepts_gzip {
        let mut writer = gzip.decorate(raw);
        writer.headers_mut().insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
        writer.headers_mut().insert(VARY, HeaderValue::from_static("accept-encoding"));
        hello(writer)
    } else {
        hello(IdentityDecorator.decorate(raw))
    }
}

fn hello<W: ResponseWriter>(mut writer: W) -> Result<(), ResponseError> {
    for i in 0..100 {
        writer.write(format!("<p>hello world, line {i}</p>\n").as_bytes())?;
        if i % 25 == 0 {
            writer.flush();
        }
    }

    info!(bytes = writer.bytes_written(), status = ?writer.status(), "response written");
    writer.close()
}

fn read_request_headers(stream: &TcpStream) -> io::Result<HeaderMap> {
    let mut reader = BufReader::new(stream);
    let mut headers = HeaderMap::new();

    let mut line = String::new();
    reader.read_line(&mut line)?;
    info!(request = line.trim_end(), "receive request");

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 || line.trim_end().is_empty() {
            return Ok(headers);
        }

        if let Some((name, value)) = line.trim_end().split_once(':')
            && let (Ok(name), Ok(value)) = (name.trim().parse::<http::HeaderName>(), value.trim().parse())
        {
            headers.append(name, value);
        }
    }
}
