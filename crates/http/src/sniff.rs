//! Content type detection for response bodies without an explicit `Content-Type`.
//!
//! Implements the signature matching of the WHATWG mime sniffing standard, on at
//! most the first [`SNIFF_LEN`] bytes of the body. The result is always a valid
//! media type, `application/octet-stream` when nothing else matches.

use mime::Mime;

/// Number of leading bytes considered when sniffing.
pub const SNIFF_LEN: usize = 512;

const TEXT_HTML: &str = "text/html; charset=utf-8";
const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const OCTET_STREAM: &str = "application/octet-stream";

enum Signature {
    /// Case-insensitive html tag, must be followed by a space or `>`.
    Html(&'static [u8]),
    Exact(&'static [u8], &'static str),
    Masked { mask: &'static [u8], pattern: &'static [u8], skip_ws: bool, content_type: &'static str },
    Mp4,
    Text,
}

#[rustfmt::skip]
static SIGNATURES: &[Signature] = &[
    Signature::Html(b"<!DOCTYPE HTML"),
    Signature::Html(b"<HTML"),
    Signature::Html(b"<HEAD"),
    Signature::Html(b"<SCRIPT"),
    Signature::Html(b"<IFRAME"),
    Signature::Html(b"<H1"),
    Signature::Html(b"<DIV"),
    Signature::Html(b"<FONT"),
    Signature::Html(b"<TABLE"),
    Signature::Html(b"<A"),
    Signature::Html(b"<STYLE"),
    Signature::Html(b"<TITLE"),
    Signature::Html(b"<B"),
    Signature::Html(b"<BODY"),
    Signature::Html(b"<BR"),
    Signature::Html(b"<P"),
    Signature::Html(b"<!--"),
    Signature::Masked { mask: b"\xFF\xFF\xFF\xFF\xFF", pattern: b"<?xml", skip_ws: true, content_type: "text/xml; charset=utf-8" },
    Signature::Exact(b"%PDF-", "application/pdf"),
    Signature::Exact(b"%!PS-Adobe-", "application/postscript"),

    // byte order marks
    Signature::Masked { mask: b"\xFF\xFF\x00\x00", pattern: b"\xFE\xFF\x00\x00", skip_ws: false, content_type: "text/plain; charset=utf-16be" },
    Signature::Masked { mask: b"\xFF\xFF\x00\x00", pattern: b"\xFF\xFE\x00\x00", skip_ws: false, content_type: "text/plain; charset=utf-16le" },
    Signature::Masked { mask: b"\xFF\xFF\xFF\x00", pattern: b"\xEF\xBB\xBF\x00", skip_ws: false, content_type: TEXT_PLAIN },

    // images
    Signature::Exact(b"\x00\x00\x01\x00", "image/x-icon"),
    Signature::Exact(b"\x00\x00\x02\x00", "image/x-icon"),
    Signature::Exact(b"BM", "image/bmp"),
    Signature::Exact(b"GIF87a", "image/gif"),
    Signature::Exact(b"GIF89a", "image/gif"),
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF\xFF\xFF",
        pattern: b"RIFF\x00\x00\x00\x00WEBPVP",
        skip_ws: false,
        content_type: "image/webp",
    },
    Signature::Exact(b"\x89PNG\x0D\x0A\x1A\x0A", "image/png"),
    Signature::Exact(b"\xFF\xD8\xFF", "image/jpeg"),

    // audio and video
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        pattern: b"FORM\x00\x00\x00\x00AIFF",
        skip_ws: false,
        content_type: "audio/aiff",
    },
    Signature::Masked { mask: b"\xFF\xFF\xFF", pattern: b"ID3", skip_ws: false, content_type: "audio/mpeg" },
    Signature::Masked { mask: b"\xFF\xFF\xFF\xFF\xFF", pattern: b"OggS\x00", skip_ws: false, content_type: "application/ogg" },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF",
        pattern: b"MThd\x00\x00\x00\x06",
        skip_ws: false,
        content_type: "audio/midi",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        pattern: b"RIFF\x00\x00\x00\x00AVI ",
        skip_ws: false,
        content_type: "video/avi",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        pattern: b"RIFF\x00\x00\x00\x00WAVE",
        skip_ws: false,
        content_type: "audio/wave",
    },
    Signature::Mp4,
    Signature::Exact(b"\x1A\x45\xDF\xA3", "video/webm"),

    // fonts
    Signature::Exact(b"\x00\x01\x00\x00", "font/ttf"),
    Signature::Exact(b"OTTO", "font/otf"),
    Signature::Exact(b"ttcf", "font/collection"),
    Signature::Exact(b"wOFF", "font/woff"),
    Signature::Exact(b"wOF2", "font/woff2"),

    // archives
    Signature::Exact(b"\x1F\x8B\x08", "application/x-gzip"),
    Signature::Exact(b"PK\x03\x04", "application/zip"),
    Signature::Exact(b"Rar!\x1A\x07\x00", "application/x-rar-compressed"),
    Signature::Exact(b"Rar!\x1A\x07\x01\x00", "application/x-rar-compressed"),
    Signature::Exact(b"\x00\x61\x73\x6D", "application/wasm"),

    Signature::Text,
];

/// Detects the content type of `data`, e.g. `text/html; charset=utf-8`.
pub fn detect_content_type(data: &[u8]) -> &'static str {
    let data = &data[..data.len().min(SNIFF_LEN)];
    let first_non_ws = data.iter().position(|b| !is_ws(*b)).unwrap_or(data.len());

    SIGNATURES.iter().find_map(|sig| sig.matches(data, first_non_ws)).unwrap_or(OCTET_STREAM)
}

/// Same as [`detect_content_type`], parsed as [`Mime`].
pub fn detect_mime(data: &[u8]) -> Mime {
    detect_content_type(data).parse().unwrap_or(mime::APPLICATION_OCTET_STREAM)
}

impl Signature {
    fn matches(&self, data: &[u8], first_non_ws: usize) -> Option<&'static str> {
        match self {
            Signature::Html(tag) => match_html(&data[first_non_ws..], tag).then_some(TEXT_HTML),
            Signature::Exact(pattern, content_type) => data.starts_with(pattern).then_some(*content_type),
            Signature::Masked { mask, pattern, skip_ws, content_type } => {
                let data = if *skip_ws { &data[first_non_ws..] } else { data };
                match_masked(data, mask, pattern).then_some(*content_type)
            }
            Signature::Mp4 => match_mp4(data).then_some("video/mp4"),
            Signature::Text => {
                let data = &data[first_non_ws..];
                (!data.iter().any(|b| is_binary(*b))).then_some(TEXT_PLAIN)
            }
        }
    }
}

fn match_html(data: &[u8], tag: &[u8]) -> bool {
    if data.len() < tag.len() + 1 {
        return false;
    }

    let head_matches = tag.iter().zip(data).all(|(expected, actual)| {
        if expected.is_ascii_uppercase() { actual.to_ascii_uppercase() == *expected } else { actual == expected }
    });

    head_matches && matches!(data[tag.len()], b' ' | b'>')
}

fn match_masked(data: &[u8], mask: &[u8], pattern: &[u8]) -> bool {
    if data.len() < pattern.len() {
        return false;
    }

    data.iter().zip(mask).zip(pattern).all(|((byte, mask), expected)| byte & mask == *expected)
}

// ISO base media file format: a `ftyp` box whose major brand or one of the
// compatible brands is `mp4`.
fn match_mp4(data: &[u8]) -> bool {
    if data.len() < 12 {
        return false;
    }

    let box_size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if data.len() < box_size || box_size % 4 != 0 || box_size < 12 {
        return false;
    }

    if &data[4..8] != b"ftyp" {
        return false;
    }

    (8..box_size).step_by(4).filter(|&start| start != 12).any(|start| data[start..].starts_with(b"mp4"))
}

fn is_ws(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' ')
}

fn is_binary(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}
