use flate2::Compression;
use micro_resp::ResponseError;

/// Level value asking for the codec's default, which is 6.
pub const DEFAULT_COMPRESSION: i32 = -1;

/// A validated gzip compression level in `0..=9`.
///
/// `0` stores the data without compressing it, `1` is the fastest and `9` the
/// smallest output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GzipLevel(u32);

impl GzipLevel {
    pub const NONE: GzipLevel = GzipLevel(0);
    pub const FAST: GzipLevel = GzipLevel(1);
    pub const BEST: GzipLevel = GzipLevel(9);

    pub fn new(level: i32) -> Result<Self, ResponseError> {
        match level {
            DEFAULT_COMPRESSION => Ok(Self::default()),
            0..=9 => Ok(Self(level.unsigned_abs())),
            _ => Err(ResponseError::invalid_level(level)),
        }
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub(crate) fn compression(self) -> Compression {
        Compression::new(self.0)
    }
}

impl Default for GzipLevel {
    fn default() -> Self {
        Self(6)
    }
}

impl TryFrom<i32> for GzipLevel {
    type Error = ResponseError;

    fn try_from(level: i32) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}
