//! Compression codec support for tar-style submission archives.
//!
//! Submissions may arrive as tarballs compressed with any of the codecs
//! below. The codec selects the streaming decoder the extractor wraps
//! around the archive file.

/// Compression codec for tar-style submission archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionCodec {
    /// Gzip compression (deflate algorithm).
    Gzip,

    /// Bzip2 compression (Burrows-Wheeler algorithm).
    Bzip2,

    /// Xz compression (LZMA2 algorithm).
    Xz,
}

impl CompressionCodec {
    /// Returns a human-readable name for this codec.
    ///
    /// # Examples
    ///
    /// ```
    /// use intake_core::CompressionCodec;
    ///
    /// assert_eq!(CompressionCodec::Gzip.name(), "gzip");
    /// assert_eq!(CompressionCodec::Bzip2.name(), "bzip2");
    /// ```
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
        }
    }
}
