//! Submission source classification.
//!
//! The input path is classified once, from its on-disk content rather than
//! its file extension: submitters routinely misname their archives.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::ExtractionError;
use crate::Result;
use crate::formats::compression::CompressionCodec;

/// bzip2 stream magic bytes ("BZh").
const BZIP2_MAGIC: [u8; 3] = [0x42, 0x5A, 0x68];

/// gzip member magic bytes.
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// XZ stream magic bytes.
const XZ_MAGIC: [u8; 6] = [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00];

/// Supported submission source kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Plain directory, used as-is without extraction.
    Directory,
    /// bzip2-compressed tar archive.
    Bzip2,
    /// gzip-compressed tar archive.
    Gzip,
    /// xz-compressed tar archive.
    Xz,
    /// ZIP archive.
    Zip,
}

impl SourceKind {
    /// Returns the compression codec for tar-style kinds, `None` for
    /// directories and zip containers.
    ///
    /// # Examples
    ///
    /// ```
    /// use intake_core::CompressionCodec;
    /// use intake_core::SourceKind;
    ///
    /// assert_eq!(SourceKind::Gzip.codec(), Some(CompressionCodec::Gzip));
    /// assert_eq!(SourceKind::Zip.codec(), None);
    /// ```
    #[must_use]
    pub const fn codec(self) -> Option<CompressionCodec> {
        match self {
            Self::Bzip2 => Some(CompressionCodec::Bzip2),
            Self::Gzip => Some(CompressionCodec::Gzip),
            Self::Xz => Some(CompressionCodec::Xz),
            Self::Directory | Self::Zip => None,
        }
    }
}

/// Classifies a submission path by inspecting its content.
///
/// Directories are accepted immediately without content inspection. Files
/// are matched against the bzip2, gzip, and xz magic signatures; zip
/// containers are recognized structurally (a full central-directory parse)
/// rather than by prefix, so the zip test stands on its own between the
/// prefix checks.
///
/// # Errors
///
/// Returns [`ExtractionError::InvalidFileType`] if the path is neither a
/// directory nor a recognized archive, and
/// [`ExtractionError::FailedToExtract`] if the file cannot be read at all.
///
/// # Examples
///
/// ```no_run
/// use intake_core::SourceKind;
/// use intake_core::classify;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let kind = classify("team-submission.tar.gz")?;
/// assert_eq!(kind, SourceKind::Gzip);
/// # Ok(())
/// # }
/// ```
pub fn classify<P: AsRef<Path>>(path: P) -> Result<SourceKind> {
    let path = path.as_ref();

    if path.is_dir() {
        return Ok(SourceKind::Directory);
    }

    let header = read_signature(path)?;

    if header.starts_with(&BZIP2_MAGIC) {
        Ok(SourceKind::Bzip2)
    } else if header.starts_with(&GZIP_MAGIC) {
        Ok(SourceKind::Gzip)
    } else if is_zip_container(path) {
        Ok(SourceKind::Zip)
    } else if header.starts_with(&XZ_MAGIC) {
        Ok(SourceKind::Xz)
    } else {
        Err(ExtractionError::InvalidFileType {
            path: path.to_path_buf(),
        })
    }
}

/// Reads the leading bytes used for signature matching.
///
/// Short files are fine: a truncated header simply fails every prefix test.
fn read_signature(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path).map_err(|_| ExtractionError::FailedToExtract {
        path: path.to_path_buf(),
    })?;

    let mut header = Vec::with_capacity(XZ_MAGIC.len());
    file.take(XZ_MAGIC.len() as u64)
        .read_to_end(&mut header)
        .map_err(|_| ExtractionError::FailedToExtract {
            path: path.to_path_buf(),
        })?;
    Ok(header)
}

/// Structural zip test: the container is a zip iff its central directory
/// parses.
fn is_zip_container(path: &Path) -> bool {
    File::open(path).is_ok_and(|file| zip::ZipArchive::new(file).is_ok())
}
