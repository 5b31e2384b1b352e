//! Archive extraction into per-run scratch directories.
//!
//! Every extraction unpacks the whole archive into a fresh, uniquely-named
//! directory under the platform temp location and hands back the path of the
//! first entry in archive order, which downstream stages treat as the
//! submission root. Nothing here deletes the scratch directory: the extracted
//! tree must outlive the call, so cleanup is left to the caller or the OS.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use xz2::read::XzDecoder;

use crate::ExtractionError;
use crate::Result;
use crate::formats::CompressionCodec;

/// Prefix for per-run scratch directories.
const SCRATCH_PREFIX: &str = "intake-";

/// Extracts a compressed tar submission and returns its root entry path.
///
/// The archive is opened through the streaming decoder matching `codec`,
/// every entry is unpacked into a fresh scratch directory, and the scratch
/// path of the first entry in declaration order is returned.
///
/// # Errors
///
/// Returns [`ExtractionError::FailedToExtract`] naming `tar_path` if the
/// archive does not exist, is not readable, or is malformed. An archive with
/// no entries counts as malformed.
///
/// # Examples
///
/// ```no_run
/// use intake_core::CompressionCodec;
/// use intake_core::extract_tar;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let root = extract_tar("team-submission.tar.gz", CompressionCodec::Gzip)?;
/// println!("unpacked to {}", root.display());
/// # Ok(())
/// # }
/// ```
pub fn extract_tar<P: AsRef<Path>>(tar_path: P, codec: CompressionCodec) -> Result<PathBuf> {
    let tar_path = tar_path.as_ref();
    let file = File::open(tar_path).map_err(|_| failed(tar_path))?;
    let reader = BufReader::new(file);

    match codec {
        CompressionCodec::Gzip => unpack_tar(GzDecoder::new(reader), tar_path),
        CompressionCodec::Bzip2 => unpack_tar(BzDecoder::new(reader), tar_path),
        CompressionCodec::Xz => unpack_tar(XzDecoder::new(reader), tar_path),
    }
}

/// Extracts a zip submission and returns its root entry path.
///
/// Entries are unpacked in namelist order into a fresh scratch directory;
/// the scratch path of the first entry is returned.
///
/// # Errors
///
/// Returns [`ExtractionError::FailedToExtract`] naming `zip_path` if the
/// container does not exist, is not readable, or is malformed (including
/// entries whose names escape the scratch directory). An archive with no
/// entries counts as malformed.
pub fn extract_zip<P: AsRef<Path>>(zip_path: P) -> Result<PathBuf> {
    let zip_path = zip_path.as_ref();
    let file = File::open(zip_path).map_err(|_| failed(zip_path))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|_| failed(zip_path))?;

    let scratch = scratch_dir(zip_path)?;
    let mut first: Option<PathBuf> = None;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|_| failed(zip_path))?;
        let relative = entry.enclosed_name().ok_or_else(|| failed(zip_path))?;
        let out_path = scratch.join(relative);

        if first.is_none() {
            first = Some(out_path.clone());
        }

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path).map_err(|_| failed(zip_path))?;
        } else {
            if let Some(parent) = out_path.parent() {
                std::fs::create_dir_all(parent).map_err(|_| failed(zip_path))?;
            }
            let mut out_file = File::create(&out_path).map_err(|_| failed(zip_path))?;
            std::io::copy(&mut entry, &mut out_file).map_err(|_| failed(zip_path))?;
        }
    }

    first.ok_or_else(|| failed(zip_path))
}

/// Unpacks every tar entry from `decoder` and returns the first entry's
/// scratch path.
fn unpack_tar<R: Read>(decoder: R, tar_path: &Path) -> Result<PathBuf> {
    let scratch = scratch_dir(tar_path)?;
    let mut archive = tar::Archive::new(decoder);

    let mut first: Option<PathBuf> = None;
    let entries = archive.entries().map_err(|_| failed(tar_path))?;

    for entry in entries {
        let mut entry = entry.map_err(|_| failed(tar_path))?;

        if first.is_none() {
            let relative = entry.path().map_err(|_| failed(tar_path))?.into_owned();
            first = Some(scratch.join(relative));
        }

        // unpack_in refuses entries that would land outside the scratch
        // directory; such an archive is malformed for our purposes.
        let unpacked = entry.unpack_in(&scratch).map_err(|_| failed(tar_path))?;
        if !unpacked {
            return Err(failed(tar_path));
        }
    }

    first.ok_or_else(|| failed(tar_path))
}

/// Creates a fresh uniquely-named scratch directory under the platform temp
/// location and persists it past the `TempDir` handle.
fn scratch_dir(archive_path: &Path) -> Result<PathBuf> {
    tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .tempdir()
        .map(tempfile::TempDir::keep)
        .map_err(|_| failed(archive_path))
}

/// The single failure shape for this module, always naming the archive
/// actually being processed.
fn failed(path: &Path) -> ExtractionError {
    ExtractionError::FailedToExtract {
        path: path.to_path_buf(),
    }
}
