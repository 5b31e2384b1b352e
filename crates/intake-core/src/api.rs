//! High-level submission processing pipeline.

use std::path::Path;

use crate::Result;
use crate::SubmissionMetadata;
use crate::extract::extract_tar;
use crate::extract::extract_zip;
use crate::formats::SourceKind;
use crate::formats::classify;
use crate::metadata::build_metadata;

/// Extracts and validates a submission, returning the completed record.
///
/// This is the one entry point an external caller needs. The path is
/// classified, archives are unpacked into a scratch directory (directories
/// pass through unchanged), and the extracted root runs through the
/// validation gates in order: metadata load, top-level schema and hostname,
/// per-member schema, public-key cardinality, key population.
///
/// # Errors
///
/// Any gate failing aborts the run with the matching [`ExtractionError`]
/// kind; there is no retry and no partial result.
///
/// [`ExtractionError`]: crate::ExtractionError
///
/// # Examples
///
/// ```no_run
/// use intake_core::process_submission;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let metadata = process_submission("team-submission.tar.gz")?;
/// println!("{} members", metadata.team_members.len());
/// # Ok(())
/// # }
/// ```
pub fn process_submission<P: AsRef<Path>>(path: P) -> Result<SubmissionMetadata> {
    let path = path.as_ref();
    let kind = classify(path)?;

    let root = if let Some(codec) = kind.codec() {
        extract_tar(path, codec)?
    } else if kind == SourceKind::Zip {
        extract_zip(path)?
    } else {
        path.to_path_buf()
    };

    build_metadata(root)
}
