//! Team submission extraction and validation.
//!
//! `intake-core` takes a submitted directory or archive (bzip2-, gzip-, or
//! xz-compressed tar, or zip), unpacks it into a per-run scratch directory,
//! loads the `metadata.json` descriptor, validates it against the required
//! schemas, and populates each declared team member's public key from the
//! matching `<username>.pub` file in the submission root.
//!
//! # Examples
//!
//! ```no_run
//! use intake_core::process_submission;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metadata = process_submission("team-submission.tar.gz")?;
//! println!("{} on {}", metadata.project_name, metadata.hostname);
//! for member in &metadata.team_members {
//!     println!("{}: {}", member.username, member.public_key);
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod error;
pub mod extract;
pub mod formats;
pub mod metadata;
pub mod test_utils;
pub mod validate;

// Re-export main API types
pub use api::process_submission;
pub use error::ExtractionError;
pub use error::Result;
pub use extract::extract_tar;
pub use extract::extract_zip;
pub use formats::CompressionCodec;
pub use formats::SourceKind;
pub use formats::classify;
pub use metadata::SubmissionMetadata;
pub use metadata::TeamMember;
