//! Submission source formats: classification and compression codecs.

pub mod compression;
pub mod detect;

// Re-export main types for convenience
pub use compression::CompressionCodec;
pub use detect::SourceKind;
pub use detect::classify;
