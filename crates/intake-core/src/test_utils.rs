//! Test utilities for building submission fixtures.
//!
//! Helpers for writing on-disk submission directories and packing them into
//! the archive shapes the pipeline accepts, reducing duplication across
//! format-specific tests.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde_json::Value;
use serde_json::json;

use crate::formats::CompressionCodec;

/// Returns a minimal valid metadata document with one member, alice.
#[must_use]
pub fn sample_metadata() -> Value {
    json!({
        "projectName": "P",
        "client": "C",
        "hostname": "host-1",
        "facultyContact": "F",
        "teamMembers": [
            {"username": "alice", "email": "a@x.com", "name": "Alice", "publicKey": ""}
        ]
    })
}

/// Writes a submission layout into `root`: a `metadata.json` plus one
/// `<username>.pub` per `(username, key_text)` pair.
pub fn write_submission_dir(root: &Path, metadata: &Value, keys: &[(&str, &str)]) {
    std::fs::create_dir_all(root).unwrap();
    std::fs::write(
        root.join("metadata.json"),
        serde_json::to_string_pretty(metadata).unwrap(),
    )
    .unwrap();
    for (username, key_text) in keys {
        std::fs::write(root.join(format!("{username}.pub")), key_text).unwrap();
    }
}

/// Writes a compressed tar archive at `output` from `(path, contents)`
/// entries. Paths ending in `/` become directory entries.
pub fn write_tar_archive(output: &Path, codec: CompressionCodec, entries: &[(&str, &[u8])]) {
    let tar_data = build_tar(entries);
    let file = File::create(output).unwrap();
    match codec {
        CompressionCodec::Gzip => {
            let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
            encoder.write_all(&tar_data).unwrap();
            encoder.finish().unwrap();
        }
        CompressionCodec::Bzip2 => {
            let mut encoder = bzip2::write::BzEncoder::new(file, bzip2::Compression::default());
            encoder.write_all(&tar_data).unwrap();
            encoder.finish().unwrap();
        }
        CompressionCodec::Xz => {
            let mut encoder = xz2::write::XzEncoder::new(file, 6);
            encoder.write_all(&tar_data).unwrap();
            encoder.finish().unwrap();
        }
    }
}

/// Writes a zip archive at `output` from `(path, contents)` entries. Paths
/// ending in `/` become directory entries. Files are stored uncompressed.
pub fn write_zip_archive(output: &Path, entries: &[(&str, &[u8])]) {
    use zip::write::SimpleFileOptions;
    use zip::write::ZipWriter;

    let file = File::create(output).unwrap();
    let mut zip = ZipWriter::new(file);

    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored)
        .unix_permissions(0o644);

    for (path, data) in entries {
        if path.ends_with('/') {
            zip.add_directory(path.trim_end_matches('/'), options)
                .unwrap();
        } else {
            zip.start_file(*path, options).unwrap();
            zip.write_all(data).unwrap();
        }
    }

    zip.finish().unwrap();
}

/// Packs an on-disk submission directory into an archive rooted at the
/// directory's file name.
///
/// Convenience for end-to-end tests: build the fixture with
/// [`write_submission_dir`], then pack it into whichever shape the test
/// exercises.
pub fn pack_submission(root: &Path, output: &Path, codec: Option<CompressionCodec>) {
    let root_name = root.file_name().unwrap().to_str().unwrap().to_owned();
    let mut entries: Vec<(String, Vec<u8>)> = vec![(format!("{root_name}/"), Vec::new())];

    let mut names: Vec<_> = std::fs::read_dir(root)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    // Sorted for determinism; the directory entry above stays the root.
    names.sort();

    for name in names {
        let data = std::fs::read(root.join(&name)).unwrap();
        entries.push((format!("{root_name}/{name}"), data));
    }

    let borrowed: Vec<(&str, &[u8])> = entries
        .iter()
        .map(|(path, data)| (path.as_str(), data.as_slice()))
        .collect();

    match codec {
        Some(codec) => write_tar_archive(output, codec, &borrowed),
        None => write_zip_archive(output, &borrowed),
    }
}

/// Builds an in-memory tar stream from `(path, contents)` entries.
fn build_tar(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, data) in entries {
        let mut header = tar::Header::new_gnu();
        if path.ends_with('/') {
            header.set_entry_type(tar::EntryType::Directory);
            header.set_size(0);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, path, &[][..]).unwrap();
        } else {
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, path, *data).unwrap();
        }
    }
    builder.into_inner().unwrap()
}
