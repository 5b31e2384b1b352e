//! Submission metadata records: loading, conversion, and key population.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::ExtractionError;
use crate::Result;
use crate::validate;
use crate::validate::validation;

/// File name the metadata descriptor must use in the submission root.
pub const METADATA_FILE: &str = "metadata.json";

/// One declared team member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    /// Login name; also names the member's `<username>.pub` key file.
    pub username: String,
    /// Contact email address.
    pub email: String,
    /// Full display name.
    pub name: String,
    /// SSH public key text, populated from `<username>.pub`.
    pub public_key: String,
}

/// A validated, fully key-populated submission record.
///
/// Handed by value to the caller once every gate has passed; the downstream
/// provisioning consumer can serialize it straight back to camelCase JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionMetadata {
    /// Project title.
    pub project_name: String,
    /// Client the project is delivered for.
    pub client: String,
    /// Requested machine hostname.
    pub hostname: String,
    /// Supervising faculty contact.
    pub faculty_contact: String,
    /// Declared team members, in submission order.
    pub team_members: Vec<TeamMember>,
}

/// Reads and parses `metadata.json` from a submission root.
///
/// No schema checks happen here; the raw document is validated afterwards so
/// that missing keys surface as their own error kind.
///
/// # Errors
///
/// Returns [`ExtractionError::FailedToExtract`] if `metadata.json` does not
/// exist or cannot be read, and [`ExtractionError::InvalidJson`] if its
/// contents fail to parse.
pub fn load_raw<P: AsRef<Path>>(directory: P) -> Result<Value> {
    let path = directory.as_ref().join(METADATA_FILE);
    let contents = fs::read_to_string(&path).map_err(|_| ExtractionError::FailedToExtract {
        path: path.clone(),
    })?;
    serde_json::from_str(&contents).map_err(ExtractionError::InvalidJson)
}

/// Builds the complete record for an extracted submission directory.
///
/// Runs the validation gates in their fixed order: top-level schema and
/// hostname, per-member schema, public-key cardinality, and finally key
/// population. Any gate failing aborts the run with its own error kind;
/// there is no partial success.
///
/// # Errors
///
/// Every kind in [`ExtractionError`] except `InvalidFileType` can surface
/// here; see the gate descriptions on [`validate::validate_metadata`],
/// [`validate::validate_team_members`], and [`load_raw`].
pub fn build_metadata<P: AsRef<Path>>(directory: P) -> Result<SubmissionMetadata> {
    let directory = directory.as_ref();
    let raw = load_raw(directory)?;

    validate::validate_metadata(&raw)?;

    let members_raw = raw.get("teamMembers").unwrap_or(&Value::Null);
    validate::validate_team_members(members_raw)?;

    // Coarse cardinality check: one metadata.json plus one .pub per member,
    // nothing else.
    let declared = members_raw.as_array().map_or(0, Vec::len);
    let entries = count_entries(directory)?;
    if entries != declared + 1 {
        return Err(ExtractionError::ExtraneousPublicKey {
            members: declared,
            entries,
        });
    }

    let mut metadata = from_raw(&raw)?;
    for member in &mut metadata.team_members {
        member.public_key = read_public_key(directory, &member.username)?;
    }

    Ok(metadata)
}

/// Counts the entries in the submission root.
fn count_entries(directory: &Path) -> Result<usize> {
    let entries = fs::read_dir(directory).map_err(|_| ExtractionError::FailedToExtract {
        path: directory.to_path_buf(),
    })?;
    Ok(entries.count())
}

/// Converts the validated raw document into the typed record.
///
/// Key presence is already guaranteed by the schema gates; what remains is
/// that each required field actually holds text.
fn from_raw(raw: &Value) -> Result<SubmissionMetadata> {
    let members = raw
        .get("teamMembers")
        .and_then(Value::as_array)
        .ok_or_else(|| validation("team member list is not a list"))?;

    let team_members = members
        .iter()
        .map(member_from_raw)
        .collect::<Result<Vec<_>>>()?;

    Ok(SubmissionMetadata {
        project_name: required_string(raw, "projectName")?,
        client: required_string(raw, "client")?,
        hostname: required_string(raw, "hostname")?,
        faculty_contact: required_string(raw, "facultyContact")?,
        team_members,
    })
}

fn member_from_raw(member: &Value) -> Result<TeamMember> {
    Ok(TeamMember {
        username: member_string(member, "username")?,
        email: member_string(member, "email")?,
        name: member_string(member, "name")?,
        // Whatever placeholder the submitted JSON carried is discarded; key
        // population overwrites this for every member.
        public_key: String::new(),
    })
}

fn required_string(raw: &Value, key: &str) -> Result<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| ExtractionError::InvalidMetadata {
            fields: vec![key.to_owned()],
        })
}

fn member_string(member: &Value, key: &str) -> Result<String> {
    member
        .get(key)
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| validation(&format!("team member field {key} is not text")))
}

/// Reads `<directory>/<username>.pub` and strips a single trailing newline.
fn read_public_key(directory: &Path, username: &str) -> Result<String> {
    let path = directory.join(format!("{username}.pub"));
    let mut contents = fs::read_to_string(&path).map_err(|_| ExtractionError::FailedToExtract {
        path: path.clone(),
    })?;
    if contents.ends_with('\n') {
        contents.pop();
    }
    Ok(contents)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::sample_metadata;
    use crate::test_utils::write_submission_dir;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_load_raw_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = load_raw(temp.path()).unwrap_err();
        assert!(matches!(err, ExtractionError::FailedToExtract { .. }));
        assert!(err.to_string().contains(METADATA_FILE));
    }

    #[test]
    fn test_load_raw_malformed_json() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(METADATA_FILE), "{ not json").unwrap();
        assert!(matches!(
            load_raw(temp.path()),
            Err(ExtractionError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_load_raw_defers_schema_checks() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(METADATA_FILE), "[1, 2, 3]").unwrap();
        assert!(load_raw(temp.path()).is_ok());
    }

    #[test]
    fn test_build_metadata_populates_keys() {
        let temp = TempDir::new().unwrap();
        write_submission_dir(
            temp.path(),
            &sample_metadata(),
            &[("alice", "ssh-rsa AAAA...\n")],
        );

        let metadata = build_metadata(temp.path()).unwrap();
        assert_eq!(metadata.project_name, "P");
        assert_eq!(metadata.client, "C");
        assert_eq!(metadata.hostname, "host-1");
        assert_eq!(metadata.faculty_contact, "F");
        assert_eq!(metadata.team_members.len(), 1);
        assert_eq!(metadata.team_members[0].username, "alice");
        // Trailing newline stripped, nothing else.
        assert_eq!(metadata.team_members[0].public_key, "ssh-rsa AAAA...");
    }

    #[test]
    fn test_build_metadata_strips_one_newline_only() {
        let temp = TempDir::new().unwrap();
        write_submission_dir(
            temp.path(),
            &sample_metadata(),
            &[("alice", "ssh-rsa AAAA\n\n")],
        );

        let metadata = build_metadata(temp.path()).unwrap();
        assert_eq!(metadata.team_members[0].public_key, "ssh-rsa AAAA\n");
    }

    #[test]
    fn test_build_metadata_count_mismatch() {
        let temp = TempDir::new().unwrap();
        let mut metadata = sample_metadata();
        metadata["teamMembers"] = json!([
            {"username": "alice", "email": "a@x.com", "name": "Alice", "publicKey": ""},
            {"username": "bob", "email": "b@x.com", "name": "Bob", "publicKey": ""},
            {"username": "carol", "email": "c@x.com", "name": "Carol", "publicKey": ""}
        ]);
        write_submission_dir(
            temp.path(),
            &metadata,
            &[("alice", "key-a\n"), ("bob", "key-b\n")],
        );

        let err = build_metadata(temp.path()).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::ExtraneousPublicKey {
                members: 3,
                entries: 3
            }
        ));
    }

    #[test]
    fn test_build_metadata_missing_key_file_names_member() {
        let temp = TempDir::new().unwrap();
        let mut metadata = sample_metadata();
        metadata["teamMembers"] = json!([
            {"username": "alice", "email": "a@x.com", "name": "Alice", "publicKey": ""},
            {"username": "bob", "email": "b@x.com", "name": "Bob", "publicKey": ""}
        ]);
        // Entry count lines up, but bob's key file is misnamed.
        write_submission_dir(
            temp.path(),
            &metadata,
            &[("alice", "key-a\n"), ("stray", "key-s\n")],
        );

        let err = build_metadata(temp.path()).unwrap_err();
        assert!(matches!(err, ExtractionError::FailedToExtract { .. }));
        assert!(err.to_string().contains("bob.pub"));
    }

    #[test]
    fn test_build_metadata_non_text_top_level_field() {
        let temp = TempDir::new().unwrap();
        let mut metadata = sample_metadata();
        metadata["projectName"] = json!(42);
        write_submission_dir(temp.path(), &metadata, &[("alice", "key-a\n")]);

        let err = build_metadata(temp.path()).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::InvalidMetadata { fields } if fields == vec!["projectName".to_string()]
        ));
    }

    #[test]
    fn test_build_metadata_non_text_member_field() {
        let temp = TempDir::new().unwrap();
        let mut metadata = sample_metadata();
        metadata["teamMembers"][0]["email"] = json!(7);
        write_submission_dir(temp.path(), &metadata, &[("alice", "key-a\n")]);

        let err = build_metadata(temp.path()).unwrap_err();
        assert!(matches!(err, ExtractionError::Validation { .. }));
    }

    #[test]
    fn test_build_metadata_is_idempotent() {
        let temp = TempDir::new().unwrap();
        write_submission_dir(
            temp.path(),
            &sample_metadata(),
            &[("alice", "ssh-rsa AAAA\n")],
        );

        let first = build_metadata(temp.path()).unwrap();
        let second = build_metadata(temp.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_record_serializes_to_camel_case() {
        let temp = TempDir::new().unwrap();
        write_submission_dir(
            temp.path(),
            &sample_metadata(),
            &[("alice", "ssh-rsa AAAA\n")],
        );

        let metadata = build_metadata(temp.path()).unwrap();
        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(value["projectName"], "P");
        assert_eq!(value["teamMembers"][0]["publicKey"], "ssh-rsa AAAA");
    }
}
