//! Schema and hostname validation for submission metadata.
//!
//! Validation runs over the raw parsed JSON document, before any typed
//! record is built, so that missing keys and unparseable text surface as
//! distinct error kinds.

use serde_json::Value;

use crate::ExtractionError;
use crate::Result;

/// Top-level fields every `metadata.json` must carry.
pub const REQUIRED_KEYS: [&str; 5] = [
    "projectName",
    "client",
    "hostname",
    "facultyContact",
    "teamMembers",
];

/// Fields every team member entry must carry.
pub const REQUIRED_MEMBER_KEYS: [&str; 4] = ["username", "publicKey", "email", "name"];

/// Longest hostname label the grammar accepts.
const MAX_HOSTNAME_LEN: usize = 63;

/// Checks the top-level schema, then the hostname grammar.
///
/// # Errors
///
/// Returns [`ExtractionError::InvalidMetadata`] listing the absent required
/// keys, or [`ExtractionError::InvalidHostname`] if the hostname value does
/// not satisfy the label grammar (a non-text hostname cannot).
pub fn validate_metadata(metadata: &Value) -> Result<()> {
    let missing: Vec<String> = REQUIRED_KEYS
        .iter()
        .filter(|key| metadata.get(**key).is_none())
        .map(ToString::to_string)
        .collect();

    if !missing.is_empty() {
        return Err(ExtractionError::InvalidMetadata { fields: missing });
    }

    let hostname = metadata
        .get("hostname")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if !is_valid_hostname(hostname) {
        return Err(ExtractionError::InvalidHostname {
            hostname: hostname.to_owned(),
        });
    }

    Ok(())
}

/// Checks that the team member list is non-empty and that every member
/// carries the required fields.
///
/// # Errors
///
/// Returns [`ExtractionError::Validation`] for an empty list, a member that
/// is not an object, or a member missing a required field. All three
/// collapse into the one kind; no finer distinction is surfaced.
pub fn validate_team_members(team_members: &Value) -> Result<()> {
    let members = team_members
        .as_array()
        .ok_or_else(|| validation("team member list is not a list"))?;

    if members.is_empty() {
        return Err(validation("team member list is empty"));
    }

    for member in members {
        let Some(entry) = member.as_object() else {
            return Err(validation("team member entry is not an object"));
        };
        for key in REQUIRED_MEMBER_KEYS {
            if !entry.contains_key(key) {
                return Err(validation(&format!(
                    "team member entry is missing required field {key}"
                )));
            }
        }
    }

    Ok(())
}

/// Checks a hostname against the constrained label grammar: 1-63 characters
/// from `[A-Za-z0-9-]`, no leading or trailing hyphen, and not composed
/// entirely of digits.
///
/// # Examples
///
/// ```
/// use intake_core::validate::is_valid_hostname;
///
/// assert!(is_valid_hostname("my-host1"));
/// assert!(!is_valid_hostname("-bad"));
/// assert!(!is_valid_hostname("12345"));
/// ```
#[must_use]
pub fn is_valid_hostname(hostname: &str) -> bool {
    if hostname.is_empty() || hostname.len() > MAX_HOSTNAME_LEN {
        return false;
    }
    if !hostname
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-')
    {
        return false;
    }
    if hostname.starts_with('-') || hostname.ends_with('-') {
        return false;
    }
    !hostname.bytes().all(|b| b.is_ascii_digit())
}

pub(crate) fn validation(reason: &str) -> ExtractionError {
    ExtractionError::Validation {
        reason: reason.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_metadata() -> Value {
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

    #[test]
    fn test_validate_metadata_accepts_complete_document() {
        assert!(validate_metadata(&valid_metadata()).is_ok());
    }

    #[test]
    fn test_validate_metadata_each_missing_key_fails() {
        for key in REQUIRED_KEYS {
            let mut metadata = valid_metadata();
            metadata.as_object_mut().unwrap().remove(key);

            let err = validate_metadata(&metadata).unwrap_err();
            match err {
                ExtractionError::InvalidMetadata { fields } => {
                    assert_eq!(fields, vec![key.to_string()]);
                }
                other => panic!("expected InvalidMetadata, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_validate_metadata_non_object_document() {
        let err = validate_metadata(&json!(["not", "an", "object"])).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::InvalidMetadata { fields } if fields.len() == REQUIRED_KEYS.len()
        ));
    }

    #[test]
    fn test_validate_metadata_bad_hostname() {
        let mut metadata = valid_metadata();
        metadata["hostname"] = json!("-bad");
        assert!(matches!(
            validate_metadata(&metadata),
            Err(ExtractionError::InvalidHostname { hostname }) if hostname == "-bad"
        ));
    }

    #[test]
    fn test_validate_metadata_non_string_hostname() {
        let mut metadata = valid_metadata();
        metadata["hostname"] = json!(42);
        assert!(matches!(
            validate_metadata(&metadata),
            Err(ExtractionError::InvalidHostname { .. })
        ));
    }

    #[test]
    fn test_validate_team_members_empty_list() {
        let err = validate_team_members(&json!([])).unwrap_err();
        assert!(matches!(err, ExtractionError::Validation { .. }));
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_validate_team_members_missing_field() {
        let members = json!([
            {"username": "alice", "name": "Alice", "publicKey": ""}
        ]);
        let err = validate_team_members(&members).unwrap_err();
        assert!(matches!(err, ExtractionError::Validation { .. }));
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn test_validate_team_members_non_object_entry() {
        let err = validate_team_members(&json!(["alice"])).unwrap_err();
        assert!(matches!(err, ExtractionError::Validation { .. }));
    }

    #[test]
    fn test_validate_team_members_placeholder_public_key_passes() {
        let members = json!([
            {"username": "alice", "email": "a@x.com", "name": "Alice", "publicKey": null}
        ]);
        assert!(validate_team_members(&members).is_ok());
    }

    #[test]
    fn test_hostname_grammar() {
        assert!(is_valid_hostname("my-host1"));
        assert!(is_valid_hostname("a"));
        assert!(is_valid_hostname(&"a".repeat(63)));

        assert!(!is_valid_hostname(""));
        assert!(!is_valid_hostname("-bad"));
        assert!(!is_valid_hostname("bad-"));
        assert!(!is_valid_hostname("12345"));
        assert!(!is_valid_hostname(&"a".repeat(64)));
        assert!(!is_valid_hostname("under_score"));
        assert!(!is_valid_hostname("dotted.host"));
    }
}
