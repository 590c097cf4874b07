//! Required-field validation for submitted payloads.

use serde_json::{Map, Value};

/// A submission failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// One or more required fields were absent. Names keep the order of the
    /// required list and are never empty.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    /// A text value contained a NUL character.
    #[error("Field '{field}' must not contain NUL characters")]
    NulCharacter {
        /// Offending field.
        field: String,
    },
}

impl ValidationError {
    /// Names of the fields that were missing; empty for other failures.
    #[must_use]
    pub fn missing_fields(&self) -> &[String] {
        match self {
            Self::MissingFields(missing) => missing,
            Self::NulCharacter { .. } => &[],
        }
    }
}

/// Reject `text` when it contains a NUL character.
///
/// # Errors
/// [`ValidationError::NulCharacter`] naming `field`.
pub fn reject_nul(field: &str, text: String) -> Result<String, ValidationError> {
    if text.contains('\0') {
        return Err(ValidationError::NulCharacter {
            field: field.to_owned(),
        });
    }
    Ok(text)
}

/// Check that every name in `required` is present in `payload`.
///
/// A field is present when its key exists with a non-null value. Empty
/// strings count as present and values are not type-checked.
///
/// # Errors
/// Returns [`ValidationError`] listing every missing field.
///
/// # Examples
/// ```
/// use journal_backend::domain::validate_required;
/// use serde_json::json;
///
/// let payload = json!({"title": "", "date": null});
/// let err = validate_required(payload.as_object().unwrap(), &["title", "date", "notes"])
///     .unwrap_err();
/// assert_eq!(err.missing_fields(), ["date", "notes"]);
/// assert_eq!(err.to_string(), "Missing required fields: date, notes");
/// ```
pub fn validate_required(
    payload: &Map<String, Value>,
    required: &[&str],
) -> Result<(), ValidationError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|field| payload.get(**field).is_none_or(Value::is_null))
        .map(|field| (*field).to_owned())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    const FORM_FIELDS: &[&str] = &["title", "date", "notes"];

    #[rstest]
    #[case(json!({"title": "a", "date": "b", "notes": "c"}), &[])]
    #[case(json!({"title": "", "date": "", "notes": ""}), &[])]
    #[case(json!({"title": "Day 2"}), &["date", "notes"])]
    #[case(json!({}), &["title", "date", "notes"])]
    #[case(json!({"title": null, "date": "b", "notes": "c"}), &["title"])]
    #[case(json!({"notes": 3, "date": [], "extra": "ignored"}), &["title"])]
    fn reports_exactly_the_missing_fields(#[case] payload: Value, #[case] expected: &[&str]) {
        let payload = payload.as_object().cloned().unwrap_or_default();
        let result = validate_required(&payload, FORM_FIELDS);
        match result {
            Ok(()) => assert!(expected.is_empty(), "expected {expected:?} to be missing"),
            Err(err) => assert_eq!(err.missing_fields(), expected),
        }
    }

    #[rstest]
    fn message_names_every_missing_field() {
        let payload = Map::new();
        let err = validate_required(&payload, &["date", "title", "content"])
            .expect_err("empty payload is invalid");
        assert_eq!(err.to_string(), "Missing required fields: date, title, content");
    }

    #[rstest]
    fn nul_characters_are_rejected() {
        assert_eq!(reject_nul("title", "Day 1".to_owned()), Ok("Day 1".to_owned()));
        let err = reject_nul("title", "Day\u{0}1".to_owned()).expect_err("NUL");
        assert_eq!(
            err,
            ValidationError::NulCharacter {
                field: "title".to_owned()
            }
        );
        assert!(err.missing_fields().is_empty());
    }
}
