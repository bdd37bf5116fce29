//! Convenience lookups over decoded entities.

use thiserror::Error;

use crate::model::{Issue, IssueCustomFieldType};

/// A sequence expected to hold exactly one element held some other count.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Expected exactly one value, found {found}")]
pub struct NonSingleValueError {
    pub found: usize,
}

/// The only element of `values`.
///
/// # Errors
///
/// Returns [`NonSingleValueError`] when `values` is empty or has more than
/// one element.
pub fn get_single_value<T>(values: &[T]) -> Result<&T, NonSingleValueError> {
    match values {
        [value] => Ok(value),
        _ => Err(NonSingleValueError {
            found: values.len(),
        }),
    }
}

/// The custom field of `issue` named `name`.
///
/// # Errors
///
/// Returns [`NonSingleValueError`] unless exactly one field has that name.
/// An issue decoded without custom fields has none.
pub fn get_issue_custom_field<'a>(
    issue: &'a Issue,
    name: &str,
) -> Result<&'a IssueCustomFieldType, NonSingleValueError> {
    let matching: Vec<&IssueCustomFieldType> = issue
        .custom_fields()
        .iter()
        .flatten()
        .filter(|field| field.name() == Some(name))
        .collect();
    get_single_value(&matching).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{StateIssueCustomField, TextIssueCustomField};

    #[test]
    fn test_single_value() {
        assert_eq!(get_single_value(&[7]), Ok(&7));
    }

    #[test]
    fn test_single_value_empty() {
        let values: [i64; 0] = [];
        assert_eq!(
            get_single_value(&values),
            Err(NonSingleValueError { found: 0 })
        );
    }

    #[test]
    fn test_single_value_many() {
        let err = get_single_value(&["a", "b"]).unwrap_err();
        assert_eq!(err.found, 2);
        assert_eq!(err.to_string(), "Expected exactly one value, found 2");
    }

    #[test]
    fn test_issue_custom_field_lookup() {
        let issue = Issue::new().with_custom_fields(Some(vec![
            StateIssueCustomField::new()
                .with_name(Some("State".into()))
                .into(),
            TextIssueCustomField::new()
                .with_name(Some("Notes".into()))
                .into(),
        ]));

        let field = get_issue_custom_field(&issue, "Notes").unwrap();
        assert!(matches!(field, IssueCustomFieldType::Text(_)));
        assert_eq!(
            get_issue_custom_field(&issue, "Priority"),
            Err(NonSingleValueError { found: 0 })
        );
        assert!(get_issue_custom_field(&Issue::new(), "State").is_err());
    }

    #[test]
    fn test_issue_custom_field_duplicate_name() {
        let issue = Issue::new().with_custom_fields(Some(vec![
            TextIssueCustomField::new().with_name(Some("Notes".into())).into(),
            TextIssueCustomField::new().with_name(Some("Notes".into())).into(),
        ]));
        assert_eq!(
            get_issue_custom_field(&issue, "Notes").unwrap_err(),
            NonSingleValueError { found: 2 }
        );
    }
}
