//! Composite resource IDs
//!
//! Resources whose identity spans several attributes are tracked by the host
//! under a single string ID built by joining those attributes with
//! [`RESOURCE_ID_SEPARATOR`].

use crate::error::{FormatError, IdTarget};

/// Separator used to build resource IDs from a combination of attributes
pub const RESOURCE_ID_SEPARATOR: &str = ",";

/// Split a composite ID into its parts
///
/// Fails if the ID does not contain exactly `part_count` parts (at least two),
/// or if any part is blank and `allow_empty_part` is false.
pub fn expand_resource_id(
    id: &str,
    part_count: usize,
    allow_empty_part: bool,
) -> Result<Vec<String>, FormatError> {
    let parts: Vec<String> = id
        .split(RESOURCE_ID_SEPARATOR)
        .map(str::to_string)
        .collect();

    validate(&parts, id, IdTarget::Id, part_count, allow_empty_part)?;

    Ok(parts)
}

/// Join parts into a composite ID
///
/// Applies the same validation as [`expand_resource_id`], so a successful
/// result always expands back into `parts`.
pub fn flatten_resource_id<S: AsRef<str>>(
    parts: &[S],
    part_count: usize,
    allow_empty_part: bool,
) -> Result<String, FormatError> {
    let parts: Vec<&str> = parts.iter().map(AsRef::as_ref).collect();
    let rendered = format!("{:?}", parts);

    validate(&parts, &rendered, IdTarget::Parts, part_count, allow_empty_part)?;

    Ok(parts.join(RESOURCE_ID_SEPARATOR))
}

/// Number of separator-delimited parts in an ID
pub fn resource_id_part_count(id: &str) -> usize {
    id.split(RESOURCE_ID_SEPARATOR).count()
}

fn validate<S: AsRef<str>>(
    parts: &[S],
    input: &str,
    target: IdTarget,
    part_count: usize,
    allow_empty_part: bool,
) -> Result<(), FormatError> {
    if parts.len() <= 1 {
        return Err(FormatError::TooFewParts {
            target,
            input: input.to_string(),
        });
    }

    if parts.len() != part_count {
        // Join errors have no separator to report
        let separator = match target {
            IdTarget::Id => Some(RESOURCE_ID_SEPARATOR),
            IdTarget::Parts => None,
        };
        return Err(FormatError::PartCount {
            target,
            input: input.to_string(),
            expected: part_count,
            found: parts.len(),
            separator,
        });
    }

    if !allow_empty_part {
        // Only exact empty strings count as blank
        let indexes: Vec<usize> = parts
            .iter()
            .enumerate()
            .filter(|(_, part)| part.as_ref().is_empty())
            .map(|(index, _)| index)
            .collect();

        if !indexes.is_empty() {
            tracing::debug!("blank ID parts at {:?} in {}", indexes, input);
            return Err(FormatError::BlankParts {
                target,
                input: input.to_string(),
                indexes,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_joins_with_comma() {
        let id = flatten_resource_id(&["catalog", "db", "table"], 3, false).unwrap();
        assert_eq!(id, "catalog,db,table");
    }

    #[test]
    fn test_flatten_rejects_single_part() {
        let err = flatten_resource_id(&["a"], 1, false).unwrap_err();
        assert!(matches!(err, FormatError::TooFewParts { .. }));
    }

    #[test]
    fn test_flatten_rejects_count_mismatch() {
        let err = flatten_resource_id(&["a", "b"], 3, false).unwrap_err();
        assert_eq!(
            err,
            FormatError::PartCount {
                target: IdTarget::Parts,
                input: r#"["a", "b"]"#.to_string(),
                expected: 3,
                found: 2,
                separator: None,
            }
        );
        assert_eq!(
            err.to_string(),
            r#"unexpected format for ID parts (["a", "b"]), expected (3) parts"#
        );
    }

    #[test]
    fn test_flatten_error_messages_name_parts() {
        let err = flatten_resource_id(&["a"], 1, false).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"unexpected format for ID parts (["a"]), expected more than one part"#
        );

        let err = flatten_resource_id(&["a", "", "c"], 3, false).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"unexpected format for ID parts (["a", "", "c"]), the following id parts indexes are blank ([1])"#
        );
        assert_eq!(err.target(), IdTarget::Parts);
    }

    #[test]
    fn test_flatten_reports_blank_index() {
        let err = flatten_resource_id(&["a", "", "c"], 3, false).unwrap_err();
        assert_eq!(err.blank_indexes(), &[1]);
    }

    #[test]
    fn test_flatten_allows_blank_when_asked() {
        let id = flatten_resource_id(&["a", "", "c"], 3, true).unwrap();
        assert_eq!(id, "a,,c");
    }

    #[test]
    fn test_whitespace_part_is_not_blank() {
        let id = flatten_resource_id(&["a", " ", "c"], 3, false).unwrap();
        assert_eq!(id, "a, ,c");
        assert_eq!(expand_resource_id(&id, 3, false).unwrap()[1], " ");
    }

    #[test]
    fn test_expand_splits_parts() {
        let parts = expand_resource_id("123456789012,my_db,my_table", 3, false).unwrap();
        assert_eq!(parts, vec!["123456789012", "my_db", "my_table"]);
    }

    #[test]
    fn test_expand_without_separator() {
        let err = expand_resource_id("just-a-name", 2, false).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unexpected format for ID (just-a-name), expected more than one part"
        );
    }

    #[test]
    fn test_expand_count_mismatch_message() {
        let err = expand_resource_id("a,b,c", 2, false).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unexpected format for ID (a,b,c), expected (2) parts separated by (,)"
        );
    }

    #[test]
    fn test_expand_reports_every_blank_part() {
        let err = expand_resource_id(",b,", 3, false).unwrap_err();
        assert_eq!(err.blank_indexes(), &[0, 2]);
        assert_eq!(err.input(), ",b,");
    }

    #[test]
    fn test_expand_all_blank_allowed() {
        let parts = expand_resource_id(",", 2, true).unwrap();
        assert_eq!(parts, vec!["", ""]);
    }

    #[test]
    fn test_part_count() {
        assert_eq!(resource_id_part_count("a"), 1);
        assert_eq!(resource_id_part_count("a,b"), 2);
        assert_eq!(resource_id_part_count(",,"), 3);
        assert_eq!(resource_id_part_count(""), 1);
    }
}
