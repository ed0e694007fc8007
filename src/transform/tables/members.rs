//! `members` transform: drop nameless rows, fill missing identity fields.

use tracing::{debug, warn};

use crate::tokenizer::Value;
use crate::transform::traits::*;

// id, package_id, card_id, government_id, created_at, updated_at,
// year_of_birth, first_name, last_name, ...
const GOVERNMENT_ID: usize = 3;
const FIRST_NAME: usize = 7;
const LAST_NAME: usize = 8;
const MIN_VALUES: usize = 9;

/// Placeholder written over `NULL` identity fields.
const MISSING: &str = "MISSING";

/// Drops members with neither first nor last name and replaces `NULL`
/// government id, first name or last name with `'MISSING'`.
pub struct MembersTransform;

impl TableTransform for MembersTransform {
    fn table(&self) -> &'static str {
        "members"
    }

    fn apply(&self, mut row: Row) -> Outcome {
        if row.values.len() < MIN_VALUES {
            warn!(
                table = "members",
                count = row.values.len(),
                expected = MIN_VALUES,
                "too few values; passing through"
            );
            return Outcome::PassThrough;
        }

        if row.values[FIRST_NAME].is_null() && row.values[LAST_NAME].is_null() {
            debug!(id = %row.values[0], "member has no name; dropping row");
            return Outcome::Drop;
        }

        let mut substituted = false;
        for index in [GOVERNMENT_ID, FIRST_NAME, LAST_NAME] {
            if row.values[index].is_null() {
                row.values[index] = Value::quoted(MISSING);
                substituted = true;
            }
        }

        if substituted {
            Outcome::Rewrite(row)
        } else {
            Outcome::PassThrough
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;
    use pretty_assertions::assert_eq;

    const PREFIX: &str = r#"INSERT OR REPLACE INTO "members" ("id", "package_id", "card_id", "government_id", "created_at", "updated_at", "year_of_birth", "first_name", "last_name", "phone") "#;

    fn apply(values: &str) -> Outcome {
        MembersTransform.apply(Row {
            prefix: PREFIX.to_string(),
            values: tokenize(values).unwrap(),
        })
    }

    fn rewritten_values(values: &str) -> String {
        match apply(values) {
            Outcome::Rewrite(row) => crate::tokenizer::join(&row.values),
            other => panic!("expected rewrite, got {other:?}"),
        }
    }

    #[test]
    fn test_nameless_member_dropped() {
        assert_eq!(
            apply("1, 2, 'C1', NULL, '2020', '2020', 1990, NULL, NULL, '555'"),
            Outcome::Drop
        );
        assert_eq!(
            apply("1, 2, 'C1', 'G1', '2020', '2020', 1990, null, 'NULL', '555'"),
            Outcome::Drop
        );
    }

    #[test]
    fn test_single_null_name_filled() {
        assert_eq!(
            rewritten_values("1, 2, 'C1', 'G1', '2020', '2020', 1990, NULL, 'Smith', '555'"),
            "1, 2, 'C1', 'G1', '2020', '2020', 1990, 'MISSING', 'Smith', '555'"
        );
        assert_eq!(
            rewritten_values("1, 2, 'C1', 'G1', '2020', '2020', 1990, 'Ann', NULL, '555'"),
            "1, 2, 'C1', 'G1', '2020', '2020', 1990, 'Ann', 'MISSING', '555'"
        );
    }

    #[test]
    fn test_government_id_filled() {
        assert_eq!(
            rewritten_values("1, 2, NULL, NULL, '2020', '2020', NULL, 'Ann', 'Lee', NULL"),
            "1, 2, NULL, 'MISSING', '2020', '2020', NULL, 'Ann', 'Lee', NULL"
        );
    }

    #[test]
    fn test_complete_row_passes_through() {
        assert_eq!(
            apply("1, 2, 'C1', 'G1', '2020', '2020', 1990, 'Ann', 'Lee', NULL"),
            Outcome::PassThrough
        );
    }

    #[test]
    fn test_short_row_passes_through() {
        assert_eq!(apply("1, 2, 'C1', NULL, NULL"), Outcome::PassThrough);
    }
}
