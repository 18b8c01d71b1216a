// Identifier validation for table, column and sort-key names spliced into SQL text

use std::sync::LazyLock;

use regex::Regex;

use crate::error::SqlDbError;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*(\.[A-Za-z_][A-Za-z0-9_$]*)?$")
        .unwrap_or_else(|e| panic!("identifier pattern is invalid: {e}"))
});

/// Accept a bare or `schema.`-qualified identifier.
///
/// # Errors
/// Returns `SqlDbError::InvalidIdentifier` for anything else.
pub fn validate_identifier(name: &str) -> Result<&str, SqlDbError> {
    if IDENTIFIER.is_match(name) {
        Ok(name)
    } else {
        Err(SqlDbError::InvalidIdentifier(name.to_string()))
    }
}

/// Split a validated name into its optional schema qualifier and the bare name.
#[must_use]
pub fn split_qualified(name: &str) -> (Option<&str>, &str) {
    match name.split_once('.') {
        Some((schema, bare)) => (Some(schema), bare),
        None => (None, name),
    }
}

/// Accept an identifier or `*` in a select list.
///
/// # Errors
/// Returns `SqlDbError::InvalidIdentifier` for anything else.
pub fn validate_select_column(name: &str) -> Result<&str, SqlDbError> {
    if name == "*" {
        Ok(name)
    } else {
        validate_identifier(name)
    }
}

/// Reject native type tokens that could terminate or comment out the statement.
///
/// # Errors
/// Returns `SqlDbError::InvalidIdentifier` for empty tokens or tokens holding
/// `;`, `--`, `/*` or `*/`.
pub fn validate_type_token(token: &str) -> Result<&str, SqlDbError> {
    let trimmed = token.trim();
    if trimmed.is_empty()
        || [";", "--", "/*", "*/"]
            .iter()
            .any(|bad| trimmed.contains(bad))
    {
        return Err(SqlDbError::InvalidIdentifier(format!(
            "column type `{token}`"
        )));
    }
    Ok(trimmed)
}

/// Normalise a sort direction to `""`, `ASC` or `DESC`.
///
/// # Errors
/// Returns `SqlDbError::InvalidIdentifier` for any other direction.
pub fn validate_direction(direction: &str) -> Result<&'static str, SqlDbError> {
    match direction.trim().to_ascii_lowercase().as_str() {
        "" => Ok(""),
        "asc" => Ok("ASC"),
        "desc" => Ok("DESC"),
        _ => Err(SqlDbError::InvalidIdentifier(format!(
            "sort direction `{direction}`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        for ok in ["items", "_tmp", "public.items", "col$1", "Order_Id"] {
            assert!(validate_identifier(ok).is_ok(), "{ok}");
        }
        for bad in ["", "1abc", "a b", "a;drop", "a.b.c", "\"x\"", "a-b", "*"] {
            assert!(validate_identifier(bad).is_err(), "{bad}");
        }
        assert!(validate_select_column("*").is_ok());
    }

    #[test]
    fn qualified_names_split() {
        assert_eq!(split_qualified("public.items"), (Some("public"), "items"));
        assert_eq!(split_qualified("items"), (None, "items"));
    }

    #[test]
    fn type_tokens() {
        assert_eq!(validate_type_token(" varchar(64) ").unwrap(), "varchar(64)");
        assert!(validate_type_token("numeric(10, 2)").is_ok());
        assert!(validate_type_token("int; DROP TABLE x").is_err());
        assert!(validate_type_token("int -- x").is_err());
        assert!(validate_type_token("   ").is_err());
    }

    #[test]
    fn directions() {
        assert_eq!(validate_direction("").unwrap(), "");
        assert_eq!(validate_direction("Desc").unwrap(), "DESC");
        assert!(validate_direction("sideways").is_err());
    }
}
