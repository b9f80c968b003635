use std::sync::OnceLock;

use regex::Regex;

use crate::error::ConstraintKind;

/// Parses PostgreSQL constraint violation messages and constraint names.
///
/// Constraint names follow the PostgreSQL defaults used by the migrations:
/// `<table>_<column>_key`, `<table>_<column>_fkey`, `<table>_<column>_check`,
/// `<table>_pkey`.
pub struct ConstraintParser;

/// What a constraint violation refers to, in store terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConstraint {
    pub kind: ConstraintKind,
    pub table: String,
    pub column: String,
    pub value: Option<String>,
}

struct RegexPatterns {
    key_value: Regex,
    column_name: Regex,
    relation: Regex,
    constraint_name: Regex,
}

impl RegexPatterns {
    fn new() -> Self {
        Self {
            // Key (email)=(ana@x.com) already exists.
            key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").expect("valid key/value regex"),
            column_name: Regex::new(r#"column "([^"]+)""#).expect("valid column regex"),
            // Both `table "x"` and `relation "x"` appear depending on the error
            relation: Regex::new(r#"(?:table|relation) "([^"]+)""#).expect("valid relation regex"),
            constraint_name: Regex::new(r#"constraint "([^"]+)""#)
                .expect("valid constraint regex"),
        }
    }
}

static REGEX_PATTERNS: OnceLock<RegexPatterns> = OnceLock::new();

const CONSTRAINT_SUFFIXES: [&str; 4] = ["_fkey", "_check", "_key", "_idx"];

impl ConstraintParser {
    fn patterns() -> &'static RegexPatterns {
        REGEX_PATTERNS.get_or_init(RegexPatterns::new)
    }

    /// Builds a [`ParsedConstraint`] from whatever the driver reported.
    ///
    /// The constraint name wins when present; the message is the fallback for
    /// both the table/column pair and the offending value.
    pub fn parse(
        kind: ConstraintKind,
        message: &str,
        constraint_name: Option<&str>,
        known_tables: &[&str],
    ) -> Option<ParsedConstraint> {
        let constraint = constraint_name
            .map(str::to_string)
            .or_else(|| Self::extract_constraint_from_message(message));

        let from_name = constraint
            .as_deref()
            .and_then(|name| Self::parse_constraint_name(name, known_tables));

        let key_value = Self::extract_key_value_from_message(message);

        let (table, column) = match from_name {
            Some(pair) => pair,
            None => {
                let column = key_value
                    .as_ref()
                    .map(|(field, _)| field.clone())
                    .or_else(|| Self::extract_column_from_message(message))?;
                let table = Self::extract_table_from_message(message)
                    .unwrap_or_else(|| "resource".to_string());
                (table, column)
            }
        };

        Some(ParsedConstraint {
            kind,
            table,
            column,
            value: key_value.map(|(_, value)| value),
        })
    }

    /// Splits a constraint name into `(table, column)`.
    ///
    /// `known_tables` resolves names whose table part itself contains an
    /// underscore; otherwise the first segment is taken as the table.
    ///
    /// - `utilizadores_email_key` -> `("utilizadores", "email")`
    /// - `utilizadores_id_cargo_fkey` -> `("utilizadores", "id_cargo")`
    /// - `cargos_pkey` -> `("cargos", "id_cargo")`
    pub fn parse_constraint_name(
        constraint_name: &str,
        known_tables: &[&str],
    ) -> Option<(String, String)> {
        // A primary key name carries only the table
        if let Some(table) = constraint_name.strip_suffix("_pkey") {
            if table.is_empty() {
                return None;
            }
            return Some((table.to_string(), Self::primary_key_column(table).to_string()));
        }

        let stem = CONSTRAINT_SUFFIXES
            .iter()
            .find_map(|suffix| constraint_name.strip_suffix(suffix))?;

        let by_known_table = known_tables.iter().find_map(|table| {
            stem.strip_prefix(table)
                .and_then(|rest| rest.strip_prefix('_'))
                .filter(|column| !column.is_empty())
                .map(|column| (table.to_string(), column.to_string()))
        });
        if by_known_table.is_some() {
            return by_known_table;
        }

        let (table, column) = stem.split_once('_')?;
        if table.is_empty() || column.is_empty() {
            return None;
        }
        Some((table.to_string(), column.to_string()))
    }

    /// Primary key column of a store table; `id` for tables outside the schema.
    pub fn primary_key_column(table: &str) -> &'static str {
        match table {
            "utilizadores" => "id_utilizador",
            "cargos" => "id_cargo",
            _ => "id",
        }
    }

    pub fn extract_column_from_message(message: &str) -> Option<String> {
        Self::patterns()
            .column_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn extract_table_from_message(message: &str) -> Option<String> {
        Self::patterns()
            .relation
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn extract_constraint_from_message(message: &str) -> Option<String> {
        Self::patterns()
            .constraint_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Extracts `(field, value)` from a `Key (field)=(value)` detail line.
    pub fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        Self::patterns().key_value.captures(message).and_then(|caps| {
            let field = caps.get(1)?.as_str().to_string();
            let value = caps.get(2)?.as_str().to_string();
            Some((field, value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLES: &[&str] = &["utilizadores", "cargos"];

    #[test]
    fn test_parse_unique_email_violation() {
        let message = "duplicate key value violates unique constraint \"utilizadores_email_key\"\nDETAIL: Key (email)=(ana@x.com) already exists.";
        let parsed = ConstraintParser::parse(
            ConstraintKind::Unique,
            message,
            Some("utilizadores_email_key"),
            TABLES,
        )
        .unwrap();

        assert_eq!(parsed.table, "utilizadores");
        assert_eq!(parsed.column, "email");
        assert_eq!(parsed.value.as_deref(), Some("ana@x.com"));
    }

    #[test]
    fn test_parse_foreign_key_with_underscored_column() {
        let message = "insert or update on table \"utilizadores\" violates foreign key constraint \"utilizadores_id_cargo_fkey\"\nDETAIL: Key (id_cargo)=(99) is not present in table \"cargos\".";
        let parsed = ConstraintParser::parse(
            ConstraintKind::ForeignKey,
            message,
            Some("utilizadores_id_cargo_fkey"),
            TABLES,
        )
        .unwrap();

        assert_eq!(parsed.table, "utilizadores");
        assert_eq!(parsed.column, "id_cargo");
        assert_eq!(parsed.value.as_deref(), Some("99"));
    }

    #[test]
    fn test_parse_check_violation_from_message_only() {
        let message = "new row for relation \"utilizadores\" violates check constraint \"utilizadores_idade_check\"";
        let parsed =
            ConstraintParser::parse(ConstraintKind::Check, message, None, TABLES).unwrap();

        assert_eq!(parsed.table, "utilizadores");
        assert_eq!(parsed.column, "idade");
        assert_eq!(parsed.value, None);
    }

    #[test]
    fn test_parse_not_null_violation() {
        let message = "null value in column \"nome\" of relation \"utilizadores\" violates not-null constraint";
        let parsed =
            ConstraintParser::parse(ConstraintKind::NotNull, message, None, TABLES).unwrap();

        assert_eq!(parsed.table, "utilizadores");
        assert_eq!(parsed.column, "nome");
    }

    #[test]
    fn test_parse_constraint_name_without_known_table() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("posts_title_idx", &[]),
            Some(("posts".to_string(), "title".to_string()))
        );
        assert_eq!(
            ConstraintParser::parse_constraint_name("job_runs_owner_id_fkey", &["job_runs"]),
            Some(("job_runs".to_string(), "owner_id".to_string()))
        );
        assert_eq!(ConstraintParser::parse_constraint_name("invalid", &[]), None);
        assert_eq!(ConstraintParser::parse_constraint_name("_key", &[]), None);
    }

    #[test]
    fn test_primary_key_name_maps_to_id_column() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("cargos_pkey", TABLES),
            Some(("cargos".to_string(), "id_cargo".to_string()))
        );
        assert_eq!(
            ConstraintParser::parse_constraint_name("utilizadores_pkey", TABLES),
            Some(("utilizadores".to_string(), "id_utilizador".to_string()))
        );
        assert_eq!(
            ConstraintParser::parse_constraint_name("job_runs_pkey", &[]),
            Some(("job_runs".to_string(), "id".to_string()))
        );
        assert_eq!(ConstraintParser::parse_constraint_name("_pkey", TABLES), None);
    }

    #[test]
    fn test_parse_duplicate_primary_key() {
        let message = "duplicate key value violates unique constraint \"cargos_pkey\"\nDETAIL: Key (id_cargo)=(1) already exists.";
        let parsed = ConstraintParser::parse(
            ConstraintKind::Unique,
            message,
            Some("cargos_pkey"),
            TABLES,
        )
        .unwrap();

        assert_eq!(parsed.table, "cargos");
        assert_eq!(parsed.column, "id_cargo");
        assert_eq!(parsed.value.as_deref(), Some("1"));
    }

    #[test]
    fn test_unparseable_message_returns_none() {
        let parsed = ConstraintParser::parse(
            ConstraintKind::Unique,
            "completely unrelated error message",
            None,
            TABLES,
        );
        assert_eq!(parsed, None);
    }

    #[test]
    fn test_regex_patterns_caching() {
        let patterns1 = ConstraintParser::patterns();
        let patterns2 = ConstraintParser::patterns();
        assert!(std::ptr::eq(patterns1, patterns2));
    }
}
