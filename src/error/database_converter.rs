use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

use crate::error::{AppError, ConstraintKind, ConstraintParser};

/// Tables the parser can recognise inside constraint names.
const KNOWN_TABLES: &[&str] = &["utilizadores", "cargos"];

/// Converts diesel errors into structured [`AppError`] variants.
///
/// Store tables and columns are reported under their domain names
/// (`utilizadores.idade` becomes `user.age`) so callers never see the
/// physical schema.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        let message = info.message();

        let constraint_kind = match kind {
            DatabaseErrorKind::UniqueViolation => ConstraintKind::Unique,
            DatabaseErrorKind::ForeignKeyViolation => ConstraintKind::ForeignKey,
            DatabaseErrorKind::CheckViolation => ConstraintKind::Check,
            DatabaseErrorKind::NotNullViolation => ConstraintKind::NotNull,
            DatabaseErrorKind::ClosedConnection => {
                return AppError::ConnectionFailure {
                    source: anyhow::anyhow!("connection closed during {operation}: {message}"),
                };
            }
            _ => {
                return AppError::Database {
                    operation: operation.to_string(),
                    source: anyhow::anyhow!("Database error: {message}"),
                };
            }
        };

        // The detail line carries `Key (col)=(val)`; diesel keeps it apart from the message.
        let full_message = match info.details() {
            Some(details) => format!("{message}\nDETAIL: {details}"),
            None => message.to_string(),
        };

        match ConstraintParser::parse(
            constraint_kind,
            &full_message,
            info.constraint_name(),
            KNOWN_TABLES,
        ) {
            Some(parsed) => AppError::ConstraintViolation {
                kind: parsed.kind,
                entity: Self::entity_name(&parsed.table).to_string(),
                field: Self::field_name(&parsed.table, &parsed.column).to_string(),
                value: parsed.value,
            },
            None => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::anyhow!("{constraint_kind} constraint violation: {message}"),
            },
        }
    }

    /// Domain name for a store table.
    pub fn entity_name(table: &str) -> &str {
        match table {
            "utilizadores" => "user",
            "cargos" => "role",
            other => other,
        }
    }

    /// Domain name for a column of `table`.
    pub fn field_name<'a>(table: &str, column: &'a str) -> &'a str {
        if column == ConstraintParser::primary_key_column(table) {
            return "id";
        }
        match column {
            "id_utilizador" => "id",
            "id_cargo" => "role_id",
            "nome" => "name",
            "idade" => "age",
            "telefone" => "phone",
            "descricao" => "description",
            other => other,
        }
    }
}
