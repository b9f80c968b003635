use diesel::prelude::*;
use serde::Deserialize;

/// Role row from `cargos`
#[derive(Debug, Queryable, Selectable, Identifiable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::cargos)]
#[diesel(primary_key(id_cargo))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Role {
    #[diesel(column_name = id_cargo)]
    pub id: i32,
    #[diesel(column_name = descricao)]
    pub description: String,
}

/// Role insert. `id: None` lets the sequence assign it; seeding passes fixed ids.
#[derive(Debug, Insertable, Deserialize, Clone)]
#[diesel(table_name = crate::schema::cargos)]
pub struct NewRole {
    #[diesel(column_name = id_cargo)]
    pub id: Option<i32>,
    #[diesel(column_name = descricao)]
    pub description: String,
}

impl NewRole {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: None,
            description: description.into(),
        }
    }

    pub fn with_id(id: i32, description: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            description: description.into(),
        }
    }
}
