use diesel::prelude::*;
use serde::Deserialize;

/// User row from `utilizadores`
///
/// `password` always holds an Argon2id PHC string.
#[derive(Debug, Queryable, Selectable, Identifiable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::utilizadores)]
#[diesel(primary_key(id_utilizador))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    #[diesel(column_name = id_utilizador)]
    pub id: i32,
    #[diesel(column_name = id_cargo)]
    pub role_id: i32,
    #[diesel(column_name = nome)]
    pub name: String,
    #[diesel(column_name = idade)]
    pub age: i32,
    pub email: String,
    #[diesel(column_name = telefone)]
    pub phone: String,
    pub password: String,
}

/// NewUser model for inserting new records
#[derive(Debug, Insertable, Deserialize, Clone)]
#[diesel(table_name = crate::schema::utilizadores)]
pub struct NewUser {
    #[diesel(column_name = id_cargo)]
    pub role_id: i32,
    #[diesel(column_name = nome)]
    pub name: String,
    #[diesel(column_name = idade)]
    pub age: i32,
    pub email: String,
    #[diesel(column_name = telefone)]
    pub phone: String,
    pub password: String,
}

/// Partial update. `Some` sets the column (even to `0` or `""`), `None` leaves it.
#[derive(Debug, AsChangeset, Deserialize, Clone, Default, PartialEq, Eq)]
#[diesel(table_name = crate::schema::utilizadores)]
pub struct UpdateUser {
    #[diesel(column_name = nome)]
    pub name: Option<String>,
    #[diesel(column_name = idade)]
    pub age: Option<i32>,
    pub email: Option<String>,
    #[diesel(column_name = telefone)]
    pub phone: Option<String>,
    pub password: Option<String>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.password.is_none()
    }
}
