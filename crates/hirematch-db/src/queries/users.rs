use hirematch_types::Role;
use rusqlite::{Connection, OptionalExtension, params};

use crate::Database;
use crate::error::{DbError, Result};
use crate::models::{UserRow, enum_col, time_col};

const USER_COLUMNS: &str =
    "id, email, password, full_name, role, company_name, designation, created_at";

impl Database {
    /// Inserts a user. A taken email surfaces as [`DbError::UniqueViolation`].
    pub fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        full_name: &str,
        role: Role,
        company_name: Option<&str>,
        designation: Option<&str>,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (email, password, full_name, role, company_name, designation)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![email, password_hash, full_name, role.as_str(), company_name, designation],
            )
            .map_err(DbError::classify)?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email = ?1", &email))
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id = ?1", &id))
    }
}

fn query_user(
    conn: &Connection,
    predicate: &str,
    key: &dyn rusqlite::ToSql,
) -> Result<Option<UserRow>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {predicate}");
    let row = conn
        .query_row(&sql, [key], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                email: row.get(1)?,
                password: row.get(2)?,
                full_name: row.get(3)?,
                role: enum_col(row, 4)?,
                company_name: row.get(5)?,
                designation: row.get(6)?,
                created_at: time_col(row, 7)?,
            })
        })
        .optional()?;

    Ok(row)
}

#[cfg(test)]
mod tests {
    use crate::test_support::db;
    use hirematch_types::Role;

    #[test]
    fn duplicate_email_is_a_unique_violation() {
        let db = db();
        db.create_user("a@x.io", "h", "A", Role::Employer, Some("Acme"), None)
            .unwrap();
        let err = db
            .create_user("a@x.io", "h", "B", Role::Jobseeker, None, None)
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[test]
    fn round_trips_role_and_optional_fields() {
        let db = db();
        let id = db
            .create_user("e@x.io", "h", "Eve", Role::Employer, Some("Acme"), Some("CTO"))
            .unwrap();

        let user = db.get_user_by_id(id).unwrap().unwrap();
        assert_eq!(user.role, Role::Employer);
        assert_eq!(user.company_name.as_deref(), Some("Acme"));
        assert_eq!(user.designation.as_deref(), Some("CTO"));

        assert!(db.get_user_by_email("nobody@x.io").unwrap().is_none());
    }
}
