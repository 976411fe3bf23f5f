//! Implements a SQLite backed user store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{PasswordHash, User, UserID, Username},
    stores::UserStore,
};

/// Handles the creation and retrieval of users in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new user store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Insert a new user into the database.
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// Returns [Error::UsernameTaken] if the username is already in use, or
    /// [Error::SqlError] if an SQL related error occurred.
    fn create(&mut self, user: User) -> Result<User, Error> {
        self.connection.lock().unwrap().execute(
            "INSERT INTO users (id, username, password_hash) VALUES (?1, ?2, ?3)",
            (
                user.id().as_i64(),
                user.username().as_ref(),
                user.password_hash().as_ref(),
            ),
        )?;

        Ok(user)
    }

    /// Get the user with the specified `id`.
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such user, or
    /// [Error::SqlError] if an SQL related error occurred.
    fn get(&self, id: UserID) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT id, username, password_hash FROM users WHERE id = :id")?
            .query_row(&[(":id", &id.as_i64())], SQLiteUserStore::map_row)
            .map_err(|error| error.into())
    }

    /// Get the user matching the `(username, password_hash)` pair.
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no user matches, or [Error::SqlError] if
    /// an SQL related error occurred.
    fn get_by_credentials(
        &self,
        username: &Username,
        password_hash: &PasswordHash,
    ) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, username, password_hash FROM users
                 WHERE username = :username AND password_hash = :password_hash",
            )?
            .query_row(
                &[
                    (":username", username.as_ref()),
                    (":password_hash", password_hash.as_ref()),
                ],
                SQLiteUserStore::map_row,
            )
            .map_err(|error| error.into())
    }

    /// Delete the user with the specified `id` along with everything the
    /// user owns, via the cascading foreign keys on the owned tables.
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if an SQL related error occurred.
    fn delete(&mut self, id: UserID) -> Result<bool, Error> {
        let rows_deleted = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM users WHERE id = ?1", (id.as_i64(),))?;

        Ok(rows_deleted > 0)
    }
}

impl CreateTable for SQLiteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS users (
                    id INTEGER PRIMARY KEY,
                    username TEXT UNIQUE NOT NULL,
                    password_hash TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_id = row.get(offset)?;
        let raw_username: String = row.get(offset + 1)?;
        let raw_password_hash: String = row.get(offset + 2)?;

        let id = UserID::new(raw_id);
        let username = Username::new_unchecked(&raw_username);
        let password_hash = PasswordHash::new_unchecked(&raw_password_hash);

        Ok(Self::ReturnType::new(id, username, password_hash))
    }
}

#[cfg(test)]
mod user_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        db::initialize,
        models::{PasswordHash, User, UserID, Username},
    };

    use super::{Error, SQLiteUserStore, UserStore};

    fn get_store() -> SQLiteUserStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SQLiteUserStore::new(Arc::new(Mutex::new(connection)))
    }

    fn test_user(id: i64, username: &str) -> User {
        User::new(
            UserID::new(id),
            Username::new_unchecked(username),
            PasswordHash::from_raw_password("hunter2"),
        )
    }

    #[test]
    fn insert_user_succeeds() {
        let mut store = get_store();

        let inserted_user = store.create(test_user(42, "alice")).unwrap();

        assert_eq!(inserted_user.id(), UserID::new(42));
        assert_eq!(inserted_user.username().as_ref(), "alice");
    }

    #[test]
    fn insert_user_fails_on_duplicate_username() {
        let mut store = get_store();

        assert!(store.create(test_user(1, "alice")).is_ok());

        assert_eq!(
            store.create(test_user(2, "alice")),
            Err(Error::UsernameTaken)
        );
    }

    #[test]
    fn usernames_are_case_sensitive() {
        let mut store = get_store();

        assert!(store.create(test_user(1, "alice")).is_ok());
        assert!(store.create(test_user(2, "Alice")).is_ok());
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let store = get_store();

        assert_eq!(store.get(UserID::new(42)), Err(Error::NotFound));
    }

    #[test]
    fn get_user_succeeds_with_existing_id() {
        let mut store = get_store();
        let inserted_user = store.create(test_user(42, "alice")).unwrap();

        let retrieved_user = store.get(inserted_user.id()).unwrap();

        assert_eq!(retrieved_user, inserted_user);
    }

    #[test]
    fn get_by_credentials_matches_exact_pair() {
        let mut store = get_store();
        let inserted_user = store.create(test_user(42, "alice")).unwrap();

        let retrieved_user = store
            .get_by_credentials(
                &Username::new_unchecked("alice"),
                &PasswordHash::from_raw_password("hunter2"),
            )
            .unwrap();

        assert_eq!(retrieved_user, inserted_user);
    }

    #[test]
    fn get_by_credentials_fails_with_wrong_password() {
        let mut store = get_store();
        store.create(test_user(42, "alice")).unwrap();

        let result = store.get_by_credentials(
            &Username::new_unchecked("alice"),
            &PasswordHash::from_raw_password("thewrongpassword"),
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_user_returns_false_when_missing() {
        let mut store = get_store();

        assert_eq!(store.delete(UserID::new(42)), Ok(false));
    }

    #[test]
    fn delete_user_removes_the_record() {
        let mut store = get_store();
        let inserted_user = store.create(test_user(42, "alice")).unwrap();

        assert_eq!(store.delete(inserted_user.id()), Ok(true));
        assert_eq!(store.get(inserted_user.id()), Err(Error::NotFound));
    }
}
