//! Implements a SQLite backed debt store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, Debt, UserID},
    stores::DebtStore,
};

/// Creates and retrieves debts to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteDebtStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteDebtStore {
    /// Create a new debt store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl DebtStore for SQLiteDebtStore {
    /// Insert a debt into the database.
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn create(&mut self, debt: Debt) -> Result<Debt, Error> {
        self.connection.lock().unwrap().execute(
            "INSERT INTO debts (id, user_id, name, total_amount, paid_amount, due_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                debt.id,
                debt.user_id.as_i64(),
                &debt.name,
                debt.total_amount,
                debt.paid_amount,
                debt.due_date,
                debt.created_at,
            ),
        )?;

        Ok(debt)
    }

    /// Retrieve the debt with `debt_id`, scoped to `user_id`.
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such debt, or
    /// [Error::SqlError] if there is some other SQL error.
    fn get(&self, debt_id: DatabaseID, user_id: UserID) -> Result<Debt, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, user_id, name, total_amount, paid_amount, due_date, created_at
                 FROM debts WHERE id = :id AND user_id = :user_id",
            )?
            .query_row(
                &[(":id", &debt_id), (":user_id", &user_id.as_i64())],
                SQLiteDebtStore::map_row,
            )
            .map_err(|error| error.into())
    }

    /// Retrieve all of a user's debts.
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Debt>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, user_id, name, total_amount, paid_amount, due_date, created_at
                 FROM debts WHERE user_id = :user_id",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], SQLiteDebtStore::map_row)?
            .map(|maybe_debt| maybe_debt.map_err(|error| error.into()))
            .collect()
    }

    /// Replace a debt's fields wholesale.
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn update(&mut self, debt: Debt) -> Result<bool, Error> {
        let rows_updated = self.connection.lock().unwrap().execute(
            "UPDATE debts SET name = ?1, total_amount = ?2, paid_amount = ?3, due_date = ?4
             WHERE id = ?5 AND user_id = ?6",
            (
                &debt.name,
                debt.total_amount,
                debt.paid_amount,
                debt.due_date,
                debt.id,
                debt.user_id.as_i64(),
            ),
        )?;

        Ok(rows_updated > 0)
    }

    /// Delete a debt.
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn delete(&mut self, debt_id: DatabaseID, user_id: UserID) -> Result<bool, Error> {
        let rows_deleted = self.connection.lock().unwrap().execute(
            "DELETE FROM debts WHERE id = ?1 AND user_id = ?2",
            (debt_id, user_id.as_i64()),
        )?;

        Ok(rows_deleted > 0)
    }
}

impl CreateTable for SQLiteDebtStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS debts (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                total_amount REAL NOT NULL,
                paid_amount REAL NOT NULL DEFAULT 0,
                due_date TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteDebtStore {
    type ReturnType = Debt;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let raw_user_id = row.get(offset + 1)?;
        let name = row.get(offset + 2)?;
        let total_amount = row.get(offset + 3)?;
        let paid_amount = row.get(offset + 4)?;
        let due_date = row.get(offset + 5)?;
        let created_at = row.get(offset + 6)?;

        Ok(Self::ReturnType {
            id,
            user_id: UserID::new(raw_user_id),
            name,
            total_amount,
            paid_amount,
            due_date,
            created_at,
        })
    }
}
