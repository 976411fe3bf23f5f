//! Implements a SQLite backed expense store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, Expense, UserID},
    stores::ExpenseStore,
};

/// Retrieves expenses from a SQLite database.
///
/// Expense mutations go through
/// [SQLiteLedgerStore](crate::stores::sqlite::SQLiteLedgerStore), which keeps
/// the category aggregates in step.
#[derive(Debug, Clone)]
pub struct SQLiteExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteExpenseStore {
    /// Create a new expense store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl ExpenseStore for SQLiteExpenseStore {
    /// Retrieve the expense with `expense_id`, scoped to `user_id`.
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such expense, or
    /// [Error::SqlError] if there is some other SQL error.
    fn get(&self, expense_id: DatabaseID, user_id: UserID) -> Result<Expense, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, user_id, category_id, name, amount, date, receipt_ref, created_at
                 FROM expenses WHERE id = :id AND user_id = :user_id",
            )?
            .query_row(
                &[(":id", &expense_id), (":user_id", &user_id.as_i64())],
                SQLiteExpenseStore::map_row,
            )
            .map_err(|error| error.into())
    }

    /// Retrieve all of a user's expenses, newest first.
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Expense>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, user_id, category_id, name, amount, date, receipt_ref, created_at
                 FROM expenses WHERE user_id = :user_id
                 ORDER BY date DESC, created_at DESC",
            )?
            .query_map(
                &[(":user_id", &user_id.as_i64())],
                SQLiteExpenseStore::map_row,
            )?
            .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
            .collect()
    }
}

impl CreateTable for SQLiteExpenseStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        // There is deliberately no foreign key on category_id: an expense may
        // be created against, or left pointing at, a category that no longer
        // exists. The ledger store treats such references as detached.
        connection.execute(
            "CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                category_id INTEGER,
                name TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                receipt_ref TEXT,
                created_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteExpenseStore {
    type ReturnType = Expense;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let raw_user_id = row.get(offset + 1)?;
        let category_id = row.get(offset + 2)?;
        let name = row.get(offset + 3)?;
        let amount = row.get(offset + 4)?;
        let date = row.get(offset + 5)?;
        let receipt_ref = row.get(offset + 6)?;
        let created_at = row.get(offset + 7)?;

        Ok(Self::ReturnType {
            id,
            user_id: UserID::new(raw_user_id),
            category_id,
            name,
            amount,
            date,
            receipt_ref,
            created_at,
        })
    }
}
