//! Implements a SQLite backed budget category store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{BudgetCategory, CategoryName, DatabaseID, UserID},
    stores::CategoryStore,
};

/// Creates and retrieves budget categories to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl CategoryStore for SQLiteCategoryStore {
    /// Insert a category into the database.
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn create(&mut self, category: BudgetCategory) -> Result<BudgetCategory, Error> {
        self.connection.lock().unwrap().execute(
            "INSERT INTO budget_categories (id, user_id, name, max_amount, spent_amount)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                category.id,
                category.user_id.as_i64(),
                category.name.as_ref(),
                category.max_amount,
                category.spent_amount,
            ),
        )?;

        Ok(category)
    }

    /// Retrieve the category with `category_id`, scoped to `user_id`.
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such category, or
    /// [Error::SqlError] if there is some other SQL error.
    fn get(&self, category_id: DatabaseID, user_id: UserID) -> Result<BudgetCategory, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, user_id, name, max_amount, spent_amount FROM budget_categories
                 WHERE id = :id AND user_id = :user_id",
            )?
            .query_row(
                &[(":id", &category_id), (":user_id", &user_id.as_i64())],
                SQLiteCategoryStore::map_row,
            )
            .map_err(|error| error.into())
    }

    /// Retrieve all of a user's categories, ordered by ascending ID.
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<BudgetCategory>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, user_id, name, max_amount, spent_amount FROM budget_categories
                 WHERE user_id = :user_id ORDER BY id ASC",
            )?
            .query_map(
                &[(":user_id", &user_id.as_i64())],
                SQLiteCategoryStore::map_row,
            )?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }

    /// Replace a category's fields wholesale.
    ///
    /// Writing `spent_amount` here is the manual override described on
    /// [CategoryStore::update].
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn update(&mut self, category: BudgetCategory) -> Result<bool, Error> {
        let rows_updated = self.connection.lock().unwrap().execute(
            "UPDATE budget_categories SET name = ?1, max_amount = ?2, spent_amount = ?3
             WHERE id = ?4 AND user_id = ?5",
            (
                category.name.as_ref(),
                category.max_amount,
                category.spent_amount,
                category.id,
                category.user_id.as_i64(),
            ),
        )?;

        Ok(rows_updated > 0)
    }
}

impl CreateTable for SQLiteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS budget_categories (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                max_amount REAL NOT NULL,
                spent_amount REAL NOT NULL DEFAULT 0,
                FOREIGN KEY(user_id) REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteCategoryStore {
    type ReturnType = BudgetCategory;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let raw_user_id = row.get(offset + 1)?;
        let raw_name: String = row.get(offset + 2)?;
        let max_amount = row.get(offset + 3)?;
        let spent_amount = row.get(offset + 4)?;

        Ok(Self::ReturnType {
            id,
            user_id: UserID::new(raw_user_id),
            name: CategoryName::new_unchecked(&raw_name),
            max_amount,
            spent_amount,
        })
    }
}
