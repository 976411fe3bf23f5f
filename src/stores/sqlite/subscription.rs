//! Implements a SQLite backed subscription store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, Subscription, UserID},
    stores::SubscriptionStore,
};

/// Creates and retrieves subscriptions to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteSubscriptionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteSubscriptionStore {
    /// Create a new subscription store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl SubscriptionStore for SQLiteSubscriptionStore {
    /// Insert a subscription into the database.
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn create(&mut self, subscription: Subscription) -> Result<Subscription, Error> {
        self.connection.lock().unwrap().execute(
            "INSERT INTO subscriptions (id, user_id, name, amount, date, icon_ref, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                subscription.id,
                subscription.user_id.as_i64(),
                &subscription.name,
                subscription.amount,
                subscription.date,
                &subscription.icon_ref,
                subscription.created_at,
            ),
        )?;

        Ok(subscription)
    }

    /// Retrieve the subscription with `subscription_id`, scoped to `user_id`.
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such subscription, or
    /// [Error::SqlError] if there is some other SQL error.
    fn get(&self, subscription_id: DatabaseID, user_id: UserID) -> Result<Subscription, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, user_id, name, amount, date, icon_ref, created_at
                 FROM subscriptions WHERE id = :id AND user_id = :user_id",
            )?
            .query_row(
                &[(":id", &subscription_id), (":user_id", &user_id.as_i64())],
                SQLiteSubscriptionStore::map_row,
            )
            .map_err(|error| error.into())
    }

    /// Retrieve all of a user's subscriptions.
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Subscription>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, user_id, name, amount, date, icon_ref, created_at
                 FROM subscriptions WHERE user_id = :user_id",
            )?
            .query_map(
                &[(":user_id", &user_id.as_i64())],
                SQLiteSubscriptionStore::map_row,
            )?
            .map(|maybe_subscription| maybe_subscription.map_err(|error| error.into()))
            .collect()
    }

    /// Replace a subscription's fields wholesale.
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn update(&mut self, subscription: Subscription) -> Result<bool, Error> {
        let rows_updated = self.connection.lock().unwrap().execute(
            "UPDATE subscriptions SET name = ?1, amount = ?2, date = ?3, icon_ref = ?4
             WHERE id = ?5 AND user_id = ?6",
            (
                &subscription.name,
                subscription.amount,
                subscription.date,
                &subscription.icon_ref,
                subscription.id,
                subscription.user_id.as_i64(),
            ),
        )?;

        Ok(rows_updated > 0)
    }

    /// Delete a subscription.
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn delete(&mut self, subscription_id: DatabaseID, user_id: UserID) -> Result<bool, Error> {
        let rows_deleted = self.connection.lock().unwrap().execute(
            "DELETE FROM subscriptions WHERE id = ?1 AND user_id = ?2",
            (subscription_id, user_id.as_i64()),
        )?;

        Ok(rows_deleted > 0)
    }
}

impl CreateTable for SQLiteSubscriptionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS subscriptions (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                icon_ref TEXT,
                created_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteSubscriptionStore {
    type ReturnType = Subscription;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let raw_user_id = row.get(offset + 1)?;
        let name = row.get(offset + 2)?;
        let amount = row.get(offset + 3)?;
        let date = row.get(offset + 4)?;
        let icon_ref = row.get(offset + 5)?;
        let created_at = row.get(offset + 6)?;

        Ok(Self::ReturnType {
            id,
            user_id: UserID::new(raw_user_id),
            name,
            amount,
            date,
            icon_ref,
            created_at,
        })
    }
}
