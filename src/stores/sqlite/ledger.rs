//! Implements the atomic ledger operations on a SQLite database.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    Error,
    models::{DatabaseID, Expense, UserID},
    stores::LedgerStore,
};

/// Applies expense mutations and the matching category aggregate adjustments
/// in single SQL transactions.
///
/// The aggregate write is `spent_amount = MAX(0, spent_amount + delta)`: a
/// single atomic increment clamped at zero, evaluated by the database. It is
/// never read out and written back as a total, so adjustments serialize at
/// the row and cannot drift under concurrent callers.
#[derive(Debug, Clone)]
pub struct SQLiteLedgerStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteLedgerStore {
    /// Create a new ledger store with a SQLite database.
    ///
    /// The expense and category tables must have been set up via
    /// [initialize](crate::db::initialize).
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

/// Add `delta` to the spent amount of `category_id`, clamped at zero.
///
/// A `None` category, a missing category, and a zero delta are all no-ops: an
/// expense may legitimately reference a category that has since been deleted,
/// and an uncategorized expense contributes to no aggregate.
fn adjust_category_spent(
    transaction: &SqlTransaction,
    user_id: UserID,
    category_id: Option<DatabaseID>,
    delta: f64,
) -> Result<(), rusqlite::Error> {
    let Some(category_id) = category_id else {
        return Ok(());
    };

    if delta == 0.0 {
        return Ok(());
    }

    let rows_updated = transaction.execute(
        "UPDATE budget_categories SET spent_amount = MAX(0, spent_amount + ?1)
         WHERE id = ?2 AND user_id = ?3",
        (delta, category_id, user_id.as_i64()),
    )?;

    if rows_updated == 0 {
        tracing::warn!(
            "skipping spend adjustment of {delta} for user {user_id}: \
             category {category_id} does not exist"
        );
    }

    Ok(())
}

impl LedgerStore for SQLiteLedgerStore {
    /// Write a new expense and add its amount to its category's spent total,
    /// as one transaction.
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn create_expense(&mut self, expense: Expense) -> Result<Expense, Error> {
        let connection = self.connection.lock().unwrap();
        let transaction = connection.unchecked_transaction()?;

        transaction.execute(
            "INSERT INTO expenses (id, user_id, category_id, name, amount, date, receipt_ref, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            (
                expense.id,
                expense.user_id.as_i64(),
                expense.category_id,
                &expense.name,
                expense.amount,
                expense.date,
                &expense.receipt_ref,
                expense.created_at,
            ),
        )?;
        adjust_category_spent(
            &transaction,
            expense.user_id,
            expense.category_id,
            expense.amount,
        )?;

        transaction.commit()?;

        Ok(expense)
    }

    /// Replace an expense's fields and reconcile the category aggregates, as
    /// one transaction.
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn update_expense(&mut self, expense: Expense) -> Result<bool, Error> {
        let connection = self.connection.lock().unwrap();
        let transaction = connection.unchecked_transaction()?;

        let existing: Option<(Option<DatabaseID>, f64)> = transaction
            .prepare("SELECT category_id, amount FROM expenses WHERE id = :id AND user_id = :user_id")?
            .query_row(
                &[(":id", &expense.id), (":user_id", &expense.user_id.as_i64())],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map(Some)
            .or_else(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                error => Err(error),
            })?;

        let Some((old_category_id, old_amount)) = existing else {
            return Ok(false);
        };

        transaction.execute(
            "UPDATE expenses
             SET category_id = ?1, name = ?2, amount = ?3, date = ?4, receipt_ref = ?5
             WHERE id = ?6 AND user_id = ?7",
            (
                expense.category_id,
                &expense.name,
                expense.amount,
                expense.date,
                &expense.receipt_ref,
                expense.id,
                expense.user_id.as_i64(),
            ),
        )?;

        if old_category_id != expense.category_id {
            adjust_category_spent(&transaction, expense.user_id, old_category_id, -old_amount)?;
            adjust_category_spent(
                &transaction,
                expense.user_id,
                expense.category_id,
                expense.amount,
            )?;
        } else {
            let delta = expense.amount - old_amount;
            adjust_category_spent(&transaction, expense.user_id, expense.category_id, delta)?;
        }

        transaction.commit()?;

        Ok(true)
    }

    /// Delete an expense and subtract its amount from its category's spent
    /// total, as one transaction.
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn delete_expense(&mut self, expense_id: DatabaseID, user_id: UserID) -> Result<bool, Error> {
        let connection = self.connection.lock().unwrap();
        let transaction = connection.unchecked_transaction()?;

        let existing: Option<(Option<DatabaseID>, f64)> = transaction
            .prepare("SELECT category_id, amount FROM expenses WHERE id = :id AND user_id = :user_id")?
            .query_row(
                &[(":id", &expense_id), (":user_id", &user_id.as_i64())],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map(Some)
            .or_else(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                error => Err(error),
            })?;

        let Some((category_id, amount)) = existing else {
            return Ok(false);
        };

        transaction.execute(
            "DELETE FROM expenses WHERE id = ?1 AND user_id = ?2",
            (expense_id, user_id.as_i64()),
        )?;
        adjust_category_spent(&transaction, user_id, category_id, -amount)?;

        transaction.commit()?;

        Ok(true)
    }

    /// Delete a category and detach the expenses that referenced it, as one
    /// transaction.
    ///
    /// # Panics
    /// Panics if the database lock is poisoned.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn delete_category(
        &mut self,
        category_id: DatabaseID,
        user_id: UserID,
    ) -> Result<bool, Error> {
        let connection = self.connection.lock().unwrap();
        let transaction = connection.unchecked_transaction()?;

        let rows_deleted = transaction.execute(
            "DELETE FROM budget_categories WHERE id = ?1 AND user_id = ?2",
            (category_id, user_id.as_i64()),
        )?;

        if rows_deleted == 0 {
            return Ok(false);
        }

        transaction.execute(
            "UPDATE expenses SET category_id = NULL WHERE category_id = ?1 AND user_id = ?2",
            (category_id, user_id.as_i64()),
        )?;

        transaction.commit()?;

        Ok(true)
    }
}
