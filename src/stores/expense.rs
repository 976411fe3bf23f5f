//! Defines the expense store trait.

use crate::{
    Error,
    models::{DatabaseID, Expense, UserID},
};

/// Retrieves expenses.
///
/// Expense mutations are not part of this trait: every mutation must adjust
/// the owning category's aggregate in the same atomic unit, so they live on
/// [LedgerStore](crate::stores::LedgerStore).
pub trait ExpenseStore {
    /// Get an expense by its ID, scoped to `user_id`.
    fn get(&self, expense_id: DatabaseID, user_id: UserID) -> Result<Expense, Error>;

    /// Get all expenses for a given user, newest first (date descending,
    /// then creation time descending).
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Expense>, Error>;
}
