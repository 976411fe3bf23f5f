//! Defines the budget category store trait.

use crate::{
    Error,
    models::{BudgetCategory, DatabaseID, UserID},
};

/// Creates and retrieves budget categories.
///
/// Deleting a category is not part of this trait: it must detach the
/// expenses that reference the category, so it lives on
/// [LedgerStore](crate::stores::LedgerStore).
pub trait CategoryStore {
    /// Insert a new category with a caller-chosen ID into the store.
    fn create(&mut self, category: BudgetCategory) -> Result<BudgetCategory, Error>;

    /// Get a category by its ID, scoped to `user_id`.
    fn get(&self, category_id: DatabaseID, user_id: UserID) -> Result<BudgetCategory, Error>;

    /// Get all categories for a given user, ordered by ascending ID.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<BudgetCategory>, Error>;

    /// Replace a category's fields wholesale. Returns false if the category
    /// was not found.
    ///
    /// Writing `spent_amount` through this method is a manual override of
    /// the derived aggregate: the ledger engine's next expense mutation
    /// adjusts incrementally from the overridden value.
    fn update(&mut self, category: BudgetCategory) -> Result<bool, Error>;
}
