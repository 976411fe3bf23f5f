//! Defines the store trait for the atomic ledger operations.

use crate::{
    Error,
    models::{DatabaseID, Expense, UserID},
};

/// The multi-record atomic operations the ledger engine depends on.
///
/// Each operation commits the expense mutation and the matching category
/// aggregate adjustment as one atomic unit: no concurrent reader or writer
/// can observe one without the other, and a failure applies neither.
///
/// Implementations must adjust `spent_amount` with an atomic increment
/// clamped at zero rather than a read-then-write of the new total, so that
/// concurrent adjustments to the same category cannot interleave and drift.
pub trait LedgerStore {
    /// Write a new expense and add its amount to its category's
    /// `spent_amount`.
    ///
    /// A missing or `None` category makes the adjustment a no-op while the
    /// expense is still recorded; a dangling category reference is tolerated,
    /// not an error.
    fn create_expense(&mut self, expense: Expense) -> Result<Expense, Error>;

    /// Replace an expense's fields and reconcile the category aggregates.
    ///
    /// When the category changed, the old amount is subtracted from the old
    /// category and the new amount added to the new one. When the category is
    /// unchanged, only the amount delta is applied, and a zero delta skips
    /// the write entirely. Returns false, with no effects, if the expense was
    /// not found.
    fn update_expense(&mut self, expense: Expense) -> Result<bool, Error>;

    /// Delete an expense and subtract its amount from its category's
    /// `spent_amount`. Returns false if the expense was not found.
    fn delete_expense(&mut self, expense_id: DatabaseID, user_id: UserID) -> Result<bool, Error>;

    /// Delete a category and clear the `category_id` of every expense that
    /// referenced it, leaving those expenses uncategorized. Returns false if
    /// the category was not found.
    fn delete_category(&mut self, category_id: DatabaseID, user_id: UserID)
    -> Result<bool, Error>;
}
