//! This file defines a single expense entry recorded by the user.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::models::{DatabaseID, UserID};

/// An event where money was spent.
///
/// An expense may reference a [BudgetCategory](crate::models::BudgetCategory)
/// through `category_id`, in which case its amount is counted into that
/// category's `spent_amount` aggregate. A `None` category means the expense
/// is uncategorized and contributes to no aggregate. The reference is
/// deliberately allowed to dangle: deleting a category detaches (nulls) the
/// reference on its expenses rather than deleting them.
///
/// To create a new `Expense`, use [Expense::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: DatabaseID,
    /// The ID of the user that recorded the expense.
    pub user_id: UserID,
    /// The category the expense counts against, if any.
    pub category_id: Option<DatabaseID>,
    /// A short description of what the money was spent on.
    pub name: String,
    /// The amount of money spent. Always greater than zero.
    pub amount: f64,
    /// The calendar date the expense occurred on.
    pub date: Date,
    /// An opaque reference to an attached receipt, if any.
    pub receipt_ref: Option<String>,
    /// When the expense record was created.
    pub created_at: OffsetDateTime,
}

impl Expense {
    /// Create a new expense.
    ///
    /// Shortcut for [ExpenseBuilder] for discoverability.
    pub fn build(user_id: UserID, name: &str, amount: f64, date: Date) -> ExpenseBuilder {
        ExpenseBuilder {
            user_id,
            category_id: None,
            name: name.to_owned(),
            amount,
            date,
            receipt_ref: None,
        }
    }
}

/// A builder for creating [Expense] instances.
///
/// Optional fields default to `None`; the ID and creation timestamp are
/// assigned by the [Ledger](crate::Ledger) engine when the expense is
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseBuilder {
    /// The ID of the user recording the expense.
    pub user_id: UserID,
    /// The category the expense counts against, if any.
    pub category_id: Option<DatabaseID>,
    /// A short description of what the money was spent on.
    pub name: String,
    /// The amount of money spent.
    pub amount: f64,
    /// The calendar date the expense occurred on.
    pub date: Date,
    /// An opaque reference to an attached receipt, if any.
    pub receipt_ref: Option<String>,
}

impl ExpenseBuilder {
    /// Set the category the expense counts against.
    pub fn category_id(mut self, category_id: Option<DatabaseID>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Attach a receipt reference.
    pub fn receipt_ref(mut self, receipt_ref: Option<String>) -> Self {
        self.receipt_ref = receipt_ref;
        self
    }

    /// Finalize the builder into an [Expense] with the given `id`, stamped
    /// with the current time.
    pub fn finalize(self, id: DatabaseID) -> Expense {
        Expense {
            id,
            user_id: self.user_id,
            category_id: self.category_id,
            name: self.name,
            amount: self.amount,
            date: self.date,
            receipt_ref: self.receipt_ref,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}
