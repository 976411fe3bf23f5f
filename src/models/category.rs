//! This file defines the budget category type: a user-defined spending bucket
//! with a limit and a running total of what has been spent against it.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    models::{DatabaseID, UserID},
};

/// The name of a budget category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    /// This function will return an error if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        if name.is_empty() {
            Err(Error::EmptyName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty. This function
    /// has `_unchecked` in the name but is not `unsafe`, because a violated
    /// invariant may cause incorrect behaviour but will not affect memory
    /// safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user-defined spending bucket, e.g. 'Groceries' or 'Eating Out'.
///
/// `spent_amount` is a derived aggregate: it equals the sum of the amounts of
/// all expenses currently referencing this category, clamped at zero. It is
/// maintained by the [Ledger](crate::Ledger) engine as a side effect of
/// expense mutations and should not be written directly, with one exception:
/// a full-replace update through the category store acts as a manual
/// override, and the engine's next expense mutation adjusts incrementally
/// from the overridden value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategory {
    /// The ID of the category.
    pub id: DatabaseID,
    /// The ID of the user that owns the category.
    pub user_id: UserID,
    /// The display name of the category.
    pub name: CategoryName,
    /// The spending limit for the category.
    pub max_amount: f64,
    /// The derived running total of expenses against this category.
    pub spent_amount: f64,
}
