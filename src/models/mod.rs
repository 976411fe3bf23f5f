//! This module defines the domain data types.

pub use category::{BudgetCategory, CategoryName};
pub use debt::Debt;
pub use expense::{Expense, ExpenseBuilder};
pub use password::PasswordHash;
pub use subscription::{Subscription, monthly_total};
pub use user::{User, UserID, Username};

mod category;
mod debt;
mod expense;
mod password;
mod subscription;
mod user;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;
